use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::assets::decode::{PreparedImage, decode_resource};
use crate::assets::events::{EventBus, LoadCompleted, LoadPhase, LoadProgress, LoadStatus};
use crate::assets::fetch::ResourceFetcher;
use crate::assets::locale::find_best_resource;
use crate::assets::resource::{Resource, ResourceData, ResourceId, ResourceKind};
use crate::config::LoaderOpts;
use crate::foundation::error::{LanternError, LanternResult};

/// Batch counters reported by [`ResourceManager::counters`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadCounters {
    /// Resources that reached a terminal state in the current batch.
    pub number_loaded: usize,
    /// Resources queued for the current batch.
    pub total_resource_count: usize,
    /// Queued resources that are not available yet.
    pub pending_resource_count: usize,
}

type DoneCallback = Box<dyn FnOnce(bool)>;

#[derive(Default)]
struct ManagerState {
    locale: Option<String>,
    resources: Vec<Resource>,
    pending: Vec<ResourceId>,
    counters: LoadCounters,
    resource_failed: bool,
    on_done: Option<DoneCallback>,
    loading: bool,
    in_flight: Option<ResourceId>,
}

impl ManagerState {
    fn recount_pending(&mut self) {
        let resources = &self.resources;
        self.counters.pending_resource_count = self
            .pending
            .iter()
            .filter(|id| !resources[id.0].is_available())
            .count();
    }

    /// Reset the batch counters so the next batch starts from zero.
    fn close_batch(&mut self) {
        self.loading = false;
        self.counters.number_loaded = 0;
        self.counters.total_resource_count = self.counters.pending_resource_count;
    }

    fn progress(&self, phase: LoadPhase, status: LoadStatus, key: Option<String>) -> LoadProgress {
        LoadProgress {
            number_loaded: self.counters.number_loaded,
            total_resources: self.counters.total_resource_count,
            phase,
            status,
            key,
        }
    }
}

struct Shared<F> {
    fetcher: F,
    state: RefCell<ManagerState>,
    progress: EventBus<LoadProgress>,
    completed: EventBus<LoadCompleted>,
}

/// Releases a running batch whose `load` future is dropped before it completes.
///
/// The resource being fetched goes back to idle and leaves the queue; resources that were
/// still waiting stay queued for the next batch. No progress or completion event is emitted
/// and the batch callback is dropped without being called.
struct BatchGuard<'a, F> {
    shared: &'a Shared<F>,
    armed: bool,
}

impl<F> Drop for BatchGuard<'_, F> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut guard) = self.shared.state.try_borrow_mut() else {
            return;
        };
        let st = &mut *guard;
        if let Some(id) = st.in_flight.take() {
            st.pending.retain(|p| *p != id);
            st.resources[id.0].reset();
        }
        st.on_done = None;
        st.recount_pending();
        st.close_batch();
        warn!(
            pending = st.counters.pending_resource_count,
            "load batch abandoned"
        );
    }
}

/// Serialized, locale-aware asset loader.
///
/// The manager owns every known [`Resource`] and a FIFO queue of resources registered for the
/// next batch. [`load`](Self::load) fetches the queue one resource at a time: exactly one fetch
/// is in flight, and the queue is re-scanned before each fetch so that resources registered
/// mid-batch join the running batch.
///
/// Handles are cheap to clone and share one state. The state is single-threaded; drive the
/// load future on a current-thread runtime.
pub struct ResourceManager<F> {
    shared: Rc<Shared<F>>,
}

impl<F> Clone for ResourceManager<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<F> std::fmt::Debug for ResourceManager<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.shared.state.borrow();
        f.debug_struct("ResourceManager")
            .field("locale", &st.locale)
            .field("resources", &st.resources.len())
            .field("counters", &st.counters)
            .field("loading", &st.loading)
            .finish()
    }
}

impl<F: ResourceFetcher> ResourceManager<F> {
    /// Create a manager with default options.
    pub fn new(fetcher: F) -> Self {
        Self::with_opts(fetcher, LoaderOpts::default())
    }

    /// Create a manager with explicit options.
    pub fn with_opts(fetcher: F, opts: LoaderOpts) -> Self {
        let state = ManagerState {
            locale: opts.locale,
            ..ManagerState::default()
        };
        Self {
            shared: Rc::new(Shared {
                fetcher,
                state: RefCell::new(state),
                progress: EventBus::new(),
                completed: EventBus::new(),
            }),
        }
    }

    /// Underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.shared.fetcher
    }

    /// Progress events, one per loader state change.
    pub fn progress(&self) -> &EventBus<LoadProgress> {
        &self.shared.progress
    }

    /// Batch completion events.
    pub fn completed(&self) -> &EventBus<LoadCompleted> {
        &self.shared.completed
    }

    /// Locale used by [`register`](Self::register) and lookups without an explicit locale.
    pub fn locale(&self) -> Option<String> {
        self.shared.state.borrow().locale.clone()
    }

    /// Change the lookup locale. Already-queued resources are unaffected.
    pub fn set_locale(&self, locale: Option<&str>) {
        self.shared.state.borrow_mut().locale = locale.map(str::to_owned);
    }

    /// Add a resource, merging it into an existing one with the same key and locale.
    ///
    /// A merge keeps the existing identity and load state and only takes over the origin.
    pub fn add(&self, resource: Resource) -> ResourceId {
        let mut st = self.shared.state.borrow_mut();
        if let Some(idx) = st
            .resources
            .iter()
            .position(|r| r.same_identity(resource.key(), resource.locale()))
        {
            debug!(key = resource.key(), locale = ?resource.locale(), "merged resource origin");
            let origin = resource.origin().to_owned();
            st.resources[idx].set_origin(resource.kind(), origin);
            return ResourceId(idx);
        }
        st.resources.push(resource);
        ResourceId(st.resources.len() - 1)
    }

    /// Add several resources; see [`add`](Self::add).
    pub fn add_all(&self, resources: impl IntoIterator<Item = Resource>) -> Vec<ResourceId> {
        resources.into_iter().map(|r| self.add(r)).collect()
    }

    /// Snapshot of every known resource, in insertion order.
    pub fn resources(&self) -> Vec<Resource> {
        self.shared.state.borrow().resources.clone()
    }

    /// Snapshot of one resource.
    pub fn resource(&self, id: ResourceId) -> Option<Resource> {
        self.shared.state.borrow().resources.get(id.0).cloned()
    }

    /// Best match for `key` under `locale` (or the manager locale when `None`).
    pub fn find_best_resource(&self, key: &str, locale: Option<&str>) -> Option<ResourceId> {
        let st = self.shared.state.borrow();
        let locale = locale.or(st.locale.as_deref());
        find_best_resource(&st.resources, key, locale).map(ResourceId)
    }

    /// Snapshot of the best match for `key`; see [`find_best_resource`](Self::find_best_resource).
    pub fn get(&self, key: &str, locale: Option<&str>) -> Option<Resource> {
        let id = self.find_best_resource(key, locale)?;
        self.resource(id)
    }

    /// Current batch counters.
    pub fn counters(&self) -> LoadCounters {
        self.shared.state.borrow().counters
    }

    /// `true` once any resource of the current batch failed.
    pub fn resource_failed(&self) -> bool {
        self.shared.state.borrow().resource_failed
    }

    /// `true` while a batch is running.
    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    /// Queue the best localized match for `key` for the next (or running) batch.
    ///
    /// Inline text, already-queued and already-available resources are left alone. Failed
    /// resources are queued again for a fresh attempt. Nothing is fetched until
    /// [`load`](Self::load).
    pub fn register(&self, key: &str) -> LanternResult<()> {
        let mut guard = self.shared.state.borrow_mut();
        let st = &mut *guard;
        let idx = find_best_resource(&st.resources, key, st.locale.as_deref())
            .ok_or_else(|| LanternError::resource(format!("no resource with key '{key}'")))?;

        let res = &mut st.resources[idx];
        if res.is_inline_text() || res.is_registered() || res.is_available() {
            debug!(key, "register skipped");
            return Ok(());
        }

        res.mark_pending();
        st.pending.push(ResourceId(idx));
        st.counters.pending_resource_count += 1;
        st.counters.total_resource_count += 1;
        debug!(key, origin = res.origin(), "registered resource");
        Ok(())
    }

    /// Register several keys; stops at the first unknown key.
    pub fn register_all<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> LanternResult<()> {
        keys.into_iter().try_for_each(|k| self.register(k))
    }

    /// Load every queued resource, one at a time.
    ///
    /// `on_done` receives the batch outcome: `true` only if every resource loaded. Individual
    /// failures do not stop the batch; they are recorded on the resource and reported through
    /// progress events and the outcome. The same outcome is returned.
    ///
    /// Fails only when another batch is already running on this manager.
    ///
    /// Dropping the returned future mid-batch abandons the batch: the manager becomes idle
    /// again, the resource being fetched returns to idle and `on_done` is never called.
    #[tracing::instrument(skip_all)]
    pub async fn load(&self, on_done: impl FnOnce(bool) + 'static) -> LanternResult<bool> {
        let pending = {
            let mut st = self.shared.state.borrow_mut();
            if st.loading {
                return Err(LanternError::resource(
                    "a load batch is already running on this manager",
                ));
            }
            st.resource_failed = false;
            st.on_done = Some(Box::new(on_done));
            st.recount_pending();
            st.counters.pending_resource_count
        };

        if pending == 0 {
            return Ok(self.complete(true));
        }

        let started = {
            let mut st = self.shared.state.borrow_mut();
            st.loading = true;
            st.progress(LoadPhase::BatchStarted, LoadStatus::InProgress, None)
        };
        let mut guard = BatchGuard {
            shared: &*self.shared,
            armed: true,
        };
        info!(pending, "loading started");
        self.shared.progress.emit(&started);

        while self.load_next().await {}

        guard.armed = false;
        let success = !self.resource_failed();
        Ok(self.complete(success))
    }

    /// Fetch the first still-unavailable queued resource. Returns `true` while more remain.
    async fn load_next(&self) -> bool {
        let next = {
            let mut guard = self.shared.state.borrow_mut();
            let st = &mut *guard;
            let resources = &st.resources;
            st.pending.retain(|id| !resources[id.0].is_available());
            st.recount_pending();
            let next = st.pending.first().map(|&id| {
                let r = &st.resources[id.0];
                let started = st.progress(
                    LoadPhase::ResourceStarted,
                    LoadStatus::InProgress,
                    Some(r.key().to_owned()),
                );
                (id, r.kind(), r.origin().to_owned(), started)
            });
            st.in_flight = next.as_ref().map(|(id, ..)| *id);
            next
        };
        let Some((id, kind, origin, started)) = next else {
            return false;
        };

        self.shared.progress.emit(&started);
        debug!(origin = %origin, "fetching resource");
        let outcome = self.fetch_and_decode(kind, &origin).await;
        self.unregister(id, outcome)
    }

    /// Failure messages keep the whole cause chain.
    async fn fetch_and_decode(
        &self,
        kind: ResourceKind,
        origin: &str,
    ) -> Result<ResourceData, String> {
        let bytes = self
            .shared
            .fetcher
            .fetch(origin)
            .await
            .map_err(|e| format!("{e:#}"))?;
        decode_resource(kind, bytes).map_err(|e| format!("{e:#}"))
    }

    /// Record the outcome of one fetch. Returns `true` while queued resources remain.
    fn unregister(&self, id: ResourceId, outcome: Result<ResourceData, String>) -> bool {
        let (event, remaining) = {
            let mut guard = self.shared.state.borrow_mut();
            let st = &mut *guard;
            st.pending.retain(|p| *p != id);
            st.in_flight = None;

            let res = &mut st.resources[id.0];
            let ok = outcome.is_ok();
            if let Err(msg) = &outcome {
                warn!(
                    key = res.key(),
                    origin = res.origin(),
                    error = %msg,
                    "resource failed to load"
                );
            }
            res.finish(outcome);
            let key = res.key().to_owned();

            if !ok {
                st.resource_failed = true;
            }
            st.counters.number_loaded += 1;
            st.recount_pending();

            let status = if ok {
                LoadStatus::Succeeded
            } else {
                LoadStatus::Failed
            };
            let event = st.progress(LoadPhase::ResourceFinished, status, Some(key));
            (event, st.counters.pending_resource_count)
        };

        self.shared.progress.emit(&event);
        remaining > 0
    }

    /// Close the batch: terminal progress event, completion event, then the callback.
    fn complete(&self, success: bool) -> bool {
        let (event, on_done) = {
            let mut st = self.shared.state.borrow_mut();
            let status = if success {
                LoadStatus::Succeeded
            } else {
                LoadStatus::Failed
            };
            let event = st.progress(LoadPhase::BatchFinished, status, None);
            st.close_batch();
            (event, st.on_done.take())
        };

        info!(
            success,
            loaded = event.number_loaded,
            total = event.total_resources,
            "loading finished"
        );
        self.shared.progress.emit(&event);
        self.shared.completed.emit(&LoadCompleted { success });
        if let Some(on_done) = on_done {
            on_done(success);
        }
        success
    }
}

/// Lookup of decoded bitmaps by resource key.
pub trait ImageSource {
    /// Decoded image for `key`, if one is available.
    fn image(&self, key: &str) -> Option<PreparedImage>;
}

impl<F: ResourceFetcher> ImageSource for ResourceManager<F> {
    fn image(&self, key: &str) -> Option<PreparedImage> {
        let st = self.shared.state.borrow();
        let idx = find_best_resource(&st.resources, key, st.locale.as_deref())?;
        st.resources[idx].image_data().cloned()
    }
}

impl ImageSource for HashMap<String, PreparedImage> {
    fn image(&self, key: &str) -> Option<PreparedImage> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/manager.rs"]
mod tests;
