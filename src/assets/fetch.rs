use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context as _;

use crate::foundation::error::{LanternError, LanternResult};

/// Retrieves the raw bytes behind a resource origin.
///
/// Origins are opaque strings that were already resolved by the caller. Implementations only
/// report failure through the returned `Result`; the manager records it on the resource.
pub trait ResourceFetcher {
    /// Fetch all bytes for `origin`.
    fn fetch(&self, origin: &str) -> impl Future<Output = LanternResult<Vec<u8>>>;
}

impl<F: ResourceFetcher> ResourceFetcher for Rc<F> {
    fn fetch(&self, origin: &str) -> impl Future<Output = LanternResult<Vec<u8>>> {
        (**self).fetch(origin)
    }
}

/// Normalize and validate root-relative origins.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> LanternResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LanternError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(LanternError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LanternError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LanternError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Reads origins as paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Create a fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory origins are resolved against.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ResourceFetcher for FsFetcher {
    async fn fetch(&self, origin: &str) -> LanternResult<Vec<u8>> {
        let rel = normalize_rel_path(origin)?;
        let path = self.root.join(&rel);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read asset '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory fetcher for embedded assets and tests.
///
/// Every fetch yields to the executor once before completing, so callers observe a real
/// suspension point. Origins listed via [`MemoryFetcher::fail`] always fail.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    fetched: RefCell<Vec<String>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `origin`.
    pub fn insert(&mut self, origin: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(origin.into(), bytes.into());
        self
    }

    /// Make every fetch of `origin` fail.
    pub fn fail(&mut self, origin: impl Into<String>) -> &mut Self {
        self.failing.insert(origin.into());
        self
    }

    /// Origins fetched so far, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    /// Highest number of fetches observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.get()
    }
}

impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, origin: &str) -> LanternResult<Vec<u8>> {
        self.fetched.borrow_mut().push(origin.to_owned());
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        tokio::task::yield_now().await;

        self.in_flight.set(self.in_flight.get() - 1);
        if self.failing.contains(origin) {
            return Err(LanternError::resource(format!("fetch of '{origin}' failed")));
        }
        self.entries
            .get(origin)
            .cloned()
            .ok_or_else(|| LanternError::resource(format!("no entry for origin '{origin}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
