use std::sync::Arc;

use crate::animation::ease::Ease;
use crate::effects::transitions::{builtin_renders, passthrough};
use crate::foundation::core::Rect;
use crate::foundation::error::{LanternError, LanternResult};
use crate::render::surface::Surface;

/// Render function: draws the blend of `a` and `b` at `offset` into `rect` of `dst`.
pub type RenderFn = Arc<dyn Fn(&mut Surface, &Surface, &Surface, f64, Rect) + Send + Sync>;

/// Easing function: remaps a linear fraction in `[0, 1]`.
pub type EasingFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Named render and easing functions.
///
/// Lookups are case-insensitive. Unknown render names resolve to a passthrough of the first
/// buffer and unknown easing names resolve to linear; neither is an error.
#[derive(Clone)]
pub struct TransitionRegistry {
    renders: Vec<(String, RenderFn)>,
    easings: Vec<(String, EasingFn)>,
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for TransitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRegistry")
            .field("renders", &self.render_names().collect::<Vec<_>>())
            .field("easings", &self.easing_names().collect::<Vec<_>>())
            .finish()
    }
}

impl TransitionRegistry {
    /// Registry with no entries. Every lookup falls back.
    pub fn empty() -> Self {
        Self {
            renders: Vec::new(),
            easings: Vec::new(),
        }
    }

    /// Registry with every built-in render function and easing.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, f) in builtin_renders() {
            registry.register_render(name, f);
        }
        for ease in Ease::ALL {
            registry.register_easing(ease.name(), move |t| ease.apply(t));
        }
        registry
    }

    /// Add a render function, replacing any entry with the same name.
    pub fn register_render(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&mut Surface, &Surface, &Surface, f64, Rect) + Send + Sync + 'static,
    ) -> &mut Self {
        let f: RenderFn = Arc::new(f);
        upsert(&mut self.renders, name.into(), f);
        self
    }

    /// Add an easing function, replacing any entry with the same name.
    pub fn register_easing(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> &mut Self {
        let f: EasingFn = Arc::new(f);
        upsert(&mut self.easings, name.into(), f);
        self
    }

    /// Whether `name` resolves to a registered render function.
    pub fn has_render(&self, name: &str) -> bool {
        find(&self.renders, name).is_some()
    }

    /// Whether `name` resolves to a registered easing.
    pub fn has_easing(&self, name: &str) -> bool {
        find(&self.easings, name).is_some()
    }

    /// Registered render names, in registration order.
    pub fn render_names(&self) -> impl Iterator<Item = &str> {
        self.renders.iter().map(|(n, _)| n.as_str())
    }

    /// Registered easing names, in registration order.
    pub fn easing_names(&self) -> impl Iterator<Item = &str> {
        self.easings.iter().map(|(n, _)| n.as_str())
    }

    /// Render function for `name`, or a passthrough of the first buffer when unknown.
    pub fn render_fn(&self, name: &str) -> RenderFn {
        match find(&self.renders, name) {
            Some(f) => Arc::clone(f),
            None => {
                tracing::debug!(name, "unknown transition, drawing first buffer only");
                Arc::new(passthrough)
            }
        }
    }

    /// Easing function for `name`, or linear when unknown.
    pub fn easing_fn(&self, name: &str) -> EasingFn {
        match find(&self.easings, name) {
            Some(f) => Arc::clone(f),
            None => {
                tracing::debug!(name, "unknown easing, using linear");
                Arc::new(|t: f64| Ease::Linear.apply(t))
            }
        }
    }

    /// Apply the named easing (linear when `None`) to `t`, clamped to `[0, 1]`.
    pub fn ease(&self, easing: Option<&str>, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match easing.and_then(|name| find(&self.easings, name)) {
            Some(f) => f(t).clamp(0.0, 1.0),
            None => t,
        }
    }

    /// Look up `name` and draw the blend of `a` and `b` at `offset` into `rect` of `dst`.
    ///
    /// Both buffers must have the same dimensions.
    pub fn render_transition(
        &self,
        name: &str,
        dst: &mut Surface,
        a: &Surface,
        b: &Surface,
        offset: f64,
        rect: Rect,
    ) -> LanternResult<()> {
        if !offset.is_finite() {
            return Err(LanternError::validation(format!(
                "transition offset must be finite, got {offset}"
            )));
        }
        if a.size() != b.size() {
            return Err(LanternError::render(format!(
                "transition buffers differ in size: {}x{} vs {}x{}",
                a.width(),
                a.height(),
                b.width(),
                b.height()
            )));
        }
        let f = self.render_fn(name);
        f(dst, a, b, offset.clamp(0.0, 1.0), rect);
        Ok(())
    }
}

fn find<'a, T>(entries: &'a [(String, T)], name: &str) -> Option<&'a T> {
    let name = name.trim();
    entries
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, f)| f)
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    match entries
        .iter_mut()
        .find(|(n, _)| n.eq_ignore_ascii_case(&name))
    {
        Some(entry) => *entry = (name, value),
        None => entries.push((name, value)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
