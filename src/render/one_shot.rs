//! Timer-driven transitions between two already-rendered frames.
//!
//! The animator advances the offset by a fixed step on every tick of a fixed interval. It does
//! not adapt to the real frame rate: a late tick still advances by exactly one step.

use crate::config::OneShotOpts;
use crate::effects::registry::TransitionRegistry;
use crate::foundation::core::Rect;
use crate::foundation::error::{LanternError, LanternResult};
use crate::render::surface::Surface;

/// A one-shot transition in progress.
#[derive(Clone, Debug)]
pub struct ActiveTransition {
    name: String,
    easing: Option<String>,
    ticks: u64,
    offset: f64,
    from: Surface,
    to: Surface,
}

impl ActiveTransition {
    /// Render function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Easing name, if any.
    pub fn easing(&self) -> Option<&str> {
        self.easing.as_deref()
    }

    /// Raw offset in `[0, 1]`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Animator state.
#[derive(Clone, Debug, Default)]
pub enum TransitionState {
    /// Nothing is animating and no buffers are held.
    #[default]
    Idle,
    /// A transition is animating.
    Running(ActiveTransition),
}

/// Fixed-step animator for discrete frame changes.
#[derive(Clone, Debug)]
pub struct OneShotTransition {
    opts: OneShotOpts,
    state: TransitionState,
}

impl OneShotTransition {
    /// Idle animator with validated options.
    pub fn new(opts: OneShotOpts) -> LanternResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            state: TransitionState::Idle,
        })
    }

    /// Animator options.
    pub fn opts(&self) -> OneShotOpts {
        self.opts
    }

    /// Current state.
    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Whether a transition is animating.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TransitionState::Running(_))
    }

    /// Begin animating from `from` to `to`, replacing any transition in progress.
    pub fn start(
        &mut self,
        name: impl Into<String>,
        easing: Option<&str>,
        from: Surface,
        to: Surface,
    ) -> LanternResult<()> {
        if from.size() != to.size() {
            return Err(LanternError::render(format!(
                "one-shot buffers differ in size: {}x{} vs {}x{}",
                from.width(),
                from.height(),
                to.width(),
                to.height()
            )));
        }
        if self.cancel() {
            tracing::debug!("replacing running one-shot transition");
        }
        self.state = TransitionState::Running(ActiveTransition {
            name: name.into(),
            easing: easing.map(str::to_string),
            ticks: 0,
            offset: 0.0,
            from,
            to,
        });
        Ok(())
    }

    /// Advance by one step.
    ///
    /// Returns the new offset, reaching exactly `1.0` on the last step. The tick after that
    /// tears the buffers down, returns to [`TransitionState::Idle`] and yields `None`.
    pub fn tick(&mut self) -> Option<f64> {
        let TransitionState::Running(active) = &mut self.state else {
            return None;
        };
        if active.offset >= 1.0 {
            tracing::debug!(
                name = %active.name,
                ticks = active.ticks,
                "one-shot transition finished"
            );
            self.state = TransitionState::Idle;
            return None;
        }
        active.ticks += 1;
        active.offset = if active.ticks >= self.opts.ticks_to_finish() {
            1.0
        } else {
            (active.ticks as f64 * self.opts.step).min(1.0)
        };
        Some(active.offset)
    }

    /// Stop immediately and drop the buffers. Returns whether a transition was running.
    pub fn cancel(&mut self) -> bool {
        matches!(
            std::mem::take(&mut self.state),
            TransitionState::Running(_)
        )
    }

    /// Draw the current blend into `rect` of `dst`. Returns `false` when idle.
    pub fn render(
        &self,
        registry: &TransitionRegistry,
        dst: &mut Surface,
        rect: Rect,
    ) -> LanternResult<bool> {
        let TransitionState::Running(active) = &self.state else {
            return Ok(false);
        };
        let eased = registry.ease(active.easing(), active.offset);
        registry.render_transition(&active.name, dst, &active.from, &active.to, eased, rect)?;
        Ok(true)
    }

    /// Drive the transition to completion on a fixed interval.
    ///
    /// Every tick clears `rect`, draws the blend and hands the frame and raw offset to
    /// `on_frame`. Returns the number of frames drawn.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn run(
        &mut self,
        registry: &TransitionRegistry,
        dst: &mut Surface,
        rect: Rect,
        mut on_frame: impl FnMut(&Surface, f64),
    ) -> LanternResult<u64> {
        let mut interval = tokio::time::interval(self.opts.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut frames = 0;
        loop {
            interval.tick().await;
            let Some(offset) = self.tick() else {
                break;
            };
            dst.clear_rect(rect, [0, 0, 0, 0]);
            self.render(registry, dst, rect)?;
            on_frame(dst, offset);
            frames += 1;
        }
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/one_shot.rs"]
mod tests;
