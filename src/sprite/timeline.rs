//! Time-to-frame resolution for sprite timelines.
//!
//! A timeline is a sequence of static segments. Between frame `i` and frame `i + 1` an
//! optional transition window is inserted when frame `i + 1` declares an incoming
//! transition. The last frame is followed by the window declared on frame 0, so the length
//! is the same whether or not the timeline loops.
//!
//! ```text
//! | frame 0 static | 0 -> 1 transition | frame 1 static | 1 -> 2 ... | last -> 0 |
//! ```

use crate::foundation::error::{LanternError, LanternResult};
use crate::sprite::frame::SpriteFrame;

/// Extra full passes allowed when accumulated segment sums drift from the cached length.
const MAX_DRIFT_PASSES: usize = 2;

/// Ordered frames plus looping flag and cached total length.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteTimeline {
    frames: Vec<SpriteFrame>,
    looping: bool,
    length: f64,
}

/// Resolved timeline state for one sampled time.
///
/// `transition` is set only while inside a transition window from `frame1` to `frame2`.
/// Outside a window `frame1` is the static frame, `frame2` the one that follows it, and
/// `offset` the fraction of the static segment already elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineState<'a> {
    /// Active transition name.
    pub transition: Option<&'a str>,
    /// Progress in `[0, 1]`.
    pub offset: f64,
    /// Current (or outgoing) frame index.
    pub frame1: usize,
    /// Next (or incoming) frame index.
    pub frame2: usize,
}

/// Structured view of a [`TimelineState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelinePhase<'a> {
    /// A single frame is shown.
    Static {
        /// Shown frame.
        frame: usize,
        /// Elapsed fraction of the frame's static time.
        progress: f64,
    },
    /// Two frames are composited by a named transition.
    Transitioning {
        /// Transition name.
        name: &'a str,
        /// Outgoing frame.
        from: usize,
        /// Incoming frame.
        to: usize,
        /// Raw (un-eased) transition progress.
        offset: f64,
    },
}

impl<'a> TimelineState<'a> {
    fn still(frame1: usize, frame2: usize, offset: f64) -> Self {
        Self {
            transition: None,
            offset,
            frame1,
            frame2,
        }
    }

    /// Whether a transition window is active.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Split the state into its static or transitioning form.
    pub fn phase(&self) -> TimelinePhase<'a> {
        match self.transition {
            Some(name) => TimelinePhase::Transitioning {
                name,
                from: self.frame1,
                to: self.frame2,
                offset: self.offset,
            },
            None => TimelinePhase::Static {
                frame: self.frame1,
                progress: self.offset,
            },
        }
    }
}

impl SpriteTimeline {
    /// Validate the frames and compute the cached length.
    ///
    /// An empty frame list is accepted here; sampling it is an error.
    pub fn new(frames: Vec<SpriteFrame>, looping: bool) -> LanternResult<Self> {
        let mut timeline = Self {
            frames: Vec::new(),
            looping,
            length: 0.0,
        };
        timeline.set_frames(frames)?;
        Ok(timeline)
    }

    /// Frames in playback order.
    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the timeline has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether sampling wraps past the end.
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Change the looping flag.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Append a frame and recompute the cached length.
    pub fn push_frame(&mut self, frame: SpriteFrame) -> LanternResult<()> {
        frame.validate()?;
        self.frames.push(frame);
        self.compute_timeline_length();
        Ok(())
    }

    /// Replace every frame and recompute the cached length.
    pub fn set_frames(&mut self, frames: Vec<SpriteFrame>) -> LanternResult<()> {
        for frame in &frames {
            frame.validate()?;
        }
        self.frames = frames;
        self.compute_timeline_length();
        Ok(())
    }

    /// Validate every frame.
    pub fn validate(&self) -> LanternResult<()> {
        self.frames.iter().try_for_each(SpriteFrame::validate)
    }

    /// Cached total length in seconds.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Recompute and cache the total length.
    ///
    /// Sums every static duration plus, for each frame, the incoming-transition window of the
    /// frame after it (wrapping from the last frame to the first).
    pub fn compute_timeline_length(&mut self) -> f64 {
        let n = self.frames.len();
        let mut length = 0.0;
        for (i, frame) in self.frames.iter().enumerate() {
            length += frame.duration + self.frames[(i + 1) % n].transition_window();
        }
        self.length = length;
        length
    }

    /// Resolve the timeline at time `t` (seconds).
    ///
    /// Non-looping timelines clamp negative times to zero and report the terminal state
    /// `{ None, 1.0, last, last }` at or past the end. Looping timelines wrap with a
    /// euclidean remainder.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn state_for_time(&self, t: f64) -> LanternResult<TimelineState<'_>> {
        let n = self.frames.len();
        if n == 0 {
            return Err(LanternError::timeline("sprite timeline has no frames"));
        }
        if !t.is_finite() {
            return Err(LanternError::validation(format!("sample time must be finite, got {t}")));
        }
        if self.length <= 0.0 {
            return Ok(TimelineState::still(0, 0, 0.0));
        }

        let t = if self.looping {
            t.rem_euclid(self.length)
        } else if t >= self.length {
            return Ok(TimelineState::still(n - 1, n - 1, 1.0));
        } else {
            t.max(0.0)
        };

        let mut base = 0.0;
        for _ in 0..=MAX_DRIFT_PASSES {
            let mut acc = base;
            for (i, frame) in self.frames.iter().enumerate() {
                let next_index = (i + 1) % n;
                let next = &self.frames[next_index];

                let static_end = acc + frame.duration;
                if t < static_end {
                    let remaining = static_end - t;
                    return Ok(TimelineState::still(
                        i,
                        next_index,
                        1.0 - remaining / frame.duration,
                    ));
                }

                if let Some((name, window)) = next.incoming_transition()
                    && window > 0.0
                {
                    let window_end = static_end + window;
                    if t < window_end {
                        let remaining = window_end - t;
                        return Ok(TimelineState {
                            transition: Some(name),
                            offset: 1.0 - remaining / window,
                            frame1: i,
                            frame2: next_index,
                        });
                    }
                }

                acc = static_end + next.transition_window();
            }
            tracing::debug!(t, length = self.length, "timeline sums drifted, rescanning");
            base = acc;
        }

        Err(LanternError::timeline(format!(
            "time {t} did not resolve within {n} frames (length {})",
            self.length
        )))
    }

    /// Time at which frame `frame` begins its static segment.
    ///
    /// `frame == len()` yields the position reached after the last frame and its wrap window.
    pub fn time_for_frame(&self, frame: usize) -> LanternResult<f64> {
        let n = self.frames.len();
        if frame > n {
            return Err(LanternError::validation(format!(
                "frame index {frame} is out of range for {n} frames"
            )));
        }
        Ok(self.frames[..frame]
            .iter()
            .enumerate()
            .map(|(i, f)| f.duration + self.frames[(i + 1) % n].transition_window())
            .sum())
    }

    /// Start time a caller should use so that `frame` is reached at `now`.
    pub fn start_time_for_frame(&self, now: f64, frame: usize) -> LanternResult<f64> {
        Ok(now - self.time_for_frame(frame)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/timeline.rs"]
mod tests;
