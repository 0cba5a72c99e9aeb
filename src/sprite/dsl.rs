use crate::foundation::core::Rect;
use crate::foundation::error::LanternResult;
use crate::sprite::frame::SpriteFrame;
use crate::sprite::timeline::SpriteTimeline;

/// Builder for [`SpriteTimeline`](crate::SpriteTimeline).
#[derive(Clone, Debug, Default)]
pub struct SpriteBuilder {
    frames: Vec<SpriteFrame>,
    looping: bool,
}

impl SpriteBuilder {
    /// Create an empty, non-looping builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the timeline wraps around.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Append a fully specified frame.
    pub fn frame(mut self, frame: SpriteFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Append a frame showing the whole `source` image.
    pub fn still(self, source: impl Into<String>, duration: f64) -> Self {
        self.frame(SpriteFrame::new(source, duration))
    }

    /// Append a frame showing `crop` of a sprite sheet.
    pub fn cell(self, source: impl Into<String>, crop: Rect, duration: f64) -> Self {
        self.frame(SpriteFrame::new(source, duration).with_crop(crop))
    }

    /// Append a frame entered through the named transition.
    pub fn transition_to(
        self,
        source: impl Into<String>,
        duration: f64,
        transition: impl Into<String>,
        transition_duration: f64,
    ) -> Self {
        let frame = SpriteFrame::new(source, duration);
        self.frame(frame.with_transition(transition, transition_duration))
    }

    /// Validate the frames and build the timeline.
    pub fn build(self) -> LanternResult<SpriteTimeline> {
        SpriteTimeline::new(self.frames, self.looping)
    }
}

/// Parse a timeline from its JSON document form.
///
/// ```json
/// { "looping": true, "frames": [{ "source": "a", "duration": 1.0 }] }
/// ```
pub fn timeline_from_json(json: &str) -> LanternResult<SpriteTimeline> {
    #[derive(serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Doc {
        #[serde(default)]
        looping: bool,
        frames: Vec<SpriteFrame>,
    }

    let doc: Doc = serde_json::from_str(json)?;
    SpriteTimeline::new(doc.frames, doc.looping)
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/dsl.rs"]
mod tests;
