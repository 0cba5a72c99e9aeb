use crate::foundation::core::Rect;
use crate::foundation::error::{LanternError, LanternResult};

/// One still image of a sprite timeline.
///
/// The transition fields describe how the timeline enters *this* frame: when leaving frame
/// `i`, the transition declared on frame `i + 1` plays.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteFrame {
    /// Resource key of the source bitmap.
    pub source: String,
    /// Source rectangle in image pixels. `None` uses the whole image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Rect>,
    /// Static display time in seconds.
    pub duration: f64,
    /// Name of the incoming transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    /// Length of the incoming transition in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<f64>,
    /// Easing applied to the incoming transition's offset. Defaults to linear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    /// Opacity in `[0, 1]`. Defaults to fully opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl SpriteFrame {
    /// Frame showing the whole `source` image for `duration` seconds.
    pub fn new(source: impl Into<String>, duration: f64) -> Self {
        Self {
            source: source.into(),
            crop: None,
            duration,
            transition: None,
            transition_duration: None,
            easing: None,
            opacity: None,
        }
    }

    /// Restrict the frame to a source rectangle.
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Set the incoming transition.
    pub fn with_transition(mut self, name: impl Into<String>, duration: f64) -> Self {
        self.transition = Some(name.into());
        self.transition_duration = Some(duration);
        self
    }

    /// Set the easing of the incoming transition.
    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Set the frame opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Incoming transition name and duration, when both are declared.
    pub fn incoming_transition(&self) -> Option<(&str, f64)> {
        match (self.transition.as_deref(), self.transition_duration) {
            (Some(name), Some(duration)) => Some((name, duration)),
            _ => None,
        }
    }

    /// Time the incoming transition adds to the timeline (zero when undeclared).
    pub fn transition_window(&self) -> f64 {
        self.incoming_transition().map_or(0.0, |(_, d)| d)
    }

    /// Effective opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    /// Check durations, opacity, crop and source.
    pub fn validate(&self) -> LanternResult<()> {
        if self.source.trim().is_empty() {
            return Err(LanternError::validation("sprite frame source must be non-empty"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(LanternError::validation(format!(
                "frame '{}' duration must be finite and >= 0",
                self.source
            )));
        }
        if let Some(d) = self.transition_duration
            && (!d.is_finite() || d < 0.0)
        {
            return Err(LanternError::validation(format!(
                "frame '{}' transition_duration must be finite and >= 0",
                self.source
            )));
        }
        if let Some(o) = self.opacity
            && !(0.0..=1.0).contains(&o)
        {
            return Err(LanternError::validation(format!(
                "frame '{}' opacity must be within [0, 1]",
                self.source
            )));
        }
        if let Some(crop) = self.crop
            && (crop.x0 < 0.0 || crop.y0 < 0.0 || crop.width() <= 0.0 || crop.height() <= 0.0)
        {
            return Err(LanternError::validation(format!(
                "frame '{}' crop must be a non-empty rectangle at non-negative coordinates",
                self.source
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/frame.rs"]
mod tests;
