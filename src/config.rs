//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object is a valid configuration. CLI flags are
//! layered on top of whatever a configuration file provides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{LanternError, LanternResult};

/// Resource manager options.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOpts {
    /// Locale used to pick localized resource variants (e.g. `"en-US"`).
    pub locale: Option<String>,
}

/// Fixed-step animator options for one-shot transitions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OneShotOpts {
    /// Offset added on every tick.
    pub step: f64,
    /// Time between ticks.
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,
}

impl Default for OneShotOpts {
    fn default() -> Self {
        Self {
            step: 0.05,
            interval: Duration::from_millis(20),
        }
    }
}

impl OneShotOpts {
    /// Reject steps that would never finish and zero intervals.
    pub fn validate(&self) -> LanternResult<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(LanternError::validation("one_shot.step must be finite and > 0"));
        }
        if self.interval.is_zero() {
            return Err(LanternError::validation("one_shot.interval_ms must be > 0"));
        }
        Ok(())
    }

    /// Number of ticks needed to go from 0 to 1.
    pub fn ticks_to_finish(&self) -> u64 {
        (1.0 / self.step).ceil() as u64
    }
}

/// Top-level runtime configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Loader options.
    pub loader: LoaderOpts,
    /// One-shot transition animator options.
    pub one_shot: OneShotOpts,
    /// Directory file-system origins are resolved against.
    pub asset_root: PathBuf,
    /// Straight RGBA8 color the output is cleared to before drawing, if any.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loader: LoaderOpts::default(),
            one_shot: OneShotOpts::default(),
            asset_root: PathBuf::from("."),
            clear_rgba: None,
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> LanternResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_path(path: impl AsRef<Path>) -> LanternResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Validate nested options.
    pub fn validate(&self) -> LanternResult<()> {
        self.one_shot.validate()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
