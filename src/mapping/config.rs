//! Tunable ranges for the feature → music mapping.
//!
//! ```toml
//! root_hz = 261.63
//! jitter_pct = 0.1
//!
//! [interval]
//! min = 0.5
//! max = 4.0
//! ```
//!
//! Every key is optional; missing ones keep the defaults below.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ROOT_C4: f64 = 261.63;
pub const CHORD_VOL_MIN: f64 = 0.01;
pub const CHORD_VOL_MAX: f64 = 0.4;
pub const NOTES_VOL_MIN: f64 = 1.0;
pub const NOTES_VOL_MAX: f64 = 3.0;
/// Fastest melody interval (seconds), reached at full arousal
pub const INTERVAL_MIN: f64 = 0.5;
/// Slowest melody interval (seconds), reached at zero arousal
pub const INTERVAL_MAX: f64 = 4.0;
/// ±10% timing jitter around the base interval
pub const TEMPO_JITTER: f64 = 0.1;

/// Inclusive `[min, max]` pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingConfig {
    /// Chord root at valence 0 (Hz)
    pub root_hz: f64,
    pub chord_volume: Range,
    pub note_volume: Range,
    /// Melody inter-note interval bounds (seconds)
    pub interval: Range,
    /// Fraction of the base interval used as jitter amplitude
    pub jitter_pct: f64,
    pub attack: Range,
    pub decay: Range,
    pub sustain: Range,
    pub release: Range,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            root_hz: ROOT_C4,
            chord_volume: Range::new(CHORD_VOL_MIN, CHORD_VOL_MAX),
            note_volume: Range::new(NOTES_VOL_MIN, NOTES_VOL_MAX),
            interval: Range::new(INTERVAL_MIN, INTERVAL_MAX),
            jitter_pct: TEMPO_JITTER,
            attack: Range::new(0.005, 0.05),
            decay: Range::new(0.05, 0.5),
            sustain: Range::new(0.2, 0.8),
            release: Range::new(0.1, 1.0),
        }
    }
}

impl MappingConfig {
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "loaded mapping config");
        Ok(config)
    }

    /// Reject ranges the mapper cannot use.
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("chord_volume", self.chord_volume),
            ("note_volume", self.note_volume),
            ("interval", self.interval),
            ("attack", self.attack),
            ("decay", self.decay),
            ("sustain", self.sustain),
            ("release", self.release),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(Error::Config(format!(
                    "`{name}` must be finite with min <= max, got [{}, {}]",
                    range.min, range.max
                )));
            }
        }
        if self.interval.min <= 0.0 {
            return Err(Error::Config("`interval.min` must be positive".into()));
        }
        if !(self.root_hz.is_finite() && self.root_hz > 0.0) {
            return Err(Error::Config("`root_hz` must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.jitter_pct) {
            return Err(Error::Config("`jitter_pct` must be in [0, 1)".into()));
        }
        Ok(())
    }
}
