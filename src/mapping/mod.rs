//! Feature → musical parameter mapping.
//!
//! Every function here is pure: the same features and config always give the
//! same parameters. Randomness lives in the scheduler, which consumes
//! [`MusicalParameters::note_bias`] and [`Tempo`].
//!
//! | Feature      | Drives                                           |
//! |--------------|--------------------------------------------------|
//! | valence      | chord quality (major/minor) and root octave      |
//! | arousal      | base inter-note interval                         |
//! | dominance    | stepwise vs. random melodic motion               |
//! | subjectivity | note envelope (attack, decay, sustain, release)  |
//! | variation    | chord volume vs. melody volume balance           |

pub mod config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use config::{
    MappingConfig, Range, CHORD_VOL_MAX, CHORD_VOL_MIN, INTERVAL_MAX, INTERVAL_MIN, NOTES_VOL_MAX,
    NOTES_VOL_MIN, ROOT_C4, TEMPO_JITTER,
};

use crate::{error::Result, text::Features};

/// Extra seconds an enveloped note lives past its release time.
const NOTE_TAIL: f64 = 1.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
}

impl ChordQuality {
    /// Semitone offsets from the root.
    pub const fn intervals(self) -> [u8; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
        }
    }
}

/// A triad, as three frequencies in Hz, root first.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    quality: ChordQuality,
    tones: [f64; 3],
}

impl Chord {
    /// Major at or above zero valence, minor below. The root moves one octave
    /// per unit of valence: `root_hz * 2^valence`.
    pub fn from_valence(valence: f64, root_hz: f64) -> Self {
        let valence = valence.clamp(-1.0, 1.0);
        let quality = if valence >= 0.0 {
            ChordQuality::Major
        } else {
            ChordQuality::Minor
        };
        let root = root_hz * 2f64.powf(valence);
        let tones = quality
            .intervals()
            .map(|semitones| root * 2f64.powf(f64::from(semitones) / 12.0));
        Self { quality, tones }
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    pub fn tones(&self) -> &[f64] {
        &self.tones
    }

    pub fn root(&self) -> f64 {
        self.tones[0]
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// ADSR shape plus total note length, all in seconds (sustain is a level).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
    /// Gate-on plus release; the voice can be recycled after this
    pub duration: f64,
}

/// Melody timing: base interval and the jitter/clamp applied per trigger.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    /// Seconds between notes before jitter
    pub base: f64,
    pub bounds: Range,
    pub jitter_pct: f64,
}

/// Everything the scheduler needs for one analysis run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicalParameters {
    pub chord: Chord,
    pub chord_volume: f64,
    pub note_volume: f64,
    pub tempo: Tempo,
    pub envelope: EnvelopeShape,
    /// Probability of a stepwise move (normalized dominance)
    pub note_bias: f64,
}

/// Map `[-1, 1]` onto `[0, 1]`, clamping first.
pub fn normalize(value: f64) -> f64 {
    (value.clamp(-1.0, 1.0) + 1.0) / 2.0
}

/// `from` at `t = 0`, `to` at `t = 1`, exactly.
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterMapper {
    config: MappingConfig,
}

impl ParameterMapper {
    /// Mapper over `config`, rejected with [`Error::Config`] if any range
    /// is inverted or non-finite.
    ///
    /// [`Error::Config`]: crate::error::Error::Config
    pub fn new(config: MappingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn chord(&self, valence: f64) -> Chord {
        Chord::from_valence(valence, self.config.root_hz)
    }

    /// `(chord_volume, note_volume)`: variation fades the chord down and the
    /// melody up.
    pub fn volumes(&self, variation: f64) -> (f64, f64) {
        let t = variation.clamp(0.0, 1.0);
        let chord = lerp(self.config.chord_volume.max, self.config.chord_volume.min, t);
        let notes = lerp(self.config.note_volume.min, self.config.note_volume.max, t);
        (chord, notes)
    }

    /// Higher (normalized) arousal means a shorter interval.
    pub fn tempo(&self, arousal_norm: f64) -> Tempo {
        let t = arousal_norm.clamp(0.0, 1.0);
        Tempo {
            base: lerp(self.config.interval.max, self.config.interval.min, t),
            bounds: self.config.interval,
            jitter_pct: self.config.jitter_pct,
        }
    }

    pub fn envelope(&self, subjectivity: f64) -> EnvelopeShape {
        let t = subjectivity.clamp(0.0, 1.0);
        let c = &self.config;
        let release = lerp(c.release.min, c.release.max, t);
        EnvelopeShape {
            attack: lerp(c.attack.min, c.attack.max, t),
            decay: lerp(c.decay.min, c.decay.max, t),
            sustain: lerp(c.sustain.min, c.sustain.max, t),
            release,
            duration: release + NOTE_TAIL,
        }
    }

    pub fn note_bias(&self, dominance_norm: f64) -> f64 {
        dominance_norm.clamp(0.0, 1.0)
    }

    /// Clamp raw features into range and derive the full parameter set.
    pub fn map(&self, features: &Features) -> MusicalParameters {
        let (chord_volume, note_volume) = self.volumes(features.variation);
        let params = MusicalParameters {
            chord: self.chord(features.valence),
            chord_volume,
            note_volume,
            tempo: self.tempo(normalize(features.arousal)),
            envelope: self.envelope(features.subjectivity),
            note_bias: self.note_bias(normalize(features.dominance)),
        };
        tracing::debug!(?params, "mapped features");
        params
    }
}
