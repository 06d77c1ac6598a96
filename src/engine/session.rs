use rand::{rngs::StdRng, Rng};

use crate::{
    engine::{player::Player, scheduler::Scheduler},
    error::Result,
    mapping::{MusicalParameters, ParameterMapper},
    synth::AudioEngine,
    text::{FeatureExtractor, Features},
};

/// The single call surface a UI needs: text in, log lines out, music playing.
pub struct Sonifier<E: AudioEngine, R = StdRng> {
    extractor: FeatureExtractor,
    mapper: ParameterMapper,
    player: Player<E, R>,
}

impl<E: AudioEngine, R> Sonifier<E, R> {
    pub fn new(
        extractor: FeatureExtractor,
        mapper: ParameterMapper,
        scheduler: Scheduler<E, R>,
    ) -> Self {
        Self {
            extractor,
            mapper,
            player: Player::new(scheduler),
        }
    }

    /// Features and parameters for `text`, without touching the audio side.
    pub fn analyze(&self, text: &str) -> (Features, MusicalParameters) {
        let features = self.extractor.analyze(text);
        let params = self.mapper.map(&features);
        (features, params)
    }

    /// Silence everything and stop the melody.
    pub fn stop(&mut self) {
        self.player.shutdown();
    }

    pub fn player(&self) -> &Player<E, R> {
        &self.player
    }
}

impl<E, R> Sonifier<E, R>
where
    E: AudioEngine + Send + 'static,
    E::Voice: Send + 'static,
    R: Rng + Send + 'static,
{
    /// Analyse `text`, replace the current chord and melody with ones derived
    /// from it, and describe what was chosen. Returns once playback has
    /// started; the melody runs until the next call or [`Sonifier::stop`].
    pub fn analyze_and_play(&mut self, text: &str) -> Result<Vec<String>> {
        let (features, params) = self.analyze(text);
        self.player.play(params)?;
        let lines = describe(&features, &params);
        for line in &lines {
            tracing::info!("{line}");
        }
        Ok(lines)
    }
}

/// Human-readable summary of one analysis run.
pub fn describe(features: &Features, params: &MusicalParameters) -> Vec<String> {
    let freqs = params
        .chord
        .tones()
        .iter()
        .map(|f| format!("{f:.0}"))
        .collect::<Vec<_>>()
        .join(", ");
    let env = &params.envelope;

    vec![
        format!(
            "Valence (-1 to 1) = {:.2}, Chord frequencies = [{freqs}]",
            features.valence.clamp(-1.0, 1.0)
        ),
        format!(
            "Arousal (-1 to 1): {:.2}, Tempo: {:.2}",
            features.arousal.clamp(-1.0, 1.0),
            params.tempo.base
        ),
        format!("Dominance (-1 to 1): {:.2}", features.dominance.clamp(-1.0, 1.0)),
        format!(
            "Variation (0 to 1): {:.2}, Background chord volume: {:.2}, Notes volume: {:.2}",
            features.variation.clamp(0.0, 1.0),
            params.chord_volume,
            params.note_volume
        ),
        format!(
            "Subjectivity (0 to 1): {:.2}, Attack = {:.3}, Decay = {:.3}, \
             Sustain = {:.2}, Release = {:.2}",
            features.subjectivity.clamp(0.0, 1.0),
            env.attack,
            env.decay,
            env.sustain,
            env.release
        ),
        format!("Density (0 to 1): {:.2}", features.density.clamp(0.0, 1.0)),
    ]
}
