//! End-to-end: text in, engine calls out.

use std::{fs, path::PathBuf};

use soundscape::{
    engine::{Motion, Scheduler, SchedulerStatus},
    mapping::{ChordQuality, EnvelopeShape, INTERVAL_MAX, INTERVAL_MIN},
    synth::{AudioEngine, Channel, MAX_VOICES},
    text::{Emotion, EmotionLexicon, SentimentLexicon, Vad},
    Error, FeatureExtractor, Lexicon, LexiconLoadError, MappingConfig, ParameterMapper, Result,
    Sonifier,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    Continuous { frequency: f64, amplitude: f64, channel: Channel },
    Enveloped { frequency: f64, amplitude: f64, channel: Channel },
    Stop(u32),
}

/// Records every engine call; voices are sequence numbers.
#[derive(Debug, Default)]
struct Recorder {
    next: u32,
    calls: Vec<Call>,
}

impl Recorder {
    fn live(&self) -> usize {
        let started = self
            .calls
            .iter()
            .filter(|c| !matches!(c, Call::Stop(_)))
            .count();
        started - self.stopped()
    }

    fn stopped(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Stop(_))).count()
    }

    fn enveloped(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter().filter(|c| matches!(c, Call::Enveloped { .. }))
    }
}

impl AudioEngine for Recorder {
    type Voice = u32;

    fn start_continuous_tone(
        &mut self,
        frequency: f64,
        amplitude: f64,
        channel: Channel,
    ) -> Result<u32> {
        self.next += 1;
        self.calls.push(Call::Continuous {
            frequency,
            amplitude,
            channel,
        });
        Ok(self.next)
    }

    fn start_enveloped_tone(
        &mut self,
        frequency: f64,
        _envelope: &EnvelopeShape,
        amplitude: f64,
        channel: Channel,
    ) -> Result<u32> {
        self.next += 1;
        self.calls.push(Call::Enveloped {
            frequency,
            amplitude,
            channel,
        });
        Ok(self.next)
    }

    fn stop(&mut self, voice: u32) {
        self.calls.push(Call::Stop(voice));
    }
}

fn lexicon() -> Lexicon {
    Lexicon::from_entries([
        ("ecstatic", Vad::new(0.9, 0.9, 0.8)),
        ("sad", Vad::new(-0.9, -0.5, -0.7)),
        ("calm", Vad::new(0.6, -1.0, 0.1)),
        ("furious", Vad::new(-0.8, 1.0, 1.0)),
        ("lost", Vad::new(-0.5, 0.0, -1.0)),
    ])
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("soundscape-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn contrasting_clauses_give_high_variation() {
    let extractor = FeatureExtractor::new(lexicon());
    let features = extractor.analyze("I'm ecstatic! I'm sad.");
    assert!((features.variation - 0.9).abs() < 1e-9);
    assert!(features.valence.abs() < 1e-9);

    let params = ParameterMapper::default().map(&features);
    // High variation tips the balance toward the melody.
    assert!((params.chord_volume - 0.049).abs() < 1e-9);
    assert!((params.note_volume - 2.8).abs() < 1e-9);
    assert_eq!(params.chord.quality(), ChordQuality::Major);
}

#[test]
fn start_sounds_the_chord_in_stereo() {
    let extractor = FeatureExtractor::new(lexicon());
    let params = ParameterMapper::default().map(&extractor.analyze("so sad"));
    assert_eq!(params.chord.quality(), ChordQuality::Minor);

    let mut scheduler = Scheduler::seeded(Recorder::default(), 1);
    scheduler.start(params).unwrap();

    let calls = &scheduler.engine().calls;
    assert_eq!(calls.len(), 6);
    for (pair, &tone) in calls.chunks(2).zip(params.chord.tones()) {
        assert!(matches!(
            pair[0],
            Call::Continuous { frequency, channel: Channel::Left, .. } if frequency == tone
        ));
        assert!(matches!(
            pair[1],
            Call::Continuous { frequency, channel: Channel::Right, .. } if frequency == tone
        ));
    }
    assert_eq!(scheduler.background_voices(), 3);
    assert_eq!(scheduler.status(), SchedulerStatus::Running);
}

#[test]
fn dominant_text_walks_the_chord_in_order() {
    let mapper = ParameterMapper::default();
    let params = mapper.map(&FeatureExtractor::new(lexicon()).analyze("furious"));
    assert_eq!(params.note_bias, 1.0);

    let mut scheduler = Scheduler::seeded(Recorder::default(), 2);
    scheduler.start(params).unwrap();
    let indices: Vec<usize> = (0..6)
        .map(|_| {
            let trigger = scheduler.tick().unwrap().unwrap();
            assert_eq!(trigger.motion, Motion::Step);
            trigger.note_index
        })
        .collect();
    assert_eq!(indices, vec![1, 2, 0, 1, 2, 0]);

    // Each note is a stereo pair at the melody volume.
    let notes: Vec<_> = scheduler.engine().enveloped().collect();
    assert_eq!(notes.len(), 12);
    assert!(notes.iter().all(
        |c| matches!(c, Call::Enveloped { amplitude, .. } if *amplitude == params.note_volume)
    ));
}

#[test]
fn submissive_text_never_steps() {
    let params = ParameterMapper::default().map(&FeatureExtractor::new(lexicon()).analyze("lost"));
    assert_eq!(params.note_bias, 0.0);

    let mut scheduler = Scheduler::seeded(Recorder::default(), 3);
    scheduler.start(params).unwrap();
    for _ in 0..100 {
        let trigger = scheduler.tick().unwrap().unwrap();
        assert_eq!(trigger.motion, Motion::Jump);
        assert!(trigger.note_index < 3);
        assert_eq!(scheduler.state().unwrap().note_index, 0);
    }
}

#[test]
fn melody_pool_stays_capped_over_a_long_run() {
    let params = ParameterMapper::default().map(&FeatureExtractor::new(lexicon()).analyze("calm"));
    let mut scheduler = Scheduler::seeded(Recorder::default(), 4);
    scheduler.start(params).unwrap();

    for _ in 0..(MAX_VOICES + 25) {
        scheduler.tick().unwrap();
        assert!(scheduler.melody_voices() <= MAX_VOICES);
    }
    assert_eq!(scheduler.melody_voices(), MAX_VOICES);
    assert_eq!(scheduler.engine().stopped(), 2 * 25);
    assert_eq!(scheduler.engine().live(), 2 * (MAX_VOICES + 3));
}

#[test]
fn intervals_stay_within_bounds() {
    let mapper = ParameterMapper::default();
    let extractor = FeatureExtractor::new(lexicon());

    for (text, seed) in [("calm", 5), ("furious", 6), ("nothing known", 7)] {
        let params = mapper.map(&extractor.analyze(text));
        let mut scheduler = Scheduler::seeded(Recorder::default(), seed);
        scheduler.start(params).unwrap();
        for _ in 0..200 {
            let trigger = scheduler.tick().unwrap().unwrap();
            let secs = trigger.next_interval.as_secs_f64();
            assert!((INTERVAL_MIN..=INTERVAL_MAX).contains(&secs), "{secs}");
            let spread = params.tempo.base * params.tempo.jitter_pct;
            assert!((secs - params.tempo.base).abs() <= spread + 1e-9);
        }
    }
}

#[test]
fn stop_halts_triggers_and_restart_replaces_everything() {
    let mapper = ParameterMapper::default();
    let extractor = FeatureExtractor::new(lexicon());
    let mut scheduler = Scheduler::seeded(Recorder::default(), 8);

    scheduler.start(mapper.map(&extractor.analyze("calm"))).unwrap();
    scheduler.tick().unwrap();
    scheduler.stop();
    assert!(scheduler.tick().unwrap().is_none());
    assert_eq!(scheduler.melody_voices(), 1);

    scheduler.start(mapper.map(&extractor.analyze("sad"))).unwrap();
    assert_eq!(scheduler.melody_voices(), 0);
    assert_eq!(scheduler.background_voices(), 3);
    assert_eq!(scheduler.engine().live(), 6);
}

#[test]
fn identical_seeds_replay_identically() {
    let features = FeatureExtractor::new(lexicon()).analyze("ecstatic but sad");
    let params = ParameterMapper::default().map(&features);
    let run = |seed| {
        let mut scheduler = Scheduler::seeded(Recorder::default(), seed);
        scheduler.start(params).unwrap();
        (0..20)
            .map(|_| scheduler.tick().unwrap().unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn host_entry_point_reports_and_plays() {
    let sentiment = SentimentLexicon::from_entries([("ecstatic", 0.9, 1.0), ("sad", -0.6, 0.5)]);
    let emotions = EmotionLexicon::from_entries([
        ("ecstatic", vec![Emotion::Joy, Emotion::Positive]),
        ("sad", vec![Emotion::Sadness]),
    ]);
    let extractor = FeatureExtractor::new(lexicon())
        .with_polarity(sentiment)
        .with_emotions(emotions);
    let mut sonifier = Sonifier::new(
        extractor,
        ParameterMapper::default(),
        Scheduler::seeded(Recorder::default(), 9),
    );

    let lines = sonifier.analyze_and_play("I'm ecstatic! I'm sad.").unwrap();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("Valence (-1 to 1) = 0.00, Chord frequencies = ["));
    assert!(lines[3].starts_with("Variation (0 to 1): 0.90"));
    assert!(lines[4].starts_with("Subjectivity (0 to 1): 0.75"));
    assert_eq!(lines[5], "Density (0 to 1): 0.75");
    assert!(sonifier.player().is_running());

    sonifier.stop();
    assert!(!sonifier.player().is_running());
    sonifier
        .player()
        .with_scheduler(|s| assert_eq!(s.engine().live(), 0));
}

#[test]
fn lexicon_files_load_from_disk() {
    let vad = temp_file(
        "vad.txt",
        "word\tvalence\tarousal\tdominance\nHappy\t0.9\t0.5\t0.4\n\ncalm\t0.5\t-0.6\t0.1\n",
    );
    let lexicon = Lexicon::load(&vad).unwrap();
    assert_eq!(lexicon.len(), 2);
    assert_eq!(lexicon.get("happy"), Some(Vad::new(0.9, 0.5, 0.4)));

    let nrc = temp_file("nrc.txt", "happy\tjoy\t1\nhappy\tanger\t0\ncalm\ttrust\t1\n");
    let emotions = EmotionLexicon::load(&nrc).unwrap();
    let extractor = FeatureExtractor::new(lexicon).with_emotions(emotions);
    assert!((extractor.analyze("happy and calm").density - 2.0 / 3.0).abs() < 1e-12);

    let missing = std::env::temp_dir().join("soundscape-does-not-exist.csv");
    assert!(matches!(Lexicon::load(&missing), Err(LexiconLoadError::Io { .. })));

    let bad = temp_file("bad.csv", "term,valence,arousal\nx,1,2\n");
    let err = Lexicon::load(&bad).unwrap_err();
    assert!(matches!(err, LexiconLoadError::MissingColumn { column: "dominance" }));

    for path in [vad, nrc, bad] {
        let _ = fs::remove_file(path);
    }
}

#[cfg(feature = "serde")]
#[test]
fn mapping_config_overrides_ranges() {
    let config = MappingConfig::from_toml_str(
        r#"
        root_hz = 440.0

        [interval]
        min = 1.0
        max = 2.0
        "#,
    )
    .unwrap();
    let mapper = ParameterMapper::new(config).unwrap();
    let params = mapper.map(&FeatureExtractor::new(lexicon()).analyze("nothing known"));
    assert!((params.chord.root() - 440.0).abs() < 1e-9);
    assert!((params.tempo.base - 1.5).abs() < 1e-9);

    let inverted = MappingConfig::from_toml_str("[interval]\nmin = 3.0\nmax = 1.0\n");
    assert!(matches!(inverted, Err(Error::Config(_))));
}
