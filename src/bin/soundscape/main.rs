//! soundscape - type some text, hear its mood
//!
//! Run with: cargo run -- --lexicon NRC-VAD-Lexicon.txt

mod audio;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex, thread, time::Duration};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, prelude::*, EnvFilter};

use soundscape::{
    engine::Scheduler,
    synth::RingEngine,
    text::{EmotionLexicon, SentimentLexicon, VariationStrategy},
    FeatureExtractor, Lexicon, MappingConfig, ParameterMapper, Sonifier,
};

/// Room for a full melody pool of stops plus the chord and a note, twice over.
const CONTROL_RING_CAPACITY: usize = 1024;

#[derive(Parser, Debug)]
#[command(name = "soundscape", version, about = "Turn the emotion of text into music")]
struct Args {
    /// VAD lexicon (term, valence, arousal, dominance)
    #[arg(long, env = "SOUNDSCAPE_LEXICON")]
    lexicon: PathBuf,

    /// Sentiment lexicon (term, polarity, subjectivity)
    #[arg(long)]
    sentiment: Option<PathBuf>,

    /// NRC word-emotion association lexicon
    #[arg(long)]
    emotions: Option<PathBuf>,

    /// TOML file overriding the mapping ranges
    #[arg(long, env = "SOUNDSCAPE_CONFIG")]
    config: Option<PathBuf>,

    /// How sentiment shift between clauses is measured
    #[arg(long, value_enum, default_value_t = Variation::Lexicon)]
    variation: Variation,

    /// Seed for the melody's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Analyse this text once and play it without the terminal UI
    #[arg(long)]
    text: Option<String>,

    /// Seconds to play in headless mode
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Write logs here while the terminal UI is up
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variation {
    Lexicon,
    Polarity,
}

impl From<Variation> for VariationStrategy {
    fn from(variation: Variation) -> Self {
        match variation {
            Variation::Lexicon => VariationStrategy::LexiconValence,
            Variation::Polarity => VariationStrategy::ClausePolarity,
        }
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args)?;

    let config = match &args.config {
        Some(path) => MappingConfig::load(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => MappingConfig::default(),
    };
    let mapper = ParameterMapper::new(config)?;
    let extractor = build_extractor(&args)?;

    let (engine, rx) = RingEngine::new(CONTROL_RING_CAPACITY);
    let scheduler = match args.seed {
        Some(seed) => Scheduler::seeded(engine, seed),
        None => Scheduler::new(engine),
    };
    let mut sonifier = Sonifier::new(extractor, mapper, scheduler);

    // Dropping the stream closes the device.
    let _stream = audio::open_output(rx)?;

    match args.text {
        Some(text) => {
            for line in sonifier.analyze_and_play(&text)? {
                println!("{line}");
            }
            thread::sleep(play_duration(args.seconds)?);
            silence(&mut sonifier);
            Ok(())
        }
        None => {
            let mut terminal = ratatui::init();
            let result = ui::App::new(&mut sonifier).run(&mut terminal);
            ratatui::restore();
            silence(&mut sonifier);
            result
        }
    }
}

/// `--seconds` as a duration; negative, NaN or overflowing values are errors.
fn play_duration(seconds: f64) -> EyreResult<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|e| eyre!("invalid --seconds {seconds}: {e}"))
}

/// Stop the melody, release every voice, then clear the renderer outright in
/// case a stop request was dropped on a full control ring.
fn silence(sonifier: &mut Sonifier<RingEngine>) {
    sonifier.stop();
    let cleared = sonifier
        .player()
        .with_scheduler(|scheduler| scheduler.engine_mut().all_tones_off());
    if let Err(err) = cleared {
        tracing::warn!(%err, "could not clear the renderer");
    }
}

fn build_extractor(args: &Args) -> EyreResult<FeatureExtractor> {
    let lexicon = Lexicon::load(&args.lexicon)
        .wrap_err_with(|| format!("failed to load lexicon {}", args.lexicon.display()))?;
    let mut extractor = FeatureExtractor::new(lexicon).with_variation(args.variation.into());

    if let Some(path) = &args.sentiment {
        let sentiment = SentimentLexicon::load(path)
            .wrap_err_with(|| format!("failed to load sentiment lexicon {}", path.display()))?;
        extractor = extractor.with_polarity(sentiment);
    }
    if let Some(path) = &args.emotions {
        let emotions = EmotionLexicon::load(path)
            .wrap_err_with(|| format!("failed to load emotion lexicon {}", path.display()))?;
        extractor = extractor.with_emotions(emotions);
    }
    tracing::info!(variation = ?extractor.variation_strategy(), "feature extractor ready");
    Ok(extractor)
}

/// Headless runs log to stderr. The terminal UI owns the screen, so logs go
/// to `--log-file` or nowhere.
fn init_tracing(args: &Args) -> EyreResult<()> {
    let (writer, ansi) = match (&args.text, &args.log_file) {
        (Some(_), _) => (BoxMakeWriter::new(std::io::stderr), true),
        (None, Some(path)) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, None) => (BoxMakeWriter::new(std::io::sink), false),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "soundscape=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(ansi))
        .init();
    Ok(())
}
