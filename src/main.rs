// src/main.rs
use anyhow::{bail, Context, Result};
use nalgebra::Vector3;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn, Level};

use sign_recognizer::cli::{Cli, Commands, ConfigAction};
use sign_recognizer::classifier::{Label, SignClassifier, MOTION_LETTERS};
use sign_recognizer::config::RecognizerConfig;
use sign_recognizer::corpus::{self, FrameLog};
use sign_recognizer::landmarks::Landmark;
use sign_recognizer::recognizer::SignRecognizer;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Classify { input, export, json } => {
            run_classify(&input, export.as_deref(), json, load_config(config_path)?)
        }
        Commands::Evaluate { corpus, json } => {
            run_evaluate(&corpus, json, &load_config(config_path)?)
        }
        Commands::Vocabulary => {
            run_vocabulary();
            Ok(())
        }
        Commands::Config { action } => run_config(action, config_path),
    }
}

fn load_config(path: Option<&Path>) -> Result<RecognizerConfig> {
    match path {
        Some(path) => RecognizerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(RecognizerConfig::load_default()?),
    }
}

fn run_classify(
    input: &Path,
    export: Option<&Path>,
    json: bool,
    config: RecognizerConfig,
) -> Result<()> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let mut recognizer = SignRecognizer::new(config)?;
    let mut log = FrameLog::new(None);
    let mut rejected = 0usize;

    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let landmarks: Vec<Landmark> = match serde_json::from_str(&line) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                warn!(line = i + 1, error = %e, "Skipping unparseable frame");
                rejected += 1;
                continue;
            }
        };
        let points: Vec<Vector3<f64>> = landmarks.into_iter().map(Into::into).collect();

        let outcome = match recognizer.process(&points) {
            Ok(outcome) => outcome,
            Err(e) if e.is_invalid_input() => {
                warn!(line = i + 1, error = %e, "Rejected frame");
                rejected += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else if let Some(event) = &outcome.event {
            println!("frame {}: {}", outcome.frame, event);
        }
        log.add(&outcome);
    }

    info!(
        frames = recognizer.frames_processed(),
        rejected,
        "Finished classifying {}",
        input.display()
    );

    if let Some(path) = export {
        if path.is_dir() {
            let written = log.export_to_dir(path)?;
            println!("Frame log written to {}", written.display());
        } else {
            log.export_csv(path)?;
            println!("Frame log written to {}", path.display());
        }
    }

    Ok(())
}

fn run_evaluate(corpus_path: &Path, json: bool, config: &RecognizerConfig) -> Result<()> {
    let samples = corpus::load_corpus(corpus_path)
        .with_context(|| format!("Failed to load corpus {}", corpus_path.display()))?;
    let classifier = SignClassifier::new(config)?;
    let report = corpus::evaluate(&classifier, &samples)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn run_vocabulary() {
    println!("Supported labels:");
    for label in Label::ALL.iter().filter(|l| !l.is_unknown()) {
        println!("  {}", label);
    }
    let motion: Vec<String> = MOTION_LETTERS.iter().map(|c| c.to_string()).collect();
    println!("Unsupported (require motion): {}", motion.join(", "));
}

fn run_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", load_config(path)?.to_json()?);
        }
        // Never reads the target, so a missing or corrupt file can be (re)created.
        ConfigAction::Init { force } => {
            let path = path
                .map(Path::to_path_buf)
                .unwrap_or_else(RecognizerConfig::default_path);
            if path.exists() && !force {
                bail!("{} already exists; use --force to overwrite", path.display());
            }
            RecognizerConfig::default().save(&path)?;
            println!("Default configuration written to {}", path.display());
        }
    }
    Ok(())
}
