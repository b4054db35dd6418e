//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Static sign-language recognizer over 21-point hand landmarks
#[derive(Parser, Debug)]
#[command(name = "sign_recognizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a recorded landmark stream, one JSON frame per line
    Classify {
        /// JSON-lines file; each line is an array of 21 {x, y, z} objects
        #[arg(short, long)]
        input: PathBuf,

        /// Write per-frame results as CSV (a directory gets a session subfolder)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print every frame outcome as JSON instead of only events
        #[arg(long)]
        json: bool,
    },

    /// Score the classifier against a labeled CSV corpus
    Evaluate {
        /// CSV with a header row: label,x0,y0,z0,...,x20,y20,z20
        #[arg(long)]
        corpus: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the labels the classifier can produce
    Vocabulary,

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
