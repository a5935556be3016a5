//! Command-line interface for nebula_sage.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nebula Sage - guess the fated number, guided by an LLM oracle
#[derive(Parser, Debug)]
#[command(name = "nebula_sage")]
#[command(about = "Number-guessing game narrated by an LLM oracle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "nebula_sage.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Use the built-in offline Oracle instead of an LLM
        #[arg(long)]
        offline: bool,

        /// Seed for reproducible targets
        #[arg(long)]
        seed: Option<u64>,

        /// File that receives logs while the UI owns the terminal
        #[arg(long, default_value = "nebula_sage.log")]
        log_file: PathBuf,
    },

    /// Check that the configured API key is accepted
    Check,

    /// Ask the Oracle about a single guess
    Ask {
        /// The guess to report
        #[arg(long)]
        guess: u8,

        /// The hidden number
        #[arg(long)]
        target: u8,

        /// Attempt number to report
        #[arg(long, default_value = "1")]
        attempt: usize,

        /// Use the built-in offline Oracle instead of an LLM
        #[arg(long)]
        offline: bool,
    },
}
