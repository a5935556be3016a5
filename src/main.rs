//! Nebula Sage - Unified CLI
//!
//! Terminal front end for the guessing game plus a few diagnostic commands.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use nebula_sage::{
    FeedbackProvider, FeedbackRequest, LlmClient, Number, OfflineOracle, Onboarding,
    OracleFeedback, ProviderKeyValidator, SageConfig, Target,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            offline,
            seed,
            log_file,
        } => {
            let config = SageConfig::load_or_default(&cli.config)?;
            tui::run_tui(tui::TuiOptions {
                config,
                offline,
                seed,
                log_file,
            })
            .await
        }
        Command::Check => {
            initialize_tracing();
            let config = SageConfig::load_or_default(&cli.config)?;
            run_check(&config).await
        }
        Command::Ask {
            guess,
            target,
            attempt,
            offline,
        } => {
            initialize_tracing();
            let config = SageConfig::load_or_default(&cli.config)?;
            run_ask(&config, guess, target, attempt, offline).await
        }
    }
}

/// Validate the configured API key
#[instrument(skip(config), fields(provider = %config.llm_provider()))]
async fn run_check(config: &SageConfig) -> Result<()> {
    let key = config.api_key_from_env().with_context(|| {
        format!(
            "{} is not set; export it or add it to .env",
            config.llm_provider().api_key_var()
        )
    })?;

    let mut onboarding = Onboarding::new(ProviderKeyValidator::new(*config.llm_provider()));
    match onboarding.verify(&key).await {
        Ok(_) => {
            println!("{} accepted the API key.", config.llm_provider());
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e.message),
    }
}

/// Ask the Oracle for one message
#[instrument(skip(config))]
async fn run_ask(
    config: &SageConfig,
    guess: u8,
    target: u8,
    attempt: usize,
    offline: bool,
) -> Result<()> {
    let guess = Number::new(guess).context("guess must be between 1 and 100")?;
    let target = Number::new(target)
        .map(Target::new)
        .context("target must be between 1 and 100")?;

    let provider: Box<dyn FeedbackProvider> = if offline {
        Box::new(OfflineOracle)
    } else {
        let client = LlmClient::new(config.create_llm_config()?);
        Box::new(OracleFeedback::new(client, config.language()))
    };

    info!("Consulting the Oracle");
    let request = FeedbackRequest {
        guess,
        target,
        attempt_number: attempt.max(1),
        hint: target.hint_for(guess),
    };
    let message = provider.generate_feedback(request).await?;
    println!("{}", message);
    Ok(())
}

#[instrument]
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nebula_sage=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Tracing initialized");
}
