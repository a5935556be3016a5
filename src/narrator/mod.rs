//! Narration of Oracle messages.
//!
//! A [`Narrator`] is handed to the controller as a capability object with an
//! explicit lifecycle: [`Narrator::start`] once before play,
//! [`Narrator::speak`] per message, [`Narrator::dispose`] on shutdown.

mod speech;

pub use speech::{SpeechNarrator, pcm_to_samples};

use crate::config::SageConfig;
use crate::llm_client::LlmProvider;
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::sync::Arc;
use tracing::{info, instrument};

/// Speaks text aloud, best effort.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Prepares resources before the first message.
    async fn start(&self) -> Result<(), NarrationError> {
        Ok(())
    }

    /// Speaks `text`.
    ///
    /// # Errors
    ///
    /// Returns [`NarrationError`] when synthesis or playback fails. Callers
    /// treat this as non-fatal.
    async fn speak(&self, text: &str) -> Result<(), NarrationError>;

    /// Releases resources.
    async fn dispose(&self) {}
}

/// Narrator that stays quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    async fn speak(&self, _text: &str) -> Result<(), NarrationError> {
        Ok(())
    }
}

/// Picks the narrator described by `config`.
///
/// Speech needs a Gemini key: `GEMINI_API_KEY`, or the Oracle key when the
/// Oracle itself runs on Gemini. Without one, narration is silent.
#[instrument(skip(config, oracle_key))]
pub fn narrator_from_config(config: &SageConfig, oracle_key: Option<&str>) -> Arc<dyn Narrator> {
    let narration = config.narration();
    if !*narration.enabled() {
        info!("Narration disabled");
        return Arc::new(SilentNarrator);
    }

    let gemini_key = std::env::var(LlmProvider::Gemini.api_key_var())
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            (*config.llm_provider() == LlmProvider::Gemini)
                .then(|| oracle_key.map(str::to_string))
                .flatten()
        });

    match gemini_key {
        Some(key) => Arc::new(SpeechNarrator::new(key, narration)),
        None => {
            info!("No Gemini key available, narration disabled");
            Arc::new(SilentNarrator)
        }
    }
}

/// Narration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Narration error: {} at {}:{}", message, file, line)]
pub struct NarrationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl NarrationError {
    /// Creates a new narration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
