//! Game configuration loaded from TOML.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Top-level configuration for Nebula Sage.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct SageConfig {
    /// LLM provider backing the Oracle (gemini, openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-3-flash-preview", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for Oracle replies.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Language the Oracle answers in.
    #[serde(default = "default_language")]
    language: String,

    /// Speech narration settings.
    #[serde(default)]
    narration: NarrationConfig,
}

/// Settings for speaking Oracle messages aloud.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Whether narration runs at all.
    #[serde(default)]
    enabled: bool,

    /// Text-to-speech model.
    #[serde(default = "default_tts_model")]
    model: String,

    /// Prebuilt voice name.
    #[serde(default = "default_voice")]
    voice: String,

    /// Directory that receives synthesized WAV files.
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,

    /// Command used to play each WAV file; the file path is appended.
    #[serde(default)]
    player_command: Vec<String>,

    /// Linear gain applied to the synthesized samples.
    #[serde(default = "default_gain")]
    gain: f32,
}

#[instrument]
fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

#[instrument]
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

#[instrument]
fn default_max_tokens() -> u32 {
    256
}

#[instrument]
fn default_language() -> String {
    "English".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("narration")
}

fn default_gain() -> f32 {
    2.0
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_tts_model(),
            voice: default_voice(),
            output_dir: default_output_dir(),
            player_command: Vec::new(),
            gain: default_gain(),
        }
    }
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            language: default_language(),
            narration: NarrationConfig::default(),
        }
    }
}

impl SageConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(provider = %config.llm_provider, model = %config.llm_model, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reads the provider's API key from the environment, if set and non-empty.
    #[instrument(skip(self), fields(var = self.llm_provider.api_key_var()))]
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(self.llm_provider.api_key_var())
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Creates LLM configuration from the environment.
    /// Requires the provider's API key variable (e.g. GEMINI_API_KEY).
    #[instrument(skip(self), fields(provider = %self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let api_key = self.api_key_from_env().ok_or_else(|| {
            ConfigError::new(format!(
                "{} environment variable not set",
                self.llm_provider.api_key_var()
            ))
        })?;
        Ok(self.llm_config_with_key(api_key))
    }

    /// Creates LLM configuration with an explicitly supplied key.
    #[instrument(skip(self, api_key), fields(provider = %self.llm_provider))]
    pub fn llm_config_with_key(&self, api_key: String) -> LlmConfig {
        LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
