//! Tests for TOML configuration loading.

use nebula_sage::{LlmProvider, SageConfig};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_defaults_when_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = SageConfig::load_or_default(dir.path().join("absent.toml")).unwrap();

    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.llm_model(), "gemini-3-flash-preview");
    assert_eq!(*config.llm_max_tokens(), 256);
    assert_eq!(config.language(), "English");
    assert!(!*config.narration().enabled());
    assert_eq!(config.narration().voice(), "Kore");
    assert_eq!(*config.narration().gain(), 2.0);
    assert_eq!(config.narration().output_dir(), &PathBuf::from("narration"));
    assert!(config.narration().player_command().is_empty());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
llm_provider = "openai"
llm_model = "gpt-4o-mini"
llm_max_tokens = 120
language = "Italian"

[narration]
enabled = true
voice = "Puck"
player_command = ["aplay", "-q"]
"#
    )
    .unwrap();

    let config = SageConfig::load_or_default(file.path()).unwrap();

    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(config.llm_model(), "gpt-4o-mini");
    assert_eq!(*config.llm_max_tokens(), 120);
    assert_eq!(config.language(), "Italian");
    assert!(*config.narration().enabled());
    assert_eq!(config.narration().voice(), "Puck");
    assert_eq!(config.narration().player_command(), &["aplay", "-q"]);
    // Unset narration fields keep their defaults.
    assert_eq!(config.narration().model(), "gemini-2.5-flash-preview-tts");
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = SageConfig::from_toml(r#"language = "French""#).unwrap();
    assert_eq!(config.language(), "French");
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(*config.llm_max_tokens(), 256);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let err = SageConfig::from_toml("llm_max_tokens = \"lots\"").unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_unknown_provider_is_an_error() {
    assert!(SageConfig::from_toml(r#"llm_provider = "oracle-of-delphi""#).is_err());
}

#[test]
fn test_llm_config_with_key_uses_settings() {
    let config = SageConfig::from_toml(
        r#"
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
llm_max_tokens = 64
"#,
    )
    .unwrap();

    let llm = config.llm_config_with_key("sk-test".to_string());
    assert_eq!(llm.provider(), LlmProvider::Anthropic);
    assert_eq!(llm.model(), "claude-3-5-haiku-20241022");
    assert_eq!(llm.max_tokens(), 64);
    assert!(!format!("{:?}", llm).contains("sk-test"));
}

#[test]
fn test_provider_key_variables() {
    assert_eq!(LlmProvider::Gemini.api_key_var(), "GEMINI_API_KEY");
    assert_eq!(LlmProvider::OpenAI.api_key_var(), "OPENAI_API_KEY");
    assert_eq!(LlmProvider::Anthropic.api_key_var(), "ANTHROPIC_API_KEY");
}
