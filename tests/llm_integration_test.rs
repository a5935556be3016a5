//! Integration tests against live LLM providers.
//!
//! Run with `cargo test --features api` and the provider keys exported.

use nebula_sage::{
    FeedbackProvider, FeedbackRequest, LlmClient, LlmConfig, LlmProvider, Number, OracleFeedback,
    Target, mentions_number, probe_credential,
};
use tracing::instrument;

fn client_for(provider: LlmProvider, model: &str) -> LlmClient {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(provider.api_key_var())
        .unwrap_or_else(|_| panic!("{} not set", provider.api_key_var()));
    LlmClient::new(LlmConfig::new(provider, api_key, model.to_string(), 256))
}

async fn assert_connectivity(client: LlmClient) {
    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_connectivity() {
    assert_connectivity(client_for(LlmProvider::Gemini, "gemini-3-flash-preview")).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    assert_connectivity(client_for(LlmProvider::OpenAI, "gpt-4o-mini")).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    assert_connectivity(client_for(LlmProvider::Anthropic, "claude-3-5-haiku-20241022")).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_oracle_keeps_secret() {
    let oracle = OracleFeedback::new(
        client_for(LlmProvider::Gemini, "gemini-3-flash-preview"),
        "English",
    );
    let guess = Number::new(20).unwrap();
    let target = Target::new(Number::new(73).unwrap());

    let message = oracle
        .generate_feedback(FeedbackRequest {
            guess,
            target,
            attempt_number: 1,
            hint: target.hint_for(guess),
        })
        .await
        .expect("Oracle failed");

    assert!(!message.is_empty());
    assert!(!mentions_number(&message, target.reveal()));
    eprintln!("Oracle: {}", message);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_bogus_key_is_rejected() {
    let http = reqwest::Client::new();
    assert!(!probe_credential(&http, LlmProvider::Gemini, "not-a-real-key").await);
}
