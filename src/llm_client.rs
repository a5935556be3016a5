//! LLM API client abstraction for Gemini, OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable that holds this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for LLM client.
#[derive(Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = %config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = %self.config.provider, model = %self.config.model))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Generating completion");
        let content = match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(system_prompt, user_message).await?,
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await?,
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await?,
        };
        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Gemini `generateContent`.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_gemini(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Gemini API request");
        let request_body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [
                { "role": "user", "parts": [{ "text": user_message }] }
            ],
            "generationConfig": { "maxOutputTokens": self.config.max_tokens }
        });

        let url = format!(
            "{}/models/{}:generateContent",
            GEMINI_BASE_URL, self.config.model
        );
        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", self.config.api_key.clone())
            .json(&request_body);
        let response_json = send_json(request, "Gemini").await?;

        gemini_text(&response_json).ok_or_else(|| {
            error!(response = %response_json, "No text content in Gemini response");
            LlmError::new("No text content in Gemini response".to_string())
        })
    }

    /// Generates a completion using OpenAI chat completions.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        );

        let request = self.openai_request(system_prompt, user_message)?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            LlmError::new(format!("OpenAI API error: {}", e))
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                LlmError::new("No content in OpenAI response".to_string())
            })
    }

    /// Builds the typed chat completion request for OpenAI.
    fn openai_request(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        LlmError::new(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Anthropic API request");
        let request_body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        let request = self
            .http
            .post(format!("{}/messages", ANTHROPIC_BASE_URL))
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body);
        let response_json = send_json(request, "Anthropic").await?;

        response_json["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })
    }
}

/// Checks whether `api_key` is accepted by `provider`.
///
/// Lists the provider's models, which costs no tokens. Any transport failure
/// or non-success status counts as rejected.
#[instrument(skip(http, api_key), fields(provider = %provider))]
pub async fn probe_credential(http: &reqwest::Client, provider: LlmProvider, api_key: &str) -> bool {
    let request = match provider {
        LlmProvider::Gemini => http
            .get(format!("{}/models", GEMINI_BASE_URL))
            .header("x-goog-api-key", api_key),
        LlmProvider::OpenAI => http
            .get(format!("{}/models", OPENAI_BASE_URL))
            .bearer_auth(api_key),
        LlmProvider::Anthropic => http
            .get(format!("{}/models", ANTHROPIC_BASE_URL))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION),
    };

    match request.send().await {
        Ok(response) if response.status().is_success() => {
            info!("Credential accepted");
            true
        }
        Ok(response) => {
            warn!(status = %response.status(), "Credential rejected");
            false
        }
        Err(e) => {
            warn!(error = %e, "Credential check failed");
            false
        }
    }
}

/// Sends a request and parses a JSON body, mapping every failure to [`LlmError`].
#[instrument(skip(request))]
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    vendor: &'static str,
) -> Result<Value, LlmError> {
    debug!("Sending request");
    let response = request.send().await.map_err(|e| {
        error!(error = ?e, "API request failed");
        LlmError::new(format!("{} API request failed: {}", vendor, e))
    })?;

    let status = response.status();
    let response_text = response.text().await.map_err(|e| {
        error!(error = ?e, "Failed to read response");
        LlmError::new(format!("Failed to read response: {}", e))
    })?;

    if !status.is_success() {
        error!(status = %status, response = %response_text, "API error");
        return Err(LlmError::new(format!(
            "{} API error {}: {}",
            vendor, status, response_text
        )));
    }

    debug!(response_length = response_text.len(), "Parsing response");
    serde_json::from_str(&response_text).map_err(|e| {
        error!(error = ?e, response = %response_text, "Failed to parse response");
        LlmError::new(format!("Failed to parse response: {}", e))
    })
}

/// Joins the non-thought text parts of the first Gemini candidate.
pub(crate) fn gemini_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter(|part| !part["thought"].as_bool().unwrap_or(false))
        .filter_map(|part| part["text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
