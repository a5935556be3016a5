//! Credential onboarding: the gate in front of the Oracle.

use crate::llm_client::{LlmProvider, probe_credential};
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{info, instrument, warn};

/// Decides whether an API key may be used.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Returns true if `key` is usable. Failures count as `false`.
    async fn validate_credential(&self, key: &str) -> bool;
}

/// Validates keys against a provider's model listing.
#[derive(Debug, Clone)]
pub struct ProviderKeyValidator {
    provider: LlmProvider,
    http: reqwest::Client,
}

impl ProviderKeyValidator {
    /// Creates a validator for `provider`.
    #[instrument]
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CredentialValidator for ProviderKeyValidator {
    #[instrument(skip(self, key), fields(provider = %self.provider))]
    async fn validate_credential(&self, key: &str) -> bool {
        probe_credential(&self.http, self.provider, key).await
    }
}

/// Runs the credential check that must pass before a game starts.
#[derive(Debug)]
pub struct Onboarding<V> {
    validator: V,
    failures: u32,
}

impl<V: CredentialValidator> Onboarding<V> {
    /// Creates an onboarding step around `validator`.
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            failures: 0,
        }
    }

    /// Number of rejected keys so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Checks `key` and returns it trimmed if accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError`] when the key is blank or rejected. The
    /// caller may ask for another key and try again.
    #[instrument(skip(self, key), fields(failures = self.failures))]
    pub async fn verify(&mut self, key: &str) -> Result<String, OnboardingError> {
        let key = key.trim();
        if key.is_empty() {
            self.failures += 1;
            return Err(OnboardingError::new("Enter an API key to consult the Oracle."));
        }

        if self.validator.validate_credential(key).await {
            info!("API key accepted");
            Ok(key.to_string())
        } else {
            self.failures += 1;
            warn!(failures = self.failures, "API key rejected");
            Err(OnboardingError::new(
                "The Oracle did not accept this API key. Check it and try again.",
            ))
        }
    }
}

/// Onboarding error. Always retryable with a different key.
#[derive(Debug, Clone, Display, Error)]
#[display("Onboarding error: {} at {}:{}", message, file, line)]
pub struct OnboardingError {
    /// User-facing message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl OnboardingError {
    /// Creates a new onboarding error.
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
