//! Feedback providers: turn a guess into an Oracle message.

mod offline;
mod oracle;

pub use offline::OfflineOracle;
pub use oracle::{OracleFeedback, oracle_system_prompt, oracle_user_message};

use crate::game::{Hint, Number, PendingGuess, Target};
use crate::llm_client::LlmError;
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Shown when the Oracle cannot be reached or answers unusably.
pub const FALLBACK_MESSAGE: &str =
    "The nebula clouds over and the Sage falls silent. Your guess is recorded; try again, seeker.";

/// Greeting for every new session.
pub const WELCOME_MESSAGE: &str =
    "Welcome, seeker. Find the fated number between 1 and 100.";

/// Everything a provider may use to phrase its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackRequest {
    /// The guessed number.
    pub guess: Number,
    /// The session target. Must not appear in the reply unless the guess is correct.
    pub target: Target,
    /// 1-based attempt number.
    pub attempt_number: usize,
    /// Direction of the guess.
    pub hint: Hint,
}

impl From<&PendingGuess> for FeedbackRequest {
    fn from(pending: &PendingGuess) -> Self {
        Self {
            guess: pending.guess,
            target: pending.target,
            attempt_number: pending.attempt_number,
            hint: pending.hint,
        }
    }
}

/// Produces natural-language feedback for a guess.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Generates a short hint for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network, auth or quota failure, or when
    /// the reply is unusable.
    async fn generate_feedback(&self, request: FeedbackRequest) -> Result<String, ProviderError>;
}

/// Returns true if `text` contains `number` as a standalone integer.
pub fn mentions_number(text: &str, number: Number) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .any(|run| run.trim_start_matches('0') == number.value().to_string())
}

/// Feedback provider error.
#[derive(Debug, Clone, Display, Error)]
#[display("Provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Provider error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<LlmError> for ProviderError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        Self::new(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: u8) -> Number {
        Number::new(value).expect("in range")
    }

    #[test]
    fn mentions_number_matches_whole_integers_only() {
        assert!(mentions_number("It was 42, seeker.", number(42)));
        assert!(mentions_number("42", number(42)));
        assert!(!mentions_number("Beyond 142 stars", number(42)));
        assert!(!mentions_number("4 and 2", number(42)));
        assert!(mentions_number("the 007th gate", number(7)));
    }
}
