//! Canned Oracle for play without an API key.

use super::{FeedbackProvider, FeedbackRequest, ProviderError};
use crate::game::Hint;
use async_trait::async_trait;
use tracing::instrument;

const TOO_LOW: [&str; 3] = [
    "The stars beneath {guess} are dim; lift your gaze higher, seeker.",
    "{guess} lies in the shallows of the nebula. The truth dwells above.",
    "Climb, seeker. {guess} is but a foothill of the fated number.",
];

const TOO_HIGH: [&str; 3] = [
    "{guess} soars past the truth like a comet; descend, seeker.",
    "Too bright is {guess}. The fated number glows more softly below.",
    "The heavens above {guess} are empty. Seek lower.",
];

const CORRECT: [&str; 2] = [
    "Truth unveils itself! {guess} was the fated number, found on attempt {attempt}.",
    "The nebula parts before you. {guess} it is, seeker; you have earned the Sage's praise.",
];

/// Deterministic Oracle that needs no network.
///
/// Lines rotate with the attempt number and only ever quote the guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

#[async_trait]
impl FeedbackProvider for OfflineOracle {
    #[instrument(skip(self, request), fields(attempt = request.attempt_number, hint = %request.hint))]
    async fn generate_feedback(&self, request: FeedbackRequest) -> Result<String, ProviderError> {
        let lines: &[&str] = match request.hint {
            Hint::TooLow => &TOO_LOW,
            Hint::TooHigh => &TOO_HIGH,
            Hint::Correct => &CORRECT,
        };
        let line = lines[request.attempt_number.saturating_sub(1) % lines.len()];
        Ok(line
            .replace("{guess}", &request.guess.to_string())
            .replace("{attempt}", &request.attempt_number.to_string()))
    }
}
