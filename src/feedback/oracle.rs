//! LLM-backed Oracle.

use super::{FeedbackProvider, FeedbackRequest, ProviderError, mentions_number};
use crate::game::{Hint, MAX_ATTEMPTS};
use crate::llm_client::LlmClient;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Builds the persona prompt for the Sage of the Nebula.
pub fn oracle_system_prompt(language: &str) -> String {
    format!(
        "You are the Sage of the Nebula, keeper of the secrets of the cosmos. \
         A seeker is trying to find a number between 1 and 100.\n\
         Rules:\n\
         - Answer in {language}, in a mysterious, archaic and solemn voice.\n\
         - If the guess is correct, praise the seeker lavishly.\n\
         - If the guess is wrong, give a philosophical hint about the direction, \
           but never state or imply the hidden number.\n\
         - Keep the answer to at most two short, vivid sentences."
    )
}

/// Builds the per-guess message. Carries only the direction, never the target.
pub fn oracle_user_message(request: &FeedbackRequest) -> String {
    let relation = match request.hint {
        Hint::Correct => "correct",
        Hint::TooHigh => "too high",
        Hint::TooLow => "too low",
    };
    format!(
        "Current guess: {}. Relation to the hidden number: {}. Attempt {} of {}.",
        request.guess, relation, request.attempt_number, MAX_ATTEMPTS
    )
}

/// Feedback from an LLM speaking as the Sage.
#[derive(Debug, Clone)]
pub struct OracleFeedback {
    client: LlmClient,
    system_prompt: String,
}

impl OracleFeedback {
    /// Creates an Oracle answering in `language`.
    #[instrument(skip(client))]
    pub fn new(client: LlmClient, language: &str) -> Self {
        info!("Creating LLM Oracle");
        Self {
            client,
            system_prompt: oracle_system_prompt(language),
        }
    }
}

#[async_trait]
impl FeedbackProvider for OracleFeedback {
    #[instrument(skip(self, request), fields(attempt = request.attempt_number, hint = %request.hint))]
    async fn generate_feedback(&self, request: FeedbackRequest) -> Result<String, ProviderError> {
        let user_message = oracle_user_message(&request);
        debug!("Asking the Oracle");
        let reply = self
            .client
            .generate(&self.system_prompt, &user_message)
            .await?;

        screen_reply(&reply, &user_message, &request)
    }
}

/// Trims `reply` and rejects it when empty or when it gives the target away.
///
/// A number the Oracle was told in `user_message` (attempt count, limit) is
/// not a leak even if it happens to equal the target; the model never saw
/// the target itself.
fn screen_reply(
    reply: &str,
    user_message: &str,
    request: &FeedbackRequest,
) -> Result<String, ProviderError> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ProviderError::new("Oracle returned an empty reply"));
    }

    let target = request.target.reveal();
    if request.hint != Hint::Correct
        && mentions_number(reply, target)
        && !mentions_number(user_message, target)
    {
        warn!("Oracle reply leaked the target");
        return Err(ProviderError::new("Oracle reply revealed the hidden number"));
    }

    Ok(reply.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Number, Target};

    fn request(guess: u8, target: u8, attempt_number: usize) -> FeedbackRequest {
        let guess = Number::new(guess).expect("in range");
        let target = Target::new(Number::new(target).expect("in range"));
        FeedbackRequest {
            guess,
            target,
            attempt_number,
            hint: target.hint_for(guess),
        }
    }

    #[test]
    fn echoed_attempt_limit_is_not_a_leak() {
        let req = request(55, 10, 4);
        let prompt = oracle_user_message(&req);
        let echo = "Attempt 4 of 10 spent, seeker; descend from such heights.";
        assert!(mentions_number(&prompt, Number::new(10).expect("in range")));
        assert_eq!(screen_reply(echo, &prompt, &req).expect("accepted"), echo);
    }

    #[test]
    fn echoed_attempt_number_is_not_a_leak() {
        let req = request(80, 3, 3);
        let prompt = oracle_user_message(&req);
        let echo = "Attempt 3 soars too high, seeker.";
        assert!(screen_reply(echo, &prompt, &req).is_ok());
    }

    #[test]
    fn unprompted_target_is_a_leak() {
        let req = request(55, 17, 2);
        let prompt = oracle_user_message(&req);
        assert!(screen_reply("Seek 17, seeker.", &prompt, &req).is_err());
    }

    #[test]
    fn correct_guess_may_name_target() {
        let req = request(17, 17, 2);
        let prompt = oracle_user_message(&req);
        assert!(screen_reply("17 it is! The nebula rejoices.", &prompt, &req).is_ok());
    }

    #[test]
    fn blank_reply_is_rejected() {
        let req = request(55, 17, 2);
        let prompt = oracle_user_message(&req);
        assert!(screen_reply("  \n", &prompt, &req).is_err());
    }
}
