//! Win/loss rules.

use super::types::{GameStatus, MAX_ATTEMPTS, Number, Target};
use tracing::instrument;

/// Status after a guess, given how many attempts are now recorded.
///
/// A hit always wins, including on the final attempt. Only a miss that uses
/// up the last attempt loses.
#[instrument(skip(target))]
pub fn evaluate(guess: Number, target: &Target, attempts_recorded: usize) -> GameStatus {
    if target.matches(guess) {
        GameStatus::Won
    } else if attempts_recorded >= MAX_ATTEMPTS {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

/// Attempts left, floored at zero.
pub fn remaining_attempts(attempts_recorded: usize) -> usize {
    MAX_ATTEMPTS.saturating_sub(attempts_recorded)
}
