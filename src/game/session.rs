//! Session state: target, attempt history, status and the pending-request guard.
//!
//! [`Session`] is synchronous and owns no I/O. The controller drives it in two
//! steps: [`Session::accept`] records a guess and hands back a
//! [`PendingGuess`], then [`Session::resolve`] applies the Oracle's message and
//! moves the status forward.

use super::rules::{evaluate, remaining_attempts};
use super::types::{Attempt, GameStatus, Hint, MAX_ATTEMPTS, Number, SessionId, Target};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Why a guess was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    /// Input was not an integer in `[1, 100]`.
    InvalidInput,
    /// The previous guess is still waiting on the Oracle.
    FeedbackPending,
    /// The session has already been won or lost.
    GameOver,
}

/// A guess that was recorded and now awaits feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingGuess {
    /// Session the guess belongs to.
    pub session_id: SessionId,
    /// The guessed number.
    pub guess: Number,
    /// Target of the session.
    pub target: Target,
    /// 1-based index of this attempt.
    pub attempt_number: usize,
    /// Direction of the guess relative to the target.
    pub hint: Hint,
}

/// Read-only snapshot for presentation.
///
/// `target` is `None` while the game is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Session identity.
    pub session_id: SessionId,
    /// Current status.
    pub status: GameStatus,
    /// Attempts left.
    pub remaining_attempts: usize,
    /// Latest Oracle message.
    pub message: String,
    /// Recorded guesses, oldest first.
    pub attempts: Vec<Attempt>,
    /// True while a feedback request is outstanding.
    pub pending: bool,
    /// The target, once the game is over.
    pub target: Option<Number>,
}

/// One round of the guessing game.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    target: Target,
    attempts: Vec<Attempt>,
    status: GameStatus,
    message: String,
    pending: bool,
}

impl Session {
    /// Starts a session in `Playing` with no attempts.
    #[instrument(skip(target, message))]
    pub fn new(id: SessionId, target: Target, message: impl Into<String>) -> Self {
        info!(session_id = %id, "Creating new session");
        Self {
            id,
            target,
            attempts: Vec::with_capacity(MAX_ATTEMPTS),
            status: GameStatus::Playing,
            message: message.into(),
            pending: false,
        }
    }

    /// Session identity.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Recorded guesses, oldest first.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Latest Oracle message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True while a feedback request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Attempts left.
    pub fn remaining_attempts(&self) -> usize {
        remaining_attempts(self.attempts.len())
    }

    /// The target, once the game is over.
    pub fn revealed_target(&self) -> Option<Number> {
        self.status.is_over().then(|| self.target.reveal())
    }

    /// Records a guess if the session can take one.
    ///
    /// Accepts only while `Playing` with no request outstanding. On success
    /// the attempt is already part of the history and the session is marked
    /// pending until [`Session::resolve`].
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn accept(&mut self, guess: Number) -> Result<PendingGuess, RejectReason> {
        if self.status.is_over() {
            debug!(status = %self.status, "Guess rejected: game over");
            return Err(RejectReason::GameOver);
        }
        if self.pending {
            debug!("Guess rejected: feedback pending");
            return Err(RejectReason::FeedbackPending);
        }
        if self.attempts.len() >= MAX_ATTEMPTS {
            // Status would already be Lost; the history never exceeds MAX_ATTEMPTS.
            warn!(attempts = self.attempts.len(), "Attempt limit reached while playing");
            return Err(RejectReason::GameOver);
        }

        self.attempts.push(Attempt::now(guess));
        self.pending = true;

        let pending = PendingGuess {
            session_id: self.id,
            guess,
            target: self.target,
            attempt_number: self.attempts.len(),
            hint: self.target.hint_for(guess),
        };
        info!(
            attempt = pending.attempt_number,
            remaining = self.remaining_attempts(),
            "Guess recorded"
        );
        Ok(pending)
    }

    /// Applies the message for a pending guess and advances the status.
    ///
    /// Returns the new status. A `pending` from another session leaves this
    /// one untouched.
    #[instrument(skip(self, pending, message), fields(session_id = %self.id))]
    pub fn resolve(&mut self, pending: &PendingGuess, message: String) -> GameStatus {
        if pending.session_id != self.id {
            warn!(stale_session = %pending.session_id, "Ignoring feedback for another session");
            return self.status;
        }

        self.message = message;
        self.pending = false;
        self.status = evaluate(pending.guess, &self.target, self.attempts.len());
        info!(status = %self.status, "Guess resolved");
        self.status
    }

    /// Snapshot for presentation.
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            status: self.status,
            remaining_attempts: self.remaining_attempts(),
            message: self.message.clone(),
            attempts: self.attempts.clone(),
            pending: self.pending,
            target: self.revealed_target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: u8) -> Number {
        Number::new(value).expect("in range")
    }

    fn session(target: u8) -> Session {
        Session::new(SessionId(1), Target::new(number(target)), "welcome")
    }

    #[test]
    fn accept_marks_pending_and_blocks_next_guess() {
        let mut session = session(42);
        let pending = session.accept(number(10)).expect("accepted");
        assert_eq!(pending.attempt_number, 1);
        assert_eq!(pending.hint, Hint::TooLow);
        assert!(session.is_pending());
        assert_eq!(session.accept(number(20)), Err(RejectReason::FeedbackPending));
        assert_eq!(session.attempts().len(), 1);
    }

    #[test]
    fn resolve_for_other_session_is_ignored() {
        let mut session = session(42);
        let mut pending = session.accept(number(42)).expect("accepted");
        pending.session_id = SessionId(99);
        assert_eq!(session.resolve(&pending, "late".into()), GameStatus::Playing);
        assert_eq!(session.message(), "welcome");
        assert!(session.is_pending());
    }

    #[test]
    fn target_hidden_until_game_over() {
        let mut session = session(42);
        assert_eq!(session.view().target, None);
        let pending = session.accept(number(42)).expect("accepted");
        session.resolve(&pending, "found".into());
        assert_eq!(session.view().target, Some(number(42)));
    }

    #[test]
    fn terminal_session_rejects_guesses() {
        let mut session = session(5);
        let pending = session.accept(number(5)).expect("accepted");
        session.resolve(&pending, "found".into());
        assert_eq!(session.accept(number(6)), Err(RejectReason::GameOver));
        assert_eq!(session.attempts().len(), 1);
    }
}
