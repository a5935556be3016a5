//! Game session controller.
//!
//! Owns the current [`Session`], validates guesses, consults the
//! [`FeedbackProvider`] and hands successful messages to the [`Narrator`].
//! The controller is cheap to clone; clones share the same session, so a
//! presentation loop can keep rendering [`SessionController::view`] while a
//! spawned task awaits [`SessionController::submit_guess`].

use crate::feedback::{FALLBACK_MESSAGE, FeedbackProvider, FeedbackRequest, WELCOME_MESSAGE};
use crate::game::{
    GameStatus, Hint, Number, RejectReason, Session, SessionId, SessionView, TargetSampler,
};
use crate::narrator::Narrator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Notifications for presentation, e.g. to play sound cues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A guess was accepted and recorded.
    GuessRecorded {
        /// Session the guess belongs to.
        session_id: SessionId,
        /// The guessed number.
        guess: Number,
        /// 1-based attempt number.
        attempt_number: usize,
    },
    /// The Oracle's message for a guess is in.
    FeedbackReady {
        /// Session the feedback belongs to.
        session_id: SessionId,
        /// Direction of the guess.
        hint: Hint,
        /// True when the fallback message was used.
        fallback: bool,
    },
    /// The session reached a terminal status.
    StatusChanged {
        /// Session that changed.
        session_id: SessionId,
        /// New status.
        status: GameStatus,
    },
    /// A fresh session replaced the previous one.
    SessionReset {
        /// The new session.
        session_id: SessionId,
    },
    /// Feedback arrived for a session that has since been reset.
    StaleFeedbackDropped {
        /// The session the feedback was meant for.
        session_id: SessionId,
    },
}

/// Result of [`SessionController::submit_guess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess was ignored; nothing changed.
    Rejected(RejectReason),
    /// The guess was recorded and its feedback applied.
    Resolved(SessionView),
    /// The guess was recorded, but the session was reset before feedback arrived.
    Stale {
        /// The session the guess was made in.
        session_id: SessionId,
    },
}

#[derive(Debug)]
struct ControllerState {
    session: Session,
    next_id: u64,
}

/// Drives guessing sessions.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<ControllerState>>,
    feedback: Arc<dyn FeedbackProvider>,
    narrator: Arc<dyn Narrator>,
    sampler: Arc<dyn TargetSampler>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionController {
    /// Creates a controller with a fresh session.
    #[instrument(skip_all)]
    pub fn new(
        feedback: Arc<dyn FeedbackProvider>,
        narrator: Arc<dyn Narrator>,
        sampler: Arc<dyn TargetSampler>,
    ) -> Self {
        info!("Creating session controller");
        let session = Session::new(SessionId(1), sampler.sample(), WELCOME_MESSAGE);
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                session,
                next_id: 2,
            })),
            feedback,
            narrator,
            sampler,
            events: None,
        }
    }

    /// Sends [`SessionEvent`]s to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Starts the narrator. A narrator that fails to start is logged and
    /// play continues without it.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        if let Err(e) = self.narrator.start().await {
            warn!(error = %e, "Narrator failed to start");
        }
    }

    /// Releases the narrator.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.narrator.dispose().await;
        info!("Session controller shut down");
    }

    /// Snapshot of the current session.
    pub fn view(&self) -> SessionView {
        self.lock().session.view()
    }

    /// Replaces the session with a fresh one.
    ///
    /// Feedback still in flight for the old session is dropped when it lands.
    #[instrument(skip(self))]
    pub fn reset(&self) -> SessionView {
        let view = {
            let mut state = self.lock();
            let id = SessionId(state.next_id);
            state.next_id += 1;
            state.session = Session::new(id, self.sampler.sample(), WELCOME_MESSAGE);
            state.session.view()
        };
        info!(session_id = %view.session_id, "Session reset");
        self.emit(SessionEvent::SessionReset {
            session_id: view.session_id,
        });
        view
    }

    /// Submits raw player input.
    ///
    /// Invalid input, a terminal session, or an outstanding request leaves
    /// everything untouched and returns [`GuessOutcome::Rejected`]. Otherwise
    /// the attempt is recorded before the provider is consulted, so it counts
    /// even when the provider fails.
    #[instrument(skip(self, raw), fields(raw_len = raw.len()))]
    pub async fn submit_guess(&self, raw: &str) -> GuessOutcome {
        let Some(guess) = Number::parse(raw) else {
            debug!("Ignoring input that is not a number in range");
            return GuessOutcome::Rejected(RejectReason::InvalidInput);
        };

        let pending = match self.lock().session.accept(guess) {
            Ok(pending) => pending,
            Err(reason) => return GuessOutcome::Rejected(reason),
        };
        self.emit(SessionEvent::GuessRecorded {
            session_id: pending.session_id,
            guess,
            attempt_number: pending.attempt_number,
        });

        let reply = self
            .feedback
            .generate_feedback(FeedbackRequest::from(&pending))
            .await;
        let (message, narrate) = match reply {
            Ok(text) if !text.trim().is_empty() => (text.clone(), Some(text)),
            Ok(_) => {
                warn!("Feedback provider returned an empty message");
                (FALLBACK_MESSAGE.to_string(), None)
            }
            Err(e) => {
                warn!(error = %e, "Feedback provider failed, using fallback");
                (FALLBACK_MESSAGE.to_string(), None)
            }
        };

        let view = {
            let mut state = self.lock();
            if state.session.id() != pending.session_id {
                None
            } else {
                state.session.resolve(&pending, message);
                Some(state.session.view())
            }
        };

        let Some(view) = view else {
            info!(stale_session = %pending.session_id, "Dropping feedback for a reset session");
            self.emit(SessionEvent::StaleFeedbackDropped {
                session_id: pending.session_id,
            });
            return GuessOutcome::Stale {
                session_id: pending.session_id,
            };
        };

        self.emit(SessionEvent::FeedbackReady {
            session_id: view.session_id,
            hint: pending.hint,
            fallback: narrate.is_none(),
        });
        if view.status.is_over() {
            self.emit(SessionEvent::StatusChanged {
                session_id: view.session_id,
                status: view.status,
            });
        }
        if let Some(text) = narrate {
            self.narrate(text);
        }

        GuessOutcome::Resolved(view)
    }

    /// Speaks `text` on a detached task; failures are logged and dropped.
    fn narrate(&self, text: String) {
        let narrator = Arc::clone(&self.narrator);
        tokio::spawn(async move {
            if let Err(e) = narrator.speak(&text).await {
                warn!(error = %e, "Narration failed");
            }
        });
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            debug!("Event receiver dropped");
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}
