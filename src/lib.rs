//! Nebula Sage library - a number-guessing game narrated by an LLM oracle
//!
//! The player has ten attempts to find a hidden number in `[1, 100]`. After
//! every guess the Oracle (an LLM speaking as the Sage of the Nebula) answers
//! with a hint, and a narrator may speak the answer aloud.
//!
//! # Architecture
//!
//! - **Game**: session state, win/loss rules and target sampling
//! - **Controller**: validates guesses and coordinates the Oracle and narrator
//! - **Feedback**: Oracle implementations (LLM-backed and offline)
//! - **Narrator**: speech synthesis capability with `start`/`dispose` lifecycle
//! - **Onboarding**: API key validation before play
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nebula_sage::{OfflineOracle, SessionController, SilentNarrator, UniformSampler};
//!
//! # async fn example() {
//! let controller = SessionController::new(
//!     Arc::new(OfflineOracle),
//!     Arc::new(SilentNarrator),
//!     Arc::new(UniformSampler),
//! );
//! let outcome = controller.submit_guess("50").await;
//! println!("{:?}", outcome);
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod controller;
mod feedback;
mod game;
mod llm_client;
mod narrator;
mod onboarding;

// Crate-level exports - Configuration
pub use config::{ConfigError, NarrationConfig, SageConfig};

// Crate-level exports - Controller
pub use controller::{GuessOutcome, SessionController, SessionEvent};

// Crate-level exports - Feedback providers
pub use feedback::{
    FALLBACK_MESSAGE, FeedbackProvider, FeedbackRequest, OfflineOracle, OracleFeedback,
    ProviderError, WELCOME_MESSAGE, mentions_number, oracle_system_prompt, oracle_user_message,
};

// Crate-level exports - Game types
pub use game::{
    Attempt, GameStatus, Hint, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER, Number, PendingGuess,
    RejectReason, SeededSampler, Session, SessionId, SessionView, Target, TargetSampler,
    UniformSampler, evaluate, remaining_attempts,
};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider, probe_credential};

// Crate-level exports - Narration
pub use narrator::{
    NarrationError, Narrator, SilentNarrator, SpeechNarrator, narrator_from_config,
    pcm_to_samples,
};

// Crate-level exports - Onboarding
pub use onboarding::{CredentialValidator, Onboarding, OnboardingError, ProviderKeyValidator};
