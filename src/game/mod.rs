mod rules;
mod sampler;
mod session;
mod types;

pub use rules::{evaluate, remaining_attempts};
pub use sampler::{SeededSampler, TargetSampler, UniformSampler};
pub use session::{PendingGuess, RejectReason, Session, SessionView};
pub use types::{
    Attempt, GameStatus, Hint, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER, Number, SessionId, Target,
};
