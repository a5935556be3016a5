//! Core domain types for the guessing game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Maximum number of guesses in a single session.
pub const MAX_ATTEMPTS: usize = 10;

/// Smallest number the player may guess.
pub const MIN_NUMBER: u8 = 1;

/// Largest number the player may guess.
pub const MAX_NUMBER: u8 = 100;

/// A number inside the playable range `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Number(u8);

impl Number {
    /// Creates a number, returning `None` when outside `[1, 100]`.
    pub fn new(value: u8) -> Option<Self> {
        (MIN_NUMBER..=MAX_NUMBER)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Parses raw player input.
    ///
    /// Surrounding whitespace is ignored. Anything that is not an integer in
    /// range yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: i64 = raw.trim().parse().ok()?;
        u8::try_from(value).ok().and_then(Self::new)
    }

    /// Returns the raw value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The hidden number for a session.
///
/// Has no `Display` or `Serialize`. The value is read through
/// [`Target::reveal`], which the session only calls once the game has ended.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Target(Number);

impl Target {
    /// Wraps a number as a session target.
    pub fn new(number: Number) -> Self {
        Self(number)
    }

    /// Returns true if the guess hits the target.
    pub fn matches(&self, guess: Number) -> bool {
        self.0 == guess
    }

    /// Classifies a guess against this target.
    pub fn hint_for(&self, guess: Number) -> Hint {
        match guess.cmp(&self.0) {
            std::cmp::Ordering::Less => Hint::TooLow,
            std::cmp::Ordering::Greater => Hint::TooHigh,
            std::cmp::Ordering::Equal => Hint::Correct,
        }
    }

    /// Exposes the underlying number.
    pub fn reveal(&self) -> Number {
        self.0
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Target(<hidden>)")
    }
}

/// Relation between a guess and the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    /// Guess is below the target.
    #[strum(serialize = "too low")]
    TooLow,
    /// Guess is above the target.
    #[strum(serialize = "too high")]
    TooHigh,
    /// Guess equals the target.
    #[strum(serialize = "correct")]
    Correct,
}

/// A single recorded guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    value: Number,
    timestamp: DateTime<Utc>,
}

impl Attempt {
    /// Records a guess made now.
    pub fn now(value: Number) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
        }
    }

    /// The guessed number.
    pub fn value(&self) -> Number {
        self.value
    }

    /// When the guess was accepted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Guesses are being accepted.
    Playing,
    /// The target was found.
    Won,
    /// All attempts were used without finding the target.
    Lost,
}

impl GameStatus {
    /// Returns true for `Won` and `Lost`.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Identity of a session; increases with every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display)]
#[serde(transparent)]
#[display("#{_0}")]
pub struct SessionId(pub u64);
