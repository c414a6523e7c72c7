//! Shared error types for the services crate.

use thiserror::Error;

/// Why a remote resource fetch could not produce usable data.
///
/// Never escapes a loader's public surface: every variant degrades to the
/// documented fallback. Kept as a real error type so the decode path stays
/// testable without a network.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("response body does not match the expected schema")]
    Malformed,
    #[error("only {valid} well-formed questions, 10 required")]
    TooFewQuestions { valid: usize },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("not enough questions to start a quiz: {available} available, 10 required")]
    InsufficientQuestions { available: usize },
    #[error("quiz has not been started")]
    NotStarted,
    #[error("question slot {slot} out of range")]
    SlotOutOfRange { slot: usize },
    #[error("choice {choice} out of range for question slot {slot}")]
    ChoiceOutOfRange { slot: usize, choice: usize },
}
