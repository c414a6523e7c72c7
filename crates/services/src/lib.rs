#![forbid(unsafe_code)]

pub mod bank;
pub mod credentials;
pub mod error;
pub mod login;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod throttle;

pub use circle8_core::Clock;

pub use bank::{BankOutcome, QuestionBankLoader};
pub use credentials::{embedded_directory, sha256_hex, verify, CredentialDirectory, DirectoryOutcome};
pub use error::{FetchError, QuizError};
pub use login::{LoginFlow, LoginOutcome};
pub use progress::{ProgressDisplay, ProgressTracker};
pub use quiz::{QuizPhase, QuizSession, SampledQuestion, MIN_BANK_SIZE, QUIZ_SIZE};
pub use session::SessionIssuer;
pub use throttle::{AttemptThrottle, Gate};
