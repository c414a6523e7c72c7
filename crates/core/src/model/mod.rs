mod credentials;
mod lesson;
mod lock;
mod progress;
mod question;
mod session;

pub use credentials::CredentialRecord;
pub use lesson::{LessonKey, LessonKeyError};
pub use lock::{FailureOutcome, LockState, LOCK_MINUTES, MAX_ATTEMPTS};
pub use progress::{clamp_percent, LessonProgress, READ_BASELINE_PERCENT};
pub use question::{Question, QuestionError};
pub use session::{RememberedIdentity, Session};
