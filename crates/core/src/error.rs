use thiserror::Error;

use crate::model::{LessonKeyError, QuestionError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    LessonKey(#[from] LessonKeyError),
}
