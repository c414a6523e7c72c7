use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question needs at least 2 choices, got {len}")]
    TooFewChoices { len: usize },

    #[error("correct index {index} out of range for {len} choices")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// One multiple-choice question from a lesson's bank.
///
/// Immutable once constructed; the bank it belongs to is loaded fresh per
/// page and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Validate and construct a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two choices
    /// are supplied, or `correct_index` does not address a choice.
    pub fn new(
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices { len: choices.len() });
        }
        if correct_index >= choices.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: choices.len(),
            });
        }
        Ok(Self {
            prompt,
            choices,
            correct_index,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// True when `choice` selects the correct answer.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}
