use rand::Rng;
use rand::seq::SliceRandom;

use circle8_core::model::Question;

use crate::error::QuizError;

/// Questions presented per attempt.
pub const QUIZ_SIZE: usize = 10;

/// Smallest bank a quiz can be started from.
pub const MIN_BANK_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    InProgress,
    Graded,
}

/// One question drawn into the current attempt, tagged with its position in
/// the full bank. The correct index stays private to the session; rendering
/// sees only the prompt and choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledQuestion {
    question: Question,
    original_index: usize,
}

impl SampledQuestion {
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.question.prompt()
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        self.question.choices()
    }

    /// Position of this question in the bank it was sampled from.
    #[must_use]
    pub fn original_index(&self) -> usize {
        self.original_index
    }
}

/// One quiz attempt: `Idle → InProgress → Graded`, with retry looping back
/// through `start`. Nothing here is persisted; navigating away discards the
/// attempt.
#[derive(Default)]
pub struct QuizSession {
    phase: QuizPhase,
    set: Vec<SampledQuestion>,
    answers: Vec<Option<usize>>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// The sampled questions of the current attempt, in sampled order.
    /// Empty while `Idle`.
    #[must_use]
    pub fn questions(&self) -> &[SampledQuestion] {
        &self.set
    }

    /// The choice currently selected for `slot`, if any.
    #[must_use]
    pub fn answer(&self, slot: usize) -> Option<usize> {
        self.answers.get(slot).copied().flatten()
    }

    /// Begin an attempt by sampling `QUIZ_SIZE` distinct questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientQuestions` when the bank is too small;
    /// the session state is left unchanged.
    pub fn start(&mut self, bank: &[Question]) -> Result<(), QuizError> {
        self.start_with_rng(bank, &mut rand::rng())
    }

    /// `start` with a caller-controlled RNG for deterministic sampling in
    /// tests.
    ///
    /// Uses a full shuffle-and-take rather than independent draws, so the
    /// sample is uniform and replacement-free by construction.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientQuestions` when the bank is too small.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bank: &[Question],
        rng: &mut R,
    ) -> Result<(), QuizError> {
        if bank.len() < MIN_BANK_SIZE {
            return Err(QuizError::InsufficientQuestions {
                available: bank.len(),
            });
        }

        let mut indices: Vec<usize> = (0..bank.len()).collect();
        indices.shuffle(rng);

        self.set = indices[..QUIZ_SIZE]
            .iter()
            .map(|&original_index| SampledQuestion {
                question: bank[original_index].clone(),
                original_index,
            })
            .collect();
        self.answers = vec![None; QUIZ_SIZE];
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Discard the current sample and start over with a fresh draw.
    /// Valid from any phase.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientQuestions` when the bank is too small.
    pub fn retry(&mut self, bank: &[Question]) -> Result<(), QuizError> {
        self.start(bank)
    }

    /// Record the selected choice for one question slot.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` unless the attempt is in progress, or
    /// an out-of-range error for a bad slot or choice.
    pub fn select(&mut self, slot: usize, choice: usize) -> Result<(), QuizError> {
        if self.phase != QuizPhase::InProgress {
            return Err(QuizError::NotStarted);
        }
        let Some(sampled) = self.set.get(slot) else {
            return Err(QuizError::SlotOutOfRange { slot });
        };
        if choice >= sampled.choices().len() {
            return Err(QuizError::ChoiceOutOfRange { slot, choice });
        }
        self.answers[slot] = Some(choice);
        Ok(())
    }

    /// Grade the current selections and return the percentage score.
    ///
    /// Pure over the selections: unanswered slots count as wrong, the
    /// denominator is always `QUIZ_SIZE`, and re-grading without changing
    /// selections reproduces the same score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` while `Idle`.
    pub fn grade(&mut self) -> Result<u8, QuizError> {
        if self.phase == QuizPhase::Idle {
            return Err(QuizError::NotStarted);
        }

        let correct = self
            .set
            .iter()
            .zip(&self.answers)
            .filter(|(sampled, answer)| {
                answer.is_some_and(|choice| sampled.question.is_correct(choice))
            })
            .count();

        self.phase = QuizPhase::Graded;
        Ok(score_percent(correct))
    }
}

fn score_percent(correct: usize) -> u8 {
    ((correct as f64 / QUIZ_SIZE as f64) * 100.0).round() as u8
}
