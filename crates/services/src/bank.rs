use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use tracing::warn;

use circle8_core::model::{LessonKey, Question};

use crate::error::FetchError;
use crate::quiz::MIN_BANK_SIZE;

/// How a lesson's question bank was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankOutcome {
    /// Fresh copy of the per-lesson quiz resource.
    Fetched(Vec<Question>),
    /// Fetch failed or was unusable; the caller-supplied default is in use.
    Fallback(Vec<Question>),
    /// No remote bank and no default: the quiz cannot start yet.
    Empty,
}

impl BankOutcome {
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        match self {
            BankOutcome::Fetched(questions) | BankOutcome::Fallback(questions) => questions,
            BankOutcome::Empty => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct BankDocument {
    questions: Option<Vec<QuestionDto>>,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    q: String,
    c: Vec<String>,
    a: usize,
}

/// Decode a quiz JSON body into validated questions.
///
/// Malformed entries are dropped with a warning rather than poisoning the
/// whole bank.
///
/// # Errors
///
/// Returns `FetchError::Malformed` when the body is not a quiz document, or
/// `FetchError::TooFewQuestions` when fewer than `MIN_BANK_SIZE` entries
/// survive validation.
pub(crate) fn decode_bank(body: &str) -> Result<Vec<Question>, FetchError> {
    let doc: BankDocument = serde_json::from_str(body).map_err(|_| FetchError::Malformed)?;
    let entries = doc.questions.ok_or(FetchError::Malformed)?;

    let mut questions = Vec::with_capacity(entries.len());
    for (index, dto) in entries.into_iter().enumerate() {
        match Question::new(dto.q, dto.c, dto.a) {
            Ok(question) => questions.push(question),
            Err(err) => warn!(index, %err, "dropping malformed question"),
        }
    }

    if questions.len() < MIN_BANK_SIZE {
        return Err(FetchError::TooFewQuestions {
            valid: questions.len(),
        });
    }
    Ok(questions)
}

/// Resolves a per-lesson question bank from `{base}/data/{stem}-quiz.json`,
/// degrading to a caller-supplied default. Loading never errors past this
/// boundary.
#[derive(Clone)]
pub struct QuestionBankLoader {
    client: Client,
    base_url: String,
}

impl QuestionBankLoader {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve the bank for one lesson, best effort.
    ///
    /// `fallback` is the page-embedded default bank, if the page ships one.
    /// It is used as-is on fetch failure, even when smaller than a full
    /// bank; the quiz session re-checks the size before starting.
    pub async fn load(&self, lesson: &LessonKey, fallback: Option<Vec<Question>>) -> BankOutcome {
        match self.try_fetch(lesson).await {
            Ok(questions) => BankOutcome::Fetched(questions),
            Err(err) => {
                warn!(lesson = %lesson, %err, "question bank unavailable, using fallback");
                match fallback {
                    Some(questions) if !questions.is_empty() => BankOutcome::Fallback(questions),
                    _ => BankOutcome::Empty,
                }
            }
        }
    }

    async fn try_fetch(&self, lesson: &LessonKey) -> Result<Vec<Question>, FetchError> {
        let url = format!(
            "{}/data/{}",
            self.base_url.trim_end_matches('/'),
            lesson.bank_resource()
        );
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        decode_bank(&body)
    }
}
