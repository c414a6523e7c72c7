use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identity of one lesson page: module number plus week number.
///
/// Derived from the page file naming convention `m{module}w{week}.html`.
/// The key renders the per-lesson storage key stems (`m2_w1_read`, ...) and
/// the question-bank resource name (`m2w1-quiz.json`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonKey {
    module: u32,
    week: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonKeyError {
    #[error("page name `{0}` does not match the m{{module}}w{{week}}.html convention")]
    InvalidPageName(String),
}

impl LessonKey {
    #[must_use]
    pub fn new(module: u32, week: u32) -> Self {
        Self { module, week }
    }

    /// Parse a lesson key from a page file name such as `m2w1.html`.
    ///
    /// Matching is case-insensitive, like the original page router.
    ///
    /// # Errors
    ///
    /// Returns `LessonKeyError::InvalidPageName` if the name does not match
    /// the convention.
    pub fn from_page_name(name: &str) -> Result<Self, LessonKeyError> {
        let lowered = name.to_ascii_lowercase();
        let stem = lowered
            .strip_suffix(".html")
            .ok_or_else(|| LessonKeyError::InvalidPageName(name.to_string()))?;
        stem.parse()
            .map_err(|_| LessonKeyError::InvalidPageName(name.to_string()))
    }

    #[must_use]
    pub fn module(&self) -> u32 {
        self.module
    }

    #[must_use]
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Short form used in resource names, e.g. `m2w1`.
    #[must_use]
    pub fn stem(&self) -> String {
        format!("m{}w{}", self.module, self.week)
    }

    /// Resource name of this lesson's question bank, e.g. `m2w1-quiz.json`.
    #[must_use]
    pub fn bank_resource(&self) -> String {
        format!("{}-quiz.json", self.stem())
    }

    /// Storage key for the read flag, e.g. `m2_w1_read`.
    #[must_use]
    pub fn read_key(&self) -> String {
        format!("m{}_w{}_read", self.module, self.week)
    }

    /// Storage key for the last quiz score, e.g. `m2_w1_last`.
    #[must_use]
    pub fn last_key(&self) -> String {
        format!("m{}_w{}_last", self.module, self.week)
    }

    /// Storage key for the best quiz score, e.g. `m2_w1_best`.
    #[must_use]
    pub fn best_key(&self) -> String {
        format!("m{}_w{}_best", self.module, self.week)
    }
}

impl fmt::Debug for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonKey(m{}w{})", self.module, self.week)
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stem())
    }
}

impl FromStr for LessonKey {
    type Err = LessonKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LessonKeyError::InvalidPageName(s.to_string());

        let rest = s.strip_prefix('m').ok_or_else(invalid)?;
        let w_pos = rest.find('w').ok_or_else(invalid)?;
        let (module_digits, week_part) = rest.split_at(w_pos);
        let week_digits = &week_part[1..];

        if module_digits.is_empty() || week_digits.is_empty() {
            return Err(invalid());
        }
        let module = module_digits.parse::<u32>().map_err(|_| invalid())?;
        let week = week_digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { module, week })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_name() {
        let key = LessonKey::from_page_name("m2w1.html").unwrap();
        assert_eq!(key, LessonKey::new(2, 1));
        assert_eq!(key.stem(), "m2w1");
    }

    #[test]
    fn parse_is_case_insensitive() {
        let key = LessonKey::from_page_name("M10W3.HTML").unwrap();
        assert_eq!(key, LessonKey::new(10, 3));
    }

    #[test]
    fn rejects_names_outside_convention() {
        for name in ["home.html", "m2w1", "mw1.html", "m2w.html", "m2x1.html", "m-1w2.html"] {
            assert!(
                LessonKey::from_page_name(name).is_err(),
                "expected rejection for {name}"
            );
        }
    }

    #[test]
    fn renders_storage_keys_and_resource() {
        let key = LessonKey::new(3, 4);
        assert_eq!(key.read_key(), "m3_w4_read");
        assert_eq!(key.last_key(), "m3_w4_last");
        assert_eq!(key.best_key(), "m3_w4_best");
        assert_eq!(key.bank_resource(), "m3w4-quiz.json");
    }

    #[test]
    fn stem_round_trips_through_from_str() {
        let key = LessonKey::new(12, 7);
        let parsed: LessonKey = key.stem().parse().unwrap();
        assert_eq!(parsed, key);
    }
}
