/// Progress floor granted by marking a lesson read without taking the quiz.
pub const READ_BASELINE_PERCENT: u8 = 50;

/// Clamp an arbitrary stored value into a valid percentage.
///
/// Corrupted or out-of-range persisted values become 0/100 instead of
/// propagating garbage into the UI.
#[must_use]
pub fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Per-lesson progress: read flag plus last/best quiz scores.
///
/// `best` is monotonic: it never decreases, whatever sequence of scores is
/// recorded after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonProgress {
    read: bool,
    last_percent: u8,
    best_percent: u8,
}

impl LessonProgress {
    /// Rehydrate from persisted scalars, clamping out-of-range scores.
    #[must_use]
    pub fn from_persisted(read: bool, last_percent: i64, best_percent: i64) -> Self {
        Self {
            read,
            last_percent: clamp_percent(last_percent),
            best_percent: clamp_percent(best_percent),
        }
    }

    #[must_use]
    pub fn read(&self) -> bool {
        self.read
    }

    #[must_use]
    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }

    #[must_use]
    pub fn best_percent(&self) -> u8 {
        self.best_percent
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }

    /// Record a quiz score: last is overwritten, best only ever raised.
    pub fn record_score(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.last_percent = percent;
        self.best_percent = self.best_percent.max(percent);
    }

    /// Progress shown on the page bar: the best score, floored at 50% once
    /// the lesson is marked read.
    #[must_use]
    pub fn bar_percent(&self) -> u8 {
        let floor = if self.read { READ_BASELINE_PERCENT } else { 0 };
        floor.max(self.best_percent)
    }
}
