use tracing::warn;

use circle8_core::model::{clamp_percent, LessonKey, LessonProgress};
use circle8_storage::NamespacedStore;

/// Values the lesson page shows: last and best scores plus the progress-bar
/// width derived from them and the read flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressDisplay {
    pub last_percent: u8,
    pub best_percent: u8,
    pub bar_percent: u8,
}

/// Persists per-lesson read/last/best scalars under the lesson's key stems
/// and derives the displayed progress.
///
/// Reads tolerate corrupt or missing entries by substituting defaults;
/// writes that fail are logged and dropped rather than surfaced.
#[derive(Clone)]
pub struct ProgressTracker {
    store: NamespacedStore,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(store: NamespacedStore) -> Self {
        Self { store }
    }

    /// Rehydrate the persisted progress for one lesson.
    pub async fn load(&self, lesson: &LessonKey) -> LessonProgress {
        let read = self.store.get_string(&lesson.read_key()).await.as_deref() == Some("1");
        let last = self.read_percent(&lesson.last_key()).await;
        let best = self.read_percent(&lesson.best_key()).await;
        LessonProgress::from_persisted(read, last, best)
    }

    async fn read_percent(&self, key: &str) -> i64 {
        self.store
            .get_string(key)
            .await
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|value| i64::from(clamp_percent(value)))
            .unwrap_or(0)
    }

    /// Flag the lesson as read, flooring its displayed progress at 50%.
    pub async fn mark_read(&self, lesson: &LessonKey) {
        if let Err(err) = self.store.put_string(&lesson.read_key(), "1").await {
            warn!(lesson = %lesson, %err, "failed to persist read flag");
        }
    }

    /// Clear all three persisted scalars back to their defaults.
    pub async fn reset(&self, lesson: &LessonKey) {
        for key in [lesson.read_key(), lesson.last_key(), lesson.best_key()] {
            if let Err(err) = self.store.remove(&key).await {
                warn!(lesson = %lesson, key, %err, "failed to reset progress entry");
            }
        }
    }

    /// Record a quiz score: last unconditionally, best only if improved.
    /// Returns the updated progress.
    pub async fn record_score(&self, lesson: &LessonKey, percent: u8) -> LessonProgress {
        let mut progress = self.load(lesson).await;
        progress.record_score(percent);

        let writes = [
            (lesson.last_key(), progress.last_percent()),
            (lesson.best_key(), progress.best_percent()),
        ];
        for (key, value) in writes {
            if let Err(err) = self.store.put_string(&key, &value.to_string()).await {
                warn!(lesson = %lesson, key, %err, "failed to persist score");
            }
        }
        progress
    }

    /// Values for the page's score labels and progress bar.
    pub async fn display(&self, lesson: &LessonKey) -> ProgressDisplay {
        let progress = self.load(lesson).await;
        ProgressDisplay {
            last_percent: progress.last_percent(),
            best_percent: progress.best_percent(),
            bar_percent: progress.bar_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle8_storage::MemoryStore;
    use std::sync::Arc;

    fn tracker() -> (NamespacedStore, ProgressTracker) {
        let store = NamespacedStore::new(Arc::new(MemoryStore::new()));
        (store.clone(), ProgressTracker::new(store))
    }

    fn lesson() -> LessonKey {
        LessonKey::new(2, 1)
    }

    #[tokio::test]
    async fn fresh_lesson_displays_zeroes() {
        let (_, tracker) = tracker();
        let display = tracker.display(&lesson()).await;
        assert_eq!(
            display,
            ProgressDisplay {
                last_percent: 0,
                best_percent: 0,
                bar_percent: 0
            }
        );
    }

    #[tokio::test]
    async fn record_score_updates_last_and_keeps_best_monotonic() {
        let (_, tracker) = tracker();
        let lesson = lesson();

        tracker.record_score(&lesson, 40).await;
        tracker.record_score(&lesson, 80).await;
        let progress = tracker.record_score(&lesson, 60).await;

        assert_eq!(progress.last_percent(), 60);
        assert_eq!(progress.best_percent(), 80);

        let display = tracker.display(&lesson).await;
        assert_eq!(display.last_percent, 60);
        assert_eq!(display.best_percent, 80);
        assert_eq!(display.bar_percent, 80);
    }

    #[tokio::test]
    async fn scores_persist_as_plain_strings_under_lesson_keys() {
        let (store, tracker) = tracker();
        let lesson = lesson();

        tracker.mark_read(&lesson).await;
        tracker.record_score(&lesson, 70).await;

        assert_eq!(store.get_string("m2_w1_read").await, Some("1".to_string()));
        assert_eq!(store.get_string("m2_w1_last").await, Some("70".to_string()));
        assert_eq!(store.get_string("m2_w1_best").await, Some("70".to_string()));
    }

    #[tokio::test]
    async fn mark_read_floors_bar_at_fifty() {
        let (_, tracker) = tracker();
        let lesson = lesson();

        tracker.mark_read(&lesson).await;
        assert_eq!(tracker.display(&lesson).await.bar_percent, 50);

        tracker.record_score(&lesson, 30).await;
        assert_eq!(tracker.display(&lesson).await.bar_percent, 50);

        tracker.record_score(&lesson, 90).await;
        assert_eq!(tracker.display(&lesson).await.bar_percent, 90);
    }

    #[tokio::test]
    async fn reset_round_trips_to_zeroes() {
        let (_, tracker) = tracker();
        let lesson = lesson();

        tracker.mark_read(&lesson).await;
        tracker.record_score(&lesson, 90).await;
        tracker.reset(&lesson).await;

        let display = tracker.display(&lesson).await;
        assert_eq!(
            display,
            ProgressDisplay {
                last_percent: 0,
                best_percent: 0,
                bar_percent: 0
            }
        );
        assert!(!tracker.load(&lesson).await.read());
    }

    #[tokio::test]
    async fn corrupt_stored_values_read_as_defaults() {
        let (store, tracker) = tracker();
        let lesson = lesson();

        store.put_string("m2_w1_last", "garbage").await.unwrap();
        store.put_string("m2_w1_best", "250").await.unwrap();
        store.put_string("m2_w1_read", "yes").await.unwrap();

        let display = tracker.display(&lesson).await;
        assert_eq!(display.last_percent, 0);
        assert_eq!(display.best_percent, 100);
        assert_eq!(display.bar_percent, 100);
        assert!(!tracker.load(&lesson).await.read());
    }

    #[tokio::test]
    async fn lessons_do_not_share_progress() {
        let (_, tracker) = tracker();
        let first = LessonKey::new(1, 1);
        let second = LessonKey::new(1, 2);

        tracker.record_score(&first, 90).await;
        assert_eq!(tracker.display(&second).await.best_percent, 0);
    }
}
