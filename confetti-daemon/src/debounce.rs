//! Trailing-edge debounce for watcher events.
//!
//! Every event for a key pushes that key's deadline out by one window. A job
//! is released once its key has been quiet for the full window, so the sync
//! always sees the file as it was after the last save of a burst.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;

struct Pending<T> {
    job: T,
    due: Instant,
}

pub(crate) struct Debouncer<T> {
    window: Duration,
    pending: HashMap<PathBuf, Pending<T>>,
}

impl<T> Debouncer<T> {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Record an event for `key`; replaces any pending job for the same key.
    pub(crate) fn record(&mut self, key: PathBuf, job: T, now: Instant) {
        let due = now + self.window;
        self.pending.insert(key, Pending { job, due });
    }

    /// Earliest deadline among pending keys.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }

    /// Remove and return every job whose deadline has passed, oldest first.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<(PathBuf, T)> {
        let due_keys: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(key, _)| key.clone())
            .collect();

        let mut due: Vec<(Instant, PathBuf, T)> = due_keys
            .into_iter()
            .filter_map(|key| {
                let pending = self.pending.remove(&key)?;
                Some((pending.due, key, pending.job))
            })
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        due.into_iter().map(|(_, key, job)| (key, job)).collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Sleep until `deadline`; never completes when there is none.
pub(crate) async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const WINDOW: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn rapid_saves_release_one_job_after_the_last() {
        let mut debouncer = Debouncer::new(WINDOW);
        let path = PathBuf::from("/srv/office/view/ArticleComponent.blade.php");

        for save in 0..5 {
            debouncer.record(path.clone(), save, Instant::now());
            advance(Duration::from_millis(30)).await;
            assert!(debouncer.take_due(Instant::now()).is_empty(), "still saving");
        }

        // Last save was 30ms ago; the window counts from there.
        advance(Duration::from_millis(60)).await;
        assert!(debouncer.take_due(Instant::now()).is_empty());

        advance(Duration::from_millis(10)).await;
        assert_eq!(debouncer.take_due(Instant::now()), vec![(path, 4)]);
        assert_eq!(debouncer.len(), 0);
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn paths_are_debounced_independently() {
        let mut debouncer = Debouncer::new(WINDOW);
        let a = PathBuf::from("/p/a.blade.php");
        let b = PathBuf::from("/p/b.blade.php");

        debouncer.record(a.clone(), "a", Instant::now());
        advance(Duration::from_millis(50)).await;
        debouncer.record(b.clone(), "b", Instant::now());
        assert_eq!(debouncer.next_deadline(), Some(Instant::now() + Duration::from_millis(50)));

        advance(Duration::from_millis(50)).await;
        assert_eq!(debouncer.take_due(Instant::now()), vec![(a, "a")]);

        advance(Duration::from_millis(50)).await;
        assert_eq!(debouncer.take_due(Instant::now()), vec![(b, "b")]);
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn due_jobs_come_out_oldest_first() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.record(PathBuf::from("/p/z.blade.php"), 1, Instant::now());
        advance(Duration::from_millis(10)).await;
        debouncer.record(PathBuf::from("/p/a.blade.php"), 2, Instant::now());

        advance(WINDOW).await;
        let jobs: Vec<i32> = debouncer
            .take_due(Instant::now())
            .into_iter()
            .map(|(_, job)| job)
            .collect();
        assert_eq!(jobs, vec![1, 2]);
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn sleep_without_deadline_never_fires() {
        let idle = tokio::time::timeout(Duration::from_secs(3600), sleep_until_deadline(None));
        assert!(idle.await.is_err());

        let deadline = Instant::now() + WINDOW;
        sleep_until_deadline(Some(deadline)).await;
        assert!(Instant::now() >= deadline);
    }
}
