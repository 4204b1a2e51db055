use std::time::{Duration, Instant};

use crate::player::PlaybackSnapshot;

/// Decides when playback state is written.
///
/// Event-triggered requests wait out a short debounce so bursts merge into
/// one write, and the periodic autosave shares the same bookkeeping. A
/// snapshot identical to the last one written is never rewritten.
#[derive(Debug)]
pub struct SaveScheduler {
    interval: Duration,
    debounce: Duration,
    last_save: Instant,
    pending_since: Option<Instant>,
    last_written: Option<PlaybackSnapshot>,
}

impl SaveScheduler {
    pub fn new(interval: Duration, debounce: Duration, now: Instant) -> Self {
        Self {
            interval,
            debounce,
            last_save: now,
            pending_since: None,
            last_written: None,
        }
    }

    /// Treat `snapshot` as already on disk (e.g. the state just loaded).
    pub fn with_last_written(mut self, snapshot: Option<PlaybackSnapshot>) -> Self {
        self.last_written = snapshot;
        self
    }

    /// Ask for a save soon. Repeated requests keep the earliest deadline.
    pub fn request(&mut self, now: Instant) {
        self.pending_since.get_or_insert(now);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        let requested = self
            .pending_since
            .is_some_and(|since| now.duration_since(since) >= self.debounce);
        requested || now.duration_since(self.last_save) >= self.interval
    }

    /// Consume the current request/period and report whether `snapshot`
    /// differs from what was last written.
    pub fn should_write(&mut self, snapshot: &PlaybackSnapshot, now: Instant) -> bool {
        self.pending_since = None;
        self.last_save = now;
        self.last_written.as_ref() != Some(snapshot)
    }

    pub fn mark_written(&mut self, snapshot: PlaybackSnapshot) {
        self.last_written = Some(snapshot);
    }
}
