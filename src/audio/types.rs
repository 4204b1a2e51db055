//! Commands, events and shared state for the audio thread.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `path`, starting at `start_at`.
    Load {
        path: PathBuf,
        start_at: Duration,
        autoplay: bool,
        epoch: u64,
    },
    Play,
    Pause,
    /// Jump to an absolute position in the loaded file.
    Seek { position: Duration, epoch: u64 },
    /// Linear gain in `[0, 1]`.
    SetVolume(f32),
    /// Drop the loaded source.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The loaded file played to its end.
    Ended { path: PathBuf },
    /// The file could not be opened or decoded.
    Error { path: PathBuf, reason: String },
    /// No output device; every later command is ignored.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// File currently loaded, if any.
    pub path: Option<PathBuf>,
    /// Elapsed playback time in the loaded file.
    pub position: Duration,
    /// Length reported by the decoder, when it knows.
    pub duration: Option<Duration>,
    /// Whether audio is currently coming out.
    pub playing: bool,
    /// Epoch of the last load or seek the thread has finished applying.
    pub epoch: u64,
}

impl PlaybackInfo {
    /// True when this report describes `path` as of the load or seek
    /// tagged `epoch`. Reports taken while a newer seek is still being
    /// decoded carry the old epoch and must not move the position back.
    pub fn is_current(&self, path: Option<&Path>, epoch: u64) -> bool {
        path.is_some() && self.path.as_deref() == path && self.epoch == epoch
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Elapsed-time bookkeeping for a sink: a running span plus what was
/// accumulated before the last pause or seek.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    /// Restart from `position`, running if `running`.
    pub fn reset(&mut self, position: Duration, running: bool, now: Instant) {
        self.accumulated = position;
        self.started_at = running.then_some(now);
    }

    pub fn resume(&mut self, now: Instant) {
        self.started_at.get_or_insert(now);
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}
