use crate::library::Track;

use super::mode::PlayMode;
use super::snapshot::PlaybackSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Everything that can change transport state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start playing the track at this catalog index.
    Select(usize),
    TogglePlayPause,
    Play,
    Pause,
    Next,
    Prev,
    /// The media backend reached the end of the current track by itself.
    TrackEnded,
    CyclePlayMode,
    /// Relative volume change, clamped to `[0, 1]`.
    AdjustVolume(f32),
    /// Absolute seek in seconds.
    Seek(f64),
    /// Relative seek in seconds.
    SeekBy(f64),
    /// Seek to a fraction (0.0 - 1.0) of the track duration.
    SeekFraction(f64),
    /// Position report from the media backend.
    Tick { position: f64, duration: Option<f64> },
    /// A finished import; replaces the whole catalog.
    ReplaceCatalog(Vec<Track>),
    /// Saved state read at startup.
    Restore(PlaybackSnapshot),
}

/// What changed as a result of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A (possibly different) track was loaded.
    TrackChanged {
        index: usize,
        start_at: f64,
        autoplay: bool,
    },
    Played,
    Paused,
    /// Repeat-one rewound the current track after it ended.
    Restarted,
    Seeked(f64),
    VolumeChanged(f32),
    PlayModeChanged(PlayMode),
    CatalogReplaced,
    /// The current track went away; nothing is loaded anymore.
    Stopped,
}

impl Event {
    /// Whether the playback state should be written out after this event.
    pub fn needs_save(&self) -> bool {
        matches!(
            self,
            Self::TrackChanged { .. }
                | Self::Played
                | Self::Paused
                | Self::VolumeChanged(_)
                | Self::Stopped
        )
    }
}
