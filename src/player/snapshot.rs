use serde::{Deserialize, Serialize};

use super::mode::PlayMode;

/// Persisted playback state, stored as a flat record.
///
/// `current_index` is `-1` when nothing is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_index: i64,
    pub current_time: f64,
    pub volume: f32,
    pub play_mode: PlayMode,
    pub is_playing: bool,
}

impl PlaybackSnapshot {
    /// The selected index if it is valid for a catalog of `len` tracks.
    pub fn index_within(&self, len: usize) -> Option<usize> {
        usize::try_from(self.current_index).ok().filter(|&i| i < len)
    }
}
