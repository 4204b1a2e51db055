use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::player::PlaybackSnapshot;

use super::store::KvStore;

pub const MUSIC_FOLDER_KEY: &str = "musicFolder";
pub const PLAYBACK_STATE_KEY: &str = "playbackState";

/// Best-effort save/load of playback state. Nothing here returns an error:
/// failures are logged and behave like "nothing saved".
pub struct StateBridge<S: KvStore> {
    store: S,
}

impl<S: KvStore> StateBridge<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write `snapshot`. Returns whether it reached the store; callers
    /// never retry, the next scheduled save overwrites anyway.
    pub fn save(&mut self, snapshot: &PlaybackSnapshot) -> bool {
        let value = match serde_json::to_value(snapshot) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to serialize playback state");
                return false;
            }
        };
        match self.store.set(PLAYBACK_STATE_KEY, value) {
            Ok(()) => {
                debug!(index = snapshot.current_index, time = snapshot.current_time, "playback state saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save playback state");
                false
            }
        }
    }

    pub fn load(&self) -> Option<PlaybackSnapshot> {
        let value = match self.store.get(PLAYBACK_STATE_KEY) {
            Ok(Some(v)) => v,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read playback state");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "saved playback state is malformed, ignoring");
                None
            }
        }
    }

    pub fn save_music_folder(&mut self, dir: &Path) {
        let value = Value::String(dir.to_string_lossy().into_owned());
        if let Err(e) = self.store.set(MUSIC_FOLDER_KEY, value) {
            warn!(error = %e, "failed to save music folder");
        }
    }

    pub fn music_folder(&self) -> Option<PathBuf> {
        match self.store.get(MUSIC_FOLDER_KEY) {
            Ok(Some(Value::String(s))) if !s.is_empty() => Some(PathBuf::from(s)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "failed to read music folder");
                None
            }
        }
    }
}
