use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/dreamplay/config.toml` or `~/.config/dreamplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DREAMPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub persistence: PersistenceSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play mode used when there is no saved state.
    pub play_mode: PlayModeSetting,
    /// Initial volume (0.0 - 1.0) when there is no saved state.
    pub volume: f32,
    /// Relative volume change per wheel notch / key press.
    pub volume_step: f32,
    /// Number of seconds to seek when pressing `h` / `l`.
    pub seek_seconds: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            play_mode: PlayModeSetting::Loop,
            volume: 1.0,
            volume_step: 0.05,
            seek_seconds: 5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayModeSetting {
    #[serde(alias = "loop-all", alias = "loop_all", alias = "loopall")]
    Loop,
    #[serde(
        alias = "repeat_one",
        alias = "loop-one",
        alias = "loop_one",
        alias = "loopone"
    )]
    RepeatOne,
    Shuffle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Where the key-value state file lives. Defaults to `<data dir>/dreamplay/state.json`.
    pub state_path: Option<PathBuf>,
    /// Periodic autosave interval in seconds.
    pub autosave_secs: u64,
    /// Quiet period used to merge bursts of event-triggered saves (milliseconds).
    pub debounce_ms: u64,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            state_path: None,
            autosave_secs: 60,
            debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the header box.
    pub header_text: String,
    /// Whether the playlist drawer starts open.
    pub drawer_open: bool,
    /// Shown in the lyrics pane when a track has no lyrics.
    pub lyrics_placeholder: String,
    /// Whether to tint the UI with colours taken from the cover art.
    pub cover_theme: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ dreamplay ~ ".to_string(),
            drawer_open: false,
            lyrics_placeholder: "No lyrics".to_string(),
            cover_theme: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for the rolling log file. Defaults to `<local data dir>/dreamplay/logs`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
