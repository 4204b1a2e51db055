use serde::{Deserialize, Serialize};

use crate::config::PlayModeSetting;

/// How the next track is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Sequential, wrapping around at both ends.
    #[default]
    Loop,
    /// Replays the current track when it ends naturally.
    RepeatOne,
    /// Uniformly random track, repeats allowed.
    Shuffle,
}

impl PlayMode {
    /// `Loop -> RepeatOne -> Shuffle -> Loop`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Loop => Self::RepeatOne,
            Self::RepeatOne => Self::Shuffle,
            Self::Shuffle => Self::Loop,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Loop => "Loop",
            Self::RepeatOne => "Repeat-one",
            Self::Shuffle => "Shuffle",
        }
    }
}

impl From<PlayModeSetting> for PlayMode {
    fn from(setting: PlayModeSetting) -> Self {
        match setting {
            PlayModeSetting::Loop => Self::Loop,
            PlayModeSetting::RepeatOne => Self::RepeatOne,
            PlayModeSetting::Shuffle => Self::Shuffle,
        }
    }
}
