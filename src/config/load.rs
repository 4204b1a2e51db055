use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::{Error, Result};

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then layers environment
/// variables (prefix `DREAMPLAY__`) on top and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("DREAMPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<()> {
        let step = self.playback.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::ConfigInvalid {
                message: "playback.volume_step must be in (0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(Error::ConfigInvalid {
                message: "playback.volume must be in [0, 1]".to_string(),
            });
        }
        if self.persistence.autosave_secs == 0 {
            return Err(Error::ConfigInvalid {
                message: "persistence.autosave_secs must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolve the config path from `DREAMPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("DREAMPLAY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/dreamplay/config.toml`
/// or `~/.config/dreamplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("dreamplay").join("config.toml"))
}
