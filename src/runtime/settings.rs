use crate::config;
use crate::error::Error;

/// Load settings, falling back to defaults. The error, if any, is returned
/// so it can be logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<Error>) {
    match config::Settings::load().and_then(|s| s.validate().map(|()| s)) {
        Ok(s) => (s, None),
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (config::Settings::default(), Some(e)),
    }
}
