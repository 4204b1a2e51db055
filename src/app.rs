//! Application module: exposes the view model used by the TUI and runtime.
//!
//! Playback state lives in [`crate::player::Controller`]. `App` holds what
//! only the screen cares about: the playlist drawer, search, the import
//! prompt, lyric highlighting and the cover palette.

mod model;

pub use model::*;
