//! Lyrics: locating a source, parsing LRC text and tracking the active line.

mod parse;
mod resolve;
mod sync;

pub use parse::{LyricCue, ParsedLyrics, parse};
pub use resolve::{load, resolve, sidecar_path};
pub use sync::{LyricSync, active_cue, scroll_offset};
