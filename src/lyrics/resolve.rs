//! Finding lyrics for a track: a `.lrc` sidecar first, then the embedded tag.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::library::TagReader;

use super::parse::{ParsedLyrics, parse};

/// `song.flac` -> `song.lrc`, next to the audio file.
pub fn sidecar_path(track: &Path) -> PathBuf {
    track.with_extension("lrc")
}

/// Return the raw lyric text for `track`, or `None` when neither a sidecar
/// nor an embedded lyrics tag is available. Misses are never errors.
pub fn resolve(track: &Path, reader: &dyn TagReader) -> Option<String> {
    let sidecar = sidecar_path(track);
    match fs::read_to_string(&sidecar) {
        Ok(text) => {
            debug!(path = %sidecar.display(), "using sidecar lyrics");
            return Some(text);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            debug!(path = %sidecar.display(), error = %e, "sidecar lyrics unreadable");
        }
    }

    match reader.read_lyrics(track) {
        Ok(lyrics) => lyrics,
        Err(e) => {
            debug!(path = %track.display(), error = %e, "no embedded lyrics");
            None
        }
    }
}

/// Resolve and parse. Sources that produce no cues count as not found.
pub fn load(track: &Path, reader: &dyn TagReader) -> Option<ParsedLyrics> {
    let raw = resolve(track, reader)?;
    let parsed = parse(&raw);
    if parsed.is_empty() { None } else { Some(parsed) }
}
