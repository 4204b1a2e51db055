use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cover::data_uri;
use super::tags::TrackTags;

/// Artist shown when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// One playable file in the catalog. `path` is the unique key.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    /// `file://` locator handed to the media backend and MPRIS.
    pub url: String,
    pub title: String,
    pub artist: String,
    /// First embedded picture as a `data:` URI.
    pub cover: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// Build a track from whatever tags could be read; missing values fall
    /// back to the file name and [`UNKNOWN_ARTIST`].
    pub fn from_tags(path: &Path, tags: TrackTags) -> Self {
        let cover = tags
            .pictures
            .first()
            .map(|p| data_uri(p.mime.as_deref(), &p.data));

        Self {
            path: path.to_path_buf(),
            url: file_url(path),
            title: tags.title.unwrap_or_else(|| file_name(path)),
            artist: tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            cover,
            duration: tags.duration,
        }
    }

    /// Track for a file whose tags could not be read at all.
    pub fn untagged(path: &Path) -> Self {
        Self::from_tags(path, TrackTags::default())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Derive a `file://` URL for `path`, falling back to naive formatting for
/// relative paths.
pub fn file_url(path: &Path) -> String {
    match url::Url::from_file_path(path) {
        Ok(u) => u.to_string(),
        Err(()) => format!("file://{}", path.display()),
    }
}
