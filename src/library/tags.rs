//! Tag extraction.
//!
//! The scanner and the lyric resolver only see [`TagReader`]; the real
//! implementation is backed by `lofty`.

use std::path::Path;
use std::time::Duration;

use lofty::config::ParseOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::error::{Error, Result};

/// An embedded picture as stored in the file.
#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

/// Everything the player wants from a file's tags. Empty strings are
/// normalized to `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
    pub pictures: Vec<Picture>,
    pub lyrics: Option<String>,
}

pub trait TagReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<TrackTags>;

    /// Only the embedded lyrics. Called on every track change, so readers
    /// should skip pictures and audio properties where they can.
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>> {
        self.read(path).map(|tags| tags.lyrics)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

fn lyrics_of(tag: &Tag) -> Option<String> {
    tag.get_string(&ItemKey::Lyrics)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Result<TrackTags> {
        let tagged = lofty::read_from_path(path).map_err(|source| Error::Tags {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tags = TrackTags {
            duration: Some(tagged.properties().duration()),
            ..TrackTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            tags.title = tag.title().as_deref().and_then(non_empty);
            tags.artist = tag.artist().as_deref().and_then(non_empty);
            tags.pictures = tag
                .pictures()
                .iter()
                .map(|p| Picture {
                    mime: p.mime_type().map(|m| m.as_str().to_string()),
                    data: p.data().to_vec(),
                })
                .collect();
            tags.lyrics = lyrics_of(tag);
        }

        Ok(tags)
    }

    fn read_lyrics(&self, path: &Path) -> Result<Option<String>> {
        let options = ParseOptions::new()
            .read_cover_art(false)
            .read_properties(false);
        let tagged = Probe::open(path)
            .and_then(|probe| probe.options(options).read())
            .map_err(|source| Error::Tags {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(tagged
            .primary_tag()
            .or_else(|| tagged.first_tag())
            .and_then(lyrics_of))
    }
}
