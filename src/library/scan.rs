use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;
use super::tags::TagReader;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and build the catalog in traversal order.
#[cfg(test)]
pub fn scan(dir: &Path, settings: &LibrarySettings, reader: &dyn TagReader) -> Vec<Track> {
    scan_until(dir, settings, reader, &AtomicBool::new(false))
}

/// Like [`scan`], but stops early once `cancel` is set. Checked between files.
pub fn scan_until(
    dir: &Path,
    settings: &LibrarySettings,
    reader: &dyn TagReader,
    cancel: &AtomicBool,
) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        if cancel.load(Ordering::Relaxed) {
            debug!(dir = %dir.display(), "scan cancelled");
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Unreadable directories contribute nothing; keep walking.
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "skipping unreadable entry during scan"
                );
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let track = match reader.read(path) {
            Ok(tags) => Track::from_tags(path, tags),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "tag extraction failed, using file name");
                Track::untagged(path)
            }
        };
        tracks.push(track);
    }

    debug!(dir = %dir.display(), count = tracks.len(), "scan finished");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tags::{LoftyTagReader, TrackTags};
    use std::fs;
    use tempfile::tempdir;

    struct FixedReader;

    impl TagReader for FixedReader {
        fn read(&self, path: &Path) -> crate::error::Result<TrackTags> {
            let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
            Ok(TrackTags {
                title: Some(format!("T-{stem}")),
                artist: Some("A".to_string()),
                ..TrackTags::default()
            })
        }
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.M4a"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.lrc"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_counts_every_eligible_file_at_any_depth() {
        let dir = tempdir().unwrap();
        let deep = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a").join("one.flac"), b"x").unwrap();
        fs::write(deep.join("three.ogg"), b"x").unwrap();
        fs::write(deep.join("three.lrc"), b"[00:01]hi").unwrap();
        fs::write(deep.join("cover.jpg"), b"x").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default(), &FixedReader);
        assert_eq!(tracks.len(), 3);

        let mut paths: Vec<_> = tracks.iter().map(|t| t.path.clone()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 3);
        assert!(tracks.iter().all(|t| t.artist == "A" && t.title.starts_with("T-")));
    }

    #[test]
    fn scan_keeps_unparseable_files_with_file_name_fallback() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.mp3"), b"not a real mp3").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default(), &LoftyTagReader);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "broken.mp3");
        assert_eq!(tracks[0].artist, "Unknown");
        assert!(tracks[0].cover.is_none());
        assert!(tracks[0].url.starts_with("file://"));
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"x").unwrap();
        let hidden_dir = dir.path().join(".stash");
        fs::create_dir_all(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("inside.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings, &FixedReader);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "T-visible");
    }

    #[test]
    fn missing_root_yields_empty_catalog() {
        let dir = tempdir().unwrap();
        let tracks = scan(
            &dir.path().join("does-not-exist"),
            &LibrarySettings::default(),
            &FixedReader,
        );
        assert!(tracks.is_empty());
    }

    #[test]
    fn cancelled_scan_stops_before_reading_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();

        let cancel = AtomicBool::new(true);
        let tracks = scan_until(dir.path(), &LibrarySettings::default(), &FixedReader, &cancel);
        assert!(tracks.is_empty());
    }
}
