use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::config::LibrarySettings;
use crate::error::Error;

struct FailingReader;

impl TagReader for FailingReader {
    fn read(&self, path: &Path) -> crate::error::Result<TrackTags> {
        Err(Error::Decode {
            path: path.to_path_buf(),
            reason: "boom".to_string(),
        })
    }
}

#[test]
fn failing_tag_extraction_still_yields_one_entry_per_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Song One.flac"), b"x").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default(), &FailingReader);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Song One.flac");
    assert_eq!(tracks[0].artist, UNKNOWN_ARTIST);
    assert_eq!(tracks[0].cover, None);
}

#[test]
fn from_tags_uses_first_picture_as_cover() {
    let tags = TrackTags {
        title: Some("Title".to_string()),
        artist: None,
        duration: Some(Duration::from_secs(3)),
        pictures: vec![
            Picture {
                mime: Some("image/png".to_string()),
                data: vec![1, 2, 3],
            },
            Picture {
                mime: Some("image/jpeg".to_string()),
                data: vec![9],
            },
        ],
        lyrics: None,
    };

    let track = Track::from_tags(Path::new("/music/a.mp3"), tags);
    assert_eq!(track.title, "Title");
    assert_eq!(track.artist, "Unknown");
    assert_eq!(track.cover.as_deref(), Some("data:image/png;base64,AQID"));
    assert_eq!(track.url, "file:///music/a.mp3");
}

#[test]
fn data_uri_defaults_mime_and_decodes_back() {
    let uri = data_uri(None, b"hello");
    assert!(uri.starts_with("data:image/jpeg;base64,"));

    let (mime, bytes) = decode_data_uri(&uri).unwrap();
    assert_eq!(mime, "image/jpeg");
    assert_eq!(bytes, b"hello");

    assert!(decode_data_uri("https://example.com/a.png").is_none());
    assert!(decode_data_uri("data:image/png,raw").is_none());
}

#[test]
fn file_url_escapes_spaces() {
    assert_eq!(
        file_url(Path::new("/music/My Song.mp3")),
        "file:///music/My%20Song.mp3"
    );
}

#[test]
fn importer_delivers_latest_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();

    let mut importer = Importer::new(Arc::new(FailingReader));
    let generation = importer.start(dir.path().to_path_buf(), LibrarySettings::default());
    assert!(importer.is_scanning());

    let outcome = importer.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(outcome.generation, generation);
    assert_eq!(outcome.root, dir.path());
    assert_eq!(outcome.tracks.len(), 2);
    assert!(!importer.is_scanning());
}

#[test]
fn importer_rejects_results_from_superseded_generations() {
    let mut importer = Importer::new(Arc::new(FailingReader));
    let dir = tempdir().unwrap();
    importer.start(dir.path().to_path_buf(), LibrarySettings::default());
    importer.start(dir.path().to_path_buf(), LibrarySettings::default());
    assert_eq!(importer.generation(), 2);

    let stale = ScanOutcome {
        generation: 1,
        root: PathBuf::from("/old"),
        tracks: vec![Track::untagged(Path::new("/old/x.mp3"))],
    };
    assert!(importer.accept(stale).is_none());

    let fresh = ScanOutcome {
        generation: 2,
        root: PathBuf::from("/new"),
        tracks: Vec::new(),
    };
    assert!(importer.accept(fresh).is_some());
}
