use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::{TempDir, tempdir};

use super::startup::{Session, begin_import, finish_import, start_session};
use crate::config::Settings;
use crate::library::ScanOutcome;
use crate::persist::{JsonFileStore, StateBridge};
use crate::player::{Command, Event, PlayMode, PlaybackSnapshot};

const SCAN_TIMEOUT: Duration = Duration::from_secs(10);

struct Fixture {
    _dir: TempDir,
    state: PathBuf,
    music: PathBuf,
    other: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let music = dir.path().join("music");
    let other = dir.path().join("other");
    let layout = [
        (&music, ["a.mp3", "b.mp3", "c.mp3"]),
        (&other, ["x.mp3", "y.mp3", "z.mp3"]),
    ];
    for (folder, names) in layout {
        fs::create_dir_all(folder).unwrap();
        for name in names {
            fs::write(folder.join(name), b"x").unwrap();
        }
    }
    Fixture {
        state: dir.path().join("state.json"),
        music,
        other,
        _dir: dir,
    }
}

fn settings(fx: &Fixture) -> Settings {
    let mut s = Settings::default();
    s.persistence.state_path = Some(fx.state.clone());
    s.playback.volume = 1.0;
    s
}

fn paused_at_second_track() -> PlaybackSnapshot {
    PlaybackSnapshot {
        current_index: 1,
        current_time: 42.0,
        volume: 0.25,
        play_mode: PlayMode::Shuffle,
        is_playing: false,
    }
}

fn seed(fx: &Fixture, folder: &Path, snapshot: &PlaybackSnapshot) {
    let mut bridge = StateBridge::new(JsonFileStore::open(&fx.state).unwrap());
    bridge.save_music_folder(folder);
    assert!(bridge.save(snapshot));
}

fn saved_folder(fx: &Fixture) -> Option<PathBuf> {
    StateBridge::new(JsonFileStore::open(&fx.state).unwrap()).music_folder()
}

fn land_next_scan(session: &mut Session) -> Vec<Event> {
    let outcome = session.importer.recv_timeout(SCAN_TIMEOUT).unwrap();
    finish_import(session, outcome)
}

#[test]
fn saved_folder_is_rescanned_and_state_restored_without_autoplay() {
    let fx = fixture();
    seed(&fx, &fx.music, &paused_at_second_track());

    let mut session = start_session(&settings(&fx), None);
    assert_eq!(session.app.current_dir.as_deref(), Some(fx.music.as_path()));
    assert!(session.player.is_idle());

    let events = land_next_scan(&mut session);
    assert!(events.contains(&Event::TrackChanged {
        index: 1,
        start_at: 42.0,
        autoplay: false
    }));
    assert_eq!(session.player.current(), Some(1));
    assert_eq!(session.player.position(), 42.0);
    assert_eq!(session.player.volume(), 0.25);
    assert_eq!(session.player.mode(), PlayMode::Shuffle);
    assert!(!session.player.is_playing());
    assert!(session.pending_restore.is_none());
}

#[test]
fn folder_argument_matching_saved_folder_restores() {
    let fx = fixture();
    seed(&fx, &fx.music, &paused_at_second_track());

    let mut session = start_session(&settings(&fx), Some(fx.music.clone()));
    land_next_scan(&mut session);
    assert_eq!(session.player.current(), Some(1));
}

#[test]
fn different_folder_argument_is_a_fresh_import() {
    let fx = fixture();
    seed(&fx, &fx.music, &paused_at_second_track());

    let mut session = start_session(&settings(&fx), Some(fx.other.clone()));
    assert!(session.pending_restore.is_none());
    assert_eq!(saved_folder(&fx), Some(fx.other.clone()));

    let events = land_next_scan(&mut session);
    assert_eq!(events, vec![Event::CatalogReplaced]);
    assert_eq!(session.player.catalog().len(), 3);
    assert!(session.player.is_idle());
    assert_eq!(session.player.volume(), 1.0);
}

#[test]
fn nothing_saved_and_no_argument_opens_the_import_prompt() {
    let fx = fixture();
    let session = start_session(&settings(&fx), None);
    assert!(session.app.is_importing());
    assert!(session.app.current_dir.is_none());
    assert!(session.pending_restore.is_none());
}

#[test]
fn out_of_range_saved_index_leaves_player_idle() {
    let fx = fixture();
    let mut snapshot = paused_at_second_track();
    snapshot.current_index = 9;
    seed(&fx, &fx.music, &snapshot);

    let mut session = start_session(&settings(&fx), None);
    land_next_scan(&mut session);
    assert!(session.player.is_idle());
    assert_eq!(session.player.volume(), 1.0);
}

#[test]
fn user_import_drops_pending_restore_and_autoplays_first_track() {
    let fx = fixture();
    seed(&fx, &fx.music, &paused_at_second_track());
    let settings = settings(&fx);

    let mut session = start_session(&settings, None);
    assert!(session.pending_restore.is_some());

    begin_import(&mut session, fx.other.clone(), &settings, true);
    assert!(session.pending_restore.is_none());
    assert_eq!(saved_folder(&fx), Some(fx.other.clone()));

    // The superseded scan of the saved folder never lands.
    land_next_scan(&mut session);
    assert_eq!(session.player.current(), Some(0));
    assert!(session.player.is_playing());
    assert!(
        session
            .player
            .current_track()
            .is_some_and(|t| t.path.starts_with(&fx.other))
    );
    assert_eq!(session.player.mode(), PlayMode::Loop);
    assert!(session.autoplay_generation.is_none());
}

#[test]
fn restore_waits_for_its_own_generation() {
    let fx = fixture();
    seed(&fx, &fx.music, &paused_at_second_track());
    let mut session = start_session(&settings(&fx), None);
    let (generation, _) = session.pending_restore.clone().unwrap();

    let older = ScanOutcome {
        generation: generation - 1,
        root: fx.music.clone(),
        tracks: Vec::new(),
    };
    finish_import(&mut session, older);
    assert_eq!(
        session.pending_restore.as_ref().map(|(g, _)| *g),
        Some(generation)
    );
    assert!(session.player.is_idle());

    land_next_scan(&mut session);
    assert!(session.pending_restore.is_none());
    assert_eq!(session.player.current(), Some(1));
}

#[test]
fn user_import_does_not_interrupt_a_selected_track() {
    let fx = fixture();
    let settings = settings(&fx);
    let mut session = start_session(&settings, Some(fx.music.clone()));
    land_next_scan(&mut session);
    session.player.dispatch(Command::Select(2));
    let playing = session.player.current_track().map(|t| t.path.clone());

    begin_import(&mut session, fx.music.clone(), &settings, true);
    let events = land_next_scan(&mut session);

    assert_eq!(events, vec![Event::CatalogReplaced]);
    assert_eq!(session.player.current_track().map(|t| t.path.clone()), playing);
    assert!(session.player.is_playing());
}
