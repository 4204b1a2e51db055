use std::path::Path;
use std::time::Duration;

use super::*;
use crate::library::Track;

fn t(name: &str) -> Track {
    let mut track = Track::untagged(Path::new(&format!("/music/{name}.mp3")));
    track.duration = Some(Duration::from_secs(200));
    track
}

fn loaded(n: usize) -> Controller {
    let mut c = Controller::new(0.5, PlayMode::Loop).with_seed(7);
    c.dispatch(Command::ReplaceCatalog(
        (0..n).map(|i| t(&format!("song{i}"))).collect(),
    ));
    c
}

#[test]
fn starts_idle_with_no_selection() {
    let c = loaded(3);
    assert!(c.is_idle());
    assert_eq!(c.snapshot().current_index, -1);
}

#[test]
fn toggle_from_idle_selects_first_track() {
    let mut c = loaded(3);
    let events = c.dispatch(Command::TogglePlayPause);
    assert_eq!(
        events,
        vec![Event::TrackChanged {
            index: 0,
            start_at: 0.0,
            autoplay: true
        }]
    );
    assert!(c.is_playing());

    assert_eq!(c.dispatch(Command::TogglePlayPause), vec![Event::Paused]);
    assert!(!c.is_playing());
    assert_eq!(c.dispatch(Command::TogglePlayPause), vec![Event::Played]);
}

#[test]
fn toggle_on_empty_catalog_does_nothing() {
    let mut c = Controller::new(1.0, PlayMode::Loop);
    assert!(c.dispatch(Command::TogglePlayPause).is_empty());
    assert!(c.is_idle());
}

#[test]
fn play_and_pause_are_idempotent() {
    let mut c = loaded(2);
    assert!(c.dispatch(Command::Pause).is_empty());
    c.dispatch(Command::Play);
    assert!(c.dispatch(Command::Play).is_empty());
    assert_eq!(c.dispatch(Command::Pause), vec![Event::Paused]);
}

#[test]
fn select_rejects_out_of_range_index() {
    let mut c = loaded(2);
    assert!(c.dispatch(Command::Select(2)).is_empty());
    assert!(c.is_idle());
}

#[test]
fn loop_mode_wraps_in_both_directions() {
    let mut c = loaded(3);
    c.dispatch(Command::Select(2));
    c.dispatch(Command::Next);
    assert_eq!(c.current(), Some(0));
    c.dispatch(Command::Prev);
    assert_eq!(c.current(), Some(2));
}

#[test]
fn prev_from_idle_goes_to_last_track() {
    let mut c = loaded(4);
    c.dispatch(Command::Prev);
    assert_eq!(c.current(), Some(3));
}

#[test]
fn natural_end_in_loop_mode_advances() {
    let mut c = loaded(2);
    c.dispatch(Command::Select(1));
    let events = c.dispatch(Command::TrackEnded);
    assert_eq!(c.current(), Some(0));
    assert!(matches!(events[0], Event::TrackChanged { index: 0, .. }));
}

#[test]
fn repeat_one_rewinds_on_natural_end_without_track_change() {
    let mut c = loaded(3);
    c.dispatch(Command::Select(1));
    c.dispatch(Command::CyclePlayMode);
    assert_eq!(c.mode(), PlayMode::RepeatOne);
    c.dispatch(Command::Tick {
        position: 150.0,
        duration: None,
    });

    let events = c.dispatch(Command::TrackEnded);
    assert_eq!(events, vec![Event::Restarted]);
    assert_eq!(c.current(), Some(1));
    assert_eq!(c.position(), 0.0);
    assert!(c.is_playing());
}

#[test]
fn repeat_one_manual_next_behaves_like_loop() {
    let mut c = loaded(3);
    c.dispatch(Command::Select(2));
    c.dispatch(Command::CyclePlayMode);
    c.dispatch(Command::Next);
    assert_eq!(c.current(), Some(0));
}

#[test]
fn shuffle_picks_indices_within_bounds_in_both_directions() {
    let mut c = loaded(5);
    c.dispatch(Command::CyclePlayMode);
    c.dispatch(Command::CyclePlayMode);
    assert_eq!(c.mode(), PlayMode::Shuffle);

    for i in 0..50 {
        let cmd = if i % 2 == 0 { Command::Next } else { Command::Prev };
        c.dispatch(cmd);
        assert!(c.current().unwrap() < 5);
    }
}

#[test]
fn play_mode_cycles_back_to_loop() {
    let mut c = loaded(1);
    let modes: Vec<PlayMode> = (0..3)
        .map(|_| {
            c.dispatch(Command::CyclePlayMode);
            c.mode()
        })
        .collect();
    assert_eq!(
        modes,
        vec![PlayMode::RepeatOne, PlayMode::Shuffle, PlayMode::Loop]
    );
}

#[test]
fn volume_is_clamped_and_unchanged_volume_emits_nothing() {
    let mut c = loaded(1);
    assert_eq!(
        c.dispatch(Command::AdjustVolume(0.25)),
        vec![Event::VolumeChanged(0.75)]
    );
    c.dispatch(Command::AdjustVolume(1.0));
    assert_eq!(c.volume(), 1.0);
    assert!(c.dispatch(Command::AdjustVolume(0.05)).is_empty());
    c.dispatch(Command::AdjustVolume(-5.0));
    assert_eq!(c.volume(), 0.0);
}

#[test]
fn seek_is_clamped_to_track_bounds() {
    let mut c = loaded(1);
    assert!(c.dispatch(Command::Seek(10.0)).is_empty());

    c.dispatch(Command::Select(0));
    assert_eq!(c.dispatch(Command::Seek(-3.0)), vec![Event::Seeked(0.0)]);
    assert_eq!(c.dispatch(Command::Seek(999.0)), vec![Event::Seeked(200.0)]);
    assert_eq!(c.dispatch(Command::SeekFraction(0.25)), vec![Event::Seeked(50.0)]);
    assert_eq!(c.dispatch(Command::SeekBy(5.0)), vec![Event::Seeked(55.0)]);
    assert_eq!(c.progress(), Some(55.0 / 200.0));
}

#[test]
fn replace_catalog_keeps_current_track_by_path() {
    let mut c = loaded(3);
    c.dispatch(Command::Select(2));

    let events = c.dispatch(Command::ReplaceCatalog(vec![t("new"), t("song2")]));
    assert_eq!(events, vec![Event::CatalogReplaced]);
    assert_eq!(c.current(), Some(1));
    assert!(c.is_playing());
}

#[test]
fn replace_catalog_stops_when_current_track_is_gone() {
    let mut c = loaded(3);
    c.dispatch(Command::Select(0));

    let events = c.dispatch(Command::ReplaceCatalog(vec![t("other")]));
    assert_eq!(events, vec![Event::CatalogReplaced, Event::Stopped]);
    assert!(c.is_idle());
    assert!(!c.is_playing());
}

#[test]
fn restore_seeds_state_without_autoplay() {
    let mut c = loaded(3);
    let events = c.dispatch(Command::Restore(PlaybackSnapshot {
        current_index: 1,
        current_time: 42.5,
        volume: 0.3,
        play_mode: PlayMode::Shuffle,
        is_playing: false,
    }));

    assert_eq!(
        events,
        vec![
            Event::VolumeChanged(0.3),
            Event::PlayModeChanged(PlayMode::Shuffle),
            Event::TrackChanged {
                index: 1,
                start_at: 42.5,
                autoplay: false
            },
        ]
    );
    assert_eq!(c.current(), Some(1));
    assert_eq!(c.position(), 42.5);
    assert!(!c.is_playing());
}

#[test]
fn restore_resumes_playback_only_when_snapshot_was_playing() {
    let mut c = loaded(3);
    c.dispatch(Command::Restore(PlaybackSnapshot {
        current_index: 0,
        current_time: 1.0,
        volume: 0.5,
        play_mode: PlayMode::Loop,
        is_playing: true,
    }));
    assert!(c.is_playing());
}

#[test]
fn restore_with_out_of_range_index_stays_idle() {
    let mut c = loaded(2);
    let events = c.dispatch(Command::Restore(PlaybackSnapshot {
        current_index: 5,
        current_time: 10.0,
        volume: 0.1,
        play_mode: PlayMode::Shuffle,
        is_playing: true,
    }));

    assert!(events.is_empty());
    assert!(c.is_idle());
    assert_eq!(c.volume(), 0.5);
    assert_eq!(c.mode(), PlayMode::Loop);
}

#[test]
fn restore_with_negative_index_other_than_none_is_rejected() {
    let mut c = loaded(3);
    let events = c.dispatch(Command::Restore(PlaybackSnapshot {
        current_index: -7,
        current_time: 3.0,
        volume: 0.1,
        play_mode: PlayMode::Shuffle,
        is_playing: false,
    }));

    assert!(events.is_empty());
    assert!(c.is_idle());
    assert_eq!(c.volume(), 0.5);
    assert_eq!(c.mode(), PlayMode::Loop);
}

#[test]
fn restore_without_selection_keeps_volume_and_mode() {
    let mut c = loaded(3);
    let events = c.dispatch(Command::Restore(PlaybackSnapshot {
        current_index: -1,
        current_time: 0.0,
        volume: 0.25,
        play_mode: PlayMode::RepeatOne,
        is_playing: false,
    }));

    assert_eq!(
        events,
        vec![
            Event::VolumeChanged(0.25),
            Event::PlayModeChanged(PlayMode::RepeatOne)
        ]
    );
    assert!(c.is_idle());
}

#[test]
fn snapshot_reflects_live_fields() {
    let mut c = loaded(2);
    c.dispatch(Command::Select(1));
    c.dispatch(Command::Tick {
        position: 12.0,
        duration: Some(180.0),
    });

    assert_eq!(
        c.snapshot(),
        PlaybackSnapshot {
            current_index: 1,
            current_time: 12.0,
            volume: 0.5,
            play_mode: PlayMode::Loop,
            is_playing: true,
        }
    );
    assert_eq!(c.duration(), Some(180.0));
}

#[test]
fn save_triggers_cover_transport_and_volume_changes_only() {
    assert!(
        Event::TrackChanged {
            index: 0,
            start_at: 0.0,
            autoplay: true
        }
        .needs_save()
    );
    assert!(Event::Played.needs_save());
    assert!(Event::Paused.needs_save());
    assert!(Event::VolumeChanged(0.2).needs_save());
    assert!(!Event::Seeked(3.0).needs_save());
    assert!(!Event::Restarted.needs_save());
}
