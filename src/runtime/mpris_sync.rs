use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::Controller;

pub fn status_of(player: &Controller) -> PlaybackStatus {
    if player.is_idle() {
        PlaybackStatus::Stopped
    } else if player.is_playing() {
        PlaybackStatus::Playing
    } else {
        PlaybackStatus::Paused
    }
}

pub fn update_mpris(mpris: &MprisHandle, player: &Controller) {
    mpris.set_track_metadata(player.current(), player.current_track());
    mpris.set_playback(status_of(player));
}
