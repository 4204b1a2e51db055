use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::{AudioCmd, AudioPlayer, MediaEvent};
use crate::config;
use crate::lyrics;
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus};
use crate::player::{Command, Event};
use crate::runtime::input::{self, Input};
use crate::runtime::mpris_sync::{status_of, update_mpris};
use crate::runtime::startup::{Session, begin_import, finish_import};
use crate::theme::{Palette, palette_for};
use crate::ui;

const QUIT_FADE_OUT: Duration = Duration::from_millis(250);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Last-known playing index and status as emitted to MPRIS.
    last_mpris: Option<(Option<usize>, PlaybackStatus)>,
    /// Load failures in a row; stops skipping once every track failed.
    consecutive_errors: usize,
    /// Terminal area of the last frame, for mouse hit testing.
    last_area: Rect,
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState::default();

    loop {
        if let Some(outcome) = session.importer.try_recv() {
            let events = finish_import(session, outcome);
            apply_events(events, session, settings, audio_player, mpris);
        }

        while let Some(ev) = audio_player.try_event() {
            on_media_event(ev, session, settings, audio_player, mpris, &mut state);
        }

        sync_position(session, audio_player, &mut state);
        maybe_save(session, Instant::now());

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let now_mpris = (session.player.current(), status_of(&session.player));
        if state.last_mpris != Some(now_mpris) {
            update_mpris(mpris, &session.player);
            state.last_mpris = Some(now_mpris);
        }

        let seek_seconds = settings.playback.seek_seconds;
        let frame = terminal.draw(|f| ui::draw(f, &session.app, &session.player, seek_seconds))?;
        state.last_area = frame.area;

        while let Ok(cmd) = control_rx.try_recv() {
            let input = match cmd {
                ControlCmd::Quit => Input::Quit,
                ControlCmd::Raise => {
                    session.app.reset_view();
                    Input::Nothing
                }
                ControlCmd::Play => Input::Player(Command::Play),
                ControlCmd::Pause => Input::Player(Command::Pause),
                ControlCmd::PlayPause => Input::Player(Command::TogglePlayPause),
                ControlCmd::Next => Input::Player(Command::Next),
                ControlCmd::Prev => Input::Player(Command::Prev),
            };
            if handle_input(input, session, settings, audio_player, mpris) {
                return shutdown(session, audio_player);
            }
        }

        if event::poll(Duration::from_millis(50))? {
            let input = match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(key, &mut session.app, &settings.playback)
                }
                TermEvent::Mouse(mouse) => input::handle_mouse(
                    mouse,
                    state.last_area,
                    &mut session.app,
                    &settings.playback,
                ),
                _ => Input::Nothing,
            };
            if handle_input(input, session, settings, audio_player, mpris) {
                return shutdown(session, audio_player);
            }
        }
    }
}

/// Returns true when the app should quit.
fn handle_input(
    input: Input,
    session: &mut Session,
    settings: &config::Settings,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> bool {
    match input {
        Input::Nothing => {}
        Input::Quit => return true,
        Input::Player(cmd) => dispatch(cmd, session, settings, audio_player, mpris),
        Input::Import(root) => {
            begin_import(session, root, settings, true);
        }
    }
    false
}

fn dispatch(
    cmd: Command,
    session: &mut Session,
    settings: &config::Settings,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) {
    let events = session.player.dispatch(cmd);
    apply_events(events, session, settings, audio_player, mpris);
}

/// Turn controller events into side effects: audio, lyrics, theme, saves.
fn apply_events(
    events: Vec<Event>,
    session: &mut Session,
    settings: &config::Settings,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) {
    let now = Instant::now();
    for ev in events {
        if ev.needs_save() {
            session.scheduler.request(now);
        }
        match ev {
            Event::TrackChanged {
                index,
                start_at,
                autoplay,
            } => {
                let Some(track) = session.player.catalog().get(index) else {
                    continue;
                };
                audio_player.load(
                    track.path.clone(),
                    Duration::from_secs_f64(start_at.max(0.0)),
                    autoplay,
                );
                session
                    .app
                    .lyrics
                    .set_lyrics(lyrics::load(&track.path, session.reader.as_ref()));
                session.app.lyrics.update(start_at);
                if settings.ui.cover_theme {
                    let palette = session
                        .palettes
                        .entry(track.path.clone())
                        .or_insert_with(|| palette_for(track.cover.as_deref()));
                    if let Some(palette) = palette {
                        session.app.palette = *palette;
                    }
                }
                session.app.follow(index);
                update_mpris(mpris, &session.player);
            }
            Event::Played => audio_player.send(AudioCmd::Play),
            Event::Paused => audio_player.send(AudioCmd::Pause),
            Event::Restarted => {
                if let Some(track) = session.player.current_track() {
                    audio_player.load(track.path.clone(), Duration::ZERO, true);
                }
                session.app.lyrics.update(0.0);
            }
            Event::Seeked(position) => {
                audio_player.seek(Duration::from_secs_f64(position));
                session.app.lyrics.update(position);
            }
            Event::VolumeChanged(volume) => {
                audio_player.send(AudioCmd::SetVolume(volume));
                mpris.set_volume(volume);
            }
            Event::PlayModeChanged(mode) => {
                session.app.status = Some(format!("Play mode: {}", mode.label()));
            }
            Event::CatalogReplaced => {
                session.palettes.clear();
                session.app.set_catalog(session.player.catalog());
            }
            Event::Stopped => {
                audio_player.send(AudioCmd::Stop);
                session.app.lyrics.set_lyrics(None);
                session.app.palette = Palette::default();
                update_mpris(mpris, &session.player);
            }
        }
    }
}

fn on_media_event(
    ev: MediaEvent,
    session: &mut Session,
    settings: &config::Settings,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) {
    let current = session.player.current_track().map(|t| t.path.clone());
    match ev {
        MediaEvent::Ended { path } if current.as_ref() == Some(&path) => {
            state.consecutive_errors = 0;
            dispatch(Command::TrackEnded, session, settings, audio_player, mpris);
        }
        MediaEvent::Error { path, reason } if current.as_ref() == Some(&path) => {
            warn!(path = %path.display(), %reason, "skipping unplayable track");
            state.consecutive_errors += 1;
            session.app.status = Some(format!("Cannot play {}", path.display()));
            if state.consecutive_errors < session.player.catalog().len() {
                dispatch(Command::Next, session, settings, audio_player, mpris);
            } else {
                dispatch(Command::Pause, session, settings, audio_player, mpris);
            }
        }
        MediaEvent::Unavailable { reason } => {
            session.app.status = Some(format!("No audio output: {reason}"));
        }
        MediaEvent::Ended { .. } | MediaEvent::Error { .. } => {}
    }
}

/// Feed the backend's position into the controller and lyric sync.
fn sync_position(session: &mut Session, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    let info = audio_player.playback();
    let current = session.player.current_track().map(|t| t.path.as_path());
    if !info.is_current(current, audio_player.epoch()) {
        return;
    }
    if info.playing && !info.position.is_zero() {
        state.consecutive_errors = 0;
    }
    session.player.dispatch(Command::Tick {
        position: info.position.as_secs_f64(),
        duration: info.duration.map(|d| d.as_secs_f64()),
    });
    session.app.lyrics.update(session.player.position());
}

fn maybe_save(session: &mut Session, now: Instant) {
    if !session.scheduler.due(now) {
        return;
    }
    let snapshot = session.player.snapshot();
    if session.scheduler.should_write(&snapshot, now) && session.bridge.save(&snapshot) {
        session.scheduler.mark_written(snapshot);
    }
}

fn shutdown(
    session: &mut Session,
    audio_player: &AudioPlayer,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = session.player.snapshot();
    if session.scheduler.should_write(&snapshot, Instant::now()) {
        session.bridge.save(&snapshot);
    }
    info!("shutting down");
    audio_player.quit_softly(QUIT_FADE_OUT);
    Ok(())
}
