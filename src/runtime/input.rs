//! Keyboard and mouse handling.
//!
//! View-only changes (cursor, search text, import prompt) are applied to
//! [`App`] directly; anything that touches playback comes back as an
//! [`Input::Player`] command for the controller.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::config::PlaybackSettings;
use crate::player::Command;
use crate::ui;

#[derive(Debug, PartialEq)]
pub enum Input {
    Nothing,
    Quit,
    Player(Command),
    Import(PathBuf),
}

fn selected_track(app: &App) -> Input {
    match app.selected_visible() {
        Some(i) => Input::Player(Command::Select(i)),
        None => Input::Nothing,
    }
}

pub fn handle_key(key: KeyEvent, app: &mut App, playback: &PlaybackSettings) -> Input {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Input::Quit;
    }

    if app.is_importing() {
        match key.code {
            KeyCode::Esc => app.cancel_import(),
            KeyCode::Enter => {
                if let Some(dir) = app.submit_import() {
                    return Input::Import(dir);
                }
            }
            KeyCode::Backspace => app.pop_import_char(),
            KeyCode::Char(c) if !c.is_control() => app.push_import_char(c),
            _ => {}
        }
        return Input::Nothing;
    }

    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char('j') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.next()
            }
            KeyCode::Char('k') | KeyCode::Char('p')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.prev()
            }
            KeyCode::Enter => {
                app.exit_filter_mode();
                return selected_track(app);
            }
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return Input::Nothing;
    }

    let step = playback.volume_step;
    let seek = playback.seek_seconds as f64;
    match key.code {
        KeyCode::Char('q') => return Input::Quit,
        KeyCode::Char(' ') => return Input::Player(Command::TogglePlayPause),
        KeyCode::Char('n') => return Input::Player(Command::Next),
        KeyCode::Char('p') => return Input::Player(Command::Prev),
        KeyCode::Char('l') | KeyCode::Right => return Input::Player(Command::SeekBy(seek)),
        KeyCode::Char('h') | KeyCode::Left => return Input::Player(Command::SeekBy(-seek)),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            return Input::Player(Command::AdjustVolume(step));
        }
        KeyCode::Char('-') => return Input::Player(Command::AdjustVolume(-step)),
        KeyCode::Char('m') => return Input::Player(Command::CyclePlayMode),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0) as f64;
            return Input::Player(Command::SeekFraction(tenth / 10.0));
        }
        KeyCode::Tab => app.toggle_drawer(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('o') => app.open_import(),
        KeyCode::Esc => app.reset_view(),
        KeyCode::Char('j') | KeyCode::Down if app.drawer_open => app.next(),
        KeyCode::Char('k') | KeyCode::Up if app.drawer_open => app.prev(),
        KeyCode::Up => return Input::Player(Command::AdjustVolume(step)),
        KeyCode::Down => return Input::Player(Command::AdjustVolume(-step)),
        KeyCode::Enter if app.drawer_open => return selected_track(app),
        _ => {}
    }
    Input::Nothing
}

/// Wheel changes volume; clicks seek on the progress bar or play a
/// playlist row.
pub fn handle_mouse(
    mouse: MouseEvent,
    area: Rect,
    app: &mut App,
    playback: &PlaybackSettings,
) -> Input {
    if app.is_importing() {
        return Input::Nothing;
    }
    let step = playback.volume_step;
    match mouse.kind {
        MouseEventKind::ScrollUp => Input::Player(Command::AdjustVolume(step)),
        MouseEventKind::ScrollDown => Input::Player(Command::AdjustVolume(-step)),
        MouseEventKind::Down(MouseButton::Left) => {
            let areas = ui::areas(area, app.drawer_open);
            if let Some(fraction) = ui::seek_fraction_at(areas.progress, mouse.column, mouse.row) {
                return Input::Player(Command::SeekFraction(fraction));
            }
            let Some(playlist) = areas.playlist else {
                return Input::Nothing;
            };
            let inside = mouse.column >= playlist.x && mouse.column < playlist.x + playlist.width;
            if !inside {
                return Input::Nothing;
            }
            let visible = app.visible_indices();
            match ui::playlist_hit(playlist, &visible, app.selected, mouse.row) {
                Some(i) => {
                    app.selected = i;
                    Input::Player(Command::Select(i))
                }
                None => Input::Nothing,
            }
        }
        _ => Input::Nothing,
    }
}
