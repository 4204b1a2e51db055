use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::AudioPlayer;
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod input;
mod mpris_sync;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_error) = settings::load_settings();

    // The guard flushes buffered log lines when dropped at the end of `run`.
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("dreamplay: logging disabled: {e}");
            None
        }
    };
    if let Some(e) = config_error {
        warn!(error = %e, "config unusable, using defaults");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "dreamplay starting");

    let folder_arg = env::args().nth(1).map(PathBuf::from);
    let mut session = startup::start_session(&settings, folder_arg);

    let audio_player = AudioPlayer::new(session.player.volume());
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut session,
        &audio_player,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
