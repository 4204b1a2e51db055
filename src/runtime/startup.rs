use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::app::App;
use crate::config;
use crate::library::{Importer, LoftyTagReader, ScanOutcome, TagReader};
use crate::persist::{JsonFileStore, KvStore, MemoryStore, SaveScheduler, StateBridge};
use crate::player::{Command, Controller, Event, PlaybackSnapshot};
use crate::theme::Palette;

/// Everything the event loop owns besides the terminal and worker handles.
pub struct Session {
    pub player: Controller,
    pub app: App,
    pub bridge: StateBridge<Box<dyn KvStore>>,
    pub scheduler: SaveScheduler,
    pub importer: Importer,
    pub reader: Arc<dyn TagReader>,
    /// Saved state waiting for the import with this generation to finish.
    pub pending_restore: Option<(u64, PlaybackSnapshot)>,
    /// A user-started import: play the first track when it lands and
    /// nothing is selected.
    pub autoplay_generation: Option<u64>,
    /// Cover palettes by track path, `None` when the cover had no usable colour.
    pub palettes: HashMap<PathBuf, Option<Palette>>,
}

fn open_store(settings: &config::PersistenceSettings) -> Box<dyn KvStore> {
    match settings
        .state_path
        .clone()
        .or_else(JsonFileStore::default_path)
    {
        Some(path) => Box::new(JsonFileStore::open_or_empty(path)),
        None => {
            warn!("no data directory, playback state will not persist");
            Box::new(MemoryStore::default())
        }
    }
}

/// Build the session and kick off the first import.
///
/// `folder_arg` wins over the saved folder. Saved playback state is only
/// restored when the folder being scanned is the one it was saved for.
/// With no folder at all the import prompt opens.
pub fn start_session(settings: &config::Settings, folder_arg: Option<PathBuf>) -> Session {
    let bridge = StateBridge::new(open_store(&settings.persistence));
    let saved = bridge.load();
    let saved_folder = bridge.music_folder();

    let mut app = App::new();
    app.header_text = settings.ui.header_text.clone();
    app.lyrics_placeholder = settings.ui.lyrics_placeholder.clone();
    app.drawer_open = settings.ui.drawer_open;

    let reader: Arc<dyn TagReader> = Arc::new(LoftyTagReader);
    let scheduler = SaveScheduler::new(
        Duration::from_secs(settings.persistence.autosave_secs),
        Duration::from_millis(settings.persistence.debounce_ms),
        Instant::now(),
    )
    .with_last_written(saved.clone());

    let mut session = Session {
        player: Controller::new(settings.playback.volume, settings.playback.play_mode.into()),
        app,
        bridge,
        scheduler,
        importer: Importer::new(reader.clone()),
        reader,
        pending_restore: None,
        autoplay_generation: None,
        palettes: HashMap::new(),
    };

    match (folder_arg, saved_folder) {
        (Some(arg), Some(saved_dir)) if arg == saved_dir => {
            let generation = begin_import(&mut session, arg, settings, false);
            session.pending_restore = saved.map(|s| (generation, s));
        }
        (Some(arg), _) => {
            session.bridge.save_music_folder(&arg);
            begin_import(&mut session, arg, settings, false);
        }
        (None, Some(saved_dir)) => {
            let generation = begin_import(&mut session, saved_dir, settings, false);
            session.pending_restore = saved.map(|s| (generation, s));
        }
        (None, None) => {
            info!("no music folder yet, asking for one");
            session.app.open_import();
        }
    }

    session
}

/// Start scanning `root`. A user import is remembered as the music folder
/// and drops any saved state still waiting to be restored.
pub fn begin_import(
    session: &mut Session,
    root: PathBuf,
    settings: &config::Settings,
    user: bool,
) -> u64 {
    session.app.status = Some(format!("Scanning {}…", root.display()));
    session.app.current_dir = Some(root.clone());
    if user {
        session.bridge.save_music_folder(&root);
        session.pending_restore = None;
    }
    let generation = session.importer.start(root, settings.library.clone());
    if user {
        session.autoplay_generation = Some(generation);
    }
    generation
}

/// Land a finished import on the controller and return what changed.
///
/// The catalog is replaced first. Saved state waiting on this generation is
/// restored next, and a user import then starts the first track if nothing
/// ended up selected.
pub fn finish_import(session: &mut Session, outcome: ScanOutcome) -> Vec<Event> {
    let ScanOutcome {
        generation,
        root,
        tracks,
    } = outcome;
    let count = tracks.len();
    session.app.status = Some(if count == 0 {
        format!("No audio files in {}", root.display())
    } else {
        format!("{count} tracks in {}", root.display())
    });

    let mut events = session.player.dispatch(Command::ReplaceCatalog(tracks));

    match session.pending_restore.take() {
        Some((pending, snapshot)) if pending == generation => {
            events.extend(session.player.dispatch(Command::Restore(snapshot)));
        }
        Some((pending, snapshot)) if pending > generation => {
            session.pending_restore = Some((pending, snapshot));
        }
        _ => {}
    }

    if session.autoplay_generation == Some(generation) {
        session.autoplay_generation = None;
        if session.player.is_idle() && count > 0 {
            events.extend(session.player.dispatch(Command::Select(0)));
        }
    }

    events
}
