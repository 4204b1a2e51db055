use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::library::Track;

use super::command::{Command, Direction, Event};
use super::mode::PlayMode;
use super::snapshot::PlaybackSnapshot;

/// Owns the catalog plus everything in [`PlaybackSnapshot`].
///
/// Idle means `current == None`. Every mutation goes through a method that
/// keeps `current` a valid catalog index.
pub struct Controller {
    catalog: Vec<Track>,
    current: Option<usize>,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    mode: PlayMode,
    rng: StdRng,
}

impl Controller {
    pub fn new(volume: f32, mode: PlayMode) -> Self {
        Self {
            catalog: Vec::new(),
            current: None,
            playing: false,
            position: 0.0,
            duration: None,
            volume: volume.clamp(0.0, 1.0),
            mode,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.catalog.get(i))
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Seconds into the current track.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Progress through the current track in `[0, 1]`, if the duration is known.
    pub fn progress(&self) -> Option<f64> {
        let duration = self.duration.filter(|d| *d > 0.0)?;
        Some((self.position / duration).clamp(0.0, 1.0))
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current.map_or(-1, |i| i as i64),
            current_time: self.position,
            volume: self.volume,
            play_mode: self.mode,
            is_playing: self.playing,
        }
    }

    pub fn dispatch(&mut self, cmd: Command) -> Vec<Event> {
        match cmd {
            Command::Select(i) => self.select_track(i, 0.0, true),
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Play => {
                if self.playing {
                    Vec::new()
                } else {
                    self.toggle_play_pause()
                }
            }
            Command::Pause => {
                if self.playing {
                    self.toggle_play_pause()
                } else {
                    Vec::new()
                }
            }
            Command::Next => self.advance(Direction::Next, false),
            Command::Prev => self.advance(Direction::Prev, false),
            Command::TrackEnded => self.advance(Direction::Next, true),
            Command::CyclePlayMode => self.cycle_play_mode(),
            Command::AdjustVolume(delta) => self.adjust_volume(delta),
            Command::Seek(position) => self.seek(position),
            Command::SeekBy(delta) => self.seek(self.position + delta),
            Command::SeekFraction(fraction) => match self.duration {
                Some(d) => self.seek(fraction.clamp(0.0, 1.0) * d),
                None => Vec::new(),
            },
            Command::Tick { position, duration } => {
                self.tick(position, duration);
                Vec::new()
            }
            Command::ReplaceCatalog(tracks) => self.replace_catalog(tracks),
            Command::Restore(snapshot) => self.restore(&snapshot),
        }
    }

    /// Load track `index`. Invalid indices are ignored.
    pub fn select_track(&mut self, index: usize, start_at: f64, autoplay: bool) -> Vec<Event> {
        if index >= self.catalog.len() {
            warn!(index, len = self.catalog.len(), "ignoring out-of-range track selection");
            return Vec::new();
        }

        self.current = Some(index);
        self.position = start_at.max(0.0);
        self.duration = self.catalog[index].duration.map(|d| d.as_secs_f64());
        self.playing = autoplay;
        debug!(index, start_at = self.position, autoplay, "track selected");

        vec![Event::TrackChanged {
            index,
            start_at: self.position,
            autoplay,
        }]
    }

    pub fn toggle_play_pause(&mut self) -> Vec<Event> {
        if self.current.is_none() {
            if self.catalog.is_empty() {
                return Vec::new();
            }
            return self.select_track(0, 0.0, true);
        }

        self.playing = !self.playing;
        if self.playing {
            vec![Event::Played]
        } else {
            vec![Event::Paused]
        }
    }

    /// Move to the next/previous track per the play mode. `automatic` marks
    /// a natural end of track, which repeat-one turns into a rewind.
    pub fn advance(&mut self, direction: Direction, automatic: bool) -> Vec<Event> {
        if self.catalog.is_empty() {
            return Vec::new();
        }

        if automatic && self.mode == PlayMode::RepeatOne && self.current.is_some() {
            self.position = 0.0;
            self.playing = true;
            return vec![Event::Restarted];
        }

        let next = self.next_index(direction);
        self.select_track(next, 0.0, true)
    }

    fn next_index(&mut self, direction: Direction) -> usize {
        let len = self.catalog.len();
        if self.mode == PlayMode::Shuffle {
            return self.rng.gen_range(0..len);
        }

        match (direction, self.current) {
            (Direction::Next, Some(i)) => (i + 1) % len,
            (Direction::Next, None) => 0,
            (Direction::Prev, Some(i)) => (i + len - 1) % len,
            (Direction::Prev, None) => len - 1,
        }
    }

    pub fn cycle_play_mode(&mut self) -> Vec<Event> {
        self.mode = self.mode.cycle();
        vec![Event::PlayModeChanged(self.mode)]
    }

    pub fn adjust_volume(&mut self, delta: f32) -> Vec<Event> {
        let volume = ((self.volume + delta).clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        if volume == self.volume {
            return Vec::new();
        }
        self.volume = volume;
        vec![Event::VolumeChanged(volume)]
    }

    /// Jump within the current track, clamped to `[0, duration]`.
    pub fn seek(&mut self, position: f64) -> Vec<Event> {
        if self.current.is_none() || !position.is_finite() {
            return Vec::new();
        }
        let mut position = position.max(0.0);
        if let Some(d) = self.duration {
            position = position.min(d);
        }
        self.position = position;
        vec![Event::Seeked(position)]
    }

    /// Record the backend's position report. Ignored while idle.
    pub fn tick(&mut self, position: f64, duration: Option<f64>) {
        if self.current.is_none() {
            return;
        }
        self.position = position.max(0.0);
        if duration.is_some() {
            self.duration = duration;
        }
    }

    /// Swap in a freshly imported catalog. The current track stays selected
    /// if its path is still present; otherwise playback stops.
    pub fn replace_catalog(&mut self, tracks: Vec<Track>) -> Vec<Event> {
        let previous = self.current_track().map(|t| t.path.clone());
        self.catalog = tracks;
        info!(count = self.catalog.len(), "catalog replaced");

        let mut events = vec![Event::CatalogReplaced];
        let remapped = previous
            .as_ref()
            .and_then(|p| self.catalog.iter().position(|t| &t.path == p));

        match remapped {
            Some(i) => self.current = Some(i),
            None if self.current.is_some() => {
                self.current = None;
                self.playing = false;
                self.position = 0.0;
                self.duration = None;
                events.push(Event::Stopped);
            }
            None => {}
        }
        events
    }

    /// Rehydrate from saved state. A snapshot whose index is neither `-1`
    /// nor valid for the current catalog is dropped entirely and the
    /// controller stays idle.
    pub fn restore(&mut self, snapshot: &PlaybackSnapshot) -> Vec<Event> {
        let index = snapshot.index_within(self.catalog.len());
        if snapshot.current_index != -1 && index.is_none() {
            warn!(
                index = snapshot.current_index,
                len = self.catalog.len(),
                "saved track index out of range, ignoring saved state"
            );
            return Vec::new();
        }

        let mut events = Vec::new();
        let volume = snapshot.volume.clamp(0.0, 1.0);
        if volume != self.volume {
            self.volume = volume;
            events.push(Event::VolumeChanged(volume));
        }
        if snapshot.play_mode != self.mode {
            self.mode = snapshot.play_mode;
            events.push(Event::PlayModeChanged(self.mode));
        }
        if let Some(i) = index {
            let start_at = if snapshot.current_time.is_finite() {
                snapshot.current_time
            } else {
                0.0
            };
            events.extend(self.select_track(i, start_at, snapshot.is_playing));
        }
        info!(index = ?index, playing = snapshot.is_playing, "playback state restored");
        events
    }
}
