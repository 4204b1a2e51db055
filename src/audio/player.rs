use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaEvent, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
    epoch: AtomicU64,
}

impl AudioPlayer {
    pub fn new(volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, events) = mpsc::channel::<MediaEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, event_tx, playback_info.clone(), volume);

        Self {
            tx,
            events,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
            epoch: AtomicU64::new(0),
        }
    }

    /// Copy of the shared playback info.
    pub fn playback(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    /// Epoch of the most recent load or seek sent to the thread.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Relaxed)
    }

    fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn load(&self, path: PathBuf, start_at: Duration, autoplay: bool) {
        let epoch = self.next_epoch();
        self.send(AudioCmd::Load {
            path,
            start_at,
            autoplay,
            epoch,
        });
    }

    pub fn seek(&self, position: Duration) {
        let epoch = self.next_epoch();
        self.send(AudioCmd::Seek { position, epoch });
    }

    /// Send a command. A dead audio thread is logged, not an error.
    pub fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            debug!(cmd = ?e.0, "audio thread gone, dropping command");
        }
    }

    /// Next pending media event, if any.
    pub fn try_event(&self) -> Option<MediaEvent> {
        match self.events.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
