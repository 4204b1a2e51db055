use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::error::Error;

use super::sink::create_sink_at;
use super::types::{AudioCmd, MediaEvent, PlayClock, PlaybackHandle};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The loaded file and the sink playing it.
struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
}

struct Backend {
    stream: OutputStream,
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
    current: Option<Loaded>,
    paused: bool,
    clock: PlayClock,
    volume: f32,
    epoch: u64,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = Error::from(e);
                error!(error = %err, "playback disabled");
                let _ = events.send(MediaEvent::Unavailable {
                    reason: err.to_string(),
                });
                drain_until_quit(&rx);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut backend = Backend {
            stream,
            events,
            playback_info,
            current: None,
            paused: true,
            clock: PlayClock::default(),
            volume: volume.clamp(0.0, 1.0),
            epoch: 0,
        };

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    backend.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => backend.handle(cmd),
                Err(RecvTimeoutError::Timeout) => backend.check_ended(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            backend.publish();
        }
        debug!("audio thread exiting");
    })
}

fn drain_until_quit(rx: &Receiver<AudioCmd>) {
    while let Ok(cmd) = rx.recv() {
        if matches!(cmd, AudioCmd::Quit { .. }) {
            break;
        }
    }
}

impl Backend {
    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load {
                path,
                start_at,
                autoplay,
                epoch,
            } => {
                self.load(path, start_at, autoplay);
                self.epoch = epoch;
            }
            AudioCmd::Play => self.set_paused(false),
            AudioCmd::Pause => self.set_paused(true),
            AudioCmd::Seek { position, epoch } => {
                self.seek(position);
                self.epoch = epoch;
            }
            AudioCmd::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(loaded) = &self.current {
                    loaded.sink.set_volume(self.volume);
                }
            }
            AudioCmd::Stop => self.stop(),
            AudioCmd::Quit { .. } => {}
        }
    }

    fn load(&mut self, path: PathBuf, start_at: Duration, autoplay: bool) {
        self.stop();
        match create_sink_at(&self.stream, &path, start_at, self.volume) {
            Ok((sink, duration)) => {
                if autoplay {
                    sink.play();
                }
                info!(path = %path.display(), start_at = start_at.as_secs_f64(), autoplay, "loaded track");
                self.current = Some(Loaded {
                    path,
                    sink,
                    duration,
                });
                self.paused = !autoplay;
                self.clock.reset(start_at, autoplay, Instant::now());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load track");
                let _ = self.events.send(MediaEvent::Error {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        let Some(loaded) = &self.current else {
            return;
        };
        if paused == self.paused {
            return;
        }
        let now = Instant::now();
        if paused {
            loaded.sink.pause();
            self.clock.pause(now);
        } else {
            loaded.sink.play();
            self.clock.resume(now);
        }
        self.paused = paused;
    }

    /// Scrubbing: rebuild the current sink and skip into the file.
    fn seek(&mut self, position: Duration) {
        let Some(loaded) = self.current.take() else {
            return;
        };
        loaded.sink.stop();
        let autoplay = !self.paused;
        self.load(loaded.path, position, autoplay);
    }

    fn stop(&mut self) {
        if let Some(loaded) = self.current.take() {
            loaded.sink.stop();
        }
        self.paused = true;
        self.clock.reset(Duration::ZERO, false, Instant::now());
    }

    /// Periodic check for a finished sink.
    fn check_ended(&mut self) {
        let finished = self
            .current
            .as_ref()
            .is_some_and(|loaded| !self.paused && loaded.sink.empty());
        if !finished {
            return;
        }
        if let Some(loaded) = self.current.take() {
            debug!(path = %loaded.path.display(), "track ended");
            self.paused = true;
            self.clock.pause(Instant::now());
            let _ = self.events.send(MediaEvent::Ended { path: loaded.path });
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(loaded) = &self.current {
            // Fade out gently before stopping.
            fade_out_sink(&loaded.sink, self.volume, fade_out_ms);
            loaded.sink.stop();
        }
        self.current = None;
        self.paused = true;
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.publish();
    }

    fn publish(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.path = self.current.as_ref().map(|l| l.path.clone());
            info.duration = self.current.as_ref().and_then(|l| l.duration);
            info.position = self.clock.elapsed(Instant::now());
            info.playing = self.current.is_some() && !self.paused;
            info.epoch = self.epoch;
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 || sink.is_paused() {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
