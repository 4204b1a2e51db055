//! Background folder imports.
//!
//! Every import gets a generation number. Starting a new import cancels the
//! previous worker, and any result whose generation is not the latest is
//! dropped, so a slow stale scan can never replace a newer catalog.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use std::sync::mpsc::RecvTimeoutError;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
#[cfg(test)]
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::LibrarySettings;

use super::model::Track;
use super::scan::scan_until;
use super::tags::TagReader;

/// Result of one finished scan.
#[derive(Debug)]
pub struct ScanOutcome {
    pub generation: u64,
    pub root: PathBuf,
    pub tracks: Vec<Track>,
}

pub struct Importer {
    reader: Arc<dyn TagReader>,
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
    tx: Sender<ScanOutcome>,
    rx: Receiver<ScanOutcome>,
}

impl Importer {
    pub fn new(reader: Arc<dyn TagReader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            reader,
            generation: 0,
            cancel: None,
            tx,
            rx,
        }
    }

    /// Generation of the most recently started import.
    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the latest import has not reported back yet.
    #[cfg(test)]
    pub fn is_scanning(&self) -> bool {
        self.cancel.is_some()
    }

    /// Start scanning `root` on a worker thread, superseding any running scan.
    pub fn start(&mut self, root: PathBuf, settings: LibrarySettings) -> u64 {
        if let Some(previous) = self.cancel.take() {
            previous.store(true, Ordering::Relaxed);
        }

        self.generation += 1;
        let generation = self.generation;
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(cancel.clone());

        let reader = self.reader.clone();
        let tx = self.tx.clone();
        info!(generation, root = %root.display(), "starting library import");

        thread::spawn(move || {
            let tracks = scan_until(&root, &settings, reader.as_ref(), &cancel);
            if cancel.load(Ordering::Relaxed) {
                debug!(generation, "import superseded before completion");
                return;
            }
            let _ = tx.send(ScanOutcome {
                generation,
                root,
                tracks,
            });
        });

        generation
    }

    /// Keep `outcome` only if it belongs to the latest import.
    pub fn accept(&mut self, outcome: ScanOutcome) -> Option<ScanOutcome> {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                latest = self.generation,
                "discarding stale import result"
            );
            return None;
        }
        self.cancel = None;
        Some(outcome)
    }

    /// Non-blocking poll for the latest import's result.
    pub fn try_recv(&mut self) -> Option<ScanOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(accepted) = self.accept(outcome) {
                return Some(accepted);
            }
        }
        None
    }

    /// Block up to `timeout` for the latest import's result.
    #[cfg(test)]
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<ScanOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(accepted) = self.accept(outcome) {
                        return Some(accepted);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }
}
