//! Media backend.
//!
//! A dedicated thread owns the `rodio` output stream and plays one file at a
//! time. The rest of the app drives it with [`AudioCmd`]s, reads position
//! from a shared [`PlaybackInfo`] and hears about track ends and decode
//! failures through [`MediaEvent`]s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, MediaEvent, PlayClock, PlaybackInfo};
