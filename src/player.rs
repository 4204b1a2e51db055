//! Playback controller: the single owner of the catalog and transport state.
//!
//! UI keys, tray commands and media notifications all arrive as [`Command`]s;
//! the controller answers with the [`Event`]s the runtime must act on.

mod command;
mod controller;
mod mode;
mod snapshot;

pub use command::{Command, Direction, Event};
pub use controller::Controller;
pub use mode::PlayMode;
pub use snapshot::PlaybackSnapshot;

#[cfg(test)]
mod tests;
