//! Playback state persistence.
//!
//! A small key-value store on disk, the bridge that maps controller state to
//! and from it, and the scheduler that decides when to write.

mod bridge;
mod schedule;
mod store;

pub use bridge::{MUSIC_FOLDER_KEY, PLAYBACK_STATE_KEY, StateBridge};
pub use schedule::SaveScheduler;
pub use store::{JsonFileStore, KvStore, MemoryStore};
