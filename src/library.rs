//! Music library: track model, tag extraction and folder scanning.
//!
//! `scan` walks a folder synchronously; `Importer` runs scans on a worker
//! thread and drops results that a newer import has superseded.

mod cover;
mod import;
mod model;
mod scan;
mod tags;

pub use cover::{data_uri, decode_data_uri};
pub use import::{Importer, ScanOutcome};
pub use model::{Track, UNKNOWN_ARTIST, file_url};
#[cfg(test)]
pub use scan::scan;
pub use scan::scan_until;
pub use tags::{LoftyTagReader, Picture, TagReader, TrackTags};

#[cfg(test)]
mod tests;
