//! Domain types

mod quality;
mod queue_entry;
mod repeat;

pub use quality::{ArtworkSize, AudioQuality};
pub use queue_entry::QueueEntry;
pub use repeat::RepeatMode;
