//! Frame sources for offline runs.

pub mod recording;

pub use recording::{PoseEntry, RecordedFrame, Recording};
