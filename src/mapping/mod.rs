//! Mapping: turns per-frame detections into an incrementally built object map.
//!
//! This module implements the mapping cycle:
//! - Object extraction (pixels → sensor points → map-frame objects)
//! - Data association (nearest same-label centroid)
//! - Map merging (grow matched objects, append the rest)

pub mod association;
pub mod detection;
pub mod mapper;
pub mod result;
pub mod state;

pub use association::{AssociationTable, find_associations};
pub use detection::{Detection, Pixel, PointField};
pub use mapper::{MIN_DETECTION_PIXELS, MIN_POINT_NORM, Mapper};
pub use result::{ExtractionStats, ExtractionTarget, FrameSummary, MergeStats, TimingStats};
pub use state::MapperState;
