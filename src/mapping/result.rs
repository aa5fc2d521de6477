//! Per-cycle diagnostics.
//!
//! These types describe what happened while processing a single frame:
//! - how many detections turned into objects, and why the rest did not
//! - how many local objects were merged into existing ones or added
//! - timing information for profiling
//!
//! They are reported for observability only; the mapper's contract is the
//! mutation of its maps.

use super::state::MapperState;

/// Map an extraction wrote into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTarget {
    Global,
    Local,
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub target: ExtractionTarget,
    pub n_detections: usize,
    /// Detections dropped for having fewer than the minimum pixel count.
    pub n_too_few_pixels: usize,
    /// Detections dropped because none of their points were valid.
    pub n_no_valid_points: usize,
    pub n_objects: usize,
    pub n_points_accepted: usize,
    /// Points outside the image, non-finite, or below the validity norm.
    pub n_points_rejected: usize,
}

impl ExtractionStats {
    pub fn new(target: ExtractionTarget) -> Self {
        Self {
            target,
            n_detections: 0,
            n_too_few_pixels: 0,
            n_no_valid_points: 0,
            n_objects: 0,
            n_points_accepted: 0,
            n_points_rejected: 0,
        }
    }
}

/// Outcome of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub merged: usize,
    pub added: usize,
    /// Associated pairs whose labels disagreed at merge time.
    pub skipped: usize,
}

/// Timing breakdown for a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingStats {
    pub total_ms: f64,
    pub extract_ms: f64,
    pub associate_ms: f64,
    pub merge_ms: f64,
}

/// Summary of a full extract, associate and merge cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    /// Zero-based index of the frame within the session.
    pub frame_idx: u64,
    /// State after the cycle.
    pub state: MapperState,
    pub extraction: ExtractionStats,
    pub n_associations: usize,
    pub merge: MergeStats,
    pub global_size: usize,
    pub timing: TimingStats,
}
