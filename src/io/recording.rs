//! Recorded frame sequences.
//!
//! A recording is a directory holding everything the mapper consumes per
//! frame, already resolved by the upstream pose provider, detector and depth
//! source:
//!
//! ```text
//! <root>/
//!   recording.yaml              width / height of the image grid
//!   poses.csv                   timestamp_ns, tx, ty, tz, qw, qx, qy, qz
//!   detections/<ts>.yaml        [{label, color: [r, g, b], pixels: [[row, col], ...]}]
//!   points/<ts>.csv             row, col, x, y, z   (sensor frame, sparse)
//! ```
//!
//! Frames are enumerated from `poses.csv`. Pixels absent from the points
//! file hold the zero sentinel.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use nalgebra::Vector3;
use serde::Deserialize;
use tracing::warn;

use crate::geometry::SE3;
use crate::mapping::{Detection, Pixel, PointField};

#[derive(Debug, Clone)]
pub struct PoseEntry {
    pub timestamp_ns: u64,
    /// Robot pose in the map frame.
    pub pose: SE3,
}

/// Everything the mapper needs for one frame.
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub timestamp_ns: u64,
    pub robot_to_world: SE3,
    pub detections: Vec<Detection>,
    pub points: PointField,
}

#[derive(Debug, Deserialize)]
struct RecordingYaml {
    width: u32,
    height: u32,
}

#[derive(Debug)]
pub struct Recording {
    root: PathBuf,
    pub width: u32,
    pub height: u32,
    pub poses: Vec<PoseEntry>,
}

impl Recording {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let meta_path = root.join("recording.yaml");
        let meta: RecordingYaml = serde_yaml::from_reader(
            File::open(&meta_path)
                .with_context(|| format!("Failed to open {}", meta_path.display()))?,
        )
        .with_context(|| format!("Failed to parse {}", meta_path.display()))?;

        if meta.width == 0 || meta.height == 0 {
            bail!("Image grid must be non-empty, got {}x{}", meta.width, meta.height);
        }

        let poses = load_pose_list(root.join("poses.csv"))?;

        Ok(Self {
            root,
            width: meta.width,
            height: meta.height,
            poses,
        })
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn frame_timestamp(&self, idx: usize) -> Option<u64> {
        self.poses.get(idx).map(|e| e.timestamp_ns)
    }

    /// Load frame `idx`.
    ///
    /// A frame without a detections file has no detections; a frame without
    /// a points file gets an all-invalid field. Both are logged.
    pub fn frame(&self, idx: usize) -> Result<RecordedFrame> {
        let entry = self
            .poses
            .get(idx)
            .with_context(|| format!("No frame at index {}", idx))?;
        let ts = entry.timestamp_ns;

        let detections_path = self.root.join("detections").join(format!("{}.yaml", ts));
        let detections = if detections_path.exists() {
            load_detections(&detections_path)?
        } else {
            warn!("No detections for frame {} ({}), treating as empty", idx, ts);
            Vec::new()
        };

        let points_path = self.root.join("points").join(format!("{}.csv", ts));
        let points = if points_path.exists() {
            load_point_field(&points_path, self.width, self.height)?
        } else {
            warn!("No points for frame {} ({}), all pixels invalid", idx, ts);
            PointField::zeros(self.width, self.height)
        };

        Ok(RecordedFrame {
            timestamp_ns: ts,
            robot_to_world: entry.pose.clone(),
            detections,
            points,
        })
    }

    /// Iterate over all frames in order.
    pub fn frames(&self) -> impl Iterator<Item = Result<RecordedFrame>> + '_ {
        (0..self.len()).map(move |i| self.frame(i))
    }
}

fn load_pose_list(csv_path: PathBuf) -> Result<Vec<PoseEntry>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .from_path(&csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;

    let mut entries = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        // CSV format: timestamp, tx, ty, tz, qw, qx, qy, qz
        if rec.len() < 8 {
            continue;
        }
        let ts: u64 = rec[0].trim().parse()?;
        let translation = Vector3::new(
            rec[1].trim().parse()?,
            rec[2].trim().parse()?,
            rec[3].trim().parse()?,
        );
        let qw: f64 = rec[4].trim().parse()?;
        let qx: f64 = rec[5].trim().parse()?;
        let qy: f64 = rec[6].trim().parse()?;
        let qz: f64 = rec[7].trim().parse()?;

        entries.push(PoseEntry {
            timestamp_ns: ts,
            pose: SE3::from_quaternion(qw, qx, qy, qz, translation),
        });
    }
    Ok(entries)
}

fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_point_field(csv_path: &Path, width: u32, height: u32) -> Result<PointField> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .from_path(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;

    let mut field = PointField::zeros(width, height);
    let mut n_outside = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        // CSV format: row, col, x, y, z
        if rec.len() < 5 {
            continue;
        }
        let pixel = Pixel::new(rec[0].trim().parse()?, rec[1].trim().parse()?);
        let point = Vector3::new(
            rec[2].trim().parse()?,
            rec[3].trim().parse()?,
            rec[4].trim().parse()?,
        );
        if !field.set(pixel, point) {
            n_outside += 1;
        }
    }

    if n_outside > 0 {
        warn!(
            "{}: {} points outside the {}x{} grid were ignored",
            csv_path.display(),
            n_outside,
            width,
            height
        );
    }
    Ok(field)
}
