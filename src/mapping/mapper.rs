//! Mapper - Builds the object map frame by frame.
//!
//! Every frame runs one cycle:
//! 1. Extract objects from the frame's detections
//! 2. Associate the extracted (local) objects with the global map
//! 3. Merge associated objects and append the rest
//!
//! The very first extraction seeds the global map directly; association and
//! merging only start once a local map exists. The global map only grows:
//! objects are never removed, boxes only expand and point sets only get
//! longer.

use std::time::Instant;

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::MapperConfig;
use crate::geometry::{SE3, SensorMount};
use crate::map::{GlobalMap, LocalMap, Object};

use super::association::{AssociationTable, find_associations};
use super::detection::{Detection, PointField};
use super::result::{
    ExtractionStats, ExtractionTarget, FrameSummary, MergeStats, TimingStats,
};
use super::state::MapperState;

/// Detections with fewer pixels than this are treated as noise.
pub const MIN_DETECTION_PIXELS: usize = 10;

/// Sensor points with a smaller norm carry no measurement.
pub const MIN_POINT_NORM: f64 = 1e-3;

/// Object-level mapper owning the global and local maps.
///
/// Processing is synchronous: each call runs to completion, and consumers
/// should only read the maps between cycles.
#[derive(Debug)]
pub struct Mapper {
    global_map: GlobalMap,
    local_map: LocalMap,
    associations: AssociationTable,
    state: MapperState,

    /// Robot pose in the map frame for the frame being processed.
    robot_to_world: SE3,

    /// Fixed offset between the robot base and the depth sensor.
    mount: SensorMount,

    /// Number of extractions performed so far.
    frame_count: u64,
}

impl Mapper {
    /// Create a mapper using the configured sensor mount.
    pub fn new(config: &MapperConfig) -> Self {
        Self::with_mount(config.sensor_mount.to_sensor_mount())
    }

    pub fn with_mount(mount: SensorMount) -> Self {
        Self {
            global_map: GlobalMap::new(),
            local_map: LocalMap::new(),
            associations: AssociationTable::new(),
            state: MapperState::Unseeded,
            robot_to_world: SE3::identity(),
            mount,
            frame_count: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn global_map(&self) -> &GlobalMap {
        &self.global_map
    }

    pub fn local_map(&self) -> &LocalMap {
        &self.local_map
    }

    pub fn associations(&self) -> &AssociationTable {
        &self.associations
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    pub fn mount(&self) -> &SensorMount {
        &self.mount
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Set the robot pose for the next extraction.
    pub fn set_robot_pose(&mut self, robot_to_world: SE3) {
        self.robot_to_world = robot_to_world;
    }

    pub fn robot_pose(&self) -> &SE3 {
        &self.robot_to_world
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Turn detections into objects.
    ///
    /// The first call seeds the global map. Every later call clears the
    /// local map (and the associations that pointed into it) and refills it.
    /// Detections below [`MIN_DETECTION_PIXELS`], and detections left with
    /// no valid point, produce no object.
    pub fn extract_objects(
        &mut self,
        detections: &[Detection],
        points: &PointField,
    ) -> ExtractionStats {
        let target = if self.state.is_global_initialized() {
            self.local_map.clear();
            self.associations.clear();
            ExtractionTarget::Local
        } else {
            ExtractionTarget::Global
        };
        self.state = self.state.after_extraction();
        self.frame_count += 1;

        let sensor_to_world = self.mount.sensor_to_world(&self.robot_to_world);
        let mut stats = ExtractionStats::new(target);
        stats.n_detections = detections.len();

        for detection in detections {
            if detection.pixels.len() < MIN_DETECTION_PIXELS {
                stats.n_too_few_pixels += 1;
                continue;
            }

            let Some(object) = build_object(detection, points, &sensor_to_world, &mut stats)
            else {
                stats.n_no_valid_points += 1;
                continue;
            };

            debug!(
                "{}: [{:?} .. {:?}] {} points",
                object.label,
                object.min().as_slice(),
                object.max().as_slice(),
                object.num_points()
            );

            match target {
                ExtractionTarget::Global => {
                    self.global_map.push(object);
                }
                ExtractionTarget::Local => {
                    self.local_map.push(object);
                }
            }
            stats.n_objects += 1;
        }

        debug!(
            "extracted {} objects from {} detections into {:?} map",
            stats.n_objects, stats.n_detections, target
        );

        stats
    }

    /// Associate local objects with global objects.
    ///
    /// No-op until the mapper is in steady state. Returns the number of
    /// associations recorded.
    pub fn find_associations(&mut self) -> usize {
        if !self.state.is_local_initialized() {
            return 0;
        }

        debug!(
            "associating local map ({}) with global map ({})",
            self.local_map.len(),
            self.global_map.len()
        );

        self.associations = find_associations(&self.global_map, &self.local_map);
        self.associations.len()
    }

    /// Fold the local map into the global map.
    ///
    /// Associated local objects are merged into their global counterpart;
    /// unassociated ones are appended as new objects. No-op until the mapper
    /// is in steady state.
    pub fn merge_maps(&mut self) -> MergeStats {
        let mut stats = MergeStats::default();
        if !self.state.is_local_initialized() {
            return stats;
        }

        for (local_id, local) in self.local_map.iter() {
            match self.associations.get(local_id) {
                Some(global_id) => {
                    let Some(global) = self.global_map.get_mut(global_id) else {
                        stats.skipped += 1;
                        continue;
                    };
                    if global.label != local.label {
                        stats.skipped += 1;
                        continue;
                    }
                    global.merge(local);
                    stats.merged += 1;
                }
                None => {
                    self.global_map.push(local.clone());
                    stats.added += 1;
                }
            }
        }

        debug!("merged: {}, added: {}", stats.merged, stats.added);
        stats
    }

    /// Run a whole cycle for one frame: set pose, extract, associate, merge.
    pub fn process_frame(
        &mut self,
        robot_to_world: SE3,
        detections: &[Detection],
        points: &PointField,
    ) -> FrameSummary {
        let frame_idx = self.frame_count;
        let t0 = Instant::now();

        self.set_robot_pose(robot_to_world);
        let extraction = self.extract_objects(detections, points);
        let t1 = Instant::now();

        let n_associations = self.find_associations();
        let t2 = Instant::now();

        let merge = self.merge_maps();
        let t3 = Instant::now();

        let timing = TimingStats {
            total_ms: ms(t3 - t0),
            extract_ms: ms(t1 - t0),
            associate_ms: ms(t2 - t1),
            merge_ms: ms(t3 - t2),
        };

        info!(
            "frame {}: {} detections -> {} objects, {} associations, merged {}, added {}, global {} ({:.2} ms)",
            frame_idx,
            extraction.n_detections,
            extraction.n_objects,
            n_associations,
            merge.merged,
            merge.added,
            self.global_map.len(),
            timing.total_ms
        );

        FrameSummary {
            frame_idx,
            state: self.state,
            extraction,
            n_associations,
            merge,
            global_size: self.global_map.len(),
            timing,
        }
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(&MapperConfig::default())
    }
}

/// Project a detection's valid points into the map frame.
fn build_object(
    detection: &Detection,
    points: &PointField,
    sensor_to_world: &SE3,
    stats: &mut ExtractionStats,
) -> Option<Object> {
    let mut cloud: Vec<Vector3<f64>> = Vec::with_capacity(detection.pixels.len());

    for pixel in &detection.pixels {
        let Some(p_sensor) = points.at(*pixel).filter(|p| is_valid_point(p)) else {
            stats.n_points_rejected += 1;
            continue;
        };
        cloud.push(sensor_to_world.transform_point(p_sensor));
    }

    stats.n_points_accepted += cloud.len();
    Object::from_points(detection.label.clone(), detection.normalized_color(), cloud)
}

/// A sensor point carries a measurement if it is finite and not the
/// zero-norm sentinel.
fn is_valid_point(p: &Vector3<f64>) -> bool {
    p.iter().all(|c| c.is_finite()) && p.norm() >= MIN_POINT_NORM
}

fn ms(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
