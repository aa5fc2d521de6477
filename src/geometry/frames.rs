//! Coordinate frame definitions and the sensor mount transform.
//!
//! # Overview
//!
//! Three frames take part in projecting a detection into the map:
//!
//! 1. **Optical Frame** - where the depth sensor reports its points
//! 2. **Body Frame** - the robot base, whose pose the localizer provides
//! 3. **Map/World Frame** - where objects are accumulated
//!
//! ## Optical Frame (RDF - OpenCV/Computer Vision convention)
//! ```text
//!        +Y (down)
//!         |
//!         |
//!         +------ +X (right)
//!        /
//!       /
//!      +Z (forward, optical axis)
//! ```
//!
//! ## Body Frame (FLU - REP-103 robot convention)
//! ```text
//!        +Z (up)
//!         |
//!         |
//!         +------ +Y (left)
//!        /
//!       /
//!      +X (forward)
//! ```
//!
//! # Transformation Pipeline
//!
//! ```text
//! p_sensor (RDF)
//!     │
//!     ▼ SensorMount (fixed: optical rotation + mount offset)
//!     │
//! p_body (FLU)
//!     │
//!     ▼ robot pose T_world_body (per frame, from the localizer)
//!     │
//! p_world
//! ```
//!
//! which is `p_world = T_world_body * T_body_sensor * p_sensor`.

use nalgebra::{Matrix3, Vector3};

use super::SE3;

/// Default height of the depth sensor above the robot base (meters).
pub const DEFAULT_MOUNT_HEIGHT: f64 = 0.6;

/// Fixed rotation from the optical frame (RDF) to the body frame (FLU).
///
/// Maps:
/// - Optical +Z (forward) → Body +X (forward)
/// - Optical +X (right)   → Body -Y (left)
/// - Optical +Y (down)    → Body -Z (up)
///
/// As a quaternion this is (w=0.5, x=-0.5, y=0.5, z=-0.5).
#[rustfmt::skip]
pub fn rotation_body_optical() -> Matrix3<f64> {
    Matrix3::new(
        0.0,  0.0, 1.0,  // Body X = Optical Z
       -1.0,  0.0, 0.0,  // Body Y = -Optical X
        0.0, -1.0, 0.0,  // Body Z = -Optical Y
    )
}

/// Fixed rotation from the body frame (FLU) to the optical frame (RDF).
pub fn rotation_optical_body() -> Matrix3<f64> {
    rotation_body_optical().transpose()
}

/// Rigid offset between the robot base and the depth sensor.
///
/// Constant for a session; composed with the live robot pose every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMount {
    /// Transform from the sensor frame to the body frame (T_body_sensor).
    pub t_body_sensor: SE3,
}

impl SensorMount {
    pub fn new(t_body_sensor: SE3) -> Self {
        Self { t_body_sensor }
    }

    /// Sensor already reports points in the body frame.
    pub fn identity() -> Self {
        Self::new(SE3::identity())
    }

    /// Optical sensor mounted `height` meters above the base, looking forward.
    pub fn optical_at_height(height: f64) -> Self {
        let mount = SE3::from_translation(Vector3::new(0.0, 0.0, height));
        let optical = SE3::from_rt(rotation_body_optical(), Vector3::zeros());
        Self::new(mount.compose(&optical))
    }

    /// Transform taking sensor points straight into the world frame.
    pub fn sensor_to_world(&self, t_world_body: &SE3) -> SE3 {
        t_world_body.compose(&self.t_body_sensor)
    }
}

impl Default for SensorMount {
    fn default() -> Self {
        Self::optical_at_height(DEFAULT_MOUNT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Quaternion, UnitQuaternion};

    #[test]
    fn test_optical_rotation_matches_quaternion() {
        let q = UnitQuaternion::from_quaternion(Quaternion::new(0.5, -0.5, 0.5, -0.5));
        assert_relative_eq!(
            q.to_rotation_matrix().into_inner(),
            rotation_body_optical(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_optical_roundtrip() {
        let r = rotation_body_optical() * rotation_optical_body();
        assert_relative_eq!(r, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_forward_point_lands_in_front_of_robot() {
        let mount = SensorMount::default();
        // One meter along the optical axis.
        let p = mount
            .sensor_to_world(&SE3::identity())
            .transform_point(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p, Vector3::new(1.0, 0.0, DEFAULT_MOUNT_HEIGHT), epsilon = 1e-12);
    }

    #[test]
    fn test_robot_pose_is_applied_after_mount() {
        let mount = SensorMount::identity();
        let pose = SE3::from_translation(Vector3::new(2.0, -1.0, 0.0));
        let p = mount
            .sensor_to_world(&pose)
            .transform_point(&Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(p, Vector3::new(2.5, -0.5, 0.5));
    }
}
