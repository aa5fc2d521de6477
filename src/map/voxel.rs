//! Optional voxel-grid downsampling of object point sets.
//!
//! The mapper concatenates points on every merge and never thins them, so
//! per-object point sets grow without bound over a long session. This is
//! the policy a consumer can apply to a snapshot of the map when it needs a
//! bounded representation. It is never invoked by the mapper itself.

use std::collections::HashSet;

use nalgebra::Vector3;

use super::object::Object;

/// Keep the first point encountered in every cubic cell of side `resolution`.
///
/// Order of the surviving points follows the input order. A non-positive
/// resolution returns the input unchanged.
///
/// # Complexity
///
/// O(n) where n is the number of points.
pub fn voxel_downsample(points: &[Vector3<f64>], resolution: f64) -> Vec<Vector3<f64>> {
    if points.is_empty() || resolution <= 0.0 {
        return points.to_vec();
    }

    let inv_resolution = 1.0 / resolution;
    let mut occupied: HashSet<(i64, i64, i64)> = HashSet::with_capacity(points.len());
    let mut out = Vec::new();

    for p in points {
        let cell = (
            (p.x * inv_resolution).floor() as i64,
            (p.y * inv_resolution).floor() as i64,
            (p.z * inv_resolution).floor() as i64,
        );
        if occupied.insert(cell) {
            out.push(*p);
        }
    }

    out
}

/// Copy of `object` with its point set downsampled.
///
/// Box and centroid are kept as they are: they describe everything ever
/// observed, not just the surviving samples.
pub fn downsampled(object: &Object, resolution: f64) -> Object {
    Object {
        points: voxel_downsample(&object.points, resolution),
        ..object.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;

    #[test]
    fn test_keeps_first_point_per_cell() {
        let points = vec![
            Vector3::new(0.01, 0.01, 0.01),
            Vector3::new(0.02, 0.03, 0.04), // same 5cm cell
            Vector3::new(0.06, 0.01, 0.01),
            Vector3::new(-0.01, 0.01, 0.01), // negative side of the origin
        ];

        let out = voxel_downsample(&points, 0.05);

        assert_eq!(out, vec![points[0], points[2], points[3]]);
    }

    #[test]
    fn test_non_positive_resolution_is_passthrough() {
        let points = vec![Vector3::zeros(), Vector3::zeros()];
        assert_eq!(voxel_downsample(&points, 0.0), points);
        assert_eq!(voxel_downsample(&points, -1.0), points);
        assert!(voxel_downsample(&[], 0.1).is_empty());
    }

    #[test]
    fn test_downsampled_object_keeps_geometry() {
        let object = Object::new(
            "plant",
            Aabb::from_corners(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0)),
            Vector3::new(0.0, 1.0, 0.0),
            vec![Vector3::repeat(0.001); 50],
        );

        let thin = downsampled(&object, 0.1);

        assert_eq!(thin.num_points(), 1);
        assert_eq!(thin.bbox, object.bbox);
        assert_eq!(thin.centroid, object.centroid);
        assert_eq!(thin.label, "plant");
        assert_eq!(object.num_points(), 50);
    }
}
