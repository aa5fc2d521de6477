//! Object - A labeled 3D entity of the semantic map.
//!
//! Objects are created from a single detection and then grow as later
//! observations of the same entity are merged into them. The bounding box
//! only ever grows and the point set only ever gets longer.

use nalgebra::Vector3;

use crate::geometry::Aabb;

/// A mapped object instance.
#[derive(Clone, PartialEq)]
pub struct Object {
    /// Semantic class or model name.
    pub label: String,

    /// Midpoint of the bounding box. Recomputed on every merge.
    pub centroid: Vector3<f64>,

    /// Axis-aligned bounding box in the map frame.
    pub bbox: Aabb,

    /// Display color, each channel in [0, 1]. Not used for matching.
    pub color: Vector3<f64>,

    /// Observed surface samples in the map frame.
    ///
    /// Never deduplicated or downsampled here; see
    /// [`voxel_downsample`](super::voxel::voxel_downsample) for an optional
    /// post-process.
    pub points: Vec<Vector3<f64>>,
}

impl Object {
    /// Create an object; the centroid is taken from the box.
    pub fn new(
        label: impl Into<String>,
        bbox: Aabb,
        color: Vector3<f64>,
        points: Vec<Vector3<f64>>,
    ) -> Self {
        Self {
            label: label.into(),
            centroid: bbox.center(),
            bbox,
            color,
            points,
        }
    }

    /// Create an object whose box tightly encloses `points`.
    ///
    /// Returns `None` when `points` is empty.
    pub fn from_points(
        label: impl Into<String>,
        color: Vector3<f64>,
        points: Vec<Vector3<f64>>,
    ) -> Option<Self> {
        let bbox = Aabb::from_points(&points)?;
        Some(Self::new(label, bbox, color, points))
    }

    /// Lower vertex of the bounding box.
    pub fn min(&self) -> &Vector3<f64> {
        &self.bbox.min
    }

    /// Upper vertex of the bounding box.
    pub fn max(&self) -> &Vector3<f64> {
        &self.bbox.max
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Fold another observation of the same entity into this one.
    ///
    /// The box becomes the componentwise union of both boxes, the centroid
    /// is recomputed as its midpoint and `other`'s points are appended.
    /// Label and color are left untouched.
    pub fn merge(&mut self, other: &Object) {
        self.bbox.union(&other.bbox);
        self.centroid = self.bbox.center();
        self.points.extend_from_slice(&other.points);
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("label", &self.label)
            .field("centroid", &self.centroid)
            .field("min", &self.bbox.min)
            .field("max", &self.bbox.max)
            .field("points", &self.points.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_chair() -> Object {
        Object::new(
            "chair",
            Aabb::from_corners(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0)),
            Vector3::new(1.0, 0.0, 0.0),
            vec![Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0)],
        )
    }

    #[test]
    fn test_centroid_from_box() {
        let chair = unit_chair();
        assert_eq!(chair.centroid, Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(chair.num_points(), 2);
    }

    #[test]
    fn test_from_points_requires_points() {
        assert!(Object::from_points("cup", Vector3::zeros(), Vec::new()).is_none());

        let cup = Object::from_points(
            "cup",
            Vector3::zeros(),
            vec![Vector3::new(2.0, 0.0, 1.0), Vector3::new(3.0, 1.0, 0.0)],
        )
        .unwrap();
        assert_eq!(*cup.min(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(*cup.max(), Vector3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_merge_grows_box_and_points() {
        let mut chair = unit_chair();
        let other = Object::new(
            "chair",
            Aabb::from_corners(Vector3::new(0.1, 0.0, 0.0), Vector3::new(1.1, 1.0, 1.0)),
            Vector3::new(0.0, 1.0, 0.0),
            vec![Vector3::new(1.1, 1.0, 1.0)],
        );

        chair.merge(&other);

        assert_eq!(*chair.min(), Vector3::zeros());
        assert_eq!(*chair.max(), Vector3::new(1.1, 1.0, 1.0));
        assert_eq!(chair.centroid, (chair.bbox.min + chair.bbox.max) / 2.0);
        assert_eq!(chair.num_points(), 3);
        assert_eq!(chair.points[2], Vector3::new(1.1, 1.0, 1.0));
        // Color stays with the first observation.
        assert_eq!(chair.color, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_merge_contained_box_keeps_geometry() {
        let mut chair = unit_chair();
        let inner = Object::new(
            "chair",
            Aabb::from_corners(Vector3::repeat(0.25), Vector3::repeat(0.75)),
            Vector3::zeros(),
            vec![Vector3::repeat(0.5)],
        );
        let bbox_before = chair.bbox;

        chair.merge(&inner);
        chair.merge(&inner);

        assert_eq!(chair.bbox, bbox_before);
        assert_eq!(chair.centroid, Vector3::new(0.5, 0.5, 0.5));
        // Points are concatenated on every merge.
        assert_eq!(chair.num_points(), 4);
    }
}
