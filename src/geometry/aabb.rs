//! Axis-aligned bounding boxes in the map frame.

use nalgebra::Vector3;

/// Axis-aligned bounding box.
///
/// A box built from at least one point satisfies `min <= max` componentwise.
/// [`Aabb::empty`] deliberately violates it so that the first `expand`
/// snaps both corners onto that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower vertex.
    pub min: Vector3<f64>,
    /// Upper vertex.
    pub max: Vector3<f64>,
}

impl Aabb {
    /// Box containing nothing.
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f64::MAX),
            max: Vector3::repeat(-f64::MAX),
        }
    }

    pub fn from_corners(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vector3<f64>>) -> Option<Self> {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand(p);
        }
        bbox.is_valid().then_some(bbox)
    }

    /// Grow the box to include a point.
    pub fn expand(&mut self, point: &Vector3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grow the box to the componentwise union with `other`.
    pub fn union(&mut self, other: &Aabb) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Midpoint of the two corners.
    pub fn center(&self) -> Vector3<f64> {
        (self.min + self.max) / 2.0
    }

    /// `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// True if `other` lies entirely inside this box (boundaries included).
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    /// The eight box corners, bottom face (min z) first, counter-clockwise.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_invalid_until_expanded() {
        let mut bbox = Aabb::empty();
        assert!(!bbox.is_valid());

        bbox.expand(&Vector3::new(1.0, -2.0, 3.0));
        assert!(bbox.is_valid());
        assert_eq!(bbox.min, bbox.max);
    }

    #[test]
    fn test_from_points() {
        let pts = [
            Vector3::new(0.0, 1.0, 0.5),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.5, 0.5, 1.0),
        ];
        let bbox = Aabb::from_points(&pts).unwrap();
        assert_eq!(bbox.min, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(bbox.center(), Vector3::new(0.5, 0.5, 0.5));

        assert!(Aabb::from_points(std::iter::empty::<&Vector3<f64>>()).is_none());
    }

    #[test]
    fn test_union_and_contains() {
        let mut a = Aabb::from_corners(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_corners(Vector3::new(0.1, 0.0, 0.0), Vector3::new(1.1, 1.0, 1.0));
        assert!(!a.contains(&b));

        let before = a;
        a.union(&b);
        assert!(a.contains(&before));
        assert!(a.contains(&b));
        assert_eq!(a.min, Vector3::zeros());
        assert_eq!(a.max, Vector3::new(1.1, 1.0, 1.0));
    }

    #[test]
    fn test_corners_span_box() {
        let bbox = Aabb::from_corners(Vector3::new(-1.0, -2.0, -3.0), Vector3::new(1.0, 2.0, 3.0));
        let corners = bbox.corners();
        assert_eq!(corners[0], bbox.min);
        assert_eq!(corners[6], bbox.max);
        assert_eq!(Aabb::from_points(&corners).unwrap(), bbox);
    }
}
