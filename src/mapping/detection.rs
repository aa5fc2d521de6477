//! Per-frame inputs of the mapper: detections and the dense point field.

use nalgebra::Vector3;
use serde::Deserialize;

/// Image pixel, addressed as (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u32; 2]")]
pub struct Pixel {
    pub row: u32,
    pub col: u32,
}

impl Pixel {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl From<[u32; 2]> for Pixel {
    fn from([row, col]: [u32; 2]) -> Self {
        Self { row, col }
    }
}

/// A labeled pixel set produced by an object detector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    /// Semantic class or model name.
    pub label: String,
    /// Pixels belonging to the object.
    pub pixels: Vec<Pixel>,
    /// Display color, 0-255 per channel.
    pub color: [u8; 3],
}

impl Detection {
    pub fn new(label: impl Into<String>, pixels: Vec<Pixel>, color: [u8; 3]) -> Self {
        Self {
            label: label.into(),
            pixels,
            color,
        }
    }

    /// Color scaled to [0, 1] per channel.
    pub fn normalized_color(&self) -> Vector3<f64> {
        Vector3::new(
            self.color[0] as f64,
            self.color[1] as f64,
            self.color[2] as f64,
        ) / 255.0
    }
}

/// Dense sensor-frame 3D point per image pixel, stored row-major.
///
/// Pixels without a valid measurement hold a (near-)zero vector.
#[derive(Debug, Clone, PartialEq)]
pub struct PointField {
    width: u32,
    height: u32,
    points: Vec<Vector3<f64>>,
}

impl PointField {
    /// All-invalid field of the given size.
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            points: vec![Vector3::zeros(); width as usize * height as usize],
        }
    }

    /// Wrap row-major points. Returns `None` if the length does not match.
    pub fn from_points(width: u32, height: u32, points: Vec<Vector3<f64>>) -> Option<Self> {
        (points.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            points,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, pixel: Pixel) -> Option<usize> {
        (pixel.row < self.height && pixel.col < self.width)
            .then(|| pixel.row as usize * self.width as usize + pixel.col as usize)
    }

    /// Point behind `pixel`, or `None` outside the image.
    pub fn at(&self, pixel: Pixel) -> Option<&Vector3<f64>> {
        self.offset(pixel).map(|i| &self.points[i])
    }

    /// Store a point. Returns false (and stores nothing) outside the image.
    pub fn set(&mut self, pixel: Pixel, point: Vector3<f64>) -> bool {
        match self.offset(pixel) {
            Some(i) => {
                self.points[i] = point;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_addressing() {
        let mut field = PointField::zeros(4, 2);
        assert!(field.set(Pixel::new(1, 3), Vector3::new(1.0, 2.0, 3.0)));

        assert_eq!(field.at(Pixel::new(1, 3)), Some(&Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(field.at(Pixel::new(0, 3)), Some(&Vector3::zeros()));
        assert_eq!(field.at(Pixel::new(2, 0)), None);
        assert_eq!(field.at(Pixel::new(0, 4)), None);
        assert!(!field.set(Pixel::new(2, 0), Vector3::zeros()));
    }

    #[test]
    fn test_from_points_checks_size() {
        assert!(PointField::from_points(2, 2, vec![Vector3::zeros(); 3]).is_none());
        let field = PointField::from_points(3, 1, vec![Vector3::zeros(); 3]).unwrap();
        assert_eq!((field.width(), field.height()), (3, 1));
    }

    #[test]
    fn test_normalized_color() {
        let det = Detection::new("chair", Vec::new(), [255, 0, 51]);
        approx::assert_relative_eq!(det.normalized_color(), Vector3::new(1.0, 0.0, 0.2));
    }

    #[test]
    fn test_deserialize_detection() {
        let yaml = "label: table\ncolor: [10, 20, 30]\npixels: [[0, 1], [2, 3]]\n";
        let det: Detection = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(det.label, "table");
        assert_eq!(det.color, [10, 20, 30]);
        assert_eq!(det.pixels, vec![Pixel::new(0, 1), Pixel::new(2, 3)]);
    }
}
