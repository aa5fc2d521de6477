//! Geometry utilities: SE3 transforms, frame conventions, bounding boxes.

pub mod aabb;
pub mod frames;
pub mod se3;

pub use aabb::Aabb;
pub use frames::SensorMount;
pub use se3::SE3;
