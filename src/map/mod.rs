//! Map module - Object-level semantic map data structures.
//!
//! This module contains:
//! - [`Object`] - A labeled 3D entity with bounding box and point set
//! - [`ObjectMap`] - Ordered container of objects, addressed by handle
//! - [`ObjectId`] / [`LocalObjectId`] - Handles into the global and local maps
//!
//! # Example
//!
//! ```ignore
//! use semantic_mapper::map::{GlobalMap, Object};
//!
//! let mut map = GlobalMap::new();
//! let id = map.push(Object::from_points("chair", color, points).unwrap());
//!
//! // A later observation of the same chair
//! map[id].merge(&observation);
//! ```

pub mod object;
pub mod object_map;
pub mod types;
pub mod voxel;

pub use object::Object;
pub use object_map::{GlobalMap, LocalMap, ObjectHandle, ObjectMap};
pub use types::{LocalObjectId, ObjectId};
