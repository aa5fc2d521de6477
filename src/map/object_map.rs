//! ObjectMap - Ordered container of mapped objects.
//!
//! Insertion order is discovery order, and the position of an object is its
//! handle. Objects are never removed individually; the only way to drop
//! them is [`ObjectMap::clear`], which the mapper uses on the per-frame
//! local map.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use super::object::Object;
use super::types::{LocalObjectId, ObjectId};

/// Handle type addressing objects by position.
pub trait ObjectHandle: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

impl ObjectHandle for ObjectId {
    fn from_index(index: usize) -> Self {
        ObjectId::new(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

impl ObjectHandle for LocalObjectId {
    fn from_index(index: usize) -> Self {
        LocalObjectId::new(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// Ordered sequence of objects addressed by handle `H`.
///
/// The handle type ties a map to its role, so a local handle cannot be used
/// to index the global map by mistake.
#[derive(Debug, Clone)]
pub struct ObjectMap<H: ObjectHandle = ObjectId> {
    objects: Vec<Object>,
    _handle: PhantomData<H>,
}

/// The accumulated, session-long map.
pub type GlobalMap = ObjectMap<ObjectId>;

/// The per-frame scratch map.
pub type LocalMap = ObjectMap<LocalObjectId>;

impl<H: ObjectHandle> ObjectMap<H> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            _handle: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: H) -> Option<&Object> {
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: H) -> Option<&mut Object> {
        self.objects.get_mut(id.index())
    }

    /// Append an object and return its handle.
    pub fn push(&mut self, object: Object) -> H {
        self.objects.push(object);
        H::from_index(self.objects.len() - 1)
    }

    /// Drop every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &Object)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (H::from_index(i), obj))
    }

    pub fn ids(&self) -> impl Iterator<Item = H> + '_ {
        (0..self.objects.len()).map(H::from_index)
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Sum of point counts over all objects.
    pub fn total_points(&self) -> usize {
        self.objects.iter().map(Object::num_points).sum()
    }
}

impl<H: ObjectHandle> Default for ObjectMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ObjectHandle> Index<H> for ObjectMap<H> {
    type Output = Object;

    fn index(&self, id: H) -> &Object {
        &self.objects[id.index()]
    }
}

impl<H: ObjectHandle> IndexMut<H> for ObjectMap<H> {
    fn index_mut(&mut self, id: H) -> &mut Object {
        &mut self.objects[id.index()]
    }
}
