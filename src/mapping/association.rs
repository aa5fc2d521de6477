//! Data association between the local and the global map.
//!
//! Greedy nearest-centroid matching, run independently for every global
//! object: among the local objects carrying exactly the same label, the one
//! whose centroid is closest (squared Euclidean distance) wins. Labels never
//! match across classes.
//!
//! The search is O(|global| x |local|) with no spatial index; object counts
//! per frame are small.
//!
//! When two global objects pick the same local object, the global object
//! processed later overwrites the earlier entry, so the earlier one receives
//! no update this cycle. This is the established behavior of the mapper and
//! is kept as is; it is reported at debug level whenever it happens.

use std::collections::HashMap;

use tracing::debug;

use crate::map::{GlobalMap, LocalMap, LocalObjectId, ObjectId};

/// Per-cycle mapping from local objects to the global object they update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationTable {
    entries: HashMap<LocalObjectId, ObjectId>,
}

impl AssociationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an association. Returns the entry it replaced, if any.
    pub fn insert(&mut self, local: LocalObjectId, global: ObjectId) -> Option<ObjectId> {
        self.entries.insert(local, global)
    }

    pub fn get(&self, local: LocalObjectId) -> Option<ObjectId> {
        self.entries.get(&local).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in ascending local order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalObjectId, ObjectId)> {
        let mut pairs: Vec<_> = self.entries.iter().map(|(l, g)| (*l, *g)).collect();
        pairs.sort_unstable();
        pairs.into_iter()
    }
}

/// Best same-label local candidate for one global object.
///
/// Strict `<` keeps the first candidate in local order on ties.
fn best_local_match(
    label: &str,
    centroid: &nalgebra::Vector3<f64>,
    local: &LocalMap,
) -> Option<(LocalObjectId, f64)> {
    let mut best: Option<(LocalObjectId, f64)> = None;
    let mut best_error = f64::INFINITY;

    for (local_id, candidate) in local.iter() {
        if candidate.label != label {
            continue;
        }

        let error = (candidate.centroid - centroid).norm_squared();
        if error < best_error {
            best_error = error;
            best = Some((local_id, error));
        }
    }

    best
}

/// Associate every global object with its nearest same-label local object.
pub fn find_associations(global: &GlobalMap, local: &LocalMap) -> AssociationTable {
    let mut table = AssociationTable::new();

    for (global_id, object) in global.iter() {
        let Some((local_id, error)) = best_local_match(&object.label, &object.centroid, local)
        else {
            debug!("{} {} -> none", global_id, object.label);
            continue;
        };

        debug!(
            "{} {} -> {} (squared distance {:.4})",
            global_id, object.label, local_id, error
        );

        if let Some(previous) = table.insert(local_id, global_id) {
            debug!(
                "{} was matched by {} and {}; keeping {}",
                local_id, previous, global_id, global_id
            );
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::map::Object;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn object_at(label: &str, x: f64, y: f64, z: f64) -> Object {
        let c = Vector3::new(x, y, z);
        Object::new(
            label,
            Aabb::from_corners(c - Vector3::repeat(0.5), c + Vector3::repeat(0.5)),
            Vector3::zeros(),
            vec![c],
        )
    }

    #[test]
    fn test_nearest_same_label_wins() {
        let mut global = GlobalMap::new();
        global.push(object_at("chair", 0.0, 0.0, 0.0));

        let mut local = LocalMap::new();
        local.push(object_at("chair", 3.0, 0.0, 0.0));
        local.push(object_at("table", 0.0, 0.0, 0.0)); // closer, wrong label
        local.push(object_at("chair", 0.5, 0.0, 0.0));

        let table = find_associations(&global, &local);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(LocalObjectId::new(2)), Some(ObjectId::new(0)));
        assert_eq!(table.get(LocalObjectId::new(1)), None);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let mut global = GlobalMap::new();
        global.push(object_at("lamp", 0.0, 0.0, 0.0));

        let mut local = LocalMap::new();
        local.push(object_at("lamp", 1.0, 0.0, 0.0));
        local.push(object_at("lamp", -1.0, 0.0, 0.0));

        let table = find_associations(&global, &local);

        assert_eq!(table.get(LocalObjectId::new(0)), Some(ObjectId::new(0)));
        assert_eq!(table.get(LocalObjectId::new(1)), None);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut global = GlobalMap::new();
        global.push(object_at("chair", 0.0, 0.0, 0.0));
        global.push(object_at("chair", 0.2, 0.0, 0.0));

        let mut local = LocalMap::new();
        local.push(object_at("chair", 0.1, 0.0, 0.0));

        let table = find_associations(&global, &local);

        // Both global chairs pick L0; the later one keeps it.
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(LocalObjectId::new(0)), Some(ObjectId::new(1)));
    }

    #[test]
    fn test_no_candidates() {
        let mut global = GlobalMap::new();
        global.push(object_at("sofa", 0.0, 0.0, 0.0));

        assert!(find_associations(&global, &LocalMap::new()).is_empty());
        assert!(find_associations(&GlobalMap::new(), &LocalMap::new()).is_empty());
    }

    #[test]
    fn test_never_associates_across_labels() {
        let labels = ["chair", "table", "sofa", "lamp"];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut global = GlobalMap::new();
            let mut local = LocalMap::new();
            for _ in 0..rng.gen_range(0..6) {
                let label = labels[rng.gen_range(0..labels.len())];
                global.push(object_at(
                    label,
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(0.0..2.0),
                ));
            }
            for _ in 0..rng.gen_range(0..6) {
                let label = labels[rng.gen_range(0..labels.len())];
                local.push(object_at(
                    label,
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(0.0..2.0),
                ));
            }

            let table = find_associations(&global, &local);

            assert!(table.len() <= local.len());
            for (local_id, global_id) in table.iter() {
                assert_eq!(local[local_id].label, global[global_id].label);
            }
        }
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut table = AssociationTable::new();
        table.insert(LocalObjectId::new(2), ObjectId::new(0));
        table.insert(LocalObjectId::new(0), ObjectId::new(1));

        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (LocalObjectId::new(0), ObjectId::new(1)),
                (LocalObjectId::new(2), ObjectId::new(0)),
            ]
        );
    }
}
