use std::{collections::BTreeSet, sync::Mutex};

use crate::model::{OsmId, RawPlace};

/// Accumulation set shared between fetch workers. Insertion is an
/// atomic check-and-insert keyed by id: the first worker to deliver a
/// record claims it, later duplicates from overlapping queries are
/// dropped silently.
#[derive(Debug, Default)]
pub struct IdSet {
    inner: Mutex<BTreeSet<OsmId>>,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the id was not seen before.
    pub fn insert(&self, id: OsmId) -> bool {
        self.inner.lock().unwrap().insert(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drops records whose id was already seen, keeping first-arrival
/// order. Repeated or overlapping fetch runs feed the same ids back in;
/// the pipeline must never emit one id twice.
pub fn dedup_by_id(places: Vec<RawPlace>) -> Vec<RawPlace> {
    let seen = IdSet::new();
    places
        .into_iter()
        .filter(|x| seen.insert(x.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc, thread};

    use geo::Point;

    use super::*;

    fn raw(id: u64, name: &str) -> RawPlace {
        RawPlace {
            id: OsmId::Node(id),
            point: Point::new(12.0, 51.0),
            tags: BTreeMap::from([("name".to_string(), name.to_string())]),
        }
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let set = IdSet::new();
        assert!(set.is_empty());
        assert!(set.insert(OsmId::Node(1)));
        assert!(!set.insert(OsmId::Node(1)));
        assert!(set.insert(OsmId::Way(1)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn first_arrival_wins() {
        let places = vec![raw(1, "first"), raw(2, "other"), raw(1, "second fetch")];
        let deduped = dedup_by_id(places);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].display_name(), "first");
    }

    #[test]
    fn concurrent_workers_insert_each_id_once() {
        let set = Arc::new(IdSet::new());
        let mut claimed = Vec::new();
        for _ in 0..4 {
            let set = Arc::clone(&set);
            claimed.push(thread::spawn(move || {
                (0u64..100).filter(|i| set.insert(OsmId::Node(*i))).count()
            }));
        }
        let total: usize = claimed.into_iter().map(|x| x.join().unwrap()).sum();
        assert_eq!(total, 100);
        assert_eq!(set.len(), 100);
    }
}
