//! In-memory reference implementations of the collaborator traits.
//!
//! These back every test in the crate and pin down the ordering and
//! consistency guarantees a real backend must provide.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Match, Point, Set};

use super::{EventSink, MatchEvent, MatchStore, StoreError, TagCatalog};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: HashMap<String, Match>,
    sets: HashMap<String, Set>,
    points: HashMap<String, Point>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for InMemoryStore {
    fn insert_match(&mut self, record: &Match) -> Result<(), StoreError> {
        if self.matches.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.clone()));
        }
        self.matches.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn load_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        Ok(self.matches.get(match_id).cloned())
    }

    fn update_match(&mut self, record: &Match) -> Result<(), StoreError> {
        match self.matches.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(StoreError::MissingRow(record.id.clone())),
        }
    }

    fn insert_set(&mut self, record: &Set) -> Result<(), StoreError> {
        if self.sets.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.clone()));
        }
        self.sets.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn load_set(&self, set_id: &str) -> Result<Option<Set>, StoreError> {
        Ok(self.sets.get(set_id).cloned())
    }

    fn update_set(&mut self, record: &Set) -> Result<(), StoreError> {
        match self.sets.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(StoreError::MissingRow(record.id.clone())),
        }
    }

    fn open_set(&self, match_id: &str) -> Result<Option<Set>, StoreError> {
        let mut open: Vec<&Set> = self
            .sets
            .values()
            .filter(|s| s.match_id == match_id && !s.is_finished)
            .collect();
        open.sort_by_key(|s| s.sequence_in_match);
        Ok(open.first().map(|s| (*s).clone()))
    }

    fn sets_of_match(&self, match_id: &str) -> Result<Vec<Set>, StoreError> {
        let mut sets: Vec<Set> =
            self.sets.values().filter(|s| s.match_id == match_id).cloned().collect();
        sets.sort_by_key(|s| s.sequence_in_match);
        Ok(sets)
    }

    fn insert_point(&mut self, record: &Point) -> Result<(), StoreError> {
        if self.points.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.clone()));
        }
        self.points.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn points_of_set(&self, set_id: &str) -> Result<Vec<Point>, StoreError> {
        let mut points: Vec<Point> =
            self.points.values().filter(|p| p.set_id == set_id).cloned().collect();
        points.sort_by_key(|p| p.sequence_in_set);
        Ok(points)
    }

    fn delete_point(&mut self, point_id: &str) -> Result<(), StoreError> {
        match self.points.remove(point_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::MissingRow(point_id.to_string())),
        }
    }
}

/// Tag catalog backed by a plain id -> name map.
#[derive(Debug, Default)]
pub struct InMemoryTagCatalog {
    tags: HashMap<i64, String>,
}

impl InMemoryTagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(entries: impl IntoIterator<Item = (i64, &'static str)>) -> Self {
        Self { tags: entries.into_iter().map(|(id, name)| (id, name.to_string())).collect() }
    }
}

impl TagCatalog for InMemoryTagCatalog {
    fn missing_tags(&self, tag_ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        let mut missing: Vec<i64> =
            tag_ids.iter().copied().filter(|id| !self.tags.contains_key(id)).collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }

    fn tag_names(&self, tag_ids: &[i64]) -> Result<Vec<String>, StoreError> {
        Ok(tag_ids.iter().filter_map(|id| self.tags.get(id).cloned()).collect())
    }
}

/// Sink that drops everything. Default choice when the surrounding system has
/// no analytics wired up.
#[derive(Debug, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn track(&self, _event: MatchEvent) {}

    fn request_report(&self, _match_id: &str) {}
}

/// Sink that remembers everything it saw, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<MatchEvent>>,
    report_requests: Mutex<Vec<String>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.lock().expect("event sink lock poisoned").clone()
    }

    pub fn report_requests(&self) -> Vec<String> {
        self.report_requests.lock().expect("event sink lock poisoned").clone()
    }
}

impl EventSink for RecordingEventSink {
    fn track(&self, event: MatchEvent) {
        self.events.lock().expect("event sink lock poisoned").push(event);
    }

    fn request_report(&self, match_id: &str) {
        self.report_requests
            .lock()
            .expect("event sink lock poisoned")
            .push(match_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateMatch, Side};

    fn sample_match() -> Match {
        Match::create(&CreateMatch {
            player_name: "A".to_string(),
            opponent_name: "B".to_string(),
            max_sets: 3,
            golden_set_enabled: false,
            first_server_first_set: Side::Player,
            generate_ai_summary: false,
        })
    }

    #[test]
    fn test_match_roundtrip_and_duplicate_insert() {
        let mut store = InMemoryStore::new();
        let m = sample_match();

        store.insert_match(&m).unwrap();
        assert!(store.load_match(&m.id).unwrap().is_some());
        assert!(matches!(store.insert_match(&m), Err(StoreError::DuplicateId(_))));
        assert!(store.load_match("nope").unwrap().is_none());
    }

    #[test]
    fn test_points_ordered_by_sequence() {
        let mut store = InMemoryStore::new();
        let set = Set::open("m1", 1, false);
        store.insert_set(&set).unwrap();

        for seq in [3, 1, 2] {
            let p = Point::record(&set.id, seq, Side::Player, Side::Player, vec![]);
            store.insert_point(&p).unwrap();
        }

        let sequences: Vec<u32> =
            store.points_of_set(&set.id).unwrap().iter().map(|p| p.sequence_in_set).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_open_set_ignores_finished_rows() {
        let mut store = InMemoryStore::new();
        let mut first = Set::open("m1", 1, false);
        first.is_finished = true;
        let second = Set::open("m1", 2, false);
        store.insert_set(&first).unwrap();
        store.insert_set(&second).unwrap();

        let open = store.open_set("m1").unwrap().unwrap();
        assert_eq!(open.sequence_in_match, 2);
        assert!(store.open_set("other").unwrap().is_none());
    }

    #[test]
    fn test_missing_tags_and_names() {
        let catalog = InMemoryTagCatalog::with_tags([(1, "forehand"), (2, "backhand")]);
        assert!(catalog.missing_tags(&[1, 2]).unwrap().is_empty());
        assert_eq!(catalog.missing_tags(&[2, 9, 9, 3]).unwrap(), vec![3, 9]);
        assert_eq!(
            catalog.tag_names(&[2, 1]).unwrap(),
            vec!["backhand".to_string(), "forehand".to_string()]
        );
    }
}
