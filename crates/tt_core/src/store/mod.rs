//! Collaborator boundaries.
//!
//! The engine consumes and produces plain records across three seams: a
//! durable store for match/set/point rows, a tag catalog that names point
//! annotations, and a fire-and-forget event sink notified when matches are
//! created and finished. All three are synchronous traits; the engine assumes
//! each store call reflects a consistent read at invocation time and that the
//! caller serializes operations on the same match.

pub mod memory;

use thiserror::Error;

use crate::models::{Match, Point, Set};

pub use memory::{InMemoryStore, InMemoryTagCatalog, NullEventSink, RecordingEventSink};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("no row with id: {0}")]
    MissingRow(String),
}

/// Persistence seam for match, set, and point records.
///
/// Loads return `None` for unknown ids; updates and deletes fail with
/// [`StoreError::MissingRow`] when the target row is gone. Point listings are
/// always ordered by `sequence_in_set` ascending.
pub trait MatchStore {
    fn insert_match(&mut self, record: &Match) -> Result<(), StoreError>;
    fn load_match(&self, match_id: &str) -> Result<Option<Match>, StoreError>;
    fn update_match(&mut self, record: &Match) -> Result<(), StoreError>;

    fn insert_set(&mut self, record: &Set) -> Result<(), StoreError>;
    fn load_set(&self, set_id: &str) -> Result<Option<Set>, StoreError>;
    fn update_set(&mut self, record: &Set) -> Result<(), StoreError>;
    /// The unfinished set of a match, if any. An in-progress match has
    /// exactly one; a finished match has none.
    fn open_set(&self, match_id: &str) -> Result<Option<Set>, StoreError>;
    /// All sets of a match, ordered by `sequence_in_match` ascending.
    fn sets_of_match(&self, match_id: &str) -> Result<Vec<Set>, StoreError>;

    fn insert_point(&mut self, record: &Point) -> Result<(), StoreError>;
    /// All points of a set, ordered by `sequence_in_set` ascending.
    fn points_of_set(&self, set_id: &str) -> Result<Vec<Point>, StoreError>;
    /// Removes the point row and its tag associations.
    fn delete_point(&mut self, point_id: &str) -> Result<(), StoreError>;
}

/// External catalog of point annotation tags.
pub trait TagCatalog {
    /// The subset of `tag_ids` the catalog does not know. Empty means all
    /// exist; the engine turns a non-empty result into a validation failure
    /// before persisting the point.
    fn missing_tags(&self, tag_ids: &[i64]) -> Result<Vec<i64>, StoreError>;

    /// Human-readable names for the given tags, for read paths. Unknown ids
    /// are skipped rather than failing the read.
    fn tag_names(&self, tag_ids: &[i64]) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    MatchCreated { match_id: String },
    MatchFinished { match_id: String },
}

/// Notification seam, owned by the surrounding system.
///
/// The engine fires these after its own writes have succeeded and never
/// waits for or depends on the outcome, so the methods are infallible here.
pub trait EventSink {
    fn track(&self, event: MatchEvent);

    /// Ask the report pipeline to generate a post-match report.
    fn request_report(&self, match_id: &str);
}
