//! # tt_core - Table Tennis Match Scoring Engine
//!
//! Deterministic rules engine behind a table tennis match scorer: given a
//! running sequence of point events it always knows who serves next, whether
//! the current set or match may legally be closed, and what the resulting
//! score state is after adding or retracting a point.
//!
//! ## Features
//! - Serve rotation: two-point rule, deuce, golden sets, set parity
//! - Action flags: `can_undo_point` / `can_finish_set` / `can_finish_match`
//! - Set and match lifecycle over a pluggable persistence store
//! - No global state; different matches can be driven concurrently
//!
//! Persistence, tag naming, and post-match notifications are collaborator
//! traits in [`store`]; the crate ships in-memory reference implementations
//! for all three. Callers must serialize operations on the same match.
//!
//! ## Example
//! ```
//! use tt_core::engine::{add_point, create_match};
//! use tt_core::models::{CreateMatch, Side};
//! use tt_core::store::{InMemoryStore, InMemoryTagCatalog, NullEventSink};
//!
//! let mut store = InMemoryStore::new();
//! let created = create_match(
//!     &mut store,
//!     &NullEventSink,
//!     &CreateMatch {
//!         player_name: "Anna".to_string(),
//!         opponent_name: "Botond".to_string(),
//!         max_sets: 5,
//!         golden_set_enabled: false,
//!         first_server_first_set: Side::Player,
//!         generate_ai_summary: false,
//!     },
//! )?;
//!
//! let recorded = add_point(
//!     &mut store,
//!     &InMemoryTagCatalog::new(),
//!     &created.current_set.id,
//!     Side::Player,
//!     &[],
//! )?;
//! assert_eq!(recorded.set_state.set_score_player, 1);
//! assert_eq!(recorded.point.point.served_by, Side::Player);
//! # Ok::<(), tt_core::EngineError>(())
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod store;

pub use engine::{
    action_flags, add_point, create_match, current_set_state, finish_match, finish_set,
    first_server_for_set, points_with_tags, server_for, undo_last_point, MatchCreated,
    MatchFinished, MatchProgress, PointRecorded, PointUndone, SetFinished,
};
pub use error::{EngineError, Result};
pub use models::{
    ActionFlags, CreateMatch, CurrentSet, FinishedSet, Match, MatchStatus, Point, PointWithTags,
    Set, SetState, Side,
};
pub use store::{
    EventSink, InMemoryStore, InMemoryTagCatalog, MatchEvent, MatchStore, NullEventSink,
    StoreError, TagCatalog,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
