//! The scoring rules engine.
//!
//! `serve` and `flags` are pure calculators; `set_ops` and `match_ops` are
//! the lifecycle operations that read and write through the store
//! collaborator. Everything is synchronous and deterministic; callers
//! serialize operations per match.

pub mod flags;
pub mod match_ops;
pub mod serve;
pub mod set_ops;


pub use flags::{action_flags, MatchProgress};
pub use match_ops::{create_match, current_set_state, finish_match, MatchCreated, MatchFinished};
pub use serve::{first_server_for_set, server_for, DEUCE_POINTS};
pub use set_ops::{
    add_point, create_first_set, finish_set, points_with_tags, undo_last_point, PointRecorded,
    PointUndone, SetFinished,
};
