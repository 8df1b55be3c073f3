//! Read-side snapshots returned by the lifecycle operations.
//!
//! The engine never hands out live references into the store; every mutating
//! operation returns one of these value types describing the state it left
//! behind, and the caller re-reads through the store when it needs more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Point, Side};

/// Which operations are currently legal on a set.
///
/// Computed by `engine::flags::action_flags` and recomputed from scratch by
/// every mutating operation; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    pub can_undo_point: bool,
    pub can_finish_set: bool,
    pub can_finish_match: bool,
}

/// Score, service, and legality snapshot of a set after a point operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetState {
    pub id: String,
    pub set_score_player: u32,
    pub set_score_opponent: u32,
    /// Who serves the next point from this state.
    pub current_server: Side,
    pub flags: ActionFlags,
}

/// Full view of the currently open set of an in-progress match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSet {
    pub id: String,
    pub sequence_in_match: u32,
    pub is_golden: bool,
    pub set_score_player: u32,
    pub set_score_opponent: u32,
    pub current_server: Side,
    pub flags: ActionFlags,
}

/// Closing summary of a finished set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishedSet {
    pub id: String,
    pub winner: Side,
    pub set_score_player: u32,
    pub set_score_opponent: u32,
    pub finished_at: DateTime<Utc>,
}

/// A point record together with the resolved names of its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointWithTags {
    pub point: Point,
    pub tags: Vec<String>,
}
