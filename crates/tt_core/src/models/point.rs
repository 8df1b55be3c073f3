use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Side;

/// A persisted point record.
///
/// Points are append-only within a set: created with the next free sequence
/// number and removed only by popping the highest one. `served_by` is stamped
/// from the serve rotation at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub set_id: String,
    /// 1-based position within the set; contiguous, never reused.
    pub sequence_in_set: u32,
    pub scored_by: Side,
    pub served_by: Side,
    /// References into the external tag catalog.
    pub tag_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl Point {
    pub fn record(
        set_id: &str,
        sequence_in_set: u32,
        scored_by: Side,
        served_by: Side,
        tag_ids: Vec<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            set_id: set_id.to_string(),
            sequence_in_set,
            scored_by,
            served_by,
            tag_ids,
            created_at: Utc::now(),
        }
    }
}
