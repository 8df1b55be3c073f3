use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Side;

/// A persisted set record.
///
/// Scores mirror the point rows exactly: `set_score_player` is the number of
/// points in this set with `scored_by == Player`, and symmetrically for the
/// opponent. The lifecycle operations keep that in step on every add/undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Set {
    pub id: String,
    pub match_id: String,
    /// 1-based position within the match; contiguous, never reused.
    pub sequence_in_match: u32,
    /// Golden sets alternate service every point from 0-0.
    pub is_golden: bool,
    pub set_score_player: u32,
    pub set_score_opponent: u32,
    pub is_finished: bool,
    pub winner: Option<Side>,
    pub coach_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Set {
    /// Open a fresh 0-0 set at the given position.
    pub fn open(match_id: &str, sequence_in_match: u32, is_golden: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            sequence_in_match,
            is_golden,
            set_score_player: 0,
            set_score_opponent: 0,
            is_finished: false,
            winner: None,
            coach_notes: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn total_points(&self) -> u32 {
        self.set_score_player + self.set_score_opponent
    }

    pub fn is_tied(&self) -> bool {
        self.set_score_player == self.set_score_opponent
    }

    /// The side currently ahead, or `None` at a tied score.
    pub fn leader(&self) -> Option<Side> {
        if self.set_score_player > self.set_score_opponent {
            Some(Side::Player)
        } else if self.set_score_opponent > self.set_score_player {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    pub fn score_of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.set_score_player,
            Side::Opponent => self.set_score_opponent,
        }
    }

    pub fn award_point(&mut self, side: Side) {
        match side {
            Side::Player => self.set_score_player += 1,
            Side::Opponent => self.set_score_opponent += 1,
        }
    }

    /// Take back the most recent point of `side`. Scores never go below
    /// zero, whatever the store reports.
    pub fn revoke_point(&mut self, side: Side) {
        match side {
            Side::Player => self.set_score_player = self.set_score_player.saturating_sub(1),
            Side::Opponent => {
                self.set_score_opponent = self.set_score_opponent.saturating_sub(1)
            }
        }
    }
}
