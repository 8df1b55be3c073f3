use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Side;

/// Smallest supported match format (single set).
pub const MIN_SETS: u8 = 1;
/// Largest supported match format (best of seven).
pub const MAX_SETS: u8 = 7;
/// Upper bound for player/opponent display names.
pub const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    InProgress,
    Finished,
}

/// A persisted match record.
///
/// The configuration block (`max_sets`, `golden_set_enabled`,
/// `first_server_first_set`, `generate_ai_summary`) is immutable after
/// creation; the tallies and status are owned by the lifecycle operations in
/// `engine`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub player_name: String,
    pub opponent_name: String,
    pub max_sets: u8,
    pub golden_set_enabled: bool,
    pub first_server_first_set: Side,
    pub generate_ai_summary: bool,
    pub status: MatchStatus,
    pub sets_won_player: u8,
    pub sets_won_opponent: u8,
    pub coach_notes: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Command to create a new match. Validated before any write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatch {
    pub player_name: String,
    pub opponent_name: String,
    pub max_sets: u8,
    pub golden_set_enabled: bool,
    pub first_server_first_set: Side,
    pub generate_ai_summary: bool,
}

impl CreateMatch {
    pub fn validate(&self) -> Result<(), String> {
        if self.player_name.is_empty() || self.player_name.chars().count() > MAX_NAME_LEN {
            return Err(format!("player_name must be 1..={} characters", MAX_NAME_LEN));
        }
        if self.opponent_name.is_empty() || self.opponent_name.chars().count() > MAX_NAME_LEN {
            return Err(format!("opponent_name must be 1..={} characters", MAX_NAME_LEN));
        }
        if !(MIN_SETS..=MAX_SETS).contains(&self.max_sets) {
            return Err(format!(
                "max_sets must be {}..={}, got {}",
                MIN_SETS, MAX_SETS, self.max_sets
            ));
        }
        if self.max_sets % 2 == 0 {
            return Err(format!("max_sets must be odd, got {}", self.max_sets));
        }
        Ok(())
    }
}

impl Match {
    /// Build a fresh in-progress match from a validated command.
    pub fn create(command: &CreateMatch) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            player_name: command.player_name.clone(),
            opponent_name: command.opponent_name.clone(),
            max_sets: command.max_sets,
            golden_set_enabled: command.golden_set_enabled,
            first_server_first_set: command.first_server_first_set,
            generate_ai_summary: command.generate_ai_summary,
            status: MatchStatus::InProgress,
            sets_won_player: 0,
            sets_won_opponent: 0,
            coach_notes: None,
            started_at: now,
            ended_at: None,
            created_at: now,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == MatchStatus::InProgress
    }

    /// Credit a set win to one side.
    pub fn record_set_win(&mut self, winner: Side) {
        match winner {
            Side::Player => self.sets_won_player += 1,
            Side::Opponent => self.sets_won_opponent += 1,
        }
    }

    /// Number of sets either side needs to take the match.
    pub fn sets_to_win(&self) -> u8 {
        (self.max_sets + 1) / 2
    }
}
