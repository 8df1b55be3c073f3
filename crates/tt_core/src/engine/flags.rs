//! Action-flag evaluation.
//!
//! One pure function decides which operations are legal on a set, and every
//! mutating operation goes through it rather than re-deriving the booleans
//! inline. The flags are never persisted.

use crate::models::{ActionFlags, Match, Set, Side};

/// Match-level tallies as seen from one set: `sets_won_*` exclude the set
/// being evaluated, which is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchProgress {
    pub max_sets: u8,
    pub sets_won_player: u8,
    pub sets_won_opponent: u8,
}

impl MatchProgress {
    pub fn of(record: &Match) -> Self {
        Self {
            max_sets: record.max_sets,
            sets_won_player: record.sets_won_player,
            sets_won_opponent: record.sets_won_opponent,
        }
    }

    fn sets_to_win(&self) -> u8 {
        (self.max_sets + 1) / 2
    }
}

/// Evaluate which actions are legal on `set` given the match progress.
///
/// A tied set can never be closed, in either direction. Otherwise exactly one
/// of `can_finish_set` / `can_finish_match` is true: finishing the set is
/// offered while the match would stay alive afterwards, finishing the match
/// once the hypothetical winner has enough sets or this is the last set the
/// format allows.
pub fn action_flags(set: &Set, progress: &MatchProgress) -> ActionFlags {
    let can_undo_point = set.total_points() > 0;

    let winner = match set.leader() {
        Some(side) => side,
        None => {
            return ActionFlags { can_undo_point, can_finish_set: false, can_finish_match: false }
        }
    };

    let new_sets_won_player = progress.sets_won_player + u8::from(winner == Side::Player);
    let new_sets_won_opponent = progress.sets_won_opponent + u8::from(winner == Side::Opponent);

    let sets_to_win = progress.sets_to_win();
    let match_would_end =
        new_sets_won_player >= sets_to_win || new_sets_won_opponent >= sets_to_win;

    // Treats sets as strictly sequential: the set under evaluation is the
    // (sets played so far + 1)-th.
    let sets_played = progress.sets_won_player + progress.sets_won_opponent + 1;
    let is_last_possible_set = sets_played >= progress.max_sets;

    ActionFlags {
        can_undo_point,
        can_finish_set: !match_would_end && !is_last_possible_set,
        can_finish_match: match_would_end || is_last_possible_set,
    }
}
