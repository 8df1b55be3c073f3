//! Serve rotation.
//!
//! Pure functions; the lifecycle operations call them twice per point-add
//! (once to stamp `served_by` on the new point, once to report who serves
//! next) and once per set-spawn.

use crate::models::{Match, Set, Side};

/// Score both sides must reach before service alternates every point.
pub const DEUCE_POINTS: u32 = 10;

/// Who serves the first point of a set.
///
/// The opening server alternates with set parity: odd sets (1, 3, 5, ...)
/// open with the match's configured first server, even sets with the other
/// side.
pub fn first_server_for_set(first_server_first_set: Side, sequence_in_match: u32) -> Side {
    if sequence_in_match % 2 == 1 {
        first_server_first_set
    } else {
        first_server_first_set.opposite()
    }
}

/// Who serves after `points_played` points of the given set.
///
/// In a golden set, or once both sides have reached [`DEUCE_POINTS`], service
/// changes every point; otherwise it changes every two points. Deuce is
/// judged from the scores carried by `set` at the time of the call.
pub fn server_for(record: &Match, set: &Set, points_played: u32) -> Side {
    let first_server = first_server_for_set(record.first_server_first_set, set.sequence_in_match);

    let every_point = set.is_golden
        || (set.set_score_player >= DEUCE_POINTS && set.set_score_opponent >= DEUCE_POINTS);

    let rotations = if every_point { points_played } else { points_played / 2 };

    if rotations % 2 == 0 {
        first_server
    } else {
        first_server.opposite()
    }
}
