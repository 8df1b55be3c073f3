//! Set lifecycle: opening the first set, scoring and unscoring points, and
//! closing a non-deciding set.
//!
//! All operations are plain functions over the store collaborator, check
//! every precondition before the first write, and return a snapshot of the
//! state they left behind. Callers must serialize operations on the same
//! match; the read-then-write sequences here are not internally atomic.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{CurrentSet, FinishedSet, Match, Point, PointWithTags, Set, SetState, Side};
use crate::store::{MatchStore, TagCatalog};

use super::flags::{action_flags, MatchProgress};
use super::serve::{first_server_for_set, server_for};

/// Result of [`add_point`]: the stored point and the set state after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRecorded {
    pub point: PointWithTags,
    pub set_state: SetState,
}

/// Result of [`undo_last_point`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointUndone {
    pub deleted_point_id: String,
    pub set_state: SetState,
}

/// Result of [`finish_set`]: the closed set and its freshly opened successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFinished {
    pub finished_set: FinishedSet,
    pub next_set: CurrentSet,
}

/// Open set number one of a newly created match.
///
/// A single-set match with the golden flag enabled plays its only set as a
/// golden set; in every other format set one is a normal set.
pub fn create_first_set<S: MatchStore>(store: &mut S, record: &Match) -> Result<CurrentSet> {
    let is_golden = record.golden_set_enabled && record.max_sets == 1;
    let set = Set::open(&record.id, 1, is_golden);
    store.insert_set(&set)?;

    // Set 1 is odd, so the configured first server opens it unchanged.
    Ok(current_set_snapshot(&set, record.first_server_first_set, &MatchProgress::of(record)))
}

/// Score a point for `scored_by` in the given set.
pub fn add_point<S: MatchStore, C: TagCatalog>(
    store: &mut S,
    catalog: &C,
    set_id: &str,
    scored_by: Side,
    tag_ids: &[i64],
) -> Result<PointRecorded> {
    let (set, record) = load_open_context(store, set_id)?;

    if !tag_ids.is_empty() {
        let missing = catalog.missing_tags(tag_ids)?;
        if !missing.is_empty() {
            return Err(EngineError::Validation(format!("unknown tag ids: {:?}", missing)));
        }
    }

    let points = store.points_of_set(set_id)?;
    let points_before = points.len() as u32;
    let sequence = points.last().map(|p| p.sequence_in_set).unwrap_or(0) + 1;

    // Both serve lookups read the scores as they stood before this point;
    // only the points-played total differs between them.
    let served_by = server_for(&record, &set, points_before);
    let next_server = server_for(&record, &set, points_before + 1);

    let point = Point::record(set_id, sequence, scored_by, served_by, tag_ids.to_vec());
    store.insert_point(&point)?;

    let mut updated = set;
    updated.award_point(scored_by);
    store.update_set(&updated)?;

    log::debug!(
        "point {} in set {}: {:?} scores, {:?} served, {}-{}",
        sequence,
        set_id,
        scored_by,
        served_by,
        updated.set_score_player,
        updated.set_score_opponent
    );

    let tags = catalog.tag_names(tag_ids)?;
    let flags = action_flags(&updated, &MatchProgress::of(&record));

    Ok(PointRecorded {
        point: PointWithTags { point, tags },
        set_state: SetState {
            id: updated.id,
            set_score_player: updated.set_score_player,
            set_score_opponent: updated.set_score_opponent,
            current_server: next_server,
            flags,
        },
    })
}

/// Remove the most recent point of the given set.
///
/// Only the point with the highest sequence is ever eligible; the reported
/// server is the `served_by` of the removed point, restoring "who serves
/// now" to its pre-add value.
pub fn undo_last_point<S: MatchStore>(store: &mut S, set_id: &str) -> Result<PointUndone> {
    let (set, record) = load_open_context(store, set_id)?;

    let points = store.points_of_set(set_id)?;
    let last = points.last().ok_or_else(|| EngineError::not_found("no points to undo"))?;

    store.delete_point(&last.id)?;

    let mut updated = set;
    updated.revoke_point(last.scored_by);
    store.update_set(&updated)?;

    log::debug!(
        "undid point {} in set {}: back to {}-{}",
        last.sequence_in_set,
        set_id,
        updated.set_score_player,
        updated.set_score_opponent
    );

    let flags = action_flags(&updated, &MatchProgress::of(&record));

    Ok(PointUndone {
        deleted_point_id: last.id.clone(),
        set_state: SetState {
            id: updated.id,
            set_score_player: updated.set_score_player,
            set_score_opponent: updated.set_score_opponent,
            current_server: last.served_by,
            flags,
        },
    })
}

/// Close a non-deciding set and open its successor.
///
/// The literal final set of a match cannot be closed here. It ends together
/// with the match, through the match-finish operation, which does not spawn
/// a successor.
pub fn finish_set<S: MatchStore>(
    store: &mut S,
    set_id: &str,
    coach_notes: Option<String>,
) -> Result<SetFinished> {
    let (set, mut record) = load_open_context(store, set_id)?;

    if set.is_tied() {
        return Err(EngineError::invalid_state("cannot finish a set with a tied score"));
    }
    if set.sequence_in_match == u32::from(record.max_sets) {
        return Err(EngineError::invalid_state(
            "cannot finish the deciding set here; finish the match to close it",
        ));
    }

    let winner =
        if set.set_score_player > set.set_score_opponent { Side::Player } else { Side::Opponent };
    let finished_at = Utc::now();

    let mut finished = set;
    finished.is_finished = true;
    finished.winner = Some(winner);
    finished.finished_at = Some(finished_at);
    finished.coach_notes = coach_notes;
    store.update_set(&finished)?;

    record.record_set_win(winner);
    store.update_match(&record)?;

    let next_sequence = finished.sequence_in_match + 1;
    let next_is_golden =
        record.golden_set_enabled && next_sequence == u32::from(record.max_sets);
    let next_set = Set::open(&record.id, next_sequence, next_is_golden);
    store.insert_set(&next_set)?;

    log::info!(
        "set {} of match {} finished {}-{}, winner {:?}; opened set {}",
        finished.sequence_in_match,
        record.id,
        finished.set_score_player,
        finished.set_score_opponent,
        winner,
        next_sequence
    );

    let next_server = first_server_for_set(record.first_server_first_set, next_sequence);

    Ok(SetFinished {
        finished_set: FinishedSet {
            id: finished.id,
            winner,
            set_score_player: finished.set_score_player,
            set_score_opponent: finished.set_score_opponent,
            finished_at,
        },
        // Flags for the new set use the tallies as incremented above.
        next_set: current_set_snapshot(&next_set, next_server, &MatchProgress::of(&record)),
    })
}

/// The points of a set in playing order, with tag names resolved through the
/// catalog. Read-only; works on finished sets too.
pub fn points_with_tags<S: MatchStore, C: TagCatalog>(
    store: &S,
    catalog: &C,
    set_id: &str,
) -> Result<Vec<PointWithTags>> {
    if store.load_set(set_id)?.is_none() {
        return Err(EngineError::not_found("set"));
    }

    let points = store.points_of_set(set_id)?;
    let mut out = Vec::with_capacity(points.len());
    for point in points {
        let tags = catalog.tag_names(&point.tag_ids)?;
        out.push(PointWithTags { point, tags });
    }
    Ok(out)
}

/// Load a set and its match, requiring an open set in an in-progress match.
fn load_open_context<S: MatchStore>(store: &S, set_id: &str) -> Result<(Set, Match)> {
    let set = store.load_set(set_id)?.ok_or_else(|| EngineError::not_found("set"))?;
    let record =
        store.load_match(&set.match_id)?.ok_or_else(|| EngineError::not_found("match"))?;

    if !record.is_in_progress() {
        return Err(EngineError::invalid_state("match is not in progress"));
    }
    if set.is_finished {
        return Err(EngineError::invalid_state("set is already finished"));
    }

    Ok((set, record))
}

pub(crate) fn current_set_snapshot(
    set: &Set,
    current_server: Side,
    progress: &MatchProgress,
) -> CurrentSet {
    CurrentSet {
        id: set.id.clone(),
        sequence_in_match: set.sequence_in_match,
        is_golden: set.is_golden,
        set_score_player: set.set_score_player,
        set_score_opponent: set.set_score_opponent,
        current_server,
        flags: action_flags(set, progress),
    }
}
