//! Match lifecycle: creation, completion, and the open-set read path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{CreateMatch, CurrentSet, Match, MatchStatus, Side};
use crate::store::{EventSink, MatchEvent, MatchStore};

use super::flags::MatchProgress;
use super::serve::server_for;
use super::set_ops::{self, current_set_snapshot};

/// Result of [`create_match`]: the stored record and its open first set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCreated {
    pub record: Match,
    pub current_set: CurrentSet,
}

/// Result of [`finish_match`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFinished {
    pub id: String,
    pub status: MatchStatus,
    pub sets_won_player: u8,
    pub sets_won_opponent: u8,
    pub ended_at: DateTime<Utc>,
}

/// Create a match and open its first set.
pub fn create_match<S: MatchStore, E: EventSink>(
    store: &mut S,
    sink: &E,
    command: &CreateMatch,
) -> Result<MatchCreated> {
    command.validate().map_err(EngineError::Validation)?;

    let record = Match::create(command);
    store.insert_match(&record)?;
    let current_set = set_ops::create_first_set(store, &record)?;

    log::info!(
        "match {} created: {} vs {}, best of {}",
        record.id,
        record.player_name,
        record.opponent_name,
        record.max_sets
    );
    sink.track(MatchEvent::MatchCreated { match_id: record.id.clone() });

    Ok(MatchCreated { record, current_set })
}

/// Finish an in-progress match.
///
/// A still-open set is closed on the way out: its score must not be tied,
/// its winner is credited, and unlike [`set_ops::finish_set`] no successor is
/// spawned. The overall result is then re-checked against a tie before the
/// match is marked finished; side effects (analytics, report generation) fire
/// only after every write has succeeded.
pub fn finish_match<S: MatchStore, E: EventSink>(
    store: &mut S,
    sink: &E,
    match_id: &str,
    coach_notes: Option<String>,
) -> Result<MatchFinished> {
    let mut record =
        store.load_match(match_id)?.ok_or_else(|| EngineError::not_found("match"))?;

    if !record.is_in_progress() {
        return Err(EngineError::invalid_state("match is already finished"));
    }

    let open = store.open_set(match_id)?;

    if let Some(open_set) = &open {
        if open_set.is_tied() {
            return Err(EngineError::invalid_state(
                "cannot finish the match while the current set is tied",
            ));
        }
        let winner = if open_set.set_score_player > open_set.set_score_opponent {
            Side::Player
        } else {
            Side::Opponent
        };
        record.record_set_win(winner);
    }

    // Re-check the aggregate with the prospective set win applied, before
    // anything is written: tallies like 1-2 plus an open set won by the
    // trailing side would level the match.
    if record.sets_won_player == record.sets_won_opponent {
        return Err(EngineError::invalid_state("cannot finish a match with tied sets"));
    }

    if let Some(open_set) = open {
        let mut closed = open_set;
        closed.is_finished = true;
        closed.winner = closed.leader();
        closed.finished_at = Some(Utc::now());
        // Coach notes from match-finish belong to the match, not the set.
        store.update_set(&closed)?;
    }

    let ended_at = Utc::now();
    record.status = MatchStatus::Finished;
    record.ended_at = Some(ended_at);
    if coach_notes.is_some() {
        record.coach_notes = coach_notes;
    }
    store.update_match(&record)?;

    log::info!(
        "match {} finished {}-{}",
        record.id,
        record.sets_won_player,
        record.sets_won_opponent
    );

    sink.track(MatchEvent::MatchFinished { match_id: record.id.clone() });
    if record.generate_ai_summary {
        sink.request_report(&record.id);
    }

    Ok(MatchFinished {
        id: record.id,
        status: record.status,
        sets_won_player: record.sets_won_player,
        sets_won_opponent: record.sets_won_opponent,
        ended_at,
    })
}

/// Snapshot of the open set of an in-progress match, with the current server
/// recomputed from the stored point count. `None` once the match is finished.
pub fn current_set_state<S: MatchStore>(
    store: &S,
    match_id: &str,
) -> Result<Option<CurrentSet>> {
    let record =
        store.load_match(match_id)?.ok_or_else(|| EngineError::not_found("match"))?;
    if !record.is_in_progress() {
        return Ok(None);
    }

    let set = match store.open_set(match_id)? {
        Some(set) => set,
        None => return Ok(None),
    };

    let points_played = store.points_of_set(&set.id)?.len() as u32;
    let server = server_for(&record, &set, points_played);

    Ok(Some(current_set_snapshot(&set, server, &MatchProgress::of(&record))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::set_ops::add_point;
    use crate::models::Side;
    use crate::store::{InMemoryStore, InMemoryTagCatalog, RecordingEventSink};

    fn command(max_sets: u8) -> CreateMatch {
        CreateMatch {
            player_name: "Anna".to_string(),
            opponent_name: "Botond".to_string(),
            max_sets,
            golden_set_enabled: false,
            first_server_first_set: Side::Player,
            generate_ai_summary: false,
        }
    }

    fn score_points(store: &mut InMemoryStore, set_id: &str, side: Side, count: u32) {
        let catalog = InMemoryTagCatalog::new();
        for _ in 0..count {
            add_point(store, &catalog, set_id, side, &[]).unwrap();
        }
    }

    #[test]
    fn test_create_match_opens_first_set_and_tracks_event() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();

        let created = create_match(&mut store, &sink, &command(5)).unwrap();
        assert_eq!(created.record.status, MatchStatus::InProgress);
        assert_eq!(created.current_set.sequence_in_match, 1);
        assert_eq!(created.current_set.current_server, Side::Player);

        assert_eq!(
            sink.events(),
            vec![MatchEvent::MatchCreated { match_id: created.record.id.clone() }]
        );
        assert!(store.open_set(&created.record.id).unwrap().is_some());
    }

    #[test]
    fn test_create_match_rejects_invalid_config_without_writing() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();

        let err = create_match(&mut store, &sink, &command(4)).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_finish_match_closes_open_set_without_spawning() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(1)).unwrap();
        let match_id = created.record.id.clone();

        score_points(&mut store, &created.current_set.id, Side::Opponent, 11);
        score_points(&mut store, &created.current_set.id, Side::Player, 4);

        let finished = finish_match(&mut store, &sink, &match_id, None).unwrap();
        assert_eq!(finished.status, MatchStatus::Finished);
        assert_eq!(finished.sets_won_player, 0);
        assert_eq!(finished.sets_won_opponent, 1);

        // The deciding set was closed in place; no successor exists.
        assert!(store.open_set(&match_id).unwrap().is_none());
        assert_eq!(store.sets_of_match(&match_id).unwrap().len(), 1);

        let stored = store.load_match(&match_id).unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Finished);
        assert!(stored.ended_at.is_some());
    }

    #[test]
    fn test_finish_match_rejects_tied_open_set() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(5)).unwrap();

        score_points(&mut store, &created.current_set.id, Side::Player, 7);
        score_points(&mut store, &created.current_set.id, Side::Opponent, 7);

        let err = finish_match(&mut store, &sink, &created.record.id, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        let stored = store.load_match(&created.record.id).unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::InProgress);
        assert!(!store.open_set(&created.record.id).unwrap().unwrap().is_finished);
    }

    #[test]
    fn test_finish_match_rejects_result_that_would_level_the_match() {
        use crate::engine::set_ops::finish_set;

        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(7)).unwrap();
        let match_id = created.record.id.clone();

        // Sets 1-3 leave the opponent ahead 2-1.
        for scorer in [Side::Player, Side::Opponent, Side::Opponent] {
            let open = store.open_set(&match_id).unwrap().unwrap();
            score_points(&mut store, &open.id, scorer, 11);
            finish_set(&mut store, &open.id, None).unwrap();
        }

        // Player leads the open set 4; crediting it would level at 2-2.
        let fourth = store.open_set(&match_id).unwrap().unwrap();
        score_points(&mut store, &fourth.id, Side::Player, 11);

        let err = finish_match(&mut store, &sink, &match_id, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        // Nothing was written: set 4 is still open, the match in progress.
        let stored = store.load_match(&match_id).unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::InProgress);
        assert_eq!((stored.sets_won_player, stored.sets_won_opponent), (1, 2));
        assert!(!store.load_set(&fourth.id).unwrap().unwrap().is_finished);
    }

    #[test]
    fn test_finish_match_twice_is_invalid_state() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(1)).unwrap();

        score_points(&mut store, &created.current_set.id, Side::Player, 11);
        finish_match(&mut store, &sink, &created.record.id, None).unwrap();

        let err = finish_match(&mut store, &sink, &created.record.id, None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn test_finish_match_unknown_id_is_not_found() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();

        let err = finish_match(&mut store, &sink, "missing", None).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_finish_match_stores_notes_and_requests_report() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let cmd = CreateMatch { generate_ai_summary: true, ..command(1) };
        let created = create_match(&mut store, &sink, &cmd).unwrap();
        let match_id = created.record.id.clone();

        score_points(&mut store, &created.current_set.id, Side::Player, 11);
        finish_match(&mut store, &sink, &match_id, Some("strong finish".to_string())).unwrap();

        let stored = store.load_match(&match_id).unwrap().unwrap();
        assert_eq!(stored.coach_notes.as_deref(), Some("strong finish"));
        assert_eq!(sink.report_requests(), vec![match_id.clone()]);
        assert!(sink.events().contains(&MatchEvent::MatchFinished { match_id }));
    }

    #[test]
    fn test_report_not_requested_when_summary_disabled() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(1)).unwrap();

        score_points(&mut store, &created.current_set.id, Side::Player, 11);
        finish_match(&mut store, &sink, &created.record.id, None).unwrap();
        assert!(sink.report_requests().is_empty());
    }

    #[test]
    fn test_current_set_state_recomputes_server_and_flags() {
        let mut store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let created = create_match(&mut store, &sink, &command(5)).unwrap();
        let match_id = created.record.id.clone();

        score_points(&mut store, &created.current_set.id, Side::Player, 3);

        let state = current_set_state(&store, &match_id).unwrap().unwrap();
        assert_eq!(state.set_score_player, 3);
        // Three points played: second service pair, other side serves.
        assert_eq!(state.current_server, Side::Opponent);
        assert!(state.flags.can_undo_point);
        assert!(state.flags.can_finish_set);

        score_points(&mut store, &created.current_set.id, Side::Player, 8);
        finish_match(&mut store, &sink, &match_id, None).unwrap();
        assert!(current_set_state(&store, &match_id).unwrap().is_none());
    }
}
