mod common;

use std::collections::BTreeSet;

use common::*;
use openplay::game::{CourtId, MatchStatus};
use openplay::rules::SessionRules;
use openplay::session::Session;
use pretty_assertions::assert_eq;

// The contract behind the dependency report: completing a court a player is
// marked dependent on, with no other intervening event, must seat exactly that
// player on that court. Verified by replaying the completion for real on a
// cloned session.
fn assert_dependencies_consistent(session: &Session) {
    for (&player, courts) in session.dependencies() {
        for &court in courts {
            let mut clone = session.clone();
            let id = in_progress_match_on(&clone, court);
            clone.complete_match(id, sample_score()).unwrap();
            let refill = newest_match_on(&clone, court);
            assert!(
                clone.match_by_id(refill).unwrap().players().any(|p| p == player),
                "player {player:?} reported dependent on court {court:?} but was not seated"
            );
        }
    }
}

#[test]
fn no_waiters_means_no_dependencies() {
    let session = started_session(SessionRules::competitive_doubles(2), 8);
    assert_eq!(session.waiting_players(), vec![]);
    assert!(session.dependencies().is_empty());
}

#[test]
fn unstarted_matches_are_not_trialed() {
    // Right after evaluation the matches are still in Waiting status; none of
    // them can be the next to complete, so every dependency set is empty.
    let session = evaluated_session(SessionRules::competitive_doubles(2), 12);
    let keys: Vec<_> = session.dependencies().keys().copied().collect();
    assert_eq!(keys, player_ids(&[8, 9, 10, 11]));
    assert!(session.dependencies().values().all(|courts| courts.is_empty()));
}

#[test]
fn waiters_depend_on_both_started_courts() {
    let session = started_session(SessionRules::competitive_doubles(2), 12);
    assert_eq!(session.waiting_players().len(), 4);
    let both: BTreeSet<_> = [CourtId(1), CourtId(2)].into_iter().collect();
    for id in player_ids(&[8, 9, 10, 11]) {
        assert_eq!(session.dependencies()[&id], both, "player {id:?}");
    }
    assert_dependencies_consistent(&session);
}

#[test]
fn dependencies_exist_only_for_waiting_players() {
    let session = started_session(SessionRules::competitive_doubles(2), 12);
    let waiting: BTreeSet<_> = session.waitlist().iter().copied().collect();
    for id in session.dependencies().keys() {
        assert!(waiting.contains(id));
    }
    for id in playing_players(&session) {
        assert!(!session.dependencies().contains_key(&id));
    }
}

#[test]
fn completing_a_court_shrinks_dependencies() {
    let mut session = started_session(SessionRules::competitive_doubles(2), 12);
    complete_court(&mut session, CourtId(1));

    // The four ex-waiters were seated on the refilled court 1.
    let refill = newest_match_on(&session, CourtId(1));
    let seated: BTreeSet<_> =
        session.match_by_id(refill).unwrap().players().collect();
    assert_eq!(seated, player_ids(&[8, 9, 10, 11]).into_iter().collect());
    assert_eq!(session.match_by_id(refill).unwrap().status, MatchStatus::Waiting);

    // The freed players now wait, and only court 2 can unblock them next:
    // court 1's new match has not started, and a second-order chain through it
    // is out of scope for the predictor.
    assert_eq!(session.waiting_players(), player_ids(&[0, 1, 2, 3]));
    let only_court2: BTreeSet<_> = [CourtId(2)].into_iter().collect();
    for id in player_ids(&[0, 1, 2, 3]) {
        assert_eq!(session.dependencies()[&id], only_court2, "player {id:?}");
    }
    assert_dependencies_consistent(&session);
}

#[test]
fn returning_players_complete_trial_foursomes() {
    // Two waiters cannot fill a doubles court alone, but a completion frees
    // four more players; the trial captures that and still reports first-order
    // dependencies for both waiters.
    let session = started_session(SessionRules::competitive_doubles(2), 10);
    assert_eq!(session.waiting_players(), player_ids(&[8, 9]));
    let both: BTreeSet<_> = [CourtId(1), CourtId(2)].into_iter().collect();
    for id in player_ids(&[8, 9]) {
        assert_eq!(session.dependencies()[&id], both, "player {id:?}");
    }
    assert_dependencies_consistent(&session);
}

#[test]
fn trials_never_mutate_canonical_state() {
    let session = started_session(SessionRules::competitive_doubles(2), 12);
    let before = session.clone();
    // The report for this state involved one trial run per in-progress court;
    // none of them may have left a trace in the canonical session.
    assert!(!session.dependencies().is_empty());
    assert_eq!(session, before);
    assert_eq!(
        serde_json::to_string(&session).unwrap(),
        serde_json::to_string(&before).unwrap()
    );
}

#[test]
fn dependencies_stay_consistent_through_churn() {
    let mut session = started_session(SessionRules::competitive_doubles(4), 24);
    for _ in 0..10 {
        assert_conservation(&session);
        assert_dependencies_consistent(&session);
        let id = session.matches().in_progress().map(|m| m.id).next().unwrap();
        session.complete_match(id, sample_score()).unwrap();
        let waiting_matches: Vec<_> = session
            .matches()
            .occupying()
            .filter(|m| m.status == MatchStatus::Waiting)
            .map(|m| m.id)
            .collect();
        for id in waiting_matches {
            session.start_match(id).unwrap();
        }
    }
}
