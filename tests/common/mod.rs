use std::collections::BTreeSet;

use openplay::game::{CourtId, MatchId, Score};
use openplay::pairing::PairKey;
use openplay::player::PlayerId;
use openplay::rules::SessionRules;
use openplay::session::Session;
use openplay::test_util::sample_session;

#[allow(dead_code)]
pub fn evaluated_session(rules: SessionRules, player_count: usize) -> Session {
    let mut session = sample_session(rules, player_count);
    session.evaluate_and_create_matches();
    session
}

// Evaluate and start every created match, the way a front end would right
// after session start.
#[allow(dead_code)]
pub fn started_session(rules: SessionRules, player_count: usize) -> Session {
    let mut session = sample_session(rules, player_count);
    let created = session.evaluate_and_create_matches();
    for id in created {
        session.start_match(id).unwrap();
    }
    session
}

#[allow(dead_code)]
pub fn sample_score() -> Score { Score::new(21, 15) }

#[allow(dead_code)]
pub fn playing_players(session: &Session) -> BTreeSet<PlayerId> {
    session.matches().occupying().flat_map(|m| m.players()).collect()
}

#[allow(dead_code)]
pub fn assert_conservation(session: &Session) {
    assert_eq!(
        playing_players(session).len() + session.waitlist().len(),
        session.players().len()
    );
}

#[allow(dead_code)]
pub fn assert_no_banned_teammates(session: &Session) {
    for game in session.matches().iter() {
        for (_, team) in game.teams.iter() {
            for (i, &a) in team.iter().enumerate() {
                for &b in &team[i + 1..] {
                    assert!(
                        !session.banned_pairs().contains(&PairKey::new(a, b)),
                        "banned pair {:?}/{:?} shares a team in match {:?}",
                        a,
                        b,
                        game.id
                    );
                }
            }
        }
    }
}

#[allow(dead_code)]
pub fn in_progress_match_on(session: &Session, court: CourtId) -> MatchId {
    session
        .matches()
        .in_progress()
        .find(|m| m.court == court)
        .map(|m| m.id)
        .unwrap()
}

#[allow(dead_code)]
pub fn newest_match_on(session: &Session, court: CourtId) -> MatchId {
    session
        .matches()
        .occupying()
        .filter(|m| m.court == court)
        .map(|m| m.id)
        .max()
        .unwrap()
}

#[allow(dead_code)]
pub fn complete_court(session: &mut Session, court: CourtId) {
    let id = in_progress_match_on(session, court);
    session.complete_match(id, sample_score()).unwrap();
}

#[allow(dead_code)]
pub fn player_ids(ids: &[u32]) -> Vec<PlayerId> {
    ids.iter().copied().map(PlayerId).collect()
}
