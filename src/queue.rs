use std::cmp;

use itertools::Itertools;

use crate::player::PlayerId;
use crate::rules::WaitTieBreak;
use crate::session::Session;

// Total order over the waitlist: longest wait first, then the mode tie-break,
// then id. Pure and deterministic — trial runs depend on getting the exact
// same ordering from a cloned session.
pub fn rank(session: &Session) -> Vec<PlayerId> {
    let tie_break = session.rules().mode.profile().tie_break;
    session
        .waitlist()
        .iter()
        .copied()
        .sorted_by_key(|&id| {
            let player = &session.players()[id];
            let secondary = match tie_break {
                WaitTieBreak::FewestGamesPlayed => player.games_played as i64,
                WaitTieBreak::HighestRating => -(player.rating as i64),
            };
            (cmp::Reverse(player.games_waited), secondary, id)
        })
        .collect_vec()
}
