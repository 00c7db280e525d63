// Dependency prediction. For every in-progress court the engine asks: if this
// court finished right now, who would the assignment engine seat there next?
// It answers by replaying the real completion cascade against a cloned
// session, so the prediction is the assignment engine's own verdict rather
// than a re-derived heuristic — the two cannot drift apart.
//
// Clones are plain value copies of the session; they share no mutable state
// with the canonical session or with each other, which is what makes the
// speculative runs safe without any locking. Only first-order dependencies
// are reported: a player whose unblocking needs two courts to finish gets an
// empty set.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::assignment;
use crate::game::CourtId;
use crate::player::PlayerId;
use crate::session::Session;

pub fn compute_dependencies(session: &Session) -> BTreeMap<PlayerId, BTreeSet<CourtId>> {
    let mut dependencies: BTreeMap<PlayerId, BTreeSet<CourtId>> =
        session.waitlist().iter().map(|&id| (id, BTreeSet::new())).collect();
    if dependencies.is_empty() {
        return dependencies;
    }
    // Only in-progress matches are trialed: a match still in Waiting status
    // cannot be completed next (it has not started), so it unblocks nobody.
    let in_progress: Vec<_> =
        session.matches().in_progress().map(|m| (m.id, m.court)).collect();
    for (match_id, court) in in_progress {
        let mut clone = session.clone();
        clone.apply_trial_completion(match_id);
        // Replay exactly what the real completion handler does: fill every
        // free court of the clone. Only the match formed on the trialed court
        // counts as a dependency on it.
        let free = clone.free_courts();
        let created = assignment::fill_courts(&mut clone, &free);
        for new_match in created {
            let game = &clone.matches()[new_match];
            if game.court != court {
                continue;
            }
            for player in game.players() {
                // Only canonically waiting players have dependency sets; the
                // just-freed players re-seated by the trial are not waiting in
                // the real session.
                if let Some(courts) = dependencies.get_mut(&player) {
                    courts.insert(court);
                }
            }
        }
        debug!("Trial completion of court {} recorded", court.0);
    }
    dependencies
}
