// Court-filling search. This is the single authoritative decision procedure:
// the session controller calls it on canonical state and the trial engine
// calls it on disposable clones, so predictions can never drift from real
// assignments.
//
// Per court the search runs anchor-first: the highest-priority waiting player
// is anchored into the candidate group, and the pool around the anchor widens
// along the relaxation ladder (then by priority prefix) only as far as needed.
// A court that cannot be filled even at full relaxation is left empty; that is
// a normal steady state, not an error.

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use log::debug;

use crate::constraints::{self, RankTable};
use crate::game::{CourtId, MatchId, Side};
use crate::player::PlayerId;
use crate::queue;
use crate::session::Session;

pub fn fill_courts(session: &mut Session, freed_courts: &[CourtId]) -> Vec<MatchId> {
    let mut courts = freed_courts.to_vec();
    courts.sort();
    courts.dedup();
    let mut created = Vec::new();
    for court in courts {
        match best_teams(session) {
            Some(teams) => {
                let players = teams.values().flatten().copied().collect_vec();
                let match_id = session.matches.create(court, teams);
                session.waiting.retain(|p| !players.contains(p));
                for &id in &players {
                    session.players[id].games_waited = 0;
                }
                debug!("Filled court {} with match {} ({:?})", court.0, match_id.0, players);
                created.push(match_id);
            }
            None => {
                debug!("Court {} left unfilled: no feasible team", court.0);
            }
        }
    }
    // One evaluation cycle has passed for everybody still unassigned.
    for &id in &session.waiting {
        session.players[id].games_waited += 1;
    }
    created
}

struct Candidate {
    teams: EnumMap<Side, Vec<PlayerId>>,
    key: (u64, u64, Vec<PlayerId>, Vec<PlayerId>),
}

fn best_teams(session: &Session) -> Option<EnumMap<Side, Vec<PlayerId>>> {
    let team_size = session.rules.format.team_size();
    let need = session.rules.players_per_court();
    if session.waiting.len() < need {
        return None;
    }
    let profile = session.rules.mode.profile();
    let ordered = queue::rank(session);
    let table = RankTable::new(&session.players, session.rules.provisional_threshold);
    let ladder =
        constraints::relaxation_ladder(&session.rules.roaming, profile.roaming_enforced);

    for &anchor in &ordered {
        for &width in &ladder {
            let compatible = ordered
                .iter()
                .copied()
                .filter(|&id| id != anchor && table.compatible(anchor, id, width))
                .collect_vec();
            if compatible.len() + 1 < need {
                continue;
            }
            // Grow the priority prefix one player at a time; the first prefix
            // that yields any valid group wins, so lower-priority players are
            // drawn in only when the group cannot be formed without them.
            for prefix in (need - 1)..=compatible.len() {
                let pool = &compatible[..prefix];
                let mut best: Option<Candidate> = None;
                for combo in pool.iter().copied().combinations(need - 1) {
                    let mut group = combo;
                    group.push(anchor);
                    group.sort();
                    if !table.group_compatible(&group, width) {
                        continue;
                    }
                    for teams in team_splits(&group, team_size) {
                        if teams
                            .values()
                            .any(|team| constraints::team_has_banned_pair(&session.banned_pairs, team))
                        {
                            continue;
                        }
                        let key = (
                            constraints::repetition_penalty(&session.pair_history, &profile, &teams),
                            constraints::skill_imbalance(
                                &session.players,
                                session.rules.provisional_threshold,
                                &teams,
                            ),
                            teams[Side::A].clone(),
                            teams[Side::B].clone(),
                        );
                        if best.as_ref().is_none_or(|b| key < b.key) {
                            best = Some(Candidate { teams, key });
                        }
                    }
                }
                if let Some(best) = best {
                    debug!(
                        "Anchor {} seated at roaming {:?}, prefix {}",
                        anchor.0, width, prefix
                    );
                    return Some(best.teams);
                }
            }
        }
    }
    None
}

// All splits of a sorted group into two sides. Side A is anchored on the
// lowest id, so each unordered split is generated exactly once and the result
// is already in canonical (tie-break) form.
fn team_splits(group: &[PlayerId], team_size: usize) -> Vec<EnumMap<Side, Vec<PlayerId>>> {
    let first = group[0];
    let rest = &group[1..];
    rest.iter()
        .copied()
        .combinations(team_size - 1)
        .map(|partners| {
            let mut team_a = vec![first];
            team_a.extend(partners);
            let team_b =
                rest.iter().copied().filter(|id| !team_a.contains(id)).collect_vec();
            enum_map! { Side::A => team_a.clone(), Side::B => team_b.clone() }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cover_group_once() {
        let group: Vec<_> = (0..4).map(PlayerId).collect();
        let splits = team_splits(&group, 2);
        assert_eq!(splits.len(), 3);
        for teams in &splits {
            assert_eq!(teams[Side::A][0], PlayerId(0));
            let mut all: Vec<_> = teams.values().flatten().copied().collect();
            all.sort();
            assert_eq!(all, group);
        }
    }

    #[test]
    fn singles_split_is_one_on_one() {
        let group = vec![PlayerId(3), PlayerId(7)];
        let splits = team_splits(&group, 1);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0][Side::A], vec![PlayerId(3)]);
        assert_eq!(splits[0][Side::B], vec![PlayerId(7)]);
    }
}
