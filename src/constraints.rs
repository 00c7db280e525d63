// Pure predicates and penalties over candidate teams. The assignment engine
// owns the search; everything here is stateless with respect to the search and
// reads only the registry snapshot it is given.

use std::collections::BTreeSet;

use chain_cmp::chmp;
use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::game::Side;
use crate::pairing::{PairHistory, PairKey};
use crate::player::PlayerId;
use crate::registry::Players;
use crate::rules::{ModeProfile, RoamingRules};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RoamingWidth {
    Bounded(u32),
    Unbounded,
}

// The adaptive relaxation ladder, as an explicit list rather than nested
// branching. Widths only ever grow, so each rung admits a superset of the
// groups admitted by the rung before it; the final rung removes the bound,
// leaving the banned-pair rule as the only hard constraint.
pub fn relaxation_ladder(roaming: &RoamingRules, enforced: bool) -> Vec<RoamingWidth> {
    if !enforced {
        return vec![RoamingWidth::Unbounded];
    }
    (0..=roaming.max_widenings)
        .map(|k| RoamingWidth::Bounded(roaming.initial_width + k * roaming.widen_step))
        .chain([RoamingWidth::Unbounded])
        .collect()
}

// Skill ranks of established players: position in the session-wide rating
// order (rating descending, id ascending). Provisional players have no rank —
// they are exempt from roaming in both directions.
#[derive(Clone, Debug)]
pub struct RankTable {
    ranks: Vec<(PlayerId, i64)>,
}

impl RankTable {
    pub fn new(players: &Players, provisional_threshold: u32) -> Self {
        let mut established: Vec<_> =
            players.iter().filter(|p| !p.is_provisional(provisional_threshold)).collect();
        established.sort_by_key(|p| (-(p.rating as i64), p.id));
        let ranks =
            established.iter().enumerate().map(|(i, p)| (p.id, i as i64)).collect();
        RankTable { ranks }
    }

    fn rank(&self, id: PlayerId) -> Option<i64> {
        self.ranks.iter().find(|(p, _)| *p == id).map(|(_, r)| *r)
    }

    pub fn compatible(&self, a: PlayerId, b: PlayerId, width: RoamingWidth) -> bool {
        let RoamingWidth::Bounded(width) = width else {
            return true;
        };
        let (Some(rank_a), Some(rank_b)) = (self.rank(a), self.rank(b)) else {
            return true; // at least one provisional player
        };
        let (lo, hi) = (rank_a - width as i64, rank_a + width as i64);
        chmp!(lo <= rank_b <= hi)
    }

    pub fn group_compatible(&self, group: &[PlayerId], width: RoamingWidth) -> bool {
        group.iter().enumerate().all(|(i, &a)| {
            group[i + 1..].iter().all(|&b| self.compatible(a, b, width))
        })
    }
}

pub fn team_has_banned_pair(banned: &BTreeSet<PairKey>, team: &[PlayerId]) -> bool {
    team.iter().enumerate().any(|(i, &a)| {
        team[i + 1..].iter().any(|&b| banned.contains(&PairKey::new(a, b)))
    })
}

// Soft rule: how much this pairing repeats history. Summed pair counts, so it
// degrades gracefully in small pools instead of rejecting anything.
pub fn repetition_penalty(
    history: &PairHistory, profile: &ModeProfile, teams: &EnumMap<Side, Vec<PlayerId>>,
) -> u64 {
    let mut penalty = 0;
    for (_, team) in teams.iter() {
        for (i, &a) in team.iter().enumerate() {
            for &b in &team[i + 1..] {
                penalty += history.times_partnered(a, b) as u64 * profile.partner_weight;
            }
        }
    }
    for &a in &teams[Side::A] {
        for &b in &teams[Side::B] {
            penalty += history.times_opposed(a, b) as u64 * profile.opponent_weight;
        }
    }
    penalty
}

// Soft rule: rating imbalance between the sides, over established players
// only. Provisional ratings are placeholder noise and must not steer the
// split, so they simply do not contribute (the provisional carve-out).
// Cross-multiplied to stay in integer arithmetic: |sum_a*n_b - sum_b*n_a|.
pub fn skill_imbalance(
    players: &Players, provisional_threshold: u32, teams: &EnumMap<Side, Vec<PlayerId>>,
) -> u64 {
    let side_total = |side: Side| -> (i64, i64) {
        let mut sum = 0;
        let mut count = 0;
        for &id in &teams[side] {
            let player = &players[id];
            if !player.is_provisional(provisional_threshold) {
                sum += player.rating as i64;
                count += 1;
            }
        }
        (sum, count)
    };
    let (sum_a, n_a) = side_total(Side::A);
    let (sum_b, n_b) = side_total(Side::B);
    if n_a == 0 || n_b == 0 {
        return 0;
    }
    (sum_a * n_b - sum_b * n_a).unsigned_abs()
}
