use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::{Match, Side};
use crate::player::PlayerId;
use crate::util::sort_two;

// Unordered pair of distinct players, normalized so that `low < high`.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub struct PairKey {
    low: PlayerId,
    high: PlayerId,
}

impl PairKey {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        assert_ne!(a, b);
        let (low, high) = sort_two((a, b));
        PairKey { low, high }
    }

    pub fn low(self) -> PlayerId { self.low }
    pub fn high(self) -> PlayerId { self.high }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PairCounts {
    pub partnered: u32,
    pub opposed: u32,
}

// How often each pair has shared a team or faced each other. Monotonically
// increasing; updated only when a real match completes — trial clones are
// discarded together with any counts they bumped.
//
// Stored as a nested map keyed low-id → high-id so the whole session state
// stays representable in formats that require primitive map keys.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PairHistory {
    counts: BTreeMap<PlayerId, BTreeMap<PlayerId, PairCounts>>,
}

impl PairHistory {
    pub fn new() -> Self { Self::default() }

    fn get(&self, a: PlayerId, b: PlayerId) -> PairCounts {
        let key = PairKey::new(a, b);
        self.counts
            .get(&key.low())
            .and_then(|inner| inner.get(&key.high()))
            .copied()
            .unwrap_or_default()
    }

    fn entry(&mut self, a: PlayerId, b: PlayerId) -> &mut PairCounts {
        let key = PairKey::new(a, b);
        self.counts.entry(key.low()).or_default().entry(key.high()).or_default()
    }

    pub fn times_partnered(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.get(a, b).partnered
    }

    pub fn times_opposed(&self, a: PlayerId, b: PlayerId) -> u32 { self.get(a, b).opposed }

    pub fn record_match(&mut self, game: &Match) {
        for (_, team) in game.teams.iter() {
            for (i, &a) in team.iter().enumerate() {
                for &b in &team[i + 1..] {
                    self.entry(a, b).partnered += 1;
                }
            }
        }
        for &a in &game.teams[Side::A] {
            for &b in &game.teams[Side::B] {
                self.entry(a, b).opposed += 1;
            }
        }
    }
}
