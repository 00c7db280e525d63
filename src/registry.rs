use std::collections::BTreeMap;
use std::ops;

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::game::{CourtId, Match, MatchId, MatchStatus, Side};
use crate::player::{Player, PlayerId};

// Canonical player registry. BTreeMap keeps iteration (and serialization)
// order deterministic, which the determinism guarantee relies on.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Players {
    map: BTreeMap<PlayerId, Player>,
}

impl Players {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.map.len() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
    pub fn contains(&self, id: PlayerId) -> bool { self.map.contains_key(&id) }
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ { self.map.keys().copied() }
    pub fn iter(&self) -> impl Iterator<Item = &Player> { self.map.values() }
    pub fn get(&self, id: PlayerId) -> Option<&Player> { self.map.get(&id) }
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> { self.map.get_mut(&id) }

    pub fn insert(&mut self, player: Player) {
        assert!(self.map.insert(player.id, player).is_none());
    }
}

impl ops::Index<PlayerId> for Players {
    type Output = Player;
    fn index(&self, id: PlayerId) -> &Self::Output { &self.map[&id] }
}
impl ops::IndexMut<PlayerId> for Players {
    fn index_mut(&mut self, id: PlayerId) -> &mut Self::Output {
        self.map.get_mut(&id).unwrap()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Matches {
    next_id: u32,
    map: BTreeMap<MatchId, Match>,
}

impl Matches {
    pub fn new() -> Self { Self::default() }

    pub fn create(&mut self, court: CourtId, teams: EnumMap<Side, Vec<PlayerId>>) -> MatchId {
        let id = MatchId(self.next_id);
        self.next_id += 1;
        self.map.insert(id, Match { id, court, teams, status: MatchStatus::Waiting, score: None });
        id
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> { self.map.get(&id) }
    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> { self.map.get_mut(&id) }
    pub fn iter(&self) -> impl Iterator<Item = &Match> { self.map.values() }

    // Non-completed matches in ascending court order.
    pub fn occupying(&self) -> impl Iterator<Item = &Match> {
        let mut active: Vec<_> = self.map.values().filter(|m| m.occupies_court()).collect();
        active.sort_by_key(|m| m.court);
        active.into_iter()
    }

    pub fn in_progress(&self) -> impl Iterator<Item = &Match> {
        self.occupying().filter(|m| m.status == MatchStatus::InProgress)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Match> {
        self.map.values().filter(|m| m.is_over())
    }
}

impl ops::Index<MatchId> for Matches {
    type Output = Match;
    fn index(&self, id: MatchId) -> &Self::Output { &self.map[&id] }
}
impl ops::IndexMut<MatchId> for Matches {
    fn index_mut(&mut self, id: MatchId) -> &mut Self::Output {
        self.map.get_mut(&id).unwrap()
    }
}
