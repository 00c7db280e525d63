use derive_new::new;
use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::player::PlayerId;

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CourtId(pub u32);

#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub u32);

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, new)]
pub struct Score {
    pub a: u32,
    pub b: u32,
}

impl Score {
    pub fn winner(self) -> Option<Side> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

// A single game on one court. Created by the assignment engine in `Waiting`
// status; transitioned only by the session controller. Trial clones get their
// own copies, so nothing here is ever mutated speculatively.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub court: CourtId,
    // Each side holds 1 player (singles) or 2 (doubles), sorted by id.
    pub teams: EnumMap<Side, Vec<PlayerId>>,
    pub status: MatchStatus,
    pub score: Option<Score>,
}

impl Match {
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.teams.values().flatten().copied()
    }

    pub fn team_size(&self) -> usize { self.teams[Side::A].len() }

    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        self.teams
            .iter()
            .find(|(_, team)| team.contains(&player_id))
            .map(|(side, _)| side)
    }

    pub fn is_over(&self) -> bool { self.status == MatchStatus::Completed }

    // A non-completed match occupies its court and keeps its players off the
    // waitlist, whether or not play has started.
    pub fn occupies_court(&self) -> bool { !self.is_over() }
}
