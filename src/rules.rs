use serde::{Deserialize, Serialize};
use strum::EnumIter;

// How waiting players with equal wait counts are ordered. Must be stable and
// deterministic: trial runs replay the same ordering against cloned state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum WaitTieBreak {
    FewestGamesPlayed,
    HighestRating,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, Serialize, Deserialize)]
pub enum Mode {
    CompetitiveVariety,
    KingOfCourt,
    RoundRobin,
}

// Per-mode knobs consumed by the one shared assignment engine. Modes never get
// their own engine; they only reshape the constraint set and the queue order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModeProfile {
    pub roaming_enforced: bool,
    pub partner_weight: u64,
    pub opponent_weight: u64,
    pub tie_break: WaitTieBreak,
}

impl Mode {
    pub fn profile(self) -> ModeProfile {
        match self {
            Mode::CompetitiveVariety => ModeProfile {
                roaming_enforced: true,
                partner_weight: 2,
                opponent_weight: 1,
                tie_break: WaitTieBreak::FewestGamesPlayed,
            },
            // Anyone may challenge up the ladder, and re-facing the court
            // holder is the point of the format.
            Mode::KingOfCourt => ModeProfile {
                roaming_enforced: false,
                partner_weight: 1,
                opponent_weight: 0,
                tie_break: WaitTieBreak::HighestRating,
            },
            Mode::RoundRobin => ModeProfile {
                roaming_enforced: false,
                partner_weight: 3,
                opponent_weight: 3,
                tie_break: WaitTieBreak::FewestGamesPlayed,
            },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, Serialize, Deserialize)]
pub enum SessionFormat {
    Singles,
    Doubles,
}

impl SessionFormat {
    pub fn team_size(self) -> usize {
        match self {
            SessionFormat::Singles => 1,
            SessionFormat::Doubles => 2,
        }
    }
}

// Rank-distance bounds for established players. The ladder starts at
// `initial_width` and widens by `widen_step` at most `max_widenings` times
// before giving up on the bound entirely.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RoamingRules {
    pub initial_width: u32,
    pub widen_step: u32,
    pub max_widenings: u32,
}

impl Default for RoamingRules {
    fn default() -> Self {
        RoamingRules { initial_width: 3, widen_step: 2, max_widenings: 3 }
    }
}

pub const DEFAULT_PROVISIONAL_THRESHOLD: u32 = 2;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SessionRules {
    pub mode: Mode,
    pub format: SessionFormat,
    pub court_count: u32,
    // Players with fewer completed games than this are provisional: exempt
    // from roaming bounds and excluded from skill balancing.
    pub provisional_threshold: u32,
    pub roaming: RoamingRules,
}

impl SessionRules {
    pub fn competitive_doubles(court_count: u32) -> Self {
        SessionRules {
            mode: Mode::CompetitiveVariety,
            format: SessionFormat::Doubles,
            court_count,
            provisional_threshold: DEFAULT_PROVISIONAL_THRESHOLD,
            roaming: RoamingRules::default(),
        }
    }

    pub fn competitive_singles(court_count: u32) -> Self {
        SessionRules {
            format: SessionFormat::Singles,
            ..Self::competitive_doubles(court_count)
        }
    }

    pub fn players_per_court(&self) -> usize { self.format.team_size() * 2 }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::constraints::{RoamingWidth, relaxation_ladder};

    // Whatever the mode, the ladder must end unbounded: only the banned-pair
    // rule may ever make an assignment infeasible.
    #[test]
    fn every_mode_ends_its_ladder_unbounded() {
        for mode in Mode::iter() {
            let profile = mode.profile();
            let ladder =
                relaxation_ladder(&RoamingRules::default(), profile.roaming_enforced);
            assert_eq!(ladder.last(), Some(&RoamingWidth::Unbounded), "{mode:?}");
        }
    }
}
