#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod assignment;
pub mod constraints;
pub mod error;
pub mod game;
pub mod hooks;
pub mod pairing;
pub mod player;
pub mod queue;
pub mod registry;
pub mod rules;
pub mod session;
pub mod test_util;
pub mod trial;
pub mod util;

pub use crate::game::{CourtId, Match, MatchId, MatchStatus, Score, Side};
pub use crate::hooks::{NoopSessionHooks, SessionHooks};
pub use crate::pairing::{PairCounts, PairHistory, PairKey};
pub use crate::player::{DEFAULT_RATING, Player, PlayerId};
pub use crate::rules::{
    DEFAULT_PROVISIONAL_THRESHOLD, Mode, RoamingRules, SessionFormat, SessionRules,
    WaitTieBreak,
};
pub use crate::session::{
    ConfigError, EventError, RosterEntry, Session, SessionConfig,
};
