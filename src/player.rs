use serde::{Deserialize, Serialize};

pub const DEFAULT_RATING: i32 = 1500;

// Ids are assigned sequentially from roster order, which makes them a stable
// deterministic tie-breaker everywhere.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    // Elo-like integer rating. The update formula lives outside this crate;
    // see `Session::set_rating`.
    pub rating: i32,
    pub games_played: u32,
    // Evaluation cycles spent on the waitlist since last assignment.
    pub games_waited: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String, rating: i32) -> Self {
        Player { id, name, rating, games_played: 0, games_waited: 0 }
    }

    pub fn is_provisional(&self, provisional_threshold: u32) -> bool {
        self.games_played < provisional_threshold
    }
}
