// Test utilities that cannot be moved to the "tests" folder, because unit
// tests use them as well.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::rules::SessionRules;
use crate::session::{RosterEntry, Session, SessionConfig};

// In theory nothing in the engine is random, but roster-order robustness tests
// shuffle their input; fix the seed to avoid sporadic failures.
pub fn deterministic_rng() -> impl Rng {
    rand::rngs::StdRng::from_seed([0; 32])
}

const SAMPLE_NAMES: [&str; 16] = [
    "Alice", "Bob", "Charlie", "Dave", "Eve", "Frank", "Grace", "Heidi", "Ivan", "Judy",
    "Mallory", "Niaj", "Olivia", "Peggy", "Rupert", "Sybil",
];

// Ratings descend in roster order so rank-based assertions have structure.
pub fn sample_roster(count: usize) -> Vec<RosterEntry> {
    (0..count)
        .map(|i| {
            let name = match SAMPLE_NAMES.get(i) {
                Some(name) => (*name).to_owned(),
                None => format!("Player{i}"),
            };
            RosterEntry::with_rating(name, 1900 - (i as i32) * 50)
        })
        .collect()
}

pub fn shuffled_roster(count: usize, rng: &mut impl Rng) -> Vec<RosterEntry> {
    let mut roster = sample_roster(count);
    roster.shuffle(rng);
    roster
}

pub fn sample_session(rules: SessionRules, player_count: usize) -> Session {
    Session::new(SessionConfig::new(rules, sample_roster(player_count))).unwrap()
}
