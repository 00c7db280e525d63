// Session controller: owns the canonical registry and processes one lifecycle
// event at a time (start match, complete match, evaluate). Every mutation goes
// through here; the assignment engine decides who plays, and the trial engine
// re-runs the same cascade on clones to predict dependencies.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use derive_new::new;
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::game::{CourtId, Match, MatchId, MatchStatus, Score};
use crate::hooks::{NoopSessionHooks, SessionHooks};
use crate::internal_error_message;
use crate::pairing::{PairHistory, PairKey};
use crate::player::{DEFAULT_RATING, Player, PlayerId};
use crate::registry::{Matches, Players};
use crate::rules::SessionRules;
use crate::{assignment, queue, trial};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, new)]
pub struct RosterEntry {
    pub name: String,
    #[new(value = "DEFAULT_RATING")]
    pub rating: i32,
}

impl RosterEntry {
    pub fn with_rating(name: impl Into<String>, rating: i32) -> Self {
        RosterEntry { name: name.into(), rating }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub rules: SessionRules,
    pub roster: Vec<RosterEntry>,
    // Pairs of roster names that must never share a team.
    pub banned_pairs: Vec<(String, String)>,
}

impl SessionConfig {
    pub fn new(rules: SessionRules, roster: Vec<RosterEntry>) -> Self {
        SessionConfig { rules, roster, banned_pairs: Vec::new() }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConfigError {
    NoCourts,
    EmptyRoster,
    DuplicatePlayerName(String),
    UnknownPlayerInBannedPair(String),
    SelfBannedPair(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoCourts => write!(f, "session must have at least one court"),
            ConfigError::EmptyRoster => write!(f, "session roster is empty"),
            ConfigError::DuplicatePlayerName(name) => {
                write!(f, "duplicate player name in roster: {name}")
            }
            ConfigError::UnknownPlayerInBannedPair(name) => {
                write!(f, "banned pair references unknown player: {name}")
            }
            ConfigError::SelfBannedPair(name) => {
                write!(f, "banned pair lists {name} twice")
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventError {
    UnknownMatch(MatchId),
    UnknownPlayer(PlayerId),
    MatchNotStartable(MatchStatus),
    MatchNotCompletable(MatchStatus),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::UnknownMatch(id) => write!(f, "unknown match id {}", id.0),
            EventError::UnknownPlayer(id) => write!(f, "unknown player id {}", id.0),
            EventError::MatchNotStartable(status) => {
                write!(f, "cannot start a match in {status:?} status")
            }
            EventError::MatchNotCompletable(status) => {
                write!(f, "cannot complete a match in {status:?} status")
            }
        }
    }
}

// The whole session is an explicit value: cloning it yields a fully
// independent snapshot, which is what the trial engine relies on. No ambient
// shared state anywhere.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Session {
    pub(crate) rules: SessionRules,
    pub(crate) players: Players,
    pub(crate) matches: Matches,
    pub(crate) banned_pairs: BTreeSet<PairKey>,
    pub(crate) pair_history: PairHistory,
    // Insertion-ordered; priority order is derived on demand by `queue::rank`.
    pub(crate) waiting: Vec<PlayerId>,
    // Derived by the trial engine after every canonical mutation.
    pub(crate) dependencies: BTreeMap<PlayerId, BTreeSet<CourtId>>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        if config.rules.court_count == 0 {
            return Err(ConfigError::NoCourts);
        }
        if config.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut players = Players::new();
        let mut by_name = BTreeMap::new();
        for (i, entry) in config.roster.iter().enumerate() {
            let id = PlayerId(i as u32);
            if by_name.insert(entry.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicatePlayerName(entry.name.clone()));
            }
            players.insert(Player::new(id, entry.name.clone(), entry.rating));
        }
        let mut banned_pairs = BTreeSet::new();
        for (a, b) in &config.banned_pairs {
            let id_a = *by_name
                .get(a)
                .ok_or_else(|| ConfigError::UnknownPlayerInBannedPair(a.clone()))?;
            let id_b = *by_name
                .get(b)
                .ok_or_else(|| ConfigError::UnknownPlayerInBannedPair(b.clone()))?;
            if id_a == id_b {
                return Err(ConfigError::SelfBannedPair(a.clone()));
            }
            banned_pairs.insert(PairKey::new(id_a, id_b));
        }
        let waiting = players.ids().collect();
        let session = Session {
            rules: config.rules,
            players,
            matches: Matches::new(),
            banned_pairs,
            pair_history: PairHistory::new(),
            waiting,
            dependencies: BTreeMap::new(),
        };
        session.check_invariants();
        Ok(session)
    }

    pub fn rules(&self) -> &SessionRules { &self.rules }
    pub fn players(&self) -> &Players { &self.players }
    pub fn matches(&self) -> &Matches { &self.matches }
    pub fn waitlist(&self) -> &[PlayerId] { &self.waiting }
    pub fn banned_pairs(&self) -> &BTreeSet<PairKey> { &self.banned_pairs }
    pub fn pair_history(&self) -> &PairHistory { &self.pair_history }
    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> { self.matches.get(id) }

    // Waiting players in current assignment-priority order.
    pub fn waiting_players(&self) -> Vec<PlayerId> { queue::rank(self) }

    pub fn dependencies(&self) -> &BTreeMap<PlayerId, BTreeSet<CourtId>> {
        &self.dependencies
    }

    pub fn match_history(&self) -> Vec<&Match> { self.matches.completed().collect() }

    pub fn free_courts(&self) -> Vec<CourtId> {
        let occupied: BTreeSet<_> = self.matches.occupying().map(|m| m.court).collect();
        (1..=self.rules.court_count)
            .map(CourtId)
            .filter(|court| !occupied.contains(court))
            .collect()
    }

    // Explicit re-run of the assignment engine across every free court. Used
    // at session start and after manual changes; calling it again without an
    // intervening state change creates no additional matches.
    pub fn evaluate_and_create_matches(&mut self) -> Vec<MatchId> {
        let free = self.free_courts();
        let created = assignment::fill_courts(self, &free);
        for &id in &created {
            let game = &self.matches[id];
            info!("Match {} created on court {}", id.0, game.court.0);
        }
        self.recompute_dependencies();
        self.check_invariants();
        created
    }

    pub fn start_match(&mut self, match_id: MatchId) -> Result<(), EventError> {
        self.start_match_with_hooks(match_id, &mut NoopSessionHooks)
    }

    pub fn start_match_with_hooks(
        &mut self, match_id: MatchId, hooks: &mut dyn SessionHooks,
    ) -> Result<(), EventError> {
        let game =
            self.matches.get_mut(match_id).ok_or(EventError::UnknownMatch(match_id))?;
        if game.status != MatchStatus::Waiting {
            return Err(EventError::MatchNotStartable(game.status));
        }
        game.status = MatchStatus::InProgress;
        info!("Match {} started on court {}", match_id.0, game.court.0);
        hooks.on_match_started(game);
        self.recompute_dependencies();
        self.check_invariants();
        Ok(())
    }

    pub fn complete_match(&mut self, match_id: MatchId, score: Score) -> Result<(), EventError> {
        self.complete_match_with_hooks(match_id, score, &mut NoopSessionHooks)
    }

    // The full completion cascade: record the result, return the players to
    // the waitlist, refill the freed court, recompute dependencies.
    pub fn complete_match_with_hooks(
        &mut self, match_id: MatchId, score: Score, hooks: &mut dyn SessionHooks,
    ) -> Result<(), EventError> {
        let game = self.matches.get(match_id).ok_or(EventError::UnknownMatch(match_id))?;
        if game.status != MatchStatus::InProgress {
            return Err(EventError::MatchNotCompletable(game.status));
        }
        let court = self.apply_completion(match_id, Some(score));
        info!("Match {} completed on court {}", match_id.0, court.0);
        hooks.on_match_completed(&self.matches[match_id]);
        // Every free court, not just the freed one: a court left unfilled by
        // an earlier infeasible assignment is retried on this event.
        let free = self.free_courts();
        assignment::fill_courts(self, &free);
        self.recompute_dependencies();
        self.check_invariants();
        Ok(())
    }

    // Entry point for the external rating updater; the update formula itself
    // lives outside this crate.
    pub fn set_rating(&mut self, player_id: PlayerId, rating: i32) -> Result<(), EventError> {
        let player =
            self.players.get_mut(player_id).ok_or(EventError::UnknownPlayer(player_id))?;
        player.rating = rating;
        self.recompute_dependencies();
        Ok(())
    }

    // Shared by the real completion handler and the trial engine. Keeping one
    // code path is what guarantees predicted assignments match real ones.
    fn apply_completion(&mut self, match_id: MatchId, score: Option<Score>) -> CourtId {
        let game = &mut self.matches[match_id];
        game.status = MatchStatus::Completed;
        if score.is_some() {
            game.score = score;
        }
        let court = game.court;
        let players = game.players().collect_vec();
        self.pair_history.record_match(&self.matches[match_id]);
        for &id in &players {
            let player = &mut self.players[id];
            player.games_played += 1;
            player.games_waited = 0;
            self.waiting.push(id);
        }
        court
    }

    // Trial-only completion inside a clone: no score is recorded, everything
    // else follows the real handler.
    pub(crate) fn apply_trial_completion(&mut self, match_id: MatchId) {
        let status = self.matches[match_id].status;
        if status != MatchStatus::InProgress {
            panic!(
                "{}",
                internal_error_message!("trial completion of a {:?} match", status)
            );
        }
        self.apply_completion(match_id, None);
    }

    fn recompute_dependencies(&mut self) {
        self.dependencies = trial::compute_dependencies(self);
    }

    // Registry invariants. A violation means a caller bypassed the session
    // controller; the state must not be silently repaired.
    fn check_invariants(&self) {
        let team_size = self.rules.format.team_size();
        let mut assigned = BTreeSet::new();
        let mut courts = BTreeSet::new();
        for game in self.matches.iter().filter(|m| m.occupies_court()) {
            if game.teams.values().any(|team| team.len() != team_size) {
                panic!(
                    "{}",
                    internal_error_message!("match {} has a wrong-sized team", game.id.0)
                );
            }
            if game.court.0 == 0 || game.court.0 > self.rules.court_count {
                panic!(
                    "{}",
                    internal_error_message!("match {} is on unknown court {}", game.id.0, game.court.0)
                );
            }
            if !courts.insert(game.court) {
                panic!(
                    "{}",
                    internal_error_message!("court {} hosts two active matches", game.court.0)
                );
            }
            for id in game.players() {
                if !self.players.contains(id) {
                    panic!(
                        "{}",
                        internal_error_message!("match {} references unknown player", game.id.0)
                    );
                }
                if !assigned.insert(id) {
                    panic!(
                        "{}",
                        internal_error_message!("player {} is in two active matches", id.0)
                    );
                }
            }
        }
        let waiting: BTreeSet<_> = self.waiting.iter().copied().collect();
        if waiting.len() != self.waiting.len() {
            panic!("{}", internal_error_message!("waitlist contains duplicates"));
        }
        if let Some(id) = waiting.intersection(&assigned).next() {
            panic!(
                "{}",
                internal_error_message!("player {} is both waiting and playing", id.0)
            );
        }
        if assigned.len() + waiting.len() != self.players.len() {
            panic!(
                "{}",
                internal_error_message!(
                    "conservation violated: {} assigned + {} waiting != {} players",
                    assigned.len(),
                    waiting.len(),
                    self.players.len()
                )
            );
        }
    }
}
