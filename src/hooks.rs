use crate::game::Match;

// Observation surface for external collaborators: scorekeeping, rating
// updates, persistence. Hooks are borrowed per call and never stored inside
// the session, so session values stay freely clonable for trial runs.
pub trait SessionHooks {
    fn on_match_started(&mut self, _game: &Match) {}
    fn on_match_completed(&mut self, _game: &Match) {}
}

pub struct NoopSessionHooks;

impl SessionHooks for NoopSessionHooks {}
