//! Per-user state carried between transactions.
//!
//! Every [`GooseUser`](goose::goose::GooseUser) gets its own [`TodoSession`]
//! from the on-start transaction. Nothing here is shared between users.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Settings;
use crate::ramp::GradualLoad;

/// Record identifiers this user has seen the API return.
///
/// May contain identifiers another user already deleted; requests against
/// them simply fail and are reported as such.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIds(Vec<String>);

impl KnownIds {
    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Replace everything with the latest listing snapshot.
    pub fn replace(&mut self, ids: Vec<String>) {
        self.0 = ids;
    }

    pub fn push(&mut self, id: String) {
        self.0.push(id);
    }

    /// Removes the first occurrence of `id`. Returns false if it was not
    /// present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.0.iter().position(|known| known == id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.0.choose(rng).map(String::as_str)
    }
}

impl From<Vec<String>> for KnownIds {
    fn from(ids: Vec<String>) -> Self {
        KnownIds(ids)
    }
}

pub struct TodoSession {
    pub settings: Arc<Settings>,
    pub known_ids: KnownIds,
    pub ramp: GradualLoad,
    hold_until: Option<Instant>,
}

impl TodoSession {
    pub fn new(settings: Arc<Settings>) -> Self {
        let ramp = GradualLoad::new(&settings.ramp);
        TodoSession {
            settings,
            known_ids: KnownIds::default(),
            ramp,
            hold_until: None,
        }
    }

    /// Keeps this user idle for `hold` from now.
    pub fn start_hold(&mut self, hold: Duration) {
        self.hold_until = Some(Instant::now() + hold);
    }

    /// Time left in the current hold. Clears the hold once it has passed.
    pub fn remaining_hold(&mut self) -> Option<Duration> {
        let until = self.hold_until?;
        let remaining = until.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            self.hold_until = None;
            return None;
        }
        Some(remaining)
    }

    /// Picks a target for a mutating action, or `None` when nothing is
    /// known yet.
    pub fn pick_target(&self) -> Option<String> {
        let mut rng = rand::thread_rng();
        self.known_ids.pick(&mut rng).map(str::to_owned)
    }
}
