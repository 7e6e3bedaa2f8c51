//! Step counter behind the `gradual_load` transaction.
//!
//! The doubled counters are only logged. They do not change how many users
//! goose actually runs.

use std::time::Duration;

use crate::config::RampSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampStep {
    /// 1-based.
    pub index: u32,
    pub users: u64,
    pub spawn_rate: u64,
    pub hold: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradualLoad {
    taken: u32,
    steps: u32,
    users: u64,
    spawn_rate: u64,
    hold: Duration,
}

impl GradualLoad {
    pub fn new(settings: &RampSettings) -> Self {
        GradualLoad {
            taken: 0,
            steps: settings.steps,
            users: settings.initial_users,
            spawn_rate: settings.initial_spawn_rate,
            hold: settings.step_duration,
        }
    }

    /// Doubles both counters and returns the new step, or `None` once every
    /// step has been taken.
    pub fn advance(&mut self) -> Option<RampStep> {
        if self.is_finished() {
            return None;
        }
        self.taken += 1;
        self.users = self.users.saturating_mul(2);
        self.spawn_rate = self.spawn_rate.saturating_mul(2);
        Some(RampStep {
            index: self.taken,
            users: self.users,
            spawn_rate: self.spawn_rate,
            hold: self.hold,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.taken >= self.steps
    }
}
