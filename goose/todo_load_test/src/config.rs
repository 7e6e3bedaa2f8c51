//! Environment-driven settings.
//!
//! Everything here only seeds goose defaults or driver behavior; goose's own
//! command line flags still take precedence over `LOCUST_USERS` and
//! `LOCUST_SPAWN_RATE`.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;

use crate::error::ConfigError;

pub const DEFAULT_AUX_BASE_URL: &str =
    "https://us-central1-extreme-wind-457613-b2.cloudfunctions.net";

/// How `add_todo` picks the `dueDate` of a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePolicy {
    Fixed(NaiveDate),
    /// Today plus a uniform 1..=30 days.
    Random,
}

impl Default for DueDatePolicy {
    fn default() -> Self {
        DueDatePolicy::Fixed(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or(NaiveDate::MIN))
    }
}

impl FromStr for DueDatePolicy {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("random") {
            return Ok(DueDatePolicy::Random);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DueDatePolicy::Fixed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampSettings {
    pub steps: u32,
    pub step_duration: Duration,
    pub initial_users: u64,
    pub initial_spawn_rate: u64,
}

impl Default for RampSettings {
    fn default() -> Self {
        RampSettings {
            steps: 5,
            step_duration: Duration::from_secs(60),
            initial_users: 10,
            initial_spawn_rate: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub users: usize,
    pub spawn_rate: usize,
    pub aux_base_url: String,
    pub wait_min: Duration,
    pub wait_max: Duration,
    pub list_weight: usize,
    pub due_date: DueDatePolicy,
    pub ramp: RampSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            users: 100,
            spawn_rate: 10,
            aux_base_url: DEFAULT_AUX_BASE_URL.to_string(),
            wait_min: Duration::from_millis(1000),
            wait_max: Duration::from_millis(2000),
            list_weight: 2,
            due_date: DueDatePolicy::default(),
            ramp: RampSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to
    /// defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let get = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let users = parse_or(get("LOCUST_USERS"), "LOCUST_USERS", "user count", defaults.users)?;
        let spawn_rate = parse_or(
            get("LOCUST_SPAWN_RATE"),
            "LOCUST_SPAWN_RATE",
            "spawn rate",
            defaults.spawn_rate,
        )?;
        let wait_min_ms: u64 = parse_or(
            get("TODO_WAIT_MIN_MS"),
            "TODO_WAIT_MIN_MS",
            "millisecond count",
            defaults.wait_min.as_millis() as u64,
        )?;
        let wait_max_ms: u64 = parse_or(
            get("TODO_WAIT_MAX_MS"),
            "TODO_WAIT_MAX_MS",
            "millisecond count",
            defaults.wait_max.as_millis() as u64,
        )?;
        if wait_min_ms > wait_max_ms {
            return Err(ConfigError::WaitRange {
                min_ms: wait_min_ms,
                max_ms: wait_max_ms,
            });
        }

        let list_weight = parse_or(
            get("TODO_LIST_WEIGHT"),
            "TODO_LIST_WEIGHT",
            "weight",
            defaults.list_weight,
        )?;
        if list_weight == 0 {
            return Err(ConfigError::TooSmall {
                key: "TODO_LIST_WEIGHT",
                min: 1,
            });
        }

        let due_date = parse_or(
            get("TODO_DUE_DATE"),
            "TODO_DUE_DATE",
            "YYYY-MM-DD date or `random`",
            defaults.due_date,
        )?;
        let steps = parse_or(
            get("TODO_RAMP_STEPS"),
            "TODO_RAMP_STEPS",
            "step count",
            defaults.ramp.steps,
        )?;
        let step_secs: u64 = parse_or(
            get("TODO_RAMP_STEP_SECS"),
            "TODO_RAMP_STEP_SECS",
            "second count",
            defaults.ramp.step_duration.as_secs(),
        )?;

        let aux_base_url = get("TODO_AUX_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.aux_base_url);

        Ok(Settings {
            users,
            spawn_rate,
            aux_base_url,
            wait_min: Duration::from_millis(wait_min_ms),
            wait_max: Duration::from_millis(wait_max_ms),
            list_weight,
            due_date,
            ramp: RampSettings {
                steps,
                step_duration: Duration::from_secs(step_secs),
                ..defaults.ramp
            },
        })
    }

    pub fn aux_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.aux_base_url, endpoint)
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value,
            expected,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.users, 100);
        assert_eq!(settings.spawn_rate, 10);
        assert_eq!(settings.ramp.steps, 5);
    }

    #[test]
    fn users_and_spawn_rate_are_read() {
        let settings =
            settings_from(&[("LOCUST_USERS", "250"), ("LOCUST_SPAWN_RATE", " 25 ")]).unwrap();
        assert_eq!(settings.users, 250);
        assert_eq!(settings.spawn_rate, 25);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = settings_from(&[("LOCUST_USERS", "lots")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "LOCUST_USERS",
                ..
            }
        ));
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let settings = settings_from(&[("LOCUST_SPAWN_RATE", "  ")]).unwrap();
        assert_eq!(settings.spawn_rate, 10);
    }

    #[test]
    fn due_date_policy_parses() {
        let settings = settings_from(&[("TODO_DUE_DATE", "Random")]).unwrap();
        assert_eq!(settings.due_date, DueDatePolicy::Random);

        let settings = settings_from(&[("TODO_DUE_DATE", "2026-01-15")]).unwrap();
        assert_eq!(
            settings.due_date,
            DueDatePolicy::Fixed(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );

        assert!(settings_from(&[("TODO_DUE_DATE", "next week")]).is_err());
    }

    #[test]
    fn inverted_wait_range_is_rejected() {
        let err = settings_from(&[("TODO_WAIT_MIN_MS", "3000"), ("TODO_WAIT_MAX_MS", "200")])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WaitRange {
                min_ms: 3000,
                max_ms: 200
            }
        ));
    }

    #[test]
    fn zero_list_weight_is_rejected() {
        assert!(matches!(
            settings_from(&[("TODO_LIST_WEIGHT", "0")]),
            Err(ConfigError::TooSmall { .. })
        ));
    }

    #[test]
    fn aux_url_strips_trailing_slash() {
        let settings = settings_from(&[("TODO_AUX_BASE_URL", "http://127.0.0.1:9000/")]).unwrap();
        assert_eq!(
            settings.aux_url("completedTodos"),
            "http://127.0.0.1:9000/completedTodos"
        );
    }

    #[test]
    fn ramp_overrides_keep_initial_counters() {
        let settings =
            settings_from(&[("TODO_RAMP_STEPS", "3"), ("TODO_RAMP_STEP_SECS", "300")]).unwrap();
        assert_eq!(settings.ramp.steps, 3);
        assert_eq!(settings.ramp.step_duration, Duration::from_secs(300));
        assert_eq!(settings.ramp.initial_users, 10);
        assert_eq!(settings.ramp.initial_spawn_rate, 1);
    }
}
