//! Wire payloads for the TODO API.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DueDatePolicy;
use crate::error::RequestFailure;

pub const TODOS_PATH: &str = "todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub due_date: String,
    pub priority: Priority,
}

impl NewTodo {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, due: DueDatePolicy, today: NaiveDate) -> Self {
        let due_date = match due {
            DueDatePolicy::Fixed(date) => date,
            DueDatePolicy::Random => today + Duration::days(rng.gen_range(1..=30)),
        };
        NewTodo {
            title: format!("Test Task {}", rng.gen_range(1..=100_000)),
            completed: false,
            due_date: due_date.format("%Y-%m-%d").to_string(),
            priority: *Priority::ALL.choose(rng).unwrap_or(&Priority::Medium),
        }
    }
}

/// Body of `PUT /todos/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompleteTodo {
    pub completed: bool,
}

impl CompleteTodo {
    pub const DONE: CompleteTodo = CompleteTodo { completed: true };
}

/// The only part of a record the driver reads back.
#[derive(Debug, Deserialize)]
struct RecordId {
    #[serde(rename = "_id")]
    id: Option<String>,
}

pub fn todo_path(id: &str) -> String {
    format!("{TODOS_PATH}/{id}")
}

/// Identifiers from a `GET /todos` body, in order. Entries without `_id`
/// are skipped.
pub fn listing_ids(body: &str) -> Result<Vec<String>, RequestFailure> {
    let records: Vec<RecordId> = serde_json::from_str(body)?;
    Ok(records.into_iter().filter_map(|r| r.id).collect())
}

/// Identifier of the record returned by `POST /todos`.
pub fn created_id(body: &str) -> Result<String, RequestFailure> {
    let record: RecordId = serde_json::from_str(body)?;
    record.id.ok_or(RequestFailure::MissingId)
}
