//! Action/weight tables and the goose scenarios built from them.

use std::sync::Arc;

use goose::prelude::*;

use crate::config::Settings;
use crate::transactions::{
    add_todo, complete_todo, count_completed_todos, delete_todo, get_completed_todos,
    gradual_load, list_todos, start_session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListTodos,
    AddTodo,
    CompleteTodo,
    DeleteTodo,
    CountCompletedTodos,
    GetCompletedTodos,
    GradualLoad,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::ListTodos => "list_todos",
            Action::AddTodo => "add_todo",
            Action::CompleteTodo => "complete_todo",
            Action::DeleteTodo => "delete_todo",
            Action::CountCompletedTodos => "count_completed_todos",
            Action::GetCompletedTodos => "get_completed_todos",
            Action::GradualLoad => "gradual_load",
        }
    }

    /// Unweighted transaction for this action, named after it.
    pub fn transaction(self) -> Transaction {
        let transaction = match self {
            Action::ListTodos => transaction!(list_todos),
            Action::AddTodo => transaction!(add_todo),
            Action::CompleteTodo => transaction!(complete_todo),
            Action::DeleteTodo => transaction!(delete_todo),
            Action::CountCompletedTodos => transaction!(count_completed_todos),
            Action::GetCompletedTodos => transaction!(get_completed_todos),
            Action::GradualLoad => transaction!(gradual_load),
        };
        transaction.set_name(self.name())
    }
}

pub fn todo_weights(settings: &Settings) -> Vec<(Action, usize)> {
    vec![
        (Action::ListTodos, settings.list_weight),
        (Action::AddTodo, 2),
        (Action::CompleteTodo, 1),
        (Action::DeleteTodo, 1),
        (Action::CountCompletedTodos, 1),
        (Action::GetCompletedTodos, 1),
    ]
}

pub fn gradual_load_weights(settings: &Settings) -> Vec<(Action, usize)> {
    let mut weights = todo_weights(settings);
    weights.push((Action::GradualLoad, 1));
    weights
}

pub fn todo_user(settings: Arc<Settings>) -> Result<Scenario, GooseError> {
    let weights = todo_weights(&settings);
    build_scenario("TodoUser", settings, &weights)
}

pub fn gradual_load_user(settings: Arc<Settings>) -> Result<Scenario, GooseError> {
    let weights = gradual_load_weights(&settings);
    build_scenario("GradualLoadUser", settings, &weights)
}

/// Registers the session on-start transaction followed by each weighted
/// action. goose does the weighted selection.
pub fn build_scenario(
    name: &str,
    settings: Arc<Settings>,
    weights: &[(Action, usize)],
) -> Result<Scenario, GooseError> {
    let mut scenario = Scenario::new(name)
        .set_wait_time(settings.wait_min, settings.wait_max)?
        .register_transaction(start_session(Arc::clone(&settings)));

    for &(action, weight) in weights {
        scenario = scenario.register_transaction(action.transaction().set_weight(weight)?);
    }

    Ok(scenario)
}
