use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use goose::goose::{GooseResponse, TransactionFunction};
use goose::metrics::GooseRequestMetric;
use goose::prelude::*;
use goose_eggs::{validate_page, Validate};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Settings;
use crate::error::RequestFailure;
use crate::session::TodoSession;
use crate::todo::{self, CompleteTodo, NewTodo, TODOS_PATH};

/// Metric name shared by every `/todos/{id}` request.
const TODO_BY_ID: &str = "/todos/{id}";
const TODOS: &str = "/todos";

/// Longest single sleep while a ramp hold is active. goose only checks for
/// shutdown between transactions.
const HOLD_SLICE: Duration = Duration::from_millis(250);

/// On-start transaction that gives the user a fresh [`TodoSession`].
pub fn start_session(settings: Arc<Settings>) -> Transaction {
    let closure: TransactionFunction = Arc::new(move |user| {
        user.set_session_data(TodoSession::new(Arc::clone(&settings)));
        Box::pin(async move { Ok(()) })
    });

    Transaction::new(closure)
        .set_name("start_session")
        .set_on_start()
}

pub async fn list_todos(user: &mut GooseUser) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let goose = user.get_named(TODOS_PATH, TODOS).await?;
    let (mut request, received) = read_reply(goose).await;
    let reply = match received {
        Ok(reply) => reply,
        Err(failure) => return report(user, &mut request, &failure, None),
    };

    match reply.body_if(200).and_then(todo::listing_ids) {
        Ok(ids) => {
            if let Some(session) = user.get_session_data_mut::<TodoSession>() {
                session.known_ids.replace(ids);
            }
            Ok(())
        }
        Err(failure) => report(user, &mut request, &failure, Some(&reply)),
    }
}

pub async fn add_todo(user: &mut GooseUser) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let Some(due) = user
        .get_session_data::<TodoSession>()
        .map(|session| session.settings.due_date)
    else {
        return missing_session(user, "add_todo");
    };

    // ThreadRng is not Send, keep it out of the await points.
    let new_todo = {
        let mut rng = rand::thread_rng();
        NewTodo::random(&mut rng, due, Local::now().date_naive())
    };

    let goose = send_json(user, GooseMethod::Post, TODOS_PATH, TODOS, &new_todo).await?;
    let (mut request, received) = read_reply(goose).await;
    let reply = match received {
        Ok(reply) => reply,
        Err(failure) => return report(user, &mut request, &failure, None),
    };

    match reply.body_if(201).and_then(todo::created_id) {
        Ok(id) => {
            if let Some(session) = user.get_session_data_mut::<TodoSession>() {
                session.known_ids.push(id);
            }
            Ok(())
        }
        Err(failure) => report(user, &mut request, &failure, Some(&reply)),
    }
}

pub async fn complete_todo(user: &mut GooseUser) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let Some(id) = pick_target(user) else {
        debug!("user {} knows no todos, skipping complete", user.weighted_users_index);
        return Ok(());
    };

    let path = todo::todo_path(&id);
    let goose = send_json(user, GooseMethod::Put, &path, TODO_BY_ID, &CompleteTodo::DONE).await?;

    let validate = Validate::builder().status(200).build();
    validate_page(user, goose, &validate).await?;

    Ok(())
}

pub async fn delete_todo(user: &mut GooseUser) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let Some(id) = pick_target(user) else {
        debug!("user {} knows no todos, skipping delete", user.weighted_users_index);
        return Ok(());
    };

    let path = todo::todo_path(&id);
    let request_builder = user.get_request_builder(&GooseMethod::Delete, &path)?;
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Delete)
        .path(path.as_str())
        .name(TODO_BY_ID)
        .set_request_builder(request_builder)
        .build();
    let goose = user.request(goose_request).await?;

    let validate = Validate::builder().status(204).build();
    validate_page(user, goose, &validate).await?;

    if let Some(session) = user.get_session_data_mut::<TodoSession>() {
        session.known_ids.remove(&id);
    }

    Ok(())
}

pub async fn count_completed_todos(user: &mut GooseUser) -> TransactionResult {
    get_auxiliary(user, "countCompletedTodos").await
}

pub async fn get_completed_todos(user: &mut GooseUser) -> TransactionResult {
    get_auxiliary(user, "completedTodos").await
}

/// Takes the next ramp step, logs the doubled counters and starts a hold of
/// the step duration. While the hold lasts, every transaction of this user
/// only sleeps in short slices. A no-op once the steps are used up.
pub async fn gradual_load(user: &mut GooseUser) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let Some(session) = user.get_session_data_mut::<TodoSession>() else {
        return Ok(());
    };
    let Some(step) = session.ramp.advance() else {
        return Ok(());
    };
    session.start_hold(step.hold);

    info!(
        "user {} ramp step {}: users {}, spawn rate {}, holding {:?}",
        user.weighted_users_index, step.index, step.users, step.spawn_rate, step.hold
    );
    sit_out_hold(user).await;

    Ok(())
}

/// Sleeps for at most one slice if this user is inside a ramp hold.
/// Returns false when there is no hold to sit out.
async fn sit_out_hold(user: &mut GooseUser) -> bool {
    let Some(remaining) = user
        .get_session_data_mut::<TodoSession>()
        .and_then(TodoSession::remaining_hold)
    else {
        return false;
    };
    tokio::time::sleep(remaining.min(HOLD_SLICE)).await;
    true
}

async fn get_auxiliary(user: &mut GooseUser, endpoint: &str) -> TransactionResult {
    if sit_out_hold(user).await {
        return Ok(());
    }

    let Some(url) = user
        .get_session_data::<TodoSession>()
        .map(|session| session.settings.aux_url(endpoint))
    else {
        return missing_session(user, endpoint);
    };

    // Absolute URL, so goose bypasses the configured host.
    let goose = user.get_named(&url, endpoint).await?;

    let validate = Validate::builder().status(200).build();
    validate_page(user, goose, &validate).await?;

    Ok(())
}

fn pick_target(user: &GooseUser) -> Option<String> {
    user.get_session_data::<TodoSession>()
        .and_then(TodoSession::pick_target)
}

async fn send_json<T: Serialize>(
    user: &mut GooseUser,
    method: GooseMethod,
    path: &str,
    name: &str,
    body: &T,
) -> Result<GooseResponse, Box<TransactionError>> {
    let request_builder = user.get_request_builder(&method, path)?.json(body);

    let goose_request = GooseRequest::builder()
        .method(method)
        .path(path)
        .name(name)
        .set_request_builder(request_builder)
        .build();

    user.request(goose_request).await
}

struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn body_if(&self, expected: u16) -> Result<&str, RequestFailure> {
        if self.status == expected {
            Ok(&self.body)
        } else {
            Err(RequestFailure::UnexpectedStatus {
                expected,
                actual: self.status,
            })
        }
    }
}

/// Splits a goose response into its metric and the status/body pair.
/// Transport errors while connecting or reading come back as a failure.
async fn read_reply(goose: GooseResponse) -> (GooseRequestMetric, Result<Reply, RequestFailure>) {
    let request = goose.request;
    let received = match goose.response {
        Ok(response) => {
            let status = response.status().as_u16();
            match response.text().await {
                Ok(body) => Ok(Reply { status, body }),
                Err(e) => Err(RequestFailure::Transport(e.to_string())),
            }
        }
        Err(e) => Err(RequestFailure::Transport(e.to_string())),
    };
    (request, received)
}

fn report(
    user: &mut GooseUser,
    request: &mut GooseRequestMetric,
    failure: &RequestFailure,
    reply: Option<&Reply>,
) -> TransactionResult {
    let tag = format!("{}: {failure}", request.name);
    user.set_failure(&tag, request, None, reply.map(|r| r.body.as_str()))
}

fn missing_session(user: &mut GooseUser, action: &str) -> TransactionResult {
    warn!(
        "user {} has no todo session, skipping {action}",
        user.weighted_users_index
    );
    Ok(())
}
