use std::sync::Arc;
use std::time::Duration;

use goose::config::GooseConfiguration;
use goose::metrics::GooseMetrics;
use goose::prelude::*;
use gumdrop::Options;
use httpmock::MockServer;

use todo_load_test::config::Settings;
use todo_load_test::scenarios::Action;
use todo_load_test::transactions::start_session;

/// Settings pointing the auxiliary endpoints at `aux` and with no think
/// time between transactions.
pub fn settings_for(aux: &MockServer) -> Settings {
    Settings {
        aux_base_url: aux.base_url(),
        wait_min: Duration::ZERO,
        wait_max: Duration::ZERO,
        ..Settings::default()
    }
}

/// A scenario that runs `actions` once each per iteration, in the given
/// order, after the session is started.
pub fn sequence(name: &str, settings: Settings, actions: &[Action]) -> Scenario {
    let mut scenario = Scenario::new(name).register_transaction(start_session(Arc::new(settings)));
    for (position, action) in actions.iter().enumerate() {
        scenario = scenario.register_transaction(action.transaction().set_sequence(position + 1));
    }
    scenario
}

/// One user against `server`, plus whatever limits `custom` adds.
pub fn build_configuration(server: &MockServer, custom: &[&str]) -> GooseConfiguration {
    let host = server.base_url();
    let mut args = vec![
        "--host",
        host.as_str(),
        "--users",
        "1",
        "--hatch-rate",
        "1",
        "--no-telnet",
        "--no-websocket",
        "--quiet",
    ];
    args.extend_from_slice(custom);

    GooseConfiguration::parse_args_default(&args)
        .expect("failed to parse options and generate a configuration")
}

pub async fn run_load_test(configuration: GooseConfiguration, scenario: Scenario) -> GooseMetrics {
    GooseAttack::initialize_with_config(configuration)
        .unwrap()
        .register_scenario(scenario)
        .execute()
        .await
        .unwrap()
}

/// One user, one iteration, against `server`.
pub async fn run_once(server: &MockServer, scenario: Scenario) -> GooseMetrics {
    run_load_test(build_configuration(server, &["--iterations", "1"]), scenario).await
}

/// One user against `server` until `run_time` seconds have passed.
pub async fn run_for(server: &MockServer, scenario: Scenario, run_time: u64) -> GooseMetrics {
    let run_time = run_time.to_string();
    run_load_test(build_configuration(server, &["--run-time", &run_time]), scenario).await
}

pub fn fail_count(metrics: &GooseMetrics, key: &str) -> usize {
    metrics
        .requests
        .get(key)
        .map(|request| request.fail_count)
        .unwrap_or_default()
}
