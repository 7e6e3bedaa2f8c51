use std::sync::Arc;

use goose::prelude::*;
use log::info;

use todo_load_test::config::Settings;
use todo_load_test::error::LoadTestError;
use todo_load_test::scenarios;

#[tokio::main]
async fn main() -> Result<(), LoadTestError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("todo_load_test=info"),
    )
    .init();

    let settings = Arc::new(Settings::from_env()?);
    info!(
        "default users {}, spawn rate {}, auxiliary endpoints at {}",
        settings.users, settings.spawn_rate, settings.aux_base_url
    );

    GooseAttack::initialize()?
        .register_scenario(scenarios::todo_user(Arc::clone(&settings))?)
        .register_scenario(scenarios::gradual_load_user(Arc::clone(&settings))?)
        .set_default(GooseDefault::Users, settings.users)?
        .set_default(GooseDefault::HatchRate, settings.spawn_rate.to_string().as_str())?
        .execute()
        .await?;

    Ok(())
}
