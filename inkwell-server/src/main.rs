use anyhow::{Context, Result};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let jwt = JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds);
    let state = AppState::new(pool, jwt);

    server::run_http(&settings, state).await
}
