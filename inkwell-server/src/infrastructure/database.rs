use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

pub(crate) async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!(max_connections, "connected to PostgreSQL");
    Ok(pool)
}

pub(crate) async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!().run(pool).await?;
    info!("migrations completed");
    Ok(())
}
