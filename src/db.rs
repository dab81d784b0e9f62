use sqlx::{MySqlPool, migrate::MigrateError, mysql::MySqlPoolOptions};

use crate::config::AppConfig;

pub async fn establish_connection(config: &AppConfig) -> Result<MySqlPool, sqlx::Error> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL is not configured".into()))?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            log::error!("Failed to create database pool: {:?}", e);
            e
        })?;

    Ok(pool)
}

pub async fn run_migrations(pool: &MySqlPool) -> Result<(), MigrateError> {
    log::info!("applying database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}
