use std::env;

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    types::BigDecimal,
    Pool, Postgres,
};

pub mod entity;

// Re-export commonly used types
pub use entity::{AccountLink, SocialAccount, Token, TokenHolder};

mod defaults {
    pub const DATABASE_MAX_CONNECTIONS: &str = "5";
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Invalid DATABASE_MAX_CONNECTIONS value: `{0}`")]
    InvalidMaxConnections(String),

    #[error("Database connection failed: {0}")]
    Connection(#[from] sqlx::Error),
}

async fn create_pool(max_connections: u32) -> Result<Pool<Postgres>, sqlx::Error> {
    let conn = PgConnectOptions::new();

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(conn)
        .await
}

pub async fn initialize_database() -> Result<Pool<Postgres>, DbError> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let raw = env::var("DATABASE_MAX_CONNECTIONS")
        .unwrap_or(String::from(defaults::DATABASE_MAX_CONNECTIONS));
    let db_max_connections = raw
        .parse::<u32>()
        .map_err(|_| DbError::InvalidMaxConnections(raw.clone()))?;

    let pool = create_pool(db_max_connections).await?;
    tracing::debug!(max_connections = db_max_connections, "Postgres pool ready");

    Ok(pool)
}

/// NUMERIC columns come back as BigDecimal; scoring works in f64.
pub fn numeric_to_f64(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}
