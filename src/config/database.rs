//! Database configuration and connection pool initialization.
//!
//! The connection string is read from the `DATABASE_URL` environment
//! variable. Pending migrations from `migrations/` are applied at
//! startup.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool and runs migrations.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, the connection fails, or a
/// migration cannot be applied. Called once during startup; the
/// returned pool is cheaply cloneable.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
