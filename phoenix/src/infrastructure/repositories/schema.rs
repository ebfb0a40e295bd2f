// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite schema helpers shared by [`super::sqlite_store::SqliteExperimentStore`].
//! Applies migrations on start-up so a fresh deployment and the integration
//! test suite see an identical schema.

use sqlx::migrate::MigrateDatabase;
use sqlx::SqlitePool;
use tracing::{debug, info};

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("ensuring database schema is up to date");
    sqlx::migrate!("../phoenix/migrations").run(pool).await?;
    info!("database schema is up to date");
    Ok(())
}

pub async fn create_database_if_missing(database_url: &str) -> Result<(), sqlx::Error> {
    if !sqlx::Sqlite::database_exists(database_url).await? {
        debug!(database_url, "database does not exist, creating");
        sqlx::Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

/// Creates the database file if missing, connects, and migrates — the one
/// call bootstrap needs to get a ready-to-use pool.
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_database_if_missing(database_url).await?;
    let pool = SqlitePool::connect(database_url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}
