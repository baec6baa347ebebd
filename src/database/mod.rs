// ABOUTME: SQLite persistence for users, preferences, diet snapshots, shopping lists and audit events
// ABOUTME: Owns the connection pool, idempotent schema migration, and per-area managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Ids are stored as TEXT UUIDs and timestamps as RFC 3339 TEXT. Each area of
//! the store has a manager that implements the matching trait in
//! [`repositories`]; the generation service only sees the traits.

mod profiles;
mod regenerations;
/// Repository contracts used by the diet services
pub mod repositories;
mod shopping;
mod snapshots;

pub use profiles::{NewPreferences, NewUser, ProfileManager};
pub use regenerations::RegenerationManager;
pub use shopping::ShoppingListManager;
pub use snapshots::SnapshotManager;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Connection pool plus schema management
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the store and run migrations
    ///
    /// In-memory URLs get a single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the store cannot be opened, or
    /// migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {database_url}: {e}")))?;

        let db = Self::from_pool(pool);
        db.migrate().await?;
        info!("Database ready at {}", database_url);
        Ok(db)
    }

    /// Wrap an existing pool without migrating
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Users and preference submissions
    #[must_use]
    pub fn profiles(&self) -> ProfileManager {
        ProfileManager::new(self.pool.clone())
    }

    /// Diet snapshots with their meals and items
    #[must_use]
    pub fn snapshots(&self) -> SnapshotManager {
        SnapshotManager::new(self.pool.clone())
    }

    /// Shopping lists
    #[must_use]
    pub fn shopping_lists(&self) -> ShoppingListManager {
        ShoppingListManager::new(self.pool.clone())
    }

    /// Regeneration audit log
    #[must_use]
    pub fn regenerations(&self) -> RegenerationManager {
        RegenerationManager::new(self.pool.clone())
    }

    /// Create every table and index if missing
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_profiles().await?;
        self.migrate_snapshots().await?;
        self.migrate_shopping_lists().await?;
        self.migrate_regenerations().await?;
        debug!("Schema migration complete");
        Ok(())
    }

    async fn execute_ddl(&self, statement: &str) -> AppResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        Ok(())
    }

    async fn migrate_profiles(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                weight_kg REAL,
                height_cm REAL,
                age INTEGER,
                sex TEXT,
                plan TEXT,
                workout_frequency TEXT,
                workout_duration TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS diet_preferences (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                foods TEXT NOT NULL,
                workout_frequency TEXT,
                workout_duration TEXT,
                bottle_size_ml INTEGER,
                weight_kg REAL,
                height_cm REAL,
                age INTEGER,
                sex TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_diet_preferences_user_active ON diet_preferences(user_id, is_active)",
        )
        .await
    }

    async fn migrate_snapshots(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS diet_snapshots (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                daily_calories INTEGER NOT NULL,
                macros TEXT NOT NULL,
                origin TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS snapshot_meals (
                id TEXT PRIMARY KEY,
                snapshot_id TEXT NOT NULL REFERENCES diet_snapshots(id) ON DELETE CASCADE,
                slot TEXT NOT NULL,
                name TEXT NOT NULL,
                order_index INTEGER NOT NULL,
                time TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS snapshot_items (
                id TEXT PRIMARY KEY,
                meal_id TEXT NOT NULL REFERENCES snapshot_meals(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                quantity_text TEXT NOT NULL,
                quantity_value REAL NOT NULL,
                quantity_unit TEXT NOT NULL,
                calories REAL NOT NULL,
                protein_g REAL NOT NULL,
                carbs_g REAL NOT NULL,
                fat_g REAL NOT NULL,
                category TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_diet_snapshots_user_active ON diet_snapshots(user_id, is_active)",
        )
        .await?;
        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_snapshot_meals_snapshot ON snapshot_meals(snapshot_id)",
        )
        .await?;
        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_snapshot_items_meal ON snapshot_items(meal_id)",
        )
        .await
    }

    async fn migrate_shopping_lists(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS shopping_lists (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                snapshot_id TEXT NOT NULL REFERENCES diet_snapshots(id) ON DELETE CASCADE,
                period TEXT NOT NULL CHECK (period IN ('weekly', 'monthly')),
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS shopping_list_items (
                id TEXT PRIMARY KEY,
                list_id TEXT NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                unit TEXT NOT NULL,
                quantity REAL NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_shopping_lists_snapshot ON shopping_lists(snapshot_id)",
        )
        .await
    }

    async fn migrate_regenerations(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS diet_regenerations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                snapshot_id TEXT NOT NULL,
                origin TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_diet_regenerations_user ON diet_regenerations(user_id, created_at)",
        )
        .await
    }
}

// ============================================================================
// Row decoding helpers shared by the managers
// ============================================================================

pub(crate) fn parse_uuid(value: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Invalid UUID in {field}: {e}")))
}

pub(crate) fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp in {field}: {e}")))
}

pub(crate) fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::database(format!("Invalid date in {field}: {e}")))
}

/// Optional non-negative INTEGER column as `u32`
pub(crate) fn to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}
