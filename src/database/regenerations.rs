// ABOUTME: Append-only audit log of successful diet generations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::repositories::RegenerationLog;
use crate::errors::{AppError, AppResult};
use crate::models::PlanOrigin;

/// Regeneration audit log manager
pub struct RegenerationManager {
    pool: SqlitePool,
}

impl RegenerationManager {
    /// Create a new regeneration manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegenerationLog for RegenerationManager {
    async fn record(&self, user_id: Uuid, snapshot_id: Uuid, origin: PlanOrigin) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO diet_regenerations (id, user_id, snapshot_id, origin, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(snapshot_id.to_string())
        .bind(origin.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record regeneration: {e}")))?;

        Ok(())
    }

    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> AppResult<u64> {
        // RFC 3339 strings in UTC sort chronologically
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM diet_regenerations WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id.to_string())
        .bind(since.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count regenerations: {e}")))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
