// ABOUTME: Database operations for shopping lists and their aggregated lines
// ABOUTME: Lists are insert-only; every generation writes a fresh weekly and monthly pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::repositories::ShoppingListRepository;
use super::{parse_date, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{ShoppingLine, ShoppingList, ShoppingListDraft, ShoppingPeriod};

/// Shopping list database operations manager
pub struct ShoppingListManager {
    pool: SqlitePool,
}

impl ShoppingListManager {
    /// Create a new shopping list manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn lines_for(&self, list_id: &str) -> AppResult<Vec<ShoppingLine>> {
        let rows = sqlx::query(
            "SELECT name, unit, quantity FROM shopping_list_items WHERE list_id = $1 ORDER BY position",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load shopping lines: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| ShoppingLine {
                name: r.get("name"),
                unit: r.get("unit"),
                quantity: r.get("quantity"),
            })
            .collect())
    }
}

#[async_trait]
impl ShoppingListRepository for ShoppingListManager {
    async fn create_list(
        &self,
        user_id: Uuid,
        snapshot_id: Uuid,
        draft: &ShoppingListDraft,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO shopping_lists (id, user_id, snapshot_id, period, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(snapshot_id.to_string())
        .bind(draft.period.as_str())
        .bind(draft.start_date.format("%Y-%m-%d").to_string())
        .bind(draft.end_date.format("%Y-%m-%d").to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create {} shopping list: {e}", draft.period))
        })?;

        Ok(id)
    }

    async fn create_list_items(&self, list_id: Uuid, lines: &[ShoppingLine]) -> AppResult<()> {
        for (position, line) in lines.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO shopping_list_items (id, list_id, position, name, unit, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(list_id.to_string())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(&line.name)
            .bind(&line.unit)
            .bind(line.quantity)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to create shopping line {}: {e}", line.name))
            })?;
        }
        Ok(())
    }

    async fn lists_for_snapshot(&self, snapshot_id: Uuid) -> AppResult<Vec<ShoppingList>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, snapshot_id, period, start_date, end_date, created_at
            FROM shopping_lists
            WHERE snapshot_id = $1
            ORDER BY CASE period WHEN 'weekly' THEN 0 ELSE 1 END, created_at
            ",
        )
        .bind(snapshot_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list shopping lists: {e}")))?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let user_id: String = row.get("user_id");
            let snapshot: String = row.get("snapshot_id");
            let period: String = row.get("period");
            let start_date: String = row.get("start_date");
            let end_date: String = row.get("end_date");
            let created_at: String = row.get("created_at");

            lists.push(ShoppingList {
                id: parse_uuid(&id, "shopping_lists.id")?,
                user_id: parse_uuid(&user_id, "shopping_lists.user_id")?,
                snapshot_id: parse_uuid(&snapshot, "shopping_lists.snapshot_id")?,
                period: ShoppingPeriod::parse(&period).ok_or_else(|| {
                    AppError::database(format!("Unknown shopping period '{period}'"))
                })?,
                start_date: parse_date(&start_date, "shopping_lists.start_date")?,
                end_date: parse_date(&end_date, "shopping_lists.end_date")?,
                created_at: parse_timestamp(&created_at, "shopping_lists.created_at")?,
                items: self.lines_for(&id).await?,
            });
        }
        Ok(lists)
    }
}
