// ABOUTME: Database operations for diet snapshots and their meal and item rows
// ABOUTME: Rows are written per statement; failed candidates are removed with explicit deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::repositories::SnapshotRepository;
use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{
    DietSnapshot, FoodCategory, MealSlot, NewSnapshot, PlanItem, PlanMeal, PlanOrigin, Quantity,
    QuantityUnit, SnapshotItem, SnapshotMeal,
};

/// Snapshot database operations manager
pub struct SnapshotManager {
    pool: SqlitePool,
}

impl SnapshotManager {
    /// Create a new snapshot manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of snapshots currently flagged active for the user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_active(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM diet_snapshots WHERE user_id = $1 AND is_active = 1",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count active snapshots: {e}")))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn row_to_item(row: &SqliteRow) -> AppResult<(Uuid, SnapshotItem)> {
        let id: String = row.get("id");
        let meal_id: String = row.get("meal_id");
        let category: String = row.get("category");
        let unit: String = row.get("quantity_unit");
        let meal_id = parse_uuid(&meal_id, "snapshot_items.meal_id")?;

        let item = SnapshotItem {
            id: parse_uuid(&id, "snapshot_items.id")?,
            meal_id,
            item: PlanItem {
                name: row.get("name"),
                quantity: Quantity {
                    value: row.get("quantity_value"),
                    unit: QuantityUnit::from_code(&unit),
                },
                quantity_text: row.get("quantity_text"),
                calories: row.get("calories"),
                protein_g: row.get("protein_g"),
                carbs_g: row.get("carbs_g"),
                fat_g: row.get("fat_g"),
                category: FoodCategory::parse(&category).ok_or_else(|| {
                    AppError::database(format!("Unknown food category '{category}'"))
                })?,
            },
        };
        Ok((meal_id, item))
    }

    fn row_to_meal(row: &SqliteRow) -> AppResult<SnapshotMeal> {
        let id: String = row.get("id");
        let snapshot_id: String = row.get("snapshot_id");
        let slot: String = row.get("slot");
        let order_index: i64 = row.get("order_index");
        Ok(SnapshotMeal {
            id: parse_uuid(&id, "snapshot_meals.id")?,
            snapshot_id: parse_uuid(&snapshot_id, "snapshot_meals.snapshot_id")?,
            slot: MealSlot::parse(&slot)
                .ok_or_else(|| AppError::database(format!("Unknown meal slot '{slot}'")))?,
            name: row.get("name"),
            order_index: u32::try_from(order_index).unwrap_or(0),
            time: row.get("time"),
            items: Vec::new(),
        })
    }

    async fn load_snapshot(&self, row: &SqliteRow) -> AppResult<DietSnapshot> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let macros: String = row.get("macros");
        let origin: String = row.get("origin");
        let created_at: String = row.get("created_at");
        let daily_calories: i64 = row.get("daily_calories");
        let snapshot_id = parse_uuid(&id, "diet_snapshots.id")?;

        let meal_rows = sqlx::query(
            r"
            SELECT id, snapshot_id, slot, name, order_index, time
            FROM snapshot_meals
            WHERE snapshot_id = $1
            ORDER BY order_index
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load meals for {id}: {e}")))?;

        let item_rows = sqlx::query(
            r"
            SELECT i.id, i.meal_id, i.name, i.quantity_text, i.quantity_value, i.quantity_unit,
                   i.calories, i.protein_g, i.carbs_g, i.fat_g, i.category
            FROM snapshot_items i
            JOIN snapshot_meals m ON m.id = i.meal_id
            WHERE m.snapshot_id = $1
            ORDER BY m.order_index, i.position
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load items for {id}: {e}")))?;

        let mut items_by_meal: HashMap<Uuid, Vec<SnapshotItem>> = HashMap::new();
        for row in &item_rows {
            let (meal_id, item) = Self::row_to_item(row)?;
            items_by_meal.entry(meal_id).or_default().push(item);
        }

        let meals = meal_rows
            .iter()
            .map(|row| {
                let mut meal = Self::row_to_meal(row)?;
                meal.items = items_by_meal.remove(&meal.id).unwrap_or_default();
                Ok(meal)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(DietSnapshot {
            id: snapshot_id,
            user_id: parse_uuid(&user_id, "diet_snapshots.user_id")?,
            daily_calories: u32::try_from(daily_calories).unwrap_or(0),
            macros: serde_json::from_str(&macros)?,
            origin: PlanOrigin::parse(&origin),
            is_active: row.get("is_active"),
            created_at: parse_timestamp(&created_at, "diet_snapshots.created_at")?,
            meals,
        })
    }
}

#[async_trait]
impl SnapshotRepository for SnapshotManager {
    async fn deactivate_active(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE diet_snapshots SET is_active = 0 WHERE user_id = $1 AND is_active = 1",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to deactivate snapshots: {e}")))?;

        Ok(result.rows_affected())
    }

    async fn create_snapshot(&self, snapshot: &NewSnapshot) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        let macros = serde_json::to_string(&snapshot.macros)?;

        sqlx::query(
            r"
            INSERT INTO diet_snapshots (id, user_id, daily_calories, macros, origin, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, 1, $6)
            ",
        )
        .bind(id.to_string())
        .bind(snapshot.user_id.to_string())
        .bind(i64::from(snapshot.daily_calories))
        .bind(&macros)
        .bind(snapshot.origin.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create snapshot: {e}")))?;

        debug!(snapshot_id = %id, origin = %snapshot.origin, "Snapshot row created");
        Ok(id)
    }

    async fn create_meals(&self, snapshot_id: Uuid, meals: &[PlanMeal]) -> AppResult<Vec<Uuid>> {
        let mut ids = Vec::with_capacity(meals.len());
        for meal in meals {
            let id = Uuid::new_v4();
            sqlx::query(
                r"
                INSERT INTO snapshot_meals (id, snapshot_id, slot, name, order_index, time)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(id.to_string())
            .bind(snapshot_id.to_string())
            .bind(meal.slot.as_str())
            .bind(&meal.name)
            .bind(i64::from(meal.slot.order_index()))
            .bind(&meal.time)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create meal {}: {e}", meal.slot)))?;
            ids.push(id);
        }
        Ok(ids)
    }

    async fn create_items(&self, meal_id: Uuid, items: &[PlanItem]) -> AppResult<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO snapshot_items (id, meal_id, position, name, quantity_text,
                                            quantity_value, quantity_unit, calories,
                                            protein_g, carbs_g, fat_g, category)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(meal_id.to_string())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(&item.name)
            .bind(&item.quantity_text)
            .bind(item.quantity.value)
            .bind(item.quantity.unit.code())
            .bind(item.calories)
            .bind(item.protein_g)
            .bind(item.carbs_g)
            .bind(item.fat_g)
            .bind(item.category.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create item {}: {e}", item.name)))?;
        }
        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: Uuid) -> AppResult<()> {
        let id = snapshot_id.to_string();

        sqlx::query(
            "DELETE FROM snapshot_items WHERE meal_id IN (SELECT id FROM snapshot_meals WHERE snapshot_id = $1)",
        )
        .bind(&id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete items of {id}: {e}")))?;

        sqlx::query("DELETE FROM snapshot_meals WHERE snapshot_id = $1")
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meals of {id}: {e}")))?;

        sqlx::query("DELETE FROM diet_snapshots WHERE id = $1")
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete snapshot {id}: {e}")))?;

        debug!(snapshot_id = %snapshot_id, "Snapshot deleted");
        Ok(())
    }

    async fn fetch_snapshot(&self, snapshot_id: Uuid) -> AppResult<Option<DietSnapshot>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, daily_calories, macros, origin, is_active, created_at
            FROM diet_snapshots WHERE id = $1
            ",
        )
        .bind(snapshot_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch snapshot {snapshot_id}: {e}")))?;

        match row {
            Some(row) => Ok(Some(self.load_snapshot(&row).await?)),
            None => Ok(None),
        }
    }

    async fn get_active_snapshot(&self, user_id: Uuid) -> AppResult<Option<DietSnapshot>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, daily_calories, macros, origin, is_active, created_at
            FROM diet_snapshots
            WHERE user_id = $1 AND is_active = 1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active snapshot: {e}")))?;

        match row {
            Some(row) => Ok(Some(self.load_snapshot(&row).await?)),
            None => Ok(None),
        }
    }
}
