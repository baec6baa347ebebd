// ABOUTME: Repository traits for the stores the diet services read from and write to
// ABOUTME: SQLite managers implement them; tests substitute in-memory or failing doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    DietSnapshot, NewSnapshot, PlanItem, PlanMeal, PlanOrigin, PreferencesRecord, ShoppingLine,
    ShoppingList, ShoppingListDraft, UserRecord,
};

/// Read access to users and their food-preference submissions
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Look up a user by id
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<UserRecord>>;

    /// The user's submission currently in force, if any
    async fn get_active_preferences(&self, user_id: Uuid) -> AppResult<Option<PreferencesRecord>>;
}

/// Diet snapshot persistence
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Clear the active flag on every snapshot of the user, returning how many changed
    async fn deactivate_active(&self, user_id: Uuid) -> AppResult<u64>;

    /// Insert an active snapshot row and return its id
    async fn create_snapshot(&self, snapshot: &NewSnapshot) -> AppResult<Uuid>;

    /// Insert meal rows under a snapshot, returning their ids in input order
    async fn create_meals(&self, snapshot_id: Uuid, meals: &[PlanMeal]) -> AppResult<Vec<Uuid>>;

    /// Insert item rows under a meal
    async fn create_items(&self, meal_id: Uuid, items: &[PlanItem]) -> AppResult<()>;

    /// Delete a snapshot with its meals and items
    async fn delete_snapshot(&self, snapshot_id: Uuid) -> AppResult<()>;

    /// Fetch a snapshot joined with its meals and items
    async fn fetch_snapshot(&self, snapshot_id: Uuid) -> AppResult<Option<DietSnapshot>>;

    /// The user's active snapshot, if any
    async fn get_active_snapshot(&self, user_id: Uuid) -> AppResult<Option<DietSnapshot>>;
}

/// Shopping list persistence
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// Insert a list row linked to a snapshot and return its id
    async fn create_list(
        &self,
        user_id: Uuid,
        snapshot_id: Uuid,
        draft: &ShoppingListDraft,
    ) -> AppResult<Uuid>;

    /// Insert the lines of a list
    async fn create_list_items(&self, list_id: Uuid, lines: &[ShoppingLine]) -> AppResult<()>;

    /// Lists derived from a snapshot, weekly first
    async fn lists_for_snapshot(&self, snapshot_id: Uuid) -> AppResult<Vec<ShoppingList>>;
}

/// Append-only record of successful generations
#[async_trait]
pub trait RegenerationLog: Send + Sync {
    /// Record one successful generation
    async fn record(&self, user_id: Uuid, snapshot_id: Uuid, origin: PlanOrigin) -> AppResult<()>;

    /// Generations recorded for the user at or after `since`
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> AppResult<u64>;
}
