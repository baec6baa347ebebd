// ABOUTME: Shopping list service - turns a persisted snapshot into a fresh weekly and monthly list pair
// ABOUTME: Aggregation math lives in the intelligence crate; this layer writes the rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::database::repositories::ShoppingListRepository;
use crate::errors::AppResult;
use crate::intelligence::shopping::build_shopping_lists;
use crate::models::{DietSnapshot, ShoppingList};

/// Writes shopping lists for snapshots
#[derive(Clone)]
pub struct ShoppingListService {
    repository: Arc<dyn ShoppingListRepository>,
}

impl ShoppingListService {
    /// Create a service over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn ShoppingListRepository>) -> Self {
        Self { repository }
    }

    /// Create the weekly and monthly lists for a snapshot, anchored on `today`
    ///
    /// # Errors
    ///
    /// Returns the first store error; lists written before it are kept
    #[instrument(skip_all, fields(user.id = %snapshot.user_id, diet.snapshot_id = %snapshot.id))]
    pub async fn regenerate_for_snapshot(
        &self,
        snapshot: &DietSnapshot,
        today: NaiveDate,
    ) -> AppResult<Vec<ShoppingList>> {
        let items = snapshot
            .meals
            .iter()
            .flat_map(|meal| meal.items.iter().map(|row| &row.item));
        let drafts = build_shopping_lists(items, today);

        let mut lists = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let list_id = self
                .repository
                .create_list(snapshot.user_id, snapshot.id, &draft)
                .await?;
            self.repository
                .create_list_items(list_id, &draft.items)
                .await?;

            debug!(
                period = %draft.period,
                lines = draft.items.len(),
                "Shopping list created"
            );

            lists.push(ShoppingList {
                id: list_id,
                user_id: snapshot.user_id,
                snapshot_id: snapshot.id,
                period: draft.period,
                start_date: draft.start_date,
                end_date: draft.end_date,
                created_at: Utc::now(),
                items: draft.items,
            });
        }
        Ok(lists)
    }

    /// Lists previously written for a snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails
    pub async fn lists_for_snapshot(&self, snapshot: &DietSnapshot) -> AppResult<Vec<ShoppingList>> {
        self.repository.lists_for_snapshot(snapshot.id).await
    }
}
