// ABOUTME: Shopping list models - period tags, aggregated lines, and persisted lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::generation::{MONTHLY_DAYS, WEEKLY_DAYS};

/// Window a shopping list covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingPeriod {
    /// Seven days
    Weekly,
    /// Thirty days
    Monthly,
}

impl ShoppingPeriod {
    /// Both periods, in the order lists are created
    pub const ALL: [Self; 2] = [Self::Weekly, Self::Monthly];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Days the daily quantities are multiplied by
    #[must_use]
    pub const fn days(&self) -> u32 {
        match self {
            Self::Weekly => WEEKLY_DAYS,
            Self::Monthly => MONTHLY_DAYS,
        }
    }
}

impl fmt::Display for ShoppingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated line of a shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingLine {
    /// Food name
    pub name: String,
    /// Unit label
    pub unit: String,
    /// Amount to buy for the period
    pub quantity: f64,
}

/// A list ready to be persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingListDraft {
    /// Window covered
    pub period: ShoppingPeriod,
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered (inclusive)
    pub end_date: NaiveDate,
    /// Aggregated lines
    pub items: Vec<ShoppingLine>,
}

/// A persisted shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingList {
    /// List identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Snapshot the list was derived from
    pub snapshot_id: Uuid,
    /// Window covered
    pub period: ShoppingPeriod,
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered (inclusive)
    pub end_date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Aggregated lines
    pub items: Vec<ShoppingLine>,
}
