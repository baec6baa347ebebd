// ABOUTME: Database operations for users and their food-preference submissions
// ABOUTME: Saving a submission deactivates the previous ones so at most one stays in force
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::repositories::ProfileRepository;
use super::{parse_timestamp, parse_uuid, to_u32};
use crate::errors::{AppError, AppResult};
use crate::models::{FoodPreferences, PreferencesRecord, UserRecord};

/// Fields needed to register a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Body weight (kg)
    pub weight_kg: Option<f64>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Age (years)
    pub age: Option<u32>,
    /// Biological sex label
    pub sex: Option<String>,
    /// Subscription plan label
    pub plan: Option<String>,
    /// Workout frequency bucket label
    pub workout_frequency: Option<String>,
    /// Workout duration bucket label
    pub workout_duration: Option<String>,
}

/// Fields of a new food-preference submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPreferences {
    /// Food selections
    pub foods: FoodPreferences,
    /// Workout frequency bucket label
    pub workout_frequency: Option<String>,
    /// Workout duration bucket label
    pub workout_duration: Option<String>,
    /// Preferred water bottle size (ml)
    pub bottle_size_ml: Option<u32>,
    /// Body weight (kg)
    pub weight_kg: Option<f64>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Age (years)
    pub age: Option<u32>,
    /// Biological sex label
    pub sex: Option<String>,
}

/// User and preference database operations manager
pub struct ProfileManager {
    pool: SqlitePool,
}

impl ProfileManager {
    /// Create a new profile manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails
    pub async fn create_user(&self, user: &NewUser) -> AppResult<UserRecord> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r"
            INSERT INTO users (id, name, email, weight_kg, height_cm, age, sex, plan,
                               workout_frequency, workout_duration, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.weight_kg)
        .bind(user.height_cm)
        .bind(user.age.map(i64::from))
        .bind(&user.sex)
        .bind(&user.plan)
        .bind(&user.workout_frequency)
        .bind(&user.workout_duration)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user {}: {e}", user.email)))?;

        Ok(UserRecord {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            weight_kg: user.weight_kg,
            height_cm: user.height_cm,
            age: user.age,
            sex: user.sex.clone(),
            plan: user.plan.clone(),
            workout_frequency: user.workout_frequency.clone(),
            workout_duration: user.workout_duration.clone(),
            created_at,
        })
    }

    /// Look up a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, weight_kg, height_cm, age, sex, plan,
                   workout_frequency, workout_duration, created_at
            FROM users WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Store a new submission and make it the only active one
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or either statement fails
    pub async fn save_preferences(
        &self,
        user_id: Uuid,
        prefs: &NewPreferences,
    ) -> AppResult<PreferencesRecord> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let foods = serde_json::to_string(&prefs.foods)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("UPDATE diet_preferences SET is_active = 0 WHERE user_id = $1 AND is_active = 1")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to deactivate preferences: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO diet_preferences (id, user_id, foods, workout_frequency, workout_duration,
                                          bottle_size_ml, weight_kg, height_cm, age, sex,
                                          is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1, $11)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&foods)
        .bind(&prefs.workout_frequency)
        .bind(&prefs.workout_duration)
        .bind(prefs.bottle_size_ml.map(i64::from))
        .bind(prefs.weight_kg)
        .bind(prefs.height_cm)
        .bind(prefs.age.map(i64::from))
        .bind(&prefs.sex)
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to save preferences: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit preferences: {e}")))?;

        Ok(PreferencesRecord {
            id,
            user_id,
            foods: prefs.foods.clone(),
            workout_frequency: prefs.workout_frequency.clone(),
            workout_duration: prefs.workout_duration.clone(),
            bottle_size_ml: prefs.bottle_size_ml,
            weight_kg: prefs.weight_kg,
            height_cm: prefs.height_cm,
            age: prefs.age,
            sex: prefs.sex.clone(),
            is_active: true,
            created_at,
        })
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<UserRecord> {
        let id: String = row.get("id");
        let created_at: String = row.get("created_at");
        Ok(UserRecord {
            id: parse_uuid(&id, "users.id")?,
            name: row.get("name"),
            email: row.get("email"),
            weight_kg: row.get("weight_kg"),
            height_cm: row.get("height_cm"),
            age: to_u32(row.get("age")),
            sex: row.get("sex"),
            plan: row.get("plan"),
            workout_frequency: row.get("workout_frequency"),
            workout_duration: row.get("workout_duration"),
            created_at: parse_timestamp(&created_at, "users.created_at")?,
        })
    }

    fn row_to_preferences(row: &SqliteRow) -> AppResult<PreferencesRecord> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let foods: String = row.get("foods");
        let created_at: String = row.get("created_at");
        Ok(PreferencesRecord {
            id: parse_uuid(&id, "diet_preferences.id")?,
            user_id: parse_uuid(&user_id, "diet_preferences.user_id")?,
            foods: serde_json::from_str(&foods)?,
            workout_frequency: row.get("workout_frequency"),
            workout_duration: row.get("workout_duration"),
            bottle_size_ml: to_u32(row.get("bottle_size_ml")),
            weight_kg: row.get("weight_kg"),
            height_cm: row.get("height_cm"),
            age: to_u32(row.get("age")),
            sex: row.get("sex"),
            is_active: row.get("is_active"),
            created_at: parse_timestamp(&created_at, "diet_preferences.created_at")?,
        })
    }
}

#[async_trait]
impl ProfileRepository for ProfileManager {
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, weight_kg, height_cm, age, sex, plan,
                   workout_frequency, workout_duration, created_at
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user {user_id}: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_active_preferences(&self, user_id: Uuid) -> AppResult<Option<PreferencesRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, foods, workout_frequency, workout_duration, bottle_size_ml,
                   weight_kg, height_cm, age, sex, is_active, created_at
            FROM diet_preferences
            WHERE user_id = $1 AND is_active = 1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get preferences: {e}")))?;

        row.as_ref().map(Self::row_to_preferences).transpose()
    }
}
