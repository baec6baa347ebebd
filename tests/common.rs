// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, seeded users, plan builders and LLM/store doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `vitta_diet`

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use uuid::Uuid;
use vitta_diet::{
    database::{Database, NewPreferences, NewUser},
    errors::{AppError, AppResult, ErrorCode},
    intelligence::{food_catalog, portion::portion_for_amount},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    models::{FoodPreferences, MealSlot, PlanItem, PlanMeal},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Preferences that the rule-based composer always satisfies
pub fn fixture_preferences() -> FoodPreferences {
    FoodPreferences {
        proteins: vec!["chicken".into()],
        carbs: vec!["rice_white".into()],
        vegetables: vec!["lettuce".into()],
        fruits: Vec::new(),
        exclude_vegetables: false,
        exclude_fruits: true,
    }
}

/// Create a user with body data and an active preference submission
pub async fn seed_user(database: &Database, foods: FoodPreferences) -> Result<Uuid> {
    let profiles = database.profiles();
    let user = profiles
        .create_user(&NewUser {
            name: "Test User".into(),
            email: format!("user-{}@example.com", Uuid::new_v4()),
            weight_kg: Some(60.0),
            height_cm: Some(165.0),
            age: Some(30),
            sex: Some("female".into()),
            workout_frequency: Some("3-4".into()),
            workout_duration: Some("30".into()),
            ..NewUser::default()
        })
        .await?;

    profiles
        .save_preferences(
            user.id,
            &NewPreferences {
                foods,
                bottle_size_ml: Some(500),
                ..NewPreferences::default()
            },
        )
        .await?;
    Ok(user.id)
}

/// Plan item for an exact amount of a catalog food
pub fn item(id: &str, amount: f64) -> PlanItem {
    let food = food_catalog::find(id).unwrap();
    portion_for_amount(food, amount).into_item(food)
}

/// Meal for a slot with the given items
pub fn meal(slot: MealSlot, items: Vec<PlanItem>) -> PlanMeal {
    let mut meal = PlanMeal::for_slot(slot);
    meal.items = items;
    meal
}

/// A day that passes every validation rule for [`fixture_preferences`]
pub fn valid_day() -> Vec<PlanMeal> {
    vec![
        meal(MealSlot::Breakfast, vec![item("eggs", 2.0), item("bread", 1.0)]),
        meal(
            MealSlot::Lunch,
            vec![item("chicken", 150.0), item("rice_white", 150.0), item("lettuce", 50.0)],
        ),
        meal(MealSlot::AfternoonSnack, vec![item("eggs", 1.0), item("bread", 1.0)]),
        meal(
            MealSlot::Dinner,
            vec![item("chicken", 130.0), item("rice_white", 120.0), item("broccoli", 100.0)],
        ),
    ]
}

/// JSON reply in the shape the AI composer asks for
pub fn ai_reply_json() -> String {
    serde_json::json!({
        "meals": [
            {
                "name": "Café da manhã",
                "time": "07:00",
                "items": [
                    { "name": "Ovo cozido", "quantity": "2 unidade(s)", "calories": 156, "protein_g": 12.6, "carbs_g": 1.2, "fat_g": 10.6, "category": "protein" },
                    { "name": "Pão francês", "quantity": "1 unidade(s)", "calories": 150, "protein_g": 4, "carbs_g": 29.3, "fat_g": 1.6, "category": "carb" }
                ]
            },
            {
                "name": "Almoço",
                "time": "12:00",
                "items": [
                    { "name": "Peito de frango grelhado", "quantity": "150g", "calories": 247.5, "protein_g": 46.5, "carbs_g": 0, "fat_g": 5.4, "category": "protein" },
                    { "name": "Arroz branco", "quantity": "150g", "calories": 192, "protein_g": 3.8, "carbs_g": 42.2, "fat_g": 0.3, "category": "carb" },
                    { "name": "Alface", "quantity": "À vontade", "calories": 15, "protein_g": 1, "carbs_g": 2, "fat_g": 0, "category": "vegetable" }
                ]
            },
            {
                "name": "Lanche da tarde",
                "time": "16:00",
                "items": [
                    { "name": "Ovo cozido", "quantity": "1 unidade(s)", "calories": 78, "protein_g": 6.3, "carbs_g": 0.6, "fat_g": 5.3, "category": "protein" },
                    { "name": "Pão francês", "quantity": "1 unidade(s)", "calories": 150, "protein_g": 4, "carbs_g": 29.3, "fat_g": 1.6, "category": "carb" }
                ]
            },
            {
                "name": "Jantar",
                "time": "19:30",
                "items": [
                    { "name": "Peito de frango grelhado", "quantity": "130g", "calories": 214.5, "protein_g": 40.3, "carbs_g": 0, "fat_g": 4.7, "category": "protein" },
                    { "name": "Arroz branco", "quantity": "120g", "calories": 153.6, "protein_g": 3, "carbs_g": 33.7, "fat_g": 0.2, "category": "carb" }
                ]
            }
        ]
    })
    .to_string()
}

// ============================================================================
// LLM doubles
// ============================================================================

/// Provider that replays scripted replies in order, then fails
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<AppResult<String>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<AppResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider whose every call fails as if the service were down
    pub fn unavailable() -> Self {
        Self::new(Vec::new())
    }

    pub fn replying(content: impl Into<String>) -> Self {
        Self::new(vec![Ok(content.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(ChatResponse {
                content,
                model: "scripted-model".into(),
                usage: None,
                finish_reason: Some("stop".into()),
            }),
            Some(Err(e)) => Err(e),
            None => Err(AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                "scripted provider has no reply",
            )),
        }
    }
}

/// Wrap a provider for the service constructors
pub fn shared(provider: ScriptedProvider) -> Arc<ScriptedProvider> {
    Arc::new(provider)
}
