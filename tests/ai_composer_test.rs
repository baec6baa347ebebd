// ABOUTME: Integration tests for the AI-assisted composer with scripted LLM providers
// ABOUTME: Covers reply decoding, fallback signalling and prompt contents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{ai_reply_json, fixture_preferences, ScriptedProvider};
use std::sync::Arc;
use uuid::Uuid;
use vitta_diet::errors::{AppError, ErrorCode};
use vitta_diet::intelligence::energy::compute_energy_targets;
use vitta_diet::models::{
    BiologicalSex, FoodCategory, MealSlot, Quantity, UserDietProfile, WorkoutDuration,
    WorkoutFrequency,
};
use vitta_diet::services::ai_composer::{build_prompt, parse_ai_plan};
use vitta_diet::services::AiDietComposer;

fn profile() -> UserDietProfile {
    UserDietProfile {
        user_id: Uuid::new_v4(),
        weight_kg: 60.0,
        height_cm: 165.0,
        age: 30,
        sex: BiologicalSex::Female,
        workout_frequency: WorkoutFrequency::OneToTwo,
        workout_duration: WorkoutDuration { minutes: 15 },
        preferences: fixture_preferences(),
        bottle_size_ml: 500,
    }
}

#[tokio::test]
async fn test_compose_decodes_fenced_reply() {
    common::init_test_logging();
    let provider = Arc::new(ScriptedProvider::replying(format!(
        "```json\n{}\n```",
        ai_reply_json()
    )));
    let composer = AiDietComposer::new(provider.clone());
    let profile = profile();
    let targets = compute_energy_targets(&profile);

    let plan = composer.compose(&profile, &targets).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(plan.meals.len(), 4);
    assert_eq!(plan.meals[0].slot, MealSlot::Breakfast);
    assert_eq!(plan.meals[3].slot, MealSlot::Dinner);
    let rice = &plan.meals[1].items[1];
    assert_eq!(rice.quantity, Quantity::grams(150.0));
    assert_eq!(rice.quantity_text, "150g");
    assert_eq!(rice.category, FoodCategory::Carb);
}

#[tokio::test]
async fn test_compose_returns_none_when_provider_fails() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(AppError::new(
        ErrorCode::ExternalRateLimited,
        "slow down",
    ))]));
    let composer = AiDietComposer::new(provider.clone());
    let profile = profile();
    let targets = compute_energy_targets(&profile);

    assert!(composer.compose(&profile, &targets).await.is_none());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_compose_returns_none_for_unparseable_reply() {
    let composer = AiDietComposer::new(Arc::new(ScriptedProvider::replying(
        "Sorry, I cannot help with that.",
    )));
    let profile = profile();
    let targets = compute_energy_targets(&profile);

    assert!(composer.compose(&profile, &targets).await.is_none());
}

#[tokio::test]
async fn test_compose_returns_none_for_empty_meals() {
    let composer =
        AiDietComposer::new(Arc::new(ScriptedProvider::replying(r#"{"meals": []}"#)));
    let profile = profile();
    let targets = compute_energy_targets(&profile);

    assert!(composer.compose(&profile, &targets).await.is_none());
}

#[test]
fn test_meals_are_ordered_by_slot_and_duplicates_dropped() {
    let raw = r#"{"refeicoes": [
        {"nome": "Jantar", "itens": [{"nome": "Peito de frango grelhado", "quantidade": "120g"}]},
        {"nome": "Café da manhã", "itens": [{"nome": "Ovo cozido", "quantidade": "2 unidades"}]},
        {"nome": "Jantar", "itens": []}
    ]}"#;
    let plan = parse_ai_plan(raw).unwrap();

    assert_eq!(plan.meals.len(), 2);
    assert_eq!(plan.meals[0].slot, MealSlot::Breakfast);
    assert_eq!(plan.meals[1].slot, MealSlot::Dinner);
    assert_eq!(plan.meals[1].items.len(), 1);
    assert_eq!(plan.meals[1].time, MealSlot::Dinner.default_time());
}

#[test]
fn test_unknown_untagged_items_count_as_vegetables() {
    let raw = r#"{"meals": [{"name": "Almoço", "items": [
        {"name": "Molho especial da casa", "quantity": "a gosto"}
    ]}]}"#;
    let plan = parse_ai_plan(raw).unwrap();
    let item = &plan.meals[0].items[0];

    assert_eq!(item.category, FoodCategory::Vegetable);
    assert!((item.quantity.value - 1.0).abs() < f64::EPSILON);
    assert_eq!(item.quantity_text, "a gosto");
}

#[test]
fn test_prompt_carries_targets_and_preferences() {
    let profile = profile();
    let targets = compute_energy_targets(&profile);
    let prompt = build_prompt(&profile, &targets);

    assert!(prompt.contains(&format!("{} kcal", targets.target_calories)));
    assert!(prompt.contains(&format!("protein {} g", targets.protein_g)));
    assert!(prompt.contains("Peito de frango grelhado"));
    assert!(prompt.contains("Arroz branco"));
    assert!(prompt.contains("the user excludes fruit"));
}
