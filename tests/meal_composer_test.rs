// ABOUTME: Integration tests for the rule-based meal composer
// ABOUTME: Checks meal structure, dinner mirroring, fruit and bean limits across many seeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;
use vitta_diet::intelligence::energy::compute_energy_targets;
use vitta_diet::intelligence::meal_composer::compose_daily_plan;
use vitta_diet::intelligence::validator::validate_diet;
use vitta_diet::models::{
    BiologicalSex, FoodCategory, FoodFamily, FoodPreferences, MealSlot, UserDietProfile,
    WorkoutDuration, WorkoutFrequency,
};

fn profile_with(preferences: FoodPreferences) -> UserDietProfile {
    UserDietProfile {
        user_id: Uuid::new_v4(),
        weight_kg: 75.0,
        height_cm: 172.0,
        age: 35,
        sex: BiologicalSex::Male,
        workout_frequency: WorkoutFrequency::ThreeToFour,
        workout_duration: WorkoutDuration { minutes: 30 },
        preferences,
        bottle_size_ml: 500,
    }
}

fn wide_preferences() -> FoodPreferences {
    FoodPreferences {
        proteins: vec!["chicken".into(), "beef".into(), "eggs".into(), "yogurt".into()],
        carbs: vec![
            "rice_white".into(),
            "beans".into(),
            "bread".into(),
            "tapioca".into(),
            "sweet_potato".into(),
        ],
        vegetables: vec!["lettuce".into(), "tomato".into()],
        fruits: vec!["banana".into(), "apple".into(), "orange".into()],
        exclude_vegetables: false,
        exclude_fruits: false,
    }
}

#[test]
fn test_plan_has_four_meals_in_order() {
    let profile = profile_with(common::fixture_preferences());
    let targets = compute_energy_targets(&profile);
    let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(3));

    let slots: Vec<MealSlot> = plan.meals.iter().map(|meal| meal.slot).collect();
    assert_eq!(
        slots,
        vec![
            MealSlot::Breakfast,
            MealSlot::Lunch,
            MealSlot::AfternoonSnack,
            MealSlot::Dinner
        ]
    );
    assert!(plan.meals.iter().all(|meal| !meal.items.is_empty()));
}

#[test]
fn test_fixture_preferences_always_validate() {
    let profile = profile_with(common::fixture_preferences());
    let targets = compute_energy_targets(&profile);

    for seed in 0..25 {
        let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(seed));
        let report = validate_diet(&plan, &profile.preferences);
        assert!(report.is_valid(), "seed {seed}: {}", report.summary());
    }
}

#[test]
fn test_dinner_repeats_lunch_protein_and_staple() {
    let profile = profile_with(wide_preferences());
    let targets = compute_energy_targets(&profile);

    for seed in 0..25 {
        let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(seed));
        let lunch = plan.meal(MealSlot::Lunch).unwrap();
        let dinner = plan.meal(MealSlot::Dinner).unwrap();

        assert_eq!(lunch.items[0].name, dinner.items[0].name, "seed {seed}");
        assert_eq!(lunch.items[1].name, dinner.items[1].name, "seed {seed}");
        assert!(dinner.items[1].quantity.value <= lunch.items[1].quantity.value);
    }
}

#[test]
fn test_fruit_cap_and_bean_ratio_hold_for_every_seed() {
    let profile = profile_with(wide_preferences());
    let targets = compute_energy_targets(&profile);

    for seed in 0..50 {
        let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(seed));

        let fruits = plan
            .items()
            .filter(|item| item.category == FoodCategory::Fruit)
            .count();
        assert!(fruits <= 2, "seed {seed}: {fruits} fruits");

        for slot in [MealSlot::Lunch, MealSlot::Dinner] {
            let meal = plan.meal(slot).unwrap();
            let grams = |family: FoodFamily| -> f64 {
                meal.items
                    .iter()
                    .filter(|item| item.family() == family)
                    .map(|item| item.quantity.weight_g())
                    .sum()
            };
            let rice = grams(FoodFamily::Rice);
            let beans = grams(FoodFamily::Beans);
            if beans > 0.0 {
                assert!(beans < rice, "seed {seed} {slot}: {beans}g beans, {rice}g rice");
                assert!(beans <= 0.6 * rice, "seed {seed} {slot}");
            }
        }
    }
}

#[test]
fn test_no_fruit_when_excluded() {
    let mut preferences = wide_preferences();
    preferences.exclude_fruits = true;
    let profile = profile_with(preferences);
    let targets = compute_energy_targets(&profile);

    for seed in 0..10 {
        let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(seed));
        assert!(plan.items().all(|item| item.category != FoodCategory::Fruit));
    }
}

#[test]
fn test_no_vegetables_when_excluded() {
    let mut preferences = common::fixture_preferences();
    preferences.exclude_vegetables = true;
    let profile = profile_with(preferences);
    let targets = compute_energy_targets(&profile);
    let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(9));

    assert!(plan
        .items()
        .all(|item| item.category != FoodCategory::Vegetable));
}

#[test]
fn test_empty_preferences_fall_back_to_defaults() {
    let profile = profile_with(FoodPreferences::default());
    let targets = compute_energy_targets(&profile);
    let plan = compose_daily_plan(&profile, &targets, &mut StdRng::seed_from_u64(1));

    let lunch = plan.meal(MealSlot::Lunch).unwrap();
    assert_eq!(lunch.items[0].family(), FoodFamily::Poultry);
    assert_eq!(lunch.items[1].family(), FoodFamily::Rice);
    assert_eq!(plan.meals.len(), 4);
}
