// ABOUTME: Integration tests for the diet validator rules
// ABOUTME: Starts from a valid day and breaks one rule at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{fixture_preferences, item, meal, valid_day};
use vitta_diet::intelligence::validator::{is_valid_diet, validate_diet, Violation};
use vitta_diet::models::{DailyPlan, FoodPreferences, MealSlot};

fn plan() -> DailyPlan {
    DailyPlan { meals: valid_day() }
}

fn slot_index(slot: MealSlot) -> usize {
    match slot {
        MealSlot::Breakfast => 0,
        MealSlot::Lunch => 1,
        MealSlot::AfternoonSnack => 2,
        MealSlot::Dinner => 3,
    }
}

fn with_meal(slot: MealSlot, items: Vec<vitta_diet::models::PlanItem>) -> DailyPlan {
    let mut plan = plan();
    plan.meals[slot_index(slot)] = meal(slot, items);
    plan
}

#[test]
fn test_valid_day_passes() {
    let report = validate_diet(&plan(), &fixture_preferences());
    assert!(report.is_valid(), "{}", report.summary());
    assert!(is_valid_diet(&plan(), &fixture_preferences()));
}

#[test]
fn test_missing_meal_is_reported() {
    let mut plan = plan();
    plan.meals.remove(2);
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report.violations.contains(&Violation::MissingMeal {
        slot: MealSlot::AfternoonSnack
    }));
}

#[test]
fn test_selected_rice_must_appear_in_main_meals() {
    let plan = with_meal(
        MealSlot::Lunch,
        vec![item("chicken", 150.0), item("potato", 200.0)],
    );
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report.violations.contains(&Violation::MissingRice {
        slot: MealSlot::Lunch
    }));
}

#[test]
fn test_selected_beans_must_appear_in_main_meals() {
    let mut prefs = fixture_preferences();
    prefs.carbs.push("beans".into());
    let report = validate_diet(&plan(), &prefs);
    assert!(report.violations.contains(&Violation::MissingBeans {
        slot: MealSlot::Lunch
    }));
    assert!(report.violations.contains(&Violation::MissingBeans {
        slot: MealSlot::Dinner
    }));
}

#[test]
fn test_beans_without_rice() {
    let plan = with_meal(
        MealSlot::Dinner,
        vec![item("chicken", 130.0), item("beans", 60.0)],
    );
    let prefs = FoodPreferences {
        proteins: vec!["chicken".into()],
        ..FoodPreferences::default()
    };
    let report = validate_diet(&plan, &prefs);
    assert!(report.violations.contains(&Violation::BeansWithoutRice {
        slot: MealSlot::Dinner
    }));
}

#[test]
fn test_bean_to_rice_ratio() {
    let at_ratio = with_meal(
        MealSlot::Lunch,
        vec![item("chicken", 150.0), item("rice_white", 150.0), item("beans", 90.0)],
    );
    assert!(validate_diet(&at_ratio, &fixture_preferences()).is_valid());

    let over = with_meal(
        MealSlot::Lunch,
        vec![item("chicken", 150.0), item("rice_white", 150.0), item("beans", 100.0)],
    );
    let report = validate_diet(&over, &fixture_preferences());
    assert!(matches!(
        report.violations.as_slice(),
        [Violation::BeansToRiceRatio {
            slot: MealSlot::Lunch,
            ..
        }]
    ));
}

#[test]
fn test_light_starch_and_fruit_stay_out_of_main_meals() {
    let plan = with_meal(
        MealSlot::Lunch,
        vec![
            item("chicken", 150.0),
            item("rice_white", 150.0),
            item("bread", 1.0),
            item("banana", 1.0),
        ],
    );
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::LightStarchInMainMeal { .. })));
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::FruitInMainMeal { .. })));
}

#[test]
fn test_main_meal_needs_meat() {
    let plan = with_meal(
        MealSlot::Dinner,
        vec![item("eggs", 3.0), item("rice_white", 120.0)],
    );
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report.violations.contains(&Violation::MissingMeat {
        slot: MealSlot::Dinner
    }));
}

#[test]
fn test_light_meals_need_protein() {
    let plan = with_meal(MealSlot::AfternoonSnack, vec![item("bread", 1.0)]);
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report.violations.contains(&Violation::MissingProtein {
        slot: MealSlot::AfternoonSnack
    }));
}

#[test]
fn test_heavy_meat_at_breakfast() {
    let plan = with_meal(
        MealSlot::Breakfast,
        vec![item("beef", 100.0), item("bread", 1.0)],
    );
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::HeavyMeatAtBreakfast { .. })));
}

#[test]
fn test_breakfast_starch_must_be_bread_family_or_sweet_potato() {
    let rice = with_meal(
        MealSlot::Breakfast,
        vec![item("eggs", 2.0), item("rice_white", 100.0)],
    );
    let report = validate_diet(&rice, &fixture_preferences());
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::StarchNotAllowed { slot: MealSlot::Breakfast, .. })));

    for starch in [item("tapioca", 60.0), item("couscous", 100.0)] {
        let plan = with_meal(MealSlot::Breakfast, vec![item("eggs", 2.0), starch]);
        assert!(validate_diet(&plan, &fixture_preferences()).is_valid());
    }
}

#[test]
fn test_fruit_ceiling() {
    let mut plan = plan();
    plan.meals[0].items.push(item("banana", 1.0));
    plan.meals[0].items.push(item("apple", 1.0));
    assert!(validate_diet(&plan, &fixture_preferences()).is_valid());

    plan.meals[2].items.push(item("orange", 1.0));
    let report = validate_diet(&plan, &fixture_preferences());
    assert!(report
        .violations
        .contains(&Violation::TooManyFruits { count: 3 }));
}

#[test]
fn test_sweet_potato_must_stay_below_rice() {
    let below = with_meal(
        MealSlot::Breakfast,
        vec![item("eggs", 2.0), item("sweet_potato", 100.0)],
    );
    assert!(validate_diet(&below, &fixture_preferences()).is_valid());

    // 270 g of rice across lunch and dinner
    let equal = with_meal(
        MealSlot::Breakfast,
        vec![item("eggs", 2.0), item("sweet_potato", 270.0)],
    );
    let report = validate_diet(&equal, &fixture_preferences());
    assert!(report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::SweetPotatoNotBelowRice { .. })));
}

#[test]
fn test_summary_lists_every_violation() {
    let plan = with_meal(MealSlot::AfternoonSnack, vec![item("bread", 1.0)]);
    let report = validate_diet(&plan, &fixture_preferences());
    assert_eq!(report.violations.len(), 1);
    assert!(report.summary().contains("no protein item"));
}
