// ABOUTME: Integration tests for shopping list aggregation and persistence
// ABOUTME: Covers weekly/monthly scaling, grouping by name and unit, and date ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use common::{create_test_database, fixture_preferences, item, meal, seed_user};
use std::sync::Arc;
use vitta_diet::database::repositories::SnapshotRepository;
use vitta_diet::intelligence::shopping::{
    aggregate_daily, aggregate_display_strings, build_shopping_lists, scale_quantity,
};
use vitta_diet::models::{MacroPayload, MealSlot, NewSnapshot, PlanOrigin, ShoppingPeriod};
use vitta_diet::services::ShoppingListService;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn macros() -> MacroPayload {
    MacroPayload {
        protein_g: 90,
        carbs_g: 120,
        fat_g: 40,
        water_ml: 2100,
        bottle_ml: 500,
        bottles: 5,
        tmb: 1387,
        tdee: 1558,
    }
}

#[test]
fn test_rice_200g_scales_to_week_and_month() {
    let rice = item("rice_white", 200.0);
    let lists = build_shopping_lists([&rice], day(2025, 3, 10));

    assert_eq!(lists.len(), 2);
    let weekly = &lists[0];
    let monthly = &lists[1];

    assert_eq!(weekly.period, ShoppingPeriod::Weekly);
    assert_eq!(weekly.items[0].name, "Arroz branco");
    assert_eq!(weekly.items[0].unit, "g");
    assert!((weekly.items[0].quantity - 1400.0).abs() < f64::EPSILON);

    assert_eq!(monthly.period, ShoppingPeriod::Monthly);
    assert!((monthly.items[0].quantity - 6000.0).abs() < f64::EPSILON);
}

#[test]
fn test_ranges_are_anchored_on_start_day() {
    let lists = build_shopping_lists([&item("chicken", 150.0)], day(2025, 1, 28));

    assert_eq!(lists[0].start_date, day(2025, 1, 28));
    assert_eq!(lists[0].end_date, day(2025, 2, 3));
    assert_eq!(lists[1].start_date, day(2025, 1, 28));
    assert_eq!(lists[1].end_date, day(2025, 2, 26));
}

#[test]
fn test_items_group_by_name_and_unit() {
    let items = [
        item("rice_white", 150.0),
        item("chicken", 150.0),
        item("rice_white", 120.0),
        item("eggs", 2.0),
        item("eggs", 1.0),
    ];
    let daily = aggregate_daily(&items);

    assert_eq!(daily.len(), 3);
    assert_eq!(daily[0].name, "Arroz branco");
    assert!((daily[0].quantity - 270.0).abs() < f64::EPSILON);
    assert_eq!(daily[2].name, "Ovo cozido");
    assert_eq!(daily[2].unit, "unidade(s)");
    assert!((daily[2].quantity - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_legacy_strings_without_number_count_as_one_unit() {
    let daily = aggregate_display_strings([
        ("Alface", "À vontade"),
        ("Tempero", "a gosto"),
        ("Tempero", "a gosto"),
        ("Arroz branco", "200g"),
    ]);

    let seasoning = daily.iter().find(|line| line.name == "Tempero").unwrap();
    assert_eq!(seasoning.unit, "unidade");
    assert!((seasoning.quantity - 2.0).abs() < f64::EPSILON);

    let rice = daily.iter().find(|line| line.name == "Arroz branco").unwrap();
    assert!((rice.quantity - 200.0).abs() < f64::EPSILON);
}

#[test]
fn test_scaling_rounds_up() {
    assert!((scale_quantity(0.5, 7) - 4.0).abs() < f64::EPSILON);
    assert!((scale_quantity(1.0 / 3.0, 30) - 10.0).abs() < f64::EPSILON);
    assert!((scale_quantity(0.0, 30)).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_service_writes_weekly_and_monthly_lists() {
    let database = create_test_database().await.unwrap();
    let user_id = seed_user(&database, fixture_preferences()).await.unwrap();
    let snapshots = database.snapshots();

    let snapshot_id = snapshots
        .create_snapshot(&NewSnapshot {
            user_id,
            daily_calories: 1200,
            macros: macros(),
            origin: PlanOrigin::Algorithmic,
        })
        .await
        .unwrap();
    let meals = vec![meal(MealSlot::Lunch, vec![item("rice_white", 200.0)])];
    let meal_ids = snapshots.create_meals(snapshot_id, &meals).await.unwrap();
    snapshots
        .create_items(meal_ids[0], &meals[0].items)
        .await
        .unwrap();
    let snapshot = snapshots.fetch_snapshot(snapshot_id).await.unwrap().unwrap();

    let service = ShoppingListService::new(Arc::new(database.shopping_lists()));
    let written = service
        .regenerate_for_snapshot(&snapshot, day(2025, 6, 1))
        .await
        .unwrap();
    assert_eq!(written.len(), 2);

    let stored = service.lists_for_snapshot(&snapshot).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].period, ShoppingPeriod::Weekly);
    assert_eq!(stored[0].snapshot_id, snapshot_id);
    assert_eq!(stored[0].end_date, day(2025, 6, 7));
    assert!((stored[0].items[0].quantity - 1400.0).abs() < f64::EPSILON);
    assert_eq!(stored[1].period, ShoppingPeriod::Monthly);
    assert_eq!(stored[1].end_date, day(2025, 6, 30));
    assert!((stored[1].items[0].quantity - 6000.0).abs() < f64::EPSILON);
}
