// ABOUTME: Integration tests for the portion calculator across the whole food catalog
// ABOUTME: Checks free greens, tomato clamping and that every field derives from one amount
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use vitta_diet::intelligence::food_catalog;
use vitta_diet::intelligence::portion::{calculate_portion, portion_for_amount};
use vitta_diet::models::{FoodFamily, Quantity, QuantityUnit};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_lettuce_is_free_regardless_of_target() {
    let lettuce = food_catalog::find("lettuce").unwrap();
    for target in [0.0, 15.0, 500.0, 5000.0] {
        let portion = calculate_portion(target, lettuce, None);
        assert_eq!(portion.quantity.to_string(), "À vontade");
        assert_eq!(portion.quantity.unit, QuantityUnit::Free);
        assert!(close(portion.calories, 15.0));
        assert!(close(portion.protein_g, 1.0));
        assert!(close(portion.carbs_g, 2.0));
    }
}

#[test]
fn test_tomato_never_exceeds_cap() {
    let tomato = food_catalog::find("tomato").unwrap();
    let portion = calculate_portion(1000.0, tomato, None);
    assert!(portion.quantity.value <= 80.0);
    assert_eq!(portion.quantity.unit, QuantityUnit::Grams);
}

#[test]
fn test_portions_derive_every_field_from_one_amount() {
    for food in food_catalog::all() {
        if food.family == FoodFamily::LeafyGreen {
            continue;
        }
        for target in [0.0, 80.0, 250.0, 600.0] {
            let portion = calculate_portion(target, food, None);
            let amount = if portion.quantity.unit == QuantityUnit::Pot {
                portion.quantity.weight_g()
            } else {
                portion.quantity.value
            };
            let expected = portion_for_amount(food, amount);

            assert!(
                close(portion.calories, expected.calories),
                "{} at {target} kcal: calories drift",
                food.id
            );
            assert!(close(portion.protein_g, expected.protein_g), "{}", food.id);
            assert!(close(portion.carbs_g, expected.carbs_g), "{}", food.id);
            assert!(close(portion.fat_g, expected.fat_g), "{}", food.id);
        }
    }
}

#[test]
fn test_gram_portions_are_multiples_of_ten() {
    let chicken = food_catalog::find("chicken").unwrap();
    for target in [120.0, 333.0, 777.0] {
        let portion = calculate_portion(target, chicken, None);
        let grams = portion.quantity.value;
        assert!(close(grams % 10.0, 0.0), "{grams}g");
        assert!(grams >= 50.0);
    }
}

#[test]
fn test_item_text_matches_structured_quantity() {
    let rice = food_catalog::find("rice_white").unwrap();
    let item = calculate_portion(256.0, rice, None).into_item(rice);

    assert_eq!(item.name, "Arroz branco");
    assert_eq!(item.quantity, Quantity::grams(200.0));
    assert_eq!(item.quantity_text, "200g");
    assert!(close(item.calories, 256.0));
}
