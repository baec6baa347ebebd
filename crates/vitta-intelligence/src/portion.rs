// ABOUTME: Portion calculator turning a calorie allotment into a realistic serving of one food
// ABOUTME: Quantity, calories and macros are always derived from the same realized amount
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use vitta_core::constants::portions::{
    FAT_GRAM_STEP, FREE_GREENS_CARBS_G, FREE_GREENS_KCAL, FREE_GREENS_PROTEIN_G, GRAM_STEP,
    MAX_BREAD_UNITS, MAX_EGG_UNITS, MAX_FRUIT_UNITS, MIN_GRAM_PORTION, TOMATO_MAX_G,
    TOMATO_MIN_G, YOGURT_POT_G,
};
use vitta_core::models::{fold_text, FoodFamily, FoodItem, PlanItem, Quantity, ServingUnit};

/// A sized serving of one food
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    /// Realized amount
    pub quantity: Quantity,
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

impl Portion {
    /// Turn the portion into a plan item labelled with the food's display name
    #[must_use]
    pub fn into_item(self, food: &FoodItem) -> PlanItem {
        PlanItem {
            name: food.label.to_owned(),
            quantity_text: self.quantity.to_string(),
            quantity: self.quantity,
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            category: food.category,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

fn is_yogurt(food: &FoodItem) -> bool {
    food.family == FoodFamily::Dairy && fold_text(food.label).contains("iogurte")
}

/// Default unit cap for a food served by the unit
#[must_use]
pub const fn default_unit_cap(family: FoodFamily) -> Option<u32> {
    match family {
        FoodFamily::Fruit => Some(MAX_FRUIT_UNITS),
        FoodFamily::Bread | FoodFamily::Tapioca | FoodFamily::Couscous => Some(MAX_BREAD_UNITS),
        FoodFamily::Egg => Some(MAX_EGG_UNITS),
        _ => None,
    }
}

/// Nutrition of an exact amount of a food, expressed in its serving unit
///
/// `amount` is grams for gram-served foods and a count otherwise.
#[must_use]
pub fn portion_for_amount(food: &FoodItem, amount: f64) -> Portion {
    let quantity = match food.serving {
        ServingUnit::Grams => Quantity::grams(amount),
        ServingUnit::Unit => Quantity::units(amount),
        ServingUnit::Slice => Quantity::slices(amount),
        ServingUnit::Spoon => Quantity::spoons(amount),
    };
    measured(food, amount, quantity)
}

fn measured(food: &FoodItem, amount: f64, quantity: Quantity) -> Portion {
    let factor = amount / food.reference_quantity();
    Portion {
        quantity,
        calories: round1(food.nutrition.calories * factor),
        protein_g: round1(food.nutrition.protein_g * factor),
        carbs_g: round1(food.nutrition.carbs_g * factor),
        fat_g: round1(food.nutrition.fat_g * factor),
    }
}

/// Size one food to a calorie allotment
///
/// `max_units` overrides the default cap for foods served by the unit,
/// slice or spoon; it is ignored for gram-served foods.
#[must_use]
pub fn calculate_portion(target_kcal: f64, food: &FoodItem, max_units: Option<u32>) -> Portion {
    let target_kcal = target_kcal.max(0.0);

    if food.family == FoodFamily::LeafyGreen {
        return Portion {
            quantity: Quantity::free(),
            calories: FREE_GREENS_KCAL,
            protein_g: FREE_GREENS_PROTEIN_G,
            carbs_g: FREE_GREENS_CARBS_G,
            fat_g: 0.0,
        };
    }

    if is_yogurt(food) {
        return measured(food, YOGURT_POT_G, Quantity::pot());
    }

    let per_unit = food.calories_per_unit();

    if food.family == FoodFamily::Tomato {
        let grams = if per_unit > 0.0 {
            round_to_step(target_kcal / per_unit, GRAM_STEP)
        } else {
            TOMATO_MIN_G
        };
        return portion_for_amount(food, grams.clamp(TOMATO_MIN_G, TOMATO_MAX_G));
    }

    match food.serving {
        ServingUnit::Unit | ServingUnit::Slice | ServingUnit::Spoon => {
            let mut units = if per_unit > 0.0 {
                (target_kcal / per_unit).round().max(1.0)
            } else {
                1.0
            };
            if let Some(cap) = max_units.or_else(|| default_unit_cap(food.family)) {
                units = units.min(f64::from(cap.max(1)));
            }
            portion_for_amount(food, units)
        }
        ServingUnit::Grams => {
            let raw = if per_unit > 0.0 {
                target_kcal / per_unit
            } else {
                0.0
            };
            let grams = if food.is_pure_fat() {
                round_to_step(raw, FAT_GRAM_STEP).max(FAT_GRAM_STEP)
            } else {
                round_to_step(raw, GRAM_STEP).max(MIN_GRAM_PORTION)
            };
            portion_for_amount(food, grams)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food_catalog;

    fn food(id: &str) -> &'static FoodItem {
        food_catalog::find(id).unwrap()
    }

    #[test]
    fn test_leafy_greens_are_free() {
        let portion = calculate_portion(500.0, food("lettuce"), None);
        assert_eq!(portion.quantity.to_string(), "À vontade");
        assert!((portion.calories - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tomato_is_clamped() {
        let big = calculate_portion(1000.0, food("tomato"), None);
        assert!((big.quantity.value - 80.0).abs() < f64::EPSILON);
        let small = calculate_portion(0.0, food("tomato"), None);
        assert!((small.quantity.value - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gram_foods_round_to_ten_with_floor() {
        let rice = calculate_portion(200.0, food("rice_white"), None);
        // 200 / 1.28 = 156.25 g
        assert_eq!(rice.quantity, Quantity::grams(160.0));
        assert!((rice.calories - 204.8).abs() < 1e-9);

        let tiny = calculate_portion(10.0, food("chicken"), None);
        assert_eq!(tiny.quantity, Quantity::grams(50.0));
    }

    #[test]
    fn test_pure_fats_skip_the_gram_floor() {
        let nuts = calculate_portion(60.0, food("nuts"), None);
        assert_eq!(nuts.quantity, Quantity::grams(10.0));
    }

    #[test]
    fn test_unit_caps() {
        let eggs = calculate_portion(1000.0, food("eggs"), None);
        assert_eq!(eggs.quantity, Quantity::units(4.0));
        let eggs = calculate_portion(1000.0, food("eggs"), Some(2));
        assert_eq!(eggs.quantity, Quantity::units(2.0));
        let banana = calculate_portion(300.0, food("banana"), None);
        assert_eq!(banana.quantity, Quantity::units(1.0));
        let one = calculate_portion(1.0, food("eggs"), None);
        assert_eq!(one.quantity, Quantity::units(1.0));
    }

    #[test]
    fn test_yogurt_is_one_pot() {
        let yogurt = calculate_portion(20.0, food("yogurt"), None);
        assert_eq!(yogurt.quantity, Quantity::pot());
        assert!((yogurt.quantity.weight_g() - 170.0).abs() < f64::EPSILON);
        // 61 kcal per 100 g
        assert!((yogurt.calories - 103.7).abs() < 1e-9);
    }
}
