// ABOUTME: Static food catalog with per-reference nutrition facts and lookup helpers
// ABOUTME: Ids are the values stored in preference submissions; labels are written into plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Food Catalog
//!
//! Reference table of the foods the rule-based composer can serve. Nutrition
//! is per 100 g for gram-served foods and per item, slice or spoon otherwise
//! (TACO / USDA reference values, rounded).

use vitta_core::models::{
    fold_text, FoodCategory, FoodFamily, FoodItem, NutritionFacts, ServingUnit,
};

const fn food(
    id: &'static str,
    label: &'static str,
    family: FoodFamily,
    category: FoodCategory,
    nutrition: NutritionFacts,
    serving: ServingUnit,
    default_portion: f64,
) -> FoodItem {
    FoodItem {
        id,
        label,
        category,
        family,
        nutrition,
        serving,
        default_portion,
    }
}

use FoodCategory::{Carb, Fat, Fruit, Protein, Vegetable};
use ServingUnit::{Grams, Slice, Spoon, Unit};

// Entries the composer falls back to when nothing eligible was selected
/// Catalog entry `chicken`
#[rustfmt::skip]
pub const CHICKEN: FoodItem = food("chicken", "Peito de frango grelhado", FoodFamily::Poultry, Protein, NutritionFacts::new(165.0, 31.0, 0.0, 3.6), Grams, 120.0);
/// Catalog entry `eggs`
#[rustfmt::skip]
pub const EGGS: FoodItem = food("eggs", "Ovo cozido", FoodFamily::Egg, Protein, NutritionFacts::new(78.0, 6.3, 0.6, 5.3), Unit, 2.0);
/// Catalog entry `rice_white`
#[rustfmt::skip]
pub const RICE_WHITE: FoodItem = food("rice_white", "Arroz branco", FoodFamily::Rice, Carb, NutritionFacts::new(128.0, 2.5, 28.1, 0.2), Grams, 150.0);
/// Catalog entry `bread`
#[rustfmt::skip]
pub const BREAD: FoodItem = food("bread", "Pão francês", FoodFamily::Bread, Carb, NutritionFacts::new(150.0, 4.0, 29.3, 1.6), Unit, 1.0);
/// Catalog entry `lettuce`
#[rustfmt::skip]
pub const LETTUCE: FoodItem = food("lettuce", "Alface", FoodFamily::LeafyGreen, Vegetable, NutritionFacts::new(15.0, 1.4, 2.9, 0.2), Grams, 50.0);
/// Catalog entry `tomato`
#[rustfmt::skip]
pub const TOMATO: FoodItem = food("tomato", "Tomate", FoodFamily::Tomato, Vegetable, NutritionFacts::new(18.0, 0.9, 3.9, 0.2), Grams, 60.0);
/// Catalog entry `broccoli`
#[rustfmt::skip]
pub const BROCCOLI: FoodItem = food("broccoli", "Brócolis cozido", FoodFamily::Vegetable, Vegetable, NutritionFacts::new(35.0, 2.4, 7.2, 0.4), Grams, 100.0);

#[rustfmt::skip]
static FOODS: &[FoodItem] = &[
    // Proteins
    CHICKEN,
    food("beef", "Patinho moído", FoodFamily::RedMeat, Protein, NutritionFacts::new(219.0, 35.9, 0.0, 7.3), Grams, 120.0),
    food("fish", "Tilápia grelhada", FoodFamily::Fish, Protein, NutritionFacts::new(128.0, 26.2, 0.0, 2.7), Grams, 150.0),
    food("pork", "Lombo de porco assado", FoodFamily::Pork, Protein, NutritionFacts::new(210.0, 32.1, 0.0, 8.8), Grams, 120.0),
    EGGS,
    food("yogurt", "Iogurte natural", FoodFamily::Dairy, Protein, NutritionFacts::new(61.0, 3.5, 4.7, 3.3), Grams, 170.0),
    food("cottage", "Queijo cottage", FoodFamily::Dairy, Protein, NutritionFacts::new(98.0, 11.1, 3.4, 4.3), Grams, 50.0),
    // Carbohydrates
    RICE_WHITE,
    food("rice_brown", "Arroz integral", FoodFamily::Rice, Carb, NutritionFacts::new(124.0, 2.6, 25.8, 1.0), Grams, 150.0),
    food("beans", "Feijão carioca", FoodFamily::Beans, Carb, NutritionFacts::new(76.0, 4.8, 13.6, 0.5), Grams, 80.0),
    food("black_beans", "Feijão preto", FoodFamily::Beans, Carb, NutritionFacts::new(77.0, 4.5, 14.0, 0.5), Grams, 80.0),
    BREAD,
    food("bread_whole", "Pão integral", FoodFamily::Bread, Carb, NutritionFacts::new(62.0, 2.4, 11.2, 0.9), Slice, 1.0),
    food("tapioca", "Tapioca", FoodFamily::Tapioca, Carb, NutritionFacts::new(240.0, 0.2, 59.0, 0.1), Grams, 60.0),
    food("couscous", "Cuscuz de milho", FoodFamily::Couscous, Carb, NutritionFacts::new(113.0, 2.2, 25.3, 0.7), Grams, 100.0),
    food("sweet_potato", "Batata-doce cozida", FoodFamily::SweetPotato, Carb, NutritionFacts::new(77.0, 0.6, 18.4, 0.1), Grams, 150.0),
    food("potato", "Batata inglesa cozida", FoodFamily::OtherCarb, Carb, NutritionFacts::new(52.0, 1.2, 11.9, 0.0), Grams, 150.0),
    food("cassava", "Mandioca cozida", FoodFamily::OtherCarb, Carb, NutritionFacts::new(125.0, 0.6, 30.1, 0.3), Grams, 100.0),
    // Vegetables
    LETTUCE,
    food("spinach", "Espinafre", FoodFamily::LeafyGreen, Vegetable, NutritionFacts::new(23.0, 2.9, 3.6, 0.4), Grams, 50.0),
    food("arugula", "Rúcula", FoodFamily::LeafyGreen, Vegetable, NutritionFacts::new(25.0, 2.6, 3.7, 0.7), Grams, 50.0),
    food("kale", "Couve", FoodFamily::LeafyGreen, Vegetable, NutritionFacts::new(27.0, 2.9, 4.3, 0.5), Grams, 50.0),
    TOMATO,
    BROCCOLI,
    food("carrot", "Cenoura", FoodFamily::Vegetable, Vegetable, NutritionFacts::new(41.0, 0.9, 9.6, 0.2), Grams, 80.0),
    food("zucchini", "Abobrinha", FoodFamily::Vegetable, Vegetable, NutritionFacts::new(17.0, 1.2, 3.1, 0.3), Grams, 100.0),
    food("cucumber", "Pepino", FoodFamily::Vegetable, Vegetable, NutritionFacts::new(15.0, 0.7, 3.6, 0.1), Grams, 80.0),
    // Fruit
    food("banana", "Banana prata", FoodFamily::Fruit, Fruit, NutritionFacts::new(62.0, 0.8, 16.2, 0.2), Unit, 1.0),
    food("apple", "Maçã", FoodFamily::Fruit, Fruit, NutritionFacts::new(72.0, 0.4, 19.1, 0.2), Unit, 1.0),
    food("orange", "Laranja", FoodFamily::Fruit, Fruit, NutritionFacts::new(62.0, 1.2, 15.4, 0.2), Unit, 1.0),
    food("papaya", "Mamão papaia", FoodFamily::Fruit, Fruit, NutritionFacts::new(60.0, 0.7, 15.3, 0.2), Unit, 1.0),
    food("tangerine", "Tangerina", FoodFamily::Fruit, Fruit, NutritionFacts::new(44.0, 0.7, 11.2, 0.3), Unit, 1.0),
    // Fats
    food("olive_oil", "Azeite de oliva", FoodFamily::Fat, Fat, NutritionFacts::new(119.0, 0.0, 0.0, 13.5), Spoon, 1.0),
    food("peanut_butter", "Pasta de amendoim", FoodFamily::Fat, Fat, NutritionFacts::new(94.0, 4.0, 3.1, 8.0), Spoon, 1.0),
    food("nuts", "Mix de castanhas", FoodFamily::Fat, Fat, NutritionFacts::new(607.0, 20.0, 21.0, 54.0), Grams, 20.0),
];

/// Every catalog entry
#[must_use]
pub fn all() -> &'static [FoodItem] {
    FOODS
}

/// Look up a food by its preference id
#[must_use]
pub fn find(id: &str) -> Option<&'static FoodItem> {
    let id = id.trim();
    FOODS.iter().find(|food| food.id == id)
}

/// Look up a food by id or by display label (accent and case insensitive)
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static FoodItem> {
    find(name).or_else(|| {
        let folded = fold_text(name.trim());
        FOODS.iter().find(|food| fold_text(food.label) == folded)
    })
}

/// Foods in one category
pub fn by_category(category: FoodCategory) -> impl Iterator<Item = &'static FoodItem> {
    FOODS.iter().filter(move |food| food.category == category)
}

/// Resolve preference ids to catalog entries, skipping unknown ids
pub fn resolve<'a>(ids: &'a [String]) -> impl Iterator<Item = &'static FoodItem> + 'a {
    ids.iter().filter_map(|id| find_by_name(id))
}

/// Family of a preference id, falling back to name inference for ids outside the catalog
#[must_use]
pub fn family_of(id: &str) -> FoodFamily {
    find_by_name(id).map_or_else(|| FoodFamily::infer(id), |food| food.family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_infer_to_their_family() {
        for food in all() {
            assert_eq!(
                FoodFamily::infer(food.label),
                food.family,
                "label {} should infer to {:?}",
                food.label,
                food.family
            );
            assert_eq!(food.family.category(), Some(food.category), "{}", food.id);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<&str> = all().iter().map(|food| food.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_lookup_by_label_ignores_accents() {
        let rice = find_by_name("arroz BRANCO");
        assert_eq!(rice.map(|food| food.id), Some("rice_white"));
        assert_eq!(find_by_name("feijao carioca").map(|food| food.id), Some("beans"));
        assert!(find("unknown_food").is_none());
        assert_eq!(family_of("arroz parboilizado"), FoodFamily::Rice);
    }
}
