// ABOUTME: Diet validator checking a composed day against composition and ratio rules
// ABOUTME: Single predicate applied to rule-based and AI-generated plans alike
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Diet Validator
//!
//! Item families are inferred from item names so plans written by the
//! generative-text service are checked with the same rules as catalog plans.
//! Gram weights come from the structured quantity of each item.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use vitta_core::constants::meals::{MAX_BEANS_TO_RICE_RATIO, MAX_DAILY_FRUITS};
use vitta_core::models::{
    DailyPlan, FoodCategory, FoodFamily, FoodPreferences, MealSlot, PlanItem, PlanMeal,
};

use crate::food_catalog;

/// One broken rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// A meal slot has no meal
    MissingMeal {
        /// Slot without a meal
        slot: MealSlot,
    },
    /// Rice was selected but the meal has none
    MissingRice {
        /// Offending slot
        slot: MealSlot,
    },
    /// Beans were selected but the meal has none
    MissingBeans {
        /// Offending slot
        slot: MealSlot,
    },
    /// Beans served without rice
    BeansWithoutRice {
        /// Offending slot
        slot: MealSlot,
    },
    /// Bread, tapioca, couscous or sweet potato in a main meal
    LightStarchInMainMeal {
        /// Offending slot
        slot: MealSlot,
        /// Offending item
        item: String,
    },
    /// Fruit in a main meal
    FruitInMainMeal {
        /// Offending slot
        slot: MealSlot,
        /// Offending item
        item: String,
    },
    /// Main meal without meat, poultry or fish
    MissingMeat {
        /// Offending slot
        slot: MealSlot,
    },
    /// Beans weigh too much relative to rice
    BeansToRiceRatio {
        /// Offending slot
        slot: MealSlot,
        /// Rice weight (g)
        rice_g: f64,
        /// Beans weight (g)
        beans_g: f64,
    },
    /// Breakfast or snack without a protein item
    MissingProtein {
        /// Offending slot
        slot: MealSlot,
    },
    /// Beef, fish or pork at breakfast
    HeavyMeatAtBreakfast {
        /// Offending item
        item: String,
    },
    /// Breakfast or snack starch outside the bread and sweet potato families
    StarchNotAllowed {
        /// Offending slot
        slot: MealSlot,
        /// Offending item
        item: String,
    },
    /// More fruit than the daily ceiling
    TooManyFruits {
        /// Fruit occurrences in the day
        count: usize,
    },
    /// Sweet potato not strictly below rice across the day
    SweetPotatoNotBelowRice {
        /// Sweet potato weight (g)
        sweet_potato_g: f64,
        /// Rice weight (g)
        rice_g: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMeal { slot } => write!(f, "{slot}: meal is missing"),
            Self::MissingRice { slot } => write!(f, "{slot}: rice was selected but not served"),
            Self::MissingBeans { slot } => write!(f, "{slot}: beans were selected but not served"),
            Self::BeansWithoutRice { slot } => write!(f, "{slot}: beans served without rice"),
            Self::LightStarchInMainMeal { slot, item } => {
                write!(f, "{slot}: {item} is reserved for breakfast and snack")
            }
            Self::FruitInMainMeal { slot, item } => write!(f, "{slot}: fruit {item} in main meal"),
            Self::MissingMeat { slot } => write!(f, "{slot}: no meat, poultry or fish"),
            Self::BeansToRiceRatio {
                slot,
                rice_g,
                beans_g,
            } => write!(f, "{slot}: beans {beans_g}g against rice {rice_g}g"),
            Self::MissingProtein { slot } => write!(f, "{slot}: no protein item"),
            Self::HeavyMeatAtBreakfast { item } => write!(f, "breakfast: {item} is too heavy"),
            Self::StarchNotAllowed { slot, item } => {
                write!(f, "{slot}: {item} is not a bread or sweet potato starch")
            }
            Self::TooManyFruits { count } => write!(f, "{count} fruits in one day"),
            Self::SweetPotatoNotBelowRice {
                sweet_potato_g,
                rice_g,
            } => write!(f, "sweet potato {sweet_potato_g}g not below rice {rice_g}g"),
        }
    }
}

/// Outcome of validating one plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Every broken rule, empty when the plan is acceptable
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether the plan passed every rule
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations joined for log fields
    #[must_use]
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn family(item: &PlanItem) -> FoodFamily {
    item.family()
}

fn is_protein(item: &PlanItem) -> bool {
    item.category == FoodCategory::Protein
        || family(item).category() == Some(FoodCategory::Protein)
}

fn is_fruit(item: &PlanItem) -> bool {
    item.category == FoodCategory::Fruit || family(item) == FoodFamily::Fruit
}

/// Starch items; the name wins over the tag when the name is recognized
fn is_carb(item: &PlanItem) -> bool {
    match family(item).category() {
        Some(category) => category == FoodCategory::Carb,
        None => item.category == FoodCategory::Carb,
    }
}

fn grams_of<'a>(items: impl IntoIterator<Item = &'a PlanItem>, wanted: FoodFamily) -> f64 {
    items
        .into_iter()
        .filter(|item| family(item) == wanted)
        .map(|item| item.quantity.weight_g())
        .sum()
}

fn selected_families(prefs: &FoodPreferences) -> HashSet<FoodFamily> {
    prefs
        .proteins
        .iter()
        .chain(&prefs.carbs)
        .chain(&prefs.vegetables)
        .chain(&prefs.fruits)
        .map(|id| food_catalog::family_of(id))
        .collect()
}

fn check_main_meal(meal: &PlanMeal, selected: &HashSet<FoodFamily>, out: &mut Vec<Violation>) {
    let slot = meal.slot;
    let has = |wanted: FoodFamily| meal.items.iter().any(|item| family(item) == wanted);
    let has_rice = has(FoodFamily::Rice);
    let has_beans = has(FoodFamily::Beans);

    if selected.contains(&FoodFamily::Rice) && !has_rice {
        out.push(Violation::MissingRice { slot });
    }
    if selected.contains(&FoodFamily::Beans) && !has_beans {
        out.push(Violation::MissingBeans { slot });
    }
    if has_beans && !has_rice {
        out.push(Violation::BeansWithoutRice { slot });
    }

    for item in &meal.items {
        if family(item).is_light_starch() {
            out.push(Violation::LightStarchInMainMeal {
                slot,
                item: item.name.clone(),
            });
        }
        if is_fruit(item) {
            out.push(Violation::FruitInMainMeal {
                slot,
                item: item.name.clone(),
            });
        }
    }

    if !meal.items.iter().any(|item| family(item).is_meat()) {
        out.push(Violation::MissingMeat { slot });
    }

    if has_rice && has_beans {
        let rice_g = grams_of(&meal.items, FoodFamily::Rice);
        let beans_g = grams_of(&meal.items, FoodFamily::Beans);
        let ratio_exceeded = rice_g > 0.0 && beans_g / rice_g > MAX_BEANS_TO_RICE_RATIO;
        if ratio_exceeded || beans_g >= rice_g {
            out.push(Violation::BeansToRiceRatio {
                slot,
                rice_g,
                beans_g,
            });
        }
    }
}

fn check_light_meal(meal: &PlanMeal, out: &mut Vec<Violation>) {
    let slot = meal.slot;
    if !meal.items.iter().any(is_protein) {
        out.push(Violation::MissingProtein { slot });
    }
    for item in &meal.items {
        if slot == MealSlot::Breakfast && family(item).is_heavy_meat() {
            out.push(Violation::HeavyMeatAtBreakfast {
                item: item.name.clone(),
            });
        }
        if is_carb(item) && !family(item).is_light_starch() {
            out.push(Violation::StarchNotAllowed {
                slot,
                item: item.name.clone(),
            });
        }
    }
}

/// Check a full day against every composition rule
#[must_use]
pub fn validate_diet(plan: &DailyPlan, prefs: &FoodPreferences) -> ValidationReport {
    let selected = selected_families(prefs);
    let mut violations = Vec::new();

    for slot in MealSlot::ALL {
        let Some(meal) = plan.meal(slot) else {
            violations.push(Violation::MissingMeal { slot });
            continue;
        };
        if slot.is_main_meal() {
            check_main_meal(meal, &selected, &mut violations);
        } else {
            check_light_meal(meal, &mut violations);
        }
    }

    let fruit_count = plan.items().filter(|item| is_fruit(item)).count();
    if fruit_count > MAX_DAILY_FRUITS {
        violations.push(Violation::TooManyFruits { count: fruit_count });
    }

    let sweet_potato_g = grams_of(plan.items(), FoodFamily::SweetPotato);
    let rice_g = grams_of(plan.items(), FoodFamily::Rice);
    if sweet_potato_g > 0.0 && sweet_potato_g >= rice_g {
        violations.push(Violation::SweetPotatoNotBelowRice {
            sweet_potato_g,
            rice_g,
        });
    }

    ValidationReport { violations }
}

/// Pass/fail form of [`validate_diet`]
#[must_use]
pub fn is_valid_diet(plan: &DailyPlan, prefs: &FoodPreferences) -> bool {
    validate_diet(plan, prefs).is_valid()
}
