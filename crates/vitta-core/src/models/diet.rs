// ABOUTME: Diet plan models - meal slots, plan items, energy targets, and persisted snapshots
// ABOUTME: DailyPlan is the in-memory shape shared by both composers and the validator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::food::{fold_text, FoodCategory, FoodFamily, Quantity};
use crate::constants::meals::{BREAKFAST_SHARE, DINNER_SHARE, LUNCH_SHARE, SNACK_SHARE};

/// One of the four fixed daily meal slots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Afternoon snack
    AfternoonSnack,
    /// Dinner
    Dinner,
}

impl MealSlot {
    /// All slots in serving order
    pub const ALL: [Self; 4] = [
        Self::Breakfast,
        Self::Lunch,
        Self::AfternoonSnack,
        Self::Dinner,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::AfternoonSnack => "afternoon_snack",
            Self::Dinner => "dinner",
        }
    }

    /// Name shown to the user
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Breakfast => "Café da manhã",
            Self::Lunch => "Almoço",
            Self::AfternoonSnack => "Lanche da tarde",
            Self::Dinner => "Jantar",
        }
    }

    /// Default time of day
    #[must_use]
    pub const fn default_time(&self) -> &'static str {
        match self {
            Self::Breakfast => "07:00",
            Self::Lunch => "12:00",
            Self::AfternoonSnack => "16:00",
            Self::Dinner => "19:30",
        }
    }

    /// Zero-based order within the day
    #[must_use]
    pub const fn order_index(&self) -> u32 {
        match self {
            Self::Breakfast => 0,
            Self::Lunch => 1,
            Self::AfternoonSnack => 2,
            Self::Dinner => 3,
        }
    }

    /// Share of the daily calorie target assigned to this slot
    #[must_use]
    pub const fn calorie_share(&self) -> f64 {
        match self {
            Self::Breakfast => BREAKFAST_SHARE,
            Self::Lunch => LUNCH_SHARE,
            Self::AfternoonSnack => SNACK_SHARE,
            Self::Dinner => DINNER_SHARE,
        }
    }

    /// Lunch and dinner follow the protein + rice + vegetable template
    #[must_use]
    pub const fn is_main_meal(&self) -> bool {
        matches!(self, Self::Lunch | Self::Dinner)
    }

    /// Parse a meal name in English or Portuguese
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let folded = fold_text(name).replace(['_', '-'], " ");
        let folded = folded.trim();
        if folded == "breakfast" || folded.starts_with("cafe") || folded.contains("desjejum") {
            Some(Self::Breakfast)
        } else if folded.contains("snack") || folded.starts_with("lanche") {
            Some(Self::AfternoonSnack)
        } else if folded.contains("lunch") || folded.starts_with("almoco") {
            Some(Self::Lunch)
        } else if folded.contains("dinner") || folded.starts_with("jantar") || folded == "supper" {
            Some(Self::Dinner)
        } else {
            None
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sized food inside a meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    /// Food name as shown to the user
    pub name: String,
    /// Structured amount
    pub quantity: Quantity,
    /// Display string for the amount
    pub quantity_text: String,
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Nutritional category tag
    pub category: FoodCategory,
}

impl PlanItem {
    /// Family inferred from the item name
    #[must_use]
    pub fn family(&self) -> FoodFamily {
        FoodFamily::infer(&self.name)
    }
}

/// One meal of a daily plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanMeal {
    /// Slot this meal fills
    pub slot: MealSlot,
    /// Meal name as shown to the user
    pub name: String,
    /// Time of day (HH:MM)
    pub time: String,
    /// Items in serving order
    pub items: Vec<PlanItem>,
}

impl PlanMeal {
    /// Empty meal for a slot with its default name and time
    #[must_use]
    pub fn for_slot(slot: MealSlot) -> Self {
        Self {
            slot,
            name: slot.display_name().to_owned(),
            time: slot.default_time().to_owned(),
            items: Vec::new(),
        }
    }

    /// Total energy of the meal (kcal)
    #[must_use]
    pub fn total_calories(&self) -> f64 {
        self.items.iter().map(|item| item.calories).sum()
    }
}

/// A fully composed day of meals, not yet persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyPlan {
    /// Meals in serving order
    pub meals: Vec<PlanMeal>,
}

impl DailyPlan {
    /// Meal filling a slot, if present
    #[must_use]
    pub fn meal(&self, slot: MealSlot) -> Option<&PlanMeal> {
        self.meals.iter().find(|meal| meal.slot == slot)
    }

    /// Every item across the day
    pub fn items(&self) -> impl Iterator<Item = &PlanItem> {
        self.meals.iter().flat_map(|meal| meal.items.iter())
    }

    /// Total energy of the day (kcal)
    #[must_use]
    pub fn total_calories(&self) -> f64 {
        self.meals.iter().map(PlanMeal::total_calories).sum()
    }
}

/// Energy and hydration targets computed for one generation call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnergyTargets {
    /// Basal metabolic rate (kcal/day)
    pub tmb: u32,
    /// Estimated exercise burn (kcal/day)
    pub exercise_kcal: u32,
    /// Total daily energy expenditure (kcal/day)
    pub tdee: u32,
    /// Daily calorie target after the deficit and safety floor
    pub target_calories: u32,
    /// Protein target (g)
    pub protein_g: u32,
    /// Carbohydrate target (g)
    pub carbs_g: u32,
    /// Fat target (g)
    pub fat_g: u32,
    /// Daily water target (ml)
    pub water_ml: u32,
    /// Bottle size used for the bottle count (ml)
    pub bottle_ml: u32,
    /// Bottles per day
    pub bottles: u32,
}

/// Macro payload stored on a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroPayload {
    /// Protein target (g)
    pub protein_g: u32,
    /// Carbohydrate target (g)
    pub carbs_g: u32,
    /// Fat target (g)
    pub fat_g: u32,
    /// Daily water target (ml)
    pub water_ml: u32,
    /// Bottle size (ml)
    pub bottle_ml: u32,
    /// Bottles per day
    pub bottles: u32,
    /// Basal metabolic rate (kcal/day)
    pub tmb: u32,
    /// Total daily energy expenditure (kcal/day)
    pub tdee: u32,
}

impl From<&EnergyTargets> for MacroPayload {
    fn from(targets: &EnergyTargets) -> Self {
        Self {
            protein_g: targets.protein_g,
            carbs_g: targets.carbs_g,
            fat_g: targets.fat_g,
            water_ml: targets.water_ml,
            bottle_ml: targets.bottle_ml,
            bottles: targets.bottles,
            tmb: targets.tmb,
            tdee: targets.tdee,
        }
    }
}

/// Where a snapshot's meals came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanOrigin {
    /// Produced by the generative-text service
    AiGenerated,
    /// Produced by the rule-based composer
    Algorithmic,
}

impl PlanOrigin {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AiGenerated => "ai_generated",
            Self::Algorithmic => "algorithmic",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "ai_generated" | "ai" => Self::AiGenerated,
            _ => Self::Algorithmic,
        }
    }
}

impl fmt::Display for PlanOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted item row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotItem {
    /// Item identifier
    pub id: Uuid,
    /// Owning meal
    pub meal_id: Uuid,
    /// Item content
    #[serde(flatten)]
    pub item: PlanItem,
}

/// Persisted meal row with its items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotMeal {
    /// Meal identifier
    pub id: Uuid,
    /// Owning snapshot
    pub snapshot_id: Uuid,
    /// Slot this meal fills
    pub slot: MealSlot,
    /// Meal name
    pub name: String,
    /// Order within the day
    pub order_index: u32,
    /// Time of day (HH:MM)
    pub time: String,
    /// Items in serving order
    pub items: Vec<SnapshotItem>,
}

/// Persisted output of one generation, fully joined with meals and items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DietSnapshot {
    /// Snapshot identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Daily calorie target (kcal)
    pub daily_calories: u32,
    /// Macro and hydration payload
    pub macros: MacroPayload,
    /// Which composer produced the meals
    pub origin: PlanOrigin,
    /// Whether this is the user's current plan
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Meals in serving order
    pub meals: Vec<SnapshotMeal>,
}

impl DietSnapshot {
    /// Rebuild the in-memory plan from the persisted rows
    #[must_use]
    pub fn to_plan(&self) -> DailyPlan {
        DailyPlan {
            meals: self
                .meals
                .iter()
                .map(|meal| PlanMeal {
                    slot: meal.slot,
                    name: meal.name.clone(),
                    time: meal.time.clone(),
                    items: meal.items.iter().map(|row| row.item.clone()).collect(),
                })
                .collect(),
        }
    }
}

/// Values needed to insert a new snapshot row
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    /// Owning user
    pub user_id: Uuid,
    /// Daily calorie target (kcal)
    pub daily_calories: u32,
    /// Macro payload
    pub macros: MacroPayload,
    /// Composer that produced the plan
    pub origin: PlanOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_slot_parse() {
        assert_eq!(MealSlot::parse("Café da manhã"), Some(MealSlot::Breakfast));
        assert_eq!(MealSlot::parse("Almoço"), Some(MealSlot::Lunch));
        assert_eq!(MealSlot::parse("Lanche da tarde"), Some(MealSlot::AfternoonSnack));
        assert_eq!(MealSlot::parse("afternoon_snack"), Some(MealSlot::AfternoonSnack));
        assert_eq!(MealSlot::parse("Dinner"), Some(MealSlot::Dinner));
        assert_eq!(MealSlot::parse("Ceia"), None);
    }

    #[test]
    fn test_meal_shares_sum_to_one() {
        let total: f64 = MealSlot::ALL.iter().map(MealSlot::calorie_share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
