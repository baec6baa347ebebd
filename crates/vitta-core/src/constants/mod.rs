// ABOUTME: Application constants organized by domain
// ABOUTME: Energy model coefficients, meal shares, portion limits, and generation defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants used across the diet engine.
//!
//! The diet rules are product decisions rather than per-user settings, so they
//! live here as fixed values instead of in runtime configuration.

/// Energy model (Harris-Benedict, exercise burn, deficit, hydration)
pub mod energy {
    /// Harris-Benedict female constant
    pub const HB_FEMALE_BASE: f64 = 655.0;
    /// Harris-Benedict female weight coefficient
    pub const HB_FEMALE_WEIGHT: f64 = 9.6;
    /// Harris-Benedict female height coefficient
    pub const HB_FEMALE_HEIGHT: f64 = 1.8;
    /// Harris-Benedict female age coefficient
    pub const HB_FEMALE_AGE: f64 = 4.7;

    /// Harris-Benedict male constant
    pub const HB_MALE_BASE: f64 = 66.5;
    /// Harris-Benedict male weight coefficient
    pub const HB_MALE_WEIGHT: f64 = 13.75;
    /// Harris-Benedict male height coefficient
    pub const HB_MALE_HEIGHT: f64 = 5.003;
    /// Harris-Benedict male age coefficient
    pub const HB_MALE_AGE: f64 = 6.75;

    /// Fixed daily caloric deficit (kcal)
    pub const DAILY_DEFICIT_KCAL: f64 = 500.0;
    /// Hard safety floor for the daily calorie target (kcal)
    pub const MIN_DAILY_CALORIES: u32 = 1200;

    /// Protein share of target calories
    pub const PROTEIN_SHARE: f64 = 0.30;
    /// Carbohydrate share of target calories
    pub const CARBS_SHARE: f64 = 0.40;
    /// Fat share of target calories
    pub const FAT_SHARE: f64 = 0.30;
    /// Energy density of protein and carbohydrate (kcal/g)
    pub const KCAL_PER_G_PROTEIN_CARB: f64 = 4.0;
    /// Energy density of fat (kcal/g)
    pub const KCAL_PER_G_FAT: f64 = 9.0;

    /// Daily water target per kg of body weight (ml)
    pub const WATER_ML_PER_KG: f64 = 35.0;
    /// Bottle size used when the user has not picked one (ml)
    pub const DEFAULT_BOTTLE_ML: u32 = 500;
}

/// Fallback profile values used when neither the preferences nor the user record carry them
pub mod profile_defaults {
    /// Default body weight (kg)
    pub const WEIGHT_KG: f64 = 70.0;
    /// Default height (cm)
    pub const HEIGHT_CM: f64 = 165.0;
    /// Default age (years)
    pub const AGE_YEARS: u32 = 30;
    /// Default biological sex code
    pub const SEX: &str = "female";
    /// Default workout frequency bucket
    pub const WORKOUT_FREQUENCY: &str = "1-2";
    /// Default workout duration bucket (minutes)
    pub const WORKOUT_DURATION: &str = "15";
}

/// Portion sizing rules
pub mod portions {
    /// Flat calories reported for leafy greens served freely
    pub const FREE_GREENS_KCAL: f64 = 15.0;
    /// Flat protein reported for leafy greens (g)
    pub const FREE_GREENS_PROTEIN_G: f64 = 1.0;
    /// Flat carbohydrates reported for leafy greens (g)
    pub const FREE_GREENS_CARBS_G: f64 = 2.0;
    /// Display label for a free portion
    pub const FREE_PORTION_LABEL: &str = "À vontade";

    /// Tomato lower bound (g)
    pub const TOMATO_MIN_G: f64 = 20.0;
    /// Tomato upper bound (g)
    pub const TOMATO_MAX_G: f64 = 80.0;

    /// Fixed natural yogurt pot weight (g)
    pub const YOGURT_POT_G: f64 = 170.0;

    /// Gram portions round to this step
    pub const GRAM_STEP: f64 = 10.0;
    /// Minimum gram portion for anything that is not a pure fat
    pub const MIN_GRAM_PORTION: f64 = 50.0;
    /// Rounding step for pure fats served by weight
    pub const FAT_GRAM_STEP: f64 = 5.0;

    /// Default unit cap for fruit
    pub const MAX_FRUIT_UNITS: u32 = 1;
    /// Default unit cap for bread
    pub const MAX_BREAD_UNITS: u32 = 1;
    /// Default unit cap for eggs
    pub const MAX_EGG_UNITS: u32 = 4;
}

/// Meal composition rules
pub mod meals {
    /// Breakfast share of the daily calorie target
    pub const BREAKFAST_SHARE: f64 = 0.25;
    /// Lunch share of the daily calorie target
    pub const LUNCH_SHARE: f64 = 0.35;
    /// Afternoon snack share of the daily calorie target
    pub const SNACK_SHARE: f64 = 0.15;
    /// Dinner share of the daily calorie target
    pub const DINNER_SHARE: f64 = 0.25;

    /// Protein share of the breakfast and lunch budgets
    pub const MAIN_PROTEIN_SHARE: f64 = 0.40;
    /// Protein share of the snack budget
    pub const SNACK_PROTEIN_SHARE: f64 = 0.50;

    /// Dinner protein as a fraction of lunch's realized protein calories
    pub const DINNER_PROTEIN_FROM_LUNCH: f64 = 0.90;
    /// Dinner carbs as a fraction of lunch's realized carb calories
    pub const DINNER_CARBS_FROM_LUNCH: f64 = 0.80;

    /// Beans weight as a fraction of the rice weight it is served with
    pub const BEANS_TO_RICE_RATIO: f64 = 0.5;
    /// Highest beans:rice weight ratio the validator accepts
    pub const MAX_BEANS_TO_RICE_RATIO: f64 = 0.6;

    /// Fruit occurrences allowed per day
    pub const MAX_DAILY_FRUITS: usize = 2;

    /// Nominal calorie allotment for the tomato side
    pub const TOMATO_SIDE_KCAL: f64 = 15.0;
    /// Nominal calorie allotment for the dinner broccoli side
    pub const BROCCOLI_SIDE_KCAL: f64 = 35.0;
}

/// Generation orchestration defaults
pub mod generation {
    /// Rule-based attempts before a candidate is accepted regardless of validation
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Days covered by the weekly shopping list
    pub const WEEKLY_DAYS: u32 = 7;
    /// Days covered by the monthly shopping list
    pub const MONTHLY_DAYS: u32 = 30;
}

/// Service names used in structured logging
pub mod service_names {
    /// Diet engine service name
    pub const VITTA_DIET: &str = "vitta-diet";
}
