// ABOUTME: Energy model - Harris-Benedict TMB, exercise burn, TDEE, deficit target, macros and water
// ABOUTME: All values are integers because they are shown to users and stored on snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Energy Model
//!
//! # Formulas
//!
//! - TMB (Harris-Benedict, original 1919 coefficients):
//!   - Female: `655 + 9.6 x weight + 1.8 x height - 4.7 x age`
//!   - Otherwise: `66.5 + 13.75 x weight + 5.003 x height - 6.75 x age`
//! - Exercise burn: `per_session_kcal x sessions_per_week / 7`
//! - Target: `max(1200, TMB + burn - 500)`
//! - Macros: 30% protein, 40% carbohydrate, 30% fat of the target
//! - Water: `35 ml x weight`, served in bottles of the user's preferred size

use vitta_core::constants::energy::{
    CARBS_SHARE, DAILY_DEFICIT_KCAL, DEFAULT_BOTTLE_ML, FAT_SHARE, HB_FEMALE_AGE, HB_FEMALE_BASE,
    HB_FEMALE_HEIGHT, HB_FEMALE_WEIGHT, HB_MALE_AGE, HB_MALE_BASE, HB_MALE_HEIGHT,
    HB_MALE_WEIGHT, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN_CARB, MIN_DAILY_CALORIES, PROTEIN_SHARE,
    WATER_ML_PER_KG,
};
use vitta_core::models::{
    BiologicalSex, EnergyTargets, UserDietProfile, WorkoutDuration, WorkoutFrequency,
};

/// Macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSplit {
    /// Protein (g)
    pub protein_g: u32,
    /// Carbohydrates (g)
    pub carbs_g: u32,
    /// Fat (g)
    pub fat_g: u32,
}

fn round_to_u32(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Basal metabolic rate (kcal/day) by the Harris-Benedict equation, rounded
#[must_use]
pub fn calculate_tmb(weight_kg: f64, height_cm: f64, age: u32, sex: BiologicalSex) -> u32 {
    let age = f64::from(age);
    let tmb = match sex {
        BiologicalSex::Female => {
            HB_FEMALE_WEIGHT.mul_add(weight_kg, HB_FEMALE_BASE) + HB_FEMALE_HEIGHT * height_cm
                - HB_FEMALE_AGE * age
        }
        BiologicalSex::Male => {
            HB_MALE_WEIGHT.mul_add(weight_kg, HB_MALE_BASE) + HB_MALE_HEIGHT * height_cm
                - HB_MALE_AGE * age
        }
    };
    round_to_u32(tmb)
}

/// Average daily energy burned by training (kcal/day)
#[must_use]
pub fn calculate_daily_exercise_burn(duration: WorkoutDuration, frequency: WorkoutFrequency) -> u32 {
    let weekly = f64::from(duration.kcal_per_session() * frequency.sessions_per_week());
    round_to_u32(weekly / 7.0)
}

/// Daily calorie target: TDEE minus the fixed deficit, never below the safety floor
#[must_use]
pub fn calculate_target_calories(tdee: u32) -> u32 {
    let target = f64::from(tdee) - DAILY_DEFICIT_KCAL;
    round_to_u32(target).max(MIN_DAILY_CALORIES)
}

/// Fixed 30/40/30 macro split of a calorie target
#[must_use]
pub fn calculate_macros(target_calories: u32) -> MacroSplit {
    let calories = f64::from(target_calories);
    MacroSplit {
        protein_g: round_to_u32(calories * PROTEIN_SHARE / KCAL_PER_G_PROTEIN_CARB),
        carbs_g: round_to_u32(calories * CARBS_SHARE / KCAL_PER_G_PROTEIN_CARB),
        fat_g: round_to_u32(calories * FAT_SHARE / KCAL_PER_G_FAT),
    }
}

/// Daily water target (ml)
#[must_use]
pub fn calculate_water_ml(weight_kg: f64) -> u32 {
    round_to_u32(weight_kg * WATER_ML_PER_KG)
}

/// Bottles needed to reach the water target; a zero bottle size uses the default
#[must_use]
pub fn calculate_bottles(water_ml: u32, bottle_ml: u32) -> u32 {
    let bottle_ml = if bottle_ml == 0 {
        DEFAULT_BOTTLE_ML
    } else {
        bottle_ml
    };
    water_ml.div_ceil(bottle_ml)
}

/// Compute every target for one generation call
#[must_use]
pub fn compute_energy_targets(profile: &UserDietProfile) -> EnergyTargets {
    let tmb = calculate_tmb(profile.weight_kg, profile.height_cm, profile.age, profile.sex);
    let exercise_kcal =
        calculate_daily_exercise_burn(profile.workout_duration, profile.workout_frequency);
    let tdee = tmb.saturating_add(exercise_kcal);
    let target_calories = calculate_target_calories(tdee);
    let macros = calculate_macros(target_calories);
    let water_ml = calculate_water_ml(profile.weight_kg);
    let bottle_ml = if profile.bottle_size_ml == 0 {
        DEFAULT_BOTTLE_ML
    } else {
        profile.bottle_size_ml
    };

    EnergyTargets {
        tmb,
        exercise_kcal,
        tdee,
        target_calories,
        protein_g: macros.protein_g,
        carbs_g: macros.carbs_g,
        fat_g: macros.fat_g,
        water_ml,
        bottle_ml,
        bottles: calculate_bottles(water_ml, bottle_ml),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmb_female_reference_value() {
        assert_eq!(calculate_tmb(60.0, 165.0, 30, BiologicalSex::Female), 1387);
    }

    #[test]
    fn test_tmb_male_reference_value() {
        // 66.5 + 1100 + 900.54 - 202.5 = 1864.54
        assert_eq!(calculate_tmb(80.0, 180.0, 30, BiologicalSex::Male), 1865);
    }

    #[test]
    fn test_exercise_burn_buckets() {
        let burn = calculate_daily_exercise_burn(
            WorkoutDuration::parse("30"),
            WorkoutFrequency::parse("3-4"),
        );
        // 300 * 4 / 7 = 171.4
        assert_eq!(burn, 171);
        assert_eq!(
            calculate_daily_exercise_burn(WorkoutDuration::parse("10"), WorkoutFrequency::FivePlus),
            0
        );
    }

    #[test]
    fn test_target_never_below_floor() {
        assert_eq!(calculate_target_calories(0), 1200);
        assert_eq!(calculate_target_calories(1500), 1200);
        assert_eq!(calculate_target_calories(1701), 1201);
    }

    #[test]
    fn test_absurd_body_data_saturates() {
        let profile = UserDietProfile {
            user_id: uuid::Uuid::nil(),
            weight_kg: 1.0e12,
            height_cm: 165.0,
            age: 30,
            sex: BiologicalSex::Male,
            workout_frequency: WorkoutFrequency::FivePlus,
            workout_duration: WorkoutDuration::parse("60"),
            preferences: vitta_core::models::FoodPreferences::default(),
            bottle_size_ml: 500,
        };
        let targets = compute_energy_targets(&profile);
        assert_eq!(targets.tmb, u32::MAX);
        assert_eq!(targets.tdee, u32::MAX);
        assert!(targets.target_calories >= MIN_DAILY_CALORIES);
    }

    #[test]
    fn test_bottles_round_up() {
        assert_eq!(calculate_bottles(2100, 500), 5);
        assert_eq!(calculate_bottles(2000, 500), 4);
        assert_eq!(calculate_bottles(2100, 0), 5);
    }
}
