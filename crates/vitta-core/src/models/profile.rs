// ABOUTME: User and food-preference records plus the per-call UserDietProfile view over them
// ABOUTME: Missing profile fields fall back to the user record, then to fixed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::food::fold_text;
use crate::constants::energy::DEFAULT_BOTTLE_ML;
use crate::constants::profile_defaults;

/// Biological sex as used by the Harris-Benedict equation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    /// Female-coded input
    Female,
    /// Any other input
    Male,
}

impl BiologicalSex {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }

    /// Anything that is not female-coded uses the male equation
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        match fold_text(s).trim() {
            "female" | "f" | "feminino" | "feminina" | "mulher" | "woman" => Self::Female,
            _ => Self::Male,
        }
    }
}

impl fmt::Display for BiologicalSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly workout frequency bucket from the onboarding quiz
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkoutFrequency {
    /// "1-2" sessions per week
    #[serde(rename = "1-2")]
    OneToTwo,
    /// "3-4" sessions per week
    #[serde(rename = "3-4")]
    ThreeToFour,
    /// "5+" sessions per week
    #[serde(rename = "5+")]
    FivePlus,
    /// Anything else
    #[serde(rename = "none")]
    Unknown,
}

impl WorkoutFrequency {
    /// Parse a bucket label, unknown labels count as no sessions
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "1-2" => Self::OneToTwo,
            "3-4" => Self::ThreeToFour,
            "5+" => Self::FivePlus,
            _ => Self::Unknown,
        }
    }

    /// Bucket label as stored
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneToTwo => "1-2",
            Self::ThreeToFour => "3-4",
            Self::FivePlus => "5+",
            Self::Unknown => "none",
        }
    }

    /// Sessions per week credited to this bucket
    #[must_use]
    pub const fn sessions_per_week(&self) -> u32 {
        match self {
            Self::OneToTwo => 2,
            Self::ThreeToFour => 4,
            Self::FivePlus => 5,
            Self::Unknown => 0,
        }
    }
}

/// Workout session length bucket, stored as its leading minute count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDuration {
    /// Minutes per session, 0 when the bucket could not be read
    pub minutes: u32,
}

impl WorkoutDuration {
    /// Parse labels such as `"15"`, `"30+"` or `"20 min"`
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
        Self {
            minutes: digits.parse().unwrap_or(0),
        }
    }

    /// Estimated energy burned in one session (kcal)
    #[must_use]
    pub const fn kcal_per_session(&self) -> u32 {
        match self.minutes {
            30.. => 300,
            20..=29 => 200,
            15..=19 => 150,
            _ => 0,
        }
    }
}

/// Food preference selections by catalog id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodPreferences {
    /// Allowed protein ids
    #[serde(default, alias = "proteinas")]
    pub proteins: Vec<String>,
    /// Allowed carbohydrate ids
    #[serde(default, alias = "carboidratos")]
    pub carbs: Vec<String>,
    /// Allowed vegetable ids
    #[serde(default, alias = "vegetais")]
    pub vegetables: Vec<String>,
    /// Allowed fruit ids
    #[serde(default, alias = "frutas")]
    pub fruits: Vec<String>,
    /// Exclude vegetables entirely
    #[serde(default)]
    pub exclude_vegetables: bool,
    /// Exclude fruit entirely
    #[serde(default)]
    pub exclude_fruits: bool,
}

impl FoodPreferences {
    /// Whether an id appears in any of the selection lists
    #[must_use]
    pub fn selects(&self, id: &str) -> bool {
        self.proteins
            .iter()
            .chain(&self.carbs)
            .chain(&self.vegetables)
            .chain(&self.fruits)
            .any(|selected| selected == id)
    }
}

/// Stored user row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// User identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Body weight (kg)
    pub weight_kg: Option<f64>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Age (years)
    pub age: Option<u32>,
    /// Biological sex label
    pub sex: Option<String>,
    /// Subscription plan label
    pub plan: Option<String>,
    /// Workout frequency bucket label
    pub workout_frequency: Option<String>,
    /// Workout duration bucket label
    pub workout_duration: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Stored food-preference submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferencesRecord {
    /// Submission identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Food selections
    pub foods: FoodPreferences,
    /// Workout frequency bucket label
    pub workout_frequency: Option<String>,
    /// Workout duration bucket label
    pub workout_duration: Option<String>,
    /// Preferred water bottle size (ml)
    pub bottle_size_ml: Option<u32>,
    /// Body weight reported with this submission (kg)
    pub weight_kg: Option<f64>,
    /// Height reported with this submission (cm)
    pub height_cm: Option<f64>,
    /// Age reported with this submission (years)
    pub age: Option<u32>,
    /// Biological sex reported with this submission
    pub sex: Option<String>,
    /// Whether this is the submission currently in force
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Everything the energy model and composers need about one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDietProfile {
    /// User identifier
    pub user_id: Uuid,
    /// Body weight (kg)
    pub weight_kg: f64,
    /// Height (cm)
    pub height_cm: f64,
    /// Age (years)
    pub age: u32,
    /// Biological sex
    pub sex: BiologicalSex,
    /// Workout frequency bucket
    pub workout_frequency: WorkoutFrequency,
    /// Workout duration bucket
    pub workout_duration: WorkoutDuration,
    /// Food selections
    pub preferences: FoodPreferences,
    /// Preferred water bottle size (ml)
    pub bottle_size_ml: u32,
}

impl UserDietProfile {
    /// Derive the profile: preferences first, then the user record, then defaults
    #[must_use]
    pub fn from_records(user: &UserRecord, preferences: Option<&PreferencesRecord>) -> Self {
        let weight_kg = preferences
            .and_then(|p| p.weight_kg)
            .filter(|w| *w > 0.0)
            .or(user.weight_kg.filter(|w| *w > 0.0))
            .unwrap_or(profile_defaults::WEIGHT_KG);
        let height_cm = preferences
            .and_then(|p| p.height_cm)
            .filter(|h| *h > 0.0)
            .or(user.height_cm.filter(|h| *h > 0.0))
            .unwrap_or(profile_defaults::HEIGHT_CM);
        let age = preferences
            .and_then(|p| p.age)
            .filter(|a| *a > 0)
            .or(user.age.filter(|a| *a > 0))
            .unwrap_or(profile_defaults::AGE_YEARS);
        let sex = preferences
            .and_then(|p| p.sex.as_deref())
            .or(user.sex.as_deref())
            .unwrap_or(profile_defaults::SEX);
        let frequency = preferences
            .and_then(|p| p.workout_frequency.as_deref())
            .or(user.workout_frequency.as_deref())
            .unwrap_or(profile_defaults::WORKOUT_FREQUENCY);
        let duration = preferences
            .and_then(|p| p.workout_duration.as_deref())
            .or(user.workout_duration.as_deref())
            .unwrap_or(profile_defaults::WORKOUT_DURATION);

        Self {
            user_id: user.id,
            weight_kg,
            height_cm,
            age,
            sex: BiologicalSex::parse_lossy(sex),
            workout_frequency: WorkoutFrequency::parse(frequency),
            workout_duration: WorkoutDuration::parse(duration),
            preferences: preferences.map(|p| p.foods.clone()).unwrap_or_default(),
            bottle_size_ml: preferences
                .and_then(|p| p.bottle_size_ml)
                .filter(|ml| *ml > 0)
                .unwrap_or(DEFAULT_BOTTLE_ML),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_user() -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            weight_kg: None,
            height_cm: None,
            age: None,
            sex: None,
            plan: None,
            workout_frequency: None,
            workout_duration: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_uses_hard_defaults() {
        let profile = UserDietProfile::from_records(&bare_user(), None);
        assert!((profile.weight_kg - 70.0).abs() < f64::EPSILON);
        assert!((profile.height_cm - 165.0).abs() < f64::EPSILON);
        assert_eq!(profile.age, 30);
        assert_eq!(profile.sex, BiologicalSex::Female);
        assert_eq!(profile.workout_frequency, WorkoutFrequency::OneToTwo);
        assert_eq!(profile.workout_duration.minutes, 15);
        assert_eq!(profile.bottle_size_ml, 500);
    }

    #[test]
    fn test_preferences_override_user_record() {
        let mut user = bare_user();
        user.weight_kg = Some(80.0);
        user.sex = Some("male".to_owned());
        let prefs = PreferencesRecord {
            id: Uuid::new_v4(),
            user_id: user.id,
            foods: FoodPreferences::default(),
            workout_frequency: Some("5+".to_owned()),
            workout_duration: None,
            bottle_size_ml: Some(750),
            weight_kg: Some(78.5),
            height_cm: None,
            age: None,
            sex: None,
            is_active: true,
            created_at: Utc::now(),
        };

        let profile = UserDietProfile::from_records(&user, Some(&prefs));
        assert!((profile.weight_kg - 78.5).abs() < f64::EPSILON);
        assert_eq!(profile.sex, BiologicalSex::Male);
        assert_eq!(profile.workout_frequency.sessions_per_week(), 5);
        assert_eq!(profile.bottle_size_ml, 750);
    }

    #[test]
    fn test_zero_submission_values_fall_back_to_user_record() {
        let mut user = bare_user();
        user.weight_kg = Some(82.0);
        user.height_cm = Some(178.0);
        user.age = Some(41);
        let prefs = PreferencesRecord {
            id: Uuid::new_v4(),
            user_id: user.id,
            foods: FoodPreferences::default(),
            workout_frequency: None,
            workout_duration: None,
            bottle_size_ml: None,
            weight_kg: Some(0.0),
            height_cm: Some(0.0),
            age: Some(0),
            sex: None,
            is_active: true,
            created_at: Utc::now(),
        };

        let profile = UserDietProfile::from_records(&user, Some(&prefs));
        assert!((profile.weight_kg - 82.0).abs() < f64::EPSILON);
        assert!((profile.height_cm - 178.0).abs() < f64::EPSILON);
        assert_eq!(profile.age, 41);
    }

    #[test]
    fn test_duration_buckets() {
        assert_eq!(WorkoutDuration::parse("30+").kcal_per_session(), 300);
        assert_eq!(WorkoutDuration::parse("45 min").kcal_per_session(), 300);
        assert_eq!(WorkoutDuration::parse("20").kcal_per_session(), 200);
        assert_eq!(WorkoutDuration::parse("15").kcal_per_session(), 150);
        assert_eq!(WorkoutDuration::parse("10").kcal_per_session(), 0);
        assert_eq!(WorkoutDuration::parse("sem treino").kcal_per_session(), 0);
    }

    #[test]
    fn test_sex_parsing_is_lossy() {
        assert_eq!(BiologicalSex::parse_lossy("Feminino"), BiologicalSex::Female);
        assert_eq!(BiologicalSex::parse_lossy("other"), BiologicalSex::Male);
    }
}
