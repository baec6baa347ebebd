// ABOUTME: Rule-based meal composer building four daily meals from calorie shares and food preferences
// ABOUTME: Dinner mirrors lunch's protein and staple; fruit is capped across the whole day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal Composer
//!
//! Breakfast 25%, lunch 35%, afternoon snack 15% and dinner 25% of the daily
//! target. Choices among several eligible preferred foods are random, so a
//! retry after a failed validation can produce a different plan.
//!
//! Dinner is not sized from its own budget: it repeats lunch's protein at 90%
//! of lunch's realized calories, and lunch's staple and beans at 80% each.
//! Lunch and dinner are therefore composed first, so a breakfast or snack
//! sweet potato can be kept strictly below the day's rice.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use vitta_core::constants::meals::{
    BEANS_TO_RICE_RATIO, BROCCOLI_SIDE_KCAL, DINNER_CARBS_FROM_LUNCH, DINNER_PROTEIN_FROM_LUNCH,
    MAIN_PROTEIN_SHARE, MAX_DAILY_FRUITS, SNACK_PROTEIN_SHARE, TOMATO_SIDE_KCAL,
};
use vitta_core::constants::portions::{FREE_GREENS_KCAL, GRAM_STEP, MIN_GRAM_PORTION};
use vitta_core::models::{
    DailyPlan, EnergyTargets, FoodCategory, FoodFamily, FoodItem, FoodPreferences, MealSlot,
    PlanItem, PlanMeal, ServingUnit, UserDietProfile,
};

use crate::food_catalog::{self, BREAD, BROCCOLI, CHICKEN, EGGS, LETTUCE, RICE_WHITE, TOMATO};
use crate::portion::{calculate_portion, portion_for_amount};

/// Lunch choices dinner is derived from
#[derive(Debug, Clone, Copy)]
struct LunchChoices {
    protein: &'static FoodItem,
    protein_calories: f64,
    staple: &'static FoodItem,
    staple_amount: f64,
    beans: Option<(&'static FoodItem, f64)>,
}

/// Compose a full day of meals for a profile and its energy targets
pub fn compose_daily_plan<R: Rng + ?Sized>(
    profile: &UserDietProfile,
    targets: &EnergyTargets,
    rng: &mut R,
) -> DailyPlan {
    let mut composer = DayComposer::new(
        &profile.preferences,
        f64::from(targets.target_calories),
        rng,
    );
    let (lunch, choices) = composer.lunch();
    let dinner = composer.dinner(&choices);
    composer.rice_grams = grams_of_family(&[&lunch, &dinner], FoodFamily::Rice);
    let breakfast = composer.breakfast();
    let snack = composer.afternoon_snack();

    debug!(
        user.id = %profile.user_id,
        staple = choices.staple.id,
        protein = choices.protein.id,
        beans = choices.beans.is_some(),
        "Composed rule-based plan"
    );

    DailyPlan {
        meals: vec![breakfast, lunch, snack, dinner],
    }
}

struct DayComposer<'a, R: Rng + ?Sized> {
    prefs: &'a FoodPreferences,
    daily_calories: f64,
    rng: &'a mut R,
    selected: Vec<&'static FoodItem>,
    staple: &'static FoodItem,
    beans: Option<&'static FoodItem>,
    fruits_served: usize,
    breakfast_starch: Option<&'static FoodItem>,
    sweet_potato_served: bool,
    rice_grams: f64,
}

impl<'a, R: Rng + ?Sized> DayComposer<'a, R> {
    fn new(prefs: &'a FoodPreferences, daily_calories: f64, rng: &'a mut R) -> Self {
        let mut selected: Vec<&'static FoodItem> = Vec::new();
        for list in [&prefs.proteins, &prefs.carbs, &prefs.vegetables, &prefs.fruits] {
            for food in food_catalog::resolve(list) {
                if !selected.iter().any(|known| known.id == food.id) {
                    selected.push(food);
                }
            }
        }

        let rice = filter_family(&selected, |f| f == FoodFamily::Rice);
        let beans = filter_family(&selected, |f| f == FoodFamily::Beans);
        let other_carbs = filter_family(&selected, |f| f == FoodFamily::OtherCarb);

        // Beans are only served next to rice, so selecting them forces a rice staple
        let staple_pool = if rice.is_empty() && beans.is_empty() {
            other_carbs
        } else {
            rice
        };
        let staple = staple_pool.choose(&mut *rng).copied().unwrap_or(&RICE_WHITE);
        let beans = if staple.family == FoodFamily::Rice {
            beans.choose(&mut *rng).copied()
        } else {
            None
        };

        Self {
            prefs,
            daily_calories,
            rng,
            selected,
            staple,
            beans,
            fruits_served: 0,
            breakfast_starch: None,
            sweet_potato_served: false,
            rice_grams: 0.0,
        }
    }

    fn pick(
        &mut self,
        candidates: &[&'static FoodItem],
        fallback: &'static FoodItem,
    ) -> &'static FoodItem {
        candidates
            .choose(&mut *self.rng)
            .copied()
            .unwrap_or(fallback)
    }

    fn budget(&self, slot: MealSlot) -> f64 {
        self.daily_calories * slot.calorie_share()
    }

    /// Sweet potato is served at most once, only on days with a rice staple,
    /// and only when at least a minimum portion fits under the day's rice
    fn sweet_potato_allowed(&self) -> bool {
        !self.sweet_potato_served
            && self.staple.family == FoodFamily::Rice
            && self.sweet_potato_ceiling().is_some()
    }

    fn light_proteins(&self) -> Vec<&'static FoodItem> {
        filter_family(&self.selected, |f| {
            matches!(f, FoodFamily::Egg | FoodFamily::Dairy)
        })
    }

    fn fruit(&mut self, target_kcal: f64) -> Option<PlanItem> {
        if self.prefs.exclude_fruits || self.fruits_served >= MAX_DAILY_FRUITS {
            return None;
        }
        let mut candidates = filter_family(&self.selected, |f| f == FoodFamily::Fruit);
        if candidates.is_empty() && self.prefs.fruits.is_empty() {
            candidates = food_catalog::by_category(FoodCategory::Fruit).collect();
        }
        let food = candidates.choose(&mut *self.rng).copied()?;
        self.fruits_served += 1;
        Some(calculate_portion(target_kcal, food, None).into_item(food))
    }

    /// Largest sweet potato weight still strictly below the day's rice
    fn sweet_potato_ceiling(&self) -> Option<f64> {
        let ceiling = ((self.rice_grams - 1.0) / GRAM_STEP).floor() * GRAM_STEP;
        (ceiling >= MIN_GRAM_PORTION).then_some(ceiling)
    }

    fn light_starch(&mut self, avoid: Option<&'static FoodItem>) -> &'static FoodItem {
        let allow_sweet_potato = self.sweet_potato_allowed();
        let candidates = filter_family(&self.selected, |f| {
            f.is_bread_family() || (f == FoodFamily::SweetPotato && allow_sweet_potato)
        });

        let explicit_sweet_potato = candidates
            .iter()
            .copied()
            .find(|food| food.family == FoodFamily::SweetPotato);

        let starch = match (avoid, explicit_sweet_potato) {
            (None, Some(sweet_potato)) => sweet_potato,
            _ => {
                let fresh: Vec<_> = candidates
                    .iter()
                    .copied()
                    .filter(|food| !avoid.is_some_and(|avoided| avoided.id == food.id))
                    .collect();
                let pool = if fresh.is_empty() { candidates } else { fresh };
                self.pick(&pool, &BREAD)
            }
        };

        if starch.family == FoodFamily::SweetPotato {
            self.sweet_potato_served = true;
        }
        starch
    }

    fn starch_item(&self, target_kcal: f64, starch: &'static FoodItem) -> PlanItem {
        let portion = calculate_portion(target_kcal, starch, None);
        match self.sweet_potato_ceiling() {
            Some(ceiling)
                if starch.family == FoodFamily::SweetPotato && portion.quantity.value > ceiling =>
            {
                portion_for_amount(starch, ceiling).into_item(starch)
            }
            _ => portion.into_item(starch),
        }
    }

    fn breakfast(&mut self) -> PlanMeal {
        let budget = self.budget(MealSlot::Breakfast);
        let mut meal = PlanMeal::for_slot(MealSlot::Breakfast);

        let proteins = self.light_proteins();
        let protein = self.pick(&proteins, &EGGS);
        let portion = calculate_portion(budget * MAIN_PROTEIN_SHARE, protein, None);
        let mut remaining = budget - portion.calories;
        meal.items.push(portion.into_item(protein));

        let fruit = self.fruit((remaining / 2.0).max(0.0));
        if let Some(item) = &fruit {
            remaining -= item.calories;
        }

        let starch = self.light_starch(None);
        self.breakfast_starch = Some(starch);
        meal.items.push(self.starch_item(remaining, starch));
        meal.items.extend(fruit);
        meal
    }

    fn vegetable_sides(&mut self) -> (Vec<PlanItem>, f64) {
        if self.prefs.exclude_vegetables {
            return (Vec::new(), 0.0);
        }

        let greens = filter_family(&self.selected, |f| f == FoodFamily::LeafyGreen);
        let green = self.pick(&greens, &LETTUCE);
        let mut sides = vec![calculate_portion(FREE_GREENS_KCAL, green, None).into_item(green)];
        let mut nominal = FREE_GREENS_KCAL;

        if self.prefs.selects(TOMATO.id) {
            sides.push(calculate_portion(TOMATO_SIDE_KCAL, &TOMATO, None).into_item(&TOMATO));
            nominal += TOMATO_SIDE_KCAL;
        }
        (sides, nominal)
    }

    fn lunch(&mut self) -> (PlanMeal, LunchChoices) {
        let budget = self.budget(MealSlot::Lunch);
        let mut meal = PlanMeal::for_slot(MealSlot::Lunch);

        let meats = filter_family(&self.selected, |f| f.is_meat());
        let protein = self.pick(&meats, &CHICKEN);
        let protein_portion = calculate_portion(budget * MAIN_PROTEIN_SHARE, protein, None);
        let protein_calories = protein_portion.calories;
        meal.items.push(protein_portion.into_item(protein));

        let (sides, nominal) = self.vegetable_sides();
        let carb_budget = (budget - protein_calories - nominal).max(0.0);

        let staple = self.staple;
        let beans = self
            .beans
            .filter(|_| staple.serving == ServingUnit::Grams)
            .map(|beans| {
                let (rice_grams, bean_grams) = solve_rice_and_beans(carb_budget, staple, beans);
                (rice_grams, (beans, bean_grams))
            });

        let staple_portion = match beans {
            Some((rice_grams, _)) => portion_for_amount(staple, rice_grams),
            None => calculate_portion(carb_budget, staple, None),
        };
        let staple_amount = staple_portion.quantity.value;
        meal.items.push(staple_portion.into_item(staple));

        let beans = beans.map(|(_, beans)| beans);
        if let Some((food, grams)) = beans {
            meal.items.push(portion_for_amount(food, grams).into_item(food));
        }
        meal.items.extend(sides);

        let choices = LunchChoices {
            protein,
            protein_calories,
            staple,
            staple_amount,
            beans,
        };
        (meal, choices)
    }

    fn afternoon_snack(&mut self) -> PlanMeal {
        let budget = self.budget(MealSlot::AfternoonSnack);
        let mut meal = PlanMeal::for_slot(MealSlot::AfternoonSnack);

        let proteins = self.light_proteins();
        let eggs = filter_family(&proteins, |f| f == FoodFamily::Egg);
        let pool = if eggs.is_empty() { proteins } else { eggs };
        let protein = self.pick(&pool, &EGGS);
        let portion = calculate_portion(budget * SNACK_PROTEIN_SHARE, protein, None);
        let mut remaining = budget - portion.calories;
        meal.items.push(portion.into_item(protein));

        let fruit = self.fruit((remaining / 2.0).max(0.0));
        if let Some(item) = &fruit {
            remaining -= item.calories;
        }

        let starch = self.light_starch(self.breakfast_starch);
        meal.items.push(self.starch_item(remaining, starch));
        meal.items.extend(fruit);
        meal
    }

    fn dinner(&self, lunch: &LunchChoices) -> PlanMeal {
        let mut meal = PlanMeal::for_slot(MealSlot::Dinner);

        let protein_target = lunch.protein_calories * DINNER_PROTEIN_FROM_LUNCH;
        meal.items.push(
            calculate_portion(protein_target, lunch.protein, None).into_item(lunch.protein),
        );

        let staple = lunch.staple;
        let staple_amount = if staple.serving == ServingUnit::Grams {
            round_grams(lunch.staple_amount * DINNER_CARBS_FROM_LUNCH)
        } else {
            (lunch.staple_amount * DINNER_CARBS_FROM_LUNCH).round().max(1.0)
        };
        meal.items
            .push(portion_for_amount(staple, staple_amount).into_item(staple));

        if let Some((beans, lunch_bean_grams)) = lunch.beans {
            let bean_grams = (lunch_bean_grams * DINNER_CARBS_FROM_LUNCH).round();
            meal.items
                .push(portion_for_amount(beans, bean_grams).into_item(beans));
        }

        if !self.prefs.exclude_vegetables {
            meal.items.push(
                calculate_portion(BROCCOLI_SIDE_KCAL, &BROCCOLI, None).into_item(&BROCCOLI),
            );
        }
        meal
    }
}

fn filter_family(
    foods: &[&'static FoodItem],
    predicate: impl Fn(FoodFamily) -> bool,
) -> Vec<&'static FoodItem> {
    foods
        .iter()
        .copied()
        .filter(|food| predicate(food.family))
        .collect()
}

fn grams_of_family(meals: &[&PlanMeal], family: FoodFamily) -> f64 {
    meals
        .iter()
        .flat_map(|meal| meal.items.iter())
        .filter(|item| item.family() == family)
        .map(|item| item.quantity.weight_g())
        .sum()
}

fn round_grams(grams: f64) -> f64 {
    ((grams / GRAM_STEP).round() * GRAM_STEP).max(MIN_GRAM_PORTION)
}

/// Split a carbohydrate budget so beans weigh exactly half the rice
///
/// With `r` and `b` the kcal per gram of rice and beans, the rice weight is
/// `R = C / (r + 0.5 b)`, rounded to the gram step; beans are `0.5 R` exactly.
#[must_use]
pub fn solve_rice_and_beans(carb_budget: f64, rice: &FoodItem, beans: &FoodItem) -> (f64, f64) {
    let density = BEANS_TO_RICE_RATIO.mul_add(beans.calories_per_unit(), rice.calories_per_unit());
    let raw = if density > 0.0 {
        carb_budget / density
    } else {
        0.0
    };
    let rice_grams = round_grams(raw);
    (rice_grams, rice_grams * BEANS_TO_RICE_RATIO)
}
