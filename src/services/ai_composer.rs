// ABOUTME: AI-assisted meal composer - prompts an LLM for a day of meals and decodes its JSON reply
// ABOUTME: Every failure (transport, fences, malformed JSON, missing meals) yields None, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # AI-Assisted Composer
//!
//! The reply is untyped text. It is decoded once, at this boundary, into
//! [`DailyPlan`]: fences are stripped, the outermost JSON object is cut out,
//! and lenient serde types absorb the usual variations (numbers sent as
//! strings, Portuguese field names, quantities sent as bare gram counts).

use serde::{Deserialize, Deserializer};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::intelligence::food_catalog;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{
    DailyPlan, EnergyTargets, FoodCategory, FoodFamily, FoodPreferences, MealSlot, PlanItem,
    PlanMeal, Quantity, UserDietProfile,
};

const SYSTEM_PROMPT: &str = "You are a registered dietitian who writes practical Brazilian meal \
plans. You answer with a single JSON object and nothing else.";

const METHODOLOGY: &str = "\
Rules:
- Prefer whole, minimally processed foods. Avoid ultra-processed foods.
- Breakfast must be protein-forward (eggs, yogurt, cottage or chicken).
- Lunch and dinner follow the template: one meat, poultry or fish + rice (with beans when listed) + vegetables.
- Beans weigh half of the rice in the same meal.
- Bread, tapioca, couscous and sweet potato only at breakfast or the afternoon snack.
- No fruit at lunch or dinner, and at most 2 fruits in the whole day.
- Use only the foods the user selected when a list is given.";

const RESPONSE_FORMAT: &str = r#"Respond with exactly this JSON shape:
{"meals": [{"name": "Café da manhã", "time": "07:00", "items": [{"name": "Ovos", "quantity": "2 unidade(s)", "calories": 143, "protein": 12.6, "carbs": 0.7, "fat": 9.5, "category": "protein"}]}]}
Meals, in order: Café da manhã, Almoço, Lanche da tarde, Jantar.
Quantities are strings such as "150g", "2 unidade(s)", "1 fatia(s)", "1 colher(es)" or "À vontade".
category is one of protein, carb, vegetable, fruit, fat."#;

/// Temperature used for plan generation
const TEMPERATURE: f32 = 0.7;

/// Enough room for four meals of itemized JSON
const MAX_TOKENS: u32 = 2048;

// ============================================================================
// Response payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct AiDietResponse {
    #[serde(alias = "refeicoes")]
    meals: Vec<AiMeal>,
}

#[derive(Debug, Deserialize)]
struct AiMeal {
    #[serde(alias = "nome")]
    name: String,
    #[serde(default, alias = "horario")]
    time: Option<String>,
    #[serde(default, alias = "itens", alias = "foods")]
    items: Vec<AiItem>,
}

#[derive(Debug, Deserialize)]
struct AiItem {
    #[serde(alias = "nome", alias = "food")]
    name: String,
    #[serde(default, alias = "quantidade", alias = "amount")]
    quantity: Option<AiQuantity>,
    #[serde(default, alias = "kcal", alias = "calorias", deserialize_with = "lenient_number")]
    calories: f64,
    #[serde(default, alias = "protein", alias = "proteina", deserialize_with = "lenient_number")]
    protein_g: f64,
    #[serde(default, alias = "carbs", alias = "carboidratos", deserialize_with = "lenient_number")]
    carbs_g: f64,
    #[serde(default, alias = "fat", alias = "gordura", deserialize_with = "lenient_number")]
    fat_g: f64,
    #[serde(default, alias = "categoria")]
    category: Option<String>,
}

/// Quantities arrive either as display strings or as bare gram counts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AiQuantity {
    Grams(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(LenientNumber::Number(value)) => value,
        Some(LenientNumber::Text(text)) => {
            let numeric: String = text
                .trim()
                .replace(',', ".")
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            numeric.parse().unwrap_or(0.0)
        }
        None => 0.0,
    })
}

// ============================================================================
// Decoding
// ============================================================================

/// Cut the JSON object out of a reply that may be wrapped in fences or prose
#[must_use]
pub fn extract_json_payload(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .map_or(trimmed, |rest| rest.trim_end().trim_end_matches("```"));

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (start < end).then(|| &unfenced[start..=end])
}

fn to_plan_item(item: AiItem) -> PlanItem {
    let (quantity, quantity_text) = match item.quantity {
        Some(AiQuantity::Text(text)) => (Quantity::parse(&text), text.trim().to_owned()),
        Some(AiQuantity::Grams(grams)) => {
            let quantity = Quantity::grams(grams);
            let text = quantity.to_string();
            (quantity, text)
        }
        None => {
            let quantity = Quantity::parse("");
            let text = quantity.to_string();
            (quantity, text)
        }
    };

    // An unrecognized, untagged item counts as a vegetable, which no rule restricts
    let category = item
        .category
        .as_deref()
        .and_then(FoodCategory::parse)
        .or_else(|| food_catalog::find_by_name(&item.name).map(|food| food.category))
        .or_else(|| FoodFamily::infer(&item.name).category())
        .unwrap_or(FoodCategory::Vegetable);

    PlanItem {
        name: item.name.trim().to_owned(),
        quantity,
        quantity_text,
        calories: item.calories.max(0.0),
        protein_g: item.protein_g.max(0.0),
        carbs_g: item.carbs_g.max(0.0),
        fat_g: item.fat_g.max(0.0),
        category,
    }
}

/// Decode an LLM reply into a plan
///
/// Meals are matched to slots by name, falling back to their position; a
/// second meal for an already-filled slot is dropped.
///
/// # Errors
///
/// Returns an error when no JSON object can be found, the JSON does not
/// match the expected shape, or no meal maps to a slot
pub fn parse_ai_plan(raw: &str) -> AppResult<DailyPlan> {
    let payload = extract_json_payload(raw)
        .ok_or_else(|| AppError::invalid_format("LLM reply contains no JSON object"))?;
    let response: AiDietResponse = serde_json::from_str(payload)?;

    let mut meals: Vec<PlanMeal> = Vec::with_capacity(response.meals.len());
    for (index, meal) in response.meals.into_iter().enumerate() {
        let Some(slot) = MealSlot::parse(&meal.name).or_else(|| MealSlot::ALL.get(index).copied())
        else {
            debug!(meal = %meal.name, "Dropping meal that maps to no slot");
            continue;
        };
        if meals.iter().any(|existing| existing.slot == slot) {
            debug!(meal = %meal.name, %slot, "Dropping duplicate meal for slot");
            continue;
        }
        meals.push(PlanMeal {
            slot,
            name: meal.name.trim().to_owned(),
            time: meal
                .time
                .filter(|time| !time.trim().is_empty())
                .unwrap_or_else(|| slot.default_time().to_owned()),
            items: meal.items.into_iter().map(to_plan_item).collect(),
        });
    }

    if meals.is_empty() {
        return Err(AppError::invalid_format("LLM reply has an empty meals array"));
    }
    meals.sort_by_key(|meal| meal.slot.order_index());
    Ok(DailyPlan { meals })
}

// ============================================================================
// Prompt
// ============================================================================

fn food_list(ids: &[String]) -> String {
    if ids.is_empty() {
        return "any".to_owned();
    }
    ids.iter()
        .map(|id| food_catalog::find(id).map_or(id.as_str(), |food| food.label))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_preferences(prefs: &FoodPreferences) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "- Proteins: {}", food_list(&prefs.proteins));
    let _ = writeln!(text, "- Carbohydrates: {}", food_list(&prefs.carbs));
    if prefs.exclude_vegetables {
        let _ = writeln!(text, "- Vegetables: none, the user excludes vegetables");
    } else {
        let _ = writeln!(text, "- Vegetables: {}", food_list(&prefs.vegetables));
    }
    if prefs.exclude_fruits {
        let _ = writeln!(text, "- Fruits: none, the user excludes fruit");
    } else {
        let _ = writeln!(text, "- Fruits: {}", food_list(&prefs.fruits));
    }
    text
}

/// Build the user prompt for one profile and its targets
#[must_use]
pub fn build_prompt(profile: &UserDietProfile, targets: &EnergyTargets) -> String {
    format!(
        "Create one day of meals for this person.\n\
         Profile: {sex}, {age} years, {weight} kg, {height} cm.\n\
         Daily target: {kcal} kcal; protein {protein} g, carbohydrates {carbs} g, fat {fat} g.\n\
         Food preferences:\n{prefs}\n{METHODOLOGY}\n\n{RESPONSE_FORMAT}",
        sex = profile.sex,
        age = profile.age,
        weight = profile.weight_kg,
        height = profile.height_cm,
        kcal = targets.target_calories,
        protein = targets.protein_g,
        carbs = targets.carbs_g,
        fat = targets.fat_g,
        prefs = describe_preferences(&profile.preferences),
    )
}

// ============================================================================
// Composer
// ============================================================================

/// Meal composer backed by an LLM provider
#[derive(Clone)]
pub struct AiDietComposer {
    provider: Arc<dyn LlmProvider>,
}

impl AiDietComposer {
    /// Create a composer over a provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Provider name for logs
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Ask the LLM for a plan; `None` means fall back to the rule-based composer
    #[instrument(skip_all, fields(user.id = %profile.user_id, llm.provider = self.provider.name()))]
    pub async fn compose(
        &self,
        profile: &UserDietProfile,
        targets: &EnergyTargets,
    ) -> Option<DailyPlan> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(profile, targets)),
        ])
        .with_temperature(TEMPERATURE)
        .with_max_tokens(MAX_TOKENS);

        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "AI composer unavailable, falling back to rule-based plan");
                return None;
            }
        };

        match parse_ai_plan(&response.content) {
            Ok(plan) => {
                info!(
                    model = %response.model,
                    meals = plan.meals.len(),
                    kcal = plan.total_calories(),
                    "AI composer returned a plan"
                );
                Some(plan)
            }
            Err(e) => {
                warn!(error = %e, "AI composer reply could not be decoded, falling back to rule-based plan");
                None
            }
        }
    }
}
