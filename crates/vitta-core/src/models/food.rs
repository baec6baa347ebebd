// ABOUTME: Food reference models - categories, families, serving units, and structured quantities
// ABOUTME: FoodFamily inference lets the validator reason about free-form item names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::constants::portions::{FREE_PORTION_LABEL, YOGURT_POT_G};

/// Nutritional category of a food
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    /// Protein source (meats, eggs, dairy)
    Protein,
    /// Carbohydrate source (rice, beans, bread, tubers)
    Carb,
    /// Vegetable
    Vegetable,
    /// Fruit
    Fruit,
    /// Fat source (oils, nuts)
    Fat,
}

impl FoodCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Carb => "carb",
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::Fat => "fat",
        }
    }

    /// Parse a category tag, accepting English and Portuguese spellings
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match fold_text(s).trim() {
            "protein" | "proteina" | "proteins" | "proteinas" => Some(Self::Protein),
            "carb" | "carbs" | "carbohydrate" | "carboidrato" | "carboidratos" => Some(Self::Carb),
            "vegetable" | "vegetables" | "vegetal" | "legume" | "legumes" | "verdura"
            | "verduras" | "salada" => Some(Self::Vegetable),
            "fruit" | "fruits" | "fruta" | "frutas" => Some(Self::Fruit),
            "fat" | "fats" | "gordura" | "gorduras" => Some(Self::Fat),
            _ => None,
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained food family used by composition and validation rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodFamily {
    /// White or brown rice
    Rice,
    /// Beans and other pulses
    Beans,
    /// Bread and toast
    Bread,
    /// Tapioca
    Tapioca,
    /// Couscous (cuscuz)
    Couscous,
    /// Sweet potato
    SweetPotato,
    /// Other starches (pasta, potato, cassava)
    OtherCarb,
    /// Chicken and turkey
    Poultry,
    /// Beef
    RedMeat,
    /// Fish and seafood
    Fish,
    /// Pork
    Pork,
    /// Eggs
    Egg,
    /// Yogurt, cheese and other dairy
    Dairy,
    /// Leafy greens served freely
    LeafyGreen,
    /// Tomato
    Tomato,
    /// Other vegetables
    Vegetable,
    /// Fruit
    Fruit,
    /// Oils, nuts and other fats
    Fat,
    /// Unrecognized
    Unknown,
}

/// Keyword table checked in order; multi-word keywords are matched as phrases
const FAMILY_KEYWORDS: &[(FoodFamily, &[&str])] = &[
    (FoodFamily::SweetPotato, &["batata doce", "sweet potato"]),
    (
        FoodFamily::Vegetable,
        &["couve flor", "cauliflower", "pimentao", "bell pepper"],
    ),
    (FoodFamily::Bread, &["pao", "paes", "torrada", "bread", "toast", "bisnaguinha"]),
    (FoodFamily::Tapioca, &["tapioca"]),
    (FoodFamily::Couscous, &["cuscuz", "couscous"]),
    (FoodFamily::Rice, &["arroz", "rice"]),
    (FoodFamily::Beans, &["feijao", "feijoes", "bean", "lentilha", "lentil", "grao de bico", "chickpea"]),
    (FoodFamily::Pork, &["porco", "suino", "lombo", "pork", "pernil"]),
    (
        FoodFamily::Poultry,
        &["frango", "chicken", "peito de peru", "peru", "turkey", "sobrecoxa"],
    ),
    (
        FoodFamily::Fish,
        &["peixe", "tilapia", "salmao", "atum", "sardinha", "merluza", "pescada", "fish", "salmon", "tuna", "camarao", "shrimp"],
    ),
    (
        FoodFamily::RedMeat,
        &["carne", "patinho", "alcatra", "fraldinha", "musculo", "contrafile", "maminha", "bife", "beef", "steak"],
    ),
    (FoodFamily::Egg, &["ovo", "egg", "omelete", "omelette", "clara"]),
    (
        FoodFamily::Dairy,
        &["iogurte", "yogurt", "yoghurt", "queijo", "cheese", "cottage", "ricota", "leite", "milk", "whey"],
    ),
    (
        FoodFamily::LeafyGreen,
        &["alface", "lettuce", "espinafre", "spinach", "rucula", "arugula", "couve", "kale", "agriao"],
    ),
    (FoodFamily::Tomato, &["tomate", "tomato", "tomatoes"]),
    (
        FoodFamily::Fat,
        &["azeite", "oleo", "olive oil", "castanha", "amendoim", "peanut", "nozes", "nuts", "amendoa", "almond", "manteiga", "butter"],
    ),
    (
        FoodFamily::Fruit,
        &["banana", "maca", "mamao", "morango", "melancia", "melao", "laranja", "abacaxi", "manga", "pera", "uva", "kiwi", "goiaba", "tangerina", "mexerica", "apple", "papaya", "strawberry", "strawberries", "orange", "pineapple", "mango", "pear", "grape", "fruta", "fruit"],
    ),
    (
        FoodFamily::Vegetable,
        &["brocolis", "broccoli", "cenoura", "carrot", "abobrinha", "zucchini", "chuchu", "vagem", "beterraba", "beet", "pepino", "cucumber", "abobora", "pumpkin", "legume", "legumes", "salada", "salad", "vegetable", "vegetables"],
    ),
    (
        FoodFamily::OtherCarb,
        &["batata", "potato", "mandioca", "aipim", "macaxeira", "cassava", "macarrao", "pasta", "massa", "aveia", "oat", "oats", "granola", "inhame"],
    ),
];

impl FoodFamily {
    /// Infer the family of a free-form food name
    ///
    /// Names are accent-folded and matched word by word, so "Arroz branco",
    /// "arroz integral" and "Rice" all resolve to [`FoodFamily::Rice`] while
    /// "macarrão" does not match the fruit keyword "maçã".
    #[must_use]
    pub fn infer(name: &str) -> Self {
        let folded = fold_text(name).replace(['-', '_', '/', ',', '(', ')'], " ");
        let tokens: Vec<&str> = folded.split_whitespace().collect();
        let phrase = format!(" {} ", tokens.join(" "));

        for (family, keywords) in FAMILY_KEYWORDS {
            let hit = keywords.iter().any(|keyword| {
                if keyword.contains(' ') {
                    phrase.contains(&format!(" {keyword} "))
                } else {
                    tokens.iter().any(|token| token_matches(token, keyword))
                }
            });
            if hit {
                return *family;
            }
        }
        Self::Unknown
    }

    /// Nutritional category this family belongs to
    #[must_use]
    pub const fn category(&self) -> Option<FoodCategory> {
        match self {
            Self::Rice
            | Self::Beans
            | Self::Bread
            | Self::Tapioca
            | Self::Couscous
            | Self::SweetPotato
            | Self::OtherCarb => Some(FoodCategory::Carb),
            Self::Poultry
            | Self::RedMeat
            | Self::Fish
            | Self::Pork
            | Self::Egg
            | Self::Dairy => Some(FoodCategory::Protein),
            Self::LeafyGreen | Self::Tomato | Self::Vegetable => Some(FoodCategory::Vegetable),
            Self::Fruit => Some(FoodCategory::Fruit),
            Self::Fat => Some(FoodCategory::Fat),
            Self::Unknown => None,
        }
    }

    /// Meat, poultry or fish, the proteins that satisfy a main meal
    #[must_use]
    pub const fn is_meat(&self) -> bool {
        matches!(self, Self::Poultry | Self::RedMeat | Self::Fish | Self::Pork)
    }

    /// Beef, fish or pork, never served at breakfast
    #[must_use]
    pub const fn is_heavy_meat(&self) -> bool {
        matches!(self, Self::RedMeat | Self::Fish | Self::Pork)
    }

    /// Light starches reserved for breakfast and the afternoon snack
    #[must_use]
    pub const fn is_bread_family(&self) -> bool {
        matches!(self, Self::Bread | Self::Tapioca | Self::Couscous)
    }

    /// Starches allowed at breakfast and the afternoon snack
    #[must_use]
    pub const fn is_light_starch(&self) -> bool {
        self.is_bread_family() || matches!(self, Self::SweetPotato)
    }
}

fn token_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || token
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

/// Lowercase and strip Portuguese diacritics so keyword tables stay ASCII
#[must_use]
pub fn fold_text(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Unit a catalog food is naturally served in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServingUnit {
    /// Weighed in grams; nutrition is per 100 g
    Grams,
    /// Whole items (eggs, fruit, bread rolls); nutrition is per item
    Unit,
    /// Slices; nutrition is per slice
    Slice,
    /// Spoons; nutrition is per spoon
    Spoon,
}

/// Nutrition facts for one reference quantity of a food
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionFacts {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

impl NutritionFacts {
    /// Build nutrition facts
    #[must_use]
    pub const fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }
}

/// Static catalog entry describing one food
///
/// Nutrition is per 100 g when `serving` is [`ServingUnit::Grams`] and per
/// whole item, slice or spoon otherwise.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FoodItem {
    /// Stable identifier used in preference submissions
    pub id: &'static str,
    /// Display label written into plans
    pub label: &'static str,
    /// Nutritional category
    pub category: FoodCategory,
    /// Family used by composition rules
    pub family: FoodFamily,
    /// Nutrition per reference quantity
    pub nutrition: NutritionFacts,
    /// Serving unit
    pub serving: ServingUnit,
    /// Typical portion in serving units
    pub default_portion: f64,
}

impl FoodItem {
    /// Quantity the nutrition facts refer to (100 for grams, 1 otherwise)
    #[must_use]
    pub const fn reference_quantity(&self) -> f64 {
        match self.serving {
            ServingUnit::Grams => 100.0,
            ServingUnit::Unit | ServingUnit::Slice | ServingUnit::Spoon => 1.0,
        }
    }

    /// Energy per single serving unit (kcal per gram or per item)
    #[must_use]
    pub fn calories_per_unit(&self) -> f64 {
        self.nutrition.calories / self.reference_quantity()
    }

    /// Pure fats may be served below the usual gram floor
    #[must_use]
    pub const fn is_pure_fat(&self) -> bool {
        matches!(self.category, FoodCategory::Fat)
    }
}

/// Unit of a structured quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    /// Grams
    Grams,
    /// Whole units
    Units,
    /// Slices
    Slices,
    /// Spoons
    Spoons,
    /// A fixed yogurt pot
    Pot,
    /// Served freely (leafy greens)
    Free,
    /// Any other unit text found in external payloads
    Other(String),
}

impl QuantityUnit {
    /// Unit label as it appears after the number in display strings
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Grams => "g",
            Self::Units => "unidade(s)",
            Self::Slices => "fatia(s)",
            Self::Spoons => "colher(es)",
            Self::Pot => "pote",
            Self::Free => "unidade",
            Self::Other(label) => label,
        }
    }

    /// Stable code persisted alongside the numeric value
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Grams => "g",
            Self::Units => "unit",
            Self::Slices => "slice",
            Self::Spoons => "spoon",
            Self::Pot => "pot",
            Self::Free => "free",
            Self::Other(label) => label,
        }
    }

    /// Inverse of [`QuantityUnit::code`]
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "g" => Self::Grams,
            "unit" => Self::Units,
            "slice" => Self::Slices,
            "spoon" => Self::Spoons,
            "pot" => Self::Pot,
            "free" => Self::Free,
            other => Self::Other(other.to_owned()),
        }
    }

    fn from_suffix(suffix: &str) -> Self {
        let folded = fold_text(suffix.trim());
        if matches!(folded.as_str(), "g" | "gr" | "grs" | "grama" | "gramas" | "gram" | "grams") {
            Self::Grams
        } else if folded.starts_with("unidade") || folded.starts_with("unit") || folded == "un" {
            Self::Units
        } else if folded.starts_with("fatia") || folded.starts_with("slice") {
            Self::Slices
        } else if folded.starts_with("colher") || folded.starts_with("spoon") {
            Self::Spoons
        } else if folded.starts_with("pote") {
            Self::Pot
        } else {
            Self::Other(suffix.trim().to_owned())
        }
    }
}

static QUANTITY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([\d.]+)\s*(.+)$").ok());

/// A numeric amount with its unit, carried alongside any display string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    /// Numeric amount in `unit`
    pub value: f64,
    /// Unit of the amount
    pub unit: QuantityUnit,
}

impl Quantity {
    /// Amount in grams
    #[must_use]
    pub const fn grams(value: f64) -> Self {
        Self {
            value,
            unit: QuantityUnit::Grams,
        }
    }

    /// Amount in whole units
    #[must_use]
    pub const fn units(value: f64) -> Self {
        Self {
            value,
            unit: QuantityUnit::Units,
        }
    }

    /// Amount in slices
    #[must_use]
    pub const fn slices(value: f64) -> Self {
        Self {
            value,
            unit: QuantityUnit::Slices,
        }
    }

    /// Amount in spoons
    #[must_use]
    pub const fn spoons(value: f64) -> Self {
        Self {
            value,
            unit: QuantityUnit::Spoons,
        }
    }

    /// One fixed yogurt pot
    #[must_use]
    pub const fn pot() -> Self {
        Self {
            value: 1.0,
            unit: QuantityUnit::Pot,
        }
    }

    /// A free portion
    #[must_use]
    pub const fn free() -> Self {
        Self {
            value: 1.0,
            unit: QuantityUnit::Free,
        }
    }

    /// Parse a display string such as `"150g"` or `"2 unidade(s)"`
    ///
    /// Strings that do not start with a number become one `"unidade"`,
    /// except the free-portion label which maps to [`QuantityUnit::Free`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let folded = fold_text(trimmed);
        if folded == fold_text(FREE_PORTION_LABEL) || folded == "livre" {
            return Self::free();
        }

        let parsed = QUANTITY_PATTERN.as_ref().and_then(|pattern| {
            let captures = pattern.captures(trimmed)?;
            let value = captures.get(1)?.as_str().parse::<f64>().ok()?;
            let suffix = captures.get(2)?.as_str();
            Some(Self {
                value,
                unit: QuantityUnit::from_suffix(suffix),
            })
        });

        parsed.unwrap_or_else(|| Self {
            value: 1.0,
            unit: QuantityUnit::Other("unidade".to_owned()),
        })
    }

    /// Weight in grams when known (grams or the fixed pot), zero otherwise
    #[must_use]
    pub fn weight_g(&self) -> f64 {
        match self.unit {
            QuantityUnit::Grams => self.value,
            QuantityUnit::Pot => self.value * YOGURT_POT_G,
            _ => 0.0,
        }
    }

    /// Value and unit label used when summing quantities into a shopping list
    #[must_use]
    pub fn shopping_measure(&self) -> (f64, String) {
        (self.value, self.unit.label().to_owned())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = format_amount(self.value);
        match &self.unit {
            QuantityUnit::Free => f.write_str(FREE_PORTION_LABEL),
            QuantityUnit::Grams => write!(f, "{value}g"),
            unit => write!(f, "{value} {}", unit.label()),
        }
    }
}

/// Render an amount without a trailing `.0`
#[must_use]
pub fn format_amount(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.1}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}
