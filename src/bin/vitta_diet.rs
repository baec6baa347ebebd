// ABOUTME: Vitta diet CLI - operator tool for the diet engine's store and generation runs
// ABOUTME: Handles migrations, demo users, plan generation, plan display and resets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create the schema
//! vitta-diet migrate
//!
//! # Create a demo user with food preferences
//! vitta-diet seed-demo-user --email ana@example.com --proteins chicken,eggs --carbs rice_white,beans
//!
//! # Generate a new active plan (by email or user id)
//! vitta-diet generate ana@example.com
//!
//! # Print the active plan and its shopping lists
//! vitta-diet show ana@example.com
//!
//! # Deactivate every plan of a user
//! vitta-diet reset ana@example.com
//! ```

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vitta_diet::{
    config::DietEngineConfig,
    database::{
        repositories::{ProfileRepository, SnapshotRepository},
        Database, NewPreferences, NewUser,
    },
    errors::{AppError, AppResult},
    llm::{ChatProvider, LlmProvider},
    logging::LoggingConfig,
    models::{DietSnapshot, FoodPreferences, ShoppingList},
    services::{DietGenerationService, GenerationPath, ShoppingListService},
};

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "vitta-diet",
    about = "Vitta diet engine CLI",
    long_about = "Command-line tool for generating and inspecting Vitta diet plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Skip the AI composer for this run
    #[arg(long, global = true)]
    no_ai: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create or upgrade the schema
    Migrate,

    /// Create a demo user and store a food-preference submission
    SeedDemoUser {
        /// Email address (reused if the user already exists)
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long, default_value = "Demo User")]
        name: String,

        /// Body weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// Biological sex (female, male)
        #[arg(long)]
        sex: Option<String>,

        /// Workout frequency bucket (e.g. "1-2", "3-4", "5+")
        #[arg(long)]
        frequency: Option<String>,

        /// Workout duration in minutes
        #[arg(long)]
        duration: Option<String>,

        /// Protein ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        proteins: Vec<String>,

        /// Carbohydrate ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        carbs: Vec<String>,

        /// Vegetable ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        vegetables: Vec<String>,

        /// Fruit ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fruits: Vec<String>,

        /// Exclude fruit entirely
        #[arg(long)]
        no_fruits: bool,

        /// Exclude vegetables entirely
        #[arg(long)]
        no_vegetables: bool,

        /// Water bottle size in ml
        #[arg(long)]
        bottle_ml: Option<u32>,
    },

    /// Generate a new active diet
    Generate {
        /// User id or email
        user: String,
    },

    /// Print the active diet and its shopping lists
    Show {
        /// User id or email
        user: String,
    },

    /// Deactivate every diet of a user
    Reset {
        /// User id or email
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = DietEngineConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database = vitta_diet::config::DatabaseUrl::parse_url(url);
    }

    let database_url = config.database.to_connection_string();
    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url).await?;

    match cli.command {
        Command::Migrate => {
            database.migrate().await?;
            println!("Schema is up to date at {database_url}");
        }
        Command::SeedDemoUser {
            email,
            name,
            weight,
            height,
            age,
            sex,
            frequency,
            duration,
            proteins,
            carbs,
            vegetables,
            fruits,
            no_fruits,
            no_vegetables,
            bottle_ml,
        } => {
            let profiles = database.profiles();
            let user = match profiles.get_user_by_email(&email).await? {
                Some(user) => user,
                None => {
                    profiles
                        .create_user(&NewUser {
                            name,
                            email,
                            weight_kg: weight,
                            height_cm: height,
                            age,
                            sex: sex.clone(),
                            workout_frequency: frequency.clone(),
                            workout_duration: duration.clone(),
                            ..NewUser::default()
                        })
                        .await?
                }
            };

            let prefs = NewPreferences {
                foods: FoodPreferences {
                    proteins,
                    carbs,
                    vegetables,
                    fruits,
                    exclude_vegetables: no_vegetables,
                    exclude_fruits: no_fruits,
                },
                workout_frequency: frequency,
                workout_duration: duration,
                bottle_size_ml: bottle_ml,
                weight_kg: weight,
                height_cm: height,
                age,
                sex,
            };
            profiles.save_preferences(user.id, &prefs).await?;
            println!("User {} <{}> ready: {}", user.name, user.email, user.id);
        }
        Command::Generate { user } => {
            let user_id = resolve_user(&database, &user).await?;
            let provider = if cli.no_ai { None } else { init_llm_provider(&config) };
            let service = DietGenerationService::from_database(&database, &config, provider);

            let outcome = service.generate_with_report(user_id).await?;
            let path = match outcome.path {
                GenerationPath::AiGenerated => "AI composer".to_owned(),
                GenerationPath::RuleBased {
                    attempts,
                    validated,
                } => format!(
                    "rule-based composer, attempt {attempts}{}",
                    if validated { "" } else { " (best effort)" }
                ),
            };
            println!("Generated with {path}");
            print_snapshot(&outcome.snapshot);
            print_shopping_lists(&outcome.shopping_lists);
        }
        Command::Show { user } => {
            let user_id = resolve_user(&database, &user).await?;
            let Some(snapshot) = database.snapshots().get_active_snapshot(user_id).await? else {
                println!("No active diet for {user_id}");
                return Ok(());
            };
            let lists = ShoppingListService::new(Arc::new(database.shopping_lists()))
                .lists_for_snapshot(&snapshot)
                .await?;
            print_snapshot(&snapshot);
            print_shopping_lists(&lists);
        }
        Command::Reset { user } => {
            let user_id = resolve_user(&database, &user).await?;
            let count = database.snapshots().deactivate_active(user_id).await?;
            println!("Deactivated {count} diet(s) for {user_id}");
        }
    }

    Ok(())
}

/// Accept either a user id or an email address
async fn resolve_user(database: &Database, user: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(user) {
        return database
            .profiles()
            .get_user(id)
            .await?
            .map(|record| record.id)
            .ok_or_else(|| AppError::not_found(format!("User {id}")));
    }
    database
        .profiles()
        .get_user_by_email(user)
        .await?
        .map(|record| record.id)
        .ok_or_else(|| AppError::not_found(format!("User with email {user}")))
}

/// Provider setup failures fall back to the rule-based composer
fn init_llm_provider(config: &DietEngineConfig) -> Option<Arc<dyn LlmProvider>> {
    match ChatProvider::from_config(config.llm_provider, config.llm_model.clone()) {
        Ok(Some(provider)) => {
            info!("AI composer enabled with {}", provider.name());
            Some(Arc::new(provider))
        }
        Ok(None) => None,
        Err(e) => {
            warn!("LLM provider unavailable, using rule-based composer only: {e}");
            None
        }
    }
}

fn print_snapshot(snapshot: &DietSnapshot) {
    let macros = &snapshot.macros;
    println!(
        "Diet {} ({}) - {} kcal/day | P {}g C {}g F {}g | water {} ml ({} x {} ml)",
        snapshot.id,
        snapshot.origin,
        snapshot.daily_calories,
        macros.protein_g,
        macros.carbs_g,
        macros.fat_g,
        macros.water_ml,
        macros.bottles,
        macros.bottle_ml,
    );
    for meal in &snapshot.meals {
        println!("\n{} ({})", meal.name, meal.time);
        for row in &meal.items {
            let item = &row.item;
            println!(
                "  - {:<24} {:>14}  {:>4.0} kcal",
                item.name, item.quantity_text, item.calories
            );
        }
    }
}

fn print_shopping_lists(lists: &[ShoppingList]) {
    for list in lists {
        println!(
            "\nShopping list ({}, {} to {})",
            list.period, list.start_date, list.end_date
        );
        for line in &list.items {
            println!("  - {:<24} {} {}", line.name, line.quantity, line.unit);
        }
    }
}
