// ABOUTME: Diet generation orchestrator - AI attempt, bounded rule-based retries, persistence and lists
// ABOUTME: Keeps at most one active snapshot per user and fails only when nothing could be persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Diet Generation
//!
//! One call to [`DietGenerationService::generate_diet_for_user`] runs this
//! sequence:
//!
//! 1. Load the user and their active preferences, derive the profile
//! 2. Compute energy targets
//! 3. Deactivate the user's active snapshots
//! 4. Try the AI composer, when one is configured
//! 5. Fall back to the rule-based composer for a bounded number of attempts
//! 6. Record the generation and write fresh shopping lists
//!
//! Validation failures never fail the call: the last rule-based candidate is
//! accepted as best effort. The only fatal outcomes are an unknown user and
//! a store that refuses every snapshot.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::ai_composer::AiDietComposer;
use super::shopping_list::ShoppingListService;
use crate::config::DietEngineConfig;
use crate::constants::generation::DEFAULT_MAX_ATTEMPTS;
use crate::database::repositories::{ProfileRepository, RegenerationLog, SnapshotRepository};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::energy::compute_energy_targets;
use crate::intelligence::meal_composer::compose_daily_plan;
use crate::intelligence::validator::validate_diet;
use crate::llm::LlmProvider;
use crate::logging::AppLogger;
use crate::models::{
    DailyPlan, DietSnapshot, EnergyTargets, FoodPreferences, MacroPayload, NewSnapshot,
    PlanOrigin, ShoppingList, UserDietProfile,
};

/// Knobs for one generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Rule-based attempts before the last candidate is accepted as is
    pub max_attempts: u32,
    /// Run the validator on AI plans and discard invalid ones
    pub validate_ai_plans: bool,
    /// Fixed composer seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            validate_ai_plans: true,
            seed: None,
        }
    }
}

impl From<&DietEngineConfig> for GenerationPolicy {
    fn from(config: &DietEngineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            validate_ai_plans: config.validate_ai_plans,
            seed: config.seed,
        }
    }
}

/// How the accepted snapshot was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPath {
    /// The AI composer's plan was kept
    AiGenerated,
    /// The rule-based composer produced the plan
    RuleBased {
        /// Attempt number of the accepted candidate (1-based)
        attempts: u32,
        /// Whether the accepted candidate passed validation
        validated: bool,
    },
}

impl GenerationPath {
    /// Attempt count reported in logs; the AI path counts as zero
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::AiGenerated => 0,
            Self::RuleBased { attempts, .. } => *attempts,
        }
    }
}

/// Everything one generation produced
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// The new active snapshot
    pub snapshot: DietSnapshot,
    /// How it was produced
    pub path: GenerationPath,
    /// Targets the plan was composed for
    pub targets: EnergyTargets,
    /// Lists written for the snapshot; empty if writing them failed
    pub shopping_lists: Vec<ShoppingList>,
}

/// Rule-based loop states
enum RuleStep {
    Compose { attempt: u32 },
    Check { attempt: u32, snapshot: DietSnapshot },
    Accepted { snapshot: DietSnapshot, path: GenerationPath },
}

/// Diet generation orchestrator
pub struct DietGenerationService {
    profiles: Arc<dyn ProfileRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    regenerations: Arc<dyn RegenerationLog>,
    shopping: ShoppingListService,
    ai: Option<AiDietComposer>,
    policy: GenerationPolicy,
}

impl DietGenerationService {
    /// Create a rule-based-only service over the given stores
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        regenerations: Arc<dyn RegenerationLog>,
        shopping: ShoppingListService,
        policy: GenerationPolicy,
    ) -> Self {
        Self {
            profiles,
            snapshots,
            regenerations,
            shopping,
            ai: None,
            policy,
        }
    }

    /// Try an AI composer before the rule-based loop
    #[must_use]
    pub fn with_ai_composer(mut self, composer: AiDietComposer) -> Self {
        self.ai = Some(composer);
        self
    }

    /// Wire the service over the `SQLite` managers of a database
    #[must_use]
    pub fn from_database(
        database: &Database,
        config: &DietEngineConfig,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let service = Self::new(
            Arc::new(database.profiles()),
            Arc::new(database.snapshots()),
            Arc::new(database.regenerations()),
            ShoppingListService::new(Arc::new(database.shopping_lists())),
            GenerationPolicy::from(config),
        );
        match provider {
            Some(provider) => service.with_ai_composer(AiDietComposer::new(provider)),
            None => service,
        }
    }

    /// Policy in force
    #[must_use]
    pub const fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Generate and persist a new active diet for a user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user does not exist, or
    /// `DietGenerationFailed` if no snapshot could be persisted
    pub async fn generate_diet_for_user(&self, user_id: Uuid) -> AppResult<DietSnapshot> {
        self.generate_with_report(user_id)
            .await
            .map(|outcome| outcome.snapshot)
    }

    /// Generate a diet and report how it was produced
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_diet_for_user`]
    #[instrument(skip(self), fields(user.id = %user_id))]
    pub async fn generate_with_report(&self, user_id: Uuid) -> AppResult<GenerationOutcome> {
        let user = self
            .profiles
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")).with_user_id(user_id))?;
        let preferences = self.profiles.get_active_preferences(user_id).await?;
        let profile = UserDietProfile::from_records(&user, preferences.as_ref());
        let targets = compute_energy_targets(&profile);

        debug!(
            diet.target_calories = targets.target_calories,
            diet.tdee = targets.tdee,
            "Energy targets computed"
        );

        let deactivated = self.snapshots.deactivate_active(user_id).await.map_err(|e| {
            AppError::generation_failed("Could not retire the previous diet")
                .with_user_id(user_id)
                .with_source(e)
        })?;
        debug!(deactivated, "Previous snapshots deactivated");

        let mut last_error = None;
        let accepted = match self.try_ai_path(&profile, &targets, &mut last_error).await {
            Some(snapshot) => Some((snapshot, GenerationPath::AiGenerated)),
            None => self.run_rule_loop(&profile, &targets, &mut last_error).await,
        };

        let Some((snapshot, path)) = accepted else {
            let error = AppError::generation_failed(format!(
                "No diet snapshot could be persisted after {} attempt(s)",
                self.policy.max_attempts
            ))
            .with_user_id(user_id);
            return Err(match last_error {
                Some(source) => error.with_source(source),
                None => error,
            });
        };

        let shopping_lists = self.finish(&snapshot).await;
        AppLogger::log_generation(user_id, snapshot.origin.as_str(), path.attempts(), snapshot.id);

        Ok(GenerationOutcome {
            snapshot,
            path,
            targets,
            shopping_lists,
        })
    }

    /// AI attempt; `None` sends the caller to the rule-based loop
    async fn try_ai_path(
        &self,
        profile: &UserDietProfile,
        targets: &EnergyTargets,
        last_error: &mut Option<AppError>,
    ) -> Option<DietSnapshot> {
        let composer = self.ai.as_ref()?;
        let plan = composer.compose(profile, targets).await?;

        let new_snapshot = new_snapshot(profile, targets, PlanOrigin::AiGenerated);
        let snapshot = match self.persist_plan(&new_snapshot, &plan).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to persist AI diet, using rule-based composer");
                *last_error = Some(e);
                return None;
            }
        };

        if self.policy.validate_ai_plans {
            let report = validate_diet(&snapshot.to_plan(), &profile.preferences);
            if !report.is_valid() {
                warn!(
                    diet.snapshot_id = %snapshot.id,
                    diet.violations = %report.summary(),
                    "AI diet failed validation, using rule-based composer"
                );
                self.discard(snapshot.id).await;
                return None;
            }
        }

        info!(
            diet.snapshot_id = %snapshot.id,
            provider = composer.provider_name(),
            "AI diet accepted"
        );
        Some(snapshot)
    }

    /// Bounded compose, persist, validate loop
    async fn run_rule_loop(
        &self,
        profile: &UserDietProfile,
        targets: &EnergyTargets,
        last_error: &mut Option<AppError>,
    ) -> Option<(DietSnapshot, GenerationPath)> {
        let max_attempts = self.policy.max_attempts.max(1);
        let new_snapshot = new_snapshot(profile, targets, PlanOrigin::Algorithmic);
        let mut rng = self
            .policy
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let mut step = RuleStep::Compose { attempt: 1 };
        loop {
            step = match step {
                RuleStep::Compose { attempt } if attempt > max_attempts => return None,
                RuleStep::Compose { attempt } => {
                    let plan = compose_daily_plan(profile, targets, &mut rng);
                    match self.persist_plan(&new_snapshot, &plan).await {
                        Ok(snapshot) => RuleStep::Check { attempt, snapshot },
                        Err(e) => {
                            warn!(
                                diet.attempt = attempt,
                                error = %e,
                                "Failed to persist diet candidate"
                            );
                            *last_error = Some(e);
                            RuleStep::Compose {
                                attempt: attempt + 1,
                            }
                        }
                    }
                }
                RuleStep::Check { attempt, snapshot } => {
                    self.check_candidate(attempt, max_attempts, snapshot, &profile.preferences)
                        .await
                }
                RuleStep::Accepted { snapshot, path } => return Some((snapshot, path)),
            };
        }
    }

    async fn check_candidate(
        &self,
        attempt: u32,
        max_attempts: u32,
        snapshot: DietSnapshot,
        preferences: &FoodPreferences,
    ) -> RuleStep {
        let report = validate_diet(&snapshot.to_plan(), preferences);
        if report.is_valid() {
            debug!(diet.attempt = attempt, diet.snapshot_id = %snapshot.id, "Diet candidate valid");
            return RuleStep::Accepted {
                snapshot,
                path: GenerationPath::RuleBased {
                    attempts: attempt,
                    validated: true,
                },
            };
        }

        if attempt >= max_attempts {
            warn!(
                diet.attempt = attempt,
                diet.snapshot_id = %snapshot.id,
                diet.violations = %report.summary(),
                "Accepting diet that failed validation on the final attempt"
            );
            return RuleStep::Accepted {
                snapshot,
                path: GenerationPath::RuleBased {
                    attempts: attempt,
                    validated: false,
                },
            };
        }

        debug!(
            diet.attempt = attempt,
            diet.violations = %report.summary(),
            "Diet candidate rejected, retrying"
        );
        self.discard(snapshot.id).await;
        RuleStep::Compose {
            attempt: attempt + 1,
        }
    }

    /// Write snapshot, meals and items, then read the snapshot back joined
    async fn persist_plan(&self, new: &NewSnapshot, plan: &DailyPlan) -> AppResult<DietSnapshot> {
        let snapshot_id = self.snapshots.create_snapshot(new).await?;

        match self.write_meals(snapshot_id, plan).await {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) => {
                self.discard(snapshot_id).await;
                Err(AppError::not_found(format!("Snapshot {snapshot_id}")))
            }
            Err(e) => {
                self.discard(snapshot_id).await;
                Err(e)
            }
        }
    }

    async fn write_meals(
        &self,
        snapshot_id: Uuid,
        plan: &DailyPlan,
    ) -> AppResult<Option<DietSnapshot>> {
        let meal_ids = self.snapshots.create_meals(snapshot_id, &plan.meals).await?;
        for (meal_id, meal) in meal_ids.into_iter().zip(&plan.meals) {
            self.snapshots.create_items(meal_id, &meal.items).await?;
        }
        self.snapshots.fetch_snapshot(snapshot_id).await
    }

    /// Best-effort removal of a rejected or half-written candidate
    async fn discard(&self, snapshot_id: Uuid) {
        if let Err(e) = self.snapshots.delete_snapshot(snapshot_id).await {
            warn!(diet.snapshot_id = %snapshot_id, error = %e, "Failed to delete diet candidate");
        }
    }

    /// Audit record and shopping lists; failures here leave the snapshot in place
    async fn finish(&self, snapshot: &DietSnapshot) -> Vec<ShoppingList> {
        if let Err(e) = self
            .regenerations
            .record(snapshot.user_id, snapshot.id, snapshot.origin)
            .await
        {
            warn!(diet.snapshot_id = %snapshot.id, error = %e, "Failed to record regeneration");
        }

        match self
            .shopping
            .regenerate_for_snapshot(snapshot, Utc::now().date_naive())
            .await
        {
            Ok(lists) => lists,
            Err(e) => {
                warn!(diet.snapshot_id = %snapshot.id, error = %e, "Failed to write shopping lists");
                Vec::new()
            }
        }
    }
}

fn new_snapshot(
    profile: &UserDietProfile,
    targets: &EnergyTargets,
    origin: PlanOrigin,
) -> NewSnapshot {
    NewSnapshot {
        user_id: profile.user_id,
        daily_calories: targets.target_calories,
        macros: MacroPayload::from(targets),
        origin,
    }
}
