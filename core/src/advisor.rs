//! Turn orchestrator.
//!
//! Coordinates extraction → footprint → tips → scenarios → coach answer for
//! one farmer message and records the exchange.

use crate::config::AdvisorConfig;
use crate::extractor::extract_profile;
use crate::footprint::{calculate_water_footprint, WaterFootprint};
use crate::generation::prompt::{build_coach_context, build_coach_prompt, COACH_SYSTEM_PROMPT};
use crate::generation::{GenerationRequest, TextGenerator};
use crate::memory::{ProfileStore, SessionStore, SessionTurn};
use crate::observability::{truncate_chars, InteractionLog, LogEntry};
use crate::profile::FarmerProfile;
use crate::scenario::{generate_scenarios, Scenario};
use crate::tips::{build_query, retrieve_tips, TipSelection};
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Outcome of the coach call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisorAnswer {
    Generated { text: String, model: Option<String> },
    Failed { reason: String },
}

impl AdvisorAnswer {
    /// Text shown to the farmer and recorded in the session.
    pub fn text(&self) -> String {
        match self {
            Self::Generated { text, .. } => text.clone(),
            Self::Failed { reason } => format!("Error calling generation service: {reason}"),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Everything produced for one turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub profile: FarmerProfile,
    pub water_footprint: WaterFootprint,
    pub tips: TipSelection,
    pub scenarios: Vec<Scenario>,
    pub answer: AdvisorAnswer,
}

/// Advisory pipeline entry point.
///
/// Turns for one farmer are serialized; different farmers run independently.
pub struct Advisor {
    config: AdvisorConfig,
    profiles: Arc<ProfileStore>,
    sessions: Arc<SessionStore>,
    log: Arc<InteractionLog>,
    generator: Arc<dyn TextGenerator>,
    turn_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Advisor {
    /// Create an advisor with fresh stores sized from `config`.
    pub fn new(generator: Arc<dyn TextGenerator>, config: AdvisorConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_max_turns));
        Self::with_stores(
            generator,
            config,
            Arc::new(ProfileStore::new()),
            sessions,
            Arc::new(InteractionLog::new()),
        )
    }

    /// Create an advisor over existing stores.
    pub fn with_stores(
        generator: Arc<dyn TextGenerator>,
        config: AdvisorConfig,
        profiles: Arc<ProfileStore>,
        sessions: Arc<SessionStore>,
        log: Arc<InteractionLog>,
    ) -> Self {
        Self {
            config,
            profiles,
            sessions,
            log,
            generator,
            turn_locks: DashMap::new(),
        }
    }

    /// Run one full turn for `farmer_id`. Never fails: a generation error
    /// becomes `AdvisorAnswer::Failed` and the turn is still recorded.
    #[instrument(skip(self, farmer_id, message), fields(farmer = %farmer_id))]
    pub async fn run_turn(&self, farmer_id: &str, message: &str) -> TurnResult {
        let lock = self.turn_lock(farmer_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_stages(farmer_id, message).await
        };
        self.release_turn_lock(farmer_id);
        result
    }

    fn turn_lock(&self, farmer_id: &str) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(farmer_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the farmer's lock entry unless another task still holds a handle.
    /// The caller keeps its own handle alive until this returns.
    fn release_turn_lock(&self, farmer_id: &str) {
        self.turn_locks
            .remove_if(farmer_id, |_, lock| Arc::strong_count(lock) <= 2);
    }

    async fn run_stages(&self, farmer_id: &str, message: &str) -> TurnResult {
        info!("Turn started");
        self.sessions.add_user_message(farmer_id, message);

        // Stage 1: profile
        let prior = self.profiles.get(farmer_id);
        let profile = self
            .profiles
            .save(extract_profile(farmer_id, prior, message));

        // Stage 2: water footprint of the even split
        let water_footprint = self.baseline_footprint(&profile);
        debug!(total_m3 = water_footprint.total_water_m3, "Footprint computed");

        // Stage 3: tips
        let tips = retrieve_tips(&build_query(&profile, message), self.config.max_tips);

        // Stage 4: scenarios
        let scenarios =
            generate_scenarios(&profile, &water_footprint, self.config.default_land_size_ha);
        if !scenarios.is_empty() {
            self.profiles.save_scenarios(farmer_id, scenarios.clone());
        }

        // Stage 5: coach answer
        let context = build_coach_context(&profile, &water_footprint, &tips, &scenarios, message);
        let request = GenerationRequest {
            system: COACH_SYSTEM_PROMPT.to_string(),
            user: build_coach_prompt(&context),
            temperature: self.config.temperature,
        };
        let answer = match self.generator.generate(&request).await {
            Ok(generation) => AdvisorAnswer::Generated {
                text: generation.text,
                model: generation.model,
            },
            Err(err) => {
                warn!(error = %err, "Generation failed; answering with placeholder");
                AdvisorAnswer::Failed {
                    reason: err.to_string(),
                }
            }
        };

        let answer_text = answer.text();
        self.sessions.add_assistant_message(farmer_id, &answer_text);

        self.log
            .record(LogEntry {
                timestamp: Utc::now(),
                farmer_id: farmer_id.to_string(),
                user_message: truncate_chars(message, self.config.log_input_chars),
                total_water_m3: water_footprint.total_water_m3,
                num_scenarios: scenarios.len(),
                answer_preview: truncate_chars(&answer_text, self.config.log_answer_chars),
                generation_failed: answer.is_failed(),
            })
            .await;

        TurnResult {
            profile,
            water_footprint,
            tips,
            scenarios,
            answer,
        }
    }

    fn baseline_footprint(&self, profile: &FarmerProfile) -> WaterFootprint {
        if profile.main_crops.is_empty() {
            return WaterFootprint::empty();
        }
        let mix = profile.even_crop_mix(self.config.default_land_size_ha);
        calculate_water_footprint(&mix, profile.irrigation_type)
    }

    pub fn profile(&self, farmer_id: &str) -> Option<FarmerProfile> {
        self.profiles.get(farmer_id)
    }

    /// Scenario pair from the farmer's latest turn with crops.
    pub fn scenarios(&self, farmer_id: &str) -> Vec<Scenario> {
        self.profiles.scenarios(farmer_id)
    }

    pub fn session(&self, farmer_id: &str) -> Vec<SessionTurn> {
        self.sessions.history(farmer_id)
    }

    pub fn recent_turns(&self, farmer_id: &str, n: usize) -> Vec<SessionTurn> {
        self.sessions.recent(farmer_id, n)
    }

    pub async fn logs(&self, farmer_id: Option<&str>, limit: Option<usize>) -> Vec<LogEntry> {
        self.log.entries(farmer_id, limit).await
    }

    /// Drop a farmer's profile, scenarios and transcript. Waits for a turn
    /// already running for that farmer to finish.
    pub async fn reset_farmer(&self, farmer_id: &str) {
        let lock = self.turn_lock(farmer_id);
        {
            let _guard = lock.lock().await;
            self.profiles.remove(farmer_id);
            self.sessions.clear_session(farmer_id);
        }
        self.release_turn_lock(farmer_id);
    }

    /// Farmers with a turn running or waiting.
    pub fn busy_farmers(&self) -> usize {
        self.turn_locks.len()
    }

    /// Drop all state, including the interaction log.
    pub async fn reset_all(&self) {
        self.profiles.clear();
        self.sessions.clear_all();
        self.log.clear().await;
    }
}
