// AabSmart Core Library
// Water-aware agronomic advisory pipeline for small farmers

pub mod advisor;
pub mod config;
pub mod evaluation;
pub mod extractor;
pub mod footprint;
pub mod generation;
pub mod memory;
pub mod observability;
pub mod profile;
pub mod reference;
pub mod scenario;
pub mod tips;

// Export core types
pub use advisor::{Advisor, AdvisorAnswer, TurnResult};
pub use config::AdvisorConfig;
pub use extractor::extract_profile;
pub use footprint::{calculate_water_footprint, CropMix, WaterFootprint};
pub use generation::{GeminiClient, GeminiConfig, Generation, GenerationError, GenerationRequest, TextGenerator};
pub use memory::{ProfileStore, SessionRole, SessionStore, SessionTurn};
pub use observability::{InteractionLog, LogEntry};
pub use profile::{FarmerProfile, IrrigationType, WaterLevel};
pub use scenario::{generate_scenarios, Scenario, ScenarioKind};
pub use tips::{retrieve_tips, TipSelection};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AabError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
pub type Result<T> = std::result::Result<T, AabError>;
