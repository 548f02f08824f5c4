//! Text-generation collaborator: the only I/O in a turn.
//!
//! This module provides:
//! - `TextGenerator`, the contract the advisor depends on
//! - `GeminiClient` / `GeminiConfig`, an HTTP implementation with model fallback
//! - prompt text and the coach context builder

mod client;
pub mod prompt;

pub use client::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One generation call: system instruction, user context and temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Generated text and the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub model: Option<String>,
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Model not recognized: {0}")]
    ModelNotFound(String),

    #[error("API error: status={status} body={body}")]
    Api { status: u16, body: String },

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("All {attempts} model(s) failed; last error: {last}")]
    AllModelsFailed { attempts: usize, last: String },
}

impl GenerationError {
    /// Whether trying the next model could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::ModelNotFound(_) | Self::EmptyResponse => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::MissingApiKey | Self::AllModelsFailed { .. } => false,
        }
    }
}

/// Contract for the external generation service.
///
/// Implementations own retries and timeouts; callers only see a result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError>;
}
