//! Contract with the remote text-generation collaborator.
//!
//! The core builds a [`GenerationRequest`] once training has completed and
//! hands it to a [`GenerationService`]. Whatever comes back, success or
//! failure, is folded into a [`GenerationResult`]; failures never escape as
//! errors past this boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::architecture::Architecture;
use crate::gate::quality_score;

pub mod api;

pub use api::HttpGenerationService;

/// Placed in `generated_text` when the collaborator could not produce a reply.
pub const GENERATION_FAILED_MARKER: &str = "[generation failed]";

/// What the core sends to the collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Non-empty user text.
    pub input_text: String,
    pub architecture: Architecture,
    /// Final loss of the completed training run, in `[0, 1]`.
    pub final_loss: f64,
}

/// What the collaborator returns on success.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GenerationReply {
    pub generated_text: String,
    pub explanation_text: String,
}

/// Displayable outcome of one generation attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationResult {
    pub input_text: String,
    pub generated_text: String,
    pub explanation_text: String,
    /// `0..=100`, derived from the request's final loss; 0 on failure.
    pub quality_score: u8,
}

impl GenerationResult {
    /// Fold a collaborator outcome into a displayable result.
    pub fn from_outcome(
        request: &GenerationRequest,
        outcome: Result<GenerationReply, GenerationError>,
    ) -> Self {
        match outcome {
            Ok(reply) => Self {
                input_text: request.input_text.clone(),
                generated_text: reply.generated_text,
                explanation_text: reply.explanation_text,
                quality_score: quality_score(request.final_loss),
            },
            Err(err) => Self::failed(&request.input_text, &err),
        }
    }

    /// Degraded result carrying the failure cause.
    pub fn failed(input_text: &str, err: &GenerationError) -> Self {
        Self {
            input_text: input_text.to_string(),
            generated_text: GENERATION_FAILED_MARKER.to_string(),
            explanation_text: err.to_string(),
            quality_score: 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.generated_text == GENERATION_FAILED_MARKER
    }
}

/// Why the collaborator produced no usable reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("No generation endpoint configured")]
    NotConfigured,
    #[error("Generation service rejected the credentials")]
    Unauthorized,
    #[error("Generation service is rate limiting requests; try again later")]
    RateLimited,
    #[error("Generation service error: {0}")]
    ServerError(String),
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unreadable generation response: {0}")]
    InvalidResponse(String),
    #[error("Generation worker stopped before replying")]
    Disconnected,
}

/// Fold whatever the collaborator returned into a displayable result.
pub fn complete_generation(
    request: &GenerationRequest,
    outcome: Result<GenerationReply, GenerationError>,
) -> GenerationResult {
    GenerationResult::from_outcome(request, outcome)
}

/// Remote (or fake) text generator.
pub trait GenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationReply, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(final_loss: f64) -> GenerationRequest {
        GenerationRequest {
            input_text: "The cat sat".to_string(),
            architecture: Architecture::Lstm,
            final_loss,
        }
    }

    #[test]
    fn success_scores_from_final_loss() {
        let reply = GenerationReply {
            generated_text: "on the mat".to_string(),
            explanation_text: "Gates kept the subject around.".to_string(),
        };
        let result = GenerationResult::from_outcome(&request(0.123), Ok(reply));
        assert_eq!(result.quality_score, 88);
        assert_eq!(result.generated_text, "on the mat");
        assert_eq!(result.input_text, "The cat sat");
        assert!(!result.is_failure());
    }

    #[test]
    fn failure_degrades_to_marker_and_zero_score() {
        let result = GenerationResult::from_outcome(
            &request(0.05),
            Err(GenerationError::Transport("connection refused".to_string())),
        );
        assert!(result.is_failure());
        assert_eq!(result.generated_text, GENERATION_FAILED_MARKER);
        assert_eq!(result.quality_score, 0);
        assert!(result.explanation_text.contains("connection refused"));
    }

    #[test]
    fn request_serializes_with_snake_case_fields() {
        let value = serde_json::to_value(request(0.25)).unwrap();
        assert_eq!(value["input_text"], "The cat sat");
        assert_eq!(value["architecture"], "lstm");
        assert_eq!(value["final_loss"], 0.25);
    }
}
