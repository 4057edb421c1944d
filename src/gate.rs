//! Gate between training and text generation.
//!
//! Generation unlocks only once a training run has completed, and stays
//! single-flight: while a request is outstanding further submissions are
//! refused and the previous result remains visible.

use thiserror::Error;
use tracing::{info, warn};

use crate::architecture::Architecture;
use crate::generation::{
    GenerationError, GenerationReply, GenerationRequest, GenerationResult, GenerationService,
    complete_generation,
};
use crate::training::TrainingStatus;

/// Map a final loss onto a 0–100 quality score.
pub fn quality_score(final_loss: f64) -> u8 {
    ((1.0 - final_loss) * 100.0).clamp(0.0, 100.0).round() as u8
}

/// Coarse label for a quality score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            50..=74 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRefusal {
    #[error("Train a model before generating text")]
    Locked,
    #[error("A generation request is already running")]
    InFlight,
    #[error("Enter some text to continue")]
    EmptyInput,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Unlock {
    final_loss: f64,
    architecture: Architecture,
}

#[derive(Clone, Debug, Default)]
pub struct ResultGate {
    unlocked: Option<Unlock>,
    in_flight: bool,
    last_result: Option<GenerationResult>,
}

impl ResultGate {
    /// Sync with the simulator. Any status other than completed locks the gate
    /// and forgets the previous final loss.
    pub fn observe(
        &mut self,
        status: TrainingStatus,
        final_loss: Option<f64>,
        architecture: Option<Architecture>,
    ) {
        let next = match (status, final_loss, architecture) {
            (TrainingStatus::Completed, Some(final_loss), Some(architecture)) => Some(Unlock {
                final_loss,
                architecture,
            }),
            _ => None,
        };
        if next != self.unlocked {
            match next {
                Some(unlock) => info!(
                    final_loss = unlock.final_loss,
                    architecture = unlock.architecture.tag(),
                    "Generation unlocked"
                ),
                None => info!("Generation locked"),
            }
            self.unlocked = next;
        }
    }

    pub fn is_generation_allowed(&self) -> bool {
        self.unlocked.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        self.is_generation_allowed() && !self.in_flight
    }

    /// Quality score the next request would carry.
    pub fn pending_quality(&self) -> Option<u8> {
        self.unlocked.map(|unlock| quality_score(unlock.final_loss))
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    /// Claim the gate and build the request for `input_text`.
    pub fn begin(&mut self, input_text: &str) -> Result<GenerationRequest, GateRefusal> {
        let Some(unlock) = self.unlocked else {
            return Err(GateRefusal::Locked);
        };
        if self.in_flight {
            return Err(GateRefusal::InFlight);
        }
        let input_text = input_text.trim();
        if input_text.is_empty() {
            return Err(GateRefusal::EmptyInput);
        }
        self.in_flight = true;
        Ok(GenerationRequest {
            input_text: input_text.to_string(),
            architecture: unlock.architecture,
            final_loss: unlock.final_loss,
        })
    }

    /// Release the gate with the collaborator's outcome.
    pub fn finish(
        &mut self,
        request: &GenerationRequest,
        outcome: Result<GenerationReply, GenerationError>,
    ) -> &GenerationResult {
        self.in_flight = false;
        if let Err(err) = &outcome {
            warn!("Generation failed: {err}");
        }
        self.last_result.insert(complete_generation(request, outcome))
    }

    /// Run a whole request synchronously against `service`.
    pub fn submit(
        &mut self,
        service: &dyn GenerationService,
        input_text: &str,
    ) -> Result<&GenerationResult, GateRefusal> {
        let request = self.begin(input_text)?;
        let outcome = service.generate(&request);
        Ok(self.finish(&request, outcome))
    }
}
