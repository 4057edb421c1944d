//! Shape of the synthetic loss curve.
//!
//! A run decays exponentially from a loss near 1 towards a randomly drawn
//! floor. The learning-rate regime controls both the steepness of the decay and
//! the height of the floor; per-epoch noise scales with the learning rate.
//! Recurrent runs pick up extra instability in the second half of training.

use rand::Rng;

use crate::architecture::Architecture;

use super::params::{LearningRate, TrainingParams};

/// Lowest floor a run can draw.
const BASE_FLOOR: f64 = 0.05;
/// Width of the random band added on top of the floor.
const FLOOR_SPREAD: f64 = 0.1;
/// Floor penalty when the learning rate overshoots.
const HIGH_RATE_FLOOR_PENALTY: f64 = 0.2;
/// Decay steepness at a convergence factor of 1.
const DECAY_RATE: f64 = 5.0;
/// Upper bound of the recurrent back-half instability term.
const RECURRENT_INSTABILITY: f64 = 0.05;

/// Per-run constants drawn once when the run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveShape {
    pub architecture: Architecture,
    pub epoch_count: u32,
    pub learning_rate: LearningRate,
    /// Multiplier on the decay envelope's steepness.
    pub convergence_factor: f64,
    /// Asymptotic minimum the curve decays towards.
    pub target_loss: f64,
}

impl CurveShape {
    /// Snapshot `params` and draw the run's floor.
    pub fn draw<R: Rng + ?Sized>(
        params: TrainingParams,
        architecture: Architecture,
        rng: &mut R,
    ) -> Self {
        let learning_rate = params.learning_rate();
        Self {
            architecture,
            epoch_count: params.epoch_count(),
            learning_rate,
            convergence_factor: convergence_factor(learning_rate),
            target_loss: target_floor_loss(learning_rate, rng),
        }
    }

    /// Clamped loss for `epoch` (1-based), drawing fresh noise.
    pub fn loss_at<R: Rng + ?Sized>(&self, epoch: u32, rng: &mut R) -> f64 {
        let progress_ratio = f64::from(epoch) / f64::from(self.epoch_count);
        let decay = (-progress_ratio * DECAY_RATE * self.convergence_factor).exp();
        let noise_magnitude = self.learning_rate.value() * 2.0;
        let noise = rng.random_range(-0.5..0.5) * noise_magnitude;
        let mut loss = self.target_loss + decay * (1.0 - self.target_loss) + noise;
        if self.architecture == Architecture::Recurrent && progress_ratio > 0.5 {
            // Added before the clamp, so it can be masked near the bounds.
            loss += rng.random_range(0.0..RECURRENT_INSTABILITY);
        }
        loss.clamp(0.0, 1.0)
    }
}

/// Ideal, too-aggressive and too-small regimes converge at different speeds.
pub fn convergence_factor(learning_rate: LearningRate) -> f64 {
    match learning_rate {
        LearningRate::Balanced => 1.0,
        LearningRate::High => 0.5,
        LearningRate::Low => 0.8,
    }
}

/// Draw the irreducible floor for a run.
pub fn target_floor_loss<R: Rng + ?Sized>(learning_rate: LearningRate, rng: &mut R) -> f64 {
    let penalty = if learning_rate.value() > 0.05 {
        HIGH_RATE_FLOOR_PENALTY
    } else {
        0.0
    };
    BASE_FLOOR + rng.random_range(0.0..FLOOR_SPREAD) + penalty
}

/// Round to three decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
