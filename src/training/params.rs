use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted epoch count.
pub const MIN_EPOCHS: u32 = 10;
/// Largest accepted epoch count.
pub const MAX_EPOCHS: u32 = 100;
/// Granularity of the epoch slider.
pub const EPOCH_STEP: u32 = 10;

/// Rejected training parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamError {
    /// Epoch count outside `MIN_EPOCHS..=MAX_EPOCHS`.
    #[error("Epoch count {0} must be between 10 and 100")]
    InvalidEpochCount(u32),
    /// Learning rate other than 0.1, 0.01 or 0.001.
    #[error("Learning rate {0} must be one of 0.1, 0.01 or 0.001")]
    InvalidLearningRate(f64),
}

/// The three learning-rate regimes offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum LearningRate {
    /// 0.1: too aggressive, settles on a high noisy floor.
    High,
    /// 0.01: the sweet spot.
    #[default]
    Balanced,
    /// 0.001: converges, but slowly.
    Low,
}

impl LearningRate {
    pub const ALL: [LearningRate; 3] = [Self::High, Self::Balanced, Self::Low];

    pub fn value(self) -> f64 {
        match self {
            Self::High => 0.1,
            Self::Balanced => 0.01,
            Self::Low => 0.001,
        }
    }

    /// Map a raw rate onto one of the fixed regimes.
    pub fn from_value(value: f64) -> Result<Self, ParamError> {
        Self::ALL
            .into_iter()
            .find(|rate| (rate.value() - value).abs() < 1e-9)
            .ok_or(ParamError::InvalidLearningRate(value))
    }
}

impl TryFrom<f64> for LearningRate {
    type Error = ParamError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<LearningRate> for f64 {
    fn from(rate: LearningRate) -> Self {
        rate.value()
    }
}

impl fmt::Display for LearningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Validated parameters for one simulated training run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainingParams {
    epoch_count: u32,
    learning_rate: LearningRate,
}

impl TrainingParams {
    /// Validate a raw epoch count and learning rate.
    pub fn new(epoch_count: u32, learning_rate: f64) -> Result<Self, ParamError> {
        Self::with_rate(epoch_count, LearningRate::from_value(learning_rate)?)
    }

    /// Validate an epoch count paired with a known regime.
    pub fn with_rate(epoch_count: u32, learning_rate: LearningRate) -> Result<Self, ParamError> {
        if !(MIN_EPOCHS..=MAX_EPOCHS).contains(&epoch_count) {
            return Err(ParamError::InvalidEpochCount(epoch_count));
        }
        Ok(Self {
            epoch_count,
            learning_rate,
        })
    }

    pub fn epoch_count(&self) -> u32 {
        self.epoch_count
    }

    pub fn learning_rate(&self) -> LearningRate {
        self.learning_rate
    }
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epoch_count: 50,
            learning_rate: LearningRate::Balanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_and_rejects_outside() {
        assert!(TrainingParams::new(MIN_EPOCHS, 0.01).is_ok());
        assert!(TrainingParams::new(MAX_EPOCHS, 0.1).is_ok());
        assert_eq!(
            TrainingParams::new(9, 0.01),
            Err(ParamError::InvalidEpochCount(9))
        );
        assert_eq!(
            TrainingParams::new(101, 0.001),
            Err(ParamError::InvalidEpochCount(101))
        );
    }

    #[test]
    fn rejects_unknown_learning_rate() {
        let err = TrainingParams::new(20, 0.05).unwrap_err();
        assert!(matches!(err, ParamError::InvalidLearningRate(rate) if rate == 0.05));
        assert!(err.to_string().contains("0.05"));
    }

    #[test]
    fn learning_rate_round_trips_through_float() {
        for rate in LearningRate::ALL {
            assert_eq!(LearningRate::try_from(f64::from(rate)), Ok(rate));
        }
    }
}
