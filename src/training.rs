//! Synthetic training simulator.
//!
//! Nothing here learns anything: a run replays a randomized, bounded loss
//! curve whose shape depends on the learning-rate regime and architecture, and
//! finishes with a final loss that unlocks text generation.

pub mod curve;
pub mod metrics;
pub mod params;
pub mod schedule;
mod simulator;

pub use metrics::{HISTORY_CAP, MetricHistory, MetricSample};
pub use params::{EPOCH_STEP, LearningRate, MAX_EPOCHS, MIN_EPOCHS, ParamError, TrainingParams};
pub use schedule::RunToken;
pub use simulator::{TrainingSimulator, TrainingStatus};
