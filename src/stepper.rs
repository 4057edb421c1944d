//! Navigation state for the guided explainer.

use crate::architecture::Architecture;
use crate::catalog::{self, StepDescriptor};

/// Errors raised by explicit step navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepperError {
    /// Requested step index lies outside the active architecture's catalog.
    #[error("Step {index} is out of range for {architecture} ({len} steps)")]
    StepOutOfRange {
        architecture: Architecture,
        index: usize,
        len: usize,
    },
}

/// Snapshot of the active architecture and step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepperState {
    pub architecture: Architecture,
    pub step_index: usize,
}

/// Sole owner of [`StepperState`]; keeps the index inside the catalog bounds.
#[derive(Clone, Debug, Default)]
pub struct StepperController {
    state: StepperState,
}

impl StepperController {
    /// Start at the first step of `architecture`.
    pub fn new(architecture: Architecture) -> Self {
        Self {
            state: StepperState {
                architecture,
                step_index: 0,
            },
        }
    }

    pub fn state(&self) -> StepperState {
        self.state
    }

    pub fn architecture(&self) -> Architecture {
        self.state.architecture
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    /// Number of steps for the active architecture.
    pub fn step_count(&self) -> usize {
        catalog::steps_for(self.state.architecture).len()
    }

    pub fn is_first(&self) -> bool {
        self.state.step_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.state.step_index + 1 >= self.step_count()
    }

    /// Switch architecture and rewind to its first step.
    pub fn select_architecture(&mut self, architecture: Architecture) {
        self.state = StepperState {
            architecture,
            step_index: 0,
        };
    }

    /// Advance one step; stays put on the last step.
    pub fn next(&mut self) {
        let last = self.step_count().saturating_sub(1);
        self.state.step_index = (self.state.step_index + 1).min(last);
    }

    /// Go back one step; stays put on the first step.
    pub fn previous(&mut self) {
        self.state.step_index = self.state.step_index.saturating_sub(1);
    }

    /// Jump directly to `index`, leaving the state untouched when it is out of range.
    pub fn go_to(&mut self, index: usize) -> Result<(), StepperError> {
        let len = self.step_count();
        if index >= len {
            return Err(StepperError::StepOutOfRange {
                architecture: self.state.architecture,
                index,
                len,
            });
        }
        self.state.step_index = index;
        Ok(())
    }

    /// Descriptor for the active step.
    pub fn current_step(&self) -> &'static StepDescriptor {
        let steps = catalog::steps_for(self.state.architecture);
        debug_assert!(
            self.state.step_index < steps.len(),
            "step index escaped catalog bounds"
        );
        match steps.get(self.state.step_index) {
            Some(step) => step,
            None => {
                tracing::error!(
                    "Step index {} out of range for {}; showing last step",
                    self.state.step_index,
                    self.state.architecture
                );
                &steps[steps.len() - 1]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_resets_to_first_step() {
        for architecture in Architecture::ALL {
            let mut stepper = StepperController::new(Architecture::FeedForward);
            stepper.next();
            stepper.next();
            stepper.select_architecture(architecture);
            assert_eq!(stepper.step_index(), 0);
            assert_eq!(stepper.architecture(), architecture);
            assert_eq!(stepper.current_step(), &catalog::steps_for(architecture)[0]);
        }
    }

    #[test]
    fn next_is_idempotent_at_last_step() {
        let mut stepper = StepperController::new(Architecture::Lstm);
        let last = stepper.step_count() - 1;
        for _ in 0..stepper.step_count() + 5 {
            stepper.next();
        }
        assert_eq!(stepper.step_index(), last);
        assert!(stepper.is_last());
        stepper.next();
        assert_eq!(stepper.step_index(), last);
    }

    #[test]
    fn previous_is_idempotent_at_first_step() {
        let mut stepper = StepperController::new(Architecture::Recurrent);
        stepper.previous();
        stepper.previous();
        assert_eq!(stepper.step_index(), 0);
        assert!(stepper.is_first());
    }

    #[test]
    fn mixed_navigation_stays_in_bounds() {
        let mut stepper = StepperController::new(Architecture::FeedForward);
        let moves = [true, true, false, true, true, true, true, true, true, true, false, false];
        for (turn, forward) in moves.into_iter().enumerate() {
            if forward {
                stepper.next();
            } else {
                stepper.previous();
            }
            if turn == 6 {
                stepper.select_architecture(Architecture::Recurrent);
            }
            assert!(stepper.step_index() < stepper.step_count());
        }
    }

    #[test]
    fn go_to_rejects_out_of_range_index() {
        let mut stepper = StepperController::new(Architecture::FeedForward);
        stepper.go_to(2).unwrap();
        let len = stepper.step_count();
        let err = stepper.go_to(len).unwrap_err();
        assert_eq!(
            err,
            StepperError::StepOutOfRange {
                architecture: Architecture::FeedForward,
                index: len,
                len,
            }
        );
        assert_eq!(stepper.step_index(), 2);
    }
}
