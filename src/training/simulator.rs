use std::time::Instant;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::architecture::Architecture;

use super::curve::CurveShape;
use super::metrics::{MetricHistory, MetricSample};
use super::params::TrainingParams;
use super::schedule::{RunToken, TickSchedule};

/// Lifecycle of the simulated training run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainingStatus {
    #[default]
    Idle,
    Running,
    Completed,
}

impl TrainingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Training",
            Self::Completed => "Trained",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveRun {
    token: RunToken,
    shape: CurveShape,
    next_epoch: u32,
}

/// Drives the synthetic training curve, one tick per epoch.
///
/// Ticks are either fed manually through [`tick`](Self::tick) or scheduled
/// against wall-clock deadlines and drained with [`poll`](Self::poll). Each run
/// captures its parameters when it starts; later [`set_params`](Self::set_params)
/// calls only affect the next run.
#[derive(Debug)]
pub struct TrainingSimulator<R = StdRng> {
    params: TrainingParams,
    status: TrainingStatus,
    history: MetricHistory,
    progress: f64,
    final_loss: Option<f64>,
    trained_on: Option<Architecture>,
    run: Option<ActiveRun>,
    schedule: TickSchedule,
    last_token: Option<RunToken>,
    rng: R,
}

impl TrainingSimulator<StdRng> {
    /// Simulator backed by an OS-seeded generator.
    pub fn new(params: TrainingParams) -> Self {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Simulator with reproducible noise.
    pub fn seeded(params: TrainingParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TrainingSimulator<R> {
    pub fn with_rng(params: TrainingParams, rng: R) -> Self {
        Self {
            params,
            status: TrainingStatus::Idle,
            history: MetricHistory::default(),
            progress: 0.0,
            final_loss: None,
            trained_on: None,
            run: None,
            schedule: TickSchedule::default(),
            last_token: None,
            rng,
        }
    }

    pub fn params(&self) -> TrainingParams {
        self.params
    }

    pub fn status(&self) -> TrainingStatus {
        self.status
    }

    pub fn history(&self) -> &MetricHistory {
        &self.history
    }

    pub fn last_sample(&self) -> Option<&MetricSample> {
        self.history.last()
    }

    /// Progress of the current or last run, `0..=100`.
    pub fn progress_percent(&self) -> f64 {
        self.progress
    }

    /// Loss of the final epoch once the run has completed.
    pub fn final_loss(&self) -> Option<f64> {
        self.final_loss
    }

    /// Architecture the completed run was trained on.
    pub fn trained_architecture(&self) -> Option<Architecture> {
        self.trained_on
    }

    /// Token of the in-flight run, if any.
    pub fn active_token(&self) -> Option<RunToken> {
        self.run.map(|run| run.token)
    }

    /// Architecture of the in-flight run, if any.
    pub fn active_architecture(&self) -> Option<Architecture> {
        self.run.map(|run| run.shape.architecture)
    }

    /// Deadline of the next scheduled tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.deadline()
    }

    /// Replace the parameters used by the next run.
    ///
    /// A completed run is invalidated: status returns to idle and its final
    /// loss and history are discarded. An in-flight run keeps its snapshot.
    pub fn set_params(&mut self, params: TrainingParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        if self.status == TrainingStatus::Completed {
            info!("Training parameters changed; discarding completed run");
            self.clear_results();
            self.status = TrainingStatus::Idle;
        }
    }

    /// Start a run with `params`, cancelling any run in flight.
    ///
    /// The first tick is scheduled one architecture interval after now.
    pub fn start(&mut self, params: TrainingParams, architecture: Architecture) -> RunToken {
        self.start_at(params, architecture, Instant::now())
    }

    /// Same as [`start`](Self::start) with an explicit clock reading.
    pub fn start_at(
        &mut self,
        params: TrainingParams,
        architecture: Architecture,
        now: Instant,
    ) -> RunToken {
        self.schedule.cancel();
        self.params = params;
        let token = self
            .last_token
            .map_or_else(RunToken::first, RunToken::successor);
        self.last_token = Some(token);
        let shape = CurveShape::draw(params, architecture, &mut self.rng);
        self.clear_results();
        self.run = Some(ActiveRun {
            token,
            shape,
            next_epoch: 1,
        });
        self.status = TrainingStatus::Running;
        self.schedule.arm(token, now, architecture.tick_interval());
        info!(
            run = token.id(),
            architecture = architecture.tag(),
            epochs = shape.epoch_count,
            learning_rate = shape.learning_rate.value(),
            target_loss = shape.target_loss,
            "Training started"
        );
        token
    }

    /// Start again with the current parameters.
    pub fn restart(&mut self, architecture: Architecture) -> RunToken {
        self.start(self.params, architecture)
    }

    /// Cancel any run and return to idle with an empty history.
    pub fn reset(&mut self) {
        if let Some(pending) = self.schedule.cancel() {
            debug!(run = pending.token.id(), "Cancelled pending training tick");
        }
        if self.run.take().is_some() {
            info!("Training run cancelled");
        }
        self.clear_results();
        self.status = TrainingStatus::Idle;
    }

    /// Advance the run identified by `token` by one epoch.
    ///
    /// Returns `None` without side effects when `token` is stale.
    pub fn tick(&mut self, token: RunToken) -> Option<MetricSample> {
        let run = self.run.as_mut().filter(|run| run.token == token)?;
        let epoch = run.next_epoch;
        let shape = run.shape;
        let loss = shape.loss_at(epoch, &mut self.rng);
        let sample = MetricSample::from_loss(epoch, loss);
        run.next_epoch += 1;
        self.history.push(sample);
        self.progress = f64::from(epoch) / f64::from(shape.epoch_count) * 100.0;
        debug!(
            run = token.id(),
            epoch,
            loss = sample.loss,
            accuracy = sample.accuracy,
            "Training tick"
        );
        if epoch >= shape.epoch_count {
            self.complete(shape.architecture, sample);
        }
        Some(sample)
    }

    /// Fire the scheduled tick if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<MetricSample> {
        let token = self.schedule.take_due(now)?;
        let sample = self.tick(token);
        if let Some(run) = self.run.filter(|run| run.token == token) {
            self.schedule.arm(token, now, run.shape.architecture.tick_interval());
        }
        sample
    }

    /// Run every remaining tick of the active run immediately.
    pub fn run_to_completion(&mut self) -> Option<f64> {
        self.schedule.cancel();
        while let Some(token) = self.active_token() {
            self.tick(token);
        }
        self.final_loss
    }

    fn complete(&mut self, architecture: Architecture, last: MetricSample) {
        self.run = None;
        self.schedule.cancel();
        self.status = TrainingStatus::Completed;
        self.final_loss = Some(last.loss);
        self.trained_on = Some(architecture);
        info!(
            epochs = last.epoch,
            final_loss = last.loss,
            accuracy = last.accuracy,
            "Training completed"
        );
    }

    fn clear_results(&mut self) {
        self.history.clear();
        self.progress = 0.0;
        self.final_loss = None;
        self.trained_on = None;
    }
}
