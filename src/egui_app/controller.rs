//! Bridges UI triggers to the explainer, simulator and generation gate.

mod jobs;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::architecture::Architecture;
use crate::catalog::StepDescriptor;
use crate::config::{self, AppSettings, ConfigError};
use crate::egui_app::state::UiState;
use crate::egui_app::ui::style::StatusTone;
use crate::gate::{GateRefusal, QualityBand, ResultGate};
use crate::generation::{GenerationService, HttpGenerationService};
use crate::stepper::StepperController;
use crate::training::{LearningRate, TrainingParams, TrainingSimulator, TrainingStatus};

use jobs::{ControllerJobs, GenerationJobResult, JobMessage};

/// Owns every piece of app state; the renderer only reads it and calls the
/// trigger methods below.
pub struct AppController {
    pub ui: UiState,
    stepper: StepperController,
    simulator: TrainingSimulator,
    gate: ResultGate,
    jobs: ControllerJobs,
    service: Arc<dyn GenerationService>,
    settings: AppSettings,
    config_path: Option<PathBuf>,
}

impl AppController {
    /// Controller seeded from `settings` that never writes them back.
    pub fn new(settings: AppSettings, service: Arc<dyn GenerationService>) -> Self {
        let settings = settings.normalized();
        let params = settings.training.params();
        let simulator = match settings.training.seed {
            Some(seed) => TrainingSimulator::seeded(params, seed),
            None => TrainingSimulator::new(params),
        };
        Self {
            ui: UiState::default(),
            stepper: StepperController::new(settings.training.architecture),
            simulator,
            gate: ResultGate::default(),
            jobs: ControllerJobs::new(),
            service,
            settings,
            config_path: None,
        }
    }

    /// Load settings from the app directory and talk to the configured endpoint.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config::config_path()?;
        let settings = config::load_from(&path)?;
        let service = HttpGenerationService::from_settings(&settings.generation);
        if !service.is_configured() {
            info!("No generation endpoint configured; generation will report a degraded result");
        }
        Ok(Self::new(settings, Arc::new(service)).with_config_path(path))
    }

    /// Persist setting changes to `path`.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn stepper(&self) -> &StepperController {
        &self.stepper
    }

    pub fn simulator(&self) -> &TrainingSimulator {
        &self.simulator
    }

    pub fn gate(&self) -> &ResultGate {
        &self.gate
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn current_step(&self) -> &'static StepDescriptor {
        self.stepper.current_step()
    }

    pub fn generation_in_progress(&self) -> bool {
        self.jobs.generation_in_progress()
    }

    /// Open `architecture` at its first step, even when it is already open.
    pub fn select_architecture(&mut self, architecture: Architecture) {
        let changed = architecture != self.stepper.architecture();
        self.stepper.select_architecture(architecture);
        if !changed {
            return;
        }
        self.settings.training.architecture = architecture;
        self.persist_settings();
        self.set_status(format!("Exploring {}", architecture.label()), StatusTone::Info);
    }

    pub fn next_step(&mut self) {
        self.stepper.next();
    }

    pub fn previous_step(&mut self) {
        self.stepper.previous();
    }

    pub fn go_to_step(&mut self, index: usize) {
        if let Err(err) = self.stepper.go_to(index) {
            warn!("{err}");
            self.set_status(err.to_string(), StatusTone::Warning);
        }
    }

    pub fn set_epoch_count(&mut self, epoch_count: u32) {
        let rate = self.simulator.params().learning_rate();
        self.apply_params(TrainingParams::with_rate(epoch_count, rate));
    }

    pub fn set_learning_rate(&mut self, rate: LearningRate) {
        let epochs = self.simulator.params().epoch_count();
        self.apply_params(TrainingParams::with_rate(epochs, rate));
    }

    fn apply_params(&mut self, params: Result<TrainingParams, crate::training::ParamError>) {
        let params = match params {
            Ok(params) => params,
            Err(err) => {
                self.set_status(err.to_string(), StatusTone::Error);
                return;
            }
        };
        if params == self.simulator.params() {
            return;
        }
        let was_completed = self.simulator.status() == TrainingStatus::Completed;
        self.simulator.set_params(params);
        self.settings.training.store_params(params);
        self.persist_settings();
        self.sync_gate();
        if was_completed {
            self.set_status(
                "Parameters changed; train again to unlock generation",
                StatusTone::Idle,
            );
        }
    }

    /// Start a run on the architecture currently being explored, replacing any
    /// run in flight.
    pub fn start_training(&mut self) {
        self.start_training_at(Instant::now());
    }

    pub fn start_training_at(&mut self, now: Instant) {
        let architecture = self.stepper.architecture();
        let params = self.simulator.params();
        self.simulator.start_at(params, architecture, now);
        self.sync_gate();
        self.set_status(
            format!(
                "Training {} for {} epochs at learning rate {}",
                architecture.label(),
                params.epoch_count(),
                params.learning_rate()
            ),
            StatusTone::Busy,
        );
    }

    pub fn reset_training(&mut self) {
        self.simulator.reset();
        self.sync_gate();
        self.set_status("Training reset", StatusTone::Idle);
    }

    /// Skip the remaining tick delays of the current run.
    pub fn finish_training_now(&mut self) {
        if self.simulator.status() != TrainingStatus::Running {
            return;
        }
        self.simulator.run_to_completion();
        self.on_training_completed();
    }

    /// Send the prompt text to the generation service in the background.
    pub fn submit_generation(&mut self) {
        let input = self.ui.generation_input.clone();
        match self.gate.begin(&input) {
            Ok(request) => {
                info!(
                    architecture = request.architecture.tag(),
                    final_loss = request.final_loss,
                    "Submitting generation request"
                );
                self.jobs.begin_generation(Arc::clone(&self.service), request);
                self.set_status("Generating text…", StatusTone::Busy);
            }
            Err(refusal) => {
                let tone = match refusal {
                    GateRefusal::InFlight => StatusTone::Info,
                    _ => StatusTone::Warning,
                };
                self.set_status(refusal.to_string(), tone);
            }
        }
    }

    /// Advance everything that runs without user input.
    ///
    /// Returns the instant the next training tick is due, if any.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        self.drain_jobs();
        let was_running = self.simulator.status() == TrainingStatus::Running;
        self.simulator.poll(now);
        if was_running && self.simulator.status() == TrainingStatus::Completed {
            self.on_training_completed();
        }
        self.simulator.next_deadline()
    }

    fn drain_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            match message {
                JobMessage::GenerationFinished(result) => self.on_generation_finished(result),
            }
        }
    }

    fn on_generation_finished(&mut self, job: GenerationJobResult) {
        self.jobs.clear_generation();
        let result = self.gate.finish(&job.request, job.outcome);
        if result.is_failure() {
            let message = format!("Generation failed: {}", result.explanation_text);
            self.set_status(message, StatusTone::Warning);
        } else {
            let score = result.quality_score;
            let message = format!(
                "Generated text (quality {score}, {})",
                QualityBand::from_score(score).label()
            );
            self.set_status(message, StatusTone::Info);
        }
    }

    fn on_training_completed(&mut self) {
        self.sync_gate();
        match (self.simulator.final_loss(), self.gate.pending_quality()) {
            (Some(loss), Some(score)) => self.set_status(
                format!(
                    "Training complete: final loss {loss:.3}, quality {score} ({})",
                    QualityBand::from_score(score).label()
                ),
                StatusTone::Info,
            ),
            _ => self.set_status("Training complete", StatusTone::Info),
        }
    }

    fn sync_gate(&mut self) {
        self.gate.observe(
            self.simulator.status(),
            self.simulator.final_loss(),
            self.simulator.trained_architecture(),
        );
    }

    fn persist_settings(&mut self) {
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.settings, path) {
            warn!("{err}");
            self.set_status(format!("Could not save settings: {err}"), StatusTone::Warning);
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{
        GENERATION_FAILED_MARKER, GenerationError, GenerationReply, GenerationRequest,
    };
    use crate::stepper::StepperState;
    use std::time::Duration;

    struct CannedService;

    impl GenerationService for CannedService {
        fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationReply, GenerationError> {
            Ok(GenerationReply {
                generated_text: format!("{} and then some", request.input_text),
                explanation_text: format!("sampled from {}", request.architecture.tag()),
            })
        }
    }

    struct PanickingService;

    impl GenerationService for PanickingService {
        fn generate(&self, _: &GenerationRequest) -> Result<GenerationReply, GenerationError> {
            panic!("backend blew up");
        }
    }

    fn seeded_settings() -> AppSettings {
        let mut settings = AppSettings::default();
        settings.training.seed = Some(11);
        settings.training.epoch_count = 10;
        settings
    }

    fn controller(service: Arc<dyn GenerationService>) -> AppController {
        AppController::new(seeded_settings(), service)
    }

    fn wait_for_generation(controller: &mut AppController) {
        for _ in 0..500 {
            controller.tick(Instant::now());
            if !controller.generation_in_progress() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("generation did not finish");
    }

    #[test]
    fn ticks_follow_the_schedule() {
        let mut controller = controller(Arc::new(CannedService));
        let start = Instant::now();
        controller.start_training_at(start);
        let interval = Architecture::FeedForward.tick_interval();

        assert_eq!(controller.tick(start), Some(start + interval));
        assert!(controller.simulator().history().is_empty());

        let mut now = start;
        for _ in 0..10 {
            now += interval;
            controller.tick(now);
        }
        assert_eq!(controller.simulator().history().len(), 10);
        assert_eq!(controller.simulator().status(), TrainingStatus::Completed);
        assert!(controller.gate().is_generation_allowed());
        assert_eq!(controller.tick(now + interval), None);
        assert!(controller.ui.status.text.starts_with("Training complete"));
    }

    #[test]
    fn generation_round_trip_through_worker() {
        let mut controller = controller(Arc::new(CannedService));
        controller.start_training();
        controller.finish_training_now();
        controller.ui.generation_input = "  once upon a time ".to_string();
        controller.submit_generation();
        assert!(controller.generation_in_progress());
        assert!(controller.gate().is_in_flight());
        wait_for_generation(&mut controller);
        assert!(!controller.gate().is_in_flight());

        let result = controller.gate().last_result().unwrap();
        assert_eq!(result.input_text, "once upon a time");
        assert_eq!(result.generated_text, "once upon a time and then some");
        assert_eq!(result.explanation_text, "sampled from mlp");
        assert_eq!(
            Some(result.quality_score),
            controller.gate().pending_quality()
        );
    }

    #[test]
    fn panicking_service_releases_generation() {
        let mut controller = controller(Arc::new(PanickingService));
        controller.start_training();
        controller.finish_training_now();
        controller.ui.generation_input = "hello".to_string();
        controller.submit_generation();
        wait_for_generation(&mut controller);

        let result = controller.gate().last_result().unwrap();
        assert!(result.is_failure());
        assert_eq!(result.quality_score, 0);
        assert!(!controller.gate().is_in_flight());
        assert!(controller.gate().can_submit());
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
    }

    #[test]
    fn unconfigured_endpoint_degrades_result() {
        let service = HttpGenerationService::new(None, None, Duration::from_secs(1));
        let mut controller = controller(Arc::new(service));
        controller.start_training();
        controller.finish_training_now();
        controller.ui.generation_input = "hello".to_string();
        controller.submit_generation();
        wait_for_generation(&mut controller);

        let result = controller.gate().last_result().unwrap();
        assert_eq!(result.generated_text, GENERATION_FAILED_MARKER);
        assert_eq!(result.quality_score, 0);
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
    }

    #[test]
    fn submit_is_refused_before_training() {
        let mut controller = controller(Arc::new(CannedService));
        controller.ui.generation_input = "hello".to_string();
        controller.submit_generation();
        assert!(!controller.generation_in_progress());
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
        assert!(controller.gate().last_result().is_none());
    }

    #[test]
    fn parameter_change_relocks_gate() {
        let mut controller = controller(Arc::new(CannedService));
        controller.start_training();
        controller.finish_training_now();
        assert!(controller.gate().is_generation_allowed());

        controller.set_learning_rate(LearningRate::High);
        assert_eq!(controller.simulator().status(), TrainingStatus::Idle);
        assert!(!controller.gate().is_generation_allowed());
        assert_eq!(controller.settings().training.learning_rate, LearningRate::High);
    }

    #[test]
    fn invalid_epoch_count_is_reported() {
        let mut controller = controller(Arc::new(CannedService));
        controller.set_epoch_count(5);
        assert_eq!(controller.ui.status.tone, StatusTone::Error);
        assert_eq!(controller.simulator().params().epoch_count(), 10);
    }

    #[test]
    fn architecture_switch_resets_stepper_but_not_training() {
        let mut controller = controller(Arc::new(CannedService));
        controller.next_step();
        controller.start_training();
        controller.select_architecture(Architecture::Lstm);
        assert_eq!(controller.stepper().step_index(), 0);
        assert_eq!(controller.simulator().status(), TrainingStatus::Running);
        assert_eq!(
            controller.simulator().active_architecture(),
            Some(Architecture::FeedForward)
        );
    }

    #[test]
    fn reselecting_architecture_rewinds_steps() {
        let mut controller = controller(Arc::new(CannedService));
        controller.next_step();
        controller.next_step();
        assert_eq!(controller.stepper().step_index(), 2);
        let status_before = controller.ui.status.text.clone();

        controller.select_architecture(Architecture::FeedForward);
        assert_eq!(
            controller.stepper().state(),
            StepperState {
                architecture: Architecture::FeedForward,
                step_index: 0,
            }
        );
        assert_eq!(controller.ui.status.text, status_before);
    }

    #[test]
    fn out_of_range_jump_keeps_step() {
        let mut controller = controller(Arc::new(CannedService));
        controller.go_to_step(1);
        controller.go_to_step(99);
        assert_eq!(controller.stepper().step_index(), 1);
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
    }
}
