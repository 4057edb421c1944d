mod support;

use support::{http::serve_json_once, netlens_env::NetlensEnvGuard};

use netlens::{
    architecture::Architecture,
    config::{self, AppSettings},
    egui_app::controller::AppController,
    gate::quality_score,
    generation::{GenerationError, GenerationReply, GenerationRequest, GenerationService},
    training::{LearningRate, TrainingStatus},
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tempfile::TempDir;

struct ControllerHarness {
    _config: NetlensEnvGuard,
    temp: TempDir,
}

impl ControllerHarness {
    fn with_config(contents: &str) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let config_home = temp.path().join("config");
        let app_root = config_home.join(".netlens");
        std::fs::create_dir_all(&app_root).expect("create app dir");
        std::fs::write(app_root.join(config::CONFIG_FILE_NAME), contents).expect("write config");
        let env = NetlensEnvGuard::set_config_home(config_home);
        Self { _config: env, temp }
    }

    fn config_file(&self) -> std::path::PathBuf {
        self.temp
            .path()
            .join("config")
            .join(".netlens")
            .join(config::CONFIG_FILE_NAME)
    }
}

struct NeverCalled;

impl GenerationService for NeverCalled {
    fn generate(&self, _: &GenerationRequest) -> Result<GenerationReply, GenerationError> {
        panic!("generation must not run in this test");
    }
}

/// Drive scheduled ticks by jumping the clock to each deadline.
fn run_schedule(controller: &mut AppController, start: Instant) -> usize {
    let mut ticks = 0;
    let mut next = controller.tick(start);
    while let Some(deadline) = next {
        next = controller.tick(deadline);
        ticks += 1;
        assert!(ticks <= 200, "schedule never drained");
    }
    ticks
}

fn wait_for_generation(controller: &mut AppController) {
    for _ in 0..400 {
        controller.tick(Instant::now());
        if !controller.generation_in_progress() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("generation did not finish");
}

#[test]
fn loads_config_and_persists_parameter_changes() {
    let harness = ControllerHarness::with_config(
        "[training]\narchitecture = \"lstm\"\nepoch_count = 30\nlearning_rate = 0.1\nseed = 7\n",
    );
    let mut controller = AppController::load().expect("load controller");
    assert_eq!(controller.stepper().architecture(), Architecture::Lstm);
    assert_eq!(controller.simulator().params().epoch_count(), 30);
    assert_eq!(
        controller.simulator().params().learning_rate(),
        LearningRate::High
    );

    controller.set_epoch_count(80);
    controller.set_learning_rate(LearningRate::Low);
    controller.select_architecture(Architecture::Recurrent);

    let saved = config::load_from(&harness.config_file()).expect("reload config");
    assert_eq!(saved.training.epoch_count, 80);
    assert_eq!(saved.training.learning_rate, LearningRate::Low);
    assert_eq!(saved.training.architecture, Architecture::Recurrent);
    assert_eq!(saved.training.seed, Some(7));
}

#[test]
fn hand_edited_learning_rate_still_launches() {
    let _harness = ControllerHarness::with_config(
        "[training]\narchitecture = \"recurrent\"\nepoch_count = 40\nlearning_rate = 0.05\n",
    );
    let controller = AppController::load().expect("load controller");
    assert_eq!(controller.stepper().architecture(), Architecture::Recurrent);
    assert_eq!(controller.simulator().params().epoch_count(), 40);
    assert_eq!(
        controller.simulator().params().learning_rate(),
        LearningRate::default()
    );
}

#[test]
fn trains_then_generates_against_http_endpoint() {
    let (url, server) = serve_json_once(
        200,
        concat!(
            r#"{"generatedText":"The cat sat on the mat.","#,
            r#""explanationText":"Cell state kept the subject."}"#,
        ),
    );
    let _harness = ControllerHarness::with_config(&format!(
        "[training]\narchitecture = \"lstm\"\nepoch_count = 10\nlearning_rate = 0.01\nseed = 3\n\n\
         [generation]\nendpoint = \"{url}\"\ntimeout_secs = 5\n"
    ));
    let mut controller = AppController::load().expect("load controller");

    controller.ui.generation_input = "The cat".to_string();
    controller.submit_generation();
    assert!(!controller.generation_in_progress());

    let start = Instant::now();
    controller.start_training_at(start);
    let ticks = run_schedule(&mut controller, start);
    assert_eq!(ticks, 10);
    assert_eq!(controller.simulator().status(), TrainingStatus::Completed);
    assert_eq!(controller.simulator().history().len(), 10);
    let final_loss = controller.simulator().final_loss().expect("final loss");
    assert!((0.0..=1.0).contains(&final_loss));
    assert!(controller.gate().is_generation_allowed());

    controller.submit_generation();
    assert!(controller.generation_in_progress());
    wait_for_generation(&mut controller);

    let request: serde_json::Value =
        serde_json::from_str(&server.join().expect("server thread")).expect("request json");
    assert_eq!(request["input_text"], "The cat");
    assert_eq!(request["architecture"], "lstm");
    assert_eq!(request["final_loss"].as_f64(), Some(final_loss));

    let result = controller.gate().last_result().expect("result");
    assert_eq!(result.generated_text, "The cat sat on the mat.");
    assert_eq!(result.explanation_text, "Cell state kept the subject.");
    assert_eq!(result.quality_score, quality_score(final_loss));
}

#[test]
fn server_error_is_folded_into_result() {
    let (url, server) = serve_json_once(503, r#"{"error":"overloaded"}"#);
    let _harness = ControllerHarness::with_config(&format!(
        "[training]\nepoch_count = 10\nseed = 5\n\n[generation]\nendpoint = \"{url}\"\n"
    ));
    let mut controller = AppController::load().expect("load controller");
    controller.start_training();
    controller.finish_training_now();
    controller.ui.generation_input = "hello".to_string();
    controller.submit_generation();
    wait_for_generation(&mut controller);
    server.join().expect("server thread");

    let result = controller.gate().last_result().expect("result");
    assert!(result.is_failure());
    assert_eq!(result.quality_score, 0);
    assert!(result.explanation_text.contains("overloaded"));
    assert!(controller.gate().can_submit());
}

#[test]
fn reset_mid_run_discards_pending_ticks() {
    let mut settings = AppSettings::default();
    settings.training.seed = Some(9);
    let mut controller = AppController::new(settings, Arc::new(NeverCalled));
    let interval = Architecture::FeedForward.tick_interval();

    let start = Instant::now();
    controller.start_training_at(start);
    let mut now = start;
    for _ in 0..3 {
        now += interval;
        controller.tick(now);
    }
    assert_eq!(controller.simulator().history().len(), 3);

    controller.reset_training();
    for step in 1..=60 {
        assert_eq!(controller.tick(now + interval * step), None);
    }
    assert_eq!(controller.simulator().status(), TrainingStatus::Idle);
    assert!(controller.simulator().history().is_empty());
    assert!(!controller.gate().is_generation_allowed());
}
