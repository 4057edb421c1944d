//! Library exports for reuse in benchmarks and tests.
/// App directory resolution.
pub mod app_dirs;
/// Supported network architectures.
pub mod architecture;
/// Static explainer content per architecture.
pub mod catalog;
/// Persisted settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Generation unlock and quality scoring.
pub mod gate;
/// Text generation collaborator contract and HTTP client.
pub mod generation;
pub(crate) mod http_client;
/// Tracing setup.
pub mod logging;
/// Step navigation.
pub mod stepper;
/// Simulated training runs.
pub mod training;
