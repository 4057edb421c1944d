//! egui front end: controller, plain UI state and the renderer.

pub mod controller;
pub mod state;
pub mod ui;
