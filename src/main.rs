#![deny(missing_docs)]

//! Entry point for the netlens explainer.
use eframe::egui;
use netlens::egui_app::controller::AppController;
use netlens::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use netlens::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("netlens")
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(1280.0, 800.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "netlens",
        native_options,
        Box::new(|_cc| match AppController::load() {
            Ok(controller) => Ok(Box::new(EguiApp::new(controller))),
            Err(err) => {
                tracing::error!("Failed to load config: {err}");
                Ok(Box::new(LaunchError {
                    message: format!("Failed to load config: {err}"),
                }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start netlens");
                ui.label(&self.message);
            });
        });
    }
}
