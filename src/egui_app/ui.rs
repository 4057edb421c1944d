//! egui renderer for the application UI.

mod chart;
mod diagram;
pub mod style;

use std::time::{Duration, Instant};

use crate::architecture::Architecture;
use crate::egui_app::controller::AppController;
use crate::gate::QualityBand;
use crate::stepper::StepperState;
use crate::training::{EPOCH_STEP, LearningRate, MAX_EPOCHS, MIN_EPOCHS, TrainingStatus};
use eframe::egui::{self, Align, Frame, Layout, Margin, RichText, Ui};

/// Minimum viewport size for the main window.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

/// Repaint cadence while a generation request is outstanding.
const JOB_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: AppController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(controller: AppController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_tertiary)
                    .inner_margin(Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("netlens").strong().color(palette.accent_mint));
                    ui.separator();
                    let mut selected = self.controller.stepper().architecture();
                    let mut picked = None;
                    egui::ComboBox::from_id_salt("architecture")
                        .selected_text(selected.label())
                        .show_ui(ui, |ui| {
                            for architecture in Architecture::ALL {
                                let label = architecture.label();
                                let row = ui.selectable_value(&mut selected, architecture, label);
                                if row.clicked() {
                                    picked = Some(architecture);
                                }
                            }
                        });
                    if let Some(architecture) = picked {
                        self.controller.select_architecture(architecture);
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(6.0, 9.0),
                        6.0,
                        status.badge_color,
                    );
                    ui.add_space(16.0);
                    ui.label(RichText::new(&status.badge_label).strong());
                    ui.separator();
                    ui.label(&status.text);
                });
                ui.collapsing("Log", |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(120.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.label(RichText::new(status.log_text()).monospace().small());
                        });
                });
            });
    }

    fn render_explainer(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let step = self.controller.current_step();
        let StepperState {
            architecture,
            step_index: index,
        } = self.controller.stepper().state();
        let count = self.controller.stepper().step_count();
        let at_first = self.controller.stepper().is_first();
        let at_last = self.controller.stepper().is_last();

        ui.horizontal(|ui| {
            ui.heading(step.title);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let position = format!("Step {} of {count}", index + 1);
                ui.label(RichText::new(position).color(palette.text_muted));
            });
        });
        ui.label(step.explanation);
        if let Some(formula) = step.formula {
            ui.add_space(4.0);
            ui.label(RichText::new(formula).monospace().color(palette.accent_copper));
        }
        if let Some(reading) = step.formula_explanation {
            ui.label(RichText::new(reading).italics().color(palette.text_muted));
        }
        ui.add_space(6.0);
        let steps = crate::catalog::steps_for(architecture);
        ui.horizontal(|ui| {
            let prev = ui.add_enabled(!at_first, egui::Button::new("◀ Previous"));
            if prev.clicked() {
                self.controller.previous_step();
            }
            for (dot, descriptor) in steps.iter().enumerate() {
                let glyph = if dot == index { "●" } else { "○" };
                let response = ui
                    .add(egui::Button::new(glyph).frame(false))
                    .on_hover_text(descriptor.title);
                if response.clicked() {
                    self.controller.go_to_step(dot);
                }
            }
            let next = ui.add_enabled(!at_last, egui::Button::new("Next ▶"));
            if next.clicked() {
                self.controller.next_step();
            }
        });
        ui.separator();
        diagram::render(ui, architecture, step);
    }

    fn render_training_panel(&mut self, ui: &mut Ui) {
        ui.heading("Training");
        let simulator = self.controller.simulator();
        let status = simulator.status();
        let params = simulator.params();

        let mut epochs = params.epoch_count();
        let slider = egui::Slider::new(&mut epochs, MIN_EPOCHS..=MAX_EPOCHS)
            .step_by(f64::from(EPOCH_STEP))
            .text("epochs");
        let epochs_changed = ui.add(slider).changed();

        let mut rate = params.learning_rate();
        ui.horizontal(|ui| {
            ui.label("Learning rate");
            for option in LearningRate::ALL {
                ui.radio_value(&mut rate, option, option.to_string());
            }
        });
        if epochs_changed {
            self.controller.set_epoch_count(epochs);
        }
        if rate != params.learning_rate() {
            self.controller.set_learning_rate(rate);
        }

        ui.horizontal(|ui| {
            let start_label = match status {
                TrainingStatus::Idle => "Train",
                _ => "Restart",
            };
            if ui.button(start_label).clicked() {
                self.controller.start_training();
            }
            let running = status == TrainingStatus::Running;
            if ui.add_enabled(running, egui::Button::new("Skip ahead")).clicked() {
                self.controller.finish_training_now();
            }
            if ui
                .add_enabled(status != TrainingStatus::Idle, egui::Button::new("Reset"))
                .clicked()
            {
                self.controller.reset_training();
            }
        });

        let simulator = self.controller.simulator();
        let progress = (simulator.progress_percent() / 100.0) as f32;
        ui.add(egui::ProgressBar::new(progress).show_percentage());
        ui.horizontal(|ui| {
            ui.label(simulator.status().label());
            if let Some(sample) = simulator.last_sample() {
                ui.separator();
                ui.label(format!(
                    "epoch {}  loss {:.3}  accuracy {:.3}",
                    sample.epoch, sample.loss, sample.accuracy
                ));
            }
        });
        chart::render(ui, simulator.history());
    }

    fn render_generation_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("Generate");
        let gate = self.controller.gate();
        match gate.pending_quality() {
            Some(score) => ui.label(format!(
                "Model ready: quality {score} ({})",
                QualityBand::from_score(score).label()
            )),
            None => ui.label(
                RichText::new("Train a model to unlock generation").color(palette.text_muted),
            ),
        };
        ui.add(
            egui::TextEdit::multiline(&mut self.controller.ui.generation_input)
                .hint_text("Start a sentence…")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        let can_submit = self.controller.gate().can_submit()
            && !self.controller.ui.generation_input.trim().is_empty();
        ui.horizontal(|ui| {
            if ui.add_enabled(can_submit, egui::Button::new("Generate")).clicked() {
                self.controller.submit_generation();
            }
            if self.controller.gate().is_in_flight() {
                ui.spinner();
            }
        });
        if let Some(result) = self.controller.gate().last_result() {
            ui.separator();
            ui.label(RichText::new(&result.input_text).color(palette.text_muted));
            let generated = if result.is_failure() {
                RichText::new(&result.generated_text).color(palette.warning)
            } else {
                RichText::new(&result.generated_text).color(palette.accent_ice)
            };
            ui.label(generated);
            ui.label(RichText::new(&result.explanation_text).small());
            ui.label(format!(
                "Quality {} ({})",
                result.quality_score,
                QualityBand::from_score(result.quality_score).label()
            ));
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, next_tick: Option<Instant>) {
        if let Some(deadline) = next_tick {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
        if self.controller.generation_in_progress() {
            ctx.request_repaint_after(JOB_POLL_INTERVAL);
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        let next_tick = self.controller.tick(Instant::now());
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) && !ctx.wants_keyboard_input() {
            self.controller.next_step();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) && !ctx.wants_keyboard_input() {
            self.controller.previous_step();
        }
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::SidePanel::right("training")
            .resizable(false)
            .min_width(340.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_training_panel(ui);
                    ui.separator();
                    self.render_generation_panel(ui);
                });
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_explainer(ui);
        });
        self.schedule_repaint(ctx, next_tick);
    }
}
