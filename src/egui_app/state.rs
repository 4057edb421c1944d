//! Plain UI state mutated by the controller and read by the renderer.

use crate::egui_app::ui::style::{self, StatusTone};
use egui::Color32;

/// Oldest status lines are dropped beyond this count.
const STATUS_LOG_LIMIT: usize = 50;

/// Top-level UI state.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// Text typed into the generation prompt box.
    pub generation_input: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            generation_input: String::new(),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    pub tone: StatusTone,
    /// Rolling status log entries, oldest first.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Default status shown at launch.
    pub fn idle() -> Self {
        let (label, color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Pick an architecture and train a model".into(),
            badge_label: label.into(),
            badge_color: color,
            tone: StatusTone::Idle,
            log: Vec::new(),
        }
    }

    /// Replace the visible message and append it to the log.
    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.text = text.into();
        self.badge_label = label.into();
        self.badge_color = color;
        self.tone = tone;
        self.log.push(self.text.clone());
        if self.log.len() > STATUS_LOG_LIMIT {
            let excess = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    /// Concatenate log entries into a single displayable string.
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut status = StatusBarState::idle();
        for idx in 0..(STATUS_LOG_LIMIT + 7) {
            status.set(format!("message {idx}"), StatusTone::Info);
        }
        assert_eq!(status.log.len(), STATUS_LOG_LIMIT);
        assert_eq!(status.log.first().map(String::as_str), Some("message 7"));
        assert_eq!(status.text, format!("message {}", STATUS_LOG_LIMIT + 6));
        assert_eq!(status.badge_label, "Info");
    }
}
