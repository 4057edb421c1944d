use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_strong: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_mint: Color32,
    pub accent_ice: Color32,
    pub accent_copper: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(10, 10, 12),
        bg_secondary: Color32::from_rgb(26, 28, 30),
        bg_tertiary: Color32::from_rgb(42, 44, 48),
        panel_outline: Color32::from_rgb(38, 42, 48),
        grid_strong: Color32::from_rgb(56, 60, 66),
        grid_soft: Color32::from_rgb(30, 32, 36),
        text_primary: Color32::from_rgb(185, 192, 200),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent_mint: Color32::from_rgb(127, 255, 212),
        accent_ice: Color32::from_rgb(167, 217, 255),
        accent_copper: Color32::from_rgb(195, 165, 122),
        warning: Color32::from_rgb(200, 128, 96),
        success: Color32::from_rgb(102, 176, 136),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_strong;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    set_rectilinear(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

pub fn status_badge(tone: StatusTone) -> (&'static str, Color32) {
    match tone {
        StatusTone::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Working", Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info", Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error", Color32::from_rgb(192, 57, 43)),
    }
}

/// Colors of diagram elements by emphasis.
pub(crate) fn diagram_fill(emphasis: super::diagram::Emphasis) -> Color32 {
    let palette = palette();
    match emphasis {
        super::diagram::Emphasis::Highlighted => palette.accent_mint,
        super::diagram::Emphasis::Normal => palette.accent_ice.gamma_multiply(0.55),
        super::diagram::Emphasis::Faded => palette.grid_strong.gamma_multiply(0.5),
    }
}

pub(crate) fn diagram_stroke(emphasis: super::diagram::Emphasis) -> Stroke {
    let width = match emphasis {
        super::diagram::Emphasis::Highlighted => 2.5,
        super::diagram::Emphasis::Normal => 1.2,
        super::diagram::Emphasis::Faded => 0.8,
    };
    Stroke::new(width, diagram_fill(emphasis))
}

pub(crate) fn loss_line() -> Stroke {
    Stroke::new(2.0, palette().warning)
}

pub(crate) fn accuracy_line() -> Stroke {
    Stroke::new(2.0, palette().success)
}
