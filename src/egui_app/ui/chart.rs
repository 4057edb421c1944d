//! Loss and accuracy plot for the retained training history.

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use super::style;
use crate::training::{MetricHistory, MetricSample};

const CHART_HEIGHT: f32 = 160.0;
const MARGIN: f32 = 6.0;

pub(crate) fn render(ui: &mut Ui, history: &MetricHistory) {
    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let palette = style::palette();
    let outer = response.rect;
    painter.rect_filled(outer, 0.0, palette.bg_primary);
    let plot = outer.shrink(MARGIN);
    for fraction in [0.25_f32, 0.5, 0.75] {
        let y = plot.bottom() - fraction * plot.height();
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, palette.grid_soft),
        );
    }

    let samples = history.to_vec();
    if samples.is_empty() {
        painter.text(
            plot.center(),
            Align2::CENTER_CENTER,
            "No training data yet",
            FontId::proportional(12.0),
            palette.text_muted,
        );
        return;
    }
    let loss = plot_points(&samples, plot, |sample| sample.loss);
    let accuracy = plot_points(&samples, plot, |sample| sample.accuracy);
    painter.add(egui::Shape::line(loss, style::loss_line()));
    painter.add(egui::Shape::line(accuracy, style::accuracy_line()));
    painter.text(
        plot.left_top(),
        Align2::LEFT_TOP,
        "loss",
        FontId::proportional(11.0),
        style::loss_line().color,
    );
    painter.text(
        plot.left_top() + Vec2::new(0.0, 14.0),
        Align2::LEFT_TOP,
        "accuracy",
        FontId::proportional(11.0),
        style::accuracy_line().color,
    );
}

/// Screen positions for `value` of each sample; epochs span the plot width
/// and values in `[0, 1]` span its height.
pub(crate) fn plot_points(
    samples: &[MetricSample],
    plot: Rect,
    value: impl Fn(&MetricSample) -> f64,
) -> Vec<Pos2> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let span = last.epoch.saturating_sub(first.epoch).max(1) as f32;
    samples
        .iter()
        .map(|sample| {
            let x = (sample.epoch - first.epoch) as f32 / span;
            let y = value(sample).clamp(0.0, 1.0) as f32;
            Pos2::new(
                plot.left() + x * plot.width(),
                plot.bottom() - y * plot.height(),
            )
        })
        .collect()
}
