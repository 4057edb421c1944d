//! Architecture diagrams painted with the egui painter.
//!
//! Layouts are expressed in unit coordinates and scaled into whatever rect the
//! panel hands us. Every shape carries the catalog element id it represents so
//! the current step decides how loudly it is drawn.

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Ui, Vec2};

use super::style;
use crate::architecture::Architecture;
use crate::catalog::{StepDescriptor, ViewVariant, feed_forward as ff, lstm, recurrent as rnn};

/// How strongly an element is drawn for the current step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Highlighted,
    Normal,
    Faded,
}

pub(crate) fn emphasis(step: &StepDescriptor, id: &str) -> Emphasis {
    if step.is_highlighted(id) {
        Emphasis::Highlighted
    } else if step.is_faded(id) {
        Emphasis::Faded
    } else {
        Emphasis::Normal
    }
}

type Point = (f32, f32);

#[derive(Clone, Copy, Debug)]
pub(crate) enum Shape {
    /// Column of neurons centred vertically at `x`.
    Layer {
        x: f32,
        units: usize,
        label: &'static str,
    },
    /// Fully connected weights between two layers.
    Dense { from: (f32, usize), to: (f32, usize) },
    Node { center: Point, label: &'static str },
    Block { center: Point, label: &'static str },
    Op { center: Point, label: &'static str },
    Links(&'static [(Point, Point)]),
    Polyline(&'static [Point]),
    SelfLoop { center: Point },
}

impl Shape {
    fn is_wire(&self) -> bool {
        matches!(
            self,
            Shape::Dense { .. } | Shape::Links(_) | Shape::Polyline(_) | Shape::SelfLoop { .. }
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DiagramItem {
    pub(crate) id: &'static str,
    pub(crate) shape: Shape,
}

const fn item(id: &'static str, shape: Shape) -> DiagramItem {
    DiagramItem { id, shape }
}

const FEED_FORWARD: &[DiagramItem] = &[
    item(ff::WEIGHTS_INPUT_HIDDEN, Shape::Dense { from: (0.1, 3), to: (0.35, 4) }),
    item(ff::WEIGHTS_HIDDEN_HIDDEN, Shape::Dense { from: (0.35, 4), to: (0.6, 4) }),
    item(ff::WEIGHTS_HIDDEN_OUTPUT, Shape::Dense { from: (0.6, 4), to: (0.8, 2) }),
    item(ff::INPUT_LAYER, Shape::Layer { x: 0.1, units: 3, label: "Input" }),
    item(ff::HIDDEN_LAYER_1, Shape::Layer { x: 0.35, units: 4, label: "Hidden 1" }),
    item(ff::HIDDEN_LAYER_2, Shape::Layer { x: 0.6, units: 4, label: "Hidden 2" }),
    item(ff::OUTPUT_LAYER, Shape::Layer { x: 0.8, units: 2, label: "Output" }),
    item(ff::LOSS, Shape::Block { center: (0.94, 0.5), label: "Loss" }),
];

const RECURRENT_FOLDED: &[DiagramItem] = &[
    item(rnn::WEIGHTS_INPUT, Shape::Links(&[((0.5, 0.76), (0.5, 0.58))])),
    item(rnn::WEIGHTS_OUTPUT, Shape::Links(&[((0.5, 0.42), (0.5, 0.24))])),
    item(rnn::RECURRENT_LOOP, Shape::SelfLoop { center: (0.58, 0.5) }),
    item(rnn::INPUT, Shape::Node { center: (0.5, 0.82), label: "x(t)" }),
    item(rnn::HIDDEN, Shape::Node { center: (0.5, 0.5), label: "h(t)" }),
    item(rnn::OUTPUT, Shape::Node { center: (0.5, 0.18), label: "y(t)" }),
];

const RECURRENT_UNFOLDED: &[DiagramItem] = &[
    item(
        rnn::WEIGHTS_INPUT,
        Shape::Links(&[
            ((0.2, 0.76), (0.2, 0.58)),
            ((0.5, 0.76), (0.5, 0.58)),
            ((0.8, 0.76), (0.8, 0.58)),
        ]),
    ),
    item(
        rnn::WEIGHTS_OUTPUT,
        Shape::Links(&[
            ((0.2, 0.42), (0.2, 0.24)),
            ((0.5, 0.42), (0.5, 0.24)),
            ((0.8, 0.42), (0.8, 0.24)),
        ]),
    ),
    item(
        rnn::TIME_LINKS,
        Shape::Links(&[((0.26, 0.5), (0.44, 0.5)), ((0.56, 0.5), (0.74, 0.5))]),
    ),
    item(
        rnn::GRADIENT_PATH,
        Shape::Polyline(&[(0.86, 0.18), (0.86, 0.6), (0.5, 0.6), (0.14, 0.6)]),
    ),
    item(rnn::INPUT_PREV, Shape::Node { center: (0.2, 0.82), label: "x(t-1)" }),
    item(rnn::HIDDEN_PREV, Shape::Node { center: (0.2, 0.5), label: "h(t-1)" }),
    item(rnn::OUTPUT_PREV, Shape::Node { center: (0.2, 0.18), label: "y(t-1)" }),
    item(rnn::INPUT, Shape::Node { center: (0.5, 0.82), label: "x(t)" }),
    item(rnn::HIDDEN, Shape::Node { center: (0.5, 0.5), label: "h(t)" }),
    item(rnn::OUTPUT, Shape::Node { center: (0.5, 0.18), label: "y(t)" }),
    item(rnn::INPUT_NEXT, Shape::Node { center: (0.8, 0.82), label: "x(t+1)" }),
    item(rnn::HIDDEN_NEXT, Shape::Node { center: (0.8, 0.5), label: "h(t+1)" }),
    item(rnn::OUTPUT_NEXT, Shape::Node { center: (0.8, 0.18), label: "y(t+1)" }),
];

const LSTM: &[DiagramItem] = &[
    item(lstm::CELL_STATE, Shape::Links(&[((0.04, 0.2), (0.96, 0.2))])),
    item(
        lstm::HIDDEN_STATE,
        Shape::Polyline(&[(0.84, 0.6), (0.84, 0.86), (0.96, 0.86)]),
    ),
    item(
        lstm::PREV_HIDDEN,
        Shape::Polyline(&[(0.04, 0.86), (0.22, 0.86), (0.22, 0.74)]),
    ),
    item(lstm::INPUT, Shape::Node { center: (0.22, 0.94), label: "x(t)" }),
    item(lstm::FORGET_GATE, Shape::Block { center: (0.3, 0.62), label: "σ forget" }),
    item(lstm::INPUT_GATE, Shape::Block { center: (0.45, 0.62), label: "σ input" }),
    item(lstm::CANDIDATE, Shape::Block { center: (0.6, 0.62), label: "tanh" }),
    item(lstm::OUTPUT_GATE, Shape::Block { center: (0.74, 0.62), label: "σ output" }),
    item(lstm::FORGET_MULTIPLY, Shape::Op { center: (0.3, 0.2), label: "×" }),
    item(lstm::INPUT_MULTIPLY, Shape::Op { center: (0.52, 0.4), label: "×" }),
    item(lstm::CELL_ADD, Shape::Op { center: (0.52, 0.2), label: "+" }),
    item(lstm::OUTPUT_TANH, Shape::Op { center: (0.84, 0.34), label: "tanh" }),
    item(lstm::OUTPUT_MULTIPLY, Shape::Op { center: (0.84, 0.5), label: "×" }),
];

/// Shapes to draw for `architecture` in the requested view.
pub(crate) fn layout(
    architecture: Architecture,
    view: Option<ViewVariant>,
) -> &'static [DiagramItem] {
    match architecture {
        Architecture::FeedForward => FEED_FORWARD,
        Architecture::Recurrent => match view {
            Some(ViewVariant::Unfolded) => RECURRENT_UNFOLDED,
            _ => RECURRENT_FOLDED,
        },
        Architecture::Lstm => LSTM,
    }
}

const NODE_RADIUS: f32 = 16.0;
const UNIT_RADIUS: f32 = 9.0;
const UNIT_SPACING: f32 = 0.14;

pub(crate) fn render(ui: &mut Ui, architecture: Architecture, step: &StepDescriptor) {
    let size = Vec2::new(ui.available_width(), ui.available_height().max(240.0));
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let palette = style::palette();
    painter.rect_filled(rect, 0.0, palette.bg_primary);

    let items = layout(architecture, step.view);
    let wires = items.iter().filter(|item| item.shape.is_wire());
    let bodies = items.iter().filter(|item| !item.shape.is_wire());
    for item in wires.chain(bodies) {
        paint_item(&painter, rect, item, emphasis(step, item.id));
    }
    if let Some(view) = step.view {
        let caption = match view {
            ViewVariant::Folded => "folded",
            ViewVariant::Unfolded => "unrolled in time",
        };
        painter.text(
            rect.left_top() + Vec2::new(8.0, 8.0),
            Align2::LEFT_TOP,
            caption,
            FontId::proportional(12.0),
            palette.text_muted,
        );
    }
}

fn paint_item(painter: &egui::Painter, rect: Rect, item: &DiagramItem, emphasis: Emphasis) {
    let fill = style::diagram_fill(emphasis);
    let stroke = style::diagram_stroke(emphasis);
    let text_color = match emphasis {
        Emphasis::Faded => style::palette().text_muted.gamma_multiply(0.6),
        _ => style::palette().text_primary,
    };
    match item.shape {
        Shape::Layer { x, units, label } => {
            for unit in 0..units {
                let center = to_screen(rect, unit_position(x, units, unit));
                painter.circle_filled(center, UNIT_RADIUS, fill);
            }
            let below = unit_position(x, units, units.saturating_sub(1));
            painter.text(
                to_screen(rect, below) + Vec2::new(0.0, UNIT_RADIUS + 6.0),
                Align2::CENTER_TOP,
                label,
                FontId::proportional(12.0),
                text_color,
            );
        }
        Shape::Dense { from, to } => {
            for a in 0..from.1 {
                for b in 0..to.1 {
                    painter.line_segment(
                        [
                            to_screen(rect, unit_position(from.0, from.1, a)),
                            to_screen(rect, unit_position(to.0, to.1, b)),
                        ],
                        stroke,
                    );
                }
            }
        }
        Shape::Node { center, label } => {
            let center = to_screen(rect, center);
            painter.circle_filled(center, NODE_RADIUS, fill);
            label_below(painter, center, NODE_RADIUS, label, text_color);
        }
        Shape::Block { center, label } => {
            let block = Rect::from_center_size(to_screen(rect, center), Vec2::new(64.0, 28.0));
            painter.rect_filled(block, 3.0, fill.gamma_multiply(0.35));
            painter.rect_stroke(block, 3.0, stroke, egui::StrokeKind::Middle);
            painter.text(
                block.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(12.0),
                text_color,
            );
        }
        Shape::Op { center, label } => {
            let center = to_screen(rect, center);
            painter.circle_stroke(center, 11.0, stroke);
            painter.text(
                center,
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(12.0),
                text_color,
            );
        }
        Shape::Links(links) => {
            for (from, to) in links {
                let from = to_screen(rect, *from);
                let to = to_screen(rect, *to);
                painter.arrow(from, to - from, stroke);
            }
        }
        Shape::Polyline(points) => {
            let points: Vec<Pos2> = points.iter().map(|point| to_screen(rect, *point)).collect();
            painter.add(egui::Shape::line(points, stroke));
        }
        Shape::SelfLoop { center } => {
            let center = to_screen(rect, center) + Vec2::new(NODE_RADIUS, 0.0);
            painter.circle_stroke(center, NODE_RADIUS, stroke);
        }
    }
}

fn label_below(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    label: &str,
    color: egui::Color32,
) {
    painter.text(
        center + Vec2::new(0.0, radius + 4.0),
        Align2::CENTER_TOP,
        label,
        FontId::proportional(12.0),
        color,
    );
}

fn unit_position(x: f32, units: usize, unit: usize) -> Point {
    let offset = unit as f32 - (units.saturating_sub(1)) as f32 / 2.0;
    (x, 0.45 + offset * UNIT_SPACING)
}

fn to_screen(rect: Rect, (x, y): Point) -> Pos2 {
    rect.min + Vec2::new(x * rect.width(), y * rect.height())
}
