//! LSTM cell walkthrough.

use super::StepDescriptor;

pub const CELL_STATE: &str = "cell-state";
pub const HIDDEN_STATE: &str = "hidden-state";
pub const INPUT: &str = "input";
pub const PREV_HIDDEN: &str = "prev-hidden";
pub const FORGET_GATE: &str = "forget-gate";
pub const INPUT_GATE: &str = "input-gate";
pub const CANDIDATE: &str = "candidate";
pub const OUTPUT_GATE: &str = "output-gate";
pub const FORGET_MULTIPLY: &str = "forget-multiply";
pub const INPUT_MULTIPLY: &str = "input-multiply";
pub const CELL_ADD: &str = "cell-add";
pub const OUTPUT_TANH: &str = "output-tanh";
pub const OUTPUT_MULTIPLY: &str = "output-multiply";

pub const ELEMENTS: &[&str] = &[
    CELL_STATE,
    HIDDEN_STATE,
    INPUT,
    PREV_HIDDEN,
    FORGET_GATE,
    INPUT_GATE,
    CANDIDATE,
    OUTPUT_GATE,
    FORGET_MULTIPLY,
    INPUT_MULTIPLY,
    CELL_ADD,
    OUTPUT_TANH,
    OUTPUT_MULTIPLY,
];

const GATES: &[&str] = &[FORGET_GATE, INPUT_GATE, CANDIDATE, OUTPUT_GATE];

pub const STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        title: "Two kinds of memory",
        explanation: "An LSTM cell carries two vectors from step to step: the cell state, a \
            long-term memory lane, and the hidden state, its short-term working output.",
        formula: None,
        formula_explanation: None,
        highlighted: &[CELL_STATE, HIDDEN_STATE],
        faded: None,
        view: None,
    },
    StepDescriptor {
        title: "The cell state conveyor",
        explanation: "The cell state runs straight through the cell with only small, \
            controlled edits. Because information can travel along it almost unchanged, \
            gradients survive across many time steps.",
        formula: None,
        formula_explanation: None,
        highlighted: &[CELL_STATE],
        faded: Some(GATES),
        view: None,
    },
    StepDescriptor {
        title: "Forget gate",
        explanation: "The forget gate looks at the previous hidden state and the current \
            input and outputs a number between 0 and 1 for every cell-state entry: 1 keeps it, \
            0 erases it.",
        formula: Some("fₜ = σ(W_f·[hₜ₋₁, xₜ] + b_f)"),
        formula_explanation: Some("σ squashes values into (0, 1), acting as a soft switch."),
        highlighted: &[FORGET_GATE, FORGET_MULTIPLY, PREV_HIDDEN, INPUT],
        faded: Some(&[INPUT_GATE, CANDIDATE, OUTPUT_GATE]),
        view: None,
    },
    StepDescriptor {
        title: "Input gate and candidate",
        explanation: "A tanh layer proposes new candidate values, and the input gate decides \
            how much of each proposal is actually written into memory.",
        formula: Some(
            "iₜ = σ(W_i·[hₜ₋₁, xₜ] + b_i)     C̃ₜ = tanh(W_c·[hₜ₋₁, xₜ] + b_c)",
        ),
        formula_explanation: None,
        highlighted: &[INPUT_GATE, CANDIDATE, INPUT_MULTIPLY],
        faded: Some(&[FORGET_GATE, OUTPUT_GATE]),
        view: None,
    },
    StepDescriptor {
        title: "Updating the cell state",
        explanation: "The old memory is scaled by the forget gate and the gated candidate is \
            added on top. Addition, rather than repeated multiplication, is what keeps the \
            long-term signal alive.",
        formula: Some("Cₜ = fₜ ⊙ Cₜ₋₁ + iₜ ⊙ C̃ₜ"),
        formula_explanation: Some("⊙ is element-wise multiplication."),
        highlighted: &[CELL_STATE, FORGET_MULTIPLY, INPUT_MULTIPLY, CELL_ADD],
        faded: Some(&[OUTPUT_GATE, OUTPUT_TANH, OUTPUT_MULTIPLY]),
        view: None,
    },
    StepDescriptor {
        title: "Output gate",
        explanation: "Finally the output gate chooses which parts of the squashed cell state \
            become the new hidden state, the value passed to the next step and to any output \
            layer.",
        formula: Some("oₜ = σ(W_o·[hₜ₋₁, xₜ] + b_o)     hₜ = oₜ ⊙ tanh(Cₜ)"),
        formula_explanation: None,
        highlighted: &[OUTPUT_GATE, OUTPUT_TANH, OUTPUT_MULTIPLY, HIDDEN_STATE],
        faded: Some(&[FORGET_GATE, INPUT_GATE, CANDIDATE]),
        view: None,
    },
    StepDescriptor {
        title: "Why it remembers",
        explanation: "Learned gates let the cell hold on to a fact for hundreds of steps and \
            drop it when it stops being useful. That is why LSTMs outperform simple RNNs on \
            long sequences, at the price of four times as many weights.",
        formula: None,
        formula_explanation: None,
        highlighted: &[CELL_STATE, FORGET_GATE, INPUT_GATE, OUTPUT_GATE],
        faded: None,
        view: None,
    },
];
