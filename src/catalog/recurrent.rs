//! Recurrent network walkthrough, alternating folded and unrolled views.

use super::{StepDescriptor, ViewVariant};

pub const INPUT: &str = "input";
pub const HIDDEN: &str = "hidden";
pub const OUTPUT: &str = "output";
pub const RECURRENT_LOOP: &str = "recurrent-loop";
pub const WEIGHTS_INPUT: &str = "weights-input";
pub const WEIGHTS_OUTPUT: &str = "weights-output";
pub const INPUT_PREV: &str = "input-prev";
pub const HIDDEN_PREV: &str = "hidden-prev";
pub const OUTPUT_PREV: &str = "output-prev";
pub const INPUT_NEXT: &str = "input-next";
pub const HIDDEN_NEXT: &str = "hidden-next";
pub const OUTPUT_NEXT: &str = "output-next";
pub const TIME_LINKS: &str = "time-links";
pub const GRADIENT_PATH: &str = "gradient-path";

pub const ELEMENTS: &[&str] = &[
    INPUT,
    HIDDEN,
    OUTPUT,
    RECURRENT_LOOP,
    WEIGHTS_INPUT,
    WEIGHTS_OUTPUT,
    INPUT_PREV,
    HIDDEN_PREV,
    OUTPUT_PREV,
    INPUT_NEXT,
    HIDDEN_NEXT,
    OUTPUT_NEXT,
    TIME_LINKS,
    GRADIENT_PATH,
];

pub const STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        title: "A network with a loop",
        explanation: "A recurrent network reads a sequence one element at a time. Its hidden \
            layer feeds its own output back into itself, so what it saw a moment ago influences \
            what it computes now.",
        formula: None,
        formula_explanation: None,
        highlighted: &[HIDDEN, RECURRENT_LOOP],
        faded: None,
        view: Some(ViewVariant::Folded),
    },
    StepDescriptor {
        title: "The hidden state",
        explanation: "At every time step the hidden state mixes the new input with the \
            previous hidden state. This vector is the network's running summary of the \
            sequence so far.",
        formula: Some("hₜ = tanh(Wₓₕ·xₜ + Wₕₕ·hₜ₋₁ + b)"),
        formula_explanation: Some(
            "The new state depends on the current input xₜ and on the previous state hₜ₋₁.",
        ),
        highlighted: &[WEIGHTS_INPUT, HIDDEN, RECURRENT_LOOP],
        faded: Some(&[OUTPUT, WEIGHTS_OUTPUT]),
        view: Some(ViewVariant::Folded),
    },
    StepDescriptor {
        title: "Unrolling through time",
        explanation: "Drawing one copy of the network per time step makes the loop explicit. \
            The arrow between copies is the hidden state being carried forward.",
        formula: None,
        formula_explanation: None,
        highlighted: &[HIDDEN_PREV, HIDDEN, HIDDEN_NEXT, TIME_LINKS],
        faded: Some(&[OUTPUT_PREV, OUTPUT, OUTPUT_NEXT]),
        view: Some(ViewVariant::Unfolded),
    },
    StepDescriptor {
        title: "Shared weights",
        explanation: "Every copy uses exactly the same weights. The network learns one rule \
            for updating its memory and applies it at every position, which is why it can \
            handle sequences of any length.",
        formula: Some("Wₕₕ is identical at t−1, t and t+1"),
        formula_explanation: None,
        highlighted: &[TIME_LINKS, WEIGHTS_INPUT],
        faded: Some(&[OUTPUT_PREV, OUTPUT_NEXT]),
        view: Some(ViewVariant::Unfolded),
    },
    StepDescriptor {
        title: "Producing outputs",
        explanation: "An output can be read from the hidden state at each step, for example \
            the next predicted character, or only once at the end of the sequence.",
        formula: Some("yₜ = softmax(Wₕᵧ·hₜ + c)"),
        formula_explanation: None,
        highlighted: &[OUTPUT_PREV, OUTPUT, OUTPUT_NEXT],
        faded: Some(&[INPUT_PREV, INPUT_NEXT]),
        view: Some(ViewVariant::Unfolded),
    },
    StepDescriptor {
        title: "Vanishing gradients",
        explanation: "Training sends the error backwards through every time step. Each hop \
            multiplies the gradient by the same weights again, so over long sequences it \
            shrinks towards zero and early inputs stop influencing learning. Simple RNNs \
            therefore struggle to remember things for long.",
        formula: Some("∂hₜ/∂h₁ = Πₖ ∂hₖ/∂hₖ₋₁"),
        formula_explanation: Some("A long product of factors below one fades away."),
        highlighted: &[GRADIENT_PATH, HIDDEN_PREV],
        faded: Some(&[INPUT_NEXT, OUTPUT_NEXT, HIDDEN_NEXT]),
        view: Some(ViewVariant::Unfolded),
    },
    StepDescriptor {
        title: "Back to the loop",
        explanation: "Folded or unrolled, it is the same network. Its weakness with long \
            sequences motivates gated designs such as the LSTM.",
        formula: None,
        formula_explanation: None,
        highlighted: &[RECURRENT_LOOP],
        faded: Some(&[INPUT, OUTPUT]),
        view: Some(ViewVariant::Folded),
    },
];
