//! Feed-forward (MLP) walkthrough.

use super::StepDescriptor;

pub const INPUT_LAYER: &str = "input-layer";
pub const HIDDEN_LAYER_1: &str = "hidden-layer-1";
pub const HIDDEN_LAYER_2: &str = "hidden-layer-2";
pub const OUTPUT_LAYER: &str = "output-layer";
pub const WEIGHTS_INPUT_HIDDEN: &str = "weights-input-hidden";
pub const WEIGHTS_HIDDEN_HIDDEN: &str = "weights-hidden-hidden";
pub const WEIGHTS_HIDDEN_OUTPUT: &str = "weights-hidden-output";
pub const LOSS: &str = "loss";

pub const ELEMENTS: &[&str] = &[
    INPUT_LAYER,
    HIDDEN_LAYER_1,
    HIDDEN_LAYER_2,
    OUTPUT_LAYER,
    WEIGHTS_INPUT_HIDDEN,
    WEIGHTS_HIDDEN_HIDDEN,
    WEIGHTS_HIDDEN_OUTPUT,
    LOSS,
];

pub const STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        title: "A stack of layers",
        explanation: "A feed-forward network passes information in one direction only: \
            from the input layer, through one or more hidden layers, to the output layer. \
            There are no loops, so each input is processed independently of every other input.",
        formula: None,
        formula_explanation: None,
        highlighted: &[INPUT_LAYER, HIDDEN_LAYER_1, HIDDEN_LAYER_2, OUTPUT_LAYER],
        faded: None,
        view: None,
    },
    StepDescriptor {
        title: "The input layer",
        explanation: "Each input neuron holds one number from the example, such as a pixel \
            brightness or a word feature. The input layer does no computation; it only hands \
            the values to the next layer.",
        formula: Some("x = [x₁, x₂, …, xₙ]"),
        formula_explanation: Some("The input is a vector of n feature values."),
        highlighted: &[INPUT_LAYER],
        faded: Some(&[HIDDEN_LAYER_2, OUTPUT_LAYER, WEIGHTS_HIDDEN_HIDDEN, WEIGHTS_HIDDEN_OUTPUT]),
        view: None,
    },
    StepDescriptor {
        title: "Weighted sums",
        explanation: "Every connection carries a weight. A hidden neuron multiplies each \
            incoming value by its weight, adds them up and adds a bias term.",
        formula: Some("z = W·x + b"),
        formula_explanation: Some(
            "W is the weight matrix between the layers, b the bias vector, z the pre-activation.",
        ),
        highlighted: &[WEIGHTS_INPUT_HIDDEN, HIDDEN_LAYER_1],
        faded: Some(&[HIDDEN_LAYER_2, OUTPUT_LAYER, WEIGHTS_HIDDEN_OUTPUT]),
        view: None,
    },
    StepDescriptor {
        title: "Activation functions",
        explanation: "The weighted sum passes through a non-linear activation. Without it, \
            any number of stacked layers would collapse into a single linear transformation.",
        formula: Some("a = ReLU(z) = max(0, z)"),
        formula_explanation: Some("Negative sums are silenced; positive sums pass through."),
        highlighted: &[HIDDEN_LAYER_1],
        faded: Some(&[INPUT_LAYER, OUTPUT_LAYER]),
        view: None,
    },
    StepDescriptor {
        title: "Going deeper",
        explanation: "The second hidden layer repeats the same recipe on the first layer's \
            activations, building more abstract features out of simpler ones.",
        formula: Some("a⁽²⁾ = ReLU(W⁽²⁾·a⁽¹⁾ + b⁽²⁾)"),
        formula_explanation: None,
        highlighted: &[WEIGHTS_HIDDEN_HIDDEN, HIDDEN_LAYER_2],
        faded: Some(&[INPUT_LAYER, WEIGHTS_INPUT_HIDDEN]),
        view: None,
    },
    StepDescriptor {
        title: "The output layer",
        explanation: "The output layer turns the last hidden activations into a prediction. \
            For classification a softmax converts raw scores into probabilities that sum to one.",
        formula: Some("ŷᵢ = exp(zᵢ) / Σⱼ exp(zⱼ)"),
        formula_explanation: Some("Each class score becomes a probability."),
        highlighted: &[WEIGHTS_HIDDEN_OUTPUT, OUTPUT_LAYER],
        faded: Some(&[INPUT_LAYER, WEIGHTS_INPUT_HIDDEN]),
        view: None,
    },
    StepDescriptor {
        title: "Learning from mistakes",
        explanation: "Training compares the prediction with the true label using a loss \
            function, then backpropagation pushes the error backwards and nudges every weight \
            in the direction that reduces the loss.",
        formula: Some("L = −Σ yᵢ · log(ŷᵢ)     W ← W − η · ∂L/∂W"),
        formula_explanation: Some(
            "Cross-entropy loss, followed by a gradient-descent step with learning rate η.",
        ),
        highlighted: &[
            LOSS,
            WEIGHTS_INPUT_HIDDEN,
            WEIGHTS_HIDDEN_HIDDEN,
            WEIGHTS_HIDDEN_OUTPUT,
        ],
        faded: None,
        view: None,
    },
    StepDescriptor {
        title: "No memory",
        explanation: "Because nothing flows backwards at prediction time, a feed-forward \
            network has no notion of order. Feeding it a sentence word by word, it forgets \
            each word as soon as the next one arrives. Recurrent networks address exactly this.",
        formula: None,
        formula_explanation: None,
        highlighted: &[INPUT_LAYER, OUTPUT_LAYER],
        faded: Some(&[WEIGHTS_INPUT_HIDDEN, WEIGHTS_HIDDEN_HIDDEN, WEIGHTS_HIDDEN_OUTPUT]),
        view: None,
    },
];
