//! Static step content for the guided explainer.
//!
//! Each architecture owns an ordered, non-empty list of [`StepDescriptor`]s.
//! Steps reference diagram elements by id; the ids for each architecture are
//! declared next to its steps so the diagram renderer and the catalog agree on
//! a single vocabulary.

use crate::architecture::Architecture;

pub mod feed_forward;
pub mod lstm;
pub mod recurrent;

/// Which rendering of a recurrent diagram a step wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewVariant {
    /// Compact form with the recurrent self-loop.
    Folded,
    /// Network unrolled across consecutive time steps.
    Unfolded,
}

/// One annotated state of the guided explainer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepDescriptor {
    /// Short heading.
    pub title: &'static str,
    /// Body text shown beside the diagram.
    pub explanation: &'static str,
    /// Optional formula rendered in monospace.
    pub formula: Option<&'static str>,
    /// Plain-language reading of the formula.
    pub formula_explanation: Option<&'static str>,
    /// Diagram elements to emphasise.
    pub highlighted: &'static [&'static str],
    /// Diagram elements to de-emphasise.
    pub faded: Option<&'static [&'static str]>,
    /// Requested diagram view, when the architecture has more than one.
    pub view: Option<ViewVariant>,
}

impl StepDescriptor {
    /// True when `element` should be drawn emphasised.
    pub fn is_highlighted(&self, element: &str) -> bool {
        self.highlighted.iter().any(|id| *id == element)
    }

    /// True when `element` should be drawn de-emphasised.
    pub fn is_faded(&self, element: &str) -> bool {
        self.faded
            .is_some_and(|faded| faded.iter().any(|id| *id == element))
    }
}

/// Ordered steps for `architecture`. Never empty.
pub fn steps_for(architecture: Architecture) -> &'static [StepDescriptor] {
    match architecture {
        Architecture::FeedForward => feed_forward::STEPS,
        Architecture::Recurrent => recurrent::STEPS,
        Architecture::Lstm => lstm::STEPS,
    }
}

/// Every diagram element id the renderer draws for `architecture`.
pub fn diagram_elements(architecture: Architecture) -> &'static [&'static str] {
    match architecture {
        Architecture::FeedForward => feed_forward::ELEMENTS,
        Architecture::Recurrent => recurrent::ELEMENTS,
        Architecture::Lstm => lstm::ELEMENTS,
    }
}
