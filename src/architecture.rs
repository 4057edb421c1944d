//! The three network architectures the demonstrator compares.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Network architecture selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// Plain feed-forward network (multi-layer perceptron).
    #[default]
    FeedForward,
    /// Simple recurrent network.
    Recurrent,
    /// Long short-term memory network.
    Lstm,
}

impl Architecture {
    /// Every architecture in display order.
    pub const ALL: [Architecture; 3] = [Self::FeedForward, Self::Recurrent, Self::Lstm];

    /// Human-readable name for selectors and headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::FeedForward => "Feed-forward (MLP)",
            Self::Recurrent => "Recurrent (RNN)",
            Self::Lstm => "Long short-term memory (LSTM)",
        }
    }

    /// Short tag used on the wire and in logs.
    pub fn tag(self) -> &'static str {
        match self {
            Self::FeedForward => "mlp",
            Self::Recurrent => "rnn",
            Self::Lstm => "lstm",
        }
    }

    /// Delay between simulated training ticks.
    ///
    /// Purely cosmetic: heavier architectures "train" visibly slower.
    pub fn tick_interval(self) -> Duration {
        match self {
            Self::FeedForward => Duration::from_millis(60),
            Self::Recurrent => Duration::from_millis(100),
            Self::Lstm => Duration::from_millis(140),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_pacing_orders_feed_forward_fastest() {
        let feed_forward = Architecture::FeedForward.tick_interval();
        assert!(feed_forward < Architecture::Recurrent.tick_interval());
        assert!(Architecture::Recurrent.tick_interval() < Architecture::Lstm.tick_interval());
    }

    #[test]
    fn serializes_as_snake_case_tag() {
        let json = serde_json::to_string(&Architecture::FeedForward).unwrap();
        assert_eq!(json, "\"feed_forward\"");
        let parsed: Architecture = serde_json::from_str("\"lstm\"").unwrap();
        assert_eq!(parsed, Architecture::Lstm);
    }
}
