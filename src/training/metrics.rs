use std::collections::VecDeque;

use super::curve::round3;

/// Maximum number of samples kept for charting.
pub const HISTORY_CAP: usize = 50;

/// One simulated epoch's metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSample {
    /// 1-based epoch number.
    pub epoch: u32,
    /// Loss rounded to three decimals, in `[0, 1]`.
    pub loss: f64,
    /// `round(1 - loss, 3)`, in `[0, 1]`.
    pub accuracy: f64,
}

impl MetricSample {
    /// Build a sample from a clamped loss, rounding both metrics.
    pub fn from_loss(epoch: u32, loss: f64) -> Self {
        let loss = round3(loss.clamp(0.0, 1.0));
        Self {
            epoch,
            loss,
            accuracy: round3(1.0 - loss),
        }
    }
}

/// Ordered, capped sample history; the oldest samples are evicted first.
#[derive(Clone, Debug)]
pub struct MetricHistory {
    samples: VecDeque<MetricSample>,
    cap: usize,
}

impl MetricHistory {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, sample: MetricSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.cap {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&MetricSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MetricSample> + '_ {
        self.samples.iter()
    }

    /// Copy of the history, oldest first.
    pub fn to_vec(&self) -> Vec<MetricSample> {
        self.samples.iter().copied().collect()
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}
