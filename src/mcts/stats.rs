//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one decision.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations that completed and were backpropagated.
    pub iterations: u32,

    /// Iterations dropped because a simulated step failed.
    pub abandoned: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Rollouts played.
    pub rollouts: u32,

    /// Deepest tree node reached.
    pub max_depth: u16,

    /// Wall time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Share of started iterations that had to be dropped.
    #[must_use]
    pub fn abandon_rate(&self) -> f64 {
        let started = self.iterations + self.abandoned;
        if started == 0 {
            0.0
        } else {
            self.abandoned as f64 / started as f64
        }
    }
}
