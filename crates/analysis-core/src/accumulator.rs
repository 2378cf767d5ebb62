//! Score accumulation shared by the category scorers.
//!
//! Each scorer collects independent votes into a running sum and keeps a
//! separate count of the components that were actually scored. Only the
//! branches that count a component move the divisor; informational lines can
//! be added without touching it.

use crate::CategoryScore;

/// Clamp a score into [-1.0, 1.0]. NaN collapses to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    sum: f64,
    components_scored: u32,
    insights: Vec<String>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a component and add its contribution.
    pub fn vote(&mut self, contribution: f64) -> &mut Self {
        self.sum += contribution;
        self.components_scored += 1;
        self
    }

    /// Count a component that landed in its neutral range.
    pub fn count_only(&mut self) -> &mut Self {
        self.components_scored += 1;
        self
    }

    /// Add a contribution without counting a new component.
    pub fn add(&mut self, contribution: f64) -> &mut Self {
        self.sum += contribution;
        self
    }

    pub fn insight(&mut self, line: impl Into<String>) -> &mut Self {
        self.insights.push(line.into());
        self
    }

    pub fn components_scored(&self) -> u32 {
        self.components_scored
    }

    /// Average over counted components, clamped. Zero when nothing was counted.
    pub fn finish(self) -> CategoryScore {
        let score = if self.components_scored > 0 {
            clamp_unit(self.sum / self.components_scored as f64)
        } else {
            0.0
        };
        CategoryScore {
            score,
            insights: self.insights,
        }
    }
}
