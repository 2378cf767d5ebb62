use crate::{Category, CategoryScore};

/// Trait for per-category scorers.
///
/// Scorers are pure: the same input always yields the same score and insights.
pub trait CategoryScorer<I: ?Sized>: Send + Sync {
    fn category(&self) -> Category;

    fn score(&self, input: &I) -> CategoryScore;
}
