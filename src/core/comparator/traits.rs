//! Trait definitions for comparison strategies.

/// Strategy trait for determining if two images are duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Determine if two images should be considered duplicates based on distance
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Get the threshold used
    fn threshold(&self) -> u32;
}

/// Inclusive threshold comparison: `distance <= threshold` is a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    /// Maximum distance to consider as duplicate
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// Recommended thresholds:
    /// - 0: Only perceptually identical images
    /// - 1: Default, tolerates re-encoding noise
    /// - 5-10: Catches resized or lightly edited copies
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}
