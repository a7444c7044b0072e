use serde::{Deserialize, Serialize};

/// Approximate size of a selection, produced by a size estimator.
///
/// Only used for the admission decision; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeEstimate {
    /// Estimated number of points the selection would yield at its level.
    pub approximate_point_count: u64,
    /// Finest level whose estimate stays within the estimator's target.
    pub recommended_level: u32,
    /// Percentage (0-100) of the selection covered by indexed data.
    pub coverage: f64,
}

impl SizeEstimate {
    #[must_use]
    pub fn new(approximate_point_count: u64, recommended_level: u32, coverage: f64) -> Self {
        Self {
            approximate_point_count,
            recommended_level,
            coverage,
        }
    }

    /// Returns `true` if the estimate exceeds `max_allowed_points`.
    ///
    /// The ceiling itself is allowed: a count equal to it is not exceeded.
    #[must_use]
    pub fn exceeds(&self, max_allowed_points: u64) -> bool {
        self.approximate_point_count > max_allowed_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exceeds_is_strict() {
        let estimate = SizeEstimate::new(3_213_414, 13, 100.0);
        assert!(estimate.exceeds(3_213_413));
        assert!(!estimate.exceeds(3_213_414));
        assert!(!estimate.exceeds(u64::MAX));
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(SizeEstimate::new(42, 9, 55.5)).unwrap();
        assert_eq!(value["approximatePointCount"], 42);
        assert_eq!(value["recommendedLevel"], 9);
        assert_eq!(value["coverage"], 55.5);
    }
}
