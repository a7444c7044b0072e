//! Analytic size estimator over a uniformly dense dataset.
//!
//! Models the point cloud as covering a rectangular extent with a constant
//! density at its finest octree level. Every coarser level holds a quarter of
//! the points of the level below it.

use ahn_laz_core::{SelectionRequest, SizeEstimate};
use async_trait::async_trait;
use tracing::debug;

use crate::traits::SizeEstimator;

/// Axis-aligned rectangle in dataset coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Area shared by this extent and the selection; 0 when disjoint.
    #[must_use]
    pub fn overlap_area(&self, request: &SelectionRequest) -> f64 {
        let width = self.max_x.min(request.max_x()) - self.min_x.max(request.min_x());
        let height = self.max_y.min(request.max_y()) - self.min_y.max(request.min_y());
        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }
}

/// Parameters of the density model.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Bounds of the indexed point cloud.
    pub extent: Extent,
    /// Deepest octree level; requests above it are treated as this level.
    pub finest_level: u32,
    /// Points per square unit at `finest_level`.
    pub points_per_unit_area: f64,
    /// Point budget used to pick the recommended level.
    pub target_points: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        // AHN2 coverage of the Netherlands in RD New (EPSG:28992).
        Self {
            extent: Extent {
                min_x: 13_427.0,
                min_y: 306_859.0,
                max_x: 278_000.0,
                max_y: 611_943.0,
            },
            finest_level: 13,
            points_per_unit_area: 8.0,
            target_points: 10_000_000,
        }
    }
}

/// [`SizeEstimator`] backed by [`EstimatorConfig`]. Pure and idempotent.
#[derive(Debug, Clone)]
pub struct DensitySizeEstimator {
    config: EstimatorConfig,
}

impl DensitySizeEstimator {
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    // Float-to-int casts saturate; negative densities clamp to 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn points_at(&self, covered_area: f64, level: u32) -> u64 {
        let depth = self.config.finest_level - level.min(self.config.finest_level);
        let divisor = 4f64.powi(i32::try_from(depth).unwrap_or(i32::MAX));
        (covered_area * self.config.points_per_unit_area / divisor).round() as u64
    }

    /// Sync core of [`SizeEstimator::estimate`].
    #[must_use]
    pub fn estimate_now(&self, request: &SelectionRequest) -> SizeEstimate {
        let covered = self.config.extent.overlap_area(request);
        // Extents this small make the area underflow to 0.
        let area = request.area();
        let coverage = if area > 0.0 {
            (covered / area * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let points = self.points_at(covered, request.level());
        let recommended_level = (0..=self.config.finest_level)
            .rev()
            .find(|&level| self.points_at(covered, level) <= self.config.target_points)
            .unwrap_or(0);

        debug!(points, recommended_level, coverage, "estimated selection size");
        SizeEstimate::new(points, recommended_level, coverage)
    }
}

#[async_trait]
impl SizeEstimator for DensitySizeEstimator {
    async fn estimate(&self, request: &SelectionRequest) -> anyhow::Result<SizeEstimate> {
        Ok(self.estimate_now(request))
    }
}
