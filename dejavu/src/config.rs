//! Batch configuration and validation.

use thiserror::Error;

/// Invalid parameter combinations, caught at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A similarity aggregate was given a different number of weights than
    /// computers.
    #[error("{computers} similarity computers but {weights} weights")]
    WeightCountMismatch {
        /// Number of computers handed to the aggregate.
        computers: usize,
        /// Number of weights handed to the aggregate.
        weights: usize,
    },
    /// Aggregate weights must sum to 1.0 (within a small tolerance).
    #[error("similarity weights sum to {sum}, expected 1.0")]
    WeightSum {
        /// The actual sum.
        sum: f64,
    },
    /// A scalar parameter fell outside its legal interval.
    #[error("{name} {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Which parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The merge threshold must stay below the neighborhood size, or no two
    /// descriptors could ever share enough neighbors to merge.
    #[error("merge threshold {kt} must be below neighborhood size {k}")]
    MergeThreshold {
        /// Requested merge threshold.
        kt: usize,
        /// Requested neighborhood size.
        k: usize,
    },
}

/// Tuning knobs for a clustering batch.
///
/// The defaults are the ones that work well on web-page corpora: a fairly
/// strict similarity cutoff, a generous neighborhood, a low merge bar, and
/// structure dominating style four to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchConfig {
    /// Minimum gross similarity for one document to count as a neighbor of
    /// another (τ).
    pub similarity_threshold: f64,
    /// Maximum neighborhood size per document (k).
    pub neighbors: usize,
    /// Minimum number of shared neighbors for two clusters to merge (kt).
    pub merge_threshold: usize,
    /// Weight of structural similarity in the gross score; style gets the
    /// complement.
    pub structure_weight: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            neighbors: 100,
            merge_threshold: 3,
            structure_weight: 0.8,
        }
    }
}

impl BatchConfig {
    /// Check every parameter against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "similarity threshold",
                value: self.similarity_threshold,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.neighbors == 0 {
            return Err(ConfigError::OutOfRange {
                name: "neighborhood size",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        if self.merge_threshold >= self.neighbors {
            return Err(ConfigError::MergeThreshold {
                kt: self.merge_threshold,
                k: self.neighbors,
            });
        }
        if !(0.0..=1.0).contains(&self.structure_weight) {
            return Err(ConfigError::OutOfRange {
                name: "structure weight",
                value: self.structure_weight,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}
