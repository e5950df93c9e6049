//! Similarity computers.
//!
//! Every computer maps a document pair to `[0.0, 1.0]`: 1.0 identical,
//! 0.0 maximally dissimilar. The trait makes no symmetry promise; each
//! implementation documents its own. [`GrossSim`] is the composite that
//! blends several computers with fixed weights.

use crate::config::ConfigError;
use crate::document::Document;
use tedium::{EditCost, SquareMatrix, UnitCost, tree_distance};
use tedium::matrix::MatrixError;

/// Maps a pair of documents to a similarity score in `[0.0, 1.0]`.
pub trait SimilarityComputer: Send + Sync {
    /// Similarity of `a` and `b`; 1.0 means identical under this measure.
    fn compute(&self, a: &Document, b: &Document) -> f64;
}

/// Structural similarity: tree edit distance normalized by the theoretical
/// worst case (replacing every node of both trees).
///
/// Symmetric whenever the cost policy is.
#[derive(Debug, Default)]
pub struct StructureSim<C: EditCost = UnitCost> {
    cost: C,
}

impl<C: EditCost> StructureSim<C> {
    /// A structural computer using the given cost policy.
    pub fn new(cost: C) -> Self {
        Self { cost }
    }

    /// Normalize an already-computed distance against the sizes of the two
    /// trees it came from: `1 - d / (max_unit_cost * (size1 + size2))`.
    pub fn from_distance(&self, distance: f64, size1: usize, size2: usize) -> f64 {
        1.0 - distance / (self.cost.max_unit_cost() * (size1 + size2) as f64)
    }

    /// Rescore a whole distance matrix into a similarity matrix.
    ///
    /// `sizes[i]` is the node count of the tree behind row/column `i`.
    pub fn matrix_from_distances(
        &self,
        sizes: &[usize],
        distances: &SquareMatrix,
    ) -> Result<SquareMatrix, MatrixError> {
        if sizes.len() != distances.order() {
            return Err(MatrixError::DimensionMismatch {
                expected: distances.order(),
                got: sizes.len(),
            });
        }
        let n = sizes.len();
        let mut sim = SquareMatrix::zeroed(n);
        for i in 0..n {
            for j in 0..n {
                sim.set(i, j, self.from_distance(distances.get(i, j), sizes[i], sizes[j]));
            }
        }
        Ok(sim)
    }
}

impl<C: EditCost + Send + Sync> SimilarityComputer for StructureSim<C> {
    fn compute(&self, a: &Document, b: &Document) -> f64 {
        let distance = tree_distance(&a.tree, &b.tree, &self.cost);
        self.from_distance(distance, a.size(), b.size())
    }
}

/// Style similarity: Jaccard index of the two documents' class-token sets.
///
/// Two documents with no class markers at all are maximally similar (1.0);
/// absence of style agrees with absence of style. Symmetric.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleSim;

impl SimilarityComputer for StyleSim {
    fn compute(&self, a: &Document, b: &Document) -> f64 {
        let size_a = a.classes.len();
        let size_b = b.classes.len();
        if size_a == 0 && size_b == 0 {
            return 1.0;
        }
        let shared = a.classes.intersection(&b.classes).count();
        shared as f64 / (size_a + size_b - shared) as f64
    }
}

/// Tolerance for the weights-sum-to-one invariant.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Weighted aggregate of several similarity computers.
///
/// `compute` returns `Σ weight_k · computer_k(a, b)`; construction enforces
/// matching computer/weight counts and weights summing to 1.0 within 1e-3.
pub struct GrossSim {
    computers: Vec<Box<dyn SimilarityComputer>>,
    weights: Vec<f64>,
}

impl GrossSim {
    /// Aggregate `computers` with the given `weights`.
    pub fn new(
        computers: Vec<Box<dyn SimilarityComputer>>,
        weights: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        if computers.len() != weights.len() {
            return Err(ConfigError::WeightCountMismatch {
                computers: computers.len(),
                weights: weights.len(),
            });
        }
        let sum: f64 = weights.iter().sum();
        if (1.0 - sum).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(Self { computers, weights })
    }

    /// The canonical web-document aggregator: structural similarity under
    /// unit costs weighted `structure_weight`, style similarity weighted
    /// `1 - structure_weight`.
    pub fn web(structure_weight: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&structure_weight) {
            return Err(ConfigError::OutOfRange {
                name: "structure weight",
                value: structure_weight,
                min: 0.0,
                max: 1.0,
            });
        }
        Self::new(
            vec![
                Box::new(StructureSim::new(UnitCost)),
                Box::new(StyleSim),
            ],
            vec![structure_weight, 1.0 - structure_weight],
        )
    }
}

impl SimilarityComputer for GrossSim {
    fn compute(&self, a: &Document, b: &Document) -> f64 {
        self.computers
            .iter()
            .zip(&self.weights)
            .map(|(computer, weight)| weight * computer.compute(a, b))
            .sum()
    }
}
