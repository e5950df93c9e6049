//! Pairwise matrices over batches of trees.
//!
//! The matrix build is the dominant cost of a large batch: O(n²) pairwise
//! calls, each roughly quadratic in tree size. Cells are independent, so the
//! off-diagonal pairs are computed on the rayon thread pool; each worker owns
//! a disjoint `(i, j)` pair (with `i < j` for symmetric policies, the mirror
//! cell is written during the sequential fill).

use crate::cost::EditCost;
use crate::debug;
use crate::distance::tree_distance;
use crate::tree::Tree;
use core::fmt;
use rayon::prelude::*;
use thiserror::Error;

/// Errors from the matrix builders.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// A pairwise matrix needs at least two items.
    #[error("at least 2 items are required to build a pairwise matrix, got {got}")]
    TooFewItems {
        /// Number of items supplied.
        got: usize,
    },
    /// Supplied dimensions disagree (e.g. tree sizes vs. matrix order).
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The order implied by the primary input.
        expected: usize,
        /// The order actually supplied.
        got: usize,
    },
}

/// A dense `n × n` table of doubles, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    order: usize,
    cells: Vec<f64>,
}

impl SquareMatrix {
    /// An all-zero matrix of the given order.
    pub fn zeroed(order: usize) -> Self {
        Self {
            order,
            cells: vec![0.0; order * order],
        }
    }

    /// Number of rows (= columns).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.order + col]
    }

    /// Set the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.order + col] = value;
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.order..(row + 1) * self.order]
    }

    /// Row-major iteration over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.order)
    }
}

impl fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{value:5.2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a pairwise matrix by applying `f` to item pairs.
///
/// The diagonal is filled with `diagonal` without invoking `f`. When
/// `symmetric` is true, only cells with `i < j` are computed and mirrored;
/// otherwise every off-diagonal cell is computed. Off-diagonal cells are
/// evaluated in parallel.
pub fn pairwise<T, F>(
    items: &[T],
    diagonal: f64,
    symmetric: bool,
    f: F,
) -> Result<SquareMatrix, MatrixError>
where
    T: Sync,
    F: Fn(&T, &T) -> f64 + Sync,
{
    let n = items.len();
    if n < 2 {
        return Err(MatrixError::TooFewItems { got: n });
    }
    debug!(order = n, symmetric, "pairwise matrix build");

    let pairs: Vec<(usize, usize)> = if symmetric {
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect()
    } else {
        (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .collect()
    };
    let values: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| f(&items[i], &items[j]))
        .collect();

    let mut matrix = SquareMatrix::zeroed(n);
    for i in 0..n {
        matrix.set(i, i, diagonal);
    }
    for (&(i, j), value) in pairs.iter().zip(values) {
        matrix.set(i, j, value);
        if symmetric {
            matrix.set(j, i, value);
        }
    }
    Ok(matrix)
}

/// Tree edit distance matrix for a batch of trees.
///
/// Diagonal cells are zero (a tree against itself costs nothing); whether
/// the lower triangle is mirrored follows `cost.is_symmetric()`.
pub fn distance_matrix<C>(trees: &[Tree], cost: &C) -> Result<SquareMatrix, MatrixError>
where
    C: EditCost + Sync,
{
    pairwise(trees, 0.0, cost.is_symmetric(), |a, b| {
        tree_distance(a, b, cost)
    })
}
