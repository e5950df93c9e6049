//! # Tedium
//!
//! Zhang–Shasha tree edit distance for ordered labeled trees.
//!
//! Tedium measures how many node insertions, removals and relabels it takes
//! to turn one ordered tree into another, and turns batches of trees into
//! pairwise distance matrices. It is the structural half of a
//! near-duplicate-document detector: trees go in, a number (or an `n × n`
//! table of numbers) comes out.
//!
//! ## Algorithm Overview
//!
//! The distance engine implements the classic dynamic program from:
//!
//! > K. Zhang and D. Shasha. 1989. Simple fast algorithms for the editing
//! > distance between trees and related problems. SIAM J. Comput. 18, 6.
//!
//! Each tree is linearized into its postorder sequence once, together with
//! the leftmost-descendant table and the keyroot set. Whole-tree distance
//! decomposes into forest-distance subproblems, one per keyroot pair, with
//! subtree distances memoized in a shared table.
//!
//! ## Usage
//!
//! ```
//! use tedium::{Tree, UnitCost, tree_distance};
//!
//! let mut a = Tree::new("html");
//! let body = a.add_child(a.root(), "body");
//! a.add_child(body, "p");
//!
//! let mut b = Tree::new("html");
//! let body = b.add_child(b.root(), "body");
//! b.add_child(body, "p");
//! b.add_child(body, "div");
//!
//! // one inserted leaf under the default unit-cost policy
//! assert_eq!(tree_distance(&a, &b, &UnitCost), 1.0);
//! ```

#![warn(missing_docs)]

pub use indextree;

mod tracing_macros;

/// Edit cost policies for the distance engine.
pub mod cost;
/// The Zhang–Shasha distance computation.
pub mod distance;
/// Pairwise distance/similarity matrices over batches of trees.
pub mod matrix;
/// Ordered labeled tree with cached postorder traversal data.
pub mod tree;

pub use cost::{EditCost, UnitCost};
pub use distance::tree_distance;
pub use matrix::{MatrixError, SquareMatrix, distance_matrix, pairwise};
pub use tree::{Label, NodeData, Traversal, Tree};
