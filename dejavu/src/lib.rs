//! # Déjà vu
//!
//! Detects near-duplicate and template-similar HTML pages and groups them
//! into clusters, as a preprocessing stage for deduplication and boilerplate
//! detection ahead of indexing.
//!
//! The pipeline runs in one direction:
//!
//! 1. **Ingestion**: HTML is parsed (html5ever) into an element-only
//!    ordered tree plus the set of CSS class tokens the page uses
//!    ([`parser`], [`Document`]).
//! 2. **Similarity**: tree edit distance (the `tedium` crate) is normalized
//!    into a structural score, class sets into a style score, and both are
//!    blended by a weighted aggregator ([`similarity`]).
//! 3. **Clustering**: a shared-nearest-neighbor pass over the pairwise
//!    similarity matrix partitions the batch ([`cluster`]).
//!
//! ```
//! use dejavu::{GrossSim, SimilarityComputer, parse_document};
//!
//! let a = parse_document("<div class=nav>x</div>", "a").unwrap();
//! let b = parse_document("<div class=nav>y</div>", "b").unwrap();
//!
//! let sim = GrossSim::web(0.8).unwrap();
//! assert_eq!(sim.compute(&a, &b), 1.0); // same structure, same classes
//! ```

#![warn(missing_docs)]

pub use tedium;

/// Shared-nearest-neighbor clustering over a similarity matrix.
pub mod cluster;
/// Batch configuration and validation.
pub mod config;
/// The parsed-document value type.
pub mod document;
/// HTML ingestion into the tree model.
pub mod parser;
/// File reports: id listings, CSV matrices, cluster listings.
pub mod report;
/// Structural, style and aggregate similarity computers.
pub mod similarity;

pub use cluster::{ClusterError, SharedNeighborClusterer};
pub use config::{BatchConfig, ConfigError};
pub use document::{ClassSet, Document};
pub use parser::{ParseError, parse_document, parse_file};
pub use similarity::{GrossSim, SimilarityComputer, StructureSim, StyleSim};
