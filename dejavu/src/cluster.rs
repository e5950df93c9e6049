//! Shared-nearest-neighbor clustering.
//!
//! Each item starts in its own cluster carrying the bit set of its nearest
//! neighbors: the up-to-`k` most similar items scoring at least τ (itself
//! included, since the diagonal is 1.0). Merge passes then sweep the cluster
//! table pairwise and fuse any two clusters sharing at least `kt` neighbors,
//! folding the absorbed cluster's identity into the survivor everywhere it
//! appears as a neighbor. Passes repeat until a full sweep merges nothing.
//!
//! The merge rule is an absolute shared-neighbor count. A Jaccard-style rule
//! (shared / union ≥ ratio) would be insensitive to neighborhood size but
//! changes behavior on small batches; the absolute count is what the τ/k/kt
//! parameterization was tuned around, so that is what this implements.

use crate::config::{BatchConfig, ConfigError};
use fixedbitset::FixedBitSet;
use tedium::SquareMatrix;
use thiserror::Error;
use tracing::debug;

/// Hard cap on merge passes. Each pass either merges (shrinking the table)
/// or terminates the loop, so n items can never need more than n - 1 passes;
/// the cap is a backstop, not a tuning knob.
const MAX_PASSES: usize = 100;

/// Errors from a clustering run.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The label list and the similarity matrix disagree on the batch size.
    #[error("{labels} labels for a {matrix}×{matrix} similarity matrix")]
    LabelMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Order of the matrix.
        matrix: usize,
    },
}

/// One cluster under construction: the item it was seeded from, the neighbor
/// bit set it has accumulated, and the items it has absorbed.
#[derive(Debug, Clone)]
struct Descriptor {
    /// Original batch index of the seed item. Stable across merges; this is
    /// the identity other descriptors' neighbor sets point at.
    item: usize,
    neighbors: FixedBitSet,
    members: Vec<usize>,
}

/// Groups items by shared nearest neighbors over a similarity matrix.
#[derive(Debug, Clone, Copy)]
pub struct SharedNeighborClusterer {
    similarity_threshold: f64,
    neighbors: usize,
    merge_threshold: usize,
}

impl SharedNeighborClusterer {
    /// A clusterer with similarity cutoff τ, neighborhood size `k` and merge
    /// threshold `kt`. Requires τ ∈ [0, 1], `k ≥ 1` and `kt < k`.
    pub fn new(
        similarity_threshold: f64,
        neighbors: usize,
        merge_threshold: usize,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "similarity threshold",
                value: similarity_threshold,
                min: 0.0,
                max: 1.0,
            });
        }
        if neighbors == 0 {
            return Err(ConfigError::OutOfRange {
                name: "neighborhood size",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        if merge_threshold >= neighbors {
            return Err(ConfigError::MergeThreshold {
                kt: merge_threshold,
                k: neighbors,
            });
        }
        Ok(Self {
            similarity_threshold,
            neighbors,
            merge_threshold,
        })
    }

    /// A clusterer from a validated [`BatchConfig`].
    pub fn from_config(config: &BatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            config.similarity_threshold,
            config.neighbors,
            config.merge_threshold,
        )
    }

    /// Partition the batch behind `similarities` into clusters of labels.
    ///
    /// `labels[i]` names the item behind row/column `i`. The result is a
    /// strict partition: every label appears in exactly one cluster.
    pub fn cluster(
        &self,
        similarities: &SquareMatrix,
        labels: &[String],
    ) -> Result<Vec<Vec<String>>, ClusterError> {
        let n = similarities.order();
        if labels.len() != n {
            return Err(ClusterError::LabelMismatch {
                labels: labels.len(),
                matrix: n,
            });
        }

        let mut table: Vec<Descriptor> = (0..n)
            .map(|i| Descriptor {
                item: i,
                neighbors: nearest_neighbors(
                    similarities.row(i),
                    self.similarity_threshold,
                    self.neighbors,
                ),
                members: vec![i],
            })
            .collect();

        for pass in 0..MAX_PASSES {
            let merges = merge_pass(&mut table, self.merge_threshold);
            debug!(pass, merges, clusters = table.len(), "merge pass");
            if merges == 0 {
                break;
            }
        }

        Ok(table
            .into_iter()
            .map(|d| d.members.into_iter().map(|i| labels[i].clone()).collect())
            .collect())
    }
}

/// Bit set of the up-to-`k` indices most similar to the item behind `row`,
/// restricted to similarities of at least τ.
///
/// Candidates are ranked by similarity descending, index ascending; equal
/// similarities are all retained up to the `k` cap.
fn nearest_neighbors(row: &[f64], threshold: f64, k: usize) -> FixedBitSet {
    let mut candidates: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, sim)| sim >= threshold)
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut set = FixedBitSet::with_capacity(row.len());
    for &(index, _) in candidates.iter().take(k) {
        set.insert(index);
    }
    set
}

/// One full sweep over the cluster table; returns how many merges happened.
///
/// When `b` is absorbed into `a`, `a` keeps the union of both neighbor sets
/// and both member lists, and every remaining descriptor that listed `b`'s
/// seed item as a neighbor now lists `a`'s instead. The element shifted into
/// `b`'s slot is examined in the same sweep.
fn merge_pass(table: &mut Vec<Descriptor>, merge_threshold: usize) -> usize {
    let mut merges = 0;
    let mut a = 0;
    while a < table.len() {
        let mut b = a + 1;
        while b < table.len() {
            let shared = &table[a].neighbors & &table[b].neighbors;
            if shared.count_ones(..) >= merge_threshold {
                let absorbed = table.remove(b);
                let item_a = table[a].item;
                table[a].neighbors.union_with(&absorbed.neighbors);
                table[a].members.extend(absorbed.members);
                for d in table.iter_mut() {
                    if d.neighbors.contains(absorbed.item) {
                        d.neighbors.set(absorbed.item, false);
                        d.neighbors.insert(item_a);
                    }
                }
                merges += 1;
            } else {
                b += 1;
            }
        }
        a += 1;
    }
    merges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> SquareMatrix {
        let n = rows.len();
        let mut m = SquareMatrix::zeroed(n);
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        m
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("l{i}")).collect()
    }

    #[test]
    fn close_pair_plus_outlier() {
        let sim = matrix(&[
            &[1.0, 0.9, 0.0],
            &[0.9, 1.0, 0.0],
            &[0.0, 0.0, 1.0],
        ]);
        let clusterer = SharedNeighborClusterer::new(0.75, 100, 1).unwrap();
        let clusters = clusterer.cluster(&sim, &labels(3)).unwrap();
        assert_eq!(clusters, vec![vec!["l0", "l1"], vec!["l2"]]);
    }

    #[test]
    fn all_singletons_when_nothing_passes_threshold() {
        let sim = matrix(&[
            &[1.0, 0.2, 0.1],
            &[0.2, 1.0, 0.3],
            &[0.1, 0.3, 1.0],
        ]);
        // each item's only neighbor is itself, never shared
        let clusterer = SharedNeighborClusterer::new(0.75, 100, 1).unwrap();
        let clusters = clusterer.cluster(&sim, &labels(3)).unwrap();
        assert_eq!(clusters.len(), 3);
        for cluster in &clusters {
            assert_eq!(cluster.len(), 1);
        }
    }

    #[test]
    fn every_label_lands_in_exactly_one_cluster() {
        let sim = matrix(&[
            &[1.0, 0.9, 0.8, 0.0, 0.0],
            &[0.9, 1.0, 0.85, 0.0, 0.0],
            &[0.8, 0.85, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 1.0, 0.95],
            &[0.0, 0.0, 0.0, 0.95, 1.0],
        ]);
        let clusterer = SharedNeighborClusterer::new(0.75, 100, 2).unwrap();
        let clusters = clusterer.cluster(&sim, &labels(5)).unwrap();

        let mut seen: Vec<&str> = clusters
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, ["l0", "l1", "l2", "l3", "l4"]);
        assert!(clusters.len() <= 5);
    }

    #[test]
    fn partition_holds_after_every_pass() {
        let n = 6;
        let sim = matrix(&[
            &[1.0, 0.9, 0.9, 0.0, 0.0, 0.8],
            &[0.9, 1.0, 0.9, 0.0, 0.0, 0.0],
            &[0.9, 0.9, 1.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0, 1.0, 0.9, 0.0],
            &[0.0, 0.0, 0.0, 0.9, 1.0, 0.0],
            &[0.8, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        let mut table: Vec<Descriptor> = (0..n)
            .map(|i| Descriptor {
                item: i,
                neighbors: nearest_neighbors(sim.row(i), 0.75, 100),
                members: vec![i],
            })
            .collect();

        loop {
            let merges = merge_pass(&mut table, 1);
            let mut members: Vec<usize> =
                table.iter().flat_map(|d| d.members.iter().copied()).collect();
            members.sort_unstable();
            assert_eq!(members, (0..n).collect::<Vec<_>>());
            if merges == 0 {
                break;
            }
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let sim = matrix(&[
            &[1.0, 0.8, 0.8, 0.1],
            &[0.8, 1.0, 0.9, 0.1],
            &[0.8, 0.9, 1.0, 0.1],
            &[0.1, 0.1, 0.1, 1.0],
        ]);
        let clusterer = SharedNeighborClusterer::new(0.75, 100, 2).unwrap();
        let first = clusterer.cluster(&sim, &labels(4)).unwrap();
        let second = clusterer.cluster(&sim, &labels(4)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn neighborhood_cap_keeps_strongest_ties() {
        // ties at 0.9 beyond the cap resolve by lowest index
        let row = [1.0, 0.9, 0.9, 0.9, 0.5];
        let set = nearest_neighbors(&row, 0.75, 3);
        assert!(set.contains(0));
        assert!(set.contains(1));
        assert!(set.contains(2));
        assert!(!set.contains(3));
        assert!(!set.contains(4));
    }

    #[test]
    fn label_count_must_match_matrix_order() {
        let sim = matrix(&[&[1.0, 0.9], &[0.9, 1.0]]);
        let clusterer = SharedNeighborClusterer::new(0.75, 100, 1).unwrap();
        assert!(matches!(
            clusterer.cluster(&sim, &labels(3)),
            Err(ClusterError::LabelMismatch { labels: 3, matrix: 2 })
        ));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(SharedNeighborClusterer::new(1.5, 100, 1).is_err());
        assert!(SharedNeighborClusterer::new(0.75, 0, 0).is_err());
        assert!(SharedNeighborClusterer::new(0.75, 5, 5).is_err());
        assert!(SharedNeighborClusterer::from_config(&BatchConfig::default()).is_ok());
    }
}
