//! Zhang–Shasha tree edit distance.
//!
//! Whole-tree distance is decomposed into forest-distance subproblems, one
//! per keyroot pair. Every genuine subtree-to-subtree distance discovered
//! along the way is memoized in a shared `tree_dist` table and reused by
//! later keyroot pairs, which is what keeps the algorithm polynomial.
//! Keyroots are iterated in ascending postorder on both axes, so any
//! memoized cell a later pair consults has already been filled in.

use crate::cost::EditCost;
use crate::debug;
use crate::tree::{Traversal, Tree};

/// Minimum total cost of transforming `a` into `b` under `cost`.
///
/// Zero iff the trees are identical in shape and labels (given the default
/// zero no-edit cost). Either tree may be a single node, in which case the
/// distance degenerates to inserting/removing/replacing that one node
/// against the other tree.
pub fn tree_distance(a: &Tree, b: &Tree, cost: &impl EditCost) -> f64 {
    let ta = a.traversal();
    let tb = b.traversal();
    let n = ta.len();
    let m = tb.len();
    debug!(nodes_a = n, nodes_b = m, "tree_distance");

    // Subtree-to-subtree distances, indexed by postorder position pairs.
    let mut tree_dist = vec![0.0f64; n * m];
    for &i in ta.keyroots() {
        for &j in tb.keyroots() {
            forest_distance(a, ta, b, tb, cost, i, j, &mut tree_dist);
        }
    }
    tree_dist[(n - 1) * m + (m - 1)]
}

/// Fill the forest-distance window for keyroot pair `(i, j)`, recording
/// subtree distances into `tree_dist` as they become exact.
#[allow(clippy::too_many_arguments)]
fn forest_distance(
    a: &Tree,
    ta: &Traversal,
    b: &Tree,
    tb: &Traversal,
    cost: &impl EditCost,
    i: usize,
    j: usize,
    tree_dist: &mut [f64],
) {
    let m = tb.len();
    let li = ta.lmd(i);
    let lj = tb.lmd(j);

    // Window over postorder prefixes l(i)..i and l(j)..j, plus the empty
    // forest at index 0 on each axis.
    let w = i - li + 2;
    let h = j - lj + 2;
    let mut fd = vec![0.0f64; w * h];

    // Deleting the forest prefix of `a`.
    for x in 1..w {
        let node = a.node(ta.node_at(li + x - 1));
        fd[x * h] = fd[(x - 1) * h] + cost.remove(node);
    }
    // Inserting the forest prefix of `b`.
    for y in 1..h {
        let node = b.node(tb.node_at(lj + y - 1));
        fd[y] = fd[y - 1] + cost.insert(node);
    }

    for x in 1..w {
        let ai = li + x - 1;
        let na = a.node(ta.node_at(ai));
        for y in 1..h {
            let bj = lj + y - 1;
            let nb = b.node(tb.node_at(bj));

            let remove = fd[(x - 1) * h + y] + cost.remove(na);
            let insert = fd[x * h + y - 1] + cost.insert(nb);

            if ta.lmd(ai) == li && tb.lmd(bj) == lj {
                // The prefixes up to ai/bj are single contiguous subtrees:
                // the diagonal move is an exact subtree distance.
                let swap = fd[(x - 1) * h + (y - 1)]
                    + if na.label() == nb.label() {
                        cost.no_edit()
                    } else {
                        cost.replace(na, nb)
                    };
                let best = remove.min(insert).min(swap);
                fd[x * h + y] = best;
                tree_dist[ai * m + bj] = best;
            } else {
                // ai roots an earlier fully-contained subtree; reuse its
                // memoized distance instead of recomputing the forest.
                let p = ta.lmd(ai) - li;
                let q = tb.lmd(bj) - lj;
                fd[x * h + y] = remove
                    .min(insert)
                    .min(fd[p * h + q] + tree_dist[ai * m + bj]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::UnitCost;
    use crate::tree::Tree;

    /// f( d( a, c(b) ), e ), first tree of the Zhang–Shasha worked example.
    fn paper_left() -> Tree {
        let mut t = Tree::new("f");
        let d = t.add_child(t.root(), "d");
        t.add_child(t.root(), "e");
        t.add_child(d, "a");
        let c = t.add_child(d, "c");
        t.add_child(c, "b");
        t
    }

    /// f( c( d(a, b) ), e ), second tree of the worked example.
    fn paper_right() -> Tree {
        let mut t = Tree::new("f");
        let c = t.add_child(t.root(), "c");
        t.add_child(t.root(), "e");
        let d = t.add_child(c, "d");
        t.add_child(d, "a");
        t.add_child(d, "b");
        t
    }

    #[test]
    fn self_distance_is_zero() {
        let t = paper_left();
        assert_eq!(tree_distance(&t, &t, &UnitCost), 0.0);
    }

    #[test]
    fn paper_example() {
        let a = paper_left();
        let b = paper_right();
        assert_eq!(tree_distance(&a, &b, &UnitCost), 2.0);
    }

    #[test]
    fn symmetric_under_unit_cost() {
        let a = paper_left();
        let b = paper_right();
        assert_eq!(
            tree_distance(&a, &b, &UnitCost),
            tree_distance(&b, &a, &UnitCost)
        );
    }

    #[test]
    fn single_relabel() {
        let mut a = Tree::new("html");
        let body = a.add_child(a.root(), "body");
        a.add_child(body, "p");

        let mut b = Tree::new("html");
        let body = b.add_child(b.root(), "body");
        b.add_child(body, "div");

        assert_eq!(tree_distance(&a, &b, &UnitCost), 1.0);
    }

    #[test]
    fn one_inserted_leaf() {
        // 4-node tree vs a 5-node variant with one extra leaf of a new label.
        let mut a = Tree::new("html");
        let body = a.add_child(a.root(), "body");
        a.add_child(body, "div");
        a.add_child(body, "p");

        let mut b = Tree::new("html");
        let body = b.add_child(b.root(), "body");
        b.add_child(body, "div");
        b.add_child(body, "p");
        b.add_child(body, "span");

        assert_eq!(tree_distance(&a, &b, &UnitCost), 1.0);
    }

    #[test]
    fn single_node_degenerates() {
        let single = Tree::new("a");

        let mut other = Tree::new("a");
        other.add_child(other.root(), "b");
        other.add_child(other.root(), "c");

        // Keep the shared root, insert the two leaves.
        assert_eq!(tree_distance(&single, &other, &UnitCost), 2.0);
        assert_eq!(tree_distance(&other, &single, &UnitCost), 2.0);

        // Two distinct single nodes: one relabel.
        let p = Tree::new("p");
        let q = Tree::new("q");
        assert_eq!(tree_distance(&p, &q, &UnitCost), 1.0);
        assert_eq!(tree_distance(&p, &p, &UnitCost), 0.0);
    }

    #[test]
    fn distance_is_nonnegative_and_bounded() {
        let a = paper_left();
        let b = paper_right();
        let d = tree_distance(&a, &b, &UnitCost);
        assert!(d >= 0.0);
        // Worst case: remove all of a, insert all of b.
        assert!(d <= (a.node_count() + b.node_count()) as f64);
    }
}
