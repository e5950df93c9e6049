//! Ordered labeled tree with cached postorder traversal data.
//!
//! A [`Tree`] owns its nodes in an [`indextree::Arena`]; children are kept in
//! insertion order and parent links come from the arena, so there are no
//! reference cycles to manage. The distance engine never walks the tree
//! directly; it works off the [`Traversal`] tables (postorder sequence,
//! leftmost descendants, keyroots), which are computed once and cached.

use compact_str::CompactString;
use indextree::{Arena, NodeEdge, NodeId};
use std::sync::OnceLock;

/// Node label type; the element tag name for markup trees.
pub type Label = CompactString;

/// Payload stored for every tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    label: Label,
}

impl NodeData {
    /// The node's label, used for equality in edit-cost decisions.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// An ordered labeled tree.
///
/// Built top-down with [`Tree::new`] and [`Tree::add_child`], then treated as
/// immutable: the first call to [`Tree::traversal`] freezes the tree and any
/// later `add_child` panics. This mirrors the construct-once lifecycle of the
/// documents being compared.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<NodeData>,
    root: NodeId,
    external_id: Option<String>,
    traversal: OnceLock<Traversal>,
}

impl Tree {
    /// Create a tree consisting of a single root node.
    pub fn new(label: impl Into<Label>) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData {
            label: label.into(),
        });
        Self {
            arena,
            root,
            external_id: None,
            traversal: OnceLock::new(),
        }
    }

    /// Append a child to `parent`, after any existing children.
    ///
    /// # Panics
    ///
    /// Panics if the traversal tables have already been built: trees are
    /// immutable once a distance computation has seen them.
    pub fn add_child(&mut self, parent: NodeId, label: impl Into<Label>) -> NodeId {
        assert!(
            self.traversal.get().is_none(),
            "tree is frozen once traversal data has been built"
        );
        let child = self.arena.new_node(NodeData {
            label: label.into(),
        });
        parent.append(child, &mut self.arena);
        child
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes in the tree. Always at least 1.
    pub fn node_count(&self) -> usize {
        self.arena.count()
    }

    /// Payload of a node.
    pub fn node(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Children of a node, in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Identifier of the source document this tree was built from, if any.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Attach a source-document identifier to this tree (roots only carry it).
    pub fn set_external_id(&mut self, id: impl Into<String>) {
        self.external_id = Some(id.into());
    }

    /// Postorder traversal tables, built on first use and cached.
    pub fn traversal(&self) -> &Traversal {
        self.traversal.get_or_init(|| Traversal::build(self))
    }
}

/// Cached linearization of a [`Tree`]: postorder sequence, leftmost
/// descendants and keyroots, all keyed by postorder position `0..n`.
#[derive(Debug)]
pub struct Traversal {
    /// Nodes in strict postorder (all descendants before the node itself).
    post: Vec<NodeId>,
    /// `lmd[x]` = postorder position of the leftmost descendant of `post[x]`.
    lmd: Vec<usize>,
    /// Postorder positions of keyroots, ascending.
    keyroots: Vec<usize>,
}

impl Traversal {
    fn build(tree: &Tree) -> Self {
        let n = tree.node_count();

        let mut post = Vec::with_capacity(n);
        for edge in tree.root.traverse(&tree.arena) {
            if let NodeEdge::End(id) = edge {
                post.push(id);
            }
        }
        debug_assert_eq!(post.len(), n);

        // Arena ids are dense and 1-based, so a flat vec maps id -> position.
        let mut pos = vec![0usize; n + 1];
        for (x, &id) in post.iter().enumerate() {
            pos[usize::from(id)] = x;
        }

        // Children precede their parent in postorder, so a single forward
        // sweep resolves every leftmost descendant.
        let mut lmd = vec![0usize; n];
        for (x, &id) in post.iter().enumerate() {
            lmd[x] = match id.children(&tree.arena).next() {
                Some(first) => lmd[pos[usize::from(first)]],
                None => x,
            };
        }

        // A keyroot is the root, or any node whose leftmost descendant
        // differs from its parent's.
        let mut keyroots = Vec::new();
        for (x, &id) in post.iter().enumerate() {
            match tree.arena[id].parent() {
                None => keyroots.push(x),
                Some(parent) => {
                    if lmd[x] != lmd[pos[usize::from(parent)]] {
                        keyroots.push(x);
                    }
                }
            }
        }

        Self {
            post,
            lmd,
            keyroots,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.post.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.post.is_empty()
    }

    /// Node at postorder position `x`.
    pub fn node_at(&self, x: usize) -> NodeId {
        self.post[x]
    }

    /// Postorder position of the leftmost descendant of the node at `x`.
    pub fn lmd(&self, x: usize) -> usize {
        self.lmd[x]
    }

    /// Postorder positions of the keyroots, ascending.
    pub fn keyroots(&self) -> &[usize] {
        &self.keyroots
    }
}
