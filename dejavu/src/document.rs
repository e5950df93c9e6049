//! The parsed-document value type.

use rapidhash::RapidHashSet;
use tedium::Tree;

/// Set of distinct CSS class tokens used anywhere in a document.
pub type ClassSet = RapidHashSet<String>;

/// A document reduced to what the similarity pipeline needs: its element
/// tree and its style vocabulary.
///
/// Trees are immutable once built (see [`tedium::Tree`]) and are discarded
/// after the distances and similarities referencing them have been computed.
#[derive(Debug)]
pub struct Document {
    /// Opaque identifier for the source (a path, a URL, ...). This is the
    /// label that ends up in cluster output.
    pub id: String,
    /// Element-only ordered tree.
    pub tree: Tree,
    /// Distinct class-attribute tokens, whitespace-split.
    pub classes: ClassSet,
}

impl Document {
    /// Build a document from already-parsed parts.
    pub fn new(id: impl Into<String>, tree: Tree, classes: ClassSet) -> Self {
        Self {
            id: id.into(),
            tree,
            classes,
        }
    }

    /// Number of element nodes in the tree.
    pub fn size(&self) -> usize {
        self.tree.node_count()
    }
}
