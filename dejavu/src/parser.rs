//! HTML ingestion.
//!
//! Parses markup with html5ever (browser-grade error recovery) into an
//! [`RcDom`], then walks **element nodes only** into a [`tedium::Tree`];
//! text, comments and other node types never become tree nodes. Class
//! attribute values are harvested along the same walk, whitespace-split into
//! the document's style vocabulary.

use crate::document::{ClassSet, Document};
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tedium::Tree;
use tedium::indextree::NodeId;
use thiserror::Error;

/// Errors from document ingestion.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the source file failed.
    #[error("failed to read {path}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The markup produced no element nodes at all.
    #[error("document contains no element nodes")]
    NoElements,
}

/// Parse an HTML string into a [`Document`] labeled `id`.
pub fn parse_document(html: &str, id: impl Into<String>) -> Result<Document, ParseError> {
    let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default()).one(html);

    let children = dom.document.children.borrow();
    let root = children
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .ok_or(ParseError::NoElements)?;

    let id = id.into();
    let mut classes = ClassSet::default();
    let mut tree = match root.data {
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            harvest_classes(attrs, &mut classes);
            Tree::new(name.local.as_ref())
        }
        _ => return Err(ParseError::NoElements),
    };
    tree.set_external_id(id.clone());

    let tree_root = tree.root();
    build_subtree(root, &mut tree, tree_root, &mut classes);

    Ok(Document::new(id, tree, classes))
}

/// Read and parse an HTML file; the path becomes the document id.
pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    let html = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&html, path.display().to_string())
}

/// Append the element children of `dom_node` under `parent`, depth-first and
/// in document order, harvesting class tokens as we go.
fn build_subtree(dom_node: &Handle, tree: &mut Tree, parent: NodeId, classes: &mut ClassSet) {
    for child in dom_node.children.borrow().iter() {
        if let NodeData::Element {
            ref name,
            ref attrs,
            ..
        } = child.data
        {
            harvest_classes(attrs, classes);
            let id = tree.add_child(parent, name.local.as_ref());
            build_subtree(child, tree, id, classes);
        }
    }
}

fn harvest_classes(attrs: &RefCell<Vec<Attribute>>, classes: &mut ClassSet) {
    for attr in attrs.borrow().iter() {
        if attr.name.local.as_ref().eq_ignore_ascii_case("class") {
            for token in attr.value.split_ascii_whitespace() {
                classes.insert(token.to_string());
            }
        }
    }
}
