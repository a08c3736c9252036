//! Exclusion filter: build the capture clone.
//!
//! The artifact must not show UI chrome (edit buttons, visibility
//! toggles, scroll affordances) that exists only to *build* the résumé.
//! Authors tag such regions as export-excluded; interactive controls are
//! stripped unconditionally since a click target has no meaning in a
//! static document.
//!
//! The filter works on a deep copy. The source document stays byte-for-
//! byte intact so the UI layer can keep rendering it on screen after the
//! capture returns.

use crate::document::{DocNode, NodeKind, RenderableDocument};
use tracing::debug;

/// Produce the capture clone: a deep copy of `doc` with every
/// export-excluded subtree and every interactive control removed.
pub fn filter_document(doc: &RenderableDocument) -> RenderableDocument {
    let mut dropped = 0usize;
    let root = clone_pruned(&doc.root, &mut dropped)
        // The root itself being excluded would leave nothing to capture;
        // an empty group keeps downstream stages total.
        .unwrap_or_else(|| DocNode::new(NodeKind::Group, doc.root.bounds));

    debug!(dropped, "capture clone built");

    RenderableDocument::new(root, doc.width, doc.height)
}

fn clone_pruned(node: &DocNode, dropped: &mut usize) -> Option<DocNode> {
    if node.export_excluded || matches!(node.kind, NodeKind::Control) {
        *dropped += 1;
        return None;
    }

    let children = node
        .children
        .iter()
        .filter_map(|child| clone_pruned(child, dropped))
        .collect();

    Some(DocNode {
        kind: node.kind.clone(),
        bounds: node.bounds,
        export_excluded: false,
        children,
    })
}
