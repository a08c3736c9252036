//! The renderable-document model the engine captures.
//!
//! A [`RenderableDocument`] is the layout tree handed over by the UI layer:
//! every node carries the absolute bounding box the host's layout pass
//! computed for it, in source pixels. The engine never mutates the input
//! (the exclusion filter works on a private deep clone) and it never looks
//! at styling: all it needs from the tree is *structure* (which subtrees are
//! export-excluded, where the hyperlinks sit, which nodes are interactive
//! controls with no meaning in a static artifact).

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in source-layout pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// What a node *is*, as far as the capture engine cares.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A plain container (section, row, column…).
    Group,
    /// Rendered text content.
    Text(String),
    /// An embedded image; `src` identifies the asset to the host.
    Image { src: String },
    /// A hyperlink-bearing region.
    Link { href: String },
    /// An interactive action control (button, toggle). Stripped before
    /// capture: it has no meaning in a static artifact.
    Control,
}

/// One node of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DocNode {
    pub kind: NodeKind,
    /// Absolute bounds in source-layout pixels (document top-left origin).
    pub bounds: Rect,
    /// Tagged "exclude from export": the node and its whole subtree are
    /// removed from the capture clone.
    pub export_excluded: bool,
    pub children: Vec<DocNode>,
}

impl DocNode {
    pub fn new(kind: NodeKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            export_excluded: false,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
        self.children = children;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.export_excluded = true;
        self
    }
}

/// A hyperlink region as it exists in the source tree: absolute bounds in
/// source pixels plus the target URL. Input to the link remapper.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSource {
    pub bounds: Rect,
    pub href: String,
}

/// The fully laid-out visual document, as constructed by the UI layer.
///
/// `width`/`height` are the natural post-layout dimensions in source
/// pixels. The engine treats the whole structure as read-only input.
#[derive(Debug, Clone)]
pub struct RenderableDocument {
    pub root: DocNode,
    pub width: f32,
    pub height: f32,
}

impl RenderableDocument {
    pub fn new(root: DocNode, width: f32, height: f32) -> Self {
        Self {
            root,
            width,
            height,
        }
    }

    /// Collect every hyperlink-bearing region in the tree, in document
    /// order. Bounds are the absolute boxes recorded at layout time.
    pub fn link_sources(&self) -> Vec<LinkSource> {
        let mut out = Vec::new();
        collect_links(&self.root, &mut out);
        out
    }

    /// Count embedded image nodes (the readiness barrier reports against
    /// this for diagnostics).
    pub fn image_count(&self) -> usize {
        fn walk(node: &DocNode, n: &mut usize) {
            if matches!(node.kind, NodeKind::Image { .. }) {
                *n += 1;
            }
            for child in &node.children {
                walk(child, n);
            }
        }
        let mut n = 0;
        walk(&self.root, &mut n);
        n
    }
}

fn collect_links(node: &DocNode, out: &mut Vec<LinkSource>) {
    if let NodeKind::Link { href } = &node.kind {
        out.push(LinkSource {
            bounds: node.bounds,
            href: href.clone(),
        });
    }
    for child in &node.children {
        collect_links(child, out);
    }
}
