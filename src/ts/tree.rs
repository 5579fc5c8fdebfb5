//! Lossless syntax tree with stable node handles.
//!
//! [`SyntaxTree`] is an arena lowered from a tree-sitter parse (or assembled
//! by hand through [`TreeBuilder`]). Unlike tree-sitter, every byte of the
//! text is covered by a leaf: gaps between tokens become explicit whitespace
//! leaves, which is what the comment locator's edge rule inspects.
//!
//! Nodes are addressed by [`NodeId`], a plain `Copy` handle. A handle stays
//! valid across re-parses as long as the node it names survives the edit
//! (see [`Document::apply`](crate::ts::Document::apply)); handles never keep
//! tree memory alive.

use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_LINEAGE: AtomicU32 = AtomicU32::new(1);

/// Identity of a syntax node.
///
/// `lineage` identifies the document the node belongs to (shared by every
/// re-parse of that document), `serial` the node within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    lineage: u32,
    serial: u32,
}

impl NodeId {
    pub fn lineage(self) -> u32 {
        self.lineage
    }
}

/// Coarse classification every dialect agrees on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A comment (the outermost node of it; markers inside are `Named`/`Token`)
    Comment,
    /// A run of whitespace between tokens
    Whitespace,
    /// Anonymous token such as punctuation or a keyword
    Token,
    /// Named grammar node
    Named,
}

/// Read access to a syntax tree, as needed by the locator, the dialects and
/// the owner cache.
///
/// Methods taking a node return `None` when the handle is not valid in this
/// tree.
pub trait SyntaxView {
    /// Length of the tree's text in bytes.
    fn text_len(&self) -> usize;

    /// Innermost node whose range `[start, end)` contains `offset`.
    fn node_at(&self, offset: usize) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Grammar kind name, e.g. `function_item`.
    fn kind_name(&self, node: NodeId) -> Option<&str>;

    fn text_range(&self, node: NodeId) -> Option<Range<usize>>;

    fn text(&self, node: NodeId) -> Option<&str>;

    /// Current modification stamp of the tree.
    fn modification_stamp(&self) -> u64;

    /// Whether `node` still names a node of this tree.
    fn is_valid(&self, node: NodeId) -> bool {
        self.kind(node).is_some()
    }
}

/// `node` followed by its ancestors, innermost first.
pub fn ancestors(tree: &dyn SyntaxView, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(Some(node), move |n| tree.parent(*n))
}

/// Nearest ancestor of `node` with the given kind. `strict = false` lets
/// `node` itself match.
pub fn parent_of_kind(
    tree: &dyn SyntaxView,
    node: NodeId,
    kind: NodeKind,
    strict: bool,
) -> Option<NodeId> {
    ancestors(tree, node)
        .skip(usize::from(strict))
        .find(|n| tree.kind(*n) == Some(kind))
}

/// Siblings following `node`, nearest first.
pub fn following_siblings(tree: &dyn SyntaxView, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.next_sibling(node), move |n| tree.next_sibling(*n))
}

#[derive(Debug, Clone)]
struct NodeData {
    id: NodeId,
    kind: NodeKind,
    kind_name: &'static str,
    range: Range<usize>,
    parent: Option<usize>,
    index_in_parent: usize,
    children: Vec<NodeId>,
}

/// Key used to carry node identities across a re-parse.
pub(crate) type ReuseKey = (&'static str, usize, usize);

/// Arena syntax tree over an owned copy of the source text.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    lineage: u32,
    stamp: u64,
    next_serial: u32,
    nodes: Vec<NodeData>,
    index: HashMap<NodeId, usize>,
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn lineage(&self) -> u32 {
        self.lineage
    }

    pub fn root(&self) -> NodeId {
        self.nodes[0].id
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// All comment nodes in document order.
    pub fn comments(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Comment)
            .map(|n| n.id)
            .collect()
    }

    /// First node in pre-order with the given grammar kind and text.
    pub fn find(&self, kind_name: &str, text: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.kind_name == kind_name && &self.source[n.range.clone()] == text)
            .map(|n| n.id)
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.index.get(&node).map(|&i| &self.nodes[i])
    }

    pub(crate) fn next_serial(&self) -> u32 {
        self.next_serial
    }

    /// Identities of nodes lying wholly outside `[edit_start, old_end)`,
    /// keyed by where they will sit after the edit.
    pub(crate) fn reuse_map(
        &self,
        edit_start: usize,
        old_end: usize,
        new_end: usize,
    ) -> HashMap<ReuseKey, NodeId> {
        let mut map = HashMap::new();
        for node in &self.nodes {
            let Range { start, end } = node.range;
            let key = if end <= edit_start {
                (node.kind_name, start, end)
            } else if start >= old_end {
                let shift = |pos: usize| pos - old_end + new_end;
                (node.kind_name, shift(start), shift(end))
            } else {
                continue;
            };
            map.entry(key).or_insert(node.id);
        }
        map
    }
}

impl SyntaxView for SyntaxTree {
    fn text_len(&self) -> usize {
        self.source.len()
    }

    fn node_at(&self, offset: usize) -> Option<NodeId> {
        let mut current = &self.nodes[0];
        if !current.range.contains(&offset) {
            return None;
        }

        loop {
            let children = &current.children;
            let i = children.partition_point(|c| self.nodes[self.index[c]].range.end <= offset);
            match children.get(i).map(|c| &self.nodes[self.index[c]]) {
                Some(child) if child.range.contains(&offset) => current = child,
                _ => return Some(current.id),
            }
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.data(node)?.parent?;
        Some(self.nodes[parent].id)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |n| n.children.as_slice())
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let data = self.data(node)?;
        let parent = &self.nodes[data.parent?];
        let i = data.index_in_parent.checked_sub(1)?;
        parent.children.get(i).copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let data = self.data(node)?;
        let parent = &self.nodes[data.parent?];
        parent.children.get(data.index_in_parent + 1).copied()
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.data(node).map(|n| n.kind)
    }

    fn kind_name(&self, node: NodeId) -> Option<&str> {
        self.data(node).map(|n| n.kind_name)
    }

    fn text_range(&self, node: NodeId) -> Option<Range<usize>> {
        self.data(node).map(|n| n.range.clone())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node).map(|n| &self.source[n.range.clone()])
    }

    fn modification_stamp(&self) -> u64 {
        self.stamp
    }
}

/// Incremental assembly of a [`SyntaxTree`].
///
/// The root spans the whole text and is opened by [`TreeBuilder::new`].
/// Nodes are added in document order; ids are assigned when a node is
/// closed, reusing an identity from the previous tree when one was
/// registered for the same kind and range.
///
/// ```
/// use doc_locator::ts::{NodeKind, SyntaxView, TreeBuilder};
///
/// let mut b = TreeBuilder::new("// hi\nx", "source_file");
/// let comment = b.token("comment", NodeKind::Comment, 0..5);
/// b.whitespace(5..6);
/// b.token("identifier", NodeKind::Named, 6..7);
/// let tree = b.finish();
/// assert_eq!(tree.node_at(3), Some(comment));
/// ```
pub struct TreeBuilder {
    source: String,
    lineage: u32,
    stamp: u64,
    next_serial: u32,
    reuse: HashMap<ReuseKey, NodeId>,
    nodes: Vec<NodeData>,
    stack: Vec<usize>,
}

impl TreeBuilder {
    /// Start a tree of a new lineage.
    pub fn new(source: impl Into<String>, root_kind: &'static str) -> Self {
        let lineage = NEXT_LINEAGE.fetch_add(1, Ordering::Relaxed);
        Self::continuing(source, root_kind, lineage, 0, 0, HashMap::new())
    }

    /// Start the next version of an existing lineage.
    pub(crate) fn continuing(
        source: impl Into<String>,
        root_kind: &'static str,
        lineage: u32,
        stamp: u64,
        next_serial: u32,
        reuse: HashMap<ReuseKey, NodeId>,
    ) -> Self {
        let source = source.into();
        let len = source.len();
        let mut builder = Self {
            source,
            lineage,
            stamp,
            next_serial,
            reuse,
            nodes: Vec::new(),
            stack: Vec::new(),
        };
        builder.push(root_kind, NodeKind::Named, 0..len);
        builder
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Open a node starting at `start`; close it with [`finish_node`](Self::finish_node).
    pub fn start_node(&mut self, kind_name: &'static str, kind: NodeKind, start: usize) {
        let index = self.push(kind_name, kind, start..start);
        self.stack.push(index);
    }

    /// Close the innermost open node at `end`.
    ///
    /// # Panics
    ///
    /// Panics if no node opened with [`start_node`](Self::start_node) is
    /// still open. The root is closed by [`finish`](Self::finish).
    pub fn finish_node(&mut self, end: usize) -> NodeId {
        let Some(index) = self.stack.pop() else {
            panic!("finish_node called with no open node");
        };
        self.nodes[index].range.end = end;
        self.seal(index)
    }

    /// Add a leaf.
    pub fn token(&mut self, kind_name: &'static str, kind: NodeKind, range: Range<usize>) -> NodeId {
        let index = self.push(kind_name, kind, range);
        self.seal(index)
    }

    /// Add a whitespace leaf.
    pub fn whitespace(&mut self, range: Range<usize>) -> NodeId {
        self.token("whitespace", NodeKind::Whitespace, range)
    }

    /// Close every open node and produce the tree.
    pub fn finish(mut self) -> SyntaxTree {
        let len = self.source.len();
        while !self.stack.is_empty() {
            self.finish_node(len);
        }
        self.seal(0);

        let index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();

        SyntaxTree {
            source: self.source,
            lineage: self.lineage,
            stamp: self.stamp,
            next_serial: self.next_serial,
            nodes: self.nodes,
            index,
        }
    }

    fn push(&mut self, kind_name: &'static str, kind: NodeKind, range: Range<usize>) -> usize {
        let parent = if self.nodes.is_empty() {
            None
        } else {
            Some(self.stack.last().copied().unwrap_or(0))
        };
        self.nodes.push(NodeData {
            // Placeholder until `seal`
            id: NodeId {
                lineage: self.lineage,
                serial: u32::MAX,
            },
            kind,
            kind_name,
            range,
            parent,
            index_in_parent: 0,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn seal(&mut self, index: usize) -> NodeId {
        let data = &self.nodes[index];
        let key = (data.kind_name, data.range.start, data.range.end);
        let id = match self.reuse.remove(&key) {
            Some(id) => id,
            None => {
                let id = NodeId {
                    lineage: self.lineage,
                    serial: self.next_serial,
                };
                self.next_serial += 1;
                id
            }
        };
        self.nodes[index].id = id;

        if let Some(parent) = self.nodes[index].parent {
            self.nodes[index].index_in_parent = self.nodes[parent].children.len();
            self.nodes[parent].children.push(id);
        }
        id
    }
}
