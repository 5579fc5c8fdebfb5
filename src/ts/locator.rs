//! Cursor offset to candidate comment.

use crate::dialect::DocDialect;
use crate::ts::tree::{parent_of_kind, NodeId, NodeKind, SyntaxView};

/// Find the comment a cursor at `offset` refers to.
///
/// The comment is the innermost comment enclosing the node at `offset`.
/// When there is none, and the cursor sits exactly on the leading edge of a
/// whitespace run, the comment immediately before that run is picked instead
/// if `dialect` allows picking it at its edge. A cursor before a comment
/// never resolves forward.
///
/// The result is only a candidate: it may be an ordinary comment.
pub fn find_comment_at(
    tree: &dyn SyntaxView,
    offset: usize,
    dialect: &dyn DocDialect,
) -> Option<NodeId> {
    if offset >= tree.text_len() {
        return None;
    }
    let element = tree.node_at(offset)?;
    if let Some(comment) = parent_of_kind(tree, element, NodeKind::Comment, false) {
        return Some(comment);
    }

    let on_leading_edge = tree.kind(element) == Some(NodeKind::Whitespace)
        && tree.text_range(element).map(|r| r.start) == Some(offset);
    if !on_leading_edge {
        return None;
    }

    let previous = tree.prev_sibling(element)?;
    if tree.kind(previous) != Some(NodeKind::Comment) || !dialect.is_pickable_at_edge(tree, previous) {
        return None;
    }

    tracing::trace!(offset, "picked comment at its trailing edge");
    Some(previous)
}
