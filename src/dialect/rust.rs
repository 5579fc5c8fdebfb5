//! Rust doc comments: `///`, `//!`, `/** */` and `/*! */`.

use crate::dialect::{comment_text, DocDialect};
use crate::ts::{following_siblings, NodeId, NodeKind, SyntaxView};

/// Kinds skipped between an outer doc comment and the item it documents.
const TRANSPARENT: &[&str] = &["attribute_item"];

/// Containers whose inner docs belong to the enclosing item.
const ITEM_BODIES: &[&str] = &["declaration_list", "block"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStyle {
    OuterLine,
    InnerLine,
    OuterBlock,
    InnerBlock,
}

impl DocStyle {
    /// Classify comment text with rustdoc's rules.
    pub fn of(text: &str) -> Option<Self> {
        if text.starts_with("///") && !text.starts_with("////") {
            Some(DocStyle::OuterLine)
        } else if text.starts_with("//!") {
            Some(DocStyle::InnerLine)
        } else if text.starts_with("/**") && !text.starts_with("/***") && text != "/**/" {
            Some(DocStyle::OuterBlock)
        } else if text.starts_with("/*!") {
            Some(DocStyle::InnerBlock)
        } else {
            None
        }
    }

    pub fn is_inner(self) -> bool {
        matches!(self, DocStyle::InnerLine | DocStyle::InnerBlock)
    }

    pub fn is_line(self) -> bool {
        matches!(self, DocStyle::OuterLine | DocStyle::InnerLine)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RustDialect;

impl RustDialect {
    fn style(tree: &dyn SyntaxView, comment: NodeId) -> Option<DocStyle> {
        comment_text(tree, comment).and_then(DocStyle::of)
    }
}

impl DocDialect for RustDialect {
    fn name(&self) -> &str {
        "rust"
    }

    fn is_doc_comment(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        Self::style(tree, comment).is_some()
    }

    fn owner_of(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<NodeId> {
        if Self::style(tree, comment)?.is_inner() {
            let parent = tree.parent(comment)?;
            return match tree.kind_name(parent) {
                Some(kind) if ITEM_BODIES.contains(&kind) => tree.parent(parent),
                _ => Some(parent),
            };
        }

        let next = following_siblings(tree, comment).find(|n| match tree.kind(*n) {
            Some(NodeKind::Whitespace | NodeKind::Comment) => false,
            _ => !tree.kind_name(*n).is_some_and(|k| TRANSPARENT.contains(&k)),
        })?;
        (tree.kind(next) == Some(NodeKind::Named)).then_some(next)
    }

    fn is_pickable_at_edge(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        Self::style(tree, comment).is_some_and(DocStyle::is_line)
    }
}
