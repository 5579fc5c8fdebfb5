//! Per-language notions of "doc comment" and "documented node".
//!
//! The locator and the owner cache are language-agnostic; everything that
//! depends on comment syntax or grammar node kinds lives behind
//! [`DocDialect`].

pub mod block;
pub mod go;
pub mod rust;

pub use block::BlockDocDialect;
pub use go::GoDialect;
pub use rust::RustDialect;

use crate::ts::{NodeId, NodeKind, SupportLang, SyntaxView};

/// Documentation rules of one syntax dialect.
///
/// Implementations must tolerate any node, including non-comments and
/// handles that are no longer valid, and answer `false`/`None` for them.
pub trait DocDialect: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &str;

    /// Whether `comment` is structured documentation rather than an ordinary
    /// comment.
    fn is_doc_comment(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool;

    /// The node `comment` documents. Only consulted for doc comments.
    fn owner_of(&self, _tree: &dyn SyntaxView, _comment: NodeId) -> Option<NodeId> {
        None
    }

    /// Whether a cursor on the leading edge of the whitespace right after
    /// `comment` should resolve to it.
    fn is_pickable_at_edge(&self, _tree: &dyn SyntaxView, _comment: NodeId) -> bool {
        false
    }
}

/// Built-in dialect for `language`, if there is one.
pub fn for_language(language: SupportLang) -> Option<Box<dyn DocDialect>> {
    let dialect: Box<dyn DocDialect> = match language {
        SupportLang::Rust => Box::new(RustDialect),
        SupportLang::Go => Box::new(GoDialect),
        SupportLang::Java => Box::new(BlockDocDialect::JAVA),
        SupportLang::Kotlin => Box::new(BlockDocDialect::KOTLIN),
        SupportLang::JavaScript => Box::new(BlockDocDialect::JAVASCRIPT),
        SupportLang::TypeScript => Box::new(BlockDocDialect::TYPESCRIPT),
        SupportLang::Tsx => Box::new(BlockDocDialect::TSX),
        _ => return None,
    };
    Some(dialect)
}

/// A dialect with its edge-pick policy overridden.
pub struct Tuned {
    inner: Box<dyn DocDialect>,
    pick_at_edge: Option<bool>,
}

impl Tuned {
    pub fn new(inner: Box<dyn DocDialect>, pick_at_edge: Option<bool>) -> Self {
        Self { inner, pick_at_edge }
    }
}

impl DocDialect for Tuned {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_doc_comment(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        self.inner.is_doc_comment(tree, comment)
    }

    fn owner_of(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<NodeId> {
        self.inner.owner_of(tree, comment)
    }

    fn is_pickable_at_edge(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        match self.pick_at_edge {
            Some(pick) => pick,
            None => self.inner.is_pickable_at_edge(tree, comment),
        }
    }
}

/// Text of `node` if it is a comment.
pub(crate) fn comment_text(tree: &dyn SyntaxView, node: NodeId) -> Option<&str> {
    if tree.kind(node)? != NodeKind::Comment {
        return None;
    }
    tree.text(node)
}

/// Whether nothing but indentation precedes `node` on its line.
pub(crate) fn starts_line(tree: &dyn SyntaxView, node: NodeId) -> bool {
    let Some(prev) = tree.prev_sibling(node) else {
        return true;
    };
    if tree.kind(prev) != Some(NodeKind::Whitespace) {
        return false;
    }
    tree.text(prev).is_some_and(|ws| ws.contains('\n')) || tree.prev_sibling(prev).is_none()
}
