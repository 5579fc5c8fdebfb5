//! Documentation lookup: cursor offset → doc comment → documented node.

use crate::cache::DocCommentCache;
use crate::config::LookupConfig;
use crate::dialect::{self, DocDialect, Tuned};
use crate::ts::{find_comment_at, NodeId, NodeKind, SupportLang, SyntaxTree, SyntaxView};
use serde::Serialize;
use std::ops::Range;

/// One side of a lookup result, detached from the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub kind: String,
    pub byte_start: usize,
    pub byte_end: usize,
    pub text: String,
}

impl NodeSummary {
    fn of(tree: &dyn SyntaxView, node: NodeId) -> Option<Self> {
        let Range { start, end } = tree.text_range(node)?;
        Some(Self {
            kind: tree.kind_name(node)?.to_string(),
            byte_start: start,
            byte_end: end,
            text: tree.text(node)?.to_string(),
        })
    }
}

/// A resolved doc comment and the node it documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocLookup {
    pub comment: NodeSummary,
    pub owner: NodeSummary,
}

/// Finds documentation comments for one dialect and resolves their owners
/// through a [`DocCommentCache`].
pub struct DocumentationProvider {
    dialect: Box<dyn DocDialect>,
    cache: DocCommentCache,
}

impl DocumentationProvider {
    pub fn new(dialect: Box<dyn DocDialect>) -> Self {
        Self::with_cache(dialect, DocCommentCache::new())
    }

    pub fn with_cache(dialect: Box<dyn DocDialect>, cache: DocCommentCache) -> Self {
        Self { dialect, cache }
    }

    /// Provider with the built-in dialect for `language`.
    pub fn for_language(language: SupportLang) -> Option<Self> {
        dialect::for_language(language).map(Self::new)
    }

    /// Provider for `language` with configuration applied. `None` when the
    /// language has no dialect or the configuration disables it.
    pub fn from_config(language: SupportLang, config: &LookupConfig) -> Option<Self> {
        let settings = config.dialect(language);
        if !settings.enabled {
            return None;
        }

        let base = dialect::for_language(language)?;
        let dialect: Box<dyn DocDialect> = match settings.pick_at_edge {
            Some(pick) => Box::new(Tuned::new(base, Some(pick))),
            None => base,
        };
        Some(Self::with_cache(
            dialect,
            DocCommentCache::with_capacity(config.cache.capacity),
        ))
    }

    pub fn dialect(&self) -> &dyn DocDialect {
        self.dialect.as_ref()
    }

    pub fn cache(&self) -> &DocCommentCache {
        &self.cache
    }

    /// The doc comment a cursor at `offset` refers to.
    ///
    /// `None` unless the comment there (or picked at its edge) is a doc
    /// comment of this dialect with a resolvable owner.
    pub fn find_documentation_element_at(&self, tree: &dyn SyntaxView, offset: usize) -> Option<NodeId> {
        let comment = find_comment_at(tree, offset, self.dialect.as_ref())?;
        let documented = self.dialect.is_doc_comment(tree, comment)
            && self.cache.resolve(tree, self.dialect.as_ref(), comment).is_some();
        documented.then_some(comment)
    }

    /// The node documented by `node`. `None` for anything that is not a doc
    /// comment of this dialect.
    pub fn documentation_owner(&self, tree: &dyn SyntaxView, node: NodeId) -> Option<NodeId> {
        if tree.kind(node)? != NodeKind::Comment {
            return None;
        }
        self.cache.resolve(tree, self.dialect.as_ref(), node)
    }

    /// Both ends of the lookup at `offset`, summarized.
    pub fn lookup(&self, tree: &dyn SyntaxView, offset: usize) -> Option<DocLookup> {
        let comment = self.find_documentation_element_at(tree, offset)?;
        self.summarize(tree, comment)
    }

    /// Every doc comment of `tree` that has an owner, in document order.
    pub fn doc_comments(&self, tree: &SyntaxTree) -> Vec<DocLookup> {
        tree.comments()
            .into_iter()
            .filter(|comment| self.dialect.is_doc_comment(tree, *comment))
            .filter_map(|comment| self.summarize(tree, comment))
            .collect()
    }

    fn summarize(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<DocLookup> {
        let owner = self.documentation_owner(tree, comment)?;
        Some(DocLookup {
            comment: NodeSummary::of(tree, comment)?,
            owner: NodeSummary::of(tree, owner)?,
        })
    }
}
