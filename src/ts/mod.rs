//! Tree-sitter backed syntax trees.
//!
//! Sources are parsed with tree-sitter grammars from ast-grep-language and
//! lowered into a lossless [`SyntaxTree`] with stable [`NodeId`]s, which is
//! what the comment locator and the owner cache operate on.

pub mod document;
pub mod errors;
pub mod lang;
pub mod locator;
pub mod parser;
pub mod tree;

pub use document::Document;
pub use errors::TreeSitterError;
pub use lang::SupportLang;
pub use locator::find_comment_at;
pub use parser::SourceParser;
pub use tree::{
    ancestors, following_siblings, parent_of_kind, NodeId, NodeKind, SyntaxTree, SyntaxView,
    TreeBuilder,
};
