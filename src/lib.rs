//! doc-locator: find the documentation comment under a cursor and the
//! declaration it documents.
//!
//! # Architecture
//!
//! A query runs in three steps:
//!
//! 1. [`find_comment_at`] maps a byte offset to a candidate comment: the
//!    comment enclosing the offset, or, when the cursor sits on the leading
//!    edge of the whitespace right after a comment, that comment if the
//!    dialect allows picking it there.
//! 2. The [`DocDialect`] decides whether the candidate is documentation
//!    rather than an ordinary comment.
//! 3. [`DocCommentCache`] returns the documented node, computing it through
//!    the dialect only when no entry exists for the current modification
//!    stamp of the tree or the cached owner has disappeared.
//!
//! [`DocumentationProvider`] ties the three together. Trees come from
//! [`Document`], which parses with tree-sitter grammars from
//! ast-grep-language and keeps node identities stable across edits.
//!
//! # Example
//!
//! ```no_run
//! use doc_locator::{Document, DocumentationProvider, SupportLang};
//!
//! let doc = Document::parse(SupportLang::Rust, "/// Adds one.\nfn add_one() {}\n")?;
//! let provider = DocumentationProvider::for_language(SupportLang::Rust).unwrap();
//!
//! if let Some(found) = provider.lookup(doc.tree(), 5) {
//!     println!("{} documents {}", found.comment.text.trim(), found.owner.kind);
//! }
//! # Ok::<(), doc_locator::TreeSitterError>(())
//! ```

pub mod cache;
pub mod config;
pub mod dialect;
pub mod edit;
pub mod pool;
pub mod provider;
pub mod ts;

// Re-exports
pub use cache::{CacheEntry, CacheStats, DocCommentCache};
pub use config::{load_from_path, load_from_str, ConfigError, LookupConfig};
pub use dialect::{BlockDocDialect, DocDialect, GoDialect, RustDialect, Tuned};
pub use edit::{EditError, TextEdit};
pub use provider::{DocLookup, DocumentationProvider, NodeSummary};
pub use ts::{
    find_comment_at, Document, NodeId, NodeKind, SupportLang, SyntaxTree, SyntaxView,
    TreeBuilder, TreeSitterError,
};
