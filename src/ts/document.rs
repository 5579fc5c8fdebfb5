//! Parsed documents and incremental edits. Nodes wholly outside an edited
//! span keep their ids across re-parses; everything else gets a fresh one.

use crate::edit::TextEdit;
use crate::pool::with_parser;
use crate::ts::errors::TreeSitterError;
use crate::ts::lang;
use crate::ts::parser::{collect_error_nodes, has_error_nodes, ErrorNode};
use crate::ts::tree::{NodeKind, SyntaxTree, SyntaxView, TreeBuilder};
use ast_grep_language::SupportLang;
use std::path::{Path, PathBuf};
use tree_sitter::{InputEdit, Point, Tree};

/// A source file, its tree-sitter parse and the lowered [`SyntaxTree`].
///
/// The document owns the modification stamp: every applied [`TextEdit`]
/// re-parses incrementally and advances it by one.
pub struct Document {
    path: Option<PathBuf>,
    language: SupportLang,
    parsed: Tree,
    syntax: SyntaxTree,
}

impl Document {
    /// Parse `source` as `language`.
    pub fn parse(language: SupportLang, source: impl Into<String>) -> Result<Self, TreeSitterError> {
        let source = source.into();
        let parsed = with_parser(language, |parser| parser.parse(&source))??;
        let root_kind = parsed.root_node().kind();
        let mut builder = TreeBuilder::new(source, root_kind);
        lower(&parsed, &mut builder);

        Ok(Self {
            path: None,
            language,
            parsed,
            syntax: builder.finish(),
        })
    }

    /// Read and parse a file, picking the language from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TreeSitterError> {
        let path = path.as_ref();
        let language = lang::for_path(path).ok_or_else(|| TreeSitterError::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let source = std::fs::read_to_string(path).map_err(|e| TreeSitterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut document = Self::parse(language, source)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> SupportLang {
        self.language
    }

    pub fn source(&self) -> &str {
        self.syntax.source()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.syntax
    }

    pub fn modification_stamp(&self) -> u64 {
        self.syntax.modification_stamp()
    }

    /// Check if the parse contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.parsed.root_node())
    }

    /// Get all ERROR and MISSING nodes of the parse.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.parsed.root_node(), &mut errors);
        errors
    }

    /// Apply `edit`, re-parse and advance the modification stamp.
    ///
    /// Nodes lying wholly before or after the replaced span keep their
    /// [`NodeId`](crate::ts::NodeId)s; every other node of the previous tree
    /// becomes invalid.
    pub fn apply(&mut self, edit: &TextEdit) -> Result<(), TreeSitterError> {
        let old_source = self.syntax.source();
        let new_source = edit.apply_to(old_source)?;

        let input = InputEdit {
            start_byte: edit.byte_start,
            old_end_byte: edit.byte_end,
            new_end_byte: edit.new_end(),
            start_position: point_at(old_source, edit.byte_start),
            old_end_position: point_at(old_source, edit.byte_end),
            new_end_position: point_at(&new_source, edit.new_end()),
        };
        // Only a successful re-parse may replace the stored tree
        let mut edited = self.parsed.clone();
        edited.edit(&input);
        let parsed = with_parser(self.language, |parser| parser.reparse(&new_source, &edited))??;

        let reuse = self
            .syntax
            .reuse_map(edit.byte_start, edit.byte_end, edit.new_end());
        let stamp = self.modification_stamp() + 1;
        let mut builder = TreeBuilder::continuing(
            new_source,
            parsed.root_node().kind(),
            self.syntax.lineage(),
            stamp,
            self.syntax.next_serial(),
            reuse,
        );
        lower(&parsed, &mut builder);

        tracing::debug!(
            lineage = self.syntax.lineage(),
            stamp,
            start = edit.byte_start,
            end = edit.byte_end,
            inserted = edit.new_text.len(),
            "re-parsed document"
        );

        self.parsed = parsed;
        self.syntax = builder.finish();
        Ok(())
    }
}

/// Row/column (in bytes) of `byte` within `text`.
fn point_at(text: &str, byte: usize) -> Point {
    let before = &text[..byte];
    let row = before.matches('\n').count();
    let column = match before.rfind('\n') {
        Some(newline) => byte - newline - 1,
        None => byte,
    };
    Point::new(row, column)
}

/// Lower the children of the tree-sitter root into `builder`, whose root
/// already spans the whole text.
fn lower(parsed: &Tree, builder: &mut TreeBuilder) {
    let len = builder.source().len();
    lower_children(builder, parsed.root_node(), false, 0, len);
}

fn lower_node(builder: &mut TreeBuilder, node: tree_sitter::Node<'_>, in_comment: bool) {
    let kind = classify(node, in_comment, &builder.source()[node.byte_range()]);
    if node.child_count() == 0 {
        builder.token(node.kind(), kind, node.byte_range());
        return;
    }

    builder.start_node(node.kind(), kind, node.start_byte());
    let in_comment = in_comment || kind == NodeKind::Comment;
    lower_children(builder, node, in_comment, node.start_byte(), node.end_byte());
    builder.finish_node(node.end_byte());
}

fn lower_children(
    builder: &mut TreeBuilder,
    node: tree_sitter::Node<'_>,
    in_comment: bool,
    start: usize,
    end: usize,
) {
    let mut pos = start;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.start_byte() > pos {
            gap(builder, pos..child.start_byte());
        }
        lower_node(builder, child, in_comment);
        pos = pos.max(child.end_byte());
    }
    if end > pos {
        gap(builder, pos..end);
    }
}

fn gap(builder: &mut TreeBuilder, range: std::ops::Range<usize>) {
    if builder.source()[range.clone()].chars().all(char::is_whitespace) {
        builder.whitespace(range);
    } else {
        builder.token("text", NodeKind::Token, range);
    }
}

/// Comments are the outermost `*comment` nodes; their inner markers are not.
/// Anonymous whitespace tokens (Go's newline terminators) count as
/// whitespace.
fn classify(node: tree_sitter::Node<'_>, in_comment: bool, text: &str) -> NodeKind {
    if !in_comment && node.kind().ends_with("comment") {
        NodeKind::Comment
    } else if node.is_named() {
        NodeKind::Named
    } else if !text.is_empty() && text.chars().all(char::is_whitespace) {
        NodeKind::Whitespace
    } else {
        NodeKind::Token
    }
}
