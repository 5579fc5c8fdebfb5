use crate::ts::errors::TreeSitterError;
use crate::ts::lang;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper bound to one language.
pub struct SourceParser {
    parser: Parser,
    language: SupportLang,
}

impl SourceParser {
    /// Create a new parser for `language`.
    pub fn new(language: SupportLang) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = language.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet {
                language: lang::name(language).to_string(),
            })?;

        Ok(Self { parser, language })
    }

    /// Get the configured language.
    pub fn language(&self) -> SupportLang {
        self.language
    }

    /// Parse source code into a tree-sitter Tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    /// Re-parse `source` reusing an `old` tree that has already been
    /// adjusted with [`Tree::edit`].
    pub fn reparse(&mut self, source: &str, old: &Tree) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, Some(old))
            .ok_or(TreeSitterError::ParseFailed)
    }
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
}

/// Check if the tree contains any ERROR or MISSING nodes.
pub fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }
    if !node.has_error() {
        return false;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

/// Collect all ERROR and MISSING nodes below `node`.
pub fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
