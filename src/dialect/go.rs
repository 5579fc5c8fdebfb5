//! Go doc comments: ordinary comments placed directly above a declaration.

use crate::dialect::{comment_text, starts_line, DocDialect};
use crate::ts::{following_siblings, NodeId, NodeKind, SyntaxView};

/// Declarations a comment can document.
const DECLARATIONS: &[&str] = &[
    "package_clause",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "type_spec",
    "type_alias",
    "const_declaration",
    "const_spec",
    "var_declaration",
    "var_spec",
    "field_declaration",
    "method_elem",
    "method_spec",
];

/// Tool directives are not documentation.
const DIRECTIVES: &[&str] = &["//go:", "//nolint", "//line ", "//export ", "//+build", "// +build"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GoDialect;

impl DocDialect for GoDialect {
    fn name(&self) -> &str {
        "go"
    }

    fn is_doc_comment(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        let Some(text) = comment_text(tree, comment) else {
            return false;
        };
        (text.starts_with("//") || text.starts_with("/*"))
            && !DIRECTIVES.iter().any(|d| text.starts_with(d))
    }

    /// The declaration directly below `comment`. Further comment lines may
    /// sit in between; a blank line detaches the comment.
    fn owner_of(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<NodeId> {
        if !starts_line(tree, comment) {
            return None;
        }

        let mut newlines = 0;
        for node in following_siblings(tree, comment) {
            match tree.kind(node)? {
                NodeKind::Whitespace => {
                    newlines += tree.text(node)?.matches('\n').count();
                    if newlines > 1 {
                        return None;
                    }
                }
                NodeKind::Comment => newlines = 0,
                NodeKind::Named => {
                    let kind = tree.kind_name(node)?;
                    return DECLARATIONS.contains(&kind).then_some(node);
                }
                NodeKind::Token => return None,
            }
        }
        None
    }

    fn is_pickable_at_edge(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        comment_text(tree, comment).is_some_and(|text| text.starts_with("//"))
    }
}
