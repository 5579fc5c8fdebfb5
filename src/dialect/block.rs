//! `/** … */` documentation blocks (Javadoc, KDoc, JSDoc, TSDoc).

use crate::dialect::{comment_text, DocDialect};
use crate::ts::{following_siblings, NodeId, NodeKind, SyntaxView};

/// A C-family language whose doc comments are `/** … */` blocks placed
/// before a declaration.
#[derive(Debug, Clone, Copy)]
pub struct BlockDocDialect {
    name: &'static str,
    declarations: &'static [&'static str],
}

const JS_DECLARATIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "lexical_declaration",
    "variable_declaration",
    "method_definition",
    "field_definition",
    "export_statement",
    "pair",
];

const TS_DECLARATIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "lexical_declaration",
    "variable_declaration",
    "method_definition",
    "public_field_definition",
    "export_statement",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "module",
    "internal_module",
    "ambient_declaration",
    "function_signature",
    "method_signature",
    "abstract_method_signature",
    "property_signature",
    "pair",
];

impl BlockDocDialect {
    pub const JAVA: Self = Self {
        name: "java",
        declarations: &[
            "package_declaration",
            "module_declaration",
            "class_declaration",
            "interface_declaration",
            "enum_declaration",
            "record_declaration",
            "annotation_type_declaration",
            "annotation_type_element_declaration",
            "method_declaration",
            "constructor_declaration",
            "compact_constructor_declaration",
            "field_declaration",
            "constant_declaration",
            "enum_constant",
        ],
    };

    pub const KOTLIN: Self = Self {
        name: "kotlin",
        declarations: &[
            "class_declaration",
            "object_declaration",
            "companion_object",
            "function_declaration",
            "property_declaration",
            "secondary_constructor",
            "type_alias",
            "enum_entry",
            "getter",
            "setter",
        ],
    };

    pub const JAVASCRIPT: Self = Self {
        name: "javascript",
        declarations: JS_DECLARATIONS,
    };

    pub const TYPESCRIPT: Self = Self {
        name: "typescript",
        declarations: TS_DECLARATIONS,
    };

    pub const TSX: Self = Self {
        name: "tsx",
        declarations: TS_DECLARATIONS,
    };

    /// `/**` opens a doc block; `/***` banners and the empty `/**/` do not.
    pub fn is_doc_block(text: &str) -> bool {
        text.starts_with("/**") && !text.starts_with("/***") && text != "/**/" && text.ends_with("*/")
    }
}

impl DocDialect for BlockDocDialect {
    fn name(&self) -> &str {
        self.name
    }

    fn is_doc_comment(&self, tree: &dyn SyntaxView, comment: NodeId) -> bool {
        comment_text(tree, comment).is_some_and(Self::is_doc_block)
    }

    fn owner_of(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<NodeId> {
        let next = following_siblings(tree, comment)
            .find(|n| tree.kind(*n) != Some(NodeKind::Whitespace))?;
        if tree.kind(next) != Some(NodeKind::Named) {
            return None;
        }
        let kind = tree.kind_name(next)?;
        self.declarations.contains(&kind).then_some(next)
    }
}
