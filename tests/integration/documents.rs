//! Lookups against parsed documents, across languages and edits.

use doc_locator::{
    load_from_str, Document, DocumentationProvider, SupportLang, SyntaxView, TextEdit,
};

fn provider(lang: SupportLang) -> DocumentationProvider {
    DocumentationProvider::for_language(lang).unwrap()
}

/// Kind of the owner found for a cursor inside the first comment.
fn owner_kind_at_first_comment(lang: SupportLang, source: &str) -> Option<String> {
    let doc = Document::parse(lang, source).unwrap();
    let tree = doc.tree();
    let start = tree.text_range(tree.comments()[0]).unwrap().start;
    provider(lang)
        .lookup(tree, start + 1)
        .map(|found| found.owner.kind)
}

#[test]
fn rust_attribute_between_doc_and_item() {
    let source = "/// Derived.\n#[derive(Debug)]\npub struct Derived;\n";
    assert_eq!(
        owner_kind_at_first_comment(SupportLang::Rust, source).as_deref(),
        Some("struct_item")
    );
}

#[test]
fn go_function_doc() {
    let source = "package p\n\n// Sum adds.\nfunc Sum(a, b int) int { return a + b }\n";
    assert_eq!(
        owner_kind_at_first_comment(SupportLang::Go, source).as_deref(),
        Some("function_declaration")
    );
}

#[test]
fn go_line_doc_picks_at_edge() {
    let source = "package p\n\n// Sum adds.\nfunc Sum(a, b int) int { return a + b }\n";
    let doc = Document::parse(SupportLang::Go, source).unwrap();
    let tree = doc.tree();
    let comment = tree.comments()[0];
    let edge = tree.text_range(comment).unwrap().end;

    assert_eq!(
        provider(SupportLang::Go).find_documentation_element_at(tree, edge),
        Some(comment)
    );
}

#[test]
fn java_and_kotlin_docs() {
    assert_eq!(
        owner_kind_at_first_comment(SupportLang::Java, "/** Entry. */\nclass Main {}\n").as_deref(),
        Some("class_declaration")
    );
    assert_eq!(
        owner_kind_at_first_comment(SupportLang::Kotlin, "/** Entry. */\nclass Main\n").as_deref(),
        Some("class_declaration")
    );
}

#[test]
fn typescript_family_docs() {
    assert_eq!(
        owner_kind_at_first_comment(
            SupportLang::TypeScript,
            "/** Options. */\ninterface Options { verbose: boolean }\n"
        )
        .as_deref(),
        Some("interface_declaration")
    );
    assert_eq!(
        owner_kind_at_first_comment(
            SupportLang::Tsx,
            "/** Renders. */\nfunction App() { return <div />; }\n"
        )
        .as_deref(),
        Some("function_declaration")
    );
    assert_eq!(
        owner_kind_at_first_comment(
            SupportLang::JavaScript,
            "/** Shape. */\nclass Shape {}\n"
        )
        .as_deref(),
        Some("class_declaration")
    );
}

#[test]
fn block_doc_edge_pick_is_configurable() {
    let source = "/** Entry. */\nclass Main {}\n";
    let doc = Document::parse(SupportLang::Java, source).unwrap();
    let tree = doc.tree();
    let comment = tree.comments()[0];
    let edge = tree.text_range(comment).unwrap().end;

    assert_eq!(provider(SupportLang::Java).find_documentation_element_at(tree, edge), None);

    let config = load_from_str("[dialects.java]\npick_at_edge = true\n").unwrap();
    let tuned = DocumentationProvider::from_config(SupportLang::Java, &config).unwrap();
    assert_eq!(tuned.find_documentation_element_at(tree, edge), Some(comment));
}

#[test]
fn edit_recomputes_owner_for_new_stamp() {
    let mut doc = Document::parse(SupportLang::Rust, "/// Doc.\n\nfn kept() {}\n").unwrap();
    let provider = provider(SupportLang::Rust);
    let comment = doc.tree().comments()[0];
    let owner = provider.documentation_owner(doc.tree(), comment).unwrap();
    assert_eq!(provider.cache().entry(comment).unwrap().modification_stamp, 0);

    // Append after the item: nothing the comment depends on moves
    let end = doc.source().len();
    doc.apply(&TextEdit::insert(end, "\nfn later() {}\n")).unwrap();

    assert!(doc.tree().is_valid(comment));
    assert_eq!(provider.documentation_owner(doc.tree(), comment), Some(owner));
    assert_eq!(provider.cache().entry(comment).unwrap().modification_stamp, 1);
    assert_eq!(provider.cache().stats().misses, 2);
}

#[test]
fn deleting_the_owner_clears_the_lookup() {
    let source = "/// Doc.\n\nfn gone() {}\n";
    let mut doc = Document::parse(SupportLang::Rust, source).unwrap();
    let provider = provider(SupportLang::Rust);
    let comment = doc.tree().comments()[0];
    let owner = provider.documentation_owner(doc.tree(), comment).unwrap();

    let start = source.find("fn gone").unwrap();
    doc.apply(&TextEdit::delete(start, start + "fn gone() {}".len()).expecting("fn gone() {}"))
        .unwrap();

    assert!(!doc.tree().is_valid(owner));
    assert!(doc.tree().is_valid(comment));
    assert_eq!(provider.documentation_owner(doc.tree(), comment), None);
    assert_eq!(provider.find_documentation_element_at(doc.tree(), 2), None);
}

#[test]
fn edit_inside_comment_invalidates_its_handle() {
    let source = "/// Doc.\n\nfn f() {}\n";
    let mut doc = Document::parse(SupportLang::Rust, source).unwrap();
    let provider = provider(SupportLang::Rust);
    let comment = doc.tree().comments()[0];
    provider.documentation_owner(doc.tree(), comment).unwrap();

    doc.apply(&TextEdit::replace(4, 7, "Text").expecting("Doc")).unwrap();

    assert!(!doc.tree().is_valid(comment));
    assert_eq!(provider.documentation_owner(doc.tree(), comment), None);

    let fresh = provider.find_documentation_element_at(doc.tree(), 4).unwrap();
    assert_ne!(fresh, comment);
    assert_eq!(fresh.lineage(), comment.lineage());

    provider.cache().purge(doc.tree());
    assert!(provider.cache().entry(comment).is_none());
    assert!(provider.cache().entry(fresh).is_some());
}

#[test]
fn scan_lists_docs_in_order() {
    let source = "//! Crate.\n\n/// One.\nfn one() {}\n\n// skip\nfn two() {}\n\n/// Three.\nfn three() {}\n";
    let doc = Document::parse(SupportLang::Rust, source).unwrap();
    let found = provider(SupportLang::Rust).doc_comments(doc.tree());

    let owners: Vec<&str> = found.iter().map(|f| f.owner.kind.as_str()).collect();
    assert_eq!(owners, ["source_file", "function_item", "function_item"]);
    assert!(found[1].owner.text.starts_with("fn one"));
    assert!(found[2].owner.text.starts_with("fn three"));
}
