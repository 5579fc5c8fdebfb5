//! Locator + cache behavior against hand-built trees and a call-counting
//! dialect.

use doc_locator::ts::following_siblings;
use doc_locator::{
    DocCommentCache, DocDialect, DocumentationProvider, NodeId, NodeKind, SyntaxTree, SyntaxView,
    TreeBuilder,
};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Dialect whose answers are fixed and whose owner lookups are counted.
struct Stub {
    doc: bool,
    pick: bool,
    owner_calls: Arc<AtomicUsize>,
}

impl Stub {
    fn new(doc: bool, pick: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                doc,
                pick,
                owner_calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl DocDialect for Stub {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_doc_comment(&self, _tree: &dyn SyntaxView, _comment: NodeId) -> bool {
        self.doc
    }

    fn owner_of(&self, tree: &dyn SyntaxView, comment: NodeId) -> Option<NodeId> {
        self.owner_calls.fetch_add(1, Ordering::SeqCst);
        following_siblings(tree, comment).find(|n| tree.kind(*n) == Some(NodeKind::Named))
    }

    fn is_pickable_at_edge(&self, _tree: &dyn SyntaxView, _comment: NodeId) -> bool {
        self.pick
    }
}

/// A view over a real tree with a stamp and node validity we control.
struct Overlay<'a> {
    tree: &'a SyntaxTree,
    stamp: u64,
    dead: HashSet<NodeId>,
}

impl<'a> Overlay<'a> {
    fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            stamp: tree.modification_stamp(),
            dead: HashSet::new(),
        }
    }
}

impl SyntaxView for Overlay<'_> {
    fn text_len(&self) -> usize {
        self.tree.text_len()
    }

    fn node_at(&self, offset: usize) -> Option<NodeId> {
        self.tree.node_at(offset)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.tree.children(node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev_sibling(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(node)
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.tree.kind(node)
    }

    fn kind_name(&self, node: NodeId) -> Option<&str> {
        self.tree.kind_name(node)
    }

    fn text_range(&self, node: NodeId) -> Option<Range<usize>> {
        self.tree.text_range(node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.tree.text(node)
    }

    fn modification_stamp(&self) -> u64 {
        self.stamp
    }

    fn is_valid(&self, node: NodeId) -> bool {
        !self.dead.contains(&node) && self.tree.is_valid(node)
    }
}

/// Comment C at 0..10, whitespace 10..12, declaration D at 12..30.
fn scenario() -> (SyntaxTree, NodeId, NodeId) {
    let source = "/** C. **/\n\nfn documented() {}";
    assert_eq!(source.len(), 30);

    let mut b = TreeBuilder::new(source, "file");
    let comment = b.token("comment", NodeKind::Comment, 0..10);
    b.whitespace(10..12);
    b.start_node("declaration", NodeKind::Named, 12);
    b.token("fn", NodeKind::Token, 12..14);
    b.whitespace(14..15);
    b.token("name", NodeKind::Named, 15..25);
    b.token("params", NodeKind::Named, 25..27);
    b.whitespace(27..28);
    b.token("body", NodeKind::Named, 28..30);
    let declaration = b.finish_node(30);
    (b.finish(), comment, declaration)
}

#[test]
fn end_to_end_scenario() {
    let (tree, comment, declaration) = scenario();
    let (stub, _) = Stub::new(true, true);
    let provider = DocumentationProvider::new(Box::new(stub));

    assert_eq!(provider.find_documentation_element_at(&tree, 10), Some(comment));
    assert_eq!(provider.documentation_owner(&tree, comment), Some(declaration));
    assert_eq!(provider.find_documentation_element_at(&tree, 11), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 5), Some(comment));
}

#[test]
fn cache_coherence_calls_owner_once() {
    let (tree, comment, declaration) = scenario();
    let (stub, calls) = Stub::new(true, true);
    let cache = DocCommentCache::new();

    for _ in 0..5 {
        assert_eq!(cache.resolve(&tree, &stub, comment), Some(declaration));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().hits, 4);
}

#[test]
fn stamp_change_forces_recompute() {
    let (tree, comment, declaration) = scenario();
    let (stub, calls) = Stub::new(true, true);
    let cache = DocCommentCache::new();

    let mut view = Overlay::new(&tree);
    assert_eq!(cache.resolve(&view, &stub, comment), Some(declaration));

    view.stamp += 1;
    assert!(view.is_valid(declaration));
    assert_eq!(cache.resolve(&view, &stub, comment), Some(declaration));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.entry(comment).unwrap().modification_stamp, view.stamp);

    assert_eq!(cache.resolve(&view, &stub, comment), Some(declaration));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn dead_owner_forces_recompute() {
    let (tree, comment, declaration) = scenario();
    let (stub, calls) = Stub::new(true, true);
    let cache = DocCommentCache::new();

    let mut view = Overlay::new(&tree);
    assert_eq!(cache.resolve(&view, &stub, comment), Some(declaration));

    // Same stamp, but the owner handle no longer names a node
    view.dead.insert(declaration);
    cache.resolve(&view, &stub, comment);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn negative_qualification_is_terminal() {
    let (tree, comment, _) = scenario();
    let (stub, calls) = Stub::new(false, true);
    let provider = DocumentationProvider::new(Box::new(stub));

    assert_eq!(provider.documentation_owner(&tree, comment), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 3), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 10), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.cache().entry(comment).map(|e| e.owner), Some(None));
}

#[test]
fn edge_pick_only_when_dialect_opts_in() {
    let (tree, comment, _) = scenario();

    let (picky, _) = Stub::new(true, true);
    let provider = DocumentationProvider::new(Box::new(picky));
    assert_eq!(provider.find_documentation_element_at(&tree, 10), Some(comment));

    let (strict, _) = Stub::new(true, false);
    let provider = DocumentationProvider::new(Box::new(strict));
    assert_eq!(provider.find_documentation_element_at(&tree, 10), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 0), Some(comment));
}

#[test]
fn mid_whitespace_never_edge_picks() {
    let (tree, _, _) = scenario();
    let (stub, calls) = Stub::new(true, true);
    let provider = DocumentationProvider::new(Box::new(stub));

    assert_eq!(provider.find_documentation_element_at(&tree, 11), None);
    // Inside the declaration's own whitespace
    assert_eq!(provider.find_documentation_element_at(&tree, 14), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn cursor_before_comment_does_not_resolve_forward() {
    let source = "x\n/** C. */\nfn f() {}";
    let mut b = TreeBuilder::new(source, "file");
    b.token("ident", NodeKind::Named, 0..1);
    b.whitespace(1..2);
    let comment = b.token("comment", NodeKind::Comment, 2..11);
    b.whitespace(11..12);
    b.token("declaration", NodeKind::Named, 12..21);
    let tree = b.finish();

    let (stub, _) = Stub::new(true, true);
    let provider = DocumentationProvider::new(Box::new(stub));
    assert_eq!(provider.find_documentation_element_at(&tree, 1), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 2), Some(comment));
}

#[test]
fn comment_without_owner_is_not_a_documentation_element() {
    let source = "/** C. */\n";
    let mut b = TreeBuilder::new(source, "file");
    let comment = b.token("comment", NodeKind::Comment, 0..9);
    b.whitespace(9..10);
    let tree = b.finish();

    let (stub, calls) = Stub::new(true, true);
    let provider = DocumentationProvider::new(Box::new(stub));
    assert_eq!(provider.find_documentation_element_at(&tree, 4), None);
    assert_eq!(provider.find_documentation_element_at(&tree, 9), None);
    assert_eq!(provider.documentation_owner(&tree, comment), None);
    // The negative result is remembered for the stamp
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cache_is_shareable_across_threads() {
    let (tree, comment, declaration) = scenario();
    let (stub, calls) = Stub::new(true, true);
    let cache = DocCommentCache::new();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..16 {
                    assert_eq!(cache.resolve(&tree, &stub, comment), Some(declaration));
                }
            });
        }
    });

    let computed = calls.load(Ordering::SeqCst);
    assert!((1..=4).contains(&computed), "computed {computed} times");
    assert_eq!(cache.len(), 1);
}
