//! Owner cache for documentation comments.
//!
//! Maps a comment's [`NodeId`] to the owner resolved for it together with
//! the tree modification stamp observed at the time. An entry is served only
//! while that stamp is current and its owner is still a valid node; anything
//! else is recomputed and overwritten on the next lookup.
//!
//! Keys are plain node handles, so the cache never keeps tree memory alive.
//! Entries of a closed document are dropped with [`DocCommentCache::forget`];
//! the map is capped and, when full, first sheds dead and stale entries of
//! the inserting document, then clears.

use crate::dialect::DocDialect;
use crate::ts::{NodeId, SyntaxTree, SyntaxView};
use parking_lot::Mutex;
use std::collections::HashMap;

pub const DEFAULT_CAPACITY: usize = 4096;

/// Resolved owner of one comment, tagged with the stamp it was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub owner: Option<NodeId>,
    pub modification_stamp: u64,
}

impl CacheEntry {
    /// Fresh iff computed at `stamp` and the owner, if any, still exists.
    pub fn is_valid(&self, stamp: u64, tree: &dyn SyntaxView) -> bool {
        self.modification_stamp == stamp && self.owner.map_or(true, |owner| tree.is_valid(owner))
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<NodeId, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Doc-comment owner cache shared by every lookup against the documents it
/// was created for.
///
/// The lock is never held while dialect code runs. Two threads missing on
/// the same comment both compute the owner and the later write wins; both
/// values are equal for the same stamp.
#[derive(Debug)]
pub struct DocCommentCache {
    state: Mutex<CacheState>,
    capacity: usize,
}

impl Default for DocCommentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DocCommentCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owner of `comment`, from cache when fresh, otherwise computed through
    /// `dialect` and stored.
    ///
    /// A comment the dialect does not consider documentation resolves to
    /// `None` without consulting [`DocDialect::owner_of`]; that negative
    /// result is cached too.
    pub fn resolve(
        &self,
        tree: &dyn SyntaxView,
        dialect: &dyn DocDialect,
        comment: NodeId,
    ) -> Option<NodeId> {
        if !tree.is_valid(comment) {
            return None;
        }

        let stamp = tree.modification_stamp();
        {
            let mut state = self.state.lock();
            if let Some(entry) = state.entries.get(&comment).copied() {
                if entry.is_valid(stamp, tree) {
                    state.hits += 1;
                    tracing::trace!(?comment, stamp, "doc owner cache hit");
                    return entry.owner;
                }
            }
            state.misses += 1;
        }

        let owner = if dialect.is_doc_comment(tree, comment) {
            dialect.owner_of(tree, comment)
        } else {
            None
        };
        tracing::debug!(
            ?comment,
            ?owner,
            stamp,
            dialect = dialect.name(),
            "resolved doc owner"
        );

        let mut state = self.state.lock();
        if !state.entries.contains_key(&comment) && state.entries.len() >= self.capacity {
            self.evict(&mut state, tree, comment.lineage(), stamp);
        }
        state.entries.insert(
            comment,
            CacheEntry {
                owner,
                modification_stamp: stamp,
            },
        );
        owner
    }

    /// The stored entry for `comment`, fresh or not.
    pub fn entry(&self, comment: NodeId) -> Option<CacheEntry> {
        self.state.lock().entries.get(&comment).copied()
    }

    /// Drop every entry of the document with the given lineage.
    pub fn forget(&self, lineage: u32) {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|comment, _| comment.lineage() != lineage);
        tracing::debug!(lineage, dropped = before - state.entries.len(), "forgot document");
    }

    /// Drop entries of `tree`'s document whose comment no longer exists.
    pub fn purge(&self, tree: &SyntaxTree) {
        let lineage = tree.lineage();
        let mut state = self.state.lock();
        state
            .entries
            .retain(|comment, _| comment.lineage() != lineage || tree.is_valid(*comment));
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    fn evict(&self, state: &mut CacheState, tree: &dyn SyntaxView, lineage: u32, stamp: u64) {
        let before = state.entries.len();
        state.entries.retain(|comment, entry| {
            comment.lineage() != lineage || (tree.is_valid(*comment) && entry.is_valid(stamp, tree))
        });

        // Nothing to shed: start over (simple but effective for batch scans)
        if state.entries.len() >= self.capacity {
            state.entries.clear();
        }
        tracing::debug!(
            evicted = before - state.entries.len(),
            capacity = self.capacity,
            "doc owner cache full"
        );
    }
}
