//! Per-node payloads ("flavors") attached to trie nodes.
//!
//! A flavor decides what a node remembers about the words inserted through
//! it and what a lookup reports. Every hook has a no-op default so a flavor
//! only pays for what it uses; dispatch is static.

use std::fmt::Debug;

/// Behaviour attached to each trie node.
pub trait NodeFlavor: Clone + Default + PartialEq + Debug {
    /// What a lookup at this node reports. `Default` is the "not found" value.
    type Output: Default;

    /// Called on every node visited by an insertion, root excluded.
    #[inline]
    fn prefix_update(&mut self) {}

    /// Called once on the terminal node of an insertion. `word` is the
    /// ordinal of the inserted word.
    #[inline]
    fn suffix_update(&mut self, _word: usize) {}

    /// Whether some inserted word ends at this node.
    fn is_match(&self) -> bool;

    /// Whether an Aho-Corasick walk should still read this node.
    #[inline]
    fn queryable(&self) -> bool {
        true
    }

    /// Reads the node without changing it.
    fn peek(&self) -> Self::Output;

    /// Reads the node during an Aho-Corasick walk.
    #[inline]
    fn take(&mut self) -> Self::Output {
        self.peek()
    }
}

/// Counts how many times each word was inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordCount {
    count: usize,
}

impl NodeFlavor for WordCount {
    type Output = usize;

    #[inline]
    fn suffix_update(&mut self, _word: usize) {
        self.count += 1;
    }

    #[inline]
    fn is_match(&self) -> bool {
        self.count > 0
    }

    #[inline]
    fn peek(&self) -> usize {
        self.count
    }
}

/// Counts the words that pass through a node.
///
/// A lookup reports how many inserted words start with the queried prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefixCount {
    pass: usize,
    end: usize,
}

impl PrefixCount {
    /// Number of inserted words ending exactly here.
    pub fn ends(&self) -> usize {
        self.end
    }
}

impl NodeFlavor for PrefixCount {
    type Output = usize;

    #[inline]
    fn prefix_update(&mut self) {
        self.pass += 1;
    }

    #[inline]
    fn suffix_update(&mut self, _word: usize) {
        self.end += 1;
    }

    #[inline]
    fn is_match(&self) -> bool {
        self.end > 0
    }

    #[inline]
    fn peek(&self) -> usize {
        self.pass
    }
}

/// Counts insertions and hands the count out once.
///
/// [`take`](NodeFlavor::take) returns the count and marks the node consumed;
/// a consumed node stops every later Aho-Corasick walk that reaches it, so
/// the number of distinct patterns occurring in a text is counted exactly
/// once. The mark survives across queries on the same automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndCount {
    count: usize,
    consumed: bool,
}

impl EndCount {
    /// Whether the count has already been taken.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

impl NodeFlavor for EndCount {
    type Output = usize;

    #[inline]
    fn suffix_update(&mut self, _word: usize) {
        self.count += 1;
    }

    #[inline]
    fn is_match(&self) -> bool {
        self.count > 0
    }

    #[inline]
    fn queryable(&self) -> bool {
        !self.consumed
    }

    #[inline]
    fn peek(&self) -> usize {
        self.count
    }

    #[inline]
    fn take(&mut self) -> usize {
        self.consumed = true;
        self.count
    }
}

/// Remembers the ordinal of the word ending at a node.
///
/// If the same word is inserted twice the later ordinal wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordIndex {
    index: Option<usize>,
}

impl NodeFlavor for WordIndex {
    type Output = Option<usize>;

    #[inline]
    fn suffix_update(&mut self, word: usize) {
        self.index = Some(word);
    }

    #[inline]
    fn is_match(&self) -> bool {
        self.index.is_some()
    }

    #[inline]
    fn peek(&self) -> Option<usize> {
        self.index
    }
}
