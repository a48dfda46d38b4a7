use std::marker::PhantomData;

use crate::{Alphabet, Error, NodeFlavor, NodeId, TransitionTable, ROOT};

/// A prefix tree over a fixed alphabet.
///
/// Nodes live in a flat arena addressed by [`NodeId`]; node 0 is the root.
/// Each node carries a flavor payload `F` that decides what insertions
/// record and what lookups report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trie<A: Alphabet, F: NodeFlavor> {
    pub(crate) table: TransitionTable,
    pub(crate) nodes: Vec<F>,
    words: usize,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet, F: NodeFlavor> Default for Trie<A, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet, F: NodeFlavor> Trie<A, F> {
    /// Creates a trie holding only the root.
    pub fn new() -> Self {
        Self {
            table: TransitionTable::new(A::SIZE),
            nodes: vec![F::default()],
            words: 0,
            _alphabet: PhantomData,
        }
    }

    /// Creates an empty trie with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut trie = Self::new();
        trie.table.reserve_rows(nodes.saturating_sub(1));
        trie.nodes.reserve(nodes.saturating_sub(1));
        trie
    }

    /// Returns the number of nodes, root included.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of insertions since creation or the last `clear`.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Returns the payload of node `id`.
    #[inline]
    pub fn node(&self, id: NodeId) -> &F {
        &self.nodes[id as usize]
    }

    /// Returns the child of `id` along `symbol`.
    #[inline]
    pub fn child(&self, id: NodeId, symbol: A::Symbol) -> Option<NodeId> {
        match self.table.get(id, A::key(symbol)) {
            0 => None,
            next => Some(next),
        }
    }

    fn alloc(&mut self) -> NodeId {
        self.nodes.push(F::default());
        self.table.push_row()
    }

    fn insert_keys(&mut self, keys: impl IntoIterator<Item = usize>) -> NodeId {
        let mut u = ROOT;
        for key in keys {
            let mut next = self.table.get(u, key);
            if next == 0 {
                next = self.alloc();
                self.table.set(u, key, next);
            }
            u = next;
            self.nodes[u as usize].prefix_update();
        }
        self.nodes[u as usize].suffix_update(self.words);
        self.words += 1;
        u
    }

    /// Inserts a word and returns its terminal node.
    ///
    /// Missing nodes are allocated on the way down. The prefix hook fires on
    /// every visited node below the root; the suffix hook fires once on the
    /// terminal node with the word's ordinal.
    pub fn insert(&mut self, word: impl IntoIterator<Item = A::Symbol>) -> NodeId {
        self.insert_keys(word.into_iter().map(A::key))
    }

    /// Like [`insert`](Self::insert), but rejects words with symbols outside
    /// the alphabet before touching the trie.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolOutOfAlphabet`] for the first invalid symbol.
    pub fn try_insert(
        &mut self,
        word: impl IntoIterator<Item = A::Symbol>,
    ) -> Result<NodeId, Error> {
        let keys = word
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| {
                A::try_key(symbol).ok_or(Error::SymbolOutOfAlphabet { position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.insert_keys(keys))
    }

    /// Walks `word` from the root. Returns the node reached, or `None` if a
    /// transition is missing.
    pub fn find(&self, word: impl IntoIterator<Item = A::Symbol>) -> Option<NodeId> {
        let mut u = ROOT;
        for symbol in word {
            u = self.child(u, symbol)?;
        }
        Some(u)
    }

    /// Exact-match lookup. Returns the flavor's empty output if `word` is not
    /// a path in the trie.
    pub fn query(&self, word: impl IntoIterator<Item = A::Symbol>) -> F::Output {
        match self.find(word) {
            Some(u) => self.nodes[u as usize].peek(),
            None => F::Output::default(),
        }
    }

    /// Resets the trie to a lone root. Allocated storage is kept.
    pub fn clear(&mut self) {
        self.table.reset();
        self.nodes.truncate(1);
        self.nodes[0] = F::default();
        self.words = 0;
    }
}
