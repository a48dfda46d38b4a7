use std::collections::VecDeque;

use log::debug;

use crate::{Alphabet, NodeFlavor, NodeId, Trie, ROOT};

/// A match reported by [`AhoCorasick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match<T> {
    /// Position of the last symbol of the occurrence in the text.
    pub end: usize,
    /// The absorbed value, or the terminal node for [`AhoCorasick::find_iter`].
    pub value: T,
}

/// Accumulates the values read during [`AhoCorasick::query`].
///
/// The sink starts from `Default` and absorbs one value per matching state
/// visited. States at the same text position may be absorbed in any order.
pub trait MatchSink<T>: Default {
    /// Absorbs the value of one matching state ending at `end`.
    fn absorb(&mut self, end: usize, value: T);
}

impl MatchSink<usize> for usize {
    #[inline]
    fn absorb(&mut self, _end: usize, value: usize) {
        *self += value;
    }
}

impl<T> MatchSink<T> for Vec<Match<T>> {
    #[inline]
    fn absorb(&mut self, end: usize, value: T) {
        self.push(Match { end, value });
    }
}

/// Occurrence counts indexed by word ordinal, for [`WordIndex`](crate::WordIndex) tries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexCounts {
    counts: Vec<usize>,
}

impl IndexCounts {
    /// Occurrences of the word with ordinal `word`.
    pub fn get(&self, word: usize) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Counts for ordinals `0..len`; trailing never-seen ordinals are absent.
    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }

    /// Sum over all ordinals.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl MatchSink<Option<usize>> for IndexCounts {
    #[inline]
    fn absorb(&mut self, _end: usize, value: Option<usize>) {
        if let Some(word) = value {
            if word >= self.counts.len() {
                self.counts.resize(word + 1, 0);
            }
            self.counts[word] += 1;
        }
    }
}

/// A multi-pattern matcher compiled from a fully populated [`Trie`].
///
/// Construction runs one breadth-first pass that assigns every node its
/// failure link (the longest proper suffix of its path that is also a trie
/// path) and fills every missing transition with the transition of the
/// failure target, turning the trie into a complete DFA.
#[derive(Clone, Debug)]
pub struct AhoCorasick<A: Alphabet, F: NodeFlavor> {
    trie: Trie<A, F>,
    fail: Vec<NodeId>,
    /// Nearest proper failure ancestor with `is_match`, `ROOT` if none.
    output: Vec<NodeId>,
    depth: Vec<u32>,
    /// Non-root nodes in BFS order.
    order: Vec<NodeId>,
}

impl<A: Alphabet, F: NodeFlavor> AhoCorasick<A, F> {
    /// Compiles `trie`. All patterns must be inserted beforehand.
    pub fn new(mut trie: Trie<A, F>) -> Self {
        let n = trie.num_nodes();
        let mut fail = vec![ROOT; n];
        let mut output = vec![ROOT; n];
        let mut depth = vec![0u32; n];
        let mut order = Vec::with_capacity(n - 1);

        let mut queue = VecDeque::new();
        for &child in trie.table.row(ROOT) {
            if child != 0 {
                depth[child as usize] = 1;
                queue.push_back(child);
            }
        }

        while let Some(u) = queue.pop_front() {
            order.push(u);
            let f = fail[u as usize];
            for key in 0..A::SIZE {
                let child = trie.table.get(u, key);
                let via_fail = trie.table.get(f, key);
                if child != 0 {
                    fail[child as usize] = via_fail;
                    depth[child as usize] = depth[u as usize] + 1;
                    output[child as usize] =
                        if via_fail != ROOT && trie.nodes[via_fail as usize].is_match() {
                            via_fail
                        } else {
                            output[via_fail as usize]
                        };
                    queue.push_back(child);
                } else {
                    trie.table.set(u, key, via_fail);
                }
            }
        }

        debug!(
            "built Aho-Corasick automaton: {} nodes, max depth {}",
            n,
            depth.iter().max().copied().unwrap_or(0)
        );

        Self {
            trie,
            fail,
            output,
            depth,
            order,
        }
    }

    /// Returns the payload of node `id`.
    #[inline]
    pub fn node(&self, id: NodeId) -> &F {
        self.trie.node(id)
    }

    /// Walks `pattern` along trie edges only, skipping the filled-in
    /// failure moves. Returns `None` unless `pattern` is a prefix of some
    /// inserted word.
    pub fn find(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> Option<NodeId> {
        let mut u = ROOT;
        for symbol in pattern {
            let next = self.next_state(u, symbol);
            if self.depth[next as usize] != self.depth[u as usize] + 1 {
                return None;
            }
            u = next;
        }
        Some(u)
    }

    /// Exact-match lookup with the semantics of [`Trie::query`]. Nodes are
    /// not consumed.
    pub fn lookup(&self, word: impl IntoIterator<Item = A::Symbol>) -> F::Output {
        match self.find(word) {
            Some(u) => self.trie.node(u).peek(),
            None => F::Output::default(),
        }
    }

    /// Number of automaton states (trie nodes).
    #[inline]
    pub fn num_states(&self) -> usize {
        self.fail.len()
    }

    /// The state reached from `state` on `symbol`. Never fails.
    #[inline]
    pub fn next_state(&self, state: NodeId, symbol: A::Symbol) -> NodeId {
        self.trie.table.get(state, A::key(symbol))
    }

    /// Failure link of `state`. The root links to itself.
    #[inline]
    pub fn fail_link(&self, state: NodeId) -> NodeId {
        self.fail[state as usize]
    }

    /// Length of the path spelled by `state`.
    #[inline]
    pub fn depth(&self, state: NodeId) -> usize {
        self.depth[state as usize] as usize
    }

    /// Streams `text` through the automaton and collects a result.
    ///
    /// After each symbol the failure chain of the current state is walked up
    /// to the root, stopping early at the first state that is no longer
    /// [`queryable`](NodeFlavor::queryable). Every state on the way is read
    /// with [`take`](NodeFlavor::take); matching states are absorbed.
    ///
    /// With [`EndCount`](crate::EndCount) nodes a second query on the same
    /// automaton does not recount patterns seen by the first one.
    pub fn query<R: MatchSink<F::Output>>(
        &mut self,
        text: impl IntoIterator<Item = A::Symbol>,
    ) -> R {
        let mut result = R::default();
        let mut state = ROOT;
        for (end, symbol) in text.into_iter().enumerate() {
            state = self.trie.table.get(state, A::key(symbol));
            let mut s = state;
            while s != ROOT && self.trie.nodes[s as usize].queryable() {
                let node = &mut self.trie.nodes[s as usize];
                let value = node.take();
                if node.is_match() {
                    result.absorb(end, value);
                }
                s = self.fail[s as usize];
            }
        }
        result
    }

    /// Iterates over every pattern occurrence in `text`, by end position.
    ///
    /// Only dictionary links between matching states are followed, so the
    /// cost is linear in the text plus the number of matches. Nodes are not
    /// modified.
    pub fn find_iter<I>(&self, text: I) -> FindIter<'_, A, F, I::IntoIter>
    where
        I: IntoIterator<Item = A::Symbol>,
    {
        FindIter {
            ac: self,
            text: text.into_iter(),
            pos: 0,
            state: ROOT,
            pending: ROOT,
        }
    }

    /// Counts how often each state's path occurs in `text`.
    ///
    /// Visits are counted once per position and then pushed up the failure
    /// tree in reverse BFS order. The root's count equals the text length.
    pub fn node_hits(&self, text: impl IntoIterator<Item = A::Symbol>) -> Vec<usize> {
        let mut hits = vec![0usize; self.num_states()];
        let mut state = ROOT;
        for symbol in text {
            state = self.next_state(state, symbol);
            hits[state as usize] += 1;
        }
        for &u in self.order.iter().rev() {
            hits[self.fail[u as usize] as usize] += hits[u as usize];
        }
        hits
    }

    /// Gives the trie back, with only its original edges.
    ///
    /// Filled-in failure moves are recognised by depth: a real trie edge
    /// always goes exactly one level down. The returned trie can take more
    /// insertions and be compiled again.
    pub fn release(self) -> Trie<A, F> {
        let Self {
            mut trie, depth, ..
        } = self;
        let rows = trie.num_nodes() as u32;
        for u in 0..rows {
            let below = depth[u as usize] + 1;
            for target in trie.table.row_mut(u) {
                if *target != 0 && depth[*target as usize] != below {
                    *target = 0;
                }
            }
        }
        debug!("released Aho-Corasick trie: {} nodes", rows);
        trie
    }
}

/// Iterator returned by [`AhoCorasick::find_iter`].
pub struct FindIter<'a, A: Alphabet, F: NodeFlavor, I> {
    ac: &'a AhoCorasick<A, F>,
    text: I,
    pos: usize,
    state: NodeId,
    /// Next matching state to report at the current position.
    pending: NodeId,
}

impl<A, F, I> Iterator for FindIter<'_, A, F, I>
where
    A: Alphabet,
    F: NodeFlavor,
    I: Iterator<Item = A::Symbol>,
{
    type Item = Match<NodeId>;

    fn next(&mut self) -> Option<Match<NodeId>> {
        loop {
            if self.pending != ROOT {
                let node = self.pending;
                self.pending = self.ac.output[node as usize];
                return Some(Match {
                    end: self.pos - 1,
                    value: node,
                });
            }
            let symbol = self.text.next()?;
            self.state = self.ac.next_state(self.state, symbol);
            self.pos += 1;
            self.pending = if self.state != ROOT && self.ac.trie.node(self.state).is_match() {
                self.state
            } else {
                self.ac.output[self.state as usize]
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EndCount, Lowercase, WordCount, WordIndex};

    const PATTERNS: [&str; 4] = ["he", "she", "his", "hers"];

    fn trie_of<F: NodeFlavor>(patterns: &[&str]) -> Trie<Lowercase, F> {
        let mut trie = Trie::new();
        for p in patterns {
            trie.insert(p.bytes());
        }
        trie
    }

    // === construction tests ===

    #[test]
    fn fail_links_point_to_longest_suffix() {
        let trie = trie_of::<WordCount>(&PATTERNS);
        let she = trie.find("she".bytes()).unwrap();
        let he = trie.find("he".bytes()).unwrap();
        let hers = trie.find("hers".bytes()).unwrap();
        let s = trie.find("s".bytes()).unwrap();
        let ac = AhoCorasick::new(trie);
        assert_eq!(ac.fail_link(she), he);
        assert_eq!(ac.fail_link(hers), s);
        assert_eq!(ac.fail_link(ROOT), ROOT);
        assert_eq!(ac.depth(hers), 4);
        for u in 1..ac.num_states() as NodeId {
            assert!(ac.depth(ac.fail_link(u)) < ac.depth(u));
        }
    }

    #[test]
    fn transitions_are_complete() {
        let ac = AhoCorasick::new(trie_of::<WordCount>(&PATTERNS));
        let sh = ac.find("sh".bytes()).unwrap();
        let her = ac.find("her".bytes()).unwrap();
        // "sh" + 'e' is a real edge, "she" + 'r' falls back to "her"
        let she = ac.next_state(sh, b'e');
        assert_eq!(ac.next_state(she, b'r'), her);
        assert_eq!(ac.next_state(ROOT, b'z'), ROOT);
    }

    #[test]
    fn lookup_ignores_failure_moves() {
        let ac = AhoCorasick::new(trie_of::<WordCount>(&["h"]));
        // "h" + 'h' is a filled-in move back to "h"
        let h = ac.find("h".bytes()).unwrap();
        assert_eq!(ac.next_state(h, b'h'), h);
        assert_eq!(ac.find("hh".bytes()), None);
        assert_eq!(ac.lookup("hh".bytes()), 0);
        assert_eq!(ac.lookup("h".bytes()), 1);
        assert_eq!(ac.lookup("".bytes()), 0);

        let ac = AhoCorasick::new(trie_of::<WordCount>(&PATTERNS));
        assert_eq!(ac.find("sher".bytes()), None);
        assert_eq!(ac.lookup("she".bytes()), 1);
        assert_eq!(ac.lookup("sh".bytes()), 0);
        assert_eq!(ac.find("sh".bytes()).map(|u| ac.depth(u)), Some(2));
    }

    // === query tests ===

    #[test]
    fn query_reports_positions() {
        let mut ac = AhoCorasick::new(trie_of::<WordIndex>(&PATTERNS));
        let mut found: Vec<Match<Option<usize>>> = ac.query("ahishers".bytes());
        found.sort_by_key(|m| (m.end, m.value));
        let expected = [(3, 2), (5, 0), (5, 1), (7, 3)];
        let got: Vec<(usize, usize)> = found.iter().map(|m| (m.end, m.value.unwrap())).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn index_counts_per_pattern() {
        let mut ac = AhoCorasick::new(trie_of::<WordIndex>(&["a", "aa", "b"]));
        let counts: IndexCounts = ac.query("aaab".bytes());
        assert_eq!(counts.as_slice(), &[3, 2, 1]);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get(7), 0);
        // WordIndex nodes stay queryable, so a second query sees the same
        let again: IndexCounts = ac.query("aaab".bytes());
        assert_eq!(again, counts);
    }

    #[test]
    fn end_count_counts_distinct_patterns_once() {
        let mut ac = AhoCorasick::new(trie_of::<EndCount>(&["a", "a", "ab", "c"]));
        let total: usize = ac.query("abab".bytes());
        // "a" inserted twice, "ab" once; "c" absent
        assert_eq!(total, 3);
    }

    #[test]
    fn end_count_second_query_sees_consumed_nodes() {
        let mut ac = AhoCorasick::new(trie_of::<EndCount>(&PATTERNS));
        let first: usize = ac.query("ahishers".bytes());
        assert_eq!(first, 4);
        let second: usize = ac.query("ahishers".bytes());
        assert_eq!(second, 0);
        let fresh: usize = AhoCorasick::new(ac.release()).query("she".bytes());
        assert_eq!(fresh, 0);
    }

    // === find_iter / node_hits tests ===

    #[test]
    fn find_iter_matches_query_positions() {
        let ac = AhoCorasick::new(trie_of::<WordIndex>(&PATTERNS));
        let found: Vec<(usize, Option<usize>)> = ac
            .find_iter("ahishers".bytes())
            .map(|m| (m.end, ac.node(m.value).peek()))
            .collect();
        assert_eq!(
            found,
            vec![(3, Some(2)), (5, Some(1)), (5, Some(0)), (7, Some(3))]
        );
    }

    #[test]
    fn find_iter_on_text_without_matches() {
        let ac = AhoCorasick::new(trie_of::<WordCount>(&PATTERNS));
        assert_eq!(ac.find_iter("xyz".bytes()).count(), 0);
        assert_eq!(ac.find_iter("".bytes()).count(), 0);
    }

    #[test]
    fn node_hits_counts_overlapping_occurrences() {
        let trie = trie_of::<WordCount>(&["aa", "a", "aaa"]);
        let a = trie.find("a".bytes()).unwrap();
        let aa = trie.find("aa".bytes()).unwrap();
        let aaa = trie.find("aaa".bytes()).unwrap();
        let ac = AhoCorasick::new(trie);
        let hits = ac.node_hits("aaaa".bytes());
        assert_eq!(hits[a as usize], 4);
        assert_eq!(hits[aa as usize], 3);
        assert_eq!(hits[aaa as usize], 2);
        assert_eq!(hits[ROOT as usize], 4);
    }

    // === release tests ===

    #[test]
    fn release_restores_original_trie() {
        let trie = trie_of::<WordCount>(&PATTERNS);
        let released = AhoCorasick::new(trie.clone()).release();
        assert_eq!(released, trie);
        assert_eq!(released.query("sh".bytes()), 0);
        assert_eq!(released.find("hx".bytes()), None);
    }

    #[test]
    fn released_trie_can_grow_and_rebuild() {
        let mut trie = AhoCorasick::new(trie_of::<WordCount>(&["ab"])).release();
        trie.insert("bc".bytes());
        let ac = AhoCorasick::new(trie);
        assert_eq!(ac.find_iter("abc".bytes()).count(), 2);
    }
}
