use std::marker::PhantomData;
use std::ops::Range;

use crate::{Alphabet, Error, StateId, TransitionTable, ROOT};

const UNSET: StateId = StateId::MAX;

/// One endpos-equivalence class of the suffix automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    len: u32,
    link: StateId,
    /// 1 for states created by an append, 0 for clones.
    endpos_seed: u32,
    first_end: u32,
}

impl State {
    const ROOT: State = State {
        len: 0,
        link: UNSET,
        endpos_seed: 0,
        first_end: UNSET,
    };

    /// Length of the longest substring in the class.
    #[inline]
    pub fn length(&self) -> usize {
        self.len as usize
    }

    /// Suffix link: the class of the longest suffix that ends elsewhere too.
    /// `None` for the initial state.
    #[inline]
    pub fn link(&self) -> Option<StateId> {
        (self.link != UNSET).then_some(self.link)
    }

    /// End position of the first occurrence of the class's substrings.
    /// Meaningless for the initial state.
    #[inline]
    pub fn first_end(&self) -> usize {
        self.first_end as usize
    }

    /// Whether the state was created by splitting another one.
    #[inline]
    pub fn is_clone(&self) -> bool {
        self.endpos_seed == 0 && self.link != UNSET
    }
}

/// Selects what [`SuffixAutomaton::kth_substring`] ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KthMode {
    /// Each distinct substring counts once.
    Distinct,
    /// Each occurrence counts, so a substring occurring `m` times spans `m` ranks.
    Occurrences,
}

/// The minimal DFA recognising every suffix of a growing text.
///
/// Built online by [`push_back`](Self::push_back) in amortised constant
/// time per symbol. Every path from state 0 spells a distinct substring;
/// substrings sharing their set of end positions share a state. A text of
/// length `n` yields at most `2n - 1` states (`n ≥ 2`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuffixAutomaton<A: Alphabet> {
    table: TransitionTable,
    states: Vec<State>,
    last: StateId,
    text_len: usize,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> Default for SuffixAutomaton<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> SuffixAutomaton<A> {
    /// Creates the automaton of the empty text.
    pub fn new() -> Self {
        Self {
            table: TransitionTable::new(A::SIZE),
            states: vec![State::ROOT],
            last: ROOT,
            text_len: 0,
            _alphabet: PhantomData,
        }
    }

    /// Creates an empty automaton with room for a text of `expected_len`
    /// symbols.
    pub fn with_capacity(expected_len: usize) -> Self {
        let mut sam = Self::new();
        sam.table.reserve_rows(2 * expected_len);
        sam.states.reserve(2 * expected_len);
        sam
    }

    /// Builds the automaton of `text`.
    pub fn from_symbols(text: impl IntoIterator<Item = A::Symbol>) -> Self {
        let text = text.into_iter();
        let mut sam = Self::with_capacity(text.size_hint().0);
        sam.extend(text);
        sam
    }

    /// Number of states, the initial state included.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of symbols appended so far.
    #[inline]
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// The state of the whole text (the last non-clone state created).
    #[inline]
    pub fn last(&self) -> StateId {
        self.last
    }

    /// Returns state `id`.
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    /// Returns the transition of `id` along `symbol`.
    #[inline]
    pub fn transition(&self, id: StateId, symbol: A::Symbol) -> Option<StateId> {
        match self.table.get(id, A::key(symbol)) {
            0 => None,
            next => Some(next),
        }
    }

    fn alloc(&mut self, state: State) -> StateId {
        self.states.push(state);
        self.table.push_row()
    }

    fn split(&mut self, q: StateId, len: u32) -> StateId {
        self.states.push(State {
            len,
            endpos_seed: 0,
            ..self.states[q as usize]
        });
        let clone = self.table.copy_row(q);
        self.states[q as usize].link = clone;
        clone
    }

    /// Appends one symbol.
    pub fn push_back(&mut self, symbol: A::Symbol) {
        let key = A::key(symbol);
        let cur = self.alloc(State {
            len: self.states[self.last as usize].len + 1,
            link: ROOT,
            endpos_seed: 1,
            first_end: self.text_len as u32,
        });
        let mut p = self.last;
        self.last = cur;
        self.text_len += 1;

        while p != UNSET && self.table.get(p, key) == 0 {
            self.table.set(p, key, cur);
            p = self.states[p as usize].link;
        }
        if p == UNSET {
            return;
        }

        let q = self.table.get(p, key);
        let p_len = self.states[p as usize].len;
        if self.states[q as usize].len == p_len + 1 {
            self.states[cur as usize].link = q;
            return;
        }

        let clone = self.split(q, p_len + 1);
        self.states[cur as usize].link = clone;
        while p != UNSET && self.table.get(p, key) == q {
            self.table.set(p, key, clone);
            p = self.states[p as usize].link;
        }
    }

    /// Appends every symbol of `text` after checking all of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolOutOfAlphabet`] for the first invalid symbol;
    /// the automaton is left unchanged.
    pub fn try_extend(&mut self, text: impl IntoIterator<Item = A::Symbol>) -> Result<(), Error> {
        let symbols: Vec<A::Symbol> = text.into_iter().collect();
        crate::alphabet::validate::<A>(symbols.iter().copied())?;
        self.extend(symbols);
        Ok(())
    }

    /// Returns all states ordered by non-decreasing length (counting sort).
    ///
    /// Every suffix link points to a strictly shorter state, so iterating
    /// the result backwards visits children of the link tree before their
    /// parents.
    pub fn dfs_sorted_indexes(&self) -> Vec<StateId> {
        let mut bucket = vec![0usize; self.text_len + 2];
        for s in &self.states {
            bucket[s.len as usize + 1] += 1;
        }
        for i in 1..bucket.len() {
            bucket[i] += bucket[i - 1];
        }
        let mut sorted = vec![ROOT; self.states.len()];
        for (id, s) in self.states.iter().enumerate() {
            let slot = &mut bucket[s.len as usize];
            sorted[*slot] = id as StateId;
            *slot += 1;
        }
        sorted
    }

    /// Number of distinct non-empty substrings of the text.
    pub fn unique_substr_count(&self) -> u64 {
        self.states
            .iter()
            .skip(1)
            .map(|s| (s.len - self.states[s.link as usize].len) as u64)
            .sum()
    }

    /// Size of every state's endpos set, i.e. how many times each of its
    /// substrings occurs. The initial state reports the text length.
    pub fn endpos_sizes(&self) -> Vec<u64> {
        let mut sizes: Vec<u64> = self.states.iter().map(|s| s.endpos_seed as u64).collect();
        for &id in self.dfs_sorted_indexes().iter().skip(1).rev() {
            let link = self.states[id as usize].link;
            sizes[link as usize] += sizes[id as usize];
        }
        sizes
    }

    /// Precomputes endpos sizes for repeated occurrence counting.
    pub fn occurrences(&self) -> Occurrences<'_, A> {
        Occurrences {
            sam: self,
            sizes: self.endpos_sizes(),
        }
    }

    fn walk(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> Option<(StateId, usize)> {
        let mut u = ROOT;
        let mut len = 0;
        for symbol in pattern {
            u = self.transition(u, symbol)?;
            len += 1;
        }
        Some((u, len))
    }

    /// The state reached by reading `pattern`, if it is a substring.
    pub fn find_state(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> Option<StateId> {
        self.walk(pattern).map(|(u, _)| u)
    }

    /// Whether `pattern` is a substring of the text.
    pub fn contains(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> bool {
        self.walk(pattern).is_some()
    }

    /// Start index of the leftmost occurrence of `pattern`.
    pub fn first_occurrence(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> Option<usize> {
        let (u, len) = self.walk(pattern)?;
        if u == ROOT {
            return Some(0);
        }
        Some(self.states[u as usize].first_end as usize + 1 - len)
    }

    /// The `k`-th (1-based) smallest substring in lexicographic key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KthOutOfRange`] if `k` is 0 or exceeds the number of
    /// ranked substrings.
    pub fn kth_substring(&self, k: u64, mode: KthMode) -> Result<Vec<A::Symbol>, Error> {
        let weight: Vec<u64> = match mode {
            KthMode::Distinct => self.states.iter().map(|_| 1).collect(),
            KthMode::Occurrences => self.endpos_sizes(),
        };

        // Transitions always lead to longer states, so decreasing length is
        // a topological order of the DAG.
        let mut total = vec![0u64; self.states.len()];
        for &id in self.dfs_sorted_indexes().iter().rev() {
            let own = if id == ROOT { 0 } else { weight[id as usize] };
            let below: u64 = self
                .table
                .row(id)
                .iter()
                .filter(|&&t| t != 0)
                .map(|&t| total[t as usize])
                .sum();
            total[id as usize] = own + below;
        }

        if k == 0 || k > total[ROOT as usize] {
            return Err(Error::KthOutOfRange {
                k,
                total: total[ROOT as usize],
            });
        }

        let mut out = Vec::new();
        let mut k = k;
        let mut u = ROOT;
        loop {
            for key in 0..A::SIZE {
                let t = self.table.get(u, key);
                if t == 0 {
                    continue;
                }
                if k > total[t as usize] {
                    k -= total[t as usize];
                    continue;
                }
                out.push(A::symbol(key));
                u = t;
                break;
            }
            if k <= weight[u as usize] {
                return Ok(out);
            }
            k -= weight[u as usize];
        }
    }

    /// Longest common substring of the text and `other`, as a range in
    /// `other`. Empty when nothing is shared.
    pub fn longest_common_substring(
        &self,
        other: impl IntoIterator<Item = A::Symbol>,
    ) -> Range<usize> {
        let mut u = ROOT;
        let mut len = 0usize;
        let (mut best_len, mut best_end) = (0usize, 0usize);
        for (i, symbol) in other.into_iter().enumerate() {
            let key = A::key(symbol);
            while u != ROOT && self.table.get(u, key) == 0 {
                u = self.states[u as usize].link;
                len = self.states[u as usize].len as usize;
            }
            let next = self.table.get(u, key);
            if next != 0 {
                u = next;
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_end = i + 1;
            }
        }
        best_end - best_len..best_end
    }

    /// Resets to the automaton of the empty text. Storage is kept.
    pub fn clear(&mut self) {
        self.table.reset();
        self.states.truncate(1);
        self.states[0] = State::ROOT;
        self.last = ROOT;
        self.text_len = 0;
    }
}

impl<A: Alphabet> Extend<A::Symbol> for SuffixAutomaton<A> {
    fn extend<I: IntoIterator<Item = A::Symbol>>(&mut self, iter: I) {
        for symbol in iter {
            self.push_back(symbol);
        }
    }
}

impl<A: Alphabet> FromIterator<A::Symbol> for SuffixAutomaton<A> {
    fn from_iter<I: IntoIterator<Item = A::Symbol>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}

/// Occurrence counts over a [`SuffixAutomaton`], see
/// [`SuffixAutomaton::occurrences`].
pub struct Occurrences<'a, A: Alphabet> {
    sam: &'a SuffixAutomaton<A>,
    sizes: Vec<u64>,
}

impl<A: Alphabet> Occurrences<'_, A> {
    /// Number of (possibly overlapping) occurrences of `pattern`.
    pub fn count(&self, pattern: impl IntoIterator<Item = A::Symbol>) -> u64 {
        self.sam
            .find_state(pattern)
            .map_or(0, |u| self.sizes[u as usize])
    }

    /// Endpos size of state `id`.
    pub fn of_state(&self, id: StateId) -> u64 {
        self.sizes[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lowercase;

    fn sam(s: &str) -> SuffixAutomaton<Lowercase> {
        s.bytes().collect()
    }

    // === construction tests ===

    #[test]
    fn abab_has_seven_distinct_substrings() {
        let sam = sam("abab");
        assert_eq!(sam.unique_substr_count(), 7);
        assert_eq!(sam.text_len(), 4);
        assert_eq!(sam.state(sam.last()).length(), 4);
    }

    #[test]
    fn empty_text() {
        let sam = sam("");
        assert_eq!(sam.num_states(), 1);
        assert_eq!(sam.unique_substr_count(), 0);
        assert_eq!(sam.state(ROOT).link(), None);
        assert!(sam.contains("".bytes()));
        assert!(!sam.contains("a".bytes()));
    }

    #[test]
    fn split_creates_clone() {
        // "abb": appending the second 'b' splits the class {"b", "ab"}
        let sam = sam("abb");
        assert_eq!(sam.num_states(), 5);
        let b = sam.find_state("b".bytes()).unwrap();
        assert!(sam.state(b).is_clone());
        assert_eq!(sam.state(b).length(), 1);
        assert_eq!(sam.unique_substr_count(), 5);
    }

    #[test]
    fn state_bound_holds() {
        let text = "abbbbbbbbbbbbbbbbbbbbc";
        let sam = sam(text);
        assert!(sam.num_states() <= 2 * text.len() - 1);
        for id in 1..sam.num_states() as StateId {
            let s = sam.state(id);
            let link = sam.state(s.link().unwrap());
            assert!(link.length() < s.length());
        }
    }

    #[test]
    fn dfs_sorted_indexes_is_length_ordered_permutation() {
        let sam = sam("mississippi".replace('m', "a").as_str());
        let order = sam.dfs_sorted_indexes();
        assert_eq!(order.len(), sam.num_states());
        assert_eq!(order[0], ROOT);
        for pair in order.windows(2) {
            assert!(sam.state(pair[0]).length() <= sam.state(pair[1]).length());
        }
        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..sam.num_states() as StateId).collect::<Vec<_>>());
    }

    // === query tests ===

    #[test]
    fn occurrence_counts() {
        let sam = sam("abab");
        let occ = sam.occurrences();
        assert_eq!(occ.count("ab".bytes()), 2);
        assert_eq!(occ.count("b".bytes()), 2);
        assert_eq!(occ.count("aba".bytes()), 1);
        assert_eq!(occ.count("bb".bytes()), 0);
        assert_eq!(occ.of_state(ROOT), 4);
    }

    #[test]
    fn first_occurrence_positions() {
        let sam = sam("abcbc");
        assert_eq!(sam.first_occurrence("bc".bytes()), Some(1));
        assert_eq!(sam.first_occurrence("cbc".bytes()), Some(2));
        assert_eq!(sam.first_occurrence("c".bytes()), Some(2));
        assert_eq!(sam.first_occurrence("".bytes()), Some(0));
        assert_eq!(sam.first_occurrence("cc".bytes()), None);
    }

    #[test]
    fn kth_distinct() {
        let sam = sam("aab");
        let kth = |k| sam.kth_substring(k, KthMode::Distinct).map(|v| String::from_utf8(v).unwrap());
        assert_eq!(kth(1).unwrap(), "a");
        assert_eq!(kth(2).unwrap(), "aa");
        assert_eq!(kth(3).unwrap(), "aab");
        assert_eq!(kth(4).unwrap(), "ab");
        assert_eq!(kth(5).unwrap(), "b");
        assert_eq!(kth(6), Err(Error::KthOutOfRange { k: 6, total: 5 }));
        assert_eq!(kth(0), Err(Error::KthOutOfRange { k: 0, total: 5 }));
    }

    #[test]
    fn kth_occurrences() {
        let sam = sam("aab");
        let kth = |k| {
            String::from_utf8(sam.kth_substring(k, KthMode::Occurrences).unwrap()).unwrap()
        };
        let all: Vec<String> = (1..=6).map(kth).collect();
        assert_eq!(all, ["a", "a", "aa", "aab", "ab", "b"]);
        assert!(sam.kth_substring(7, KthMode::Occurrences).is_err());
    }

    #[test]
    fn longest_common_substring_range() {
        let sam = sam("abcde");
        let other = b"xbcdy";
        let r = sam.longest_common_substring(other.iter().copied());
        assert_eq!(r, 1..4);
        assert_eq!(&other[r], b"bcd");
        assert!(sam.longest_common_substring("xyz".bytes()).is_empty());
    }

    #[test]
    fn try_extend_validates_first() {
        let mut sam = sam("ab");
        let before = sam.clone();
        assert_eq!(
            sam.try_extend("cD".bytes()),
            Err(Error::SymbolOutOfAlphabet { position: 1 })
        );
        assert_eq!(sam, before);
        sam.try_extend("cd".bytes()).unwrap();
        assert_eq!(sam.text_len(), 4);
    }

    // === clear tests ===

    #[test]
    fn clear_then_rebuild_matches_fresh() {
        let mut reused = SuffixAutomaton::<Lowercase>::with_capacity(16);
        reused.extend("zzzyx".bytes());
        reused.clear();
        assert_eq!(reused, SuffixAutomaton::new());
        reused.extend("abcab".bytes());
        assert_eq!(reused, sam("abcab"));
    }
}
