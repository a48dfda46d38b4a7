//! Palindromic tree (eertree) with appends at both ends.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::{Alphabet, StateId, TransitionTable};

/// The imaginary root, length −1. Extending it by `c` on both sides gives `c`.
pub const IMAGINARY_ROOT: StateId = 0;
/// The empty palindrome, length 0.
pub const EMPTY_ROOT: StateId = 1;

/// One distinct palindrome of the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PalState {
    len: i32,
    link: StateId,
    endpos_size: u32,
    hits: u64,
}

impl PalState {
    const fn root(len: i32) -> Self {
        Self {
            len,
            link: IMAGINARY_ROOT,
            endpos_size: 0,
            hits: 0,
        }
    }

    /// Length of the palindrome (−1 for the imaginary root).
    #[inline]
    pub fn length(&self) -> i32 {
        self.len
    }

    /// The longest proper palindromic suffix.
    #[inline]
    pub fn link(&self) -> StateId {
        self.link
    }

    /// Number of palindromic suffixes of this palindrome, itself included.
    #[inline]
    pub fn endpos_size(&self) -> usize {
        self.endpos_size as usize
    }

    /// Times this state was the longest palindromic suffix or prefix right
    /// after a push.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

/// An eertree that grows at both ends.
///
/// After any mix of [`push_back`](Self::push_back) and
/// [`push_front`](Self::push_front), every distinct non-empty palindromic
/// substring of the text corresponds to exactly one state besides the two
/// roots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalindromeAutomaton<A: Alphabet> {
    table: TransitionTable,
    states: Vec<PalState>,
    text: VecDeque<A::Symbol>,
    back: StateId,
    front: StateId,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> Default for PalindromeAutomaton<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> PalindromeAutomaton<A> {
    /// Creates the automaton of the empty text.
    pub fn new() -> Self {
        let mut table = TransitionTable::new(A::SIZE);
        table.push_row();
        Self {
            table,
            states: vec![PalState::root(-1), PalState::root(0)],
            text: VecDeque::new(),
            back: EMPTY_ROOT,
            front: EMPTY_ROOT,
            _alphabet: PhantomData,
        }
    }

    /// Creates an empty automaton with room for `expected_len` symbols.
    pub fn with_capacity(expected_len: usize) -> Self {
        let mut pam = Self::new();
        pam.table.reserve_rows(expected_len);
        pam.states.reserve(expected_len);
        pam.text.reserve(expected_len);
        pam
    }

    /// Number of states, both roots included.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of distinct non-empty palindromic substrings.
    #[inline]
    pub fn distinct_palindromes(&self) -> usize {
        self.states.len() - 2
    }

    /// The text built so far.
    #[inline]
    pub fn text(&self) -> &VecDeque<A::Symbol> {
        &self.text
    }

    /// Returns state `id`.
    #[inline]
    pub fn state(&self, id: StateId) -> &PalState {
        &self.states[id as usize]
    }

    /// State of the longest palindromic suffix of the text.
    #[inline]
    pub fn back(&self) -> &PalState {
        &self.states[self.back as usize]
    }

    /// State of the longest palindromic prefix of the text.
    #[inline]
    pub fn front(&self) -> &PalState {
        &self.states[self.front as usize]
    }

    /// Id of [`back`](Self::back).
    #[inline]
    pub fn back_index(&self) -> StateId {
        self.back
    }

    /// Id of [`front`](Self::front).
    #[inline]
    pub fn front_index(&self) -> StateId {
        self.front
    }

    /// Walks suffix links from `idx` to the first palindrome that the last
    /// symbol extends on both sides.
    fn fail_from_back(&self, mut idx: StateId) -> StateId {
        let back = self.text.len() as i64 - 1;
        loop {
            let jump = back - self.states[idx as usize].len as i64 - 1;
            if jump >= 0 && self.text[jump as usize] == self.text[back as usize] {
                return idx;
            }
            idx = self.states[idx as usize].link;
        }
    }

    /// Mirror of `fail_from_back` for the first symbol.
    fn fail_from_front(&self, mut idx: StateId) -> StateId {
        let size = self.text.len() as i64;
        loop {
            let jump = self.states[idx as usize].len as i64 + 1;
            if jump < size && self.text[jump as usize] == self.text[0] {
                return idx;
            }
            idx = self.states[idx as usize].link;
        }
    }

    /// Returns the child of `fail` along `key`, creating it if needed.
    /// `fail_of` finds a link candidate from the end being extended.
    fn extend_from(
        &mut self,
        fail: StateId,
        key: usize,
        fail_of: fn(&Self, StateId) -> StateId,
    ) -> StateId {
        let existing = self.table.get(fail, key);
        if existing != 0 {
            return existing;
        }
        let len = self.states[fail as usize].len + 2;
        let link = if len == 1 {
            EMPTY_ROOT
        } else {
            let candidate = fail_of(self, self.states[fail as usize].link);
            self.table.get(candidate, key)
        };
        self.states.push(PalState {
            len,
            link,
            endpos_size: self.states[link as usize].endpos_size + 1,
            hits: 0,
        });
        let cur = self.table.push_row();
        self.table.set(fail, key, cur);
        cur
    }

    /// Appends a symbol at the back.
    pub fn push_back(&mut self, symbol: A::Symbol) {
        self.text.push_back(symbol);
        let fail = self.fail_from_back(self.back);
        let cur = self.extend_from(fail, A::key(symbol), Self::fail_from_back);
        self.states[cur as usize].hits += 1;
        self.back = cur;
        if self.states[cur as usize].len as usize == self.text.len() {
            self.front = cur;
        }
    }

    /// Prepends a symbol at the front.
    pub fn push_front(&mut self, symbol: A::Symbol) {
        self.text.push_front(symbol);
        let fail = self.fail_from_front(self.front);
        let cur = self.extend_from(fail, A::key(symbol), Self::fail_from_front);
        self.states[cur as usize].hits += 1;
        self.front = cur;
        if self.states[cur as usize].len as usize == self.text.len() {
            self.back = cur;
        }
    }

    /// Total occurrences of every state's palindrome in the text.
    ///
    /// Each occurrence is seen exactly once at the push that completed it,
    /// as a palindromic suffix (back) or prefix (front) of the longest one
    /// recorded there, so pushing hits up the link tree gives exact counts.
    /// The roots report 0.
    pub fn occurrence_counts(&self) -> Vec<u64> {
        let mut counts: Vec<u64> = self.states.iter().map(|s| s.hits).collect();
        // links always point to older states
        for id in (2..self.states.len()).rev() {
            let link = self.states[id].link as usize;
            counts[link] += counts[id];
        }
        counts[IMAGINARY_ROOT as usize] = 0;
        counts[EMPTY_ROOT as usize] = 0;
        counts
    }

    /// Resets to the empty text. Storage is kept.
    pub fn clear(&mut self) {
        self.table.reset();
        self.table.push_row();
        self.states.truncate(2);
        self.states[0] = PalState::root(-1);
        self.states[1] = PalState::root(0);
        self.text.clear();
        self.back = EMPTY_ROOT;
        self.front = EMPTY_ROOT;
    }
}

impl<A: Alphabet> Extend<A::Symbol> for PalindromeAutomaton<A> {
    fn extend<I: IntoIterator<Item = A::Symbol>>(&mut self, iter: I) {
        for symbol in iter {
            self.push_back(symbol);
        }
    }
}
