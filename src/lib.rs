//! Arena-backed string automata.
//!
//! This crate provides the classic string-indexing structures over flat,
//! index-addressed node arrays:
//!
//! - [`Trie`], a prefix tree whose per-node behaviour is chosen by a
//!   [`NodeFlavor`] ([`WordCount`], [`PrefixCount`], [`EndCount`], [`WordIndex`]).
//! - [`AhoCorasick`], a multi-pattern matcher compiled from a trie.
//! - [`SuffixAutomaton`], the online minimal DFA of all substrings.
//! - [`PalindromeAutomaton`], an eertree that grows at both ends.
//! - [`SuffixArray`], sorted suffixes with Kasai LCP.
//!
//! Automata are parameterised by an [`Alphabet`] that fixes the arity of
//! every transition row at compile time.
//!
//! # Quick start
//!
//! ```
//! use string_automata::{AhoCorasick, Lowercase, SuffixAutomaton, Trie, WordIndex};
//!
//! let mut trie = Trie::<Lowercase, WordIndex>::new();
//! for pattern in ["he", "she", "his", "hers"] {
//!     trie.insert(pattern.bytes());
//! }
//! let ac = AhoCorasick::new(trie);
//! assert_eq!(ac.find_iter("ahishers".bytes()).count(), 4);
//!
//! let sam: SuffixAutomaton<Lowercase> = "abab".bytes().collect();
//! assert_eq!(sam.unique_substr_count(), 7);
//! ```

#![warn(missing_docs)]

mod alphabet;
mod aho_corasick;
mod flavor;
mod label;
mod palindrome;
mod rank_map;
mod suffix_array;
mod suffix_automaton;
mod table;
mod trie;

pub use aho_corasick::{AhoCorasick, FindIter, IndexCounts, Match, MatchSink};
pub use alphabet::{validate, Alphabet, Alphanumeric, Bytes, Lowercase};
pub use flavor::{EndCount, NodeFlavor, PrefixCount, WordCount, WordIndex};
pub use label::Label;
pub use palindrome::{PalState, PalindromeAutomaton, EMPTY_ROOT, IMAGINARY_ROOT};
pub use rank_map::RankMap;
pub use suffix_array::SuffixArray;
pub use suffix_automaton::{KthMode, Occurrences, State, SuffixAutomaton};
pub use table::TransitionTable;
pub use trie::Trie;

/// Index of a trie or Aho-Corasick node.
pub type NodeId = u32;

/// Index of a suffix- or palindrome-automaton state.
pub type StateId = u32;

/// The root node / initial state of every arena.
pub const ROOT: u32 = 0;

/// Errors reported by the checked entry points.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A symbol cannot be mapped by the alphabet.
    #[error("symbol at position {position} is outside the alphabet")]
    SymbolOutOfAlphabet {
        /// Zero-based position in the rejected input.
        position: usize,
    },
    /// A k-th substring query asked for a rank that does not exist.
    #[error("rank {k} is out of range: {total} substrings are ranked")]
    KthOutOfRange {
        /// The requested 1-based rank.
        k: u64,
        /// The number of ranked substrings.
        total: u64,
    },
}
