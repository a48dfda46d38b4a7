//! Symbol-to-key mappings that fix the arity of transition tables.

use std::fmt::Debug;

use crate::{Error, Label};

/// A fixed alphabet mapping symbols to dense transition keys.
///
/// Implementors are zero-sized markers selected as a type parameter, so the
/// mapping is resolved at compile time. The marker bounds let every
/// automaton over the alphabet derive `Clone`, `Debug` and `Eq`. `key` must be injective over the
/// supported symbols and return values in `0..SIZE`.
///
/// Passing a symbol outside the alphabet to `key` is a caller error: debug
/// builds assert, release builds produce an arbitrary key that may panic on
/// a later bounds check. Use [`validate`] or the `try_*` entry points to
/// reject such input up front.
pub trait Alphabet: Copy + Debug + Default + Eq {
    /// The symbol type accepted by automata over this alphabet.
    type Symbol: Label;

    /// Number of distinct keys, i.e. the arity of every transition row.
    const SIZE: usize;

    /// Returns the key for `symbol`, or `None` if it is not in the alphabet.
    fn try_key(symbol: Self::Symbol) -> Option<usize>;

    /// Returns the key for `symbol` without validation.
    #[inline]
    fn key(symbol: Self::Symbol) -> usize {
        let key = Self::try_key(symbol);
        debug_assert!(key.is_some(), "symbol {symbol:?} is outside the alphabet");
        key.unwrap_or(usize::MAX)
    }

    /// Maps a key back to its symbol.
    fn symbol(key: usize) -> Self::Symbol;
}

/// ASCII lowercase letters, `a..=z` mapped to `0..26`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lowercase;

impl Alphabet for Lowercase {
    type Symbol = u8;
    const SIZE: usize = 26;

    #[inline]
    fn try_key(symbol: u8) -> Option<usize> {
        symbol.is_ascii_lowercase().then(|| (symbol - b'a') as usize)
    }

    #[inline]
    fn symbol(key: usize) -> u8 {
        b'a' + key as u8
    }
}

/// ASCII letters and digits: `A..=Z` → `0..26`, `a..=z` → `26..52`,
/// `0..=9` → `52..62`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Alphanumeric;

impl Alphabet for Alphanumeric {
    type Symbol = u8;
    const SIZE: usize = 62;

    #[inline]
    fn try_key(symbol: u8) -> Option<usize> {
        match symbol {
            b'A'..=b'Z' => Some((symbol - b'A') as usize),
            b'a'..=b'z' => Some((symbol - b'a') as usize + 26),
            b'0'..=b'9' => Some((symbol - b'0') as usize + 52),
            _ => None,
        }
    }

    #[inline]
    fn symbol(key: usize) -> u8 {
        match key {
            0..=25 => b'A' + key as u8,
            26..=51 => b'a' + (key - 26) as u8,
            _ => b'0' + (key - 52) as u8,
        }
    }
}

/// Every byte value, identity mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bytes;

impl Alphabet for Bytes {
    type Symbol = u8;
    const SIZE: usize = 256;

    #[inline]
    fn try_key(symbol: u8) -> Option<usize> {
        Some(symbol as usize)
    }

    #[inline]
    fn key(symbol: u8) -> usize {
        symbol as usize
    }

    #[inline]
    fn symbol(key: usize) -> u8 {
        key as u8
    }
}

/// Checks that every symbol belongs to `A`.
///
/// # Errors
///
/// Returns [`Error::SymbolOutOfAlphabet`] with the position of the first
/// symbol that `A` cannot map.
pub fn validate<A: Alphabet>(
    symbols: impl IntoIterator<Item = A::Symbol>,
) -> Result<(), Error> {
    match symbols
        .into_iter()
        .position(|symbol| A::try_key(symbol).is_none())
    {
        Some(position) => Err(Error::SymbolOutOfAlphabet { position }),
        None => Ok(()),
    }
}
