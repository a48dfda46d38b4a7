use std::ops::{Index, Range};

use log::{debug, trace};

use crate::{Label, RankMap};

/// Sorted suffixes of a text plus LCP queries, built by prefix doubling.
///
/// The array owns its text: positions are only meaningful against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuffixArray<L: Label> {
    text: Vec<L>,
    sa: Vec<u32>,
}

impl<L: Label> SuffixArray<L> {
    /// Sorts all suffixes of `text` in `O(n log n)`.
    ///
    /// Initial ranks are the dense label codes of a [`RankMap`], so any
    /// label type works regardless of its alphabet size.
    pub fn new(text: Vec<L>) -> Self {
        let map = RankMap::build(std::slice::from_ref(&text));
        let keys: Vec<u32> = text
            .iter()
            .map(|&label| map.get(label).unwrap_or(0))
            .collect();
        let sa = build(&keys, map.alphabet_size() as usize);
        Self { text, sa }
    }

    /// Text length.
    #[inline]
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// Whether the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// Suffix start positions in lexicographic order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.sa
    }

    /// Iterates over suffix start positions in lexicographic order.
    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.sa.iter()
    }

    /// The indexed text.
    #[inline]
    pub fn text(&self) -> &[L] {
        &self.text
    }

    /// Gives the text back.
    pub fn into_text(self) -> Vec<L> {
        self.text
    }

    /// Inverse permutation: `rank()[i]` is the position of suffix `i` in the
    /// sorted order.
    pub fn rank(&self) -> Vec<u32> {
        let mut rank = vec![0u32; self.sa.len()];
        for (r, &s) in self.sa.iter().enumerate() {
            rank[s as usize] = r as u32;
        }
        rank
    }

    /// LCP array (Kasai): `height[r]` is the longest common prefix of the
    /// suffixes ranked `r - 1` and `r`. `height[0]` is 0.
    pub fn height(&self) -> Vec<u32> {
        let n = self.text.len();
        let rank = self.rank();
        let mut height = vec![0u32; n];
        let mut k = 0usize;
        for i in 0..n {
            let r = rank[i] as usize;
            if r == 0 {
                k = 0;
                continue;
            }
            let j = self.sa[r - 1] as usize;
            while i.max(j) + k < n && self.text[i + k] == self.text[j + k] {
                k += 1;
            }
            height[r] = k as u32;
            k = k.saturating_sub(1);
        }
        height
    }

    /// Ranks of the suffixes starting with `pattern`.
    pub fn search(&self, pattern: &[L]) -> Range<usize> {
        let text = &self.text;
        let lo = self
            .sa
            .partition_point(|&s| &text[s as usize..] < pattern);
        let hi = self.sa.partition_point(|&s| {
            let suffix = &text[s as usize..];
            &suffix[..suffix.len().min(pattern.len())] <= pattern
        });
        lo..hi
    }

    /// Number of distinct non-empty substrings: `n(n+1)/2 - Σ height`.
    pub fn distinct_substring_count(&self) -> u64 {
        let n = self.text.len() as u64;
        let shared: u64 = self.height().iter().map(|&h| h as u64).sum();
        n * (n + 1) / 2 - shared
    }
}

impl<L: Label> Index<usize> for SuffixArray<L> {
    type Output = u32;

    #[inline]
    fn index(&self, rank: usize) -> &u32 {
        &self.sa[rank]
    }
}

impl<'a, L: Label> IntoIterator for &'a SuffixArray<L> {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.sa.iter()
    }
}

/// Prefix doubling with two-key radix sorts. `keys` must lie in
/// `0..set_size`.
fn build(keys: &[u32], set_size: usize) -> Vec<u32> {
    let n = keys.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa = vec![0u32; n];
    let mut rank = keys.to_vec();
    let mut tmp = vec![0u32; n];
    let mut count = vec![0usize; set_size.max(n)];

    for &r in &rank {
        count[r as usize] += 1;
    }
    for c in 1..set_size {
        count[c] += count[c - 1];
    }
    for i in (0..n).rev() {
        let slot = &mut count[rank[i] as usize];
        *slot -= 1;
        sa[*slot] = i as u32;
    }

    let mut classes = set_size;
    let mut gap = 1usize;
    let mut rounds = 0u32;
    while classes < n {
        // Second key: suffixes without a second half come first.
        let mut p = 0;
        for i in n - gap.min(n)..n {
            tmp[p] = i as u32;
            p += 1;
        }
        for &s in &sa {
            if s as usize >= gap {
                tmp[p] = s - gap as u32;
                p += 1;
            }
        }

        // Stable counting sort by first key.
        count[..classes].fill(0);
        for &r in &rank {
            count[r as usize] += 1;
        }
        for c in 1..classes {
            count[c] += count[c - 1];
        }
        for &i in tmp.iter().rev() {
            let slot = &mut count[rank[i as usize] as usize];
            *slot -= 1;
            sa[*slot] = i;
        }

        let second = |i: usize, rank: &[u32]| rank.get(i + gap).copied();
        tmp[sa[0] as usize] = 0;
        classes = 1;
        for k in 1..n {
            let (a, b) = (sa[k - 1] as usize, sa[k] as usize);
            if rank[a] != rank[b] || second(a, &rank) != second(b, &rank) {
                classes += 1;
            }
            tmp[b] = (classes - 1) as u32;
        }
        std::mem::swap(&mut rank, &mut tmp);

        rounds += 1;
        trace!("suffix array round {rounds}: gap {gap}, {classes} classes");
        gap <<= 1;
    }

    debug!("built suffix array: {n} suffixes, {rounds} doubling rounds");
    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sa(s: &str) -> SuffixArray<u8> {
        SuffixArray::new(s.as_bytes().to_vec())
    }

    // === construction tests ===

    #[test]
    fn banana() {
        let sa = sa("banana");
        assert_eq!(sa.as_slice(), &[5, 3, 1, 0, 4, 2]);
        assert_eq!(sa.height(), vec![0, 1, 3, 0, 0, 2]);
        assert_eq!(sa.rank(), vec![3, 2, 5, 1, 4, 0]);
        assert_eq!(sa[0], 5);
    }

    #[test]
    fn empty_and_single() {
        let empty = sa("");
        assert!(empty.is_empty());
        assert!(empty.height().is_empty());
        assert_eq!(empty.distinct_substring_count(), 0);

        let one = sa("x");
        assert_eq!(one.as_slice(), &[0]);
        assert_eq!(one.height(), vec![0]);
    }

    #[test]
    fn all_equal_symbols() {
        let sa = sa("aaaaa");
        assert_eq!(sa.as_slice(), &[4, 3, 2, 1, 0]);
        assert_eq!(sa.height(), vec![0, 1, 2, 3, 4]);
        assert_eq!(sa.distinct_substring_count(), 5);
    }

    #[test]
    fn distinct_symbols_skip_doubling() {
        let sa = sa("dcba");
        assert_eq!(sa.as_slice(), &[3, 2, 1, 0]);
    }

    #[test]
    fn char_labels() {
        let text: Vec<char> = "すもももももも".chars().collect();
        let sa = SuffixArray::new(text.clone());
        for pair in sa.as_slice().windows(2) {
            assert!(text[pair[0] as usize..] < text[pair[1] as usize..]);
        }
    }

    // === query tests ===

    #[test]
    fn search_finds_all_occurrences() {
        let sa = sa("mississippi");
        let r = sa.search(b"ssi");
        let mut starts: Vec<u32> = sa.as_slice()[r].to_vec();
        starts.sort_unstable();
        assert_eq!(starts, vec![2, 5]);
        assert_eq!(sa.search(b"issi").len(), 2);
        assert_eq!(sa.search(b"x").len(), 0);
        assert_eq!(sa.search(b"").len(), 11);
        assert_eq!(sa.search(b"pi").len(), 1);
        assert_eq!(sa.search(b"ippix").len(), 0);
    }

    #[test]
    fn distinct_substrings_abab() {
        assert_eq!(sa("abab").distinct_substring_count(), 7);
    }

    #[test]
    fn into_text_returns_source() {
        let sa = sa("hello");
        assert_eq!(sa.iter().count(), 5);
        assert_eq!(sa.into_text(), b"hello".to_vec());
    }
}
