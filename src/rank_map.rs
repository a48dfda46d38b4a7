use crate::Label;

/// Maps labels to dense, order-preserving codes.
///
/// Only labels that occur in the source texts receive a code. Codes run
/// from 0 to `alphabet_size() - 1` and compare exactly like the labels they
/// stand for, which makes them usable as initial radix-sort ranks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankMap {
    /// label (as u32) → code + 1. 0 means unmapped.
    table: Vec<u32>,
    /// code → label (as u32).
    reverse_table: Vec<u32>,
}

impl RankMap {
    /// Builds a RankMap from every label of every text.
    pub fn build<L: Label>(texts: &[impl AsRef<[L]>]) -> Self {
        // Find max label value in a single pass to size the presence table.
        let mut max_label: Option<u32> = None;
        for text in texts {
            for &label in text.as_ref() {
                let v: u32 = label.into();
                max_label = Some(max_label.map_or(v, |m| m.max(v)));
            }
        }

        let Some(max_label) = max_label else {
            return Self {
                table: vec![],
                reverse_table: vec![],
            };
        };

        let mut table = vec![0u32; max_label as usize + 1];
        for text in texts {
            for &label in text.as_ref() {
                table[<L as Into<u32>>::into(label) as usize] = 1;
            }
        }

        // Ascending scan keeps the codes in label order.
        let mut reverse_table = Vec::new();
        for (label, slot) in table.iter_mut().enumerate() {
            if *slot != 0 {
                reverse_table.push(label as u32);
                *slot = reverse_table.len() as u32;
            }
        }

        Self {
            table,
            reverse_table,
        }
    }

    /// Returns the code for a label, or `None` if it never occurred.
    #[inline]
    pub fn get<L: Label>(&self, label: L) -> Option<u32> {
        let v: u32 = label.into();
        match self.table.get(v as usize) {
            Some(&code) if code != 0 => Some(code - 1),
            _ => None,
        }
    }

    /// Returns the label (as u32) for a code.
    #[inline]
    pub fn reverse(&self, code: u32) -> u32 {
        debug_assert!(
            (code as usize) < self.reverse_table.len(),
            "code {code} out of bounds (alphabet_size {})",
            self.reverse_table.len()
        );
        self.reverse_table[code as usize]
    }

    /// The number of distinct labels seen.
    #[inline]
    pub fn alphabet_size(&self) -> u32 {
        self.reverse_table.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_texts() {
        let texts: Vec<Vec<u8>> = vec![];
        let rm = RankMap::build(&texts);
        assert_eq!(rm.alphabet_size(), 0);
        assert_eq!(rm.get(b'a'), None);

        let rm = RankMap::build(&[Vec::<u8>::new(), Vec::new()]);
        assert_eq!(rm.alphabet_size(), 0);
    }

    #[test]
    fn codes_follow_label_order() {
        let rm = RankMap::build(&[b"zebra".to_vec()]);
        assert_eq!(rm.alphabet_size(), 5);
        assert_eq!(rm.get(b'a'), Some(0));
        assert_eq!(rm.get(b'b'), Some(1));
        assert_eq!(rm.get(b'e'), Some(2));
        assert_eq!(rm.get(b'r'), Some(3));
        assert_eq!(rm.get(b'z'), Some(4));
    }

    #[test]
    fn unmapped_label_returns_none() {
        let rm = RankMap::build(&[b"ab".to_vec()]);
        assert_eq!(rm.get(b'c'), None);
        assert_eq!(rm.get(0xffu8), None);
    }

    #[test]
    fn reverse_round_trip() {
        let texts: Vec<Vec<u8>> = vec![vec![b'a', b'b', b'c'], vec![b'd', b'e']];
        let rm = RankMap::build(&texts);
        for label in [b'a', b'b', b'c', b'd', b'e'] {
            let code = rm.get(label).unwrap();
            assert_eq!(rm.reverse(code), label as u32);
        }
    }

    #[test]
    fn char_labels() {
        let texts: Vec<Vec<char>> = vec!["あい".chars().collect(), "うあ".chars().collect()];
        let rm = RankMap::build(&texts);
        assert_eq!(rm.alphabet_size(), 3);
        assert!(rm.get('あ').unwrap() < rm.get('い').unwrap());
        assert!(rm.get('い').unwrap() < rm.get('う').unwrap());
        assert_eq!(rm.reverse(rm.get('う').unwrap()), 'う' as u32);
    }
}
