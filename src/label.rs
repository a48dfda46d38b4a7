/// The value type of a symbol stored in a text or pattern.
///
/// Labels must be copyable, orderable, and convertible to/from `u32`.
/// `ALPHABET_SIZE` is the number of distinct values the type can take.
pub trait Label: Copy + Ord + std::fmt::Debug + Into<u32> + TryFrom<u32> {
    /// Theoretical upper bound on distinct labels.
    const ALPHABET_SIZE: u32;
}

impl Label for u8 {
    const ALPHABET_SIZE: u32 = 256;
}

impl Label for u16 {
    const ALPHABET_SIZE: u32 = 1 << 16;
}

impl Label for char {
    const ALPHABET_SIZE: u32 = 0x11_0000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_sizes() {
        assert_eq!(u8::ALPHABET_SIZE, 256);
        assert_eq!(u16::ALPHABET_SIZE, 65_536);
        assert_eq!(char::ALPHABET_SIZE, 0x11_0000);
    }

    #[test]
    fn label_order_matches_code_order() {
        let labels = ['a', 'b', 'z', 'あ'];
        for pair in labels.windows(2) {
            let (lo, hi): (u32, u32) = (pair[0].into(), pair[1].into());
            assert!(pair[0] < pair[1]);
            assert!(lo < hi);
        }
    }

    #[test]
    fn char_round_trip() {
        for c in ['a', 'z', 'あ', '漢', '\u{10FFFF}'] {
            let code: u32 = c.into();
            assert_eq!(char::try_from(code).unwrap(), c);
        }
    }
}
