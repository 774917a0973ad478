//! Pure helpers over candidate bitmasks.
//!
//! A cell's candidate set is a [`ValueMask`]: bit `v - 1` is set exactly
//! when value `v` is still possible. Everything here is a total function
//! with no side effects; an empty mask is a contradiction at the board
//! level, not an error here.

use rand::Rng;

/// A set of candidate values, one bit per value (bit `v - 1` ⇔ value `v`).
pub type ValueMask = u32;

/// Largest supported board size; the mask must leave room for the given bit.
pub const MAX_SIZE: usize = 31;

/// Number of set bits in `mask`.
#[inline]
pub fn popcount(mask: ValueMask) -> u32 {
    mask.count_ones()
}

/// The single-bit mask for a 1-based value.
#[inline]
pub fn value_bit(value: u32) -> ValueMask {
    1 << (value - 1)
}

/// The mask with all `size` low bits set.
#[inline]
pub fn all_values(size: usize) -> ValueMask {
    (1 << size) - 1
}

/// 1-based value of the lowest set bit. Callers must not pass an empty
/// mask where a value is expected.
#[inline]
pub fn min_value(mask: ValueMask) -> u32 {
    mask.trailing_zeros() + 1
}

/// 1-based value of the highest set bit.
#[inline]
pub fn max_value(mask: ValueMask) -> u32 {
    32 - mask.leading_zeros()
}

/// Whether `value` is present in `mask`.
#[inline]
pub fn has_value(mask: ValueMask, value: u32) -> bool {
    mask & value_bit(value) != 0
}

/// Folds a list of values into a mask.
pub fn values_mask(values: &[u32]) -> ValueMask {
    values.iter().fold(0, |mask, &value| mask | value_bit(value))
}

/// Ascending iterator over the values in a mask.
///
/// [`Values`] is `Clone`, so the sequence is finite and restartable: it is
/// a pure function of the mask it was built from.
pub fn values(mask: ValueMask) -> Values {
    Values { mask }
}

#[derive(Debug, Clone)]
pub struct Values {
    mask: ValueMask,
}

impl Iterator for Values {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.mask == 0 {
            return None;
        }
        let value = min_value(self.mask);
        self.mask ^= value_bit(value);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = popcount(self.mask) as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for Values {}

/// Uniformly selects one of the set values; sentinel 0 for an empty mask.
///
/// Consumed by the search driver when ordering guesses, never by
/// propagation itself.
pub fn random_value<R: Rng + ?Sized>(mask: ValueMask, rng: &mut R) -> u32 {
    if mask == 0 {
        return 0;
    }
    let index = rng.gen_range(0..popcount(mask));
    values(mask).nth(index as usize).unwrap_or(0)
}

/// Renders the values of a mask for diagnostics: digits run together on
/// single-digit boards, comma-separated once values can reach two digits.
pub fn mask_to_string(mask: ValueMask, size: usize) -> String {
    let separator = if size >= 10 { "," } else { "" };
    values(mask)
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn popcount_counts_set_bits() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(0b1011), 3);
        assert_eq!(popcount(all_values(9)), 9);
    }

    #[test]
    fn min_and_max_value_are_one_based() {
        let mask = values_mask(&[3, 5, 8]);
        assert_eq!(min_value(mask), 3);
        assert_eq!(max_value(mask), 8);
        assert_eq!(min_value(value_bit(1)), 1);
        assert_eq!(max_value(value_bit(9)), 9);
    }

    #[test]
    fn has_value_matches_membership() {
        let mask = values_mask(&[2, 7]);
        assert!(has_value(mask, 2));
        assert!(has_value(mask, 7));
        assert!(!has_value(mask, 1));
        assert!(!has_value(mask, 9));
    }

    #[test]
    fn values_iterates_ascending_and_restarts() {
        let mask = values_mask(&[4, 1, 9]);
        let iter = values(mask);
        assert_eq!(iter.clone().collect::<Vec<_>>(), vec![1, 4, 9]);
        // A clone restarts from the same mask.
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 4, 9]);
        assert_eq!(values(0).count(), 0);
    }

    #[test]
    fn random_value_stays_inside_the_mask() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mask = values_mask(&[2, 5, 6]);
        for _ in 0..64 {
            let value = random_value(mask, &mut rng);
            assert!(has_value(mask, value), "picked {value} outside the mask");
        }
    }

    #[test]
    fn random_value_on_empty_mask_is_sentinel_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(random_value(0, &mut rng), 0);
    }

    #[test]
    fn mask_to_string_separates_large_boards() {
        let mask = values_mask(&[1, 3, 5]);
        assert_eq!(mask_to_string(mask, 9), "135");
        assert_eq!(mask_to_string(mask, 16), "1,3,5");
        assert_eq!(mask_to_string(0, 9), "");
    }

    #[test]
    fn all_values_sets_the_low_bits() {
        assert_eq!(all_values(4), 0b1111);
        assert_eq!(all_values(9), 0x1FF);
    }
}
