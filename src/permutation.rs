//! Deterministic pixel permutation used to scatter payload bits.
//!
//! The carrier's first [`HEADER_PIXELS`](super::consts::HEADER_PIXELS) pixels
//! (raster order) always hold the seed header. The remaining pixels form a
//! contiguous range `A = [HEADER_PIXELS, W*H)`; payload bits are scattered
//! across a draw-order sample of `A` whose order is fully determined by the
//! 16-byte seed.
//!
//! The sampling primitive is written out explicitly (a partial Fisher-Yates
//! over a copy of `A`) rather than delegated to a library "choice without
//! replacement" helper, per the load-bearing requirement that the sequence
//! be reproducible from the seed and the size of `A` alone. This pins the
//! algorithm for this implementation; it does not by itself guarantee
//! bit-for-bit interoperability with a reimplementation in another language,
//! since that also depends on the uniform-integer-in-range method the local
//! `rand` crate uses internally.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Derives the 64-bit PRNG seed from the first 8 bytes of the 16-byte seed,
/// interpreted as a big-endian unsigned integer.
pub(crate) fn seed_to_u64(seed: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let take = seed.len().min(8);
    buf[..take].copy_from_slice(&seed[..take]);
    u64::from_be_bytes(buf)
}

/// Draws `amount` elements without replacement from `[start, total)` in draw
/// order, via a partial Fisher-Yates shuffle over a working copy of the
/// range. `amount` is silently clamped to the size of the range.
///
/// For `k` from `0` to `amount - 1`: draw `j` uniformly from `[k, len)`,
/// swap the working copy's `k`-th and `j`-th elements, emit the new
/// `k`-th element.
pub(crate) fn draw_without_replacement(
    seed: &[u8],
    start: usize,
    total: usize,
    amount: usize,
) -> Vec<usize> {
    let mut universe: Vec<usize> = (start..total).collect();
    let len = universe.len();
    let amount = amount.min(len);

    let mut rng = Pcg64Mcg::seed_from_u64(seed_to_u64(seed));
    let mut drawn = Vec::with_capacity(amount);
    for k in 0..amount {
        let j = rng.random_range(k..len);
        universe.swap(k, j);
        drawn.push(universe[k]);
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_to_u64_is_big_endian_of_first_eight_bytes() {
        let seed: Vec<u8> = (0..16).collect();
        assert_eq!(seed_to_u64(&seed), 0x0001020304050607u64);
    }

    #[test]
    fn seed_to_u64_zero_pads_short_seeds() {
        assert_eq!(seed_to_u64(&[0x01, 0x02]), 0x0102_0000_0000_0000u64);
    }

    #[test]
    fn draw_is_deterministic_for_a_fixed_seed() {
        let seed = [7u8; 16];
        let a = draw_without_replacement(&seed, 46, 1000, 50);
        let b = draw_without_replacement(&seed, 46, 1000, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn draw_never_touches_the_header_range() {
        let seed = [3u8; 16];
        let drawn = draw_without_replacement(&seed, 46, 2000, 1954);
        assert!(drawn.iter().all(|&p| p >= 46));
    }

    #[test]
    fn partial_draw_is_a_prefix_of_the_full_shuffle() {
        let seed = [9u8; 16];
        let total = 500;
        let start = 46;
        let full = draw_without_replacement(&seed, start, total, total - start);
        let partial = draw_without_replacement(&seed, start, total, 37);
        assert_eq!(&full[..37], &partial[..]);
    }

    #[test]
    fn draw_produces_unique_indices() {
        let seed = [1u8; 16];
        let drawn = draw_without_replacement(&seed, 0, 300, 300);
        let mut sorted = drawn.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), drawn.len());
    }
}
