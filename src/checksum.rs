//! Reference checksum for the accumulation loop.

/// Number of accumulation steps per cycle.
pub const STEPS: u32 = 1_000_000;

/// `closed_form(STEPS)`, i.e. `Σ i*2` for `i` in `0..STEPS`, wrapped to 32 bits.
pub const EXPECTED_CHECKSUM: u32 = 0xD495_CDC0;

const _: () = assert!(closed_form(STEPS) == EXPECTED_CHECKSUM);

/// Returns `steps * (steps - 1) mod 2^32`.
///
/// This is the value the loop must reach after `steps` iterations of
/// `sum += i * 2`. Working in wrapping `u32` arithmetic gives the same
/// residue as the exact product.
pub const fn closed_form(steps: u32) -> u32 {
    steps.wrapping_mul(steps.wrapping_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_matches_exact_product() {
        let exact = u64::from(STEPS) * u64::from(STEPS - 1);
        assert_eq!(exact % (1u64 << 32), u64::from(EXPECTED_CHECKSUM));
        assert_eq!(closed_form(STEPS), EXPECTED_CHECKSUM);
    }

    #[test]
    fn small_ranges() {
        assert_eq!(closed_form(0), 0);
        assert_eq!(closed_form(1), 0);
        assert_eq!(closed_form(2), 2);
        // 0 + 2 + 4 + 6 + 8
        assert_eq!(closed_form(5), 20);
    }

    #[test]
    fn wraps_like_the_loop() {
        let steps = 100_000u32;
        let mut sum = 0u32;
        for i in 0..steps {
            sum = sum.wrapping_add(i.wrapping_mul(2));
        }
        assert_eq!(closed_form(steps), sum);
    }
}
