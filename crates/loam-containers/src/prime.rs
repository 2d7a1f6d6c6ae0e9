//! Bucket-count ladder.

/// Prime bucket counts for table layouts, ascending.
///
/// Primes keep clustering low when hash values share factors with the
/// table size. The top rung caps table width; load beyond it is
/// absorbed by longer chains rather than more buckets.
pub(crate) const PRIMES: [usize; 8] = [509, 1021, 2053, 4093, 8191, 16381, 32771, 65521];

/// Smallest ladder prime at or above `hint`, saturating at the top
/// rung.
pub(crate) fn bucket_count_for(hint: usize) -> usize {
    PRIMES
        .iter()
        .copied()
        .find(|&prime| prime >= hint)
        .unwrap_or(PRIMES[PRIMES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_hints_take_the_bottom_rung() {
        assert_eq!(bucket_count_for(0), 509);
        assert_eq!(bucket_count_for(1), 509);
        assert_eq!(bucket_count_for(100), 509);
        assert_eq!(bucket_count_for(509), 509);
    }

    #[test]
    fn hints_round_up_to_the_next_rung() {
        assert_eq!(bucket_count_for(510), 1021);
        assert_eq!(bucket_count_for(1022), 2053);
        assert_eq!(bucket_count_for(65521), 65521);
    }

    #[test]
    fn oversized_hints_saturate_at_the_top_rung() {
        assert_eq!(bucket_count_for(65522), 65521);
        assert_eq!(bucket_count_for(usize::MAX), 65521);
    }

    #[test]
    fn ladder_is_strictly_ascending() {
        for pair in PRIMES.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
