//! Polynomial rolling hash used for bucket addressing.
//!
//! The accumulator is reduced modulo the bucket count after every code unit,
//! so the result depends on the capacity it was computed for. Nothing caches
//! it: lookups and rehashing always recompute from the key.

/// Multiplier of the rolling hash.
pub const HASH_MULTIPLIER: u128 = 31;

/// Maps `key` to a bucket index in `[0, capacity)`.
///
/// Walks the UTF-16 code units of `key`: starting from 0, each step computes
/// `acc = (acc * 31 + unit) % capacity`. The empty key maps to bucket 0.
/// Arithmetic is widened to `u128`, so no capacity overflows the accumulator.
#[inline]
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index called with zero capacity");
    let modulus = capacity as u128;
    let acc = key
        .encode_utf16()
        .fold(0u128, |acc, unit| (acc * HASH_MULTIPLIER + unit as u128) % modulus);
    acc as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_maps_to_zero() {
        assert_eq!(bucket_index("", 16), 0);
        assert_eq!(bucket_index("", 1), 0);
    }

    #[test]
    fn matches_hand_computed_values() {
        // 'a' = 97; 97 % 16 = 1
        assert_eq!(bucket_index("a", 16), 1);
        // "ab": (1 * 31 + 98) % 16 = 129 % 16 = 1
        assert_eq!(bucket_index("ab", 16), 1);
        // "key1" against 16 buckets:
        // k=107 -> 11; e: 11*31+101=442 -> 10; y: 10*31+121=431 -> 15; 1: 15*31+49=514 -> 2
        assert_eq!(bucket_index("key1", 16), 2);
        // "key2": last step 15*31+50=515 -> 3
        assert_eq!(bucket_index("key2", 16), 3);
    }

    #[test]
    fn result_depends_on_capacity() {
        // "key1" against 32 buckets:
        // k=107 -> 11; e: 442 -> 26; y: 26*31+121=927 -> 31; 1: 31*31+49=1010 -> 18
        assert_eq!(bucket_index("key1", 32), 18);
        assert_ne!(bucket_index("key1", 32), bucket_index("key1", 16));
    }

    #[test]
    fn always_in_range() {
        for capacity in [1usize, 2, 3, 7, 16, 31, 1024] {
            for key in ["", "a", "hello world", "ünïcödé", "🦀🦀", "zzzzzzzzzzzzzzzz"] {
                assert!(bucket_index(key, capacity) < capacity);
            }
        }
    }

    #[test]
    fn huge_capacity_does_not_overflow() {
        let idx = bucket_index("overflow-check", usize::MAX);
        assert!(idx < usize::MAX);
    }

    #[test]
    fn walks_utf16_code_units() {
        // U+1F980 is the surrogate pair 0xD83E 0xDD80.
        let expected = ((0xD83Eu128 * 31 + 0xDD80) % 1000) as usize;
        assert_eq!(bucket_index("🦀", 1000), expected);
    }
}
