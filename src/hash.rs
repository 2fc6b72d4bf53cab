//! One-at-a-time string hash and its `Hasher`/`BuildHasher` adapters.
//!
//! The mixer is cheap and spreads short ASCII keys reasonably well. It is
//! not seeded and not collision resistant; nothing outside a running
//! process may depend on its exact output.

use core::hash::{BuildHasher, Hasher};

#[inline]
fn mix(mut acc: u32, bytes: &[u8]) -> u32 {
    for &b in bytes {
        acc = acc.wrapping_add(u32::from(b));
        acc = acc.wrapping_add(acc << 10);
        acc ^= acc >> 6;
    }
    acc
}

#[inline]
fn avalanche(mut acc: u32) -> u32 {
    acc = acc.wrapping_add(acc << 3);
    acc ^= acc >> 11;
    acc.wrapping_add(acc << 15)
}

/// Hash `bytes` with the one-at-a-time mixer.
///
/// The result is unsigned, so it can be reduced modulo a capacity directly.
pub fn one_at_a_time(bytes: &[u8]) -> u32 {
    avalanche(mix(0, bytes))
}

/// Incremental form of [`one_at_a_time`].
///
/// Feeding the same bytes through any split of `write` calls yields the
/// same `finish()` as hashing them in one piece.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneAtATime {
    acc: u32,
}

impl Hasher for OneAtATime {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.acc = mix(self.acc, bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(avalanche(self.acc))
    }
}

/// Default hasher builder for [`ChainTable`](crate::ChainTable).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOneAtATime;

impl BuildHasher for BuildOneAtATime {
    type Hasher = OneAtATime;

    fn build_hasher(&self) -> OneAtATime {
        OneAtATime::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(one_at_a_time(b""), 0);
        assert_eq!(one_at_a_time(b"a"), 0xca2e_9442);
        assert_eq!(one_at_a_time(b"yo"), 3_344_008_873);
        assert_eq!(one_at_a_time(b"justin"), 2_315_484_333);
        assert_eq!(
            one_at_a_time(b"The quick brown fox jumps over the lazy dog"),
            1_369_346_549
        );
    }

    /// Content decides the hash, not the buffer it lives in.
    #[test]
    fn depends_on_content_not_identity() {
        let owned = String::from("anjali");
        let other = owned.clone();
        assert_eq!(
            one_at_a_time(owned.as_bytes()),
            one_at_a_time(other.as_bytes())
        );
        assert_eq!(one_at_a_time(owned.as_bytes()), one_at_a_time(b"anjali"));
    }

    /// A prefix is a different key.
    #[test]
    fn length_participates() {
        assert_ne!(one_at_a_time(b"emil"), one_at_a_time(b"emily"));
    }

    /// Leading NUL bytes leave a zero accumulator at zero, so they collide
    /// with the empty key. The table tells them apart by comparing bytes.
    #[test]
    fn leading_nul_collides_with_empty() {
        assert_eq!(one_at_a_time(b"\0"), one_at_a_time(b""));
        assert_eq!(one_at_a_time(b"\0\0\0"), 0);
    }

    #[test]
    fn hasher_matches_function_across_splits() {
        let key = b"stephanie";
        let expected = u64::from(one_at_a_time(key));
        for split in 0..=key.len() {
            let mut h = BuildOneAtATime.build_hasher();
            h.write(&key[..split]);
            h.write(&key[split..]);
            assert_eq!(h.finish(), expected, "split at {split}");
        }
    }

    #[test]
    fn finish_does_not_consume_state() {
        let mut h = OneAtATime::default();
        h.write(b"kim");
        let first = h.finish();
        assert_eq!(first, h.finish());
        h.write(b"berly");
        assert_eq!(h.finish(), u64::from(one_at_a_time(b"kimberly")));
    }
}
