//! Double hashing: the caller-supplied hash pair and the probe sequence it drives.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Supplies the two hashes a double-hashing table needs for a key.
///
/// `hash1` picks the home cell and `hash2` the probe step. Both receive the
/// current capacity so implementations may reduce into `[0, capacity)`
/// themselves; the table reduces the results again either way. The step is
/// forced odd by the table, which together with power-of-two capacities
/// makes every probe sequence a permutation of the cells.
///
/// Implementations must be pure: the same key and capacity always yield
/// the same pair, and keys that compare equal yield equal pairs.
pub trait ProbeHasher<Q: ?Sized> {
    fn hash1(&self, key: &Q, capacity: usize) -> usize;
    fn hash2(&self, key: &Q, capacity: usize) -> usize;

    /// Both hashes at once. Override when they share work.
    #[inline]
    fn hashes(&self, key: &Q, capacity: usize) -> (usize, usize) {
        (self.hash1(key, capacity), self.hash2(key, capacity))
    }
}

/// Default probe hasher: one 64-bit hash from a `BuildHasher`. The home
/// cell comes from the hash as is and the step from its halves swapped, so
/// each draws on all of the hash bits a `usize` can hold.
#[derive(Clone, Debug, Default)]
pub struct DoubleHasher<S = DefaultHashBuilder> {
    build: S,
}

impl<S> DoubleHasher<S> {
    pub fn with_build_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<Q, S> ProbeHasher<Q> for DoubleHasher<S>
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash1(&self, key: &Q, capacity: usize) -> usize {
        self.hashes(key, capacity).0
    }

    #[inline]
    fn hash2(&self, key: &Q, capacity: usize) -> usize {
        self.hashes(key, capacity).1
    }

    #[inline]
    fn hashes(&self, key: &Q, capacity: usize) -> (usize, usize) {
        let h = self.build.hash_one(key);
        (
            (h as usize) % capacity,
            (h.rotate_left(32) as usize) % capacity,
        )
    }
}

/// Adapts a pair of plain functions `(key, capacity) -> usize` into a
/// [`ProbeHasher`].
#[derive(Clone, Copy)]
pub struct FnProbe<F1, F2> {
    hash1: F1,
    hash2: F2,
}

impl<F1, F2> FnProbe<F1, F2> {
    pub fn new<K>(hash1: F1, hash2: F2) -> Self
    where
        K: ?Sized,
        F1: Fn(&K, usize) -> usize,
        F2: Fn(&K, usize) -> usize,
    {
        Self { hash1, hash2 }
    }
}

impl<F1, F2> fmt::Debug for FnProbe<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProbe").finish_non_exhaustive()
    }
}

impl<K, F1, F2> ProbeHasher<K> for FnProbe<F1, F2>
where
    K: ?Sized,
    F1: Fn(&K, usize) -> usize,
    F2: Fn(&K, usize) -> usize,
{
    #[inline]
    fn hash1(&self, key: &K, capacity: usize) -> usize {
        (self.hash1)(key, capacity)
    }

    #[inline]
    fn hash2(&self, key: &K, capacity: usize) -> usize {
        (self.hash2)(key, capacity)
    }
}

/// The cells visited for one key: `(home + round * step) mod capacity` for
/// `round` in `0..capacity`.
#[derive(Clone, Debug)]
pub(crate) struct ProbeSeq {
    pos: usize,
    step: usize,
    mask: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub(crate) fn new(home: usize, step: usize, capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mask = capacity - 1;
        Self {
            pos: home & mask,
            step: (step & mask) | 1,
            mask,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.pos;
        self.pos = (self.pos + self.step) & self.mask;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Probe sequence for `key` against an array of `capacity` cells.
#[inline]
pub(crate) fn sequence<H, Q>(hasher: &H, key: &Q, capacity: usize) -> ProbeSeq
where
    H: ProbeHasher<Q>,
    Q: ?Sized,
{
    let (home, step) = hasher.hashes(key, capacity);
    ProbeSeq::new(home, step, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::BuildHasherDefault;
    use std::collections::BTreeSet;

    /// Invariant: for every power-of-two capacity and any step, the sequence
    /// visits each cell exactly once.
    #[test]
    fn sequence_is_a_permutation() {
        for shift in 1..8 {
            let capacity = 1usize << shift;
            for step in 0..capacity + 3 {
                let seen: Vec<usize> = ProbeSeq::new(5, step, capacity).collect();
                assert_eq!(seen.len(), capacity);
                let distinct: BTreeSet<usize> = seen.iter().copied().collect();
                assert_eq!(distinct.len(), capacity, "step {step} cap {capacity}");
            }
        }
    }

    /// Invariant: round 0 is the home cell and round 1 is one step away.
    #[test]
    fn first_rounds_follow_home_and_step() {
        let mut seq = ProbeSeq::new(3, 4, 16);
        assert_eq!(seq.next(), Some(3));
        // step 4 is even and becomes 5
        assert_eq!(seq.next(), Some(8));
        assert_eq!(seq.next(), Some(13));
        assert_eq!(seq.next(), Some(2));
    }

    /// Invariant: out-of-range hashes are reduced into the array.
    #[test]
    fn oversized_hashes_are_reduced() {
        let probe = FnProbe::new(
            |_: &u32, _: usize| usize::MAX,
            |_: &u32, _: usize| usize::MAX - 1,
        );
        let cells: Vec<usize> = sequence(&probe, &7u32, 8).take(2).collect();
        assert_eq!(cells, vec![7, 6]);
    }

    #[derive(Default)]
    struct Fixed(u64);

    impl core::hash::Hasher for Fixed {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, _: &[u8]) {
            self.0 = 0x0000_00ab_0000_0003;
        }
    }

    /// Invariant: home cells use the hash bits above 32 on arrays larger
    /// than 2^32 cells, and the step differs from the home cell.
    #[cfg(target_pointer_width = "64")]
    #[test]
    fn default_hasher_spreads_over_large_arrays() {
        let hasher = DoubleHasher::with_build_hasher(BuildHasherDefault::<Fixed>::default());
        let (home, step) = hasher.hashes(&1u8, 1 << 40);
        assert_eq!(home, 0xab_0000_0003);
        assert_eq!(step, 0x03_0000_00ab);
    }

    /// Invariant: the default hasher stays within capacity and agrees with
    /// itself for equal keys, including borrowed forms.
    #[test]
    fn default_hasher_is_consistent() {
        let hasher = DoubleHasher::<DefaultHashBuilder>::default();
        for capacity in [2usize, 16, 1024] {
            let owned = hasher.hashes(&"key".to_string(), capacity);
            let borrowed = hasher.hashes("key", capacity);
            assert_eq!(owned, borrowed);
            assert!(owned.0 < capacity && owned.1 < capacity);
        }
    }
}
