use alloc::vec::Vec;
use core::fmt::Debug;

use crate::hash_table::EqFn;
use crate::hash_table::Flags;
use crate::hash_table::HashFn;
use crate::hash_table::HashTable;

/// A key-only set sharing the map's chained-table engine.
///
/// `HashSet<K>` is the map with the value slot suppressed: the entry record
/// stores no value and no value-touching code path exists. Everything else
/// — per-instance hash/equality callbacks, the bucket schedule, the entry
/// pool, flags, relations and set algebra — behaves exactly as it does for
/// [`HashMap`](crate::HashMap).
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashSet;
///
/// let mut set = HashSet::<u32>::int_keyed();
/// set.add(1);
/// set.add(2);
/// assert!(set.contains(&1));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone)]
pub struct HashSet<K> {
    table: HashTable<K, ()>,
}

impl<K: Debug> Debug for HashSet<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for key in self.iter() {
            set.entry(key);
        }
        set.finish()
    }
}

impl<K> HashSet<K> {
    /// Creates an empty set using the given hash and equality callbacks.
    pub fn new(hash_fn: HashFn<K>, eq_fn: EqFn<K>) -> Self {
        Self::with_reserve(hash_fn, eq_fn, 0)
    }

    /// Creates an empty set sized for `nentries_reserve` keys; the
    /// reservation pins the shrink floor.
    pub fn with_reserve(hash_fn: HashFn<K>, eq_fn: EqFn<K>, nentries_reserve: usize) -> Self {
        HashSet {
            table: HashTable::with_reserve(hash_fn, eq_fn, nentries_reserve),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current number of buckets.
    pub fn buckets_len(&self) -> usize {
        self.table.buckets_len()
    }

    /// Grows the set, if needed, for `nentries_reserve` keys and pins the
    /// shrink floor there.
    pub fn reserve(&mut self, nentries_reserve: usize) {
        self.table.reserve(nentries_reserve);
    }

    /// Sets the given behavior flags.
    pub fn flag_set(&mut self, flags: Flags) {
        self.table.flag_set(flags);
    }

    /// Clears the given behavior flags.
    pub fn flag_clear(&mut self, flags: Flags) {
        self.table.flag_clear(flags);
    }

    /// Inserts `key` without checking for duplicates; the caller keeps keys
    /// unique unless [`Flags::ALLOW_DUPES`] is set.
    pub fn insert(&mut self, key: K) {
        self.table.insert(key, ());
    }

    /// Inserts `key` only if it is not present.
    ///
    /// Returns `true` if the key was added, `false` (dropping the given
    /// key) if it was already there.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::<u32>::int_keyed();
    /// assert!(set.add(7));
    /// assert!(!set.add(7));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, key: K) -> bool {
        self.table.add(key, ())
    }

    /// Inserts `key`, replacing (and dropping) the stored key if an equal
    /// one was already present.
    ///
    /// Returns `true` if a new key was added. Useful when equal keys are
    /// distinguishable by identity and the caller wants the newest one
    /// kept.
    pub fn reinsert(&mut self, key: K) -> bool {
        self.table.reinsert(key, ())
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, dropping it. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.remove(key)
    }

    /// Removes `key` and returns the owned stored key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut set = HashSet::<u32>::int_keyed();
    /// set.add(3);
    /// assert_eq!(set.take(&3), Some(3));
    /// assert_eq!(set.take(&3), None);
    /// ```
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.table.take(key).map(|(key, ())| key)
    }

    /// Removes every key. Also resets behavior flags.
    pub fn clear(&mut self) {
        self.table.clear_and_reserve(0);
    }

    /// Removes every key and re-reserves space for `nentries_reserve`
    /// upcoming keys. Also resets behavior flags.
    pub fn clear_and_reserve(&mut self, nentries_reserve: usize) {
        self.table.clear_and_reserve(nentries_reserve);
    }

    /// Returns an iterator over the keys in unspecified order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Empties the set, returning an iterator over the owned keys.
    pub fn drain(&mut self) -> Drain<K> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns `true` if `self` and `other` share no key.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.table.is_disjoint(&other.table)
    }

    /// Returns `true` if `self` and `other` contain exactly the same keys.
    pub fn is_equal(&self, other: &Self) -> bool {
        self.table.is_equal(&other.table)
    }

    /// Returns `true` if every key of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.table.is_subset(&other.table)
    }

    /// Returns `true` if every key of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        self.table.is_superset(&other.table)
    }
}

impl<K: Clone> HashSet<K> {
    /// Adds every key of every operand to `self`. There is no reversed
    /// variant: with no values, bias is meaningless.
    ///
    /// All operands must share `self`'s hash and equality callbacks.
    pub fn union_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, ()>> = others.iter().map(|o| &o.table).collect();
        self.table.union_with(&tables, false);
    }

    /// Non-destructive [`union_with`](HashSet::union_with).
    pub fn union(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.union_with(others);
        result
    }

    /// Keeps only the keys present in `self` and every operand. Shrinks
    /// the bucket array afterwards regardless of [`Flags::ALLOW_SHRINK`].
    pub fn intersection_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, ()>> = others.iter().map(|o| &o.table).collect();
        self.table.intersection_with(&tables);
    }

    /// Non-destructive [`intersection_with`](HashSet::intersection_with).
    pub fn intersection(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.intersection_with(others);
        result
    }

    /// Removes every key present in any operand. Shrinks the bucket array
    /// afterwards regardless of [`Flags::ALLOW_SHRINK`].
    pub fn difference_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, ()>> = others.iter().map(|o| &o.table).collect();
        self.table.difference_with(&tables);
    }

    /// Non-destructive [`difference_with`](HashSet::difference_with).
    pub fn difference(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.difference_with(others);
        result
    }

    /// Keeps exactly the keys that occur in one, and only one, of `self`
    /// and the operands.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashSet;
    ///
    /// let mut a = HashSet::<u32>::int_keyed();
    /// let mut b = HashSet::<u32>::int_keyed();
    /// for k in [1, 2, 3] {
    ///     a.add(k);
    /// }
    /// for k in [2, 3, 4] {
    ///     b.add(k);
    /// }
    ///
    /// let sym = a.symmetric_difference(&[&b]);
    /// assert_eq!(sym.len(), 2);
    /// assert!(sym.contains(&1) && sym.contains(&4));
    /// ```
    pub fn symmetric_difference_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, ()>> = others.iter().map(|o| &o.table).collect();
        self.table.symmetric_difference_with(&tables);
    }

    /// Non-destructive
    /// [`symmetric_difference_with`](HashSet::symmetric_difference_with).
    pub fn symmetric_difference(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.symmetric_difference_with(others);
        result
    }
}

impl HashSet<usize> {
    /// Set keyed by pointer-sized identities, hashed with
    /// [`key_hash::ptr_hash`](crate::key_hash::ptr_hash).
    pub fn ptr_keyed() -> Self {
        Self::new(crate::key_hash::ptr_hash, crate::key_hash::ptr_cmp)
    }
}

impl HashSet<u32> {
    /// Set keyed by 32-bit integers, hashed with
    /// [`key_hash::int_hash`](crate::key_hash::int_hash).
    pub fn int_keyed() -> Self {
        Self::new(crate::key_hash::int_hash, crate::key_hash::int_cmp)
    }
}

impl HashSet<alloc::string::String> {
    /// Set keyed by strings, hashed with
    /// [`key_hash::str_hash`](crate::key_hash::str_hash).
    pub fn str_keyed() -> Self {
        Self::new(crate::key_hash::str_hash, crate::key_hash::str_cmp)
    }
}

impl HashSet<crate::key_hash::KeyPair> {
    /// Set keyed by [`KeyPair`](crate::key_hash::KeyPair) composites,
    /// hashed with [`key_hash::pair_hash`](crate::key_hash::pair_hash).
    pub fn pair_keyed() -> Self {
        Self::new(crate::key_hash::pair_hash, crate::key_hash::pair_cmp)
    }
}

impl<'a, K> IntoIterator for &'a HashSet<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// An iterator over a set's keys in unspecified order.
pub struct Iter<'a, K> {
    inner: crate::hash_table::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, ())| key)
    }
}

/// An iterator that empties the set, yielding owned keys.
pub struct Drain<K> {
    inner: crate::hash_table::Drain<K, ()>,
}

impl<K> Iterator for Drain<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(key, ())| key)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;
    use crate::key_hash::KeyPair;

    fn set_of(keys: &[u32]) -> HashSet<u32> {
        let mut set = HashSet::<u32>::int_keyed();
        for &key in keys {
            set.add(key);
        }
        set
    }

    #[test]
    fn test_add_contains_remove() {
        let mut set = HashSet::<u32>::int_keyed();
        assert!(set.add(1));
        assert!(set.add(2));
        assert!(!set.add(1));
        assert_eq!(set.len(), 2);

        assert!(set.contains(&1));
        assert!(!set.contains(&3));

        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_reinsert_keeps_single_entry() {
        let mut set = HashSet::<u32>::int_keyed();
        assert!(set.reinsert(5));
        assert!(!set.reinsert(5));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_take() {
        let mut set = HashSet::str_keyed();
        set.add("key".to_string());
        assert_eq!(set.take(&"key".to_string()), Some("key".to_string()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_iter_and_drain() {
        let set = set_of(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let mut keys: Vec<u32> = set.iter().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, [1, 2, 3, 4, 5, 6, 9]);

        let mut set = set;
        let mut drained: Vec<u32> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [1, 2, 3, 4, 5, 6, 9]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_union() {
        let a = set_of(&[1, 2]);
        let b = set_of(&[2, 3]);
        let u = a.union(&[&b]);
        assert_eq!(u.len(), 3);
        for k in [1, 2, 3] {
            assert!(u.contains(&k));
        }
    }

    #[test]
    fn test_intersection_and_difference() {
        let a = set_of(&[1, 2, 3, 4]);
        let b = set_of(&[3, 4, 5]);

        let i = a.intersection(&[&b]);
        assert_eq!(i.len(), 2);
        assert!(i.contains(&3) && i.contains(&4));

        let d = a.difference(&[&b]);
        assert_eq!(d.len(), 2);
        assert!(d.contains(&1) && d.contains(&2));
        assert!(d.is_disjoint(&b));
    }

    #[test]
    fn test_symmetric_difference_of_three() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[2, 3, 4]);
        let c = set_of(&[3, 4, 5]);

        // 1 and 5 occur once; 2 and 4 twice; 3 in all three.
        let sym = a.symmetric_difference(&[&b, &c]);
        assert_eq!(sym.len(), 2);
        assert!(sym.contains(&1));
        assert!(sym.contains(&5));
    }

    #[test]
    fn test_relations() {
        let a = set_of(&[1, 2, 3, 4]);
        let b = set_of(&[2, 3]);
        let c = set_of(&[10, 11]);

        assert!(b.is_subset(&a));
        assert!(!a.is_subset(&b));
        assert!(a.is_superset(&b));
        assert!(a.is_disjoint(&c));
        assert!(!a.is_disjoint(&b));
        assert!(a.is_equal(&set_of(&[4, 3, 2, 1])));
        assert!(!a.is_equal(&b));
    }

    #[test]
    fn test_pair_keys() {
        let mut set = HashSet::pair_keyed();
        set.add(KeyPair::new(0x1000, 0x2000));
        assert!(set.contains(&KeyPair::new(0x1000, 0x2000)));
        assert!(!set.contains(&KeyPair::new(0x2000, 0x1000)));
    }

    #[test]
    fn test_shrink_flag() {
        let mut set = HashSet::<u32>::int_keyed();
        set.flag_set(Flags::ALLOW_SHRINK);
        for k in 0..2_000 {
            set.add(k);
        }
        let peak = set.buckets_len();
        for k in 0..2_000 {
            set.remove(&k);
        }
        assert!(set.buckets_len() < peak);
    }
}
