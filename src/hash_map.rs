use alloc::vec::Vec;
use core::fmt::Debug;

use crate::hash_table::EqFn;
use crate::hash_table::Flags;
use crate::hash_table::HashFn;
use crate::hash_table::HashTable;

pub use crate::hash_table::Drain;
pub use crate::hash_table::Iter;
pub use crate::hash_table::IterMut;

/// A key-value map backed by a separate-chaining hash table with pooled
/// entries.
///
/// `HashMap<K, V>` stores its hash and equality callbacks per instance
/// rather than deriving them from a trait, so two maps over the same key
/// type can hash differently and keys need not implement `Hash` or `Eq`.
/// The equality callback returns `true` when keys are **unequal** (see
/// [`EqFn`]); the families in [`key_hash`](crate::key_hash) already follow
/// this convention.
///
/// The table grows its bucket array as entries are inserted and, when
/// [`Flags::ALLOW_SHRINK`] is set, gives buckets back as entries are
/// removed. Entry records live in a chunked pool, so heavy churn reuses
/// storage instead of fragmenting the allocator.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
///
/// let mut map = HashMap::<u32, &str>::int_keyed();
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V> {
    table: HashTable<K, V>,
}

impl<K: Debug, V: Debug> Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map using the given hash and equality callbacks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// fn low_bits(key: &u32) -> u32 {
    ///     key & 0xff
    /// }
    /// fn unequal(a: &u32, b: &u32) -> bool {
    ///     a != b
    /// }
    ///
    /// let mut map = HashMap::<u32, &str>::new(low_bits, unequal);
    /// map.insert(7, "seven");
    /// assert!(map.contains_key(&7));
    /// ```
    pub fn new(hash_fn: HashFn<K>, eq_fn: EqFn<K>) -> Self {
        Self::with_reserve(hash_fn, eq_fn, 0)
    }

    /// Creates an empty map sized for `nentries_reserve` entries.
    ///
    /// The reservation also pins the shrink floor: the map never gives back
    /// buckets below the reserved size. Use this when the population is
    /// known up front to avoid growth resizes on the way there.
    pub fn with_reserve(hash_fn: HashFn<K>, eq_fn: EqFn<K>, nentries_reserve: usize) -> Self {
        HashMap {
            table: HashTable::with_reserve(hash_fn, eq_fn, nentries_reserve),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current number of buckets.
    ///
    /// Mostly useful for diagnostics and for tests that pin down resize
    /// behavior; the count follows the bucket schedule, not the entry count
    /// directly.
    pub fn buckets_len(&self) -> usize {
        self.table.buckets_len()
    }

    /// Grows the map, if needed, to hold `nentries_reserve` entries without
    /// further resizes, and pins the shrink floor there.
    pub fn reserve(&mut self, nentries_reserve: usize) {
        self.table.reserve(nentries_reserve);
    }

    /// Sets the given behavior flags.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Flags;
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, u32>::int_keyed();
    /// map.flag_set(Flags::ALLOW_SHRINK);
    /// ```
    pub fn flag_set(&mut self, flags: Flags) {
        self.table.flag_set(flags);
    }

    /// Clears the given behavior flags.
    pub fn flag_clear(&mut self, flags: Flags) {
        self.table.flag_clear(flags);
    }

    /// Inserts a key-value pair without checking for duplicates.
    ///
    /// The caller is expected to keep keys unique unless
    /// [`Flags::ALLOW_DUPES`] is set; inserting an existing key otherwise is
    /// a contract violation caught by a debug assertion. Use [`add`] or
    /// [`reinsert`] when the key may already be present.
    ///
    /// [`add`]: HashMap::add
    /// [`reinsert`]: HashMap::reinsert
    pub fn insert(&mut self, key: K, value: V) {
        self.table.insert(key, value);
    }

    /// Inserts `key` only if it is not present, avoiding the double lookup
    /// of a `contains_key` + `insert` pair.
    ///
    /// Returns `true` if a new entry was added. If the key was already
    /// present the map is unchanged and the given key and value are
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, &str>::int_keyed();
    /// assert!(map.add(1, "first"));
    /// assert!(!map.add(1, "second"));
    /// assert_eq!(map.get(&1), Some(&"first"));
    /// ```
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.table.add(key, value)
    }

    /// Inserts `key`, replacing (and dropping) the previous key and value
    /// if it was already present.
    ///
    /// Returns `true` if a new entry was added, `false` if an existing one
    /// was overwritten.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, &str>::int_keyed();
    /// assert!(map.reinsert(1, "first"));
    /// assert!(!map.reinsert(1, "second"));
    /// assert_eq!(map.get(&1), Some(&"second"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn reinsert(&mut self, key: K, value: V) -> bool {
        self.table.reinsert(key, value)
    }

    /// Returns a reference to the value for `key`, or `None` if absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    /// Returns the value for `key`, or `default` if absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, u32>::int_keyed();
    /// map.insert(1, 10);
    /// assert_eq!(*map.get_or(&1, &0), 10);
    /// assert_eq!(*map.get_or(&2, &0), 0);
    /// ```
    pub fn get_or<'t>(&'t self, key: &K, default: &'t V) -> &'t V {
        self.table.get(key).unwrap_or(default)
    }

    /// Returns a mutable reference to the value for `key`, allowing it to
    /// be updated in place without a second lookup.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, u32>::int_keyed();
    /// map.insert(1, 10);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 5;
    /// }
    /// assert_eq!(map.get(&1), Some(&15));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    /// Returns `true` if `key` is in the map.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, dropping its key and value.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.remove(key)
    }

    /// Removes `key` and returns its value; the stored key is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, &str>::int_keyed();
    /// map.insert(1, "one");
    /// assert_eq!(map.pop(&1), Some("one"));
    /// assert_eq!(map.pop(&1), None);
    /// ```
    pub fn pop(&mut self, key: &K) -> Option<V> {
        self.table.pop(key)
    }

    /// Removes `key` and returns the owned entry.
    pub fn take(&mut self, key: &K) -> Option<(K, V)> {
        self.table.take(key)
    }

    /// Removes every entry. Also resets behavior flags.
    pub fn clear(&mut self) {
        self.table.clear_and_reserve(0);
    }

    /// Removes every entry and re-reserves space for `nentries_reserve`
    /// upcoming entries. Also resets behavior flags.
    pub fn clear_and_reserve(&mut self, nentries_reserve: usize) {
        self.table.clear_and_reserve(nentries_reserve);
    }

    /// Returns an iterator over `(&key, &value)` pairs in unspecified
    /// order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Returns an iterator over `(&key, &mut value)` pairs, for updating
    /// every value in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::<u32, u32>::int_keyed();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.get(&2), Some(&20));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Empties the map, returning an iterator over the owned entries.
    ///
    /// Entries not yet yielded when the iterator is dropped are dropped
    /// with it.
    pub fn drain(&mut self) -> Drain<K, V> {
        self.table.drain()
    }

    /// Returns `true` if `self` and `other` share no key.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.table.is_disjoint(&other.table)
    }

    /// Returns `true` if `self` and `other` contain exactly the same keys.
    ///
    /// Values are not compared.
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

impl<K: Clone, V: Clone> HashMap<K, V> {
    /// Merges each operand into `self`, left to right. Keys already present
    /// keep their entry, so on collision the leftmost value wins.
    ///
    /// All operands must share `self`'s hash and equality callbacks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut a = HashMap::<u32, &str>::int_keyed();
    /// a.insert(1, "a");
    /// a.insert(2, "b");
    /// let mut b = HashMap::<u32, &str>::int_keyed();
    /// b.insert(2, "B");
    /// b.insert(3, "c");
    ///
    /// a.union_with(&[&b]);
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(a.get(&2), Some(&"b"));
    /// assert_eq!(a.get(&3), Some(&"c"));
    /// ```
    pub fn union_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, V>> = others.iter().map(|o| &o.table).collect();
        self.table.union_with(&tables, false);
    }

    /// Non-destructive [`union_with`](HashMap::union_with): copies `self`
    /// and merges the operands into the copy.
    pub fn union(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.union_with(others);
        result
    }

    /// Merges each operand into `self` with the opposite bias: on key
    /// collision the entry is overwritten, so the rightmost value wins.
    /// Costlier than the left-biased union since colliding entries are
    /// dropped and re-cloned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut a = HashMap::<u32, &str>::int_keyed();
    /// a.insert(1, "a");
    /// a.insert(2, "b");
    /// let mut b = HashMap::<u32, &str>::int_keyed();
    /// b.insert(2, "B");
    ///
    /// a.union_reversed_with(&[&b]);
    /// assert_eq!(a.get(&2), Some(&"B"));
    /// ```
    pub fn union_reversed_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, V>> = others.iter().map(|o| &o.table).collect();
        self.table.union_with(&tables, true);
    }

    /// Non-destructive [`union_reversed_with`](HashMap::union_reversed_with).
    pub fn union_reversed(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.union_reversed_with(others);
        result
    }

    /// Removes every entry of `self` whose key is missing from any operand,
    /// leaving the keys present in all of them. Shrinks the bucket array
    /// afterwards regardless of [`Flags::ALLOW_SHRINK`].
    pub fn intersection_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, V>> = others.iter().map(|o| &o.table).collect();
        self.table.intersection_with(&tables);
    }

    /// Non-destructive [`intersection_with`](HashMap::intersection_with).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut a = HashMap::<u32, u32>::int_keyed();
    /// let mut b = HashMap::<u32, u32>::int_keyed();
    /// for k in 0..10 {
    ///     a.insert(k, k);
    /// }
    /// for k in 5..15 {
    ///     b.insert(k, k);
    /// }
    ///
    /// let i = a.intersection(&[&b]);
    /// assert_eq!(i.len(), 5);
    /// assert!(i.contains_key(&5) && i.contains_key(&9));
    /// ```
    pub fn intersection(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.intersection_with(others);
        result
    }

    /// Removes every entry of `self` whose key is present in any operand.
    /// Shrinks the bucket array afterwards regardless of
    /// [`Flags::ALLOW_SHRINK`].
    pub fn difference_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, V>> = others.iter().map(|o| &o.table).collect();
        self.table.difference_with(&tables);
    }

    /// Non-destructive [`difference_with`](HashMap::difference_with).
    pub fn difference(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.difference_with(others);
        result
    }

    /// Keeps exactly the entries whose key occurs in one, and only one, of
    /// `self` and the operands.
    pub fn symmetric_difference_with(&mut self, others: &[&Self]) {
        let tables: Vec<&HashTable<K, V>> = others.iter().map(|o| &o.table).collect();
        self.table.symmetric_difference_with(&tables);
    }

    /// Non-destructive
    /// [`symmetric_difference_with`](HashMap::symmetric_difference_with).
    pub fn symmetric_difference(&self, others: &[&Self]) -> Self {
        let mut result = self.clone();
        result.symmetric_difference_with(others);
        result
    }
}

impl<V> HashMap<usize, V> {
    /// Map keyed by pointer-sized identities, hashed with
    /// [`key_hash::ptr_hash`](crate::key_hash::ptr_hash).
    pub fn ptr_keyed() -> Self {
        Self::new(crate::key_hash::ptr_hash, crate::key_hash::ptr_cmp)
    }
}

impl<V> HashMap<u32, V> {
    /// Map keyed by 32-bit integers, hashed with
    /// [`key_hash::int_hash`](crate::key_hash::int_hash).
    pub fn int_keyed() -> Self {
        Self::new(crate::key_hash::int_hash, crate::key_hash::int_cmp)
    }
}

impl<V> HashMap<alloc::string::String, V> {
    /// Map keyed by strings, hashed with
    /// [`key_hash::str_hash`](crate::key_hash::str_hash).
    pub fn str_keyed() -> Self {
        Self::new(crate::key_hash::str_hash, crate::key_hash::str_cmp)
    }
}

impl<V> HashMap<crate::key_hash::KeyPair, V> {
    /// Map keyed by [`KeyPair`](crate::key_hash::KeyPair) composites,
    /// hashed with [`key_hash::pair_hash`](crate::key_hash::pair_hash).
    pub fn pair_keyed() -> Self {
        Self::new(crate::key_hash::pair_hash, crate::key_hash::pair_cmp)
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An iterator over a map's keys.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over a map's values.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn test_pointer_keyed_roundtrip() {
        let mut map = HashMap::<usize, usize>::ptr_keyed();
        map.insert(0x100, 0x200);
        map.insert(0x300, 0x400);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&0x100), Some(&0x200));
        assert_eq!(map.get(&0x999), None);
        assert!(map.contains_key(&0x300));
    }

    #[test]
    fn test_add_and_reinsert() {
        let mut map = HashMap::<u32, String>::int_keyed();
        assert!(map.add(1, "one".to_string()));
        assert!(!map.add(1, "uno".to_string()));
        assert_eq!(map.get(&1), Some(&"one".to_string()));

        assert!(!map.reinsert(1, "uno".to_string()));
        assert_eq!(map.get(&1), Some(&"uno".to_string()));
        assert!(map.reinsert(2, "dos".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_pop_then_reinsert() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        map.insert(42, 1);
        let popped = map.pop(&42);
        assert_eq!(popped, Some(1));
        map.reinsert(42, 2);
        assert_eq!(map.get(&42), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_take_returns_ownership() {
        let mut map = HashMap::<u32, String>::int_keyed();
        map.insert(9, "nine".to_string());
        let (key, value) = map.take(&9).unwrap();
        assert_eq!(key, 9);
        assert_eq!(value, "nine");
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        map.insert(5, 100);
        *map.get_mut(&5).unwrap() += 1;
        assert_eq!(map.get(&5), Some(&101));
        assert!(map.get_mut(&6).is_none());
    }

    #[test]
    fn test_clear() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        for k in 0..100 {
            map.insert(k, k);
        }
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&1), None);
        map.insert(1, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::<String, u32>::str_keyed();
        map.insert("apple".to_string(), 1);
        map.insert("banana".to_string(), 2);
        assert_eq!(map.get(&"apple".to_string()), Some(&1));
        assert_eq!(map.get(&"cherry".to_string()), None);
        assert!(map.remove(&"banana".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        for k in 0..50 {
            map.insert(k, k * 2);
        }

        let mut pairs: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs.len(), 50);
        assert_eq!(pairs[10], (10, 20));

        assert_eq!(map.keys().count(), 50);
        let total: u32 = map.values().sum();
        assert_eq!(total, (0..50u32).map(|k| k * 2).sum());
    }

    #[test]
    fn test_drain() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        for k in 0..20 {
            map.insert(k, k);
        }
        let drained: Vec<(u32, u32)> = map.drain().collect();
        assert_eq!(drained.len(), 20);
        assert!(map.is_empty());
    }

    #[test]
    fn test_union_bias() {
        let mut a = HashMap::<usize, &str>::ptr_keyed();
        a.insert(1, "a");
        a.insert(2, "b");
        let mut b = HashMap::<usize, &str>::ptr_keyed();
        b.insert(2, "B");
        b.insert(3, "c");

        let left = a.union(&[&b]);
        assert_eq!(left.len(), 3);
        assert_eq!(left.get(&1), Some(&"a"));
        assert_eq!(left.get(&2), Some(&"b"));
        assert_eq!(left.get(&3), Some(&"c"));

        let right = a.union_reversed(&[&b]);
        assert_eq!(right.len(), 3);
        assert_eq!(right.get(&1), Some(&"a"));
        assert_eq!(right.get(&2), Some(&"B"));
        assert_eq!(right.get(&3), Some(&"c"));

        // The operands are untouched.
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_intersection_and_difference() {
        let mut a = HashMap::<u32, u32>::int_keyed();
        let mut b = HashMap::<u32, u32>::int_keyed();
        for k in 0..10 {
            a.insert(k, k);
        }
        for k in 5..15 {
            b.insert(k, k);
        }

        let inter = a.intersection(&[&b]);
        assert_eq!(inter.len(), 5);
        for k in 5..10 {
            assert!(inter.contains_key(&k));
        }

        let diff = a.difference(&[&b]);
        assert_eq!(diff.len(), 5);
        for k in 0..5 {
            assert!(diff.contains_key(&k));
        }
        assert!(diff.is_disjoint(&b));
    }

    #[test]
    fn test_symmetric_difference() {
        let mut a = HashMap::<u32, u32>::int_keyed();
        let mut b = HashMap::<u32, u32>::int_keyed();
        for k in [1, 2, 3] {
            a.insert(k, k);
        }
        for k in [3, 4] {
            b.insert(k, k);
        }

        let sym = a.symmetric_difference(&[&b]);
        assert_eq!(sym.len(), 3);
        assert!(sym.contains_key(&1));
        assert!(sym.contains_key(&2));
        assert!(sym.contains_key(&4));
        assert!(!sym.contains_key(&3));
    }

    #[test]
    fn test_relations() {
        let mut a = HashMap::<u32, u32>::int_keyed();
        let mut b = HashMap::<u32, u32>::int_keyed();
        for k in 0..10 {
            a.insert(k, 0);
        }
        for k in 3..7 {
            b.insert(k, 9);
        }
        assert!(b.is_subset(&a));
        assert!(a.is_superset(&b));
        assert!(!a.is_equal(&b));
        assert!(!a.is_disjoint(&b));

        // Key-only equality: values do not matter.
        let mut c = HashMap::<u32, u32>::int_keyed();
        for k in 0..10 {
            c.insert(k, 1_000 + k);
        }
        assert!(a.is_equal(&c));
    }

    #[test]
    fn test_debug_output() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        map.insert(1, 2);
        let rendered = alloc::format!("{map:?}");
        assert_eq!(rendered, "{1: 2}");
    }

    #[test]
    fn test_churn_reuses_pool_storage() {
        let mut map = HashMap::<u32, u32>::int_keyed();
        map.flag_set(Flags::ALLOW_SHRINK);
        for round in 0..5 {
            for k in 0..500 {
                map.insert(k, round);
            }
            for k in 0..500 {
                assert!(map.remove(&k));
            }
            assert!(map.is_empty());
        }
    }
}
