//! The chained hash table engine shared by the map and set views.
//!
//! Each table owns a vector of bucket heads and an entry pool. An entry
//! records the full 32-bit hash of its key, the key, the value, and a pool
//! index linking it to the next entry in the same bucket. The full hash is
//! cached so a resize never has to call the user's hash function again, and
//! so chain walks can reject mismatches with a single integer compare before
//! paying for the user's equality callback.
//!
//! ## Bucket counts
//!
//! Bucket counts step through a fixed schedule in both directions. By default
//! the schedule is a table of primes (5 up to ~268M) and an entry's bucket is
//! its hash modulo the count. The `power-of-two-buckets` feature switches to
//! mask-based indexing with bucket counts `1 << bit` for `bit` in `2..=28`.
//! The semantics are identical; masking trades slightly worse key mixing for
//! a cheaper index computation and a shrink fast path: when the mask gets
//! smaller, every entry of old bucket `i` lands in bucket `i & mask`, so
//! whole chains are spliced across without walking their entries.
//!
//! ## Growth and shrink policy
//!
//! After every mutation the entry count is checked against the band
//! `[3·nbuckets/16, 3·nbuckets/4]`. Counts above the band step the schedule
//! up; counts below step it down, but only when shrinking is allowed
//! ([`Flags::ALLOW_SHRINK`]) or an operation forces it (the destructive
//! set-algebra operations do, once, after their sweep). The asymmetric band
//! gives hysteresis: no single insert/remove pair can oscillate the table
//! between two sizes. An explicit reservation pins a floor the table never
//! shrinks below.
//!
//! ## Hash and equality callbacks
//!
//! The hash and equality functions are per-table `fn` pointers. The equality
//! callback returns `true` when the keys are **unequal**; every comparison
//! goes through a handful of internal helpers, so the inverted convention is
//! confined to a few call sites. Set-algebra operations require all operands
//! to share both callbacks and assert this in debug builds.
//!
//! Iterators borrow the table; mutating a table while a shared iterator is
//! alive is ruled out by the borrow checker rather than detected at runtime.

use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use cfg_if::cfg_if;

use crate::pool::EntryPool;

cfg_if! {
    if #[cfg(feature = "power-of-two-buckets")] {
        /// Smallest legal bucket-count exponent.
        const BUCKET_BIT_MIN: u32 = 2;
        /// Largest legal bucket-count exponent (~268M buckets).
        const BUCKET_BIT_MAX: u32 = 28;
    } else {
        /// Ascending prime bucket counts; growth and shrink step through
        /// this schedule one slot at a time.
        const HASH_SIZES: [u32; 27] = [
            5, 11, 17, 37, 67, 131, 257, 521, 1031, 2053, 4099, 8209,
            16411, 32771, 65537, 131101, 262147, 524309, 1048583, 2097169,
            4194319, 8388617, 16777259, 33554467, 67108879, 134217757,
            268435459,
        ];
    }
}

/// Chain terminator and "no entry" sentinel for pool indices.
const NIL: u32 = u32::MAX;

/// Entry-pool chunk size, also the pool's initial reservation.
const POOL_CHUNK: u32 = 64;

const fn limit_grow(nbuckets: usize) -> usize {
    nbuckets * 3 / 4
}

const fn limit_shrink(nbuckets: usize) -> usize {
    nbuckets * 3 / 16
}

/// Hash callback stored per table: maps a key to its full 32-bit hash.
pub type HashFn<K> = fn(&K) -> u32;

/// Equality callback stored per table.
///
/// Returns `true` when the two keys are **unequal**. The standard families
/// in [`key_hash`](crate::key_hash) follow this convention; custom callbacks
/// must as well.
pub type EqFn<K> = fn(&K, &K) -> bool;

/// Behavior flags for a map or set. Combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Flags(u8);

impl Flags {
    /// Duplicate-key inserts through the unchecked insert are legal; a
    /// lookup returns one of the duplicates, a removal removes one.
    pub const ALLOW_DUPES: Flags = Flags(1 << 0);

    /// The table may reduce its bucket count when enough entries are
    /// removed. Without this flag only the destructive set-algebra
    /// operations shrink the table.
    pub const ALLOW_SHRINK: Flags = Flags(1 << 1);

    pub(crate) const fn empty() -> Flags {
        Flags(0)
    }

    fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

pub(crate) struct Entry<K, V> {
    next: u32,
    hash: u32,
    key: K,
    value: V,
}

pub(crate) struct HashTable<K, V> {
    hash_fn: HashFn<K>,
    eq_fn: EqFn<K>,
    buckets: Vec<u32>,
    pool: EntryPool<Entry<K, V>>,
    nentries: usize,
    limit_grow: usize,
    limit_shrink: usize,
    flags: Flags,
    #[cfg(not(feature = "power-of-two-buckets"))]
    cursize: usize,
    #[cfg(not(feature = "power-of-two-buckets"))]
    size_min: usize,
    #[cfg(feature = "power-of-two-buckets")]
    bucket_mask: u32,
    #[cfg(feature = "power-of-two-buckets")]
    bucket_bit: u32,
    #[cfg(feature = "power-of-two-buckets")]
    bucket_bit_min: u32,
}

// Schedule cursor operations for the prime/modulo mode.
#[cfg(not(feature = "power-of-two-buckets"))]
impl<K, V> HashTable<K, V> {
    fn schedule_reset(&mut self) {
        self.cursize = 0;
        self.size_min = 0;
    }

    fn schedule_nbuckets(&self) -> usize {
        HASH_SIZES[self.cursize] as usize
    }

    fn can_grow(&self) -> bool {
        self.cursize + 1 < HASH_SIZES.len()
    }

    fn grow_step(&mut self) -> usize {
        self.cursize += 1;
        HASH_SIZES[self.cursize] as usize
    }

    fn can_shrink(&self) -> bool {
        self.cursize > self.size_min
    }

    fn shrink_step(&mut self) -> usize {
        self.cursize -= 1;
        HASH_SIZES[self.cursize] as usize
    }

    fn pin_floor(&mut self) {
        self.size_min = self.cursize;
    }

    fn bucket_index(&self, hash: u32) -> usize {
        (hash % self.buckets.len() as u32) as usize
    }
}

// Schedule cursor operations for the mask mode.
#[cfg(feature = "power-of-two-buckets")]
impl<K, V> HashTable<K, V> {
    fn schedule_reset(&mut self) {
        self.bucket_bit = BUCKET_BIT_MIN;
        self.bucket_bit_min = BUCKET_BIT_MIN;
        self.bucket_mask = (1u32 << self.bucket_bit) - 1;
    }

    fn schedule_nbuckets(&self) -> usize {
        1usize << self.bucket_bit
    }

    fn can_grow(&self) -> bool {
        self.bucket_bit < BUCKET_BIT_MAX
    }

    fn grow_step(&mut self) -> usize {
        self.bucket_bit += 1;
        1usize << self.bucket_bit
    }

    fn can_shrink(&self) -> bool {
        self.bucket_bit > self.bucket_bit_min
    }

    fn shrink_step(&mut self) -> usize {
        self.bucket_bit -= 1;
        1usize << self.bucket_bit
    }

    fn pin_floor(&mut self) {
        self.bucket_bit_min = self.bucket_bit;
    }

    fn bucket_index(&self, hash: u32) -> usize {
        (hash & self.bucket_mask) as usize
    }
}

impl<K, V> HashTable<K, V> {
    pub(crate) fn with_reserve(
        hash_fn: HashFn<K>,
        eq_fn: EqFn<K>,
        nentries_reserve: usize,
    ) -> Self {
        let mut table = HashTable {
            hash_fn,
            eq_fn,
            buckets: Vec::new(),
            pool: EntryPool::new(POOL_CHUNK, POOL_CHUNK),
            nentries: 0,
            limit_grow: 0,
            limit_shrink: 0,
            flags: Flags::empty(),
            #[cfg(not(feature = "power-of-two-buckets"))]
            cursize: 0,
            #[cfg(not(feature = "power-of-two-buckets"))]
            size_min: 0,
            #[cfg(feature = "power-of-two-buckets")]
            bucket_mask: 0,
            #[cfg(feature = "power-of-two-buckets")]
            bucket_bit: 0,
            #[cfg(feature = "power-of-two-buckets")]
            bucket_bit_min: 0,
        };
        table.buckets_reset(nentries_reserve);
        table
    }

    pub(crate) fn len(&self) -> usize {
        self.nentries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nentries == 0
    }

    pub(crate) fn buckets_len(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn flag_set(&mut self, flags: Flags) {
        self.flags.0 |= flags.0;
    }

    pub(crate) fn flag_clear(&mut self, flags: Flags) {
        self.flags.0 &= !flags.0;
    }

    pub(crate) fn reserve(&mut self, nentries_reserve: usize) {
        self.expand_buckets(nentries_reserve, true, false);
    }

    fn key_hash(&self, key: &K) -> u32 {
        (self.hash_fn)(key)
    }

    /// Replace the bucket array with one of `new_nbuckets` slots and
    /// re-thread every entry. Entries are never moved; only their links and
    /// the array change.
    fn resize_buckets(&mut self, new_nbuckets: usize) {
        debug_assert!(self.buckets.is_empty() || new_nbuckets != self.buckets.len());

        let buckets_old = mem::replace(&mut self.buckets, vec![NIL; new_nbuckets]);
        let grew = new_nbuckets > buckets_old.len();
        #[cfg(feature = "power-of-two-buckets")]
        {
            self.bucket_mask = new_nbuckets as u32 - 1;
        }

        if buckets_old.is_empty() {
            return;
        }

        if grew || cfg!(not(feature = "power-of-two-buckets")) {
            for head in buckets_old {
                // Prepending reverses chain order, which is fine: order
                // within a bucket is unspecified.
                let mut e = head;
                while e != NIL {
                    let entry = self.pool.get(e);
                    let (hash, e_next) = (entry.hash, entry.next);
                    let bucket = self.bucket_index(hash);
                    self.pool.get_mut(e).next = self.buckets[bucket];
                    self.buckets[bucket] = e;
                    e = e_next;
                }
            }
            return;
        }

        #[cfg(feature = "power-of-two-buckets")]
        {
            // Shrinking under a mask: every entry of old bucket `i` lands in
            // `i & mask`, so the whole chain can be spliced in front of the
            // new bucket without walking per entry.
            for (i, head) in buckets_old.into_iter().enumerate() {
                if head == NIL {
                    continue;
                }
                let bucket = i & self.bucket_mask as usize;
                let mut tail = head;
                while self.pool.get(tail).next != NIL {
                    tail = self.pool.get(tail).next;
                }
                self.pool.get_mut(tail).next = self.buckets[bucket];
                self.buckets[bucket] = head;
            }
        }
    }

    /// Check `nentries` against the grow/shrink band and resize if it falls
    /// outside. `user_defined` pins the shrink floor at the resulting size;
    /// `force_shrink` shrinks even without [`Flags::ALLOW_SHRINK`].
    fn expand_buckets(&mut self, nentries: usize, user_defined: bool, force_shrink: bool) {
        if !self.buckets.is_empty()
            && nentries < self.limit_grow
            && nentries > self.limit_shrink
        {
            return;
        }

        let mut new_nbuckets = self.schedule_nbuckets();

        while nentries > self.limit_grow && self.can_grow() {
            new_nbuckets = self.grow_step();
            self.limit_grow = limit_grow(new_nbuckets);
        }
        if force_shrink || self.flags.contains(Flags::ALLOW_SHRINK) {
            while nentries < self.limit_shrink && self.can_shrink() {
                new_nbuckets = self.shrink_step();
                self.limit_shrink = limit_shrink(new_nbuckets);
            }
        }

        if user_defined {
            self.pin_floor();
        }

        if new_nbuckets == self.buckets.len() {
            return;
        }

        self.limit_grow = limit_grow(new_nbuckets);
        self.limit_shrink = limit_shrink(new_nbuckets);
        self.resize_buckets(new_nbuckets);
    }

    /// Drop the bucket array and rebuild an empty one at the smallest
    /// schedule step, then re-expand for `nentries_reserve`.
    fn buckets_reset(&mut self, nentries_reserve: usize) {
        self.buckets.clear();
        self.schedule_reset();
        let nbuckets = self.schedule_nbuckets();
        self.limit_grow = limit_grow(nbuckets);
        self.limit_shrink = limit_shrink(nbuckets);
        self.nentries = 0;
        self.expand_buckets(nentries_reserve, nentries_reserve != 0, false);
    }

    /// Walk the bucket for `hash`, comparing cached hashes first and keys
    /// second. Returns the matching entry's pool index or [`NIL`].
    fn lookup_entry_hashed(&self, hash: u32, key: &K) -> u32 {
        let mut e = self.buckets[self.bucket_index(hash)];
        while e != NIL {
            let entry = self.pool.get(e);
            if entry.hash == hash && !(self.eq_fn)(key, &entry.key) {
                return e;
            }
            e = entry.next;
        }
        NIL
    }

    fn lookup_entry(&self, key: &K) -> u32 {
        self.lookup_entry_hashed(self.key_hash(key), key)
    }

    /// Allocation-and-link tail shared by every insert path.
    fn insert_hashed(&mut self, hash: u32, key: K, value: V) {
        debug_assert!(
            self.flags.contains(Flags::ALLOW_DUPES)
                || self.lookup_entry_hashed(hash, &key) == NIL
        );
        let bucket = self.bucket_index(hash);
        let e = self.pool.alloc(Entry {
            next: self.buckets[bucket],
            hash,
            key,
            value,
        });
        self.buckets[bucket] = e;
        self.nentries += 1;
        self.expand_buckets(self.nentries, false, false);
    }

    /// Clone-and-link used by set algebra once the destination has already
    /// been probed, so the duplicate assertion in [`Self::insert_hashed`]
    /// would only repeat the lookup.
    fn insert_clone_hashed(&mut self, hash: u32, key: &K, value: &V)
    where
        K: Clone,
        V: Clone,
    {
        let bucket = self.bucket_index(hash);
        let e = self.pool.alloc(Entry {
            next: self.buckets[bucket],
            hash,
            key: key.clone(),
            value: value.clone(),
        });
        self.buckets[bucket] = e;
        self.nentries += 1;
        self.expand_buckets(self.nentries, false, false);
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        let hash = self.key_hash(&key);
        self.insert_hashed(hash, key, value);
    }

    pub(crate) fn add(&mut self, key: K, value: V) -> bool {
        let hash = self.key_hash(&key);
        if self.lookup_entry_hashed(hash, &key) != NIL {
            return false;
        }
        self.insert_hashed(hash, key, value);
        true
    }

    pub(crate) fn reinsert(&mut self, key: K, value: V) -> bool {
        let hash = self.key_hash(&key);
        let e = self.lookup_entry_hashed(hash, &key);
        if e != NIL {
            // Overwrite in place; the old key and value drop here.
            let entry = self.pool.get_mut(e);
            entry.key = key;
            entry.value = value;
            return false;
        }
        self.insert_hashed(hash, key, value);
        true
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let e = self.lookup_entry(key);
        if e == NIL {
            None
        } else {
            Some(&self.pool.get(e).value)
        }
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let e = self.lookup_entry(key);
        if e == NIL {
            None
        } else {
            Some(&mut self.pool.get_mut(e).value)
        }
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.lookup_entry(key) != NIL
    }

    /// Unlink the entry matching (`hash`, `key`) with a trailing-link walk
    /// and release it from the pool. Does not consult the resize policy.
    fn unlink_hashed(&mut self, hash: u32, key: &K) -> Option<Entry<K, V>> {
        let bucket = self.bucket_index(hash);
        let mut e_prev = NIL;
        let mut e = self.buckets[bucket];
        while e != NIL {
            let entry = self.pool.get(e);
            let e_next = entry.next;
            if entry.hash == hash && !(self.eq_fn)(key, &entry.key) {
                if e_prev == NIL {
                    self.buckets[bucket] = e_next;
                } else {
                    self.pool.get_mut(e_prev).next = e_next;
                }
                self.nentries -= 1;
                return Some(self.pool.free(e));
            }
            e_prev = e;
            e = e_next;
        }
        None
    }

    pub(crate) fn remove(&mut self, key: &K) -> bool {
        let hash = self.key_hash(key);
        match self.unlink_hashed(hash, key) {
            Some(_) => {
                self.expand_buckets(self.nentries, false, false);
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop(&mut self, key: &K) -> Option<V> {
        let hash = self.key_hash(key);
        let entry = self.unlink_hashed(hash, key)?;
        self.expand_buckets(self.nentries, false, false);
        Some(entry.value)
    }

    pub(crate) fn take(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.key_hash(key);
        let entry = self.unlink_hashed(hash, key)?;
        self.expand_buckets(self.nentries, false, false);
        Some((entry.key, entry.value))
    }

    pub(crate) fn clear_and_reserve(&mut self, nentries_reserve: usize) {
        self.flags = Flags::empty();
        self.buckets_reset(nentries_reserve);
        self.pool.clear(nentries_reserve as u32);
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            table: self,
            bucket: 0,
            e: NIL,
        };
        if self.nentries != 0 {
            while iter.bucket < self.buckets.len() {
                iter.e = self.buckets[iter.bucket];
                if iter.e != NIL {
                    break;
                }
                iter.bucket += 1;
            }
        }
        iter
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            entries: self.pool.iter_mut(),
        }
    }

    pub(crate) fn drain(&mut self) -> Drain<K, V> {
        let pool = mem::replace(&mut self.pool, EntryPool::new(POOL_CHUNK, POOL_CHUNK));
        self.buckets_reset(0);
        Drain {
            entries: pool.into_iter(),
        }
    }

    pub(crate) fn is_disjoint(&self, other: &Self) -> bool {
        // Iterate the smaller side, probe the bigger one.
        let (small, big) = if self.nentries > other.nentries {
            (other, self)
        } else {
            (self, other)
        };
        for bucket in 0..small.buckets.len() {
            let mut e = small.buckets[bucket];
            while e != NIL {
                let entry = small.pool.get(e);
                if big.lookup_entry_hashed(entry.hash, &entry.key) != NIL {
                    return false;
                }
                e = entry.next;
            }
        }
        true
    }

    pub(crate) fn is_equal(&self, other: &Self) -> bool {
        if self.nentries != other.nentries {
            return false;
        }
        self.keys_contained_in(other)
    }

    pub(crate) fn is_subset(&self, other: &Self) -> bool {
        if self.nentries > other.nentries {
            return false;
        }
        self.keys_contained_in(other)
    }

    pub(crate) fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    fn keys_contained_in(&self, other: &Self) -> bool {
        for bucket in 0..self.buckets.len() {
            let mut e = self.buckets[bucket];
            while e != NIL {
                let entry = self.pool.get(e);
                if other.lookup_entry_hashed(entry.hash, &entry.key) == NIL {
                    return false;
                }
                e = entry.next;
            }
        }
        true
    }

    fn assert_compatible(&self, other: &Self) {
        debug_assert!(core::ptr::fn_addr_eq(self.hash_fn, other.hash_fn));
        debug_assert!(core::ptr::fn_addr_eq(self.eq_fn, other.eq_fn));
    }

    /// Left-to-right union: keys missing from `self` are copied in from each
    /// operand in turn. With `reverse`, a key already present has its entry
    /// overwritten instead, so the latest operand wins.
    pub(crate) fn union_with(&mut self, others: &[&Self], reverse: bool)
    where
        K: Clone,
        V: Clone,
    {
        for other in others {
            self.assert_compatible(other);
            for bucket in 0..other.buckets.len() {
                let mut e = other.buckets[bucket];
                while e != NIL {
                    let entry = other.pool.get(e);
                    let e_dst = self.lookup_entry_hashed(entry.hash, &entry.key);
                    if e_dst == NIL {
                        self.insert_clone_hashed(entry.hash, &entry.key, &entry.value);
                    } else if reverse {
                        let dst = self.pool.get_mut(e_dst);
                        dst.key = entry.key.clone();
                        dst.value = entry.value.clone();
                    }
                    e = entry.next;
                }
            }
        }
    }

    /// Sweep `self` against each operand, removing entries whose key is
    /// present (`remove_present`) or absent in it. Shared by intersection
    /// and difference.
    fn retain_against(&mut self, others: &[&Self], remove_present: bool) {
        for other in others {
            self.assert_compatible(other);
            // Resizing mid-sweep would invalidate the walk, so the count is
            // kept locally and the (forced) shrink runs after the sweep.
            let mut nentries = self.nentries;
            for bucket in 0..self.buckets.len() {
                let mut e_prev = NIL;
                let mut e = self.buckets[bucket];
                while e != NIL {
                    let entry = self.pool.get(e);
                    let (hash, e_next) = (entry.hash, entry.next);
                    let present = other.lookup_entry_hashed(hash, &entry.key) != NIL;
                    if present == remove_present {
                        if e_prev == NIL {
                            self.buckets[bucket] = e_next;
                        } else {
                            self.pool.get_mut(e_prev).next = e_next;
                        }
                        nentries -= 1;
                        self.pool.free(e);
                    } else {
                        e_prev = e;
                    }
                    e = e_next;
                }
            }
            self.nentries = nentries;
            self.expand_buckets(self.nentries, false, true);
        }
    }

    pub(crate) fn intersection_with(&mut self, others: &[&Self]) {
        self.retain_against(others, false);
    }

    pub(crate) fn difference_with(&mut self, others: &[&Self]) {
        self.retain_against(others, true);
    }

    /// Keep exactly the keys that occur in one, and only one, of `self` and
    /// the operands.
    ///
    /// Two scratch tables drive the passes: `keys` collects every key seen
    /// at least once (seeded with `self`'s entries), `rem_keys` every key
    /// seen at least twice. Keys in `rem_keys` are then struck from both
    /// `keys` and `self`, and whatever survives in `keys` but is missing
    /// from `self` is moved in.
    pub(crate) fn symmetric_difference_with(&mut self, others: &[&Self])
    where
        K: Clone,
        V: Clone,
    {
        let mut keys: HashTable<K, V> = self.clone();
        let mut rem_keys: HashTable<K, ()> =
            HashTable::with_reserve(self.hash_fn, self.eq_fn, 64);

        for other in others {
            self.assert_compatible(other);
            for bucket in 0..other.buckets.len() {
                let mut e = other.buckets[bucket];
                while e != NIL {
                    let entry = other.pool.get(e);
                    if keys.lookup_entry_hashed(entry.hash, &entry.key) != NIL {
                        // Seen before. A key occurring in three or more
                        // operands must still be recorded only once.
                        if rem_keys.lookup_entry_hashed(entry.hash, &entry.key) == NIL {
                            rem_keys.insert_clone_hashed(entry.hash, &entry.key, &());
                        }
                    } else {
                        keys.insert_clone_hashed(entry.hash, &entry.key, &entry.value);
                    }
                    e = entry.next;
                }
            }
        }

        // Strike every at-least-twice key from `keys` and from `self`.
        for bucket in 0..rem_keys.buckets.len() {
            let mut e = rem_keys.buckets[bucket];
            while e != NIL {
                let entry = rem_keys.pool.get(e);
                let in_keys = keys.unlink_hashed(entry.hash, &entry.key).is_some();
                debug_assert!(in_keys, "a repeated key must have been recorded");
                self.unlink_hashed(entry.hash, &entry.key);
                e = entry.next;
            }
        }

        // Move the surviving scratch entries that self does not already hold.
        for bucket in 0..keys.buckets.len() {
            let mut e = keys.buckets[bucket];
            keys.buckets[bucket] = NIL;
            while e != NIL {
                let e_next = keys.pool.get(e).next;
                let entry = keys.pool.free(e);
                keys.nentries -= 1;
                if self.lookup_entry_hashed(entry.hash, &entry.key) == NIL {
                    self.insert_hashed(entry.hash, entry.key, entry.value);
                }
                e = e_next;
            }
        }

        self.expand_buckets(self.nentries, false, true);
    }
}

impl<K: Clone, V: Clone> Clone for HashTable<K, V> {
    fn clone(&self) -> Self {
        let mut table = HashTable::with_reserve(self.hash_fn, self.eq_fn, 0);
        // One up-front resize; per-entry policy checks would be wasted work.
        table.expand_buckets(self.nentries, false, false);
        for bucket in 0..self.buckets.len() {
            let mut e = self.buckets[bucket];
            while e != NIL {
                let entry = self.pool.get(e);
                let new_bucket = table.bucket_index(entry.hash);
                let e_new = table.pool.alloc(Entry {
                    next: table.buckets[new_bucket],
                    hash: entry.hash,
                    key: entry.key.clone(),
                    value: entry.value.clone(),
                });
                table.buckets[new_bucket] = e_new;
                e = entry.next;
            }
        }
        table.nentries = self.nentries;
        table
    }
}

impl<K, V> Drop for HashTable<K, V> {
    fn drop(&mut self) {
        debug_assert_eq!(self.nentries, self.pool.len());
    }
}

/// A forward-only iterator over a table's entries.
///
/// Walks the bucket array, following each chain before crossing to the next
/// non-empty bucket. The iteration order is unspecified but stable between
/// mutations.
pub struct Iter<'a, K, V> {
    table: &'a HashTable<K, V>,
    bucket: usize,
    e: u32,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.e == NIL {
            return None;
        }
        let entry = self.table.pool.get(self.e);
        self.e = entry.next;
        while self.e == NIL {
            self.bucket += 1;
            if self.bucket >= self.table.buckets.len() {
                break;
            }
            self.e = self.table.buckets[self.bucket];
        }
        Some((&entry.key, &entry.value))
    }
}

/// A mutable iterator over a table's entries, yielding each entry exactly
/// once in unspecified order.
pub struct IterMut<'a, K, V> {
    entries: crate::pool::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        Some((&entry.key, &mut entry.value))
    }
}

/// An iterator that empties the table, yielding owned entries.
///
/// Entries not yet yielded when the iterator is dropped are dropped with it.
pub struct Drain<K, V> {
    entries: crate::pool::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let entry = self.entries.next()?;
        Some((entry.key, entry.value))
    }
}
