// Property tests for the map and set.
//
// Property 1: a random op sequence against std's HashMap as the oracle.
//  - Operations: add, reinsert, remove, pop, lookup.
//  - After every op: len() matches, and the resize policy holds (the entry
//    count never exceeds 3/4 of the buckets; with shrinking enabled it
//    never sits below 3/16 of them unless the table is at its smallest
//    step).
//  - At the end: exhaustive iteration agrees with the oracle.
//
// Property 2: set-algebra laws on randomly drawn key sets.
//  - Union and intersection commute (as key sets).
//  - A △ B == (A ∪ B) − (A ∩ B).
//  - A − B is disjoint from B; A ∩ B is a subset of both.
use std::collections::HashMap as StdMap;

use chain_hash::Flags;
use chain_hash::HashMap;
use chain_hash::HashSet;
use proptest::prelude::*;

fn set_of_keys(keys: impl IntoIterator<Item = u32>) -> HashSet<u32> {
    let mut set = HashSet::<u32>::int_keyed();
    for key in keys {
        set.add(key);
    }
    set
}

// The smallest bucket count of either schedule; a table this small is
// allowed to sit under the shrink limit.
fn at_smallest_step(buckets: usize) -> bool {
    buckets <= 5
}

proptest! {
    #[test]
    fn prop_map_matches_oracle(
        ops in proptest::collection::vec((0u8..=4u8, 0u32..60u32, any::<u32>()), 1..300),
    ) {
        let mut map = HashMap::<u32, u32>::int_keyed();
        map.flag_set(Flags::ALLOW_SHRINK);
        let mut oracle: StdMap<u32, u32> = StdMap::new();

        for (op, key, value) in ops {
            match op {
                // add: inserts only when absent.
                0 => {
                    let added = map.add(key, value);
                    prop_assert_eq!(added, !oracle.contains_key(&key));
                    if added {
                        oracle.insert(key, value);
                    }
                }
                // reinsert: inserts or overwrites.
                1 => {
                    let fresh = map.reinsert(key, value);
                    prop_assert_eq!(fresh, !oracle.contains_key(&key));
                    oracle.insert(key, value);
                }
                // remove: drops the entry.
                2 => {
                    let removed = map.remove(&key);
                    prop_assert_eq!(removed, oracle.remove(&key).is_some());
                }
                // pop: returns the value.
                3 => {
                    let popped = map.pop(&key);
                    prop_assert_eq!(popped, oracle.remove(&key));
                }
                // lookup.
                4 => {
                    prop_assert_eq!(map.get(&key), oracle.get(&key));
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(map.len(), oracle.len());

            // The load band holds after every public mutation.
            let buckets = map.buckets_len();
            prop_assert!(map.len() <= buckets * 3 / 4);
            prop_assert!(map.len() >= buckets * 3 / 16 || at_smallest_step(buckets));
        }

        let mut seen = 0usize;
        for (key, value) in map.iter() {
            prop_assert_eq!(oracle.get(key), Some(value));
            seen += 1;
        }
        prop_assert_eq!(seen, oracle.len());
    }

    #[test]
    fn prop_set_algebra_laws(
        a_keys in proptest::collection::btree_set(0u32..80u32, 0..40usize),
        b_keys in proptest::collection::btree_set(0u32..80u32, 0..40usize),
    ) {
        let a = set_of_keys(a_keys.iter().copied());
        let b = set_of_keys(b_keys.iter().copied());

        let ab = a.union(&[&b]);
        let ba = b.union(&[&a]);
        prop_assert!(ab.is_equal(&ba));

        let inter = a.intersection(&[&b]);
        let inter_rev = b.intersection(&[&a]);
        prop_assert!(inter.is_equal(&inter_rev));
        prop_assert!(inter.is_subset(&a));
        prop_assert!(inter.is_subset(&b));
        prop_assert!(a.is_subset(&ab));
        prop_assert!(b.is_subset(&ab));

        let sym = a.symmetric_difference(&[&b]);
        let expected = ab.difference(&[&inter]);
        prop_assert!(sym.is_equal(&expected));

        let diff = a.difference(&[&b]);
        prop_assert!(diff.is_disjoint(&b));
        prop_assert!(diff.is_subset(&a));

        // Sizes agree with the classic identities.
        prop_assert_eq!(ab.len(), a.len() + b.len() - inter.len());
        prop_assert_eq!(sym.len(), ab.len() - inter.len());
        prop_assert_eq!(diff.len(), a.len() - inter.len());
    }

    #[test]
    fn prop_clone_is_detached(
        keys in proptest::collection::btree_set(0u32..200u32, 0..100usize),
        extra in 200u32..220u32,
    ) {
        let original = set_of_keys(keys.iter().copied());
        let mut copy = original.clone();
        prop_assert!(copy.is_equal(&original));

        copy.add(extra);
        prop_assert!(!original.contains(&extra));
        prop_assert_eq!(original.len(), keys.len());
    }

    #[test]
    fn prop_drain_yields_exactly_the_contents(
        keys in proptest::collection::btree_set(0u32..500u32, 0..200usize),
    ) {
        let mut set = set_of_keys(keys.iter().copied());
        let mut drained: Vec<u32> = set.drain().collect();
        drained.sort_unstable();
        let expected: Vec<u32> = keys.iter().copied().collect();
        prop_assert_eq!(drained, expected);
        prop_assert!(set.is_empty());
    }
}
