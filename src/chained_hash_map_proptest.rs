#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// the private bucket layout after every operation.

use crate::chained_hash_map::{ChainedHashMap, Handle};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    RemoveHandle(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, f64, Vec<String>, Vec<OpI>)> {
    let capacity = 1usize..=8;
    let load_factor = prop_oneof![Just(0.5), Just(0.75), Just(1.0), Just(3.0)];
    let pool = proptest::collection::vec("[a-z]{0,5}", 1..=24);
    (capacity, load_factor, pool).prop_flat_map(|(capacity, load_factor, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80)
            .prop_map(move |ops| (capacity, load_factor, pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Every entry sits in bucket `bucket_index(key, capacity)`; chain lengths sum to `len`.
// - Keys are unique; overwrite returns the previous value and keeps `len`.
// - Capacity is a power-of-two multiple of the initial one and never shrinks.
// - Removing a handle invalidates it; stale handles never resolve.
// - `iter` yields each live entry exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, load_factor, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32> =
            ChainedHashMap::with_capacity_and_load_factor(capacity, load_factor).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut stale: Vec<Handle> = Vec::new();
        let mut last_capacity = sut.capacity();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.insert(k.clone(), v);
                    prop_assert_eq!(prev, model.insert(k, v));
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let h = sut.find(k);
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    if let Some(h) = h {
                        stale.push(h);
                    }
                }
                OpI::RemoveHandle(i) => {
                    let k = &pool[i];
                    match sut.find(k) {
                        Some(h) => {
                            let (kk, vv) = sut.remove_handle(h).expect("handle valid for removal");
                            prop_assert_eq!(&kk, k);
                            prop_assert_eq!(Some(vv), model.remove(k));
                            stale.push(h);
                        }
                        None => prop_assert!(!model.contains_key(k)),
                    }
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                    prop_assert_eq!(sut.find(k).is_some(), model.contains_key(k));
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::Clear => {
                    stale.extend(model.keys().filter_map(|k| sut.find(k)));
                    sut.clear();
                    model.clear();
                }
                OpI::Iterate => {
                    let seen: BTreeSet<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    let expected: BTreeSet<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(sut.iter().count(), model.len());
                    prop_assert_eq!(seen, expected);
                }
            }

            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.capacity() >= last_capacity);
            prop_assert!(sut.capacity() % capacity == 0);
            prop_assert!((sut.capacity() / capacity).is_power_of_two());
            last_capacity = sut.capacity();
            for h in &stale {
                prop_assert!(h.value(&sut).is_none(), "stale handle must not resolve");
            }
        }
    }
}
