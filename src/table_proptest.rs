#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can assert
// the structural invariants through `check_invariants`.

use crate::config::TableConfig;
use crate::table::ChainTable;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

const VALUES: usize = 16;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, usize),
    Remove(usize),
    Get(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=32, proptest::collection::vec("[a-z]{0,5}", 1..=40)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                3 => (idx.clone(), 0..VALUES).prop_map(|(i, v)| OpI::Put(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                1 => idx.clone().prop_map(OpI::Get),
                1 => prop_oneof![
                    contains_pool.prop_map(|s: String| s),
                    "[a-z]{0,5}".prop_map(|s| s)
                ]
                .prop_map(OpI::Contains),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..120)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Drives `sut` and a std HashMap model through `ops`. Invariants checked
// after every step:
// - chains are doubly consistent, acyclic and each node sits in the slot
//   its stored hash selects; len equals the reachable node count;
// - len/is_empty parity with the model;
// - capacity never drops below the floor (or the initial capacity when
//   that was already smaller);
// - load never exceeds max_load_factor.
fn run_against_model<'a, S: BuildHasher>(
    mut sut: ChainTable<'a, usize, S>,
    values: &'a [usize],
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let cfg = *sut.config();
    let floor = cfg.min_size.min(sut.capacity());
    let mut model: HashMap<String, usize> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let prev = sut.put(k, &values[v]).expect("put");
                prop_assert_eq!(prev.copied(), model.insert(k.clone(), v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let before = sut.len();
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
                if removed {
                    prop_assert_eq!(sut.len(), before - 1);
                } else {
                    prop_assert_eq!(sut.len(), before);
                }
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Get(i) => {
                let k = &pool[i];
                match (sut.get(k), model.get(k)) {
                    // Same reference, not merely an equal value.
                    (Some(got), Some(&v)) => {
                        prop_assert!(core::ptr::eq(got, &values[v]));
                    }
                    (None, None) => {}
                    (got, want) => {
                        prop_assert!(false, "get({:?}): {:?} vs {:?}", k, got, want);
                    }
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<Vec<u8>> = sut.iter().map(|(k, _)| k.to_vec()).collect();
                let m_keys: BTreeSet<Vec<u8>> =
                    model.keys().map(|k| k.as_bytes().to_vec()).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.check_invariants(), model.len());
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= floor);
        prop_assert!(sut.load_factor() <= cfg.max_load_factor);
    }

    // Every surviving key still maps to its last assigned value.
    for (k, &v) in &model {
        prop_assert_eq!(sut.get(k), Some(&values[v]));
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap
// using the default one-at-a-time hasher.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let values: Vec<usize> = (0..VALUES).collect();
        let sut = ChainTable::new(capacity).expect("capacity > 0");
        run_against_model(sut, &values, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain splicing.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same invariants as above, under worst-case collision behavior
// (every key in slot 0). Removal hits heads, middles and tails of one long
// chain, and rebuilds must relink it intact.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let values: Vec<usize> = (0..VALUES).collect();
        let sut = ChainTable::with_config_and_hasher(capacity, TableConfig::default(), ConstBuildHasher)
            .expect("capacity > 0");
        run_against_model(sut, &values, &pool, ops)?;
    }
}

// Property: a narrow custom band still keeps contents and the floor intact,
// even though it rebuilds often.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_narrow_band((capacity, pool, ops) in arb_scenario()) {
        let cfg = TableConfig { min_size: 2, min_load_factor: 0.4, max_load_factor: 0.9 };
        let values: Vec<usize> = (0..VALUES).collect();
        let sut = ChainTable::with_config(capacity, cfg).expect("valid config");
        run_against_model(sut, &values, &pool, ops)?;
    }
}
