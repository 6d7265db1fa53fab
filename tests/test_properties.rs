use proptest::prelude::*;
use splay_collections::splay_tree::SplaySet;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(i16),
    Search(i16),
    Remove(i16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i16>().prop_map(Op::Insert),
        any::<i16>().prop_map(Op::Search),
        any::<i16>().prop_map(Op::Remove),
    ]
}

fn small_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i16..32).prop_map(Op::Insert),
        (0i16..32).prop_map(Op::Search),
        (0i16..32).prop_map(Op::Remove),
    ]
}

fn keys_of(set: &SplaySet<i16>) -> Vec<i16> {
    set.iter().cloned().collect()
}

fn check_ops(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut set = SplaySet::with_chunk_size(8);
    let mut expected = BTreeSet::new();
    for op in ops {
        match op {
            Op::Insert(key) => {
                prop_assert_eq!(set.insert(key).unwrap(), expected.insert(key));
                prop_assert_eq!(set.root(), Some(&key));
            },
            Op::Search(key) => {
                let result = set.search(&key);
                prop_assert_eq!(result.found, expected.contains(&key));
                if result.found {
                    prop_assert_eq!(set.root(), Some(&key));
                }
            },
            Op::Remove(key) => {
                let before = keys_of(&set);
                let removed = set.remove(&key);
                prop_assert_eq!(removed, expected.take(&key));
                if removed.is_none() {
                    prop_assert_eq!(keys_of(&set), before);
                }
            },
        }

        let in_order = keys_of(&set);
        prop_assert!(in_order.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(&in_order, &expected.iter().cloned().collect::<Vec<i16>>());
        prop_assert_eq!(set.len(), expected.len());
        let level_order_len = set.level_order().map_or(0, |keys| keys.count());
        prop_assert_eq!(level_order_len, expected.len());
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_random_operations(ops in prop::collection::vec(op(), 0..200)) {
        check_ops(ops)?;
    }

    #[test]
    fn prop_dense_operations(ops in prop::collection::vec(small_op(), 0..200)) {
        check_ops(ops)?;
    }

    #[test]
    fn prop_inserted_keys_are_found(keys in prop::collection::vec(any::<i32>(), 1..200)) {
        let mut set = SplaySet::new();
        for key in &keys {
            set.insert(*key).unwrap();
        }
        for key in &keys {
            prop_assert!(set.search(key).found);
            prop_assert_eq!(set.root(), Some(key));
        }
    }

    #[test]
    fn prop_remove_then_search(
        keys in prop::collection::btree_set(any::<i32>(), 1..100),
        index in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<i32> = keys.into_iter().collect();
        let victim = keys[index.index(keys.len())];
        let mut set = SplaySet::new();
        for key in &keys {
            set.insert(*key).unwrap();
        }

        prop_assert_eq!(set.remove(&victim), Some(victim));
        prop_assert!(!set.search(&victim).found);
        for key in keys.iter().filter(|key| **key != victim) {
            prop_assert!(set.search(key).found);
        }
    }
}
