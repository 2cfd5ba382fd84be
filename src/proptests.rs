use super::*;

use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Model key: length first, then ASCII-folded bytes. Its derived `Ord`
/// matches [`key_cmp`].
type ModelKey = (usize, Vec<u8>);

fn model_key(key: &[u8]) -> ModelKey {
    (key.len(), key.to_ascii_lowercase())
}

fn validate_array(a: &Array) {
    assert!(a.len() <= a.capacity(), "length exceeds slot store size");
    assert!(
        a.len() + a.stats().cached <= a.capacity(),
        "reuse cache holds more than the free slots"
    );
    for w in a.as_slice().windows(2) {
        assert_eq!(
            key_cmp(w[0].key(), w[1].key()),
            Ordering::Less,
            "keys out of order: {:?} then {:?}",
            String::from_utf8_lossy(w[0].key()),
            String::from_utf8_lossy(w[1].key())
        );
    }
    for (i, d) in a.iter().enumerate() {
        assert!(!d.key().is_empty(), "map-mode entry without key");
        assert_eq!(a.locate(d.key()), Position::Found(i));
    }
}

#[derive(Clone, Debug)]
enum Op {
    Replace(Vec<u8>, i64),
    InsertUnique(Vec<u8>, i64),
    Extract(Vec<u8>),
    Get(Vec<u8>),
    Bump(Vec<u8>),
    SoftReset,
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A small mixed-case alphabet so that case-only collisions are frequent.
    prop::collection::vec(prop::sample::select(b"aAbBcC/.".to_vec()), 1..=4)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let value = -1000i64..1000;
    let op = prop_oneof![
        30 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Replace(k, v)),
        20 => (key.clone(), value).prop_map(|(k, v)| Op::InsertUnique(k, v)),
        20 => key.clone().prop_map(Op::Extract),
        15 => key.clone().prop_map(Op::Get),
        14 => key.clone().prop_map(Op::Bump),
        1 => Just(Op::SoftReset),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_map(policy in any::<ReusePolicy>(), ops in ops_strategy()) {
        let mut a = Array::with_config(ArrayConfig::default().with_reuse(policy));
        let mut m: BTreeMap<ModelKey, (Vec<u8>, i64)> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Replace(key, value) => {
                    let old_a = a
                        .replace(Data::integer(key.clone(), value))
                        .and_then(|d| d.as_integer());
                    let old_m = m.insert(model_key(&key), (key, value)).map(|(_, v)| v);
                    prop_assert_eq!(old_a, old_m);
                }
                Op::InsertUnique(key, value) => {
                    a.insert_unique(Data::integer(key.clone(), value));
                    m.entry(model_key(&key)).or_insert((key, value));
                }
                Op::Extract(key) => {
                    let old_a = a.extract(&key).and_then(|d| d.as_integer());
                    let old_m = m.remove(&model_key(&key)).map(|(_, v)| v);
                    prop_assert_eq!(old_a, old_m);
                }
                Op::Get(key) => {
                    let got_a = a.get(&key).and_then(Data::as_integer);
                    let got_m = m.get(&model_key(&key)).map(|(_, v)| *v);
                    prop_assert_eq!(got_a, got_m);
                }
                Op::Bump(key) => {
                    let v = a.get_int_mut(&key);
                    *v = v.wrapping_add(1);
                    let e = m.entry(model_key(&key)).or_insert((key, 0));
                    e.1 = e.1.wrapping_add(1);
                }
                Op::SoftReset => {
                    a.soft_reset();
                    m.clear();
                }
            }

            prop_assert_eq!(a.len(), m.len());
            validate_array(&a);
        }

        let got: Vec<(Vec<u8>, i64)> = a
            .iter()
            .map(|d| (d.key().to_vec(), d.as_integer().unwrap_or_default()))
            .collect();
        let expected: Vec<(Vec<u8>, i64)> = m.values().cloned().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_list_mode_refill(
        policy in any::<ReusePolicy>(),
        rounds in prop::collection::vec(
            prop::collection::vec("[a-z/.]{0,12}", 0..24),
            1..6,
        ),
    ) {
        let mut a = Array::with_config(ArrayConfig::default().with_reuse(policy));
        for round in &rounds {
            a.soft_reset();
            for v in round {
                a.insert_value(v);
            }
            prop_assert!(a.is_vlist());
            let got: Vec<&[u8]> = a.iter().filter_map(Data::as_str_bytes).collect();
            let expected: Vec<&[u8]> = round.iter().map(|s| s.as_bytes()).collect();
            prop_assert_eq!(got, expected);
        }

        let stats = a.stats();
        let total: usize = rounds.iter().map(Vec::len).sum();
        let widest = rounds.iter().map(Vec::len).max().unwrap_or(0);
        prop_assert_eq!(stats.evictions, 0);
        if policy == ReusePolicy::Disabled {
            prop_assert_eq!(stats.allocations as usize, total);
        } else {
            // Homogeneous refills allocate only to grow past the widest round.
            prop_assert_eq!(stats.allocations as usize, widest);
            prop_assert_eq!(stats.reuses as usize, total - widest);
        }
    }

    #[test]
    fn prop_copy_is_independent(
        entries in prop::collection::vec((key_strategy(), "[ -~]{0,8}"), 0..40),
    ) {
        let mut src = Array::new();
        for (k, v) in &entries {
            src.replace(Data::string(k.clone(), v.as_bytes()));
        }
        let mut dst = Array::new();
        dst.copy_from(&src);
        prop_assert_eq!(&dst, &src);
        validate_array(&dst);

        let before = src.clone();
        for d in src.iter() {
            dst.get_buf_mut(d.key()).push(b'!');
        }
        prop_assert_eq!(&src, &before);
        if !src.is_empty() {
            prop_assert_ne!(&dst, &src);
        }
    }

    #[test]
    fn prop_merge_requires_same_kind(
        existing in any::<DataKind>(),
        incoming in any::<DataKind>(),
    ) {
        let mut a = Array::new();
        a.replace(Data::new("key", Value::empty(existing)));
        let result = a.try_insert_unique(Data::new("KEY", Value::empty(incoming)));
        prop_assert_eq!(result.is_err(), existing != incoming);
        prop_assert_eq!(a.len(), 1);
        prop_assert_eq!(a.get("key").map(Data::kind), Some(existing));
    }
}

/// Every ordering of `items`, generated with Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut current = items.to_vec();
    let mut counters = vec![0usize; current.len()];
    let mut all = vec![current.clone()];
    let mut i = 1;
    while i < current.len() {
        if counters[i] < i {
            let j = if i % 2 == 0 { 0 } else { counters[i] };
            current.swap(j, i);
            all.push(current.clone());
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    all
}

fn small_key_set() -> Vec<Vec<u8>> {
    vec![
        b"a".to_vec(),
        b"B".to_vec(),
        b"c".to_vec(),
        b"aa".to_vec(),
        b"Ab".to_vec(),
        b"ba".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let expected: Vec<Vec<u8>> = vec![
        b"a".to_vec(),
        b"B".to_vec(),
        b"c".to_vec(),
        b"aa".to_vec(),
        b"Ab".to_vec(),
        b"ba".to_vec(),
    ];

    for perm in permutations(&small_key_set()) {
        let mut a = Array::new();
        for (i, k) in perm.into_iter().enumerate() {
            assert!(a.replace(Data::integer(k, i as i64)).is_none());
        }
        validate_array(&a);
        let got: Vec<Vec<u8>> = a.iter().map(|d| d.key().to_vec()).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn exhaustive_extract_order_small_set() {
    let keys = small_key_set();
    let mut base = Array::new();
    for (i, k) in keys.iter().enumerate() {
        base.replace(Data::integer(k.clone(), i as i64));
    }

    for perm in permutations(&keys) {
        let mut a = base.clone();
        for k in perm {
            let upper = k.to_ascii_uppercase();
            let removed = a.extract(&upper).expect("key present");
            assert_eq!(removed.key(), k.as_slice());
            assert!(a.get(&k).is_none());
            validate_array(&a);
        }
        assert!(a.is_empty());
    }
}

#[test]
fn permutations_are_distinct_and_complete() {
    let perms = permutations(&[1, 2, 3, 4]);
    assert_eq!(perms.len(), 24);
    let distinct: std::collections::BTreeSet<Vec<i32>> = perms.into_iter().collect();
    assert_eq!(distinct.len(), 24);
    assert_eq!(permutations::<u8>(&[]), vec![Vec::<u8>::new()]);
}
