// ChainedHashMap unit test suite (consolidated).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round-trip: a value set under a key is returned by get.
// - Uniqueness: setting an existing key overwrites in place.
// - Deletion: remove reports presence and updates len by exactly one.
// - Growth: crossing capacity * load_factor doubles capacity with no loss.
// - Clear: empties the map, keeps the capacity, and leaves it reusable.
use chain_hashmap::{ChainedHashMap, TableConfig, TableError};
use std::collections::BTreeSet;

fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

// Test: the key1/key2 walkthrough.
// Verifies: get, contains_key, remove, keys/values/iter, len, clear.
#[test]
fn basic_walkthrough() {
    let mut map = ChainedHashMap::new();
    map.insert("key1".to_string(), "value1");
    map.insert("key2".to_string(), "value2");
    assert_eq!(map.get("key1"), Some(&"value1"));
    assert!(map.contains_key("key2"));

    assert_eq!(map.remove("key2"), Some("value2"));
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["key1"]);
    assert_eq!(map.values().collect::<Vec<_>>(), vec![&"value1"]);
    assert_eq!(
        map.iter().collect::<Vec<_>>(),
        vec![(&"key1".to_string(), &"value1")]
    );
    assert_eq!(map.len(), 1);

    map.clear();
    assert_eq!(map.len(), 0);
}

// Test: growth at the default threshold.
// Assumes: 16 buckets, load factor 0.75, so the threshold is 12.
// Verifies: the 13th distinct key doubles capacity to 32, nothing is lost.
#[test]
fn thirteenth_insert_grows_to_32() {
    init_test_logger();
    let mut map = ChainedHashMap::new();
    for i in 0..12 {
        map.insert(format!("key{i}"), i);
        assert_eq!(map.capacity(), 16);
    }
    map.insert("key12".to_string(), 12);
    assert_eq!(map.capacity(), 32);
    assert_eq!(map.len(), 13);
    for i in 0..13 {
        assert_eq!(map.get(&format!("key{i}")), Some(&i));
    }
}

// Test: round-trip and overwrite.
// Verifies: set-then-get returns the value; a second set replaces it and
// returns the old one without changing len.
#[test]
fn round_trip_and_overwrite() {
    let mut map = ChainedHashMap::new();
    assert_eq!(map.insert("k".to_string(), 1), None);
    assert_eq!(map.get("k"), Some(&1));
    let len = map.len();
    assert_eq!(map.insert("k".to_string(), 2), Some(1));
    assert_eq!(map.get("k"), Some(&2));
    assert_eq!(map.len(), len);
}

// Test: deletion of present and absent keys.
// Verifies: len drops by one on success and is unchanged otherwise.
#[test]
fn remove_present_and_absent() {
    let mut map = ChainedHashMap::new();
    map.insert("a".to_string(), 1);
    map.insert("b".to_string(), 2);

    assert_eq!(map.remove("a"), Some(1));
    assert_eq!(map.len(), 1);
    assert!(map.get("a").is_none());
    assert!(!map.contains_key("a"));

    assert_eq!(map.remove("a"), None);
    assert_eq!(map.remove("never"), None);
    assert_eq!(map.len(), 1);
}

// Test: clear followed by reuse.
// Verifies: all views are empty, capacity is kept, and the map behaves like
// a fresh one afterwards.
#[test]
fn clear_then_reuse() {
    let mut map = ChainedHashMap::new();
    for i in 0..40 {
        map.insert(format!("k{i}"), i);
    }
    let capacity = map.capacity();
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.keys().count(), 0);
    assert_eq!(map.values().count(), 0);
    assert_eq!(map.iter().count(), 0);
    assert_eq!(map.capacity(), capacity);

    map.insert("k1".to_string(), 100);
    assert_eq!(map.get("k1"), Some(&100));
    assert_eq!(map.get("k2"), None);
    assert_eq!(map.len(), 1);
}

// Test: many growths in a row.
// Verifies: every key stays retrievable and keys() has no duplicates.
#[test]
fn repeated_growth_keeps_everything() {
    let mut map = ChainedHashMap::with_capacity(1).unwrap();
    for i in 0..2000u32 {
        map.insert(format!("item-{i}"), i);
    }
    assert_eq!(map.len(), 2000);
    assert_eq!(map.capacity(), 4096);
    for i in 0..2000u32 {
        assert_eq!(map.get(&format!("item-{i}")), Some(&i));
    }
    let unique: BTreeSet<&String> = map.keys().collect();
    assert_eq!(unique.len(), map.len());
    assert_eq!(map.bucket_lengths().iter().sum::<usize>(), map.len());
}

// Test: configuration surface.
// Verifies: custom capacity and load factor are honored; invalid ones fail.
#[test]
fn custom_configuration() {
    let config = TableConfig::new()
        .with_initial_capacity(8)
        .with_load_factor(1.0);
    let mut map = ChainedHashMap::with_config(config).unwrap();
    for i in 0..8 {
        map.insert(format!("{i}"), i);
    }
    assert_eq!(map.capacity(), 8);
    map.insert("8".to_string(), 8);
    assert_eq!(map.capacity(), 16);

    let bad = ChainedHashMap::<String, i32>::with_config(TableConfig::new().with_initial_capacity(0));
    assert_eq!(bad.err(), Some(TableError::ZeroCapacity));
}

// Test: keys(), values() and iter() agree with each other.
// Verifies: they project the same traversal.
#[test]
fn views_agree() {
    let map: ChainedHashMap<String, usize> =
        (0..30).map(|i| (format!("v{i}"), i)).collect();
    let pairs: Vec<(&String, &usize)> = map.iter().collect();
    let keys: Vec<&String> = map.keys().collect();
    let values: Vec<&usize> = map.values().collect();
    assert_eq!(pairs.len(), 30);
    assert_eq!(pairs.iter().map(|(k, _)| *k).collect::<Vec<_>>(), keys);
    assert_eq!(pairs.iter().map(|(_, v)| *v).collect::<Vec<_>>(), values);
    for (k, v) in pairs {
        assert_eq!(k, &format!("v{v}"));
    }
}

// Test: a map shared across threads behind a Mutex.
// Verifies: the map is Send when its contents are.
#[test]
fn shared_behind_mutex() {
    use std::sync::{Arc, Mutex};
    use std::thread;

    let map = Arc::new(Mutex::new(ChainedHashMap::<String, usize>::new()));
    let workers: Vec<_> = (0..4)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..25 {
                    map.lock().unwrap().insert(format!("t{t}-{i}"), i);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    let map = map.lock().unwrap();
    assert_eq!(map.len(), 100);
    assert_eq!(map.get("t3-24"), Some(&24));
}
