//! ChainedHashMap: separate-chaining table over slot storage with stable handles.

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::hasher::bucket_index;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use log::{debug, error, trace};
use slotmap::{DefaultKey, SlotMap};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, K, V>(&self, map: &'a ChainedHashMap<K, V>) -> Option<&'a K>
    where
        K: Borrow<str>,
    {
        map.handle_key(*self)
    }

    pub fn value<'a, K, V>(&self, map: &'a ChainedHashMap<K, V>) -> Option<&'a V>
    where
        K: Borrow<str>,
    {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, K, V>(&self, map: &'a mut ChainedHashMap<K, V>) -> Option<&'a mut V>
    where
        K: Borrow<str>,
    {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

// Slot keys of the entries that hashed to one bucket, in insertion order.
type Chain = Vec<DefaultKey>;

pub struct ChainedHashMap<K, V> {
    buckets: Vec<Option<Chain>>, // created lazily on first insert at an index
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    load_factor: f64,
}

#[inline]
fn key_str<K: Borrow<str>>(key: &K) -> &str {
    key.borrow()
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    /// Creates a map with 16 buckets and a load factor of 0.75.
    pub fn new() -> Self {
        Self::from_valid_config(TableConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::new().with_initial_capacity(capacity))
    }

    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f64) -> Result<Self> {
        Self::with_config(
            TableConfig::new()
                .with_initial_capacity(capacity)
                .with_load_factor(load_factor),
        )
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TableConfig) -> Self {
        Self {
            buckets: vec![None; config.initial_capacity],
            slots: SlotMap::with_key(),
            load_factor: config.load_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Entry count above which the next insertion of a new key grows the table.
    pub fn threshold(&self) -> f64 {
        self.capacity() as f64 * self.load_factor
    }

    fn locate(&self, key: &str) -> Result<usize> {
        let capacity = self.buckets.len();
        let index = bucket_index(key, capacity);
        if index >= capacity {
            error!(
                "bucket index {} out of range for capacity {} (key {:?})",
                index, capacity, key
            );
            return Err(TableError::IndexOutOfRange { index, capacity });
        }
        Ok(index)
    }

    // Position within the chain and slot key of `key`, if present.
    fn find_in_chain(&self, index: usize, key: &str) -> Option<(usize, DefaultKey)> {
        let chain = self.buckets.get(index)?.as_ref()?;
        chain
            .iter()
            .position(|&k| {
                self.slots
                    .get(k)
                    .map(|e| key_str(&e.key) == key)
                    .unwrap_or(false)
            })
            .map(|pos| (pos, chain[pos]))
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        let index = self.locate(key).ok()?;
        self.find_in_chain(index, key)
            .map(|(_, k)| Handle::new(k))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value stored under `key`. `None` always means the key is
    /// absent, whatever `V` is.
    pub fn get(&self, key: &str) -> Option<&V> {
        let h = self.find(key)?;
        self.handle_value(h)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let h = self.find(key)?;
        self.handle_value_mut(h)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&K, &V)> {
        let h = self.find(key)?;
        self.slots.get(h.raw_handle()).map(|e| (&e.key, &e.value))
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// An existing key keeps its entry (and handle) and only the value is
    /// swapped. A new key is appended to its bucket's chain; if that pushes
    /// the entry count past [`threshold`](Self::threshold) the table doubles.
    ///
    /// Fails with [`TableError::IndexOutOfRange`] before touching any state
    /// if the computed bucket index is invalid.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let index = self.locate(key_str(&key))?;

        if let Some((_, k)) = self.find_in_chain(index, key_str(&key)) {
            if let Some(e) = self.slots.get_mut(k) {
                return Ok(Some(core::mem::replace(&mut e.value, value)));
            }
        }

        let k = self.slots.insert(Entry { key, value });
        self.buckets[index]
            .get_or_insert_with(|| {
                trace!("creating chain for bucket {}", index);
                Vec::new()
            })
            .push(k);

        if self.len() as f64 > self.threshold() {
            self.grow();
        }
        Ok(None)
    }

    /// Like [`try_insert`](Self::try_insert), but panics on
    /// [`TableError::IndexOutOfRange`], which a correct hash never produces.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(e) => panic!("{}", e),
        }
    }

    // Doubles the bucket count and redistributes every chain. The hash
    // depends on the capacity, so each key is hashed again; entries stay put
    // in `slots` and only their slot keys move.
    fn grow(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity * 2;
        let mut buckets: Vec<Option<Chain>> = vec![None; new_capacity];

        for chain in self.buckets.iter().flatten() {
            for &k in chain {
                // chains only reference live slots
                let index = bucket_index(key_str(&self.slots[k].key), new_capacity);
                buckets[index].get_or_insert_with(Vec::new).push(k);
            }
        }

        self.buckets = buckets;
        debug!(
            "grew table from {} to {} buckets ({} entries, load factor {})",
            old_capacity,
            new_capacity,
            self.len(),
            self.load_factor
        );
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the owned key and value. Entries after it in
    /// the same chain keep their relative order.
    pub fn remove_entry(&mut self, key: &str) -> Option<(K, V)> {
        let index = self.locate(key).ok()?;
        let (pos, k) = self.find_in_chain(index, key)?;
        if let Some(chain) = self.buckets[index].as_mut() {
            chain.remove(pos);
        }
        let entry = self.slots.remove(k)?;
        Some((entry.key, entry.value))
    }

    pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let k = handle.raw_handle();

        // Remove slot
        let entry = self.slots.remove(k)?;

        // Unlink from its chain
        let index = bucket_index(key_str(&entry.key), self.buckets.len());
        if let Some(chain) = self.buckets[index].as_mut() {
            if let Some(pos) = chain.iter().position(|&kk| kk == k) {
                chain.remove(pos);
            }
        }

        Some((entry.key, entry.value))
    }

    /// Drops every entry and chain. The bucket count is kept, and every
    /// outstanding handle becomes stale.
    pub fn clear(&mut self) {
        trace!(
            "clearing {} entries, keeping {} buckets",
            self.len(),
            self.buckets.len()
        );
        self.buckets.fill(None);
        self.slots.clear();
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        self.slots.get(h.raw_handle()).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.raw_handle()).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.slots.get_mut(h.raw_handle()).map(|e| &mut e.value)
    }

    /// Chain length of every bucket, by index. Buckets that never received
    /// an entry report 0.
    pub fn bucket_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|b| b.as_ref().map_or(0, Vec::len))
            .collect()
    }

    /// Entries by ascending bucket index, then chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            slots: &self.slots,
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Mutable entries in storage order, which is unrelated to bucket order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.buckets.len();
        assert!(capacity > 0);
        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for (index, chain) in self.buckets.iter().enumerate() {
            for &k in chain.iter().flatten() {
                let key = key_str(&self.slots[k].key);
                assert_eq!(bucket_index(key, capacity), index, "entry {key:?} in wrong bucket");
                assert!(seen.insert(key.to_string()), "duplicate key {key:?}");
                total += 1;
            }
        }
        assert_eq!(total, self.len());
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ChainedHashMap<K, V>
where
    K: Borrow<str> + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut ChainedHashMap<K, V>
where
    K: Borrow<str>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Iterator over entries in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<Chain>>,
    chain: core::slice::Iter<'a, DefaultKey>,
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&k) = self.chain.next() {
                let slots = self.slots;
                let e = &slots[k];
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            match self.buckets.next()? {
                Some(chain) => self.chain = chain.iter(),
                None => continue,
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Iterator over mutable entries in storage order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
