use std::{iter, mem, slice};

use tracing::debug;

use crate::{
    chain::{Chain, Entry},
    error::MapError,
    hashing::{HashFunction, hash_function_1},
    map::{StringMap, load_factor},
    sizing::{next_prime, prime_at_least},
};

/// Bucket count used by [`ChainedMap::new`]
pub const DEFAULT_CAPACITY: usize = 11;

/// A string-keyed hash table resolving collisions with separate chaining.
///
/// Every bucket holds a chain of entries with distinct keys. The table never grows on its own:
/// chains get longer as entries are added until the caller invokes
/// [`resize_table`](Self::resize_table).
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ChainedMap<V> {
    /// One chain per bucket; the length is the capacity
    buckets: Vec<Chain<V>>,
    /// Current number of entries across all chains
    size: usize,
    /// Maps keys to buckets
    hash_function: HashFunction,
}

impl<V> Default for ChainedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Extend<(String, V)> for ChainedMap<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

/// Allocates `capacity` empty chains
fn fresh_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    iter::repeat_with(Chain::default).take(capacity).collect()
}

/// Bucket index of a key in a table of `capacity` buckets
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn bucket_index(hash_function: HashFunction, key: &str, capacity: usize) -> usize {
    // The capacity is never zero and the remainder is below it.
    (hash_function(key) % capacity as u64) as usize
}

impl<V> ChainedMap<V> {
    /// Creates an empty map with [`DEFAULT_CAPACITY`] buckets hashed by
    /// [`hash_function_1`](crate::hash_function_1)
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Already prime.
            buckets: fresh_buckets(DEFAULT_CAPACITY),
            size: 0,
            hash_function: hash_function_1,
        }
    }

    /// Creates an empty map with the next prime at least `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ZeroCapacity`] when `capacity` is zero, and
    /// [`MapError::CapacityOverflow`] when no prime at least `capacity` fits in a `usize`.
    pub fn with_capacity_and_hasher(
        capacity: usize,
        hash_function: HashFunction,
    ) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }

        let capacity = next_prime(capacity).ok_or(MapError::CapacityOverflow(capacity))?;
        Ok(Self { buckets: fresh_buckets(capacity), size: 0, hash_function })
    }

    /// Chain that `key` belongs to
    fn chain(&self, key: &str) -> Option<&Chain<V>> {
        self.buckets.get(bucket_index(self.hash_function, key, self.buckets.len()))
    }

    /// Chain that `key` belongs to, mutably
    fn chain_mut(&mut self, key: &str) -> Option<&mut Chain<V>> {
        let index = bucket_index(self.hash_function, key, self.buckets.len());
        self.buckets.get_mut(index)
    }

    /// Inserts a key-value pair, or updates the value of an existing key.
    ///
    /// Returns the previous value on update. New entries go to the end of their chain.
    pub fn put(&mut self, key: String, value: V) -> Option<V> {
        let chain = self.chain_mut(&key)?;

        if let Some(entry) = chain.find_mut(&key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        chain.insert(key, value);
        self.size = self.size.saturating_add(1);
        None
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.chain(key)?.find(key).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.chain_mut(key)?.find_mut(key).map(|entry| &mut entry.value)
    }

    /// Returns true if the map holds a value for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks the entry for `key` and returns its value.
    ///
    /// Removing an absent key does nothing.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.chain_mut(key)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(value)
    }

    /// Rehashes every entry into the next prime at least `new_capacity` buckets.
    ///
    /// Only a target below 1, or one with no representable prime at or above it, is ignored.
    /// Shrinking below the number of entries is allowed and only makes chains longer. Entries
    /// are moved bucket by bucket, front to back.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }
        let Some(new_capacity) = prime_at_least(new_capacity) else {
            return;
        };

        let old_capacity = self.buckets.len();
        let mut buckets = fresh_buckets(new_capacity);

        for entry in mem::take(&mut self.buckets).into_iter().flatten() {
            let index = bucket_index(self.hash_function, &entry.key, new_capacity);
            if let Some(chain) = buckets.get_mut(index) {
                chain.insert(entry.key, entry.value);
            }
        }

        self.buckets = buckets;

        debug!(
            engine = "chained",
            from = old_capacity,
            to = new_capacity,
            size = self.size,
            "resized table"
        );
    }

    /// Removes every entry, keeping the capacity
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            for _ in mem::take(chain) {
                self.size = self.size.saturating_sub(1);
            }
        }
    }

    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets in the hash table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the total chain length divided by the number of buckets
    #[must_use]
    pub fn table_load(&self) -> f64 {
        let entries = self.buckets.iter().map(Chain::len).sum();
        load_factor(entries, self.capacity())
    }

    /// Returns the number of buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Returns an iterator over the key-value pairs, bucket by bucket and front to back within
    /// each chain
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: None }
    }

    /// Returns the key-value pairs in bucket order, then chain order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }
}

impl<V> StringMap<V> for ChainedMap<V> {
    fn put(&mut self, key: String, value: V) -> Option<V> {
        Self::put(self, key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        Self::remove(self, key)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn resize_table(&mut self, new_capacity: usize) {
        Self::resize_table(self, new_capacity);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn table_load(&self) -> f64 {
        Self::table_load(self)
    }

    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        Self::get_keys_and_values(self)
    }
}

/// Iterator over the key-value pairs of a [`ChainedMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Chain<V>>,
    /// Remaining entries of the current bucket
    chain: Option<slice::Iter<'a, Entry<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                return Some((entry.key.as_str(), &entry.value));
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hashing::hash_function_2, sizing::is_prime};
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_capacity() {
        let map = ChainedMap::<i32>::default();
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.empty_buckets(), 11);
        assert!(map.is_empty());
    }

    #[test]
    fn test_with_capacity_rejects_zero() {
        assert_eq!(
            ChainedMap::<i32>::with_capacity_and_hasher(0, hash_function_1).err(),
            Some(MapError::ZeroCapacity)
        );
    }

    #[test]
    fn test_update_keeps_size() {
        let mut map = ChainedMap::new();
        assert_eq!(map.put("1".to_string(), 10), None);
        assert_eq!(map.put("2".to_string(), 20), None);
        assert_eq!(map.put("1".to_string(), 30), Some(10));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("1"), Some(&30));
        assert_eq!(map.get("2"), Some(&20));
    }

    #[test]
    fn test_colliding_keys_share_a_chain() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(11, hash_function_1)?;
        map.put("ab".to_string(), 1);
        map.put("ba".to_string(), 2);
        map.put("`c".to_string(), 3);

        assert_eq!(map.empty_buckets(), 10);
        assert_eq!(map.get("ba"), Some(&2));
        let keys: Vec<&str> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ab", "ba", "`c"]);

        assert_eq!(map.remove("ba"), Some(2));
        let keys: Vec<&str> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ab", "`c"]);
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(53, hash_function_1)?;
        assert_eq!(map.get("key1"), None);
        map.put("key1".to_string(), 10);
        assert_eq!(map.get("key1"), Some(&10));

        assert_eq!(map.remove("key1"), Some(10));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.remove("key4"), None);
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 53);
        Ok(())
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainedMap::new();
        map.put("key1".to_string(), 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert!(map.get_mut("key2").is_none());
    }

    #[test]
    fn test_never_grows_on_its_own() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(53, hash_function_1)?;
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
        }

        assert_eq!(map.capacity(), 53);
        assert_eq!(map.len(), 150);
        assert!(map.table_load() > 2.0);
        Ok(())
    }

    #[test]
    fn test_load_and_empty_buckets() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(101, hash_function_1)?;
        assert!(map.table_load().abs() < f64::EPSILON);
        assert_eq!(map.empty_buckets(), 101);

        map.put("key1".to_string(), 10);
        map.put("key2".to_string(), 20);
        map.put("key1".to_string(), 30);
        assert!((map.table_load() - 2.0 / 101.0).abs() < 1e-12);
        assert_eq!(map.empty_buckets(), 99);
        Ok(())
    }

    #[test]
    fn test_resize_keeps_entries() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(23, hash_function_1)?;
        map.put("key1".to_string(), 10);

        map.resize_table(30);
        assert_eq!(map.capacity(), 31);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key1"), Some(&10));
        Ok(())
    }

    #[test]
    fn test_resize_may_shrink_below_size() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(11, hash_function_2)?;
        for i in 1..6 {
            map.put(i.to_string(), (i * 10).to_string());
        }

        map.resize_table(1);
        assert_eq!(map.capacity(), 3);
        assert_eq!(map.len(), 5);

        map.put("20".to_string(), "200".to_string());
        map.remove("1");
        map.resize_table(2);
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.len(), 5);

        let mut pairs = map.get_keys_and_values();
        pairs.sort();
        let expected: Vec<(String, String)> =
            [("2", "20"), ("20", "200"), ("3", "30"), ("4", "40"), ("5", "50")]
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect();
        assert_eq!(pairs, expected);
        Ok(())
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut map = ChainedMap::new();
        map.put("key1".to_string(), 1);
        map.resize_table(0);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.get("key1"), Some(&1));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_capacity_without_representable_prime() -> Result<(), MapError> {
        assert_eq!(
            ChainedMap::<i32>::with_capacity_and_hasher(usize::MAX - 10, hash_function_1).err(),
            Some(MapError::CapacityOverflow(usize::MAX - 10))
        );

        let mut map = ChainedMap::with_capacity_and_hasher(7, hash_function_1)?;
        map.put("key1".to_string(), 1);
        map.resize_table(usize::MAX - 10);
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.get("key1"), Some(&1));
        Ok(())
    }

    #[test]
    fn test_clear_single_long_chain() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(3, |_| 0)?;
        map.extend((0..20_000).map(|n| (n.to_string(), n)));
        assert_eq!(map.empty_buckets(), 2);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.empty_buckets(), 3);
        assert_eq!(map.get("0"), None);

        map.put("0".to_string(), 7);
        assert_eq!(map.len(), 1);
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(53, hash_function_1)?;
        map.put("key1".to_string(), 10);
        map.put("key2".to_string(), 20);
        map.resize_table(100);

        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 101);
        assert_eq!(map.empty_buckets(), 101);
        assert_eq!(map.get("key2"), None);
        Ok(())
    }

    #[test]
    fn test_keys_and_values_in_bucket_order() -> Result<(), MapError> {
        let mut map = ChainedMap::with_capacity_and_hasher(5, hash_function_1)?;
        // 'a' = 97 lands in bucket 2, 'b' = 98 in bucket 3, "ab" and "ba" in bucket 0.
        map.put("b".to_string(), 2);
        map.put("a".to_string(), 1);
        map.put("ba".to_string(), 4);
        map.put("ab".to_string(), 3);

        assert_eq!(
            map.get_keys_and_values(),
            vec![
                ("ba".to_string(), 4),
                ("ab".to_string(), 3),
                ("a".to_string(), 1),
                ("b".to_string(), 2),
            ]
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn behaves_like_std_hash_map(
            operations in prop::collection::vec(
                (any::<bool>(), "[a-e]{1,3}", any::<u16>()),
                0..300,
            ),
            capacity in 1_usize..20,
        ) {
            let mut map = ChainedMap::with_capacity_and_hasher(capacity, hash_function_2)?;
            let mut model = HashMap::new();

            for (insert, key, value) in operations {
                if insert {
                    prop_assert_eq!(map.put(key.clone(), value), model.insert(key, value));
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                prop_assert_eq!(map.len(), model.len());
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            prop_assert_eq!(map.iter().count(), model.len());
        }

        #[test]
        fn resize_preserves_membership(
            keys in prop::collection::hash_set("[a-z]{1,8}", 0..80),
            target in 0_usize..200,
        ) {
            let mut map = ChainedMap::with_capacity_and_hasher(79, hash_function_2)?;
            for key in &keys {
                map.put(key.clone(), key.len());
            }

            map.resize_table(target);

            if target == 0 {
                prop_assert_eq!(map.capacity(), 79);
            }
            prop_assert!(is_prime(map.capacity()));
            prop_assert_eq!(map.len(), keys.len());
            for key in &keys {
                prop_assert_eq!(map.get(key), Some(&key.len()));
                let absent = format!("{key}!");
                prop_assert!(!map.contains_key(&absent));
            }
        }
    }
}
