//! The associative-container contract shared by both collision-resolution engines.

/// Insert-or-update, lookup, delete, enumerate and resize over string keys.
///
/// Implemented by [`OpenAddressingMap`](crate::OpenAddressingMap) and
/// [`ChainedMap`](crate::ChainedMap) so that callers can drive either engine generically.
pub trait StringMap<V> {
    /// Inserts `value` under `key`, returning the previous value if the key was present
    fn put(&mut self, key: String, value: V) -> Option<V>;

    /// Returns the value stored under `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Removes `key`, returning its value. Absent keys are a no-op.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Removes every entry while keeping the capacity
    fn clear(&mut self);

    /// Rebuilds the table with (the next prime at least) `new_capacity` buckets.
    ///
    /// Invalid targets are silently ignored; compare [`capacity`](Self::capacity) before and
    /// after to find out whether the table changed.
    fn resize_table(&mut self, new_capacity: usize);

    /// Number of live entries
    fn len(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Number of buckets available for new entries
    fn empty_buckets(&self) -> usize;

    /// Returns the current load factor
    fn table_load(&self) -> f64;

    /// Returns every key-value pair in table order
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;

    /// Returns true if `key` has a value in the map
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if the map holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes `numerator / denominator` as a load factor.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn load_factor(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainedMap, MapError, OpenAddressingMap, hash_function_1, hash_function_2};

    /// Drives one map through put, update, remove and clear
    fn exercise<M: StringMap<i32>>(map: &mut M) {
        assert!(map.is_empty());
        assert!(!map.contains_key("key1"));

        assert_eq!(map.put("key1".to_string(), 10), None);
        assert_eq!(map.put("key2".to_string(), 20), None);
        assert_eq!(map.put("key1".to_string(), 30), Some(10));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("key1"), Some(&30));
        assert!(map.contains_key("key2"));

        assert_eq!(map.remove("key2"), Some(20));
        assert_eq!(map.remove("key2"), None);
        assert!(!map.contains_key("key2"));

        let capacity = map.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.empty_buckets(), capacity);
    }

    #[test]
    fn test_both_engines_honour_contract() -> Result<(), MapError> {
        exercise(&mut OpenAddressingMap::new(11, hash_function_1)?);
        exercise(&mut OpenAddressingMap::new(11, hash_function_2)?);
        exercise(&mut ChainedMap::new());
        exercise(&mut ChainedMap::with_capacity_and_hasher(3, hash_function_2)?);
        Ok(())
    }

    #[test]
    fn test_load_factor() {
        assert!((load_factor(1, 4) - 0.25).abs() < f64::EPSILON);
        assert!(load_factor(0, 7).abs() < f64::EPSILON);
    }
}
