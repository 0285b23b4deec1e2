use std::{iter, mem, slice};

use tracing::{debug, trace};

use crate::{
    error::MapError,
    hashing::HashFunction,
    map::{StringMap, load_factor},
    sizing::{next_prime, prime_at_least},
};

/// Load factor at or above which [`OpenAddressingMap::put`] doubles the table before inserting
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// A single position of the slot array
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never used, or reset by `clear`. Terminates every probe sequence.
    Empty,
    /// Previously occupied. Lookups probe past it, insertions may reuse it.
    Tombstone,
    /// Holds a live entry
    Occupied {
        /// The key in the key-value pair
        key: String,
        /// The value associated with the key
        value: V,
    },
}

/// A string-keyed hash table resolving collisions with quadratic probing.
///
/// The capacity is always prime. Before every insertion the table checks its load factor and
/// doubles (to the next prime) when it has reached [`MAX_LOAD_FACTOR`], so a probe sequence
/// always reaches a free slot. Removal leaves a tombstone behind so that later lookups keep
/// walking past the vacated slot.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V> {
    /// The slot array; its length is the capacity
    slots: Vec<Slot<V>>,
    /// Current number of occupied slots
    size: usize,
    /// Maps keys to home slots
    hash_function: HashFunction,
}

/// Yields the slot indices `(home + i²) mod capacity` for `i = 0, 1, 2, …, capacity - 1`
fn probe_sequence(home: usize, capacity: usize) -> impl Iterator<Item = usize> {
    (0..capacity).map(move |step| probe_index(home, step, capacity))
}

/// Slot index visited at `step` of the quadratic sequence starting at `home`
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn probe_index(home: usize, step: usize, capacity: usize) -> usize {
    let offset = (step as u128) * (step as u128);
    // The remainder is below `capacity`, so it fits back into `usize`.
    ((home as u128 + offset) % capacity as u128) as usize
}

impl<V> Extend<(String, V)> for OpenAddressingMap<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V> OpenAddressingMap<V> {
    /// Creates an empty map with the next prime at least `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ZeroCapacity`] when `capacity` is zero, and
    /// [`MapError::CapacityOverflow`] when no prime at least `capacity` fits in a `usize`.
    pub fn new(capacity: usize, hash_function: HashFunction) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }

        let capacity = next_prime(capacity).ok_or(MapError::CapacityOverflow(capacity))?;
        Ok(Self::with_exact_capacity(capacity, hash_function))
    }

    /// Creates an empty map with exactly `capacity` slots
    fn with_exact_capacity(capacity: usize, hash_function: HashFunction) -> Self {
        Self {
            slots: iter::repeat_with(|| Slot::Empty).take(capacity).collect(),
            size: 0,
            hash_function,
        }
    }

    /// Home slot of a key
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn home(&self, key: &str) -> usize {
        // The capacity is never zero and the remainder is below it.
        ((self.hash_function)(key) % self.slots.len() as u64) as usize
    }

    /// Inserts a key-value pair, or updates the value of an existing key.
    ///
    /// Returns the previous value on update. The probe stops at the first empty slot, the
    /// first tombstone, or the slot holding `key`, whichever comes first.
    pub fn put(&mut self, key: String, value: V) -> Option<V> {
        if self.table_load() >= MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }

        let capacity = self.capacity();
        let home = self.home(&key);

        for index in probe_sequence(home, capacity) {
            let Some(slot) = self.slots.get_mut(index) else {
                break;
            };
            match slot {
                Slot::Empty | Slot::Tombstone => {
                    *slot = Slot::Occupied { key, value };
                    self.size = self.size.saturating_add(1);
                    return None;
                }
                Slot::Occupied { key: existing, value: current } if *existing == key => {
                    return Some(mem::replace(current, value));
                }
                Slot::Occupied { .. } => {}
            }
        }

        // The load factor bound keeps this out of reach, but a larger table always has room.
        trace!(capacity, size = self.size, "probe sequence exhausted, growing before retry");
        self.resize_table(capacity.saturating_mul(2));
        self.put(key, value)
    }

    /// Locates the slot holding `key`
    fn find_index(&self, key: &str) -> Option<usize> {
        let home = self.home(key);

        if let Some(Slot::Empty) | None = self.slots.get(home) {
            return None;
        }

        for index in probe_sequence(home, self.capacity()) {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied { key: existing, .. } if existing == key => return Some(index),
                Slot::Tombstone | Slot::Occupied { .. } => {}
            }
        }

        None
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find_index(key)?)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_index(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns true if the map holds a value for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replaces the slot holding `key` with a tombstone and returns the removed value.
    ///
    /// Removing an absent key does nothing.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find_index(key)?;
        let slot = self.slots.get_mut(index)?;

        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.size = self.size.saturating_sub(1);
                Some(value)
            }
            vacant => {
                *slot = vacant;
                None
            }
        }
    }

    /// Rebuilds the table with the next prime at least `new_capacity` slots.
    ///
    /// Targets below 1, below the current number of entries, or with no representable prime at
    /// or above them are ignored. Live entries are re-inserted in slot order into a fresh table,
    /// which grows on its own if it crosses the load factor limit while being filled, so the
    /// final capacity may exceed the request.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 || new_capacity < self.size {
            return;
        }
        let Some(new_capacity) = prime_at_least(new_capacity) else {
            return;
        };

        let old_capacity = self.capacity();
        let slots = mem::take(&mut self.slots);
        *self = Self::rebuilt(slots, new_capacity, self.hash_function);

        debug!(
            engine = "open_addressing",
            from = old_capacity,
            to = self.capacity(),
            size = self.size,
            "resized table"
        );
    }

    /// Builds an independent table of `capacity` slots holding the live entries of `slots`
    fn rebuilt(slots: Vec<Slot<V>>, capacity: usize, hash_function: HashFunction) -> Self {
        let mut table = Self::with_exact_capacity(capacity, hash_function);

        for slot in slots {
            if let Slot::Occupied { key, value } = slot {
                table.put(key, value);
            }
        }

        table
    }

    /// Empties every slot, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
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

    /// Returns the number of slots in the hash table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`
    #[must_use]
    pub fn table_load(&self) -> f64 {
        load_factor(self.size, self.capacity())
    }

    /// Returns the number of slots available for insertion. Tombstones count as available.
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.capacity().saturating_sub(self.size)
    }

    /// Returns an iterator over the key-value pairs in ascending slot order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: self.slots.iter() }
    }

    /// Returns the key-value pairs in ascending slot order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }
}

impl<V> StringMap<V> for OpenAddressingMap<V> {
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

/// Iterator over the key-value pairs of an [`OpenAddressingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Remaining slots
    slots: slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}
