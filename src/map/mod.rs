//! Shared map
//!
//! A typed facade over a sharded concurrent hash map. Any number of threads
//! may insert concurrently without caller-side locking; readers interleaved
//! with writers never observe a partially-constructed entry, and resizing
//! never loses entries written concurrently with it (all inherited from the
//! underlying [`dashmap::DashMap`]).
//!
//! Duplicate keys are not an error: a later insert silently overwrites the
//! earlier value (last-write-wins), matching plain `HashMap` semantics.

use core::fmt;
use core::hash::Hash;
use dashmap::DashMap;


/// A concurrency-safe key-value container
///
/// # Type Parameters
///
/// * `K` - The key type, must implement `Hash + Eq`
/// * `V` - The value type
///
/// # Examples
///
/// ```rust
/// use gatemap::SharedMap;
///
/// let map: SharedMap<i32, u64> = SharedMap::new();
/// map.insert(7, 100);
/// assert_eq!(map.get(&7), Some(100));
/// ```
pub struct SharedMap<K, V> {
    inner: DashMap<K, V>,
}

impl<K, V> SharedMap<K, V>
where
    K: Eq + Hash,
{
    /// Create a new, empty map
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Create a new map sized for at least `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: DashMap::with_capacity(capacity),
        }
    }

    /// Insert a key-value pair, overwriting any existing value for the key
    ///
    /// Safe to call from any number of threads simultaneously. On a duplicate
    /// key the previous value is displaced and returned (last-write-wins);
    /// callers that only fan out writes are free to ignore it.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    /// Look up the value for `key`, returning a clone
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Whether the map contains `key`
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of entries in the map
    ///
    /// With concurrent writers in flight the result is a snapshot, not a
    /// stable value; it is exact once all writers have been joined.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Run `f` over every entry
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for entry in self.inner.iter() {
            f(entry.key(), entry.value());
        }
    }
}

impl<K, V> Default for SharedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SharedMap<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
