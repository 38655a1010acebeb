use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::fold_hash;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::OccupiedEntry as TableOccupiedEntry;
use crate::hash_table::VacantEntry as TableVacantEntry;

/// A hash map implemented on the Robin Hood [`HashTable`] storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys. The
/// 64-bit output of the hasher is folded to the 32 bits the underlying
/// index works with.
///
/// Pairs are stored in one contiguous segment in insertion order, so
/// iteration is a slice walk; removing a pair swaps the last pair into its
/// place.
///
/// # Performance Characteristics
///
/// - **Memory**: 8 bytes per entry slot overhead, plus the size of `(K, V)`
///   per record slot.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash map with the specified capacity and hasher
    /// builder.
    ///
    /// The actual capacity may be larger than requested because the
    /// underlying table rounds entry counts up to powers of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_capacity_and_hasher(100, SimpleHasher);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    #[inline]
    fn hash_key(&self, key: &K) -> u32 {
        fold_hash(self.hash_builder.hash_one(key))
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before resizing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all key-value pairs, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the capacity of the map as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Reserves capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Sets the load factor used for subsequent resizes.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < load_factor <= 1.0`.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        self.table.set_load_factor(load_factor);
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated, and the
    /// old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                Some(core::mem::replace(&mut entry.get_mut().1, value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_key(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_key(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_key(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    ///
    /// map.entry(1).or_insert("a");
    /// *map.entry(1).or_insert("b") = "c";
    ///
    /// assert_eq!(map.get(&1), Some(&"c"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns an iterator over the key-value pairs of the map, in
    /// insertion order (as perturbed by past removals).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use rh_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let pairs: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(pairs, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all key-value pairs.
    ///
    /// Dropping the iterator drops the pairs not yet yielded; the map is
    /// left empty either way.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with a default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with the specified capacity and a default
    /// hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A view into a single entry in a map, which may be vacant or occupied.
///
/// Constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// The key is present in the map.
    Occupied(OccupiedEntry<'a, K, V>),
    /// The key is not present in the map.
    Vacant(VacantEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry, inserting `default` if empty, and
    /// returns a mutable reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry, inserting the result of `default`
    /// if empty, and returns a mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential insertion.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            vacant => vacant,
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Ensures a value is in the entry, inserting the default value if
    /// empty, and returns a mutable reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a [`HashMap`].
pub struct VacantEntry<'a, K, V> {
    entry: TableVacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns a reference to the key that would be used when inserting.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value, and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in a [`HashMap`].
pub struct OccupiedEntry<'a, K, V> {
    entry: TableOccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference tied to the map's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the entry's value, returning the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry, returning its value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry, returning the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: core::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: core::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the key-value pairs of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        keys: (u64, u64),
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.keys.0, self.keys.1)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                keys: (
                    rng.try_next_u64().unwrap_or(0x9E37_79B1),
                    rng.try_next_u64().unwrap_or(0x85EB_CA77),
                ),
            }
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<u32, &str, SipHashBuilder> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 0);
        assert_eq!(map.get(&99), None);

        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(99u32, "first");
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<u64, u64, SipHashBuilder> = HashMap::with_capacity(48);
        assert!(map.capacity() >= 48);
        assert!(map.is_empty());

        // Inserting within the preallocation never resizes.
        let mut map =
            HashMap::<u64, u64, _>::with_capacity_and_hasher(64, SipHashBuilder::default());
        let capacity = map.capacity();
        for i in 0..64 {
            map.insert(i, i);
        }
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.len(), 64);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..40u32 {
            assert_eq!(map.insert(i, i as i64 * 3), None);
        }
        assert_eq!(map.len(), 40);
        for i in 0..40u32 {
            assert_eq!(map.get(&i), Some(&(i as i64 * 3)));
        }
        assert_eq!(map.get(&40), None);

        // Re-inserting replaces the value in place; the pair keeps its
        // position in the record array.
        assert_eq!(map.insert(7, -1), Some(21));
        assert_eq!(map.len(), 40);
        let keys: Vec<u32> = map.keys().copied().collect();
        assert_eq!(keys, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_mut() {
        let mut map: HashMap<&str, Vec<u32>, SipHashBuilder> = HashMap::new();
        map.insert("acc", Vec::new());

        for i in 0..4 {
            map.get_mut(&"acc").unwrap().push(i);
        }

        assert_eq!(map.get(&"acc").unwrap().as_slice(), [0, 1, 2, 3]);
        assert!(map.get_mut(&"gone").is_none());
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for word in ["north", "south", "east"] {
            map.insert(word, word.len());
        }
        assert!(map.contains_key(&"south"));
        assert!(!map.contains_key(&"west"));

        map.remove(&"south");
        assert!(!map.contains_key(&"south"));
        assert!(map.contains_key(&"east"));
    }

    #[test]
    fn test_remove() {
        let mut map: HashMap<u32, u32, SipHashBuilder> = HashMap::new();
        for i in 0..6 {
            map.insert(i, i * 10);
        }

        // Removing an interior key swaps the last pair into its slot;
        // pairs before it keep their iteration positions.
        assert_eq!(map.remove(&1), Some(10));
        let keys: Vec<u32> = map.keys().copied().collect();
        assert_eq!(keys, [0, 5, 2, 3, 4]);

        assert_eq!(map.remove(&1), None);

        // Removing the current tail needs no swap at all.
        assert_eq!(map.remove_entry(&4), Some((4, 40)));
        assert_eq!(map.len(), 4);
        for key in [0, 2, 3, 5] {
            assert!(map.contains_key(&key));
        }
    }

    #[test]
    fn test_entry_api() {
        let mut map: HashMap<&str, i32, SipHashBuilder> = HashMap::new();

        *map.entry("counter").or_insert(0) += 1;
        *map.entry("counter").or_insert(0) += 1;
        assert_eq!(map.get(&"counter"), Some(&2));

        map.entry("with_fn").or_insert_with(|| 42);
        assert_eq!(map.get(&"with_fn"), Some(&42));

        map.entry("counter").and_modify(|v| *v *= 10);
        assert_eq!(map.get(&"counter"), Some(&20));

        map.entry("missing").and_modify(|v| *v += 1).or_insert(7);
        assert_eq!(map.get(&"missing"), Some(&7));

        map.entry("defaulted").or_default();
        assert_eq!(map.get(&"defaulted"), Some(&0));

        match map.entry("counter") {
            Entry::Occupied(entry) => {
                assert_eq!(*entry.key(), "counter");
                assert_eq!(entry.remove(), 20);
            }
            Entry::Vacant(_) => panic!("should be occupied"),
        }
        assert!(!map.contains_key(&"counter"));

        match map.entry("ghost") {
            Entry::Vacant(entry) => {
                assert_eq!(*entry.key(), "ghost");
                assert_eq!(entry.into_key(), "ghost");
            }
            Entry::Occupied(_) => panic!("should be vacant"),
        }
    }

    #[test]
    fn test_occupied_entry_insert() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        map.insert(1, 10);
        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.insert(20), 10);
                assert_eq!(entry.get(), &20);
            }
            Entry::Vacant(_) => panic!("should be occupied"),
        }
        assert_eq!(map.get(&1), Some(&20));
    }

    #[test]
    fn test_iteration_order() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        for i in 0..20 {
            map.insert(i, i * 10);
        }

        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, (0..20).collect::<Vec<_>>());

        let values: Vec<i32> = map.values().copied().collect();
        assert_eq!(values, (0..20).map(|i| i * 10).collect::<Vec<_>>());

        for (k, v) in map.iter() {
            assert_eq!(*v, *k * 10);
        }
    }

    #[test]
    fn test_drain() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        for i in 0..10 {
            map.insert(i, i);
        }

        let drained: Vec<(i32, i32)> = map.drain().collect();
        assert_eq!(drained.len(), 10);
        assert!(map.is_empty());

        map.insert(5, 50);
        assert_eq!(map.get(&5), Some(&50));
    }

    #[test]
    fn test_clear_and_shrink() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        for i in 0..100 {
            map.insert(i, i);
        }
        map.clear();
        assert!(map.is_empty());
        assert!(map.capacity() > 0);

        map.shrink_to_fit();
        assert_eq!(map.capacity(), 0);
    }

    #[test]
    fn test_many_inserts_and_removes() {
        let mut map: HashMap<u64, u64, SipHashBuilder> = HashMap::new();
        for i in 0..10000u64 {
            map.insert(i, i * 2);
        }
        assert_eq!(map.len(), 10000);

        for i in (0..10000u64).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * 2));
        }
        assert_eq!(map.len(), 5000);

        for i in 0..10000u64 {
            if i % 2 == 0 {
                assert!(!map.contains_key(&i));
            } else {
                assert_eq!(map.get(&i), Some(&(i * 2)));
            }
        }
    }

    #[test]
    fn test_string_keys() {
        let mut map: HashMap<String, usize, SipHashBuilder> = HashMap::new();
        let words = ["alpha", "beta", "gamma", "delta"];
        for (i, w) in words.iter().enumerate() {
            map.insert(w.to_string(), i);
        }
        for (i, w) in words.iter().enumerate() {
            assert_eq!(map.get(&w.to_string()), Some(&i));
        }
        assert_eq!(map.remove(&"beta".to_string()), Some(1));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_clone() {
        let mut map: HashMap<i32, String, SipHashBuilder> = HashMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());

        let mut copy = map.clone();
        copy.insert(3, "three".to_string());
        assert_eq!(map.len(), 2);
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.get(&1), Some(&"one".to_string()));
    }

    #[test]
    fn test_default_trait() {
        let map: HashMap<i32, i32, SipHashBuilder> = Default::default();
        assert!(map.is_empty());
    }

    #[test]
    fn test_reserve() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = HashMap::new();
        map.reserve(500);
        assert!(map.capacity() >= 500);
        let capacity = map.capacity();
        for i in 0..500 {
            map.insert(i, i);
        }
        // No resize happened while inserting within the reservation.
        assert_eq!(map.capacity(), capacity);
    }
}
