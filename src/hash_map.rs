use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::vec::Vec;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::error::Result;
#[cfg(any(test, feature = "stats"))]
use crate::hash_table::DebugStats;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

fn equivalent_key<Q, K, V>(key: &Q) -> impl Fn(&(K, V)) -> bool + '_
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    move |entry: &(K, V)| Borrow::<Q>::borrow(&entry.0) == key
}

/// A hash map implemented using the chaining [`HashTable`] as the underlying
/// storage.
///
/// `HashMap<K, V, S>` stores unique keys that implement `Hash + Eq` and uses
/// a configurable hasher builder `S` to hash them. A new map starts with 16
/// buckets. The bucket count doubles whenever an insertion pushes the load
/// factor above 0.75 and halves whenever a removal drops it below 0.25, so it
/// is always a power of two.
///
/// Presence-only operations report through `bool` ([`insert`], [`remove`]);
/// operations that need an existing key fail with [`Error::KeyNotFound`].
///
/// [`insert`]: HashMap::insert
/// [`remove`]: HashMap::remove
///
/// # Examples
///
/// ```rust
/// use chain_map::HashMap;
///
/// let mut map: HashMap<i32, String> = HashMap::new();
/// assert_eq!(map.capacity(), 16);
///
/// for i in 0..16 {
///     map.insert(i, "a".to_string());
/// }
/// assert_eq!(map.capacity(), 32);
/// assert_eq!(map.load_factor(), 0.5);
///
/// for i in 0..9 {
///     map.remove(&i);
/// }
/// assert_eq!(map.len(), 7);
/// assert_eq!(map.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.table.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty map with 16 buckets and the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map with at least `capacity` buckets, rounded up to a
    /// power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> HashMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Builds a map from parallel key and value vectors.
    ///
    /// Pairs are inserted in order. A key that appears more than once keeps
    /// the value of its last occurrence.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if the vectors differ in length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::Error;
    /// use chain_map::HashMap;
    ///
    /// let map = HashMap::from_keys_and_values(vec![1, 2, 1], vec!["a", "b", "c"]).unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.lookup(&1), Ok(&"c"));
    ///
    /// let err = HashMap::from_keys_and_values(vec!["a", "b"], vec!["x"]).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 2, values: 1 });
    /// ```
    pub fn from_keys_and_values(keys: Vec<K>, values: Vec<V>) -> Result<Self> {
        Self::from_keys_and_values_with_hasher(keys, values, DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with 16 buckets and the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of key-value pairs in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Removes all pairs from the map, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// for i in 0..20 {
    ///     map.insert(i, "x");
    /// }
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the pairs of the map.
    ///
    /// Pairs are visited bucket by bucket in ascending bucket index, and in
    /// insertion order within a bucket. The order is not stable across
    /// resizes.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns a cursor at the first pair, or [`end`](Self::end) if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::Error;
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.insert("one", 1);
    ///
    /// let mut cursor = map.begin();
    /// assert_eq!(cursor.get(), Ok((&"one", &1)));
    /// cursor.advance();
    /// assert_eq!(cursor, map.end());
    /// assert_eq!(cursor.get(), Err(Error::IteratorOutOfRange));
    /// ```
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.begin(),
        }
    }

    /// Returns the end cursor, positioned at `(capacity, 0)`.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.end(),
        }
    }

    /// Returns bucket occupancy statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        self.table.debug_stats()
    }

    /// Returns the chain-length histogram of the underlying table.
    ///
    /// See [`HashTable::bucket_histogram`].
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_histogram(&self) -> Vec<usize> {
        self.table.bucket_histogram()
    }

    /// Prints the chain-length histogram to stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_bucket_histogram(&self) {
        self.table.print_bucket_histogram();
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Builds a map from parallel key and value vectors using the given
    /// hasher builder.
    ///
    /// See [`HashMap::from_keys_and_values`].
    pub fn from_keys_and_values_with_hasher(
        keys: Vec<K>,
        values: Vec<V>,
        hash_builder: S,
    ) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut map = Self::with_hasher(hash_builder);
        map.extend(keys.into_iter().zip(values));
        Ok(map)
    }

    /// Inserts a key-value pair if the key is not already present.
    ///
    /// Returns `true` if the pair was inserted. An existing key keeps its
    /// current value and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                true
            }
        }
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value for the key, if present.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, equivalent_key(key)).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for the key, if present.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns a reference to the value for an existing key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for an existing key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn lookup_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Removes a key from the map, returning `true` if it was present.
    ///
    /// Pairs sharing the key's bucket keep their relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, equivalent_key(key))
    }

    /// Returns the index of the bucket holding the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_index<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find(hash, equivalent_key(key)) {
            Some(_) => Ok(self.table.bucket_index(hash)),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Returns the number of pairs in the bucket holding the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_len<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.bucket_index(key)?;
        self.table.bucket_len(index).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the key's value, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<i32, String> = HashMap::new();
    /// assert_eq!(map.get_or_insert_default(100), "");
    ///
    /// *map.get_or_insert_default(100) = "set".to_string();
    /// assert_eq!(map[&100], "set");
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::HashMap;
    ///
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *map.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(map.get("a"), Some(&2));
    /// assert_eq!(map.get("b"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value for the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present, like [`HashMap::lookup`] fails.
    fn index(&self, key: &Q) -> &V {
        match self.lookup(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair, overwriting the value of keys already present.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            match self.entry(key) {
                Entry::Occupied(mut entry) => {
                    entry.insert(value);
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
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
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
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
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map, growing it if needed, and returns a
    /// mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map, shrinking it if needed, and returns
    /// the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A position inside a [`HashMap`].
///
/// Created by [`HashMap::begin`] and [`HashMap::end`]. See
/// [`hash_table::Cursor`](crate::hash_table::Cursor) for the traversal rules.
pub struct Cursor<'a, K, V> {
    inner: crate::hash_table::Cursor<'a, (K, V)>,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns `(bucket index, index within bucket)`.
    pub fn position(&self) -> (usize, usize) {
        self.inner.position()
    }

    /// Returns `true` at the end position.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the pair under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::IteratorOutOfRange`] at the end position.
    pub fn get(&self) -> Result<(&'a K, &'a V)> {
        self.inner.get().map(|(k, v)| (k, v))
    }

    /// Returns the cursor that follows this one.
    pub fn successor(&self) -> Self {
        Cursor {
            inner: self.inner.successor(),
        }
    }

    /// Moves to the next position.
    pub fn advance(&mut self) {
        self.inner.advance();
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
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

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}
