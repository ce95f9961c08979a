use alloc::string::String;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::ops::Index;

use alloc::vec::Vec;

use crate::DefaultHashBuilder;
use crate::error::InvalidKey;
use crate::error::Result;
use crate::hash_map::Cursor;
use crate::hash_map::HashMap;
use crate::hash_map::Iter;
use crate::hash_map::Keys;
use crate::hash_map::Values;

/// A map from `String` keys to `String` values.
///
/// Every operation forwards to the wrapped [`HashMap`], with one exception:
/// [`remove`](Dictionary::remove) fails with [`InvalidKey`] when the key is
/// absent instead of returning `false`.
///
/// # Examples
///
/// ```rust
/// use chain_map::Dictionary;
/// use chain_map::Error;
/// use chain_map::InvalidKey;
///
/// let mut dict = Dictionary::new();
/// dict.insert("apple", "red");
/// dict.update([("apple", "green"), ("plum", "purple")]);
///
/// assert_eq!(dict.lookup("apple"), Ok("green"));
/// assert_eq!(dict.len(), 2);
///
/// assert_eq!(dict.remove("plum"), Ok(true));
/// assert_eq!(
///     dict.remove("plum"),
///     Err(Error::InvalidKey(InvalidKey::default()))
/// );
/// ```
#[derive(Clone)]
pub struct Dictionary<S = DefaultHashBuilder> {
    map: HashMap<String, String, S>,
}

impl<S> Debug for Dictionary<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.map.fmt(f)
    }
}

impl<S> PartialEq for Dictionary<S>
where
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<S> Eq for Dictionary<S> where S: BuildHasher {}

impl<S> Default for Dictionary<S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl Dictionary<DefaultHashBuilder> {
    /// Creates an empty dictionary with 16 buckets.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Creates an empty dictionary with at least `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a dictionary from parallel key and value vectors.
    ///
    /// Later duplicates of a key overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`](crate::Error::LengthMismatch) if the vectors
    /// differ in length.
    pub fn from_keys_and_values(keys: Vec<String>, values: Vec<String>) -> Result<Self> {
        HashMap::from_keys_and_values(keys, values).map(Self::from)
    }
}

impl<S> Dictionary<S> {
    /// Creates an empty dictionary with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.map.load_factor()
    }

    /// Removes every entry, keeping the bucket count.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.map.iter()
    }

    /// Iterates over the keys in bucket order.
    pub fn keys(&self) -> Keys<'_, String, String> {
        self.map.keys()
    }

    /// Iterates over the values in bucket order.
    pub fn values(&self) -> Values<'_, String, String> {
        self.map.values()
    }

    /// Cursor at the first entry.
    pub fn begin(&self) -> Cursor<'_, String, String> {
        self.map.begin()
    }

    /// End cursor.
    pub fn end(&self) -> Cursor<'_, String, String> {
        self.map.end()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &HashMap<String, String, S> {
        &self.map
    }

    /// Unwraps the underlying map.
    pub fn into_map(self) -> HashMap<String, String, S> {
        self.map
    }
}

impl<S> Dictionary<S>
where
    S: BuildHasher,
{
    /// Builds a dictionary from parallel key and value vectors using the given
    /// hasher builder.
    pub fn from_keys_and_values_with_hasher(
        keys: Vec<String>,
        values: Vec<String>,
        hash_builder: S,
    ) -> Result<Self> {
        HashMap::from_keys_and_values_with_hasher(keys, values, hash_builder).map(Self::from)
    }

    /// Inserts the pair unless the key is already present. Returns `true` if
    /// it was inserted.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.map.insert(key.into(), value.into())
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the value for the key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Returns the value for an existing key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key is absent.
    pub fn lookup(&self, key: &str) -> Result<&str> {
        self.map.lookup(key).map(String::as_str)
    }

    /// Returns the value for an existing key for modification.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key is absent.
    pub fn lookup_mut(&mut self, key: &str) -> Result<&mut String> {
        self.map.lookup_mut(key)
    }

    /// Returns the value for `key`, inserting an empty string first if absent.
    pub fn get_or_insert_default(&mut self, key: impl Into<String>) -> &mut String {
        self.map.get_or_insert_default(key.into())
    }

    /// Removes the key.
    ///
    /// # Errors
    ///
    /// [`InvalidKey`] with the message `"Invalid Key!"` if the key is absent.
    /// The dictionary is left unchanged in that case.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        if self.map.remove(key) {
            Ok(true)
        } else {
            log::trace!("rejected removal of absent key {key:?}");
            Err(InvalidKey::default().into())
        }
    }

    /// Upserts every pair in order: existing keys get the new value, absent
    /// keys are inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_map::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    /// dict.insert("k", "old");
    /// dict.update([("k", "new"), ("j", "added"), ("j", "last")]);
    ///
    /// assert_eq!(&dict["k"], "new");
    /// assert_eq!(&dict["j"], "last");
    /// ```
    pub fn update<I, A, B>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        for (key, value) in pairs {
            *self.map.get_or_insert_default(key.into()) = value.into();
        }
    }

    /// Returns the index of the bucket holding the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key is absent.
    pub fn bucket_index(&self, key: &str) -> Result<usize> {
        self.map.bucket_index(key)
    }

    /// Returns the number of entries in the bucket holding the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key is absent.
    pub fn bucket_len(&self, key: &str) -> Result<usize> {
        self.map.bucket_len(key)
    }
}

impl<S> From<HashMap<String, String, S>> for Dictionary<S> {
    fn from(map: HashMap<String, String, S>) -> Self {
        Self { map }
    }
}

impl<S> Index<&str> for Dictionary<S>
where
    S: BuildHasher,
{
    type Output = str;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &str) -> &str {
        &self.map[key]
    }
}

impl<A, B, S> Extend<(A, B)> for Dictionary<S>
where
    A: Into<String>,
    B: Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (A, B)>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<A, B, S> FromIterator<(A, B)> for Dictionary<S>
where
    A: Into<String>,
    B: Into<String>,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (A, B)>>(iter: I) -> Self {
        let mut dict = Self::default();
        dict.update(iter);
        dict
    }
}

impl<'a, S> IntoIterator for &'a Dictionary<S> {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
