use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::Error;
use crate::error::Result;

/// Bucket count of a freshly constructed table.
pub const INIT_CAPACITY: usize = 16;

/// Smallest bucket count a table will shrink to.
pub const MIN_CAPACITY: usize = 1;

/// Load factor above which the bucket array doubles.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

/// Load factor below which the bucket array halves.
pub const MIN_LOAD_FACTOR: f64 = 0.25;

/// One chain. Records keep the hash computed at insertion so rehashing never
/// calls back into user `Hash` impls.
type Bucket<V> = Vec<(u64, V)>;

#[inline(always)]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    hash as usize & (capacity - 1)
}

fn empty_buckets<V>(capacity: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Bucket occupancy statistics for debugging and tuning.
///
/// Available under `cfg(test)` or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets holding no element
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Mean chain length over non-empty buckets
    pub average_chain: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} in {} buckets ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Empty Buckets: {}/{} ({:.2}%)",
            self.empty_buckets,
            self.capacity,
            if self.capacity == 0 {
                0.0
            } else {
                (self.empty_buckets as f64 / self.capacity as f64) * 100.0
            }
        );
        println!(
            "Chains: longest {}, average {:.02}",
            self.longest_chain, self.average_chain
        );
    }
}

/// A separate-chaining hash table over a power-of-two bucket array.
///
/// `HashTable<V>` stores values of type `V` without knowing how they are
/// keyed. Every operation takes the value's hash and an equality predicate,
/// which lets [`HashMap`](crate::HashMap) store `(K, V)` pairs while the
/// table itself stays ignorant of keys.
///
/// The element for `hash` always lives in bucket `hash & (capacity - 1)`.
/// Inserting through a vacant [`Entry`] doubles the bucket array while the
/// load factor exceeds [`MAX_LOAD_FACTOR`]; removing halves it while the load
/// factor is below [`MIN_LOAD_FACTOR`] and more than [`MIN_CAPACITY`]
/// buckets remain.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_map::hash_table::Entry;
/// # use chain_map::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.buckets.len())
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`INIT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self {
            buckets: empty_buckets(INIT_CAPACITY),
            populated: 0,
        }
    }

    /// Creates an empty table with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to a power of two, and is never below
    /// [`MIN_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let table: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(MIN_CAPACITY).next_power_of_two()),
            populated: 0,
        }
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.buckets.len() as f64
    }

    /// Returns the bucket an element with `hash` belongs to under the current
    /// capacity.
    pub fn bucket_index(&self, hash: u64) -> usize {
        bucket_for(hash, self.buckets.len())
    }

    /// Returns the number of elements chained in bucket `index`, or `None` if
    /// `index` is not a bucket of this table.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Vec::len)
    }

    /// Removes all elements from the table, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4);
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    /// assert_eq!(table.len(), 2);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .position(|(h, v)| *h == hash && eq(v))
            .map(|slot| (bucket, slot))
    }

    /// Finds the element matching `eq` among those hashed to `hash`.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter()
            .find(|(h, v)| *h == hash && eq(v))
            .map(|(_, v)| v)
    }

    /// Mutable counterpart of [`find`](Self::find).
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let bucket = self.bucket_index(hash);
        self.buckets[bucket]
            .iter_mut()
            .find(|(h, v)| *h == hash && eq(v))
            .map(|(_, v)| v)
    }

    /// Removes and returns the matching element, then shrinks the bucket
    /// array while the load factor is below [`MIN_LOAD_FACTOR`].
    ///
    /// Elements after the removed one keep their relative order within the
    /// bucket.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (bucket, slot) = self.position(hash, eq)?;
        Some(self.remove_at(bucket, slot))
    }

    fn remove_at(&mut self, bucket: usize, slot: usize) -> V {
        let (_, value) = self.buckets[bucket].remove(slot);
        self.populated -= 1;
        log::trace!("removed element from bucket {bucket}, {} remain", self.populated);
        self.maybe_shrink();
        value
    }

    /// Looks up the element matching `eq` for in-place insertion or
    /// modification.
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.position(hash, eq) {
            Some((bucket, slot)) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Returns a cursor at the first element, or [`end`](Self::end) when the
    /// table is empty.
    pub fn begin(&self) -> Cursor<'_, V> {
        self.first_from(0)
    }

    /// Returns the end cursor, positioned at `(capacity, 0)`.
    pub fn end(&self) -> Cursor<'_, V> {
        Cursor {
            table: self,
            bucket: self.buckets.len(),
            slot: 0,
        }
    }

    fn first_from(&self, start: usize) -> Cursor<'_, V> {
        match (start..self.buckets.len()).find(|&b| !self.buckets[b].is_empty()) {
            Some(bucket) => Cursor {
                table: self,
                bucket,
                slot: 0,
            },
            None => self.end(),
        }
    }

    /// Returns an iterator over all elements, bucket by bucket in ascending
    /// index and in insertion order within each bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4);
    /// // Hashes 1 and 5 share bucket 1; hash 2 lands in bucket 2.
    /// table.entry(5, |&n: &u64| n == 5).or_insert(5);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    ///
    /// let values: Vec<u64> = table.iter().copied().collect();
    /// assert_eq!(values, vec![5, 1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cursor: self.begin(),
            remaining: self.populated,
        }
    }

    fn maybe_grow(&mut self, tracked: (usize, usize)) -> (usize, usize) {
        let mut tracked = tracked;
        while self.load_factor() > MAX_LOAD_FACTOR {
            let capacity = self.buckets.len() * 2;
            tracked = self.rehash(capacity, Some(tracked)).unwrap_or(tracked);
        }
        tracked
    }

    fn maybe_shrink(&mut self) {
        while self.load_factor() < MIN_LOAD_FACTOR && self.buckets.len() > MIN_CAPACITY {
            let capacity = self.buckets.len() / 2;
            self.rehash(capacity, None);
        }
    }

    /// Moves every element into a fresh array of `capacity` buckets, visiting
    /// old buckets in ascending order. Returns where the element at `tracked`
    /// ended up.
    fn rehash(
        &mut self,
        capacity: usize,
        tracked: Option<(usize, usize)>,
    ) -> Option<(usize, usize)> {
        log::debug!(
            "rehashing {} elements from {} to {} buckets",
            self.populated,
            self.buckets.len(),
            capacity
        );

        let mut buckets = empty_buckets(capacity);
        let mut relocated = None;
        for (index, bucket) in core::mem::take(&mut self.buckets).into_iter().enumerate() {
            for (slot, (hash, value)) in bucket.into_iter().enumerate() {
                let target = bucket_for(hash, capacity);
                if tracked == Some((index, slot)) {
                    relocated = Some((target, buckets[target].len()));
                }
                buckets[target].push((hash, value));
            }
        }
        self.buckets = buckets;

        relocated
    }

    /// Returns the number of buckets for each chain length: `hist[n]` counts
    /// buckets holding exactly `n` elements.
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns occupancy statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let empty_buckets = self.buckets.iter().filter(|b| b.is_empty()).count();
        let used = self.buckets.len() - empty_buckets;
        DebugStats {
            populated: self.populated,
            capacity: self.buckets.len(),
            empty_buckets,
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.load_factor(),
            average_chain: if used == 0 {
                0.0
            } else {
                self.populated as f64 / used as f64
            },
        }
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_bucket_histogram(&self) {
        let hist = self.bucket_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("bucket histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "bucket histogram ({} entries, {} buckets):",
            self.populated,
            self.buckets.len()
        );
        for (len, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// No element matched the predicate
    Vacant(VacantEntry<'a, V>),
    /// An element matched the predicate
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the stored element.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the stored element.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Appends `value` to its bucket, grows the bucket array while the load
    /// factor exceeds [`MAX_LOAD_FACTOR`], and returns a reference to the
    /// stored value.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let bucket = table.bucket_index(self.hash);
        table.buckets[bucket].push((self.hash, value));
        table.populated += 1;
        log::trace!("inserted element into bucket {bucket}, {} stored", table.populated);

        let slot = table.buckets[bucket].len() - 1;
        let (bucket, slot) = table.maybe_grow((bucket, slot));
        &mut table.buckets[bucket][slot].1
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the element.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket][self.slot].1
    }

    /// Gets a mutable reference to the element.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket][self.slot].1
    }

    /// Converts the entry into a mutable reference bound to the table.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket][self.slot].1
    }

    /// Removes the element, shrinking the bucket array as
    /// [`HashTable::remove`] does.
    pub fn remove(self) -> V {
        self.table.remove_at(self.bucket, self.slot)
    }
}

/// A position inside a [`HashTable`]: a bucket index and an index within
/// that bucket.
///
/// The end position is `(capacity, 0)`. [`advance`](Self::advance) moves to
/// the next element of the current bucket, else to the first element of the
/// next non-empty bucket, else to the end; the end never moves. Two cursors
/// are equal when they refer to the same table and the same position.
pub struct Cursor<'a, V> {
    table: &'a HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<V> Clone for Cursor<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Cursor<'_, V> {}

impl<V> PartialEq for Cursor<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table)
            && self.bucket == other.bucket
            && self.slot == other.slot
    }
}

impl<V> Eq for Cursor<'_, V> {}

impl<V> Debug for Cursor<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("bucket", &self.bucket)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<'a, V> Cursor<'a, V> {
    /// Returns `(bucket index, index within bucket)`.
    pub fn position(&self) -> (usize, usize) {
        (self.bucket, self.slot)
    }

    /// Returns `true` at the end position.
    pub fn is_end(&self) -> bool {
        self.bucket >= self.table.buckets.len()
    }

    /// Returns the element under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::IteratorOutOfRange`] at the end position.
    pub fn get(&self) -> Result<&'a V> {
        self.table
            .buckets
            .get(self.bucket)
            .and_then(|bucket| bucket.get(self.slot))
            .map(|(_, v)| v)
            .ok_or(Error::IteratorOutOfRange)
    }

    /// Returns the cursor that follows this one.
    pub fn successor(&self) -> Self {
        if self.is_end() {
            return *self;
        }
        if self.slot + 1 < self.table.buckets[self.bucket].len() {
            return Cursor {
                slot: self.slot + 1,
                ..*self
            };
        }
        self.table.first_from(self.bucket + 1)
    }

    /// Moves to the next position.
    pub fn advance(&mut self) {
        *self = self.successor();
    }
}

/// An iterator over the elements of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get().ok()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
