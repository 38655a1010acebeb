//! A Robin Hood open-addressed hash index mapping 32-bit hashes to compact
//! element indices.
//!
//! [`HashIndex`] is deliberately *not* a hash map. It owns no memory, never
//! compares keys, and never allocates. It maps a caller-supplied 32-bit hash
//! to an *element index*: a position in a side array of records that the
//! caller maintains in insertion-compact layout (live indices are always
//! exactly `0..len()`). The caller drives lookups in a loop, verifying each
//! candidate index against its own records, and mirrors every mutation into
//! its side array. [`HashTable<V>`] implements that protocol for a typed
//! record array; `HashIndex` is public so other containers can do the same.
//!
//! ## Design
//!
//! The table is a power-of-two array of 32-bit entry words. Each occupied
//! word packs three fields:
//!
//! ```text
//! [0 : log2(N)-1]  element index (masked by `mask`)
//! [log2(N) : 27]   high bits of the hash (low bits implied by the bucket)
//! [28 : 31]        clamped probe distance
//! ```
//!
//! A word of zero marks an empty bucket. Probe distances 1 to 14 are stored
//! exactly; 15 means "15 or more" and the true distance is recomputed from a
//! second array, `hashes`, which maps each element index back to the full
//! 32-bit hash it was inserted with. Keeping the probe distance inline makes
//! the Robin Hood comparisons during insertion and removal a shift and a
//! compare in the common case; distances beyond 14 are rare enough that the
//! recomputation is tolerable. Only the low 28 bits of the hash participate
//! in slotting and matching, so the entry comparison is a single xor/mask.
//!
//! Insertion maintains the Robin Hood invariant: scanning forward from any
//! home bucket, probe distances of occupied entries never decrease until the
//! first empty bucket. An inserted entry that out-scans a resident displaces
//! it, and the resident carries on looking for a new slot. Removal has no
//! tombstones; entries after the removed bucket are shifted back one slot
//! (decrementing their probe distance) until an empty bucket or an entry in
//! its home bucket stops the shift. Because the caller's record array must
//! stay compact, removing any element but the last also renames the entry of
//! the last element to the vacated index ([`HashIndex::update_value`]); the
//! caller performs the matching record move.
//!
//! Both arrays live in a single caller-provided allocation whose size the
//! sizer ([`HashIndex::grow`], [`HashIndex::shrink`],
//! [`HashIndex::sizing_for`]) dictates: `N` entry words followed by
//! `capacity` hash words, padded to 16 bytes so the caller may append a
//! record array needing up to 16-byte alignment in the same block. The index
//! only ever borrows this memory. [`HashIndex::rehash`] adopts a new block
//! and returns the old one; [`HashIndex::reset`] returns the block and
//! leaves the index in its pristine zero state.
//!
//! A zeroed `HashIndex` is a valid empty index: zero-initialisation and
//! [`HashIndex::new`] are equivalent, so the index can be embedded in larger
//! zero-initialised aggregates. It becomes usable for insertion only after a
//! first `rehash` establishes a nonzero capacity.
//!
//! [`HashTable<V>`]: crate::hash_table::HashTable

use core::fmt::Debug;
use core::ptr::NonNull;

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "load-eighty")] {
        const DEFAULT_LOAD_FACTOR: f32 = 0.8;
    } else {
        const DEFAULT_LOAD_FACTOR: f32 = 0.75;
    }
}

/// Entry word of an empty bucket.
const EMPTY: u32 = 0;

/// Bits of the hash that participate in slotting and entry matching.
const HASH_MASK: u32 = 0x0fff_ffff;

/// Bit position of the clamped probe distance within an entry word.
const PROBE_SHIFT: u32 = 28;

/// Largest probe distance representable inline; larger distances store this
/// value and are recomputed from the `hashes` array.
const PROBE_LIMIT: u32 = 15;

/// Entry count used by a grow from the pristine state.
const DEFAULT_ENTRY_COUNT: u32 = 16;

const MIN_ENTRY_COUNT: u32 = 4;

// Beyond 2^28 entries the index field would spill into the probe bits.
const MAX_ENTRY_COUNT: u32 = 1 << 28;

/// Alignment guaranteed for the allocation sizes the sizer produces.
pub const ALLOC_ALIGN: usize = 16;

/// An allocation request produced by the sizer.
///
/// `entry_count` is the power-of-two number of entry words, `capacity` the
/// number of elements the index will hold before the next grow, and
/// `alloc_size` the size in bytes of the block the caller must provide to
/// [`HashIndex::rehash`]. `alloc_size` is always a multiple of
/// [`ALLOC_ALIGN`] so a record array requiring up to 16-byte alignment can
/// be appended in the same block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    /// Number of entry words; a power of two, at least 4.
    pub entry_count: u32,
    /// Number of elements the rehashed index can hold.
    pub capacity: u32,
    /// Bytes the caller must allocate for the index block.
    pub alloc_size: usize,
}

/// Histogram of probe distances over the occupied buckets.
#[cfg(feature = "stats")]
pub struct ProbeHistogram {
    size: u32,
    entry_count: u32,
    /// `counts[d - 1]` is the number of occupied buckets at probe distance
    /// `d`; the final slot aggregates every distance of 15 or more.
    pub counts: [u32; PROBE_LIMIT as usize],
}

#[cfg(feature = "stats")]
impl ProbeHistogram {
    /// Pretty-print the histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!(
            "probe histogram: {} entries in {} buckets",
            self.size, self.entry_count
        );
        let max = *self.counts.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("(empty)");
            return;
        }
        for (i, &count) in self.counts.iter().enumerate() {
            let bar = "█".repeat((count as usize * 50).div_ceil(max as usize));
            let label = if i + 1 == PROBE_LIMIT as usize {
                alloc::format!("{:>2}+", i + 1)
            } else {
                alloc::format!("{:>3}", i + 1)
            };
            println!("{} | {} ({})", label, bar, count);
        }
    }
}

/// Utilization statistics for debugging and capacity analysis.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live elements.
    pub size: u32,
    /// Elements the index can hold before the next grow.
    pub capacity: u32,
    /// Entry words allocated.
    pub entry_count: u32,
    /// Configured load factor.
    pub load_factor: f64,
    /// Mean probe distance over live entries.
    pub mean_probe: f64,
    /// Bytes of the current index block.
    pub alloc_bytes: usize,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Index Statistics ===");
        println!(
            "Population: {}/{} ({} buckets, load factor {:.2})",
            self.size, self.capacity, self.entry_count, self.load_factor
        );
        println!("Mean probe distance: {:.3}", self.mean_probe);
        println!("Index block: {} bytes", self.alloc_bytes);
    }
}

/// The Robin Hood hash index. See the [module docs](self) for the design
/// and the caller protocol.
///
/// # Protocol
///
/// A lookup drives [`find`] in a loop. Each returned index is a *candidate*
/// the caller must verify against its own records; re-entering `find` with
/// the same cursor yields the next candidate, and `None` ends the sequence:
///
/// ```text
/// let mut scan = 0;
/// while let Some(index) = index.find(hash, &mut scan) {
///     if records[index].key == key { /* hit */ }
/// }
/// ```
///
/// [`insert`] is called with the cursor of a completed (failed) `find`
/// sequence and appends at element index `len()`; the caller must have
/// written its record at that slot's position by the time it uses the index,
/// and must have ensured `len() < capacity()` beforehand (growing via the
/// sizer and [`rehash`] if not). [`remove`] is called with the cursor one
/// past a verified match; if the removed index was not the last, the caller
/// moves its last record into the hole and calls [`update_value`] so the
/// index renames the moved element. [`reset`] hands the allocation back.
///
/// # Memory
///
/// The index borrows the block passed to [`rehash`] until the next `rehash`
/// or [`reset`] returns it. The caller alone allocates and frees; freeing
/// the block while the index still references it leaves dangling pointers,
/// which is why `rehash` is `unsafe`.
///
/// [`find`]: HashIndex::find
/// [`insert`]: HashIndex::insert
/// [`remove`]: HashIndex::remove
/// [`update_value`]: HashIndex::update_value
/// [`rehash`]: HashIndex::rehash
/// [`reset`]: HashIndex::reset
pub struct HashIndex {
    entries: *mut u32,
    hashes: *mut u32,
    mask: u32,
    capacity: u32,
    size: u32,
    load_factor: f32,
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

// The index holds no interior mutability; shared access only reads, and
// mutation requires `&mut`. Synchronisation of the borrowed block across
// threads is the owning caller's contract.
unsafe impl Send for HashIndex {}
unsafe impl Sync for HashIndex {}

impl Debug for HashIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashIndex")
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("entry_count", &self.entry_count())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

impl HashIndex {
    /// Creates an empty index in the pristine zero state.
    ///
    /// Equivalent to zero-initialising the struct, so an index embedded in a
    /// zeroed aggregate needs no explicit construction. The index holds no
    /// allocation and [`find`](HashIndex::find) misses on every hash until a
    /// [`rehash`](HashIndex::rehash) establishes a capacity.
    pub const fn new() -> Self {
        Self {
            entries: core::ptr::null_mut(),
            hashes: core::ptr::null_mut(),
            mask: 0,
            capacity: 0,
            size: 0,
            load_factor: 0.0,
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> u32 {
        self.size
    }

    /// Returns `true` if the index holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of elements the index can hold before the caller
    /// must grow it.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of entry words in the current table, or 0 in the
    /// pristine state.
    #[inline]
    pub fn entry_count(&self) -> u32 {
        if self.entries.is_null() {
            0
        } else {
            self.mask + 1
        }
    }

    /// Returns the load factor the sizer will use: the configured value, or
    /// the default when none has been set.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        if self.load_factor == 0.0 {
            DEFAULT_LOAD_FACTOR
        } else {
            self.load_factor
        }
    }

    /// Sets the load factor used by subsequent sizer calls.
    ///
    /// Takes effect at the next grow, shrink, or rehash; the current table
    /// keeps its layout. A value already-sized tables cannot satisfy is
    /// handled by the sizer, which re-doubles the entry count until the
    /// capacity covers the live elements.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < load_factor <= 1.0`.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        assert!(
            load_factor > 0.0 && load_factor <= 1.0,
            "load factor must be in (0, 1]"
        );
        self.load_factor = load_factor;
    }

    /// Returns the size in bytes of the currently borrowed block, or 0 in
    /// the pristine state.
    ///
    /// An owner that needs to free the block returned by
    /// [`rehash`](HashIndex::rehash) or [`reset`](HashIndex::reset) can read
    /// this before the call to reconstruct the allocation's layout.
    pub fn alloc_size(&self) -> usize {
        if self.entries.is_null() {
            0
        } else {
            aligned_block_size(self.mask + 1, self.capacity)
        }
    }

    /// Returns the full 32-bit hash stored for `index`.
    ///
    /// Meaningful for live indices, and for the slot at `len()` in the
    /// window right after a [`remove`](HashIndex::remove) shrank the tail
    /// (the tail-swap protocol reads the moved element's hash from here).
    /// Other slots below `capacity` hold unspecified values.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    #[inline]
    pub fn hash_at(&self, index: u32) -> u32 {
        assert!(index < self.capacity);
        // SAFETY: `hashes` spans `capacity` words whenever `capacity > 0`,
        // and the assert keeps `index` inside that span.
        unsafe { *self.hashes.add(index as usize) }
    }

    #[inline(always)]
    fn entry(&self, bucket: u32) -> u32 {
        // SAFETY: `entries` spans `mask + 1` words whenever it is non-null,
        // and masking keeps the offset inside that span. Callers only reach
        // this with a non-null table (capacity checks guard the public
        // paths).
        unsafe { *self.entries.add((bucket & self.mask) as usize) }
    }

    #[inline(always)]
    fn set_entry(&mut self, bucket: u32, word: u32) {
        // SAFETY: As in `entry`: masked offset into a live table.
        unsafe {
            *self.entries.add((bucket & self.mask) as usize) = word;
        }
    }

    /// Resolves the probe distance of an occupied entry at `bucket`,
    /// recomputing from the stored hash when the inline field is saturated.
    #[inline(always)]
    fn resident_probe(&self, bucket: u32, entry: u32) -> u32 {
        let probe = entry >> PROBE_SHIFT;
        if probe == PROBE_LIMIT {
            bucket.wrapping_sub(self.hash_at(entry & self.mask)) & self.mask
        } else {
            probe
        }
    }

    /// Looks up the next candidate element index for `hash`.
    ///
    /// `scan` is the probe cursor; start a lookup with `scan = 0`. The
    /// cursor advances over every visited bucket, so on a candidate it can
    /// be re-passed unchanged to resume with the next candidate, and after
    /// the final `None` it marks the insertion point expected by
    /// [`insert`](HashIndex::insert). Every returned index is only a
    /// *candidate*: the stored partial hash and probe distance match, but
    /// distinct keys can share both, so the caller must verify against its
    /// record before treating it as a hit.
    ///
    /// Returns `None` immediately when the capacity is zero.
    #[inline]
    pub fn find(&self, hash: u32, scan: &mut u32) -> Option<u32> {
        if self.capacity == 0 {
            return None;
        }
        let hash = hash & HASH_MASK;
        let mask = self.mask;
        loop {
            let entry = self.entry(hash.wrapping_add(*scan));
            *scan += 1;
            let probe = (*scan).min(PROBE_LIMIT);
            // Compare the entry's high bits against the expected partial
            // hash and clamped probe distance in one xor.
            if ((entry ^ (hash | probe << PROBE_SHIFT)) & !mask) == 0 {
                return Some(entry & mask);
            }
            if entry >> PROBE_SHIFT < probe {
                // The resident has probed less than us, so our hash cannot
                // occur at or past this bucket. Empty buckets land here too,
                // with a probe field of zero.
                return None;
            }
        }
    }

    /// Scans the candidates for `hash` until one decodes to `index`.
    ///
    /// Used by callers that already know the element index they are after,
    /// typically right before a [`remove`](HashIndex::remove). On success
    /// `scan` is left one past the matching bucket, which is exactly the
    /// cursor `remove` expects.
    pub fn find_value(&self, hash: u32, scan: &mut u32, index: u32) -> bool {
        while let Some(candidate) = self.find(hash, scan) {
            if candidate == index {
                return true;
            }
        }
        false
    }

    /// Inserts `hash`, appending element index `len()`, and returns that
    /// index.
    ///
    /// `scan` must be the cursor of a [`find`](HashIndex::find) sequence for
    /// `hash` that just returned `None`; the new entry is placed at the
    /// bucket where that walk stopped, displacing residents per the Robin
    /// Hood invariant. The caller's record for the new element lives at the
    /// returned index.
    ///
    /// # Safety
    ///
    /// - `len() < capacity()`.
    /// - `scan` comes from a completed `find` walk for this `hash` against
    ///   the current table state (no intervening mutation).
    #[inline]
    pub unsafe fn insert(&mut self, hash: u32, scan: u32) -> u32 {
        debug_assert!(self.size < self.capacity, "insert into a full index");
        debug_assert!(scan >= 1, "insert without a preceding find");
        let full_hash = hash;
        let hash = hash & HASH_MASK;
        let mask = self.mask;
        let new_index = self.size;

        let mut bucket = hash.wrapping_add(scan).wrapping_sub(1);
        let mut probe = scan.min(PROBE_LIMIT);
        // The carried entry without its probe field: partial hash plus the
        // index of the element currently looking for a slot.
        let mut carry = (hash & !mask) | new_index;
        loop {
            let entry = self.entry(bucket);
            if entry == EMPTY {
                self.set_entry(bucket, carry | probe << PROBE_SHIFT);
                break;
            }
            let resident = self.resident_probe(bucket, entry);
            if resident < probe {
                // Robin Hood displacement: the resident has probed less, so
                // the carried entry takes its bucket and the resident
                // continues the walk.
                self.set_entry(bucket, carry | probe << PROBE_SHIFT);
                carry = entry & HASH_MASK;
                probe = resident;
            }
            bucket = bucket.wrapping_add(1);
            probe = (probe + 1).min(PROBE_LIMIT);
        }

        // SAFETY: `new_index < capacity` per the precondition, and `hashes`
        // spans `capacity` words.
        unsafe {
            *self.hashes.add(new_index as usize) = full_hash;
        }
        self.size += 1;
        new_index
    }

    /// Advances an iteration cursor over the live elements, in element-index
    /// order.
    ///
    /// Start with `hash = 0, scan = 0`; each call returns the next element
    /// index and loads `hash` with its stored hash and `scan` with its probe
    /// cursor (so the pair can seed a [`remove`](HashIndex::remove) of the
    /// current element, or resume iteration later). Returns `None` once all
    /// elements have been visited.
    ///
    /// Element-index order matches the caller's record array, and removals
    /// that only shrink the tail do not disturb positions already visited.
    pub fn next(&self, hash: &mut u32, scan: &mut u32) -> Option<u32> {
        if self.size == 0 {
            return None;
        }
        // Live cursors always carry `scan >= 1`, so zero marks a fresh one.
        let index = if *scan == 0 {
            0
        } else {
            let entry = self.entry((*hash & HASH_MASK).wrapping_add(*scan).wrapping_sub(1));
            (entry & self.mask) + 1
        };
        if index >= self.size {
            return None;
        }
        let next_hash = self.hash_at(index);
        let mut next_scan = 0;
        if !self.find_value(next_hash, &mut next_scan, index) {
            return None;
        }
        *hash = next_hash;
        *scan = next_scan;
        Some(index)
    }

    /// Removes the entry a [`find`](HashIndex::find) walk just matched.
    ///
    /// `scan` must be one past the verified candidate's bucket. Entries
    /// after that bucket shift back one slot until an empty bucket or a
    /// home-bucket entry ends the chain, and `len()` drops by one.
    ///
    /// This clears only the *entry*; the caller's record at the removed
    /// index remains. If the removed index is less than the new `len()`,
    /// the caller must move its record at `len()` into the removed slot and
    /// call [`update_value`](HashIndex::update_value) with that record's
    /// hash so the index follows the move.
    ///
    /// # Safety
    ///
    /// `scan` is the cursor of a `find` for `hash` that just returned a
    /// candidate, with no intervening mutation.
    pub unsafe fn remove(&mut self, hash: u32, scan: u32) {
        debug_assert!(scan >= 1, "remove without a preceding find");
        let mut bucket = (hash & HASH_MASK).wrapping_add(scan).wrapping_sub(1);
        debug_assert!(self.entry(bucket) != EMPTY, "remove of an empty bucket");
        self.size -= 1;

        loop {
            let next = bucket.wrapping_add(1);
            let entry = self.entry(next);
            if entry >> PROBE_SHIFT <= 1 {
                // Empty, or already in its home bucket: the shift ends here.
                break;
            }
            if entry >> PROBE_SHIFT < PROBE_LIMIT {
                self.set_entry(bucket, entry - (1 << PROBE_SHIFT));
            } else {
                // Saturated field: recompute from the stored hash. One slot
                // closer to home, the distance may fit inline again.
                let probe = (next.wrapping_sub(self.hash_at(entry & self.mask)) & self.mask)
                    .min(PROBE_LIMIT);
                self.set_entry(bucket, (entry & HASH_MASK) | probe << PROBE_SHIFT);
            }
            bucket = next;
        }
        self.set_entry(bucket, EMPTY);
    }

    /// Renames the entry decoding to `old_index` so it decodes to
    /// `new_index`, and stores `swap_hash` at `hashes[new_index]`.
    ///
    /// The second half of the tail-swap protocol: after a
    /// [`remove`](HashIndex::remove) left a hole at `new_index` and the
    /// caller moved its last record (previously at `old_index == len()`)
    /// into that hole, this follows the move inside the index. The entry's
    /// partial-hash and probe fields are untouched, so the Robin Hood
    /// invariant is preserved.
    ///
    /// # Safety
    ///
    /// An entry decoding to `old_index` exists, and `swap_hash` is the hash
    /// that entry was inserted with.
    pub unsafe fn update_value(&mut self, swap_hash: u32, old_index: u32, new_index: u32) {
        debug_assert!(new_index < self.size);
        // SAFETY: `new_index < size <= capacity`.
        unsafe {
            *self.hashes.add(new_index as usize) = swap_hash;
        }
        let mask = self.mask;
        let mut bucket = swap_hash & mask;
        while self.entry(bucket) & mask != old_index {
            bucket = bucket.wrapping_add(1);
        }
        let entry = self.entry(bucket);
        self.set_entry(bucket, (entry & !mask) | new_index);
    }

    /// Removes all elements, keeping the current allocation and capacity.
    pub fn clear(&mut self) {
        self.size = 0;
        if self.entries.is_null() {
            return;
        }
        // SAFETY: `entries` spans `mask + 1` words when non-null.
        unsafe {
            core::ptr::write_bytes(self.entries, 0, self.mask as usize + 1);
        }
    }

    /// Returns the borrowed allocation and zeroes the index state.
    ///
    /// After a reset the index is indistinguishable from
    /// [`HashIndex::new`]. Returns `None` when the index was pristine. The
    /// caller frees the returned block; [`alloc_size`](HashIndex::alloc_size)
    /// read before the call gives its size.
    pub fn reset(&mut self) -> Option<NonNull<u8>> {
        let block = NonNull::new(self.entries.cast::<u8>());
        self.entries = core::ptr::null_mut();
        self.hashes = core::ptr::null_mut();
        self.mask = 0;
        self.capacity = 0;
        self.size = 0;
        self.load_factor = 0.0;
        block
    }

    /// Moves the index into a new allocation, re-slotting every element,
    /// and returns the old allocation for the caller to free.
    ///
    /// `sizing` must come from this index's sizer ([`grow`](HashIndex::grow),
    /// [`shrink`](HashIndex::shrink), or [`sizing_for`](HashIndex::sizing_for)),
    /// which guarantees the new capacity covers the live elements. Elements
    /// are re-established at their existing indices, so the caller's record
    /// array needs no permutation, only copying into place (which it does
    /// before this call when the record array shares the block).
    ///
    /// Returns `None` when the index was pristine (nothing to free).
    ///
    /// # Safety
    ///
    /// - `block` is valid for reads and writes of `sizing.alloc_size` bytes,
    ///   at least 4-aligned, and stays valid until a later `rehash` or
    ///   [`reset`](HashIndex::reset) returns it.
    /// - `sizing` was produced by this index's sizer with the current
    ///   element count (in particular `sizing.capacity >= len()` and
    ///   `sizing.entry_count` is a power of two of at least 4).
    pub unsafe fn rehash(&mut self, sizing: Sizing, block: NonNull<u8>) -> Option<NonNull<u8>> {
        debug_assert!(sizing.entry_count.is_power_of_two());
        debug_assert!(sizing.entry_count >= MIN_ENTRY_COUNT);
        debug_assert!(sizing.capacity >= self.size);

        let old_entries = self.entries;
        let old_hashes = self.hashes;
        let old_size = self.size;

        self.entries = block.as_ptr().cast::<u32>();
        // SAFETY: The block spans `alloc_size >= (entry_count + capacity) *
        // 4` bytes, so the hash words start in bounds.
        self.hashes = unsafe { self.entries.add(sizing.entry_count as usize) };
        self.mask = sizing.entry_count - 1;
        self.capacity = sizing.capacity;
        self.size = 0;
        // Only the entry words need zeroing; hash words are written as
        // elements arrive.
        // SAFETY: `entry_count` words fit the block per the precondition.
        unsafe {
            core::ptr::write_bytes(self.entries, 0, sizing.entry_count as usize);
        }

        for index in 0..old_size {
            // SAFETY: The old block remains valid per the contract under
            // which it was originally adopted, and `index < old_size`.
            let hash = unsafe { *old_hashes.add(index as usize) };
            let mut scan = 0;
            while self.find(hash, &mut scan).is_some() {}
            // SAFETY: `size < capacity` holds throughout because
            // `sizing.capacity >= old_size`, and the find walk above
            // positioned `scan`.
            unsafe {
                self.insert(hash, scan);
            }
        }
        NonNull::new(old_entries.cast::<u8>())
    }

    /// Computes the sizing for a table holding at least `capacity` elements
    /// under the current load factor.
    ///
    /// The entry count is rounded up to a power of two, no smaller than 4,
    /// and re-doubled as needed so the resulting capacity also covers the
    /// elements currently live (the load factor may have been lowered since
    /// the last rehash).
    pub fn sizing_for(&self, capacity: u32) -> Sizing {
        let load_factor = self.load_factor() as f64;
        let entry_count = ((capacity as f64 / load_factor - 0.5) as u32)
            .next_power_of_two()
            .max(MIN_ENTRY_COUNT);
        self.finish_sizing(entry_count, load_factor, capacity)
    }

    /// Computes the sizing for a geometric grow: double the current entry
    /// count (16 entries from the pristine state), re-doubled as needed so
    /// the capacity reaches at least `min_capacity` and exceeds the current
    /// element count.
    pub fn grow(&self, min_capacity: u32) -> Sizing {
        let load_factor = self.load_factor() as f64;
        let entry_count = if self.entries.is_null() {
            DEFAULT_ENTRY_COUNT
        } else {
            expand_entry_count(self.mask + 1)
        };
        self.finish_sizing(entry_count, load_factor, min_capacity.max(self.size + 1))
    }

    /// Computes the sizing for a shrink to the current element count.
    pub fn shrink(&self) -> Sizing {
        self.sizing_for(self.size)
    }

    fn finish_sizing(&self, mut entry_count: u32, load_factor: f64, min_capacity: u32) -> Sizing {
        let mut capacity = (entry_count as f64 * load_factor) as u32;
        while capacity < self.size.max(min_capacity) {
            entry_count = expand_entry_count(entry_count);
            capacity = (entry_count as f64 * load_factor) as u32;
        }
        Sizing {
            entry_count,
            capacity,
            alloc_size: aligned_block_size(entry_count, capacity),
        }
    }

    /// Computes a probe-distance histogram over the occupied buckets.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut histogram = ProbeHistogram {
            size: self.size,
            entry_count: self.entry_count(),
            counts: [0; PROBE_LIMIT as usize],
        };
        for bucket in 0..self.entry_count() {
            let entry = self.entry(bucket);
            if entry != EMPTY {
                let probe = (entry >> PROBE_SHIFT).min(PROBE_LIMIT);
                histogram.counts[probe as usize - 1] += 1;
            }
        }
        histogram
    }

    /// Returns utilization statistics.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let mut total_probe = 0u64;
        for bucket in 0..self.entry_count() {
            let entry = self.entry(bucket);
            if entry != EMPTY {
                total_probe += u64::from(self.resident_probe(bucket, entry));
            }
        }
        DebugStats {
            size: self.size,
            capacity: self.capacity,
            entry_count: self.entry_count(),
            load_factor: self.load_factor() as f64,
            mean_probe: if self.size == 0 {
                0.0
            } else {
                total_probe as f64 / self.size as f64
            },
            alloc_bytes: self.alloc_size(),
        }
    }
}

fn expand_entry_count(entry_count: u32) -> u32 {
    let doubled = entry_count.checked_mul(2).expect("entry count overflow");
    assert!(doubled <= MAX_ENTRY_COUNT, "entry count overflow");
    doubled
}

fn aligned_block_size(entry_count: u32, capacity: u32) -> usize {
    ((entry_count as usize + capacity as usize) * 4 + (ALLOC_ALIGN - 1)) & !(ALLOC_ALIGN - 1)
}
