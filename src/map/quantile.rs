//! Generic quantile map: a fixed array of named buckets over a power-of-two
//! exponent range, with placement delegated to a pluggable strategy.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                       QuantileMap<T, S> Layout                     │
//!   │                                                                    │
//!   │   range: BucketRange { lower, upper }                              │
//!   │                                                                    │
//!   │   buckets: Vec<MemberSet>  (len = upper - lower + 2, fixed)        │
//!   │                                                                    │
//!   │   slot 0          slot 1 .. slot n-2            slot n-1           │
//!   │   ┌──────────┐    ┌──────────────────────┐      ┌──────────────┐   │
//!   │   │ <= 2^lo  │    │ [2^(i+lo), 2^(i+lo+1)-1]│   │ >= 2^(up+1)  │   │
//!   │   │ underflow│    │        middle           │   │   overflow   │   │
//!   │   └──────────┘    └──────────────────────┘      └──────────────┘   │
//!   │                                                                    │
//!   │   strategy: S  (key extraction, naming, placement state)           │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//! Add Flow
//! ────────
//!
//!   add_item(item):
//!     1. key  = strategy.canonical_key(item)
//!     2. move = strategy.place(key, range)        (updates per-key state)
//!     3. if move.from != move.to → remove key from buckets[move.from]
//!     4. insert key into buckets[move.to]
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time        | Notes                                      |
//! |-------------|-------------|--------------------------------------------|
//! | `add_item`  | O(1)        | one strategy lookup + set insert/remove    |
//! | `add_items` | O(n)        | sequential, input order preserved          |
//! | `reset`     | O(buckets)  | bucket slots and names survive             |
//! | `snapshot`  | O(k log k)  | sorts each bucket's members                |
//! | `serialize` | O(k log k)  | snapshot + JSON encode, byte-stable        |
//!
//! ## Example Usage
//!
//! ```
//! use quantmap::map::{QuantileMap, RefCountStrategy};
//!
//! let mut map = QuantileMap::new(RefCountStrategy::new());
//!
//! map.add_item("Assets/Textures/wood.png");
//! map.add_item("assets\\textures\\wood.png"); // same key after canonicalization
//!
//! assert_eq!(map.total_items(), 2);
//! assert!(map.buckets()[0].is_empty());       // migrated out of "<= 1"
//! assert_eq!(map.buckets()[1].len(), 1);      // now in "From 2 to 3"
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; all access to one instance must be externally
//! serialized, then a frozen snapshot handed off for export.

use std::marker::PhantomData;

use crate::ds::MemberSet;
use crate::error::{ConfigError, ExportError};
use crate::map::snapshot::{BucketSnapshot, MapSnapshot};
use crate::traits::{BucketRange, BucketStrategy};

/// Bucketing engine generic over the item type `T` and strategy `S`.
///
/// The engine performs every bucket mutation itself, so a key can never sit
/// in two buckets at once: the strategy only reports placements.
#[derive(Debug)]
pub struct QuantileMap<T: ?Sized, S: BucketStrategy<T>> {
    range: BucketRange,
    buckets: Vec<MemberSet>,
    strategy: S,
    _item: PhantomData<fn(&T)>,
}

impl<T: ?Sized, S: BucketStrategy<T>> QuantileMap<T, S> {
    /// Creates an engine over the default `[0, 10]` exponent range.
    pub fn new(strategy: S) -> Self {
        Self::with_range(BucketRange::default(), strategy)
    }

    /// Creates an engine over `[lower, upper]`, validating the bounds.
    pub fn try_with_bounds(lower: u32, upper: u32, strategy: S) -> Result<Self, ConfigError> {
        Ok(Self::with_range(BucketRange::try_new(lower, upper)?, strategy))
    }

    /// Creates an engine over an already-validated range. Bucket names are
    /// assigned here, once, via the strategy's naming hook.
    pub fn with_range(range: BucketRange, strategy: S) -> Self {
        let buckets = (0..range.bucket_count())
            .map(|slot| MemberSet::new(strategy.bucket_name(slot, range)))
            .collect();
        Self {
            range,
            buckets,
            strategy,
            _item: PhantomData,
        }
    }

    /// The exponent range this engine was built over.
    #[inline]
    pub fn range(&self) -> BucketRange {
        self.range
    }

    /// Number of bucket slots, underflow and overflow included.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The bucket array, in slot order.
    #[inline]
    pub fn buckets(&self) -> &[MemberSet] {
        &self.buckets
    }

    /// Read access to the strategy.
    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Observations recorded since construction or the last reset.
    pub fn total_items(&self) -> u64 {
        self.strategy.total_items()
    }

    /// Classifies one item: canonicalizes it, asks the strategy where it
    /// belongs, and migrates its key between buckets when the slot changed.
    ///
    /// # Panics
    ///
    /// Panics if the strategy reports a slot outside the bucket array. That
    /// is a bug in the strategy, not a runtime condition to recover from.
    pub fn add_item(&mut self, item: &T) {
        let key = self.strategy.canonical_key(item);
        let placement = self.strategy.place(&key, self.range);
        let bucket_count = self.buckets.len();
        assert!(
            placement.to < bucket_count,
            "strategy produced bucket slot {} outside 0..{bucket_count}",
            placement.to
        );
        if let Some(from) = placement.from {
            assert!(
                from < bucket_count,
                "strategy reported source slot {from} outside 0..{bucket_count}"
            );
            if from != placement.to {
                self.buckets[from].remove(&key);
            }
        }
        self.buckets[placement.to].insert(key);
    }

    /// Classifies a sequence of items, one [`add_item`](Self::add_item) per
    /// item in input order.
    pub fn add_items<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for item in items {
            self.add_item(item);
        }
    }

    /// Clears every bucket and the strategy's counters. Bucket slots and
    /// names are preserved.
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.strategy.reset();
    }

    /// Materializes every bucket's export view and returns the flat export
    /// document. Read-only apart from that idempotent materialization step.
    pub fn snapshot(&mut self) -> MapSnapshot {
        for bucket in &mut self.buckets {
            bucket.prepare_export();
        }
        MapSnapshot {
            lower_bucket_index: self.range.lower(),
            upper_bucket_index: self.range.upper(),
            total_items: self.strategy.total_items(),
            buckets: self
                .buckets
                .iter()
                .map(|bucket| BucketSnapshot {
                    name: bucket.name().to_owned(),
                    members: bucket.exported().to_vec(),
                })
                .collect(),
        }
    }

    /// Encodes the snapshot as pretty-printed JSON bytes. Two calls without
    /// intervening mutation yield byte-identical output.
    pub fn serialize(&mut self) -> Result<Vec<u8>, ExportError> {
        let snapshot = self.snapshot();
        serde_json::to_vec_pretty(&snapshot).map_err(|err| ExportError::new(err.to_string()))
    }

    /// Encodes the snapshot as a pretty-printed JSON string.
    pub fn to_json(&mut self) -> Result<String, ExportError> {
        let snapshot = self.snapshot();
        serde_json::to_string_pretty(&snapshot).map_err(|err| ExportError::new(err.to_string()))
    }
}
