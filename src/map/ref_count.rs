//! # Reference-Count Quantile Map
//!
//! Classifies path-like keys into power-of-two usage-count buckets and keeps
//! each key's bucket membership correct as its reference count grows. This
//! is the specialization behind asset-usage reports: feed it every reference
//! a scan encounters, export one flat document describing which assets are
//! used how many times.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────────┐
//!   │                           RefCountMap Layout                          │
//!   │                                                                       │
//!   │   ┌─────────────────────────────┐                                     │
//!   │   │ usage_by_key:               │   counts are monotonically          │
//!   │   │   FxHashMap<String, u64>    │   non-decreasing until reset        │
//!   │   │                             │                                     │
//!   │   │  "assets/hero.fbx"    → 20  │                                     │
//!   │   │  "assets/wood.png"    →  2  │                                     │
//!   │   │  "assets/brick.mat"   →  1  │                                     │
//!   │   └─────────────────────────────┘                                     │
//!   │                                                                       │
//!   │   buckets (range lower=0, upper=3):                                   │
//!   │                                                                       │
//!   │   slot 0      slot 1        slot 2        slot 3         slot 4       │
//!   │   "<= 1"      "From 2 to 3" "From 4 to 7" "From 8 to 15" ">= 16"      │
//!   │   {brick.mat} {wood.png}    {}            {}             {hero.fbx}   │
//!   │                                                                       │
//!   │   slot(count) = clamp(floor(log2(count)), lower, upper+1) - lower     │
//!   └───────────────────────────────────────────────────────────────────────┘
//!
//! Migration Flow
//! ──────────────
//!
//!   add_item("assets/wood.png") with current count 3:
//!     1. old = slot(3) = 1        (decided from the pre-increment count)
//!     2. new = slot(4) = 2
//!     3. old != new → remove from "From 2 to 3", insert into "From 4 to 7"
//!     4. count becomes 4, total items counter bumps
//! ```
//!
//! ## Operations
//!
//! | Operation    | Time     | Notes                                        |
//! |--------------|----------|----------------------------------------------|
//! | `add_item`   | O(1)     | count bump + at most one bucket migration    |
//! | `add_items`  | O(n)     | sequential, per-key occurrence order kept    |
//! | `usage`      | O(1)     | errors on unregistered keys                  |
//! | `reset`      | O(keys)  | buckets and names survive for reuse          |
//! | `serialize`  | O(k log k) | sorted members, byte-stable repeats        |
//!
//! ## Example Usage
//!
//! ```
//! use quantmap::map::RefCountMap;
//!
//! let mut report = RefCountMap::new();
//!
//! report.add_items(["Assets/Hero.fbx", "Assets/Wood.png", "assets\\hero.fbx"]);
//!
//! assert_eq!(report.usage("Assets/Hero.fbx").unwrap(), 2);
//! assert_eq!(report.usage("Assets/Wood.png").unwrap(), 1);
//! assert!(report.usage("assets/missing.png").is_err());
//! assert_eq!(report.total_items(), 3);
//! ```
//!
//! ## Implementation Notes
//!
//! - Placement for an already-tracked key is decided from the count *before*
//!   the current observation is tallied; a newly-seen key lands in the lowest
//!   bucket and its stored count becomes 1 on the way out. Bucket contents
//!   therefore trail the raw count by exactly the observation being added,
//!   which is the reference behavior for these reports.
//! - Counts below 2^lower clamp into the underflow bucket and counts at or
//!   above 2^(upper+1) clamp into the overflow bucket, so every count maps
//!   to exactly one slot.
//! - Keys are canonicalized (forward slashes, lower-case) before lookup, so
//!   spellings differing by case or separator style are one entry.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::ds::MemberSet;
use crate::error::{ConfigError, ExportError, InvariantError, UsageError};
use crate::key::canonical_path_key;
use crate::map::quantile::QuantileMap;
use crate::map::snapshot::MapSnapshot;
use crate::traits::{BucketRange, BucketStrategy, Placement};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::RefCountMapMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::RefCountMapMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MapMetricsReadRecorder, MapMetricsRecorder, MetricsSnapshotProvider};

/// Reference-count bucketing strategy: a persistent `key -> count` table
/// plus the floor-log2 slot derivation with clamped edge buckets.
#[derive(Debug, Default)]
pub struct RefCountStrategy {
    usage_by_key: FxHashMap<String, u64>,
    total_items: u64,
}

impl RefCountStrategy {
    /// Creates an empty strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for a canonical key, if tracked.
    pub fn usage(&self, key: &str) -> Option<u64> {
        self.usage_by_key.get(key).copied()
    }

    /// Iterates over tracked canonical keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.usage_by_key.keys().map(String::as_str)
    }

    /// Iterates over `(canonical key, count)` pairs in unspecified order.
    pub fn usages(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.usage_by_key.iter().map(|(key, &count)| (key.as_str(), count))
    }

    /// Number of distinct tracked keys.
    pub fn distinct_keys(&self) -> usize {
        self.usage_by_key.len()
    }

    /// Array slot for a cumulative count under `range`.
    ///
    /// `floor(log2(count))` clamped into `[lower, upper + 1]`, rebased to an
    /// array index. Count 0 has no logarithm and is special-cased into the
    /// lowest slot.
    pub fn slot_for_count(range: BucketRange, count: u64) -> usize {
        let raw = if count == 0 { 0 } else { count.ilog2() };
        let clamped = raw.clamp(range.lower(), range.upper() + 1);
        (clamped - range.lower()) as usize
    }
}

impl BucketStrategy<str> for RefCountStrategy {
    fn canonical_key(&self, item: &str) -> String {
        canonical_path_key(item)
    }

    fn bucket_name(&self, slot: usize, range: BucketRange) -> String {
        if slot == 0 {
            return format!("<= {}", 1u64 << range.lower());
        }
        if slot == range.bucket_count() - 1 {
            return format!(">= {}", 1u64 << (range.upper() + 1));
        }
        let low = 1u64 << (slot as u32 + range.lower());
        let high = (1u64 << (slot as u32 + range.lower() + 1)) - 1;
        format!("From {low} to {high}")
    }

    fn place(&mut self, key: &str, range: BucketRange) -> Placement {
        self.total_items += 1;
        match self.usage_by_key.entry(key.to_owned()) {
            Entry::Vacant(vacant) => {
                // An unseen key is seeded into the lowest bucket before its
                // first increment; its stored count leaves here as 1.
                vacant.insert(1);
                Placement {
                    from: None,
                    to: Self::slot_for_count(range, 0),
                }
            }
            Entry::Occupied(mut occupied) => {
                // Movement is decided from the pre-increment count.
                let count = *occupied.get();
                *occupied.get_mut() = count + 1;
                Placement {
                    from: Some(Self::slot_for_count(range, count)),
                    to: Self::slot_for_count(range, count + 1),
                }
            }
        }
    }

    fn total_items(&self) -> u64 {
        self.total_items
    }

    fn reset(&mut self) {
        self.usage_by_key.clear();
        self.total_items = 0;
    }
}

/// Ready-made reference-count map over raw path-like strings.
///
/// Wraps the generic engine with [`RefCountStrategy`] and exposes the
/// report-facing accessors. One instance serves one reporting pass: add
/// items while scanning, then serialize a frozen snapshot.
///
/// # Example
///
/// ```
/// use quantmap::map::RefCountMap;
///
/// let mut map = RefCountMap::try_with_bounds(0, 3).unwrap();
/// for _ in 0..20 {
///     map.add_item("Assets/Hero.fbx");
/// }
///
/// assert_eq!(map.usage("assets/hero.fbx").unwrap(), 20);
/// assert!(map.buckets()[4].contains("assets/hero.fbx")); // ">= 16"
/// ```
#[derive(Debug)]
pub struct RefCountMap {
    map: QuantileMap<str, RefCountStrategy>,
    #[cfg(feature = "metrics")]
    metrics: RefCountMapMetrics,
}

impl RefCountMap {
    /// Creates a map over the default `[0, 10]` exponent range.
    pub fn new() -> Self {
        Self {
            map: QuantileMap::new(RefCountStrategy::new()),
            #[cfg(feature = "metrics")]
            metrics: RefCountMapMetrics::default(),
        }
    }

    /// Creates a map over `[lower, upper]`, validating the bounds.
    pub fn try_with_bounds(lower: u32, upper: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            map: QuantileMap::try_with_bounds(lower, upper, RefCountStrategy::new())?,
            #[cfg(feature = "metrics")]
            metrics: RefCountMapMetrics::default(),
        })
    }

    /// The exponent range this map was built over.
    pub fn range(&self) -> BucketRange {
        self.map.range()
    }

    /// Number of bucket slots, underflow and overflow included.
    pub fn bucket_count(&self) -> usize {
        self.map.bucket_count()
    }

    /// The bucket array, in slot order.
    pub fn buckets(&self) -> &[MemberSet] {
        self.map.buckets()
    }

    /// Observations recorded since construction or the last reset.
    pub fn total_items(&self) -> u64 {
        self.map.total_items()
    }

    /// Number of distinct tracked keys.
    pub fn distinct_keys(&self) -> usize {
        self.map.strategy().distinct_keys()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.distinct_keys() == 0
    }

    /// Records one reference to `item`, migrating its key between buckets
    /// when the new count crosses a power-of-two threshold.
    pub fn add_item(&mut self, item: &str) {
        #[cfg(feature = "metrics")]
        self.record_add(item);
        self.map.add_item(item);
    }

    #[cfg(feature = "metrics")]
    fn record_add(&mut self, item: &str) {
        self.metrics.record_add_call();
        let key = canonical_path_key(item);
        match self.map.strategy().usage(&key) {
            None => self.metrics.record_new_key(),
            Some(count) => {
                self.metrics.record_repeat_add();
                let range = self.map.range();
                if RefCountStrategy::slot_for_count(range, count)
                    != RefCountStrategy::slot_for_count(range, count + 1)
                {
                    self.metrics.record_migration();
                }
            }
        }
    }

    /// Records one reference per item, in input order. Occurrence order of
    /// a repeated key is preserved (sequential processing, no reordering).
    pub fn add_items<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in items {
            self.add_item(item.as_ref());
        }
    }

    /// Current reference count for `item`.
    ///
    /// Errors when the canonical key is not tracked; check membership first
    /// via [`contains`](Self::contains) or [`keys`](Self::keys).
    pub fn usage(&self, item: &str) -> Result<u64, UsageError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_usage_call();
        let key = canonical_path_key(item);
        match self.map.strategy().usage(&key) {
            Some(count) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_usage_found();
                Ok(count)
            }
            None => Err(UsageError::new(format!(
                "key {key:?} is not tracked by this map"
            ))),
        }
    }

    /// Returns `true` if `item`'s canonical key is tracked.
    pub fn contains(&self, item: &str) -> bool {
        self.map
            .strategy()
            .usage(&canonical_path_key(item))
            .is_some()
    }

    /// Iterates over tracked canonical keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.strategy().keys()
    }

    /// Clears every bucket, the count table, and the total-items counter.
    /// Bucket slots and names are preserved for reuse.
    pub fn reset(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_reset();
        self.map.reset();
    }

    /// The flat export document for the current state.
    pub fn snapshot(&mut self) -> MapSnapshot {
        self.map.snapshot()
    }

    /// Encodes the export document as pretty-printed JSON bytes. Two calls
    /// without intervening mutation yield byte-identical output.
    pub fn serialize(&mut self) -> Result<Vec<u8>, ExportError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_export();
        self.map.serialize()
    }

    /// Encodes the export document as a pretty-printed JSON string.
    pub fn to_json(&mut self) -> Result<String, ExportError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_export();
        self.map.to_json()
    }

    /// Verifies bucket-membership invariants: every tracked key sits in
    /// exactly one bucket, and that bucket is the one its count derives.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let range = self.map.range();
        for (key, count) in self.map.strategy().usages() {
            let expected = RefCountStrategy::slot_for_count(range, count);
            let mut found = None;
            for (slot, bucket) in self.map.buckets().iter().enumerate() {
                if bucket.contains(key) {
                    if found.is_some() {
                        return Err(InvariantError::new(format!(
                            "key {key:?} present in more than one bucket"
                        )));
                    }
                    found = Some(slot);
                }
            }
            match found {
                None => {
                    return Err(InvariantError::new(format!(
                        "tracked key {key:?} is absent from every bucket"
                    )));
                }
                Some(slot) if slot != expected => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} with count {count} sits in bucket {slot}, expected {expected}"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Point-in-time copy of the op counters and gauges.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> RefCountMapMetricsSnapshot {
        RefCountMapMetricsSnapshot {
            add_calls: self.metrics.add_calls,
            new_keys: self.metrics.new_keys,
            repeat_adds: self.metrics.repeat_adds,
            migrations: self.metrics.migrations,
            resets: self.metrics.resets,
            exports: self.metrics.exports,
            usage_calls: self.metrics.usage_calls.get(),
            usage_found: self.metrics.usage_found.get(),
            distinct_keys: self.distinct_keys(),
            total_items: self.total_items(),
            bucket_count: self.bucket_count(),
        }
    }
}

impl Default for RefCountMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<RefCountMapMetricsSnapshot> for RefCountMap {
    fn snapshot(&self) -> RefCountMapMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lower: u32, upper: u32) -> BucketRange {
        BucketRange::try_new(lower, upper).unwrap()
    }

    // Slot derivation
    mod slot_derivation {
        use super::*;

        #[test]
        fn zero_count_maps_to_lowest_slot() {
            assert_eq!(RefCountStrategy::slot_for_count(range(0, 10), 0), 0);
            assert_eq!(RefCountStrategy::slot_for_count(range(3, 10), 0), 0);
        }

        #[test]
        fn powers_of_two_step_up_one_slot() {
            let r = range(0, 10);
            assert_eq!(RefCountStrategy::slot_for_count(r, 1), 0);
            assert_eq!(RefCountStrategy::slot_for_count(r, 2), 1);
            assert_eq!(RefCountStrategy::slot_for_count(r, 4), 2);
            assert_eq!(RefCountStrategy::slot_for_count(r, 8), 3);
            assert_eq!(RefCountStrategy::slot_for_count(r, 1024), 10);
        }

        #[test]
        fn non_powers_round_down() {
            let r = range(0, 10);
            assert_eq!(RefCountStrategy::slot_for_count(r, 3), 1);
            assert_eq!(RefCountStrategy::slot_for_count(r, 7), 2);
            assert_eq!(RefCountStrategy::slot_for_count(r, 15), 3);
        }

        #[test]
        fn small_counts_clamp_into_underflow() {
            // lower = 2: exponents 0 and 1 clamp up to 2, which is slot 0
            let r = range(2, 5);
            for count in 0..8 {
                assert_eq!(
                    RefCountStrategy::slot_for_count(r, count),
                    0,
                    "count {count} should clamp into the underflow slot"
                );
            }
            assert_eq!(RefCountStrategy::slot_for_count(r, 8), 1);
        }

        #[test]
        fn large_counts_clamp_into_overflow() {
            let r = range(0, 3);
            assert_eq!(RefCountStrategy::slot_for_count(r, 16), 4);
            assert_eq!(RefCountStrategy::slot_for_count(r, 1_000_000), 4);
        }
    }

    // Bucket naming
    mod naming {
        use super::*;

        #[test]
        fn default_range_names() {
            let strategy = RefCountStrategy::new();
            let r = BucketRange::default();
            assert_eq!(strategy.bucket_name(0, r), "<= 1");
            assert_eq!(strategy.bucket_name(1, r), "From 2 to 3");
            assert_eq!(strategy.bucket_name(10, r), "From 1024 to 2047");
            assert_eq!(strategy.bucket_name(11, r), ">= 2048");
        }

        #[test]
        fn shifted_range_names() {
            let strategy = RefCountStrategy::new();
            let r = range(2, 5);
            assert_eq!(strategy.bucket_name(0, r), "<= 4");
            assert_eq!(strategy.bucket_name(1, r), "From 8 to 15");
            assert_eq!(strategy.bucket_name(3, r), "From 32 to 63");
            assert_eq!(strategy.bucket_name(4, r), ">= 64");
        }
    }

    // Placement state machine
    mod placement {
        use super::*;

        #[test]
        fn first_observation_seeds_lowest_slot() {
            let mut strategy = RefCountStrategy::new();
            let placement = strategy.place("a", range(0, 3));
            assert_eq!(placement, Placement { from: None, to: 0 });
            assert_eq!(strategy.usage("a"), Some(1));
            assert_eq!(strategy.total_items(), 1);
        }

        #[test]
        fn movement_is_decided_from_pre_increment_count() {
            let mut strategy = RefCountStrategy::new();
            let r = range(0, 3);
            strategy.place("a", r); // count 0 -> 1, seeded in slot 0

            // count 1 -> 2: slot(1) = 0, slot(2) = 1, so it moves
            let second = strategy.place("a", r);
            assert_eq!(
                second,
                Placement {
                    from: Some(0),
                    to: 1
                }
            );

            // count 2 -> 3: slot(2) = slot(3) = 1, so it stays
            let third = strategy.place("a", r);
            assert_eq!(
                third,
                Placement {
                    from: Some(1),
                    to: 1
                }
            );
            assert_eq!(strategy.usage("a"), Some(3));
        }

        #[test]
        fn saturated_keys_stay_in_overflow() {
            let mut strategy = RefCountStrategy::new();
            let r = range(0, 3);
            for _ in 0..100 {
                strategy.place("a", r);
            }
            let placement = strategy.place("a", r);
            assert_eq!(
                placement,
                Placement {
                    from: Some(4),
                    to: 4
                }
            );
        }

        #[test]
        fn reset_forgets_every_key() {
            let mut strategy = RefCountStrategy::new();
            strategy.place("a", range(0, 3));
            strategy.reset();
            assert_eq!(strategy.usage("a"), None);
            assert_eq!(strategy.total_items(), 0);
            assert_eq!(strategy.distinct_keys(), 0);
        }
    }

    // Ready-made map behavior
    mod map_behavior {
        use super::*;

        #[test]
        fn spellings_collapse_to_one_key() {
            let mut map = RefCountMap::new();
            map.add_item("X/Y.TXT");
            map.add_item("x\\y.txt");
            assert_eq!(map.distinct_keys(), 1);
            assert_eq!(map.usage("x/y.txt").unwrap(), 2);
        }

        #[test]
        fn unknown_key_is_a_usage_error() {
            let map = RefCountMap::new();
            let err = map.usage("never/added.png").unwrap_err();
            assert!(err.to_string().contains("not tracked"));
        }

        #[test]
        fn contains_checks_canonical_membership() {
            let mut map = RefCountMap::new();
            map.add_item("Assets/Rock.fbx");
            assert!(map.contains("assets\\rock.fbx"));
            assert!(!map.contains("assets/paper.fbx"));
        }

        #[test]
        fn total_items_counts_every_observation() {
            let mut map = RefCountMap::new();
            map.add_items(["a", "a", "b"]);
            assert_eq!(map.total_items(), 3);
            assert_eq!(map.distinct_keys(), 2);
        }

        #[test]
        fn keys_are_canonical() {
            let mut map = RefCountMap::new();
            map.add_item("Assets\\Rock.fbx");
            let keys: Vec<_> = map.keys().collect();
            assert_eq!(keys, ["assets/rock.fbx"]);
        }

        #[test]
        fn reset_empties_map_but_keeps_layout() {
            let mut map = RefCountMap::try_with_bounds(0, 3).unwrap();
            map.add_items(["a", "a", "b"]);
            map.reset();
            assert!(map.is_empty());
            assert_eq!(map.total_items(), 0);
            assert_eq!(map.bucket_count(), 5);
            assert_eq!(map.buckets()[4].name(), ">= 16");
            assert!(map.usage("a").is_err());
        }
    }

    // Invariant diagnostics
    mod invariants {
        use super::*;

        #[test]
        fn invariants_hold_across_a_mixed_workload() {
            let mut map = RefCountMap::try_with_bounds(0, 3).unwrap();
            for round in 0..50 {
                for asset in 0..10 {
                    if round % (asset + 1) == 0 {
                        map.add_item(&format!("assets/item_{asset}.png"));
                    }
                }
            }
            map.check_invariants().unwrap();
        }

        #[test]
        fn invariants_hold_on_an_empty_map() {
            let map = RefCountMap::new();
            map.check_invariants().unwrap();
        }
    }
}
