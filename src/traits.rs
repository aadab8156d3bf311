//! # Bucketing Strategy Seam
//!
//! This module defines the seam between the generic bucketing engine and its
//! specializations. One concrete engine owns the bucket array; everything
//! that varies per specialization (key extraction, bucket naming, placement)
//! is injected through a single capability trait.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                   QuantileMap<T, S> (engine)                    │
//!   │                                                                 │
//!   │  owns: BucketRange + Vec<MemberSet>                             │
//!   │  performs: every set insert/remove (membership exclusivity      │
//!   │            is enforced in exactly one place)                    │
//!   └───────────────────────────────┬─────────────────────────────────┘
//!                                   │ delegates per-item decisions to
//!                                   ▼
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                    S: BucketStrategy<T>                         │
//!   │                                                                 │
//!   │  canonical_key(&T) → String       key identity                  │
//!   │  bucket_name(slot, range) → String   labels at construction     │
//!   │  place(key, range) → Placement    per-key state + target slot   │
//!   │  total_items() → u64              running observation counter   │
//!   │  reset()                          clears per-key state          │
//!   └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The strategy never touches a bucket directly: it reports where a key
//! came from and where it should go ([`Placement`]), and the engine moves
//! the membership. A strategy that reports a slot outside the bucket array
//! is a programming error and the engine panics.
//!
//! ## Example Usage
//!
//! ```
//! use quantmap::traits::BucketRange;
//!
//! let range = BucketRange::try_new(0, 3).unwrap();
//! assert_eq!(range.bucket_count(), 5); // underflow + three middle slots + overflow
//! assert!(BucketRange::try_new(4, 2).is_err());
//! ```

use crate::error::ConfigError;

/// Default lower exponent bound for a bucket range.
pub const DEFAULT_LOWER_BUCKET_INDEX: u32 = 0;

/// Default upper exponent bound for a bucket range.
pub const DEFAULT_UPPER_BUCKET_INDEX: u32 = 10;

/// Validated pair of power-of-two exponents bounding the tracked range.
///
/// A range `[lower, upper]` yields `upper - lower + 2` buckets: slot 0
/// catches everything at or below `2^lower`, the last slot catches
/// everything at or above `2^(upper+1)`, and middle slot `i` covers
/// `[2^(i+lower), 2^(i+lower+1) - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRange {
    lower: u32,
    upper: u32,
}

impl BucketRange {
    /// Validates and builds a range.
    ///
    /// Fails when `lower > upper`, or when `upper >= 63` (the overflow
    /// bucket's threshold `2^(upper+1)` must fit in a `u64`).
    pub fn try_new(lower: u32, upper: u32) -> Result<Self, ConfigError> {
        if lower > upper {
            return Err(ConfigError::new(format!(
                "lower bucket index {lower} must not exceed upper bucket index {upper}"
            )));
        }
        if upper >= 63 {
            return Err(ConfigError::new(format!(
                "upper bucket index {upper} must be below 63"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Lower exponent bound.
    #[inline]
    pub fn lower(&self) -> u32 {
        self.lower
    }

    /// Upper exponent bound.
    #[inline]
    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// Number of bucket slots, including the underflow and overflow buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        (self.upper - self.lower + 2) as usize
    }
}

impl Default for BucketRange {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_BUCKET_INDEX,
            upper: DEFAULT_UPPER_BUCKET_INDEX,
        }
    }
}

/// Where the engine should put one observation of a key.
///
/// `from` is the slot the key currently occupies (`None` for a key the
/// strategy has not seen before); `to` is the slot it belongs in after this
/// observation. When they differ the engine migrates the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub from: Option<usize>,
    pub to: usize,
}

/// Capability set a specialization plugs into the engine.
pub trait BucketStrategy<T: ?Sized> {
    /// Canonical membership key for an item.
    fn canonical_key(&self, item: &T) -> String;

    /// Display name for the bucket at `slot`, used once at construction.
    fn bucket_name(&self, slot: usize, range: BucketRange) -> String;

    /// Target placement for one observation of `key`, updating any per-key
    /// state the strategy carries.
    fn place(&mut self, key: &str, range: BucketRange) -> Placement;

    /// Observations recorded since construction or the last reset.
    fn total_items(&self) -> u64;

    /// Clears per-key state and counters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- BucketRange ------------------------------------------------------

    #[test]
    fn valid_range_is_accepted() {
        let range = BucketRange::try_new(2, 5).unwrap();
        assert_eq!(range.lower(), 2);
        assert_eq!(range.upper(), 5);
        assert_eq!(range.bucket_count(), 5);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = BucketRange::try_new(5, 2).unwrap_err();
        assert!(err.to_string().contains("lower bucket index"));
    }

    #[test]
    fn degenerate_single_exponent_range() {
        // lower == upper is valid: underflow + one middle + overflow
        let range = BucketRange::try_new(4, 4).unwrap();
        assert_eq!(range.bucket_count(), 3);
    }

    #[test]
    fn too_wide_exponent_is_rejected() {
        assert!(BucketRange::try_new(0, 63).is_err());
        assert!(BucketRange::try_new(0, 62).is_ok());
    }

    #[test]
    fn default_matches_documented_bounds() {
        let range = BucketRange::default();
        assert_eq!(range.lower(), DEFAULT_LOWER_BUCKET_INDEX);
        assert_eq!(range.upper(), DEFAULT_UPPER_BUCKET_INDEX);
        assert_eq!(range.bucket_count(), 12);
    }
}
