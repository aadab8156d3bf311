//! Error types for the quantmap library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when bucket-range parameters are invalid
//!   (lower index above the upper index, exponent too wide for `u64`).
//! - [`UsageError`]: Returned when the usage count of an unregistered key is
//!   queried.
//! - [`ExportError`]: Returned when encoding the export snapshot fails.
//! - [`InvariantError`]: Returned by `check_invariants` diagnostics when
//!   internal bucket-membership invariants are violated.
//!
//! ## Example Usage
//!
//! ```
//! use quantmap::error::ConfigError;
//! use quantmap::map::RefCountMap;
//!
//! // Fallible constructor for user-configurable parameters
//! let map: Result<RefCountMap, ConfigError> = RefCountMap::try_with_bounds(0, 10);
//! assert!(map.is_ok());
//!
//! // An inverted range is caught at construction, not on first use
//! let bad = RefCountMap::try_with_bounds(8, 2);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when bucket-range parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`BucketRange::try_new`](crate::traits::BucketRange::try_new) and
/// [`RefCountMap::try_with_bounds`](crate::map::RefCountMap::try_with_bounds).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use quantmap::traits::BucketRange;
///
/// let err = BucketRange::try_new(8, 2).unwrap_err();
/// assert!(err.to_string().contains("lower bucket index"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// UsageError
// ---------------------------------------------------------------------------

/// Error returned when the count of an unregistered key is queried.
///
/// Callers are expected to check membership first, via
/// [`RefCountMap::contains`](crate::map::RefCountMap::contains) or the
/// [`keys`](crate::map::RefCountMap::keys) accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(String);

impl UsageError {
    /// Creates a new `UsageError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Error returned when encoding the export snapshot fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportError(String);

impl ExportError {
    /// Creates a new `ExportError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ExportError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal bucket-membership invariants are violated.
///
/// Produced by [`RefCountMap::check_invariants`](crate::map::RefCountMap::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
