use std::cell::Cell;

/// A metrics-only counter for `&self` accessor paths.
///
/// Interior mutability without synchronization: all access to the owning
/// map is externally serialized per its threading contract, and metrics are
/// observational only.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
