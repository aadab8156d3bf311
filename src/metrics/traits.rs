//! Metrics trait seam: recorders only write counters, snapshot providers
//! only read, exporters only publish. Mirrors the strategy seam so policy
//! logic never couples to monitoring.

/// Counters recorded on mutating map operations.
pub trait MapMetricsRecorder {
    fn record_add_call(&mut self);
    fn record_new_key(&mut self);
    fn record_repeat_add(&mut self);
    fn record_migration(&mut self);
    fn record_reset(&mut self);
    fn record_export(&mut self);
}

/// Read-only metrics for `&self` accessors (uses interior mutability).
pub trait MapMetricsReadRecorder {
    fn record_usage_call(&self);
    fn record_usage_found(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
