//! Op counters for the reference-count map: recording, snapshotting, and
//! export are split into small composable pieces so monitoring never couples
//! to bucketing logic.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use cell::MetricsCell;
pub use exporter::PrometheusTextExporter;
pub use metrics_impl::RefCountMapMetrics;
pub use snapshot::RefCountMapMetricsSnapshot;
pub use traits::{
    MapMetricsReadRecorder, MapMetricsRecorder, MetricsExporter, MetricsSnapshotProvider,
};
