pub use crate::ds::MemberSet;
pub use crate::error::{ConfigError, ExportError, InvariantError, UsageError};
pub use crate::key::{canonical_path_key, sanitise_filename};
pub use crate::map::{BucketSnapshot, MapSnapshot, QuantileMap, RefCountMap, RefCountStrategy};
pub use crate::traits::{BucketRange, BucketStrategy, Placement};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::RefCountMapMetricsSnapshot;
