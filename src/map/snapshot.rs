use serde::Serialize;

/// Flat export document for one map. Write-only: there is no reload path
/// back into a live instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSnapshot {
    pub lower_bucket_index: u32,
    pub upper_bucket_index: u32,
    pub total_items: u64,
    pub buckets: Vec<BucketSnapshot>,
}

/// One bucket in the export document; members are sorted at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSnapshot {
    pub name: String,
    pub members: Vec<String>,
}
