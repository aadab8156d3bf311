#[derive(Debug, Default, Clone, Copy)]
pub struct RefCountMapMetricsSnapshot {
    pub add_calls: u64,
    pub new_keys: u64,
    pub repeat_adds: u64,
    pub migrations: u64,
    pub resets: u64,
    pub exports: u64,
    pub usage_calls: u64,
    pub usage_found: u64,

    // gauges captured at snapshot time
    pub distinct_keys: usize,
    pub total_items: u64,
    pub bucket_count: usize,
}
