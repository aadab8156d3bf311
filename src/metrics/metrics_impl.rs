use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{MapMetricsReadRecorder, MapMetricsRecorder};

#[derive(Debug, Default)]
pub struct RefCountMapMetrics {
    pub add_calls: u64,
    pub new_keys: u64,
    pub repeat_adds: u64,
    pub migrations: u64,
    pub resets: u64,
    pub exports: u64,
    pub usage_calls: MetricsCell,
    pub usage_found: MetricsCell,
}

impl MapMetricsRecorder for RefCountMapMetrics {
    fn record_add_call(&mut self) {
        self.add_calls += 1;
    }

    fn record_new_key(&mut self) {
        self.new_keys += 1;
    }

    fn record_repeat_add(&mut self) {
        self.repeat_adds += 1;
    }

    fn record_migration(&mut self) {
        self.migrations += 1;
    }

    fn record_reset(&mut self) {
        self.resets += 1;
    }

    fn record_export(&mut self) {
        self.exports += 1;
    }
}

impl MapMetricsReadRecorder for RefCountMapMetrics {
    fn record_usage_call(&self) {
        self.usage_calls.incr();
    }

    fn record_usage_found(&self) {
        self.usage_found.incr();
    }
}
