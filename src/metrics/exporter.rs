use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::RefCountMapMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for map metrics snapshots.
///
/// Writes in the Prometheus text exposition format so it can be scraped by
/// Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer
            .into_inner()
            .expect("metrics exporter writer poisoned")
    }

    fn write_counter(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<RefCountMapMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &RefCountMapMetricsSnapshot) {
        self.write_counter(&self.metric_name("add_calls_total"), snapshot.add_calls);
        self.write_counter(&self.metric_name("new_keys_total"), snapshot.new_keys);
        self.write_counter(&self.metric_name("repeat_adds_total"), snapshot.repeat_adds);
        self.write_counter(&self.metric_name("migrations_total"), snapshot.migrations);
        self.write_counter(&self.metric_name("resets_total"), snapshot.resets);
        self.write_counter(&self.metric_name("exports_total"), snapshot.exports);
        self.write_counter(&self.metric_name("usage_calls_total"), snapshot.usage_calls);
        self.write_counter(&self.metric_name("usage_found_total"), snapshot.usage_found);
        self.write_gauge(
            &self.metric_name("distinct_keys"),
            snapshot.distinct_keys as u64,
        );
        self.write_gauge(&self.metric_name("total_items"), snapshot.total_items);
        self.write_gauge(
            &self.metric_name("bucket_count"),
            snapshot.bucket_count as u64,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_counters_and_gauges_with_prefix() {
        let snapshot = RefCountMapMetricsSnapshot {
            add_calls: 3,
            new_keys: 2,
            distinct_keys: 2,
            bucket_count: 12,
            ..Default::default()
        };
        let exporter = PrometheusTextExporter::new("quantmap", Vec::new());
        exporter.export(&snapshot);
        let text = String::from_utf8(exporter.into_writer()).unwrap();
        assert!(text.contains("# TYPE quantmap_add_calls_total counter"));
        assert!(text.contains("quantmap_add_calls_total 3"));
        assert!(text.contains("quantmap_distinct_keys 2"));
        assert!(text.contains("quantmap_bucket_count 12"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&RefCountMapMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_writer()).unwrap();
        assert!(text.contains("# TYPE add_calls_total counter"));
    }
}
