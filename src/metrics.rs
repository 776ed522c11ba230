//! Metrics and tracing helpers.
//!
//! With the `metrics` feature, [`METRICS`] counts mutations, storage failures
//! and advisory calls into a Prometheus registry. With the `tracing` feature,
//! [`tracing_helpers`] builds the spans wrapped around those operations.

#[cfg(feature = "metrics")]
pub use prometheus_metrics::{PartlifeMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::metrics::{Counter, Histogram, MeterProvider};
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Encoder, Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<PartlifeMetrics> = Lazy::new(PartlifeMetrics::init);

    pub struct PartlifeMetrics {
        pub registry: Registry,
        pub provider: SdkMeterProvider,
        pub mutations_total: Counter<u64>,
        pub persistence_failures_total: Counter<u64>,
        pub advisory_requests_total: Counter<u64>,
        pub advisory_failures_total: Counter<u64>,
        pub advisory_duration: Histogram<f64>,
    }

    impl PartlifeMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
                .expect("failed to build prometheus exporter");
            let provider = SdkMeterProvider::builder().with_reader(exporter).build();
            let meter = provider.meter("partlife");

            let mutations_total = meter
                .u64_counter("partlife_inventory_mutations_total")
                .with_description("Inventory mutations committed in memory")
                .build();

            let persistence_failures_total = meter
                .u64_counter("partlife_persistence_failures_total")
                .with_description("Snapshot loads or saves that failed")
                .build();

            let advisory_requests_total = meter
                .u64_counter("partlife_advisory_requests_total")
                .with_description("Advice requests sent to the advisory service")
                .build();

            let advisory_failures_total = meter
                .u64_counter("partlife_advisory_failures_total")
                .with_description("Advice requests answered with the fallback text")
                .build();

            let advisory_duration = meter
                .f64_histogram("partlife_advisory_duration_seconds")
                .with_description("Duration of advisory service calls")
                .build();

            Self {
                registry,
                provider,
                mutations_total,
                persistence_failures_total,
                advisory_requests_total,
                advisory_failures_total,
                advisory_duration,
            }
        }

        pub fn record_mutation(&self, operation: &'static str) {
            self.mutations_total
                .add(1, &[KeyValue::new("operation", operation)]);
        }

        pub fn record_persistence_failure(&self, operation: &'static str) {
            self.persistence_failures_total
                .add(1, &[KeyValue::new("operation", operation)]);
        }

        pub fn record_advisory(&self, elapsed: Duration, failed: bool) {
            self.advisory_requests_total.add(1, &[]);
            self.advisory_duration.record(elapsed.as_secs_f64(), &[]);
            if failed {
                self.advisory_failures_total.add(1, &[]);
            }
        }

        /// Prometheus text exposition of everything recorded so far.
        pub fn render(&self) -> String {
            let mut buffer = Vec::new();
            let encoder = TextEncoder::new();
            if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
                log::warn!("Failed to encode metrics: {}", e);
            }
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    pub fn mutation_span(operation: &'static str) -> Span {
        info_span!("partlife.inventory.mutation", operation)
    }

    pub fn save_span(parts: usize) -> Span {
        info_span!("partlife.persistence.save", parts)
    }

    pub fn advisory_span(parts: usize, query_len: usize) -> Span {
        info_span!("partlife.advisory.request", parts, query_len)
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_mutations() {
        METRICS.record_mutation("add");
        METRICS.record_persistence_failure("save");
        let text = METRICS.render();
        assert!(text.contains("partlife_inventory_mutations"));
    }
}
