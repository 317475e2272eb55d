//! Cache metrics for observability

use prometheus::{CounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS: OnceLock<MetricsInner> = OnceLock::new();

struct MetricsInner {
    hits: CounterVec,
    misses: CounterVec,
    writes: CounterVec,
    invalidations: CounterVec,
    errors: CounterVec,
}

impl MetricsInner {
    fn new() -> Self {
        Self {
            hits: CounterVec::new(
                Opts::new("project_cache_hits_total", "Total project cache hits"),
                &["index"],
            )
            .expect("valid metric definition"),
            misses: CounterVec::new(
                Opts::new("project_cache_misses_total", "Total project cache misses"),
                &["index"],
            )
            .expect("valid metric definition"),
            writes: CounterVec::new(
                Opts::new("project_cache_writes_total", "Total project cache writes"),
                &["index"],
            )
            .expect("valid metric definition"),
            invalidations: CounterVec::new(
                Opts::new(
                    "project_cache_invalidations_total",
                    "Total project cache invalidations",
                ),
                &["index"],
            )
            .expect("valid metric definition"),
            errors: CounterVec::new(
                Opts::new("project_cache_errors_total", "Total project cache errors"),
                &["index", "stage"],
            )
            .expect("valid metric definition"),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.hits.clone()))?;
        registry.register(Box::new(self.misses.clone()))?;
        registry.register(Box::new(self.writes.clone()))?;
        registry.register(Box::new(self.invalidations.clone()))?;
        registry.register(Box::new(self.errors.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static MetricsInner {
    METRICS.get_or_init(MetricsInner::new)
}

/// Extract the index-type label from a cache key
fn index_label(key: &str) -> &str {
    // Format: {resource}:{index}:{value}
    let mut parts = key.splitn(3, ':');
    parts.next();
    parts.next().unwrap_or("unknown")
}

/// Cache metrics wrapper
#[derive(Clone, Default)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Register metrics with a Prometheus registry
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_hit(&self, key: &str) {
        let index = index_label(key);
        get_metrics().hits.with_label_values(&[index]).inc();
    }

    pub fn record_miss(&self, key: &str) {
        let index = index_label(key);
        get_metrics().misses.with_label_values(&[index]).inc();
    }

    pub fn record_write(&self, key: &str) {
        let index = index_label(key);
        get_metrics().writes.with_label_values(&[index]).inc();
    }

    pub fn record_invalidation(&self, key: &str) {
        let index = index_label(key);
        get_metrics()
            .invalidations
            .with_label_values(&[index])
            .inc();
    }

    pub fn record_error(&self, key: &str, stage: &str) {
        let index = index_label(key);
        get_metrics()
            .errors
            .with_label_values(&[index, stage])
            .inc();
    }
}
