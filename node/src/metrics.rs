//! Prometheus metrics for the node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text format.

use std::sync::Arc;
use std::time::Duration;

use armor_defense::NoticeSource;
use armor_registry::RetryHook;
use armor_rpc::ApiObserver;
use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
    Registry,
};

pub struct NodeMetrics {
    pub registry: Registry,

    /// Proofs committed through this node.
    pub registrations: IntCounter,
    /// Verifications, labelled by classification.
    pub verifications: IntCounterVec,
    /// Registry retries, labelled by operation.
    pub registry_retries: IntCounterVec,
    /// Takedown notices, labelled `generated` or `template`.
    pub notices: IntCounterVec,
    pub alerts_ingested: IntCounter,
    pub alerts_resolved: IntCounter,

    /// Hashing plus registry lookup, in milliseconds.
    pub verification_latency_ms: Histogram,
}

impl NodeMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let registrations = register_int_counter_with_registry!(
            Opts::new("armor_registrations_total", "Proofs committed through this node"),
            registry
        )?;
        let verifications = register_int_counter_vec_with_registry!(
            Opts::new("armor_verifications_total", "Verifications by classification"),
            &["classification"],
            registry
        )?;
        let registry_retries = register_int_counter_vec_with_registry!(
            Opts::new("armor_registry_retries_total", "Registry calls retried after unavailability"),
            &["op"],
            registry
        )?;
        let notices = register_int_counter_vec_with_registry!(
            Opts::new("armor_notices_total", "Takedown notices by source"),
            &["source"],
            registry
        )?;
        let alerts_ingested = register_int_counter_with_registry!(
            Opts::new("armor_alerts_ingested_total", "Alerts created from detections"),
            registry
        )?;
        let alerts_resolved = register_int_counter_with_registry!(
            Opts::new("armor_alerts_resolved_total", "Alerts moved to resolved"),
            registry
        )?;

        // 1 ms to ~16 s.
        let verification_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "armor_verification_latency_ms",
                "Verification latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            registrations,
            verifications,
            registry_retries,
            notices,
            alerts_ingested,
            alerts_resolved,
            verification_latency_ms,
        })
    }

    /// Hook for the registry client's retry loop.
    pub fn retry_hook(self: &Arc<Self>) -> RetryHook {
        let metrics = Arc::clone(self);
        Arc::new(move |op| metrics.registry_retries.with_label_values(&[op]).inc())
    }
}

impl ApiObserver for NodeMetrics {
    fn registered(&self) {
        self.registrations.inc();
    }

    fn verified(&self, classification: &'static str, elapsed: Duration) {
        self.verifications.with_label_values(&[classification]).inc();
        self.verification_latency_ms
            .observe(elapsed.as_secs_f64() * 1_000.0);
    }

    fn notice_drafted(&self, source: NoticeSource) {
        let label = match source {
            NoticeSource::Generated => "generated",
            NoticeSource::Template => "template",
        };
        self.notices.with_label_values(&[label]).inc();
    }

    fn alert_ingested(&self) {
        self.alerts_ingested.inc();
    }

    fn alert_resolved(&self) {
        self.alerts_resolved.inc();
    }
}
