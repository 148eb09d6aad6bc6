//! Scan analytics.

use std::collections::BTreeMap;
use std::sync::Arc;

use armor_store::{ScanStore, StoreError};
use armor_types::{AnalyticsMetrics, ScanEvent, ScanOutcome};
use tracing::debug;

/// Append-only log of scan events.
#[derive(Clone)]
pub struct ScanLog {
    store: Arc<dyn ScanStore>,
}

impl ScanLog {
    pub fn new(store: Arc<dyn ScanStore>) -> Self {
        Self { store }
    }

    /// Append `event` and return it with its assigned `scan_id`.
    pub fn record(&self, event: ScanEvent) -> Result<ScanEvent, StoreError> {
        let event = self.store.append_scan(event)?;
        debug!(scan = %event.scan_id, outcome = ?event.outcome, category = %event.category, "scan recorded");
        Ok(event)
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> Result<Vec<ScanEvent>, StoreError> {
        self.store.scans()
    }

    pub fn metrics(&self) -> Result<AnalyticsMetrics, StoreError> {
        Ok(summarize(&self.store.scans()?))
    }
}

/// Aggregate a slice of events.
///
/// An AI-generated match is a scan whose outcome is a registry mismatch, not
/// one above some detector confidence. The most common category is taken over
/// those matches only, so real and unverified scans never set it. Ties go to
/// the lexicographically smallest category.
pub fn summarize(events: &[ScanEvent]) -> AnalyticsMetrics {
    let mut categories: BTreeMap<&str, u64> = BTreeMap::new();
    for event in events.iter().filter(|e| e.outcome == ScanOutcome::AiGenerated) {
        *categories.entry(event.category.as_str()).or_default() += 1;
    }

    let most_common = categories
        .iter()
        .fold(None, |best: Option<(&str, u64)>, (category, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((*category, *count)),
        });

    AnalyticsMetrics {
        total_scans: events.len() as u64,
        ai_generated_matches: categories.values().sum(),
        most_common_category: most_common.map(|(c, _)| c.to_string()),
    }
}
