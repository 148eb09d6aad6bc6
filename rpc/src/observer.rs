use std::time::Duration;

use armor_defense::NoticeSource;

/// Hooks the node uses to count API activity. Every method defaults to a
/// no-op.
pub trait ApiObserver: Send + Sync {
    fn registered(&self) {}

    /// `classification` is the result label: verified, mismatched or not_found.
    fn verified(&self, _classification: &'static str, _elapsed: Duration) {}

    fn notice_drafted(&self, _source: NoticeSource) {}

    fn alert_ingested(&self) {}

    fn alert_resolved(&self) {}
}

pub struct NoopObserver;

impl ApiObserver for NoopObserver {}
