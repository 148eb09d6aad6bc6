use armor_types::ScanEvent;

use crate::StoreError;

/// Append-only analytics log.
pub trait ScanStore: Send + Sync {
    /// Append `event`, replacing its `scan_id` with the id of the log
    /// position it lands at. Position and write are one atomic step.
    fn append_scan(&self, event: ScanEvent) -> Result<ScanEvent, StoreError>;

    /// All events in append order.
    fn scans(&self) -> Result<Vec<ScanEvent>, StoreError>;

    fn scan_count(&self) -> Result<u64, StoreError>;
}
