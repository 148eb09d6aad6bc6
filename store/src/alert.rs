//! Alert storage with append-only status history.

use armor_types::{Alert, AlertId, AlertTransition};

use crate::StoreError;

/// Alerts are never deleted. Status changes are written together with the
/// history entry that records them.
pub trait AlertStore: Send + Sync {
    /// Insert a new alert. Returns `false` and writes nothing if the id exists.
    fn insert_alert(&self, alert: &Alert) -> Result<bool, StoreError>;

    fn get_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError>;

    /// Overwrite an existing alert and append `transition` atomically.
    ///
    /// Returns `StoreError::NotFound` if the alert does not exist.
    fn update_alert(&self, alert: &Alert, transition: &AlertTransition) -> Result<(), StoreError>;

    /// All alerts, ordered by id.
    fn list_alerts(&self) -> Result<Vec<Alert>, StoreError>;

    /// History of one alert, oldest first.
    fn transitions(&self, id: &AlertId) -> Result<Vec<AlertTransition>, StoreError>;
}
