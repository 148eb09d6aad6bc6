//! The alert book: ingestion, status transitions and the verified-image
//! allowlist.

use std::sync::{Arc, Mutex};

use armor_crypto::domain_hash;
use armor_store::ArmorStore;
use armor_types::{
    Alert, AlertId, AlertSource, AlertStatus, AlertTransition, Clock, Confidence, ContentHash,
    ModerationReason, Platform, VerifiedImage,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DefenseError;

const ALERT_ID_DOMAIN: &str = "creativearmor/alert/v1";

/// A detection reported by a scanner, a platform or a moderation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Caller-assigned id. Derived from the detection's content when absent.
    #[serde(default)]
    pub id: Option<AlertId>,
    pub platform: Platform,
    pub source: AlertSource,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub content_hash: Option<ContentHash>,
    pub confidence: Confidence,
    /// Set for moderation findings, which start out `Pending`.
    #[serde(default)]
    pub reason: Option<ModerationReason>,
}

impl Detection {
    /// Stable id: same platform, source, location and content give the same id.
    pub fn derived_id(&self) -> AlertId {
        let content = self.content_hash.map(|h| *h.as_bytes()).unwrap_or([0; 32]);
        let digest = domain_hash(
            ALERT_ID_DOMAIN,
            &[
                self.platform.as_str().as_bytes(),
                &[self.source as u8],
                self.location.as_deref().unwrap_or("").as_bytes(),
                &content,
            ],
        );
        AlertId::new(format!("AL-{}", hex::encode(&digest[..6])))
    }

    fn initial_status(&self) -> AlertStatus {
        if self.reason.is_some() {
            AlertStatus::Pending
        } else {
            AlertStatus::Active
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "alert", rename_all = "snake_case")]
pub enum IngestOutcome {
    Created(Alert),
    /// The same detection was ingested before; the stored alert is unchanged.
    Duplicate(Alert),
    /// The content is on the verified-image allowlist.
    Suppressed,
}

/// Alerts and the allowlist over a shared store.
#[derive(Clone)]
pub struct AlertBook {
    store: Arc<dyn ArmorStore>,
    clock: Arc<dyn Clock>,
    transitions: Arc<Mutex<()>>,
}

impl AlertBook {
    pub fn new(store: Arc<dyn ArmorStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            transitions: Arc::new(Mutex::new(())),
        }
    }

    pub fn ingest(&self, detection: Detection) -> Result<IngestOutcome, DefenseError> {
        if let Some(content) = &detection.content_hash {
            if self.store.is_verified(content)? {
                info!(content = %content.short(), platform = %detection.platform, "detection of verified image suppressed");
                return Ok(IngestOutcome::Suppressed);
            }
        }

        let id = match &detection.id {
            Some(id) => AlertId::parse(id.as_str())?,
            None => detection.derived_id(),
        };
        let alert = Alert {
            id,
            platform: detection.platform,
            source: detection.source,
            location: detection.location.clone(),
            content_hash: detection.content_hash,
            detected_at: self.clock.now(),
            confidence: detection.confidence,
            status: detection.initial_status(),
            reason: detection.reason,
        };

        if self.store.insert_alert(&alert)? {
            info!(alert = %alert.id, platform = %alert.platform, status = %alert.status, "alert raised");
            return Ok(IngestOutcome::Created(alert));
        }
        let existing = self
            .store
            .get_alert(&alert.id)?
            .ok_or_else(|| DefenseError::UnknownAlert(alert.id.clone()))?;
        debug!(alert = %existing.id, "duplicate detection");
        Ok(IngestOutcome::Duplicate(existing))
    }

    /// Pending → Active.
    pub fn escalate(&self, id: &AlertId) -> Result<Alert, DefenseError> {
        self.transition(id, AlertStatus::Active)
    }

    /// Pending or Active → Resolved.
    pub fn resolve(&self, id: &AlertId) -> Result<Alert, DefenseError> {
        self.transition(id, AlertStatus::Resolved)
    }

    fn transition(&self, id: &AlertId, next: AlertStatus) -> Result<Alert, DefenseError> {
        let _guard = self.transitions.lock().unwrap_or_else(|p| p.into_inner());
        let mut alert = self
            .store
            .get_alert(id)?
            .ok_or_else(|| DefenseError::UnknownAlert(id.clone()))?;
        let entry = alert.transition(next, self.clock.now())?;
        self.store.update_alert(&alert, &entry)?;
        info!(alert = %id, from = %entry.from, to = %entry.to, "alert transition");
        Ok(alert)
    }

    pub fn get(&self, id: &AlertId) -> Result<Alert, DefenseError> {
        self.store
            .get_alert(id)?
            .ok_or_else(|| DefenseError::UnknownAlert(id.clone()))
    }

    /// All alerts, optionally restricted to one status.
    pub fn list(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>, DefenseError> {
        let mut alerts = self.store.list_alerts()?;
        if let Some(status) = status {
            alerts.retain(|a| a.status == status);
        }
        Ok(alerts)
    }

    pub fn history(&self, id: &AlertId) -> Result<Vec<AlertTransition>, DefenseError> {
        Ok(self.store.transitions(id)?)
    }

    /// Put a content hash on the allowlist. Existing alerts are untouched.
    pub fn add_verified(&self, content_hash: ContentHash) -> Result<VerifiedImage, DefenseError> {
        let image = VerifiedImage {
            content_hash,
            added_at: self.clock.now(),
        };
        self.store.add_verified(&image)?;
        Ok(image)
    }

    pub fn is_verified(&self, content_hash: &ContentHash) -> Result<bool, DefenseError> {
        Ok(self.store.is_verified(content_hash)?)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
