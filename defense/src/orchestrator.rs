//! Ties a verification result to an alert and produces the defense case.

use std::sync::Arc;

use armor_store::IdentityStore;
use armor_types::{
    Alert, AlertId, AlertSource, AlertStatus, Classification, Confidence, IdentityRecord,
    ModerationReason, Platform, ScanEvent, ScanOutcome, VerificationResult,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    report_all, AlertBook, Certificate, DefenseError, DraftedNotice, ModerationFilters,
    NoticeContext, NoticeDrafter, ReportSummary, ScanLog,
};

/// What a defense run produced for one alert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefenseCase {
    pub alert: Alert,
    /// Present only for a mismatch.
    pub certificate: Option<Certificate>,
    /// Present only for a mismatch.
    pub notice: Option<DraftedNotice>,
    pub scan: ScanEvent,
}

#[derive(Clone)]
pub struct DefenseOrchestrator {
    book: AlertBook,
    drafter: NoticeDrafter,
    scans: ScanLog,
    identities: Arc<dyn IdentityStore>,
    explorer_base: String,
}

impl DefenseOrchestrator {
    pub fn new(
        book: AlertBook,
        drafter: NoticeDrafter,
        scans: ScanLog,
        identities: Arc<dyn IdentityStore>,
        explorer_base: impl Into<String>,
    ) -> Self {
        Self {
            book,
            drafter,
            scans,
            identities,
            explorer_base: explorer_base.into(),
        }
    }

    pub fn book(&self) -> &AlertBook {
        &self.book
    }

    pub fn scans(&self) -> &ScanLog {
        &self.scans
    }

    pub fn identity(&self, id: &str) -> Result<IdentityRecord, DefenseError> {
        self.identities
            .get_identity(id)?
            .ok_or_else(|| DefenseError::UnknownIdentity(id.to_string()))
    }

    /// Act on a verification of the content behind `alert_id`.
    ///
    /// A mismatch escalates a pending alert and yields a certificate and a
    /// takedown notice. Verified and not-found results are only logged as
    /// scans. The alert is never resolved here.
    pub async fn defend(
        &self,
        alert_id: &AlertId,
        identity_id: &str,
        result: &VerificationResult,
    ) -> Result<DefenseCase, DefenseError> {
        let mut alert = self.book.get(alert_id)?;
        let identity = self.identity(identity_id)?;
        let now = self.book.clock().now();

        let (certificate, notice) = match &result.classification {
            Classification::Mismatched { proof, mismatch } => {
                if alert.status == AlertStatus::Pending {
                    alert = self.book.escalate(alert_id)?;
                }
                let certificate = Certificate::issue(proof, mismatch, &self.explorer_base, now);
                let ctx = NoticeContext {
                    alert: &alert,
                    identity: &identity,
                    proof: Some(proof),
                    mismatch: Some(mismatch),
                    date: now,
                };
                let notice = self.drafter.draft(&ctx).await;
                (Some(certificate), Some(notice))
            }
            Classification::Verified { .. } | Classification::NotFound => (None, None),
        };

        let scan = ScanEvent {
            scan_id: String::new(),
            face_hash: Some(result.submitted.face),
            outcome: scan_outcome(result),
            category: category(&alert),
            platform: Some(alert.platform),
            confidence: alert.confidence,
            defense_activated: notice.is_some(),
            alert_id: Some(alert.id.clone()),
            timestamp: now,
        };
        let scan = self.scans.record(scan)?;

        info!(
            alert = %alert.id,
            identity = %identity.id,
            classification = result.label(),
            defense = scan.defense_activated,
            "defense run"
        );
        Ok(DefenseCase {
            alert,
            certificate,
            notice,
            scan,
        })
    }

    /// Certificate of inauthenticity for a mismatched result, `None` otherwise.
    pub fn certificate_for(&self, result: &VerificationResult) -> Option<Certificate> {
        Certificate::from_result(result, &self.explorer_base, self.book.clock().now())
    }

    /// Log a verification of an uploaded image that no alert refers to.
    pub fn record_scan(&self, result: &VerificationResult) -> Result<ScanEvent, DefenseError> {
        let scan = ScanEvent {
            scan_id: String::new(),
            face_hash: Some(result.submitted.face),
            outcome: scan_outcome(result),
            category: "Upload".to_string(),
            platform: Some(Platform::Upload),
            confidence: Confidence::new(100.0)?,
            defense_activated: false,
            alert_id: None,
            timestamp: self.book.clock().now(),
        };
        Ok(self.scans.record(scan)?)
    }

    /// Report every open moderation alert selected by `filters`.
    pub async fn report(
        &self,
        filters: ModerationFilters,
        identity_id: &str,
    ) -> Result<ReportSummary, DefenseError> {
        let identity = self.identity(identity_id)?;
        report_all(&self.book, &self.drafter, filters, &identity).await
    }
}

fn scan_outcome(result: &VerificationResult) -> ScanOutcome {
    match result.classification {
        Classification::Verified { .. } => ScanOutcome::Real,
        Classification::Mismatched { .. } => ScanOutcome::AiGenerated,
        Classification::NotFound => ScanOutcome::Unverified,
    }
}

/// Analytics category of an alert.
fn category(alert: &Alert) -> String {
    let label = match (alert.reason, alert.source) {
        (Some(ModerationReason::Nudity), _) => "Nudity",
        (Some(ModerationReason::Revealing), _) => "Revealing",
        (Some(ModerationReason::Deepfake), _) | (None, AlertSource::DeepfakeScan) => "Deepfake",
        (None, AlertSource::PlatformReport) => "Platform Report",
        (None, AlertSource::Upload) => "Upload",
    };
    label.to_string()
}
