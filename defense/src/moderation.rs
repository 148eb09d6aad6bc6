//! Bulk reporting of moderation findings.

use armor_types::{Alert, AlertId, IdentityRecord, ModerationReason};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AlertBook, DefenseError, DraftedNotice, NoticeContext, NoticeDrafter};

/// Which moderation reasons to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationFilters {
    pub nudity: bool,
    pub revealing: bool,
    pub deepfake: bool,
}

impl Default for ModerationFilters {
    fn default() -> Self {
        Self {
            nudity: true,
            revealing: true,
            deepfake: true,
        }
    }
}

impl ModerationFilters {
    pub fn none() -> Self {
        Self {
            nudity: false,
            revealing: false,
            deepfake: false,
        }
    }

    pub fn allows(&self, reason: ModerationReason) -> bool {
        match reason {
            ModerationReason::Nudity => self.nudity,
            ModerationReason::Revealing => self.revealing,
            ModerationReason::Deepfake => self.deepfake,
        }
    }

    /// Unresolved alerts whose reason is enabled.
    pub fn select<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        alerts
            .iter()
            .filter(|a| a.status.is_open())
            .filter(|a| a.reason.is_some_and(|r| self.allows(r)))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationReport {
    pub alert_id: AlertId,
    pub notice: DraftedNotice,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFailure {
    pub alert_id: AlertId,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub reported: Vec<ModerationReport>,
    pub failed: Vec<ReportFailure>,
}

/// Draft a notice for every selected alert and resolve it.
///
/// A failure on one alert is recorded and the rest are still processed.
pub async fn report_all(
    book: &AlertBook,
    drafter: &NoticeDrafter,
    filters: ModerationFilters,
    identity: &IdentityRecord,
) -> Result<ReportSummary, DefenseError> {
    let alerts = book.list(None)?;
    let selected = filters.select(&alerts);
    let mut summary = ReportSummary::default();

    for alert in selected {
        let ctx = NoticeContext {
            alert,
            identity,
            proof: None,
            mismatch: None,
            date: book.clock().now(),
        };
        let notice = drafter.draft(&ctx).await;
        match book.resolve(&alert.id) {
            Ok(_) => summary.reported.push(ModerationReport {
                alert_id: alert.id.clone(),
                notice,
            }),
            Err(e) => {
                warn!(alert = %alert.id, error = %e, "moderation report failed");
                summary.failed.push(ReportFailure {
                    alert_id: alert.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        identity = %identity.id,
        reported = summary.reported.len(),
        failed = summary.failed.len(),
        "moderation report complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detection;
    use armor_nullables::{NullClock, NullStore};
    use armor_types::{AlertSource, AlertStatus, Confidence, Platform, Timestamp, TrustScore};
    use std::sync::Arc;

    fn identity() -> IdentityRecord {
        IdentityRecord {
            id: "did:armor:elena".into(),
            name: "Elena Vance".into(),
            registry_tx: None,
            verified_at: Timestamp::new(1),
            trust_score: TrustScore::new(98).unwrap(),
        }
    }

    fn finding(n: u32, reason: Option<ModerationReason>) -> Detection {
        Detection {
            id: Some(AlertId::new(format!("AL-{n}"))),
            platform: Platform::Reddit,
            source: AlertSource::PlatformReport,
            location: Some(format!("https://reddit.com/r/x/{n}")),
            content_hash: None,
            confidence: Confidence::new(75.0).unwrap(),
            reason,
        }
    }

    fn book() -> AlertBook {
        let book = AlertBook::new(Arc::new(NullStore::new()), Arc::new(NullClock::new(1_709_251_200)));
        book.ingest(finding(1, Some(ModerationReason::Nudity))).unwrap();
        book.ingest(finding(2, Some(ModerationReason::Revealing))).unwrap();
        book.ingest(finding(3, Some(ModerationReason::Deepfake))).unwrap();
        book.ingest(finding(4, None)).unwrap();
        book
    }

    #[test]
    fn select_respects_filters_and_status() {
        let book = book();
        book.resolve(&AlertId::new("AL-1")).unwrap();
        let alerts = book.list(None).unwrap();

        let all: Vec<_> = ModerationFilters::default()
            .select(&alerts)
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(all, vec!["AL-2", "AL-3"]);

        let only_deepfake = ModerationFilters {
            deepfake: true,
            ..ModerationFilters::none()
        };
        assert_eq!(only_deepfake.select(&alerts).len(), 1);
        assert!(ModerationFilters::none().select(&alerts).is_empty());
    }

    #[tokio::test]
    async fn report_all_resolves_selected() {
        let book = book();
        let filters = ModerationFilters {
            nudity: true,
            revealing: true,
            deepfake: false,
        };
        let summary = report_all(&book, &NoticeDrafter::template_only(), filters, &identity())
            .await
            .unwrap();

        assert_eq!(summary.reported.len(), 2);
        assert!(summary.failed.is_empty());
        for report in &summary.reported {
            assert!(report.notice.text.contains(report.alert_id.as_str()));
            assert!(report.notice.text.contains("Elena Vance"));
        }
        let status = |id: &str| book.get(&AlertId::new(id)).unwrap().status;
        assert_eq!(status("AL-1"), AlertStatus::Resolved);
        assert_eq!(status("AL-2"), AlertStatus::Resolved);
        assert_eq!(status("AL-3"), AlertStatus::Pending);
        assert_eq!(status("AL-4"), AlertStatus::Active);
    }

    #[tokio::test]
    async fn second_report_finds_nothing() {
        let book = book();
        let drafter = NoticeDrafter::template_only();
        report_all(&book, &drafter, ModerationFilters::default(), &identity())
            .await
            .unwrap();
        let again = report_all(&book, &drafter, ModerationFilters::default(), &identity())
            .await
            .unwrap();
        assert_eq!(again, ReportSummary::default());
    }
}
