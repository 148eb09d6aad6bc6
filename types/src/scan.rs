//! Analytics records for scans.

use serde::{Deserialize, Serialize};

use crate::{AlertId, Confidence, ContentHash, FaceHash, Platform, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Matched its registered proof.
    Real,
    /// Contradicts a registered proof.
    AiGenerated,
    /// No registered proof to compare against.
    Unverified,
}

/// One scan, appended to the analytics log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub scan_id: String,
    pub face_hash: Option<FaceHash>,
    pub outcome: ScanOutcome,
    /// Free-form manipulation category, e.g. "Face Swap".
    pub category: String,
    pub platform: Option<Platform>,
    pub confidence: Confidence,
    pub defense_activated: bool,
    pub alert_id: Option<AlertId>,
    pub timestamp: Timestamp,
}

impl ScanEvent {
    /// Id of the event at zero-based log position `seq`: `SC-000001` onwards.
    pub fn id_for(seq: u64) -> String {
        format!("SC-{:06}", seq + 1)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub total_scans: u64,
    pub ai_generated_matches: u64,
    pub most_common_category: Option<String>,
}

/// A user-approved image. Detections carrying this content hash raise no alert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedImage {
    pub content_hash: ContentHash,
    pub added_at: Timestamp,
}
