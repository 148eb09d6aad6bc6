//! Alerts raised for suspicious instances of a protected identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ArmorError, ContentHash, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate an externally supplied id: 1 to 128 bytes, no control
    /// characters.
    pub fn parse(id: &str) -> Result<Self, ArmorError> {
        if id.is_empty() || id.len() > 128 || id.chars().any(char::is_control) {
            return Err(ArmorError::InvalidAlertId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the suspicious content was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    TikTok,
    Instagram,
    YouTube,
    X,
    Reddit,
    Google,
    Upload,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TikTok => "TikTok",
            Self::Instagram => "Instagram",
            Self::YouTube => "YouTube",
            Self::X => "X",
            Self::Reddit => "Reddit",
            Self::Google => "Google",
            Self::Upload => "Upload",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ArmorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tiktok" => Ok(Self::TikTok),
            "instagram" => Ok(Self::Instagram),
            "youtube" => Ok(Self::YouTube),
            "x" | "twitter" => Ok(Self::X),
            "reddit" => Ok(Self::Reddit),
            "google" => Ok(Self::Google),
            "upload" => Ok(Self::Upload),
            _ => Err(ArmorError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Which pipeline produced the alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    /// Web-wide deepfake detection scan.
    DeepfakeScan,
    /// Report forwarded by a platform.
    PlatformReport,
    /// Content uploaded by the user for checking.
    Upload,
}

/// Why a moderation alert was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationReason {
    Nudity,
    Revealing,
    Deepfake,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Confirmed and awaiting action.
    Active,
    /// Raised by moderation, not yet confirmed.
    Pending,
    /// Closed by an explicit resolution. Terminal.
    Resolved,
}

impl AlertStatus {
    /// Pending → Active, Pending → Resolved and Active → Resolved are the only
    /// permitted moves.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Resolved)
                | (Self::Active, Self::Resolved)
        )
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Resolved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection confidence as a percentage in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(pct: f64) -> Result<Self, ArmorError> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(ArmorError::InvalidConfidence(pct));
        }
        Ok(Self(pct))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ArmorError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub platform: Platform,
    pub source: AlertSource,
    /// URL or description of where the content was found.
    pub location: Option<String>,
    /// Content hash of the detected media, when it was retrieved.
    pub content_hash: Option<ContentHash>,
    pub detected_at: Timestamp,
    pub confidence: Confidence,
    pub status: AlertStatus,
    pub reason: Option<ModerationReason>,
}

impl Alert {
    /// Apply a status change, returning the history entry to append.
    pub fn transition(
        &mut self,
        next: AlertStatus,
        at: Timestamp,
    ) -> Result<AlertTransition, ArmorError> {
        if !self.status.can_transition_to(next) {
            return Err(ArmorError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        let entry = AlertTransition {
            alert_id: self.id.clone(),
            from: self.status,
            to: next,
            at,
        };
        self.status = next;
        Ok(entry)
    }
}

/// One entry of an alert's append-only status history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTransition {
    pub alert_id: AlertId,
    pub from: AlertStatus,
    pub to: AlertStatus,
    pub at: Timestamp,
}
