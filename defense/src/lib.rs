//! Active defense: what happens once a suspicious instance is found.
//!
//! - [`AlertBook`] ingests detections into alerts and drives their status.
//! - [`NoticeDrafter`] writes takedown notices, via a [`TextGenerator`] when
//!   one is configured and from a fixed template otherwise.
//! - [`Certificate`] documents a confirmed content mismatch.
//! - [`DefenseOrchestrator`] ties these together for one alert.
//! - [`ScanLog`] keeps the analytics record of every scan.

pub mod alerts;
pub mod analytics;
pub mod certificate;
pub mod error;
pub mod generator;
pub mod moderation;
pub mod notice;
pub mod orchestrator;

pub use alerts::{AlertBook, Detection, IngestOutcome};
pub use analytics::{summarize, ScanLog};
pub use certificate::Certificate;
pub use error::{DefenseError, GenerationError};
pub use generator::{HttpTextGenerator, NullTextGenerator, TextGenerator};
pub use moderation::{report_all, ModerationFilters, ModerationReport, ReportFailure, ReportSummary};
pub use notice::{DraftedNotice, NoticeContext, NoticeDrafter, NoticeSource, DEFAULT_MIN_NOTICE_LEN};
pub use orchestrator::{DefenseCase, DefenseOrchestrator};
