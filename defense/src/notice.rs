//! Takedown notice drafting.

use std::sync::Arc;
use std::time::Duration;

use armor_types::{Alert, IdentityRecord, Mismatch, ProofRecord, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{GenerationError, TextGenerator};

/// Shortest generated notice accepted before falling back to the template.
pub const DEFAULT_MIN_NOTICE_LEN: usize = 300;

/// Everything a notice may cite.
#[derive(Clone, Debug)]
pub struct NoticeContext<'a> {
    pub alert: &'a Alert,
    pub identity: &'a IdentityRecord,
    /// The registered proof, when the content was checked against the ledger.
    pub proof: Option<&'a ProofRecord>,
    pub mismatch: Option<&'a Mismatch>,
    pub date: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSource {
    Generated,
    Template,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedNotice {
    pub text: String,
    pub source: NoticeSource,
}

/// Drafts takedown notices. Never fails: any generator problem yields the
/// template.
#[derive(Clone)]
pub struct NoticeDrafter {
    generator: Option<Arc<dyn TextGenerator>>,
    min_len: usize,
    timeout: Duration,
}

impl NoticeDrafter {
    /// Template-only drafter.
    pub fn template_only() -> Self {
        Self {
            generator: None,
            min_len: DEFAULT_MIN_NOTICE_LEN,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>, min_len: usize, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            min_len,
            timeout,
        }
    }

    pub async fn draft(&self, ctx: &NoticeContext<'_>) -> DraftedNotice {
        let Some(generator) = &self.generator else {
            return DraftedNotice {
                text: template(ctx),
                source: NoticeSource::Template,
            };
        };
        match self.generate(generator.as_ref(), ctx).await {
            Ok(text) => {
                info!(alert = %ctx.alert.id, len = text.len(), "generated takedown notice");
                DraftedNotice {
                    text,
                    source: NoticeSource::Generated,
                }
            }
            Err(e) => {
                warn!(alert = %ctx.alert.id, error = %e, "notice generation failed, using template");
                DraftedNotice {
                    text: template(ctx),
                    source: NoticeSource::Template,
                }
            }
        }
    }

    async fn generate(
        &self,
        generator: &dyn TextGenerator,
        ctx: &NoticeContext<'_>,
    ) -> Result<String, GenerationError> {
        let text = tokio::time::timeout(self.timeout, generator.generate(&prompt(ctx)))
            .await
            .map_err(|_| GenerationError::Timeout)??;
        let text = text.trim().to_string();
        let chars = text.chars().count();
        if chars < self.min_len {
            return Err(GenerationError::Implausible(format!(
                "{chars} chars, need {}",
                self.min_len
            )));
        }
        if !text.contains(ctx.alert.id.as_str()) {
            return Err(GenerationError::Implausible("alert id missing".into()));
        }
        if !text.contains(&ctx.identity.name) {
            return Err(GenerationError::Implausible("identity name missing".into()));
        }
        Ok(text)
    }
}

/// Prompt sent to the generator.
pub fn prompt(ctx: &NoticeContext<'_>) -> String {
    let mut p = format!(
        "Write a formal DMCA takedown notice for deepfake identity theft.\n\n\
         Victim: {name}\n\
         Platform: {platform}\n\
         Alert ID: {alert}\n",
        name = ctx.identity.name,
        platform = ctx.alert.platform,
        alert = ctx.alert.id,
    );
    if let Some(location) = &ctx.alert.location {
        p.push_str(&format!("Location: {location}\n"));
    }
    if let Some(proof) = ctx.proof {
        p.push_str(&format!("Registry transaction: {}\n", proof.tx_id));
    }
    if let Some(m) = ctx.mismatch {
        p.push_str(&format!(
            "Registered content hash: {}\nDetected content hash: {}\n",
            m.expected, m.actual
        ));
    }
    p.push_str(
        "\nThe identity is cryptographically registered and the detected media is an \
         unauthorized AI-generated impersonation.\n\n\
         The letter must:\n\
         - Be legally professional\n\
         - Cite DMCA 17 U.S.C. § 512\n\
         - Include good faith and perjury statements\n\
         - Demand immediate removal\n\
         - Mention the cryptographic proof\n\
         - Quote the victim's name and the alert ID verbatim\n\n\
         Return only the letter.\n",
    );
    p
}

/// The fixed DMCA notice. Always names the alert and the identity.
pub fn template(ctx: &NoticeContext<'_>) -> String {
    let name = &ctx.identity.name;
    let alert = &ctx.alert.id;
    let mut evidence = String::new();
    if let Some(location) = &ctx.alert.location {
        evidence.push_str(&format!("Infringing content: {location}\n"));
    }
    if let Some(proof) = ctx.proof {
        evidence.push_str(&format!(
            "Registry transaction: {}\nRegistered on: {}\n",
            proof.tx_id,
            proof.data.timestamp.to_long_date()
        ));
    } else if let Some(tx) = &ctx.identity.registry_tx {
        evidence.push_str(&format!("Registry transaction: {tx}\n"));
    }
    if let Some(m) = ctx.mismatch {
        evidence.push_str(&format!(
            "Registered content hash: {}\nDetected content hash: {}\n",
            m.expected, m.actual
        ));
    }

    format!(
        "DMCA TAKEDOWN NOTICE\n\n\
         Date: {date}\n\
         Platform: {platform}\n\
         Alert ID: {alert}\n\
         {evidence}\n\
         To Whom It May Concern,\n\n\
         I, {name}, am submitting this notice under the Digital Millennium Copyright Act \
         (17 U.S.C. § 512).\n\n\
         The content associated with Alert ID {alert} contains an unauthorized AI-generated \
         deepfake using my biometric identity. This identity is cryptographically registered \
         on a public ledger, and the content does not match my registered original.\n\n\
         I have a good faith belief that this use is not authorized by me, my agent, or the law.\n\n\
         The information in this notice is accurate, and I declare under penalty of perjury \
         that I am the rightful owner of the identity being misused.\n\n\
         Please remove the infringing content immediately.\n\n\
         Sincerely,\n\
         {name}\n\
         CreativeArmor Active Defense",
        date = ctx.date.to_long_date(),
        platform = ctx.alert.platform,
    )
}
