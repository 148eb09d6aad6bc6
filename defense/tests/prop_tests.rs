use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use armor_defense::{
    DraftedNotice, NoticeContext, NoticeDrafter, NoticeSource, NullTextGenerator,
    DEFAULT_MIN_NOTICE_LEN,
};
use armor_types::{
    Alert, AlertId, AlertSource, AlertStatus, Confidence, IdentityRecord, Platform, Timestamp,
    TrustScore,
};

fn alert(id: &str) -> Alert {
    Alert {
        id: AlertId::new(id),
        platform: Platform::X,
        source: AlertSource::DeepfakeScan,
        location: None,
        content_hash: None,
        detected_at: Timestamp::new(1_709_251_200),
        confidence: Confidence::new(95.0).unwrap(),
        status: AlertStatus::Active,
        reason: None,
    }
}

fn identity(name: &str) -> IdentityRecord {
    IdentityRecord {
        id: "did:armor:prop".into(),
        name: name.into(),
        registry_tx: None,
        verified_at: Timestamp::new(1),
        trust_score: TrustScore::new(90).unwrap(),
    }
}

fn draft(reply: String, alert: &Alert, identity: &IdentityRecord) -> DraftedNotice {
    let drafter = NoticeDrafter::with_generator(
        Arc::new(NullTextGenerator::replying(reply)),
        DEFAULT_MIN_NOTICE_LEN,
        Duration::from_secs(1),
    );
    let ctx = NoticeContext {
        alert,
        identity,
        proof: None,
        mismatch: None,
        date: Timestamp::new(1_709_251_200),
    };
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(drafter.draft(&ctx))
}

proptest! {
    /// Replies below the minimum length always yield the template.
    #[test]
    fn short_replies_fall_back(
        reply in ".{0,299}",
        id in "AL-[0-9a-f]{6,12}",
        name in "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}",
    ) {
        let (alert, identity) = (alert(&id), identity(&name));
        let notice = draft(reply, &alert, &identity);
        prop_assert_eq!(notice.source, NoticeSource::Template);
        prop_assert!(notice.text.contains(&id));
        prop_assert!(notice.text.contains(&name));
    }

    /// Whatever the generator says, the notice names the alert and the person.
    #[test]
    fn notice_always_names_alert_and_identity(
        reply in ".{0,600}",
        id in "AL-[0-9a-f]{6,12}",
        name in "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}",
    ) {
        let (alert, identity) = (alert(&id), identity(&name));
        let notice = draft(reply, &alert, &identity);
        prop_assert!(notice.text.contains(&id));
        prop_assert!(notice.text.contains(&name));
    }
}
