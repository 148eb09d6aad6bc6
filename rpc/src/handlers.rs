//! Request handlers and their wire types.

use std::time::Instant;

use armor_defense::{
    Certificate, DefenseCase, Detection, IngestOutcome, ModerationFilters, ReportSummary,
};
use armor_hashing::SubmittedImage;
use armor_registry::LedgerBackend;
use armor_store::{IdentityStore, ProofStore};
use armor_types::{
    Alert, AlertId, AlertStatus, AnalyticsMetrics, ContentHash, FaceHash, IdentityRecord,
    ProofRecord, ScanEvent, SignedProof, VerificationResult, VerifiedImage,
};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RpcError, RpcState};

type RpcResult<T> = Result<T, RpcError>;

fn decode_image(b64: &str) -> RpcResult<SubmittedImage> {
    let bytes = STANDARD
        .decode(b64.trim())
        .map_err(|e| RpcError::InvalidRequest(format!("image is not base64: {e}")))?;
    Ok(SubmittedImage::decode(bytes)?)
}

async fn verify_image(state: &RpcState, b64: &str) -> RpcResult<VerificationResult> {
    let image = decode_image(b64)?;
    let started = Instant::now();
    let result = state.engine.verify(&image, &state.cancel).await?;
    state.observer.verified(result.label(), started.elapsed());
    Ok(result)
}

// ── Health & metrics ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub proof_count: u64,
}

pub async fn health(State(state): State<RpcState>) -> RpcResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        proof_count: state.store.proof_count()?,
    }))
}

pub async fn metrics(State(state): State<RpcState>) -> RpcResult<impl IntoResponse> {
    let registry = state
        .metrics
        .as_ref()
        .ok_or_else(|| RpcError::NotFound("metrics".into()))?;
    let encoder = prometheus::TextEncoder::new();
    let body = encoder
        .encode_to_string(&registry.gather())
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

// ── Ledger role ──────────────────────────────────────────────────────────

pub async fn ledger_submit(
    State(state): State<RpcState>,
    Json(proof): Json<SignedProof>,
) -> RpcResult<(StatusCode, Json<ProofRecord>)> {
    let record = state.ledger.submit(&proof).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn ledger_query(
    State(state): State<RpcState>,
    Path(hash): Path<String>,
) -> RpcResult<Json<ProofRecord>> {
    let face = FaceHash::from_hex(&hash)?;
    let record = state
        .ledger
        .query_by_face_hash(&face)
        .await?
        .ok_or_else(|| RpcError::NotFound(format!("proof for face {}", face.short())))?;
    Ok(Json(record))
}

// ── Proofs & verification ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ImageRequest {
    /// Base64 PNG, JPEG or netpbm bytes.
    pub image: String,
}

pub async fn register_proof(
    State(state): State<RpcState>,
    Json(req): Json<ImageRequest>,
) -> RpcResult<(StatusCode, Json<ProofRecord>)> {
    let image = decode_image(&req.image)?;
    let record = state
        .engine
        .register(&image, &state.wallet, state.clock.now(), &state.cancel)
        .await?;
    state.observer.registered();
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub result: VerificationResult,
    /// Present only for a mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,
}

pub async fn verify(
    State(state): State<RpcState>,
    Json(req): Json<ImageRequest>,
) -> RpcResult<Json<VerifyResponse>> {
    let result = verify_image(&state, &req.image).await?;
    state.defense.record_scan(&result)?;
    let certificate = state.defense.certificate_for(&result);
    Ok(Json(VerifyResponse {
        result,
        certificate,
    }))
}

// ── Identities ───────────────────────────────────────────────────────────

pub async fn put_identity(
    State(state): State<RpcState>,
    Json(identity): Json<IdentityRecord>,
) -> RpcResult<(StatusCode, Json<IdentityRecord>)> {
    identity.validate()?;
    state.store.put_identity(&identity)?;
    debug!(identity = %identity.id, "identity stored");
    Ok((StatusCode::CREATED, Json(identity)))
}

pub async fn get_identity(
    State(state): State<RpcState>,
    Path(id): Path<String>,
) -> RpcResult<Json<IdentityRecord>> {
    Ok(Json(state.defense.identity(&id)?))
}

// ── Alerts ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AlertQuery {
    pub status: Option<AlertStatus>,
}

pub async fn list_alerts(
    State(state): State<RpcState>,
    Query(query): Query<AlertQuery>,
) -> RpcResult<Json<Vec<Alert>>> {
    Ok(Json(state.defense.book().list(query.status)?))
}

pub async fn ingest_alert(
    State(state): State<RpcState>,
    Json(detection): Json<Detection>,
) -> RpcResult<(StatusCode, Json<IngestOutcome>)> {
    let outcome = state.defense.book().ingest(detection)?;
    let status = match outcome {
        IngestOutcome::Created(_) => {
            state.observer.alert_ingested();
            StatusCode::CREATED
        }
        IngestOutcome::Duplicate(_) | IngestOutcome::Suppressed => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

pub async fn resolve_alert(
    State(state): State<RpcState>,
    Path(id): Path<String>,
) -> RpcResult<Json<Alert>> {
    let alert = state.defense.book().resolve(&AlertId::new(id))?;
    state.observer.alert_resolved();
    Ok(Json(alert))
}

pub async fn escalate_alert(
    State(state): State<RpcState>,
    Path(id): Path<String>,
) -> RpcResult<Json<Alert>> {
    Ok(Json(state.defense.book().escalate(&AlertId::new(id))?))
}

#[derive(Deserialize)]
pub struct DefendRequest {
    /// Base64 PNG, JPEG or netpbm bytes of the detected content.
    pub image: String,
    pub identity_id: String,
}

#[derive(Serialize)]
pub struct DefendResponse {
    pub verification: VerificationResult,
    pub case: DefenseCase,
}

pub async fn defend_alert(
    State(state): State<RpcState>,
    Path(id): Path<String>,
    Json(req): Json<DefendRequest>,
) -> RpcResult<Json<DefendResponse>> {
    let alert_id = AlertId::new(id);
    // Fail on an unknown alert before spending a registry round trip.
    state.defense.book().get(&alert_id)?;
    let verification = verify_image(&state, &req.image).await?;
    let case = state
        .defense
        .defend(&alert_id, &req.identity_id, &verification)
        .await?;
    if let Some(notice) = &case.notice {
        state.observer.notice_drafted(notice.source);
    }
    Ok(Json(DefendResponse { verification, case }))
}

// ── Moderation & allowlist ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReportRequest {
    pub identity_id: String,
    #[serde(default)]
    pub filters: ModerationFilters,
}

pub async fn moderation_report(
    State(state): State<RpcState>,
    Json(req): Json<ReportRequest>,
) -> RpcResult<Json<ReportSummary>> {
    let summary = state.defense.report(req.filters, &req.identity_id).await?;
    for report in &summary.reported {
        state.observer.notice_drafted(report.notice.source);
        state.observer.alert_resolved();
    }
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct AllowlistRequest {
    pub content_hash: Option<ContentHash>,
    /// Base64 PNG, JPEG or netpbm bytes; hashed when `content_hash` is absent.
    pub image: Option<String>,
}

pub async fn add_allowlist(
    State(state): State<RpcState>,
    Json(req): Json<AllowlistRequest>,
) -> RpcResult<(StatusCode, Json<VerifiedImage>)> {
    let content_hash = match (req.content_hash, req.image) {
        (Some(hash), _) => hash,
        (None, Some(b64)) => state.engine.hasher().hash_content(&decode_image(&b64)?),
        (None, None) => {
            return Err(RpcError::InvalidRequest(
                "content_hash or image is required".into(),
            ))
        }
    };
    let image = state.defense.book().add_verified(content_hash)?;
    Ok((StatusCode::CREATED, Json(image)))
}

// ── Analytics ────────────────────────────────────────────────────────────

pub async fn analytics(State(state): State<RpcState>) -> RpcResult<Json<AnalyticsMetrics>> {
    Ok(Json(state.defense.scans().metrics()?))
}

pub async fn scan_history(State(state): State<RpcState>) -> RpcResult<Json<Vec<ScanEvent>>> {
    Ok(Json(state.defense.scans().events()?))
}
