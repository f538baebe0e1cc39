use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiError, AppState};
use crate::engine::{ClaimIngestor, IngestReport};
use crate::models::{ClaimRecord, JsonClaimRow, MrfDocument, MrfFile, MrfFileSummary, OutOfNetworkItem};
use crate::storage::ApprovalOutcome;
use crate::types::{ClaimId, MrfFileId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimIdsRequest {
    pub claim_ids: Vec<ClaimId>
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub count: usize,
    pub errors: Vec<String>,
    pub total_rows: usize
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovalResponse {
    pub success: bool,
    pub message: &'static str,
    pub approved_count: usize,
    pub remaining_needed: usize
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedResponse {
    pub success: bool,
    pub mrf_file: MrfFile,
    pub message: &'static str
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MrfFileView {
    pub id: MrfFileId,
    pub name: String,
    pub created_at: String,
    pub size: String,
    pub claims: Vec<OutOfNetworkItem>,
    pub data: MrfDocument
}

impl From<MrfFile> for MrfFileView {
    fn from(file: MrfFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            created_at: file.created_at,
            size: file.size,
            claims: file.data.out_of_network.clone(),
            data: file.data
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn upload(
    State(state): State<AppState>,
    body: Result<Json<Vec<JsonClaimRow>>, JsonRejection>
) -> Result<Json<UploadResponse>, ApiError> {
    let Json(rows) = body.map_err(|_| ApiError::InvalidClaims)?;

    Ok(Json(accept_report(&state, ClaimIngestor::ingest_rows(&rows))))
}

pub async fn upload_csv(State(state): State<AppState>, body: String) -> Result<Json<UploadResponse>, ApiError> {
    let report = ClaimIngestor::ingest_csv(body.as_bytes())?;

    Ok(Json(accept_report(&state, report)))
}

pub async fn list_claims(State(state): State<AppState>) -> Json<Vec<ClaimRecord>> {
    Json(state.store.pending())
}

pub async fn list_approved_claims(State(state): State<AppState>) -> Json<Vec<ClaimRecord>> {
    Json(state.store.approved())
}

pub async fn approve_claims(
    State(state): State<AppState>,
    body: Result<Json<ClaimIdsRequest>, JsonRejection>
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::InvalidBody)?;
    let outcome = state.store.approve_by_ids(&request.claim_ids)?;

    Ok(approval_response(outcome))
}

pub async fn reject_claims(
    State(state): State<AppState>,
    body: Result<Json<ClaimIdsRequest>, JsonRejection>
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::InvalidBody)?;
    state.store.reject_by_ids(&request.claim_ids);

    Ok(Json(MessageResponse { success: true, message: "Claims rejected" }))
}

pub async fn generate_mrf(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = match state.store.try_aggregate()? {
        Some(file) => ApprovalOutcome::Published(file),
        None => state.store.approval_status()
    };

    Ok(approval_response(outcome))
}

pub async fn list_mrf_files(State(state): State<AppState>) -> Json<Vec<MrfFileSummary>> {
    Json(state.store.mrf_files().iter().map(MrfFile::summary).collect())
}

pub async fn get_mrf_file(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MrfFileView>, ApiError> {
    Ok(Json(find_file(&state, &id)?.into()))
}

pub async fn download_mrf_file(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let file = find_file(&state, &id)?;
    let disposition = format!("attachment; filename=\"{}\"", file.name);

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(file.data)).into_response())
}

fn accept_report(state: &AppState, report: IngestReport) -> UploadResponse {
    let IngestReport { valid_records, row_errors, total_row_count } = report;
    let count = state.store.ingest(valid_records);

    info!("Upload accepted {count} of {total_row_count} claims");

    UploadResponse {
        success: true,
        count,
        errors: row_errors,
        total_rows: total_row_count
    }
}

fn approval_response(outcome: ApprovalOutcome) -> Response {
    match outcome {
        ApprovalOutcome::Published(file) => Json(PublishedResponse {
            success: true,
            mrf_file: file,
            message: "MRF file generated successfully"
        }).into_response(),
        ApprovalOutcome::Pending { approved_count, remaining_needed } => Json(PendingApprovalResponse {
            success: true,
            message: "Claims approved and pending MRF generation",
            approved_count,
            remaining_needed
        }).into_response()
    }
}

fn find_file(state: &AppState, id: &str) -> Result<MrfFile, ApiError> {
    id.parse::<MrfFileId>()
        .ok()
        .and_then(|id| state.store.mrf_file(id))
        .ok_or(ApiError::NotFound)
}
