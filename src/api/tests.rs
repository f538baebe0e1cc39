use super::handlers::{
    approve_claims, download_mrf_file, generate_mrf, get_mrf_file, list_approved_claims, list_claims, list_mrf_files,
    reject_claims, upload, upload_csv, ClaimIdsRequest
};
use super::{ApiError, AppState};

use anyhow::{anyhow, Result};
use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::engine::{AggregationError, MrfValidationError};
use crate::models::JsonClaimRow;
use crate::storage::{ClaimStore, MrfFileStorage};

fn create_state(threshold: usize) -> AppState {
    let config = ServiceConfig {
        approval_threshold: threshold,
        ..ServiceConfig::default()
    };
    let store = ClaimStore::new(Arc::new(MrfFileStorage::new()), &config)
        .with_clock(|| Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).single().unwrap_or_default());

    AppState { store: Arc::new(store) }
}

fn create_row(claim_id: &str, billed: &str) -> JsonClaimRow {
    [
        ("Claim ID", claim_id),
        ("Subscriber ID", "S-1"),
        ("Member Sequence", "01"),
        ("Claim Status", "Paid"),
        ("Billed", billed),
        ("Allowed", "80.00"),
        ("Paid", "64.00"),
        ("Service Date", "2024-05-01"),
        ("Provider ID", "1111111111"),
        ("Provider Name", "Lakeside Family Medicine"),
        ("Place of Service", "Office"),
        ("Claim Type", "Professional"),
        ("Procedure Code", "99213"),
        ("Member Gender", "M"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
    .collect()
}

fn ids(values: &[&str]) -> Json<ClaimIdsRequest> {
    Json(ClaimIdsRequest { claim_ids: values.iter().map(ToString::to_string).collect() })
}

async fn read_json(response: Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn upload_rows(state: &AppState, rows: Vec<JsonClaimRow>) -> Result<Value> {
    let response = upload(State(state.clone()), Ok(Json(rows))).await.map_err(|error| anyhow!("{error}"))?;
    Ok(serde_json::to_value(&response.0)?)
}

#[tokio::test]
async fn test_upload_queues_valid_rows_and_reports_errors() -> Result<()> {
    let state = create_state(20);

    let body = upload_rows(&state, vec![create_row("C-1", "10.00"), create_row("C-2", "abc"), create_row("C-3", "5.00")]).await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["totalRows"], 3);
    assert_eq!(body["errors"], serde_json::json!(["Row 3: Billed - Invalid billed amount format"]));

    let Json(pending) = list_claims(State(state.clone())).await;
    let pending = serde_json::to_value(pending)?;

    assert_eq!(pending.as_array().map(Vec::len), Some(2));
    assert_eq!(pending[0]["Claim ID"], "C-1");
    assert_eq!(pending[1]["Billed"], "5.00");

    Ok(())
}

#[tokio::test]
async fn test_upload_reports_non_text_values_per_row() -> Result<()> {
    let state = create_state(20);
    let mut numeric = create_row("C-2", "10.00");
    numeric.insert("Member Sequence".to_string(), serde_json::json!(1));
    let mut null = create_row("C-3", "10.00");
    null.insert("Billed".to_string(), Value::Null);

    let body = upload_rows(&state, vec![create_row("C-1", "10.00"), numeric, null]).await?;

    assert_eq!(body["count"], 1);
    assert_eq!(body["totalRows"], 3);
    assert_eq!(
        body["errors"],
        serde_json::json!([
            "Row 3: Member Sequence - Invalid format",
            "Row 4: Billed - Invalid billed amount format"
        ])
    );
    assert_eq!(state.store.pending().len(), 1);
    assert_eq!(state.store.pending()[0].claim_id, "C-1");

    Ok(())
}

#[tokio::test]
async fn test_upload_csv_queues_valid_rows() -> Result<()> {
    let state = create_state(20);
    let csv = "Claim ID,Subscriber ID,Member Sequence,Claim Status,Billed,Allowed,Paid,Service Date,Provider ID,Provider Name,Place of Service,Claim Type,Procedure Code,Member Gender\n\
               C-1,S-1,01,Paid,100.00,80.00,64.00,2024-05-01,1111111111,Lakeside,Office,Professional,99213,M\n";

    let Json(response) = upload_csv(State(state.clone()), csv.to_string()).await.map_err(|error| anyhow!("{error}"))?;

    assert_eq!(response.count, 1);
    assert_eq!(response.total_rows, 1);
    assert_eq!(state.store.pending().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_upload_csv_rejects_empty_body() -> Result<()> {
    let state = create_state(20);

    let result = upload_csv(State(state.clone()), String::new()).await;
    let error = result.err().ok_or_else(|| anyhow!("expected an error"))?;
    let (status, body) = read_json(error.into_response()).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(state.store.pending().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_approve_reports_progress_below_threshold() -> Result<()> {
    let state = create_state(3);
    upload_rows(&state, vec![create_row("C-1", "10.00"), create_row("C-2", "10.00")]).await?;

    let response = approve_claims(State(state.clone()), Ok(ids(&["C-1"]))).await.map_err(|error| anyhow!("{error}"))?;
    let (status, body) = read_json(response).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Claims approved and pending MRF generation");
    assert_eq!(body["approvedCount"], 1);
    assert_eq!(body["remainingNeeded"], 2);

    let Json(approved) = list_approved_claims(State(state.clone())).await;
    assert_eq!(approved.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_approve_publishes_file_at_threshold() -> Result<()> {
    let state = create_state(2);
    upload_rows(&state, vec![create_row("C-1", "10.00"), create_row("C-2", "20.00")]).await?;

    let response = approve_claims(State(state.clone()), Ok(ids(&["C-1", "C-2"]))).await.map_err(|error| anyhow!("{error}"))?;
    let (_, body) = read_json(response).await?;

    assert_eq!(body["message"], "MRF file generated successfully");
    assert_eq!(body["mrfFile"]["name"], "MRF_2025-02-03.json");
    assert_eq!(body["mrfFile"]["data"]["version"], "1.0.0");
    assert_eq!(body["mrfFile"]["data"]["reporting_entity_name"], "Sample Healthcare Organization");

    let id = body["mrfFile"]["id"].as_i64().ok_or_else(|| anyhow!("missing id"))?;

    let Json(files) = list_mrf_files(State(state.clone())).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].claims.len(), 1);

    let Json(view) = get_mrf_file(State(state.clone()), Path(id.to_string())).await.map_err(|error| anyhow!("{error}"))?;
    assert_eq!(view.claims, view.data.out_of_network);
    assert_eq!(view.created_at, "2025-02-03T04:05:06.000Z");

    let download = download_mrf_file(State(state.clone()), Path(id.to_string())).await.map_err(|error| anyhow!("{error}"))?;
    assert_eq!(
        download.headers().get(header::CONTENT_DISPOSITION).and_then(|value| value.to_str().ok()),
        Some("attachment; filename=\"MRF_2025-02-03.json\"")
    );
    let (_, document) = read_json(download).await?;
    assert_eq!(document["out_of_network"][0]["billing_code"], "99213");
    assert_eq!(document["out_of_network"][0]["allowed_amounts"][0]["payments"][0]["allowed_amount"], serde_json::json!(80.0));

    Ok(())
}

#[tokio::test]
async fn test_reject_removes_claims_from_pending() -> Result<()> {
    let state = create_state(1);
    upload_rows(&state, vec![create_row("C-1", "10.00"), create_row("C-2", "20.00")]).await?;

    let Json(response) = reject_claims(State(state.clone()), Ok(ids(&["C-2"]))).await.map_err(|error| anyhow!("{error}"))?;

    assert!(response.success);
    assert_eq!(response.message, "Claims rejected");
    assert_eq!(state.store.pending().len(), 1);
    assert!(state.store.mrf_files().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_generate_reports_status_when_threshold_not_met() -> Result<()> {
    let state = create_state(5);

    let response = generate_mrf(State(state.clone())).await.map_err(|error| anyhow!("{error}"))?;
    let (_, body) = read_json(response).await?;

    assert_eq!(body["approvedCount"], 0);
    assert_eq!(body["remainingNeeded"], 5);

    Ok(())
}

#[tokio::test]
async fn test_unknown_or_malformed_mrf_id_is_not_found() -> Result<()> {
    let state = create_state(20);

    for id in ["12345", "not-a-number"] {
        let error = get_mrf_file(State(state.clone()), Path(id.to_string())).await.err().ok_or_else(|| anyhow!("expected an error"))?;
        let (status, body) = read_json(error.into_response()).await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "MRF file not found" }));
    }

    Ok(())
}

#[tokio::test]
async fn test_api_errors_map_to_status_codes() -> Result<()> {
    let (status, body) = read_json(ApiError::InvalidClaims.into_response()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "success": false, "error": "Invalid claims data" }));

    let validation = MrfValidationError { issues: vec!["reporting_entity_name: is required".to_string()] };
    let (status, body) = read_json(ApiError::from(AggregationError::from(validation)).into_response()).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to transform claims to MRF format");
    assert_eq!(body["details"], serde_json::json!(["reporting_entity_name: is required"]));

    Ok(())
}
