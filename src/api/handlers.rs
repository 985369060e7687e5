use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::state::AppState;
use crate::config::AUTH_NAME;
use crate::db::operations::{get_qualifying_tokens, replace_qualifying_tokens};
use crate::services::scanner;

pub const NO_PAIRS_MSG: &str = "No Pairs Meet The Contract Position Growth Rate Condition";

#[derive(Deserialize)]
pub struct ScanRequest {
    pub name: String,
    pub pwd: String,
}

pub fn verify_credentials(req: &ScanRequest, expected_pwd: &str) -> bool {
    req.name == AUTH_NAME && req.pwd == expected_pwd
}

/// 204 bodies are stripped on the wire by the HTTP stack; the message payload
/// only survives in-process (logs and direct callers of the router).
fn no_pairs_response() -> Response {
    (StatusCode::NO_CONTENT, Json(json!({ "msg": NO_PAIRS_MSG }))).into_response()
}

/// Delivery failure is reported in the body, not the status.
fn notify_failure_response(msg: String) -> Response {
    Json(serde_json::Value::String(msg)).into_response()
}

/// The whole pipeline in one request: auth, scan, replace the stored set,
/// notify. The webhook's own response body is the success payload.
pub async fn run_contract_scan(
    State((binance, db, notifier, config)): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Response, ApiError> {
    if !verify_credentials(&req, &config.auth_pwd) {
        return Err(ApiError::InvalidToken);
    }

    let qualifying = scanner::scan(binance, config.growth_threshold).await?;

    if qualifying.is_empty() {
        tracing::info!("{}", NO_PAIRS_MSG);
        return Ok(no_pairs_response());
    }

    replace_qualifying_tokens(&db, &qualifying)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    match notifier.send_alert(&qualifying).await {
        Ok(body) => Ok(Json(body).into_response()),
        Err(e) => {
            tracing::error!("webhook delivery failed: {:?}", e);
            Ok(notify_failure_response(e.to_string()))
        }
    }
}

/// What the last successful scan persisted.
pub async fn get_qualifying(
    State((_, db, _, _)): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = get_qualifying_tokens(&db)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    let payload =
        serde_json::to_value(records).map_err(|e| ApiError::Database(e.to_string()))?;
    Ok(Json(payload))
}
