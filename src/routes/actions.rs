// State-changing handlers: threshold updates, snapshot refresh, the emailed
// report, and the spreadsheet download proxies.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::analysis::aggregate::aggregate_clusters;
use crate::analysis::alerts::banner_alerts;
use crate::report::render_email_report;
use crate::worker;

#[derive(Debug, Deserialize)]
pub(super) struct ThresholdUpdate {
    low: Option<f64>,
    high: Option<f64>,
}

/// PUT /api/thresholds — applies the provided watermark(s) sequentially, low
/// first, each validated against the pair as it stands at that point. This
/// mirrors the original dashboard's independent setters: moving the whole band
/// above the current high (e.g. `{low: 90, high: 100}` over `(10, 80)`) is
/// rejected and takes two requests, high first. A violation returns 422 with
/// the user-facing message and changes nothing, even when the other value in
/// the same request would have been valid.
pub(super) async fn put_thresholds(
    State(state): State<AppState>,
    axum::Json(update): axum::Json<ThresholdUpdate>,
) -> impl IntoResponse {
    let mut guard = state.thresholds.write().await;
    let mut candidate = *guard;
    let result = (|| {
        if let Some(low) = update.low {
            candidate.set_low(low)?;
        }
        if let Some(high) = update.high {
            candidate.set_high(high)?;
        }
        Ok::<_, crate::analysis::alerts::ThresholdError>(())
    })();
    match result {
        Ok(()) => {
            *guard = candidate;
            axum::Json(*guard).into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RefreshQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// POST /api/refresh — refetches samples, optionally for a date range.
/// Concurrent refreshes are not serialized; the last response to land wins.
pub(super) async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> impl IntoResponse {
    let range = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    let count = worker::refresh_resources(&state.client, &state.snapshot, range).await;
    axum::Json(serde_json::json!({ "count": count }))
}

#[derive(Debug, Deserialize)]
pub(super) struct EmailRequest {
    to: Option<String>,
}

/// POST /api/email-report — renders the current cluster usage and alerts as
/// HTML and relays it through the backend mailer. One success/failure
/// outcome, no retry.
pub(super) async fn email_report(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<EmailRequest>,
) -> impl IntoResponse {
    let recipient = request
        .to
        .or_else(|| state.config.email.default_recipient.clone());
    let Some(recipient) = recipient else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(serde_json::json!({ "error": "email address required" })),
        )
            .into_response();
    };

    let content = {
        let snap = state.snapshot.read().await;
        let thresholds = *state.thresholds.read().await;
        let aggregates = aggregate_clusters(snap.resources.iter());
        let alerts = banner_alerts(&snap.resources, &[], &thresholds);
        render_email_report(&aggregates, &alerts)
    };

    match state
        .client
        .send_email(&recipient, &state.config.email.subject, &content)
        .await
    {
        Ok(success) => axum::Json(serde_json::json!({ "success": success })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "send_email", "email relay failed");
            axum::Json(serde_json::json!({ "success": false })).into_response()
        }
    }
}

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /api/reports/cluster-group — proxies the backend spreadsheet through.
pub(super) async fn cluster_group_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.cluster_group_report().await {
        Ok(bytes) => spreadsheet_response("cluster_group_report.xlsx", bytes).into_response(),
        Err(e) => report_error(e).into_response(),
    }
}

/// GET /api/reports/idc — proxies the backend IDC spreadsheet through.
pub(super) async fn idc_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.idc_report().await {
        Ok(bytes) => spreadsheet_response("idc_report.xlsx", bytes).into_response(),
        Err(e) => report_error(e).into_response(),
    }
}

fn spreadsheet_response(filename: &str, bytes: bytes::Bytes) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        bytes,
    )
}

fn report_error(e: anyhow::Error) -> impl IntoResponse {
    tracing::warn!(error = %e, operation = "report_download", "report download failed");
    (
        StatusCode::BAD_GATEWAY,
        axum::Json(serde_json::json!({ "error": "report download failed" })),
    )
}
