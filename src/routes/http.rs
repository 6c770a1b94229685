// GET handlers: every view recomputes from the latest snapshot and the
// caller's query filters. List-valued params are comma-separated.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::analysis::aggregate::{aggregate_clusters, aggregate_idc};
use crate::analysis::alerts::{banner_alerts, outlier_rows};
use crate::analysis::filter::{HostFilter, SampleFilter, department_options, group_options};
use crate::analysis::projection::{project_disk_full, sort_by_projected_full_date};
use crate::models::ServerResource;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ViewQuery {
    groups: Option<String>,
    departments: Option<String>,
    ip: Option<String>,
    datacenters: Option<String>,
    app_types: Option<String>,
    sort: Option<String>,
}

fn csv(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ViewQuery {
    fn sample_filter(&self) -> SampleFilter {
        SampleFilter {
            groups: csv(&self.groups),
            departments: csv(&self.departments),
            ip_contains: self.ip.clone(),
            datacenters: csv(&self.datacenters),
        }
    }

    fn host_filter(&self) -> HostFilter {
        HostFilter {
            ip_contains: self.ip.clone(),
            datacenters: csv(&self.datacenters),
            app_types: csv(&self.app_types),
            departments: csv(&self.departments),
        }
    }
}

/// GET /api/cluster-groups — the cached mapping rows as fetched.
pub(super) async fn cluster_groups(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    axum::Json(snap.cluster_groups.clone())
}

/// GET /api/filter-options — group/department select options, each narrowed
/// by the other selection.
pub(super) async fn filter_options(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let selected_groups = csv(&query.groups);
    let selected_departments = csv(&query.departments);
    axum::Json(serde_json::json!({
        "groups": group_options(&snap.cluster_groups, &selected_departments),
        "departments": department_options(&snap.cluster_groups, &selected_groups),
    }))
}

/// GET /api/clusters — one aggregate per cluster over the filtered samples.
pub(super) async fn clusters(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let filtered = query.sample_filter().apply(&snap.resources);
    axum::Json(aggregate_clusters(filtered.into_iter()))
}

/// GET /api/idc-usage — per-datacenter means over all samples.
pub(super) async fn idc_usage(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    axum::Json(aggregate_idc(snap.resources.iter()))
}

/// GET /api/alerts — banner alerts over all samples, narrowed by group only.
pub(super) async fn alerts(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let thresholds = *state.thresholds.read().await;
    let selected_groups = csv(&query.groups);
    axum::Json(banner_alerts(&snap.resources, &selected_groups, &thresholds))
}

#[derive(Debug, Serialize)]
struct AlertRow {
    id: u64,
    instance_id: String,
    ip: String,
    cluster_name: String,
    cpu_usage: f64,
    memory_usage: f64,
    disk_usage: f64,
}

impl AlertRow {
    fn from_sample(sample: &ServerResource) -> Self {
        Self {
            id: sample.id,
            instance_id: sample.instance_id.clone(),
            ip: sample.ip.clone(),
            cluster_name: sample.cluster_name.clone(),
            cpu_usage: sample.cpu_usage_percent(),
            memory_usage: sample.memory_usage_percent(),
            disk_usage: sample.disk_usage_percent(),
        }
    }
}

/// GET /api/alert-rows — samples with any metric outside the watermarks,
/// after the usual conjunctive filters.
pub(super) async fn alert_rows(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let thresholds = *state.thresholds.read().await;
    let filtered = query.sample_filter().apply(&snap.resources);
    let rows: Vec<AlertRow> = outlier_rows(&filtered, &thresholds)
        .into_iter()
        .map(AlertRow::from_sample)
        .collect();
    axum::Json(rows)
}

#[derive(Debug, Serialize)]
struct ProjectionRow {
    id: u64,
    instance_id: String,
    ip: String,
    cluster_name: String,
    disk_usage: f64,
    /// None when the fill rate is zero (never full).
    predicted_full_date: Option<DateTime<Utc>>,
}

/// GET /api/disk-projections — linear disk-full projection per filtered
/// sample; `sort=full_date` orders by the recomputed projection.
pub(super) async fn disk_projections(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let mut filtered = query.sample_filter().apply(&snap.resources);
    let now = Utc::now();
    if query.sort.as_deref() == Some("full_date") {
        sort_by_projected_full_date(&mut filtered, now);
    }
    let rows: Vec<ProjectionRow> = filtered
        .into_iter()
        .map(|sample| ProjectionRow {
            id: sample.id,
            instance_id: sample.instance_id.clone(),
            ip: sample.ip.clone(),
            cluster_name: sample.cluster_name.clone(),
            disk_usage: sample.disk_usage_percent(),
            predicted_full_date: project_disk_full(sample, now).full_date(),
        })
        .collect();
    axum::Json(rows)
}

/// GET /api/hosts — filtered inventory plus the last inventory fetch error.
pub(super) async fn hosts(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let snap = state.snapshot.read().await;
    let filtered: Vec<_> = query
        .host_filter()
        .apply(&snap.hosts)
        .into_iter()
        .cloned()
        .collect();
    axum::Json(serde_json::json!({
        "hosts": filtered,
        "error": snap.last_error,
    }))
}

/// GET /api/thresholds — current watermark pair and revision.
pub(super) async fn get_thresholds(State(state): State<AppState>) -> impl IntoResponse {
    let thresholds = *state.thresholds.read().await;
    axum::Json(thresholds)
}
