// HTTP routes: derived views in http.rs, state-changing actions in actions.rs

mod actions;
mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::alerts::Thresholds;
use crate::cmdb_client::CmdbClient;
use crate::config::AppConfig;
use crate::models::Snapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) client: Arc<CmdbClient>,
    pub(crate) snapshot: Arc<RwLock<Snapshot>>,
    pub(crate) thresholds: Arc<RwLock<Thresholds>>,
    pub(crate) config: AppConfig,
}

pub fn app(
    client: Arc<CmdbClient>,
    snapshot: Arc<RwLock<Snapshot>>,
    thresholds: Arc<RwLock<Thresholds>>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        client,
        snapshot,
        thresholds,
        config,
    };
    Router::new()
        .route("/", get(|| async { "CMDB dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/cluster-groups", get(http::cluster_groups)) // GET /api/cluster-groups
        .route("/api/filter-options", get(http::filter_options)) // GET /api/filter-options
        .route("/api/clusters", get(http::clusters)) // GET /api/clusters
        .route("/api/idc-usage", get(http::idc_usage)) // GET /api/idc-usage
        .route("/api/alerts", get(http::alerts)) // GET /api/alerts
        .route("/api/alert-rows", get(http::alert_rows)) // GET /api/alert-rows
        .route("/api/disk-projections", get(http::disk_projections)) // GET /api/disk-projections
        .route("/api/hosts", get(http::hosts)) // GET /api/hosts
        .route(
            "/api/thresholds",
            get(http::get_thresholds).put(actions::put_thresholds),
        )
        .route("/api/refresh", post(actions::refresh)) // POST /api/refresh
        .route("/api/email-report", post(actions::email_report)) // POST /api/email-report
        .route(
            "/api/reports/cluster-group",
            get(actions::cluster_group_report),
        )
        .route("/api/reports/idc", get(actions::idc_report)) // GET /api/reports/idc
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
