// Route tests: views recomputed from a seeded snapshot, the threshold update
// guard, and the actions that talk to a stub CMDB backend.

mod common;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum_test::TestServer;
use bytes::Bytes;
use cmdb_dashboard::analysis::alerts::Thresholds;
use cmdb_dashboard::cmdb_client::CmdbClient;
use cmdb_dashboard::config::AppConfig;
use cmdb_dashboard::models::{ClusterGroup, Snapshot};
use cmdb_dashboard::routes;
use common::{sample, with_cpu, with_disk, with_ip, with_memory};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[upstream]
base_url = "http://127.0.0.1:1"

[monitoring]
refresh_interval_secs = 60
stats_log_interval_secs = 60

[email]
subject = "Server resource usage report"
"#;

fn seeded_snapshot() -> Snapshot {
    Snapshot {
        fetched_at: Some(chrono::Utc::now()),
        cluster_groups: vec![
            ClusterGroup {
                id: 1,
                group_name: "G1".to_string(),
                cluster_name: "C1".to_string(),
                department_name: "dba".to_string(),
            },
            ClusterGroup {
                id: 2,
                group_name: "G2".to_string(),
                cluster_name: "C2".to_string(),
                department_name: "ops".to_string(),
            },
        ],
        resources: vec![
            with_memory(with_ip(sample("C1", "G1"), "10.1.0.1"), 5.0, 10.0),
            with_memory(with_ip(sample("C1", "G1"), "10.1.0.2"), 7.0, 10.0),
            with_cpu(with_ip(sample("C2", "G2"), "10.3.0.1"), 95.0),
        ],
        hosts: vec![],
        last_error: None,
    }
}

/// Dashboard app over a given snapshot and a client pointed at `base_url`.
fn test_app(base_url: &str, snapshot: Snapshot) -> axum::Router {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let client = Arc::new(CmdbClient::new(base_url, 5).unwrap());
    let snapshot = Arc::new(RwLock::new(snapshot));
    let thresholds = Arc::new(RwLock::new(Thresholds::new(10.0, 80.0).unwrap()));
    routes::app(client, snapshot, thresholds, config)
}

fn test_server(snapshot: Snapshot) -> TestServer {
    TestServer::new(test_app("http://127.0.0.1:1", snapshot)).unwrap()
}

/// Serves a minimal CMDB backend on a loopback port; returns its base URL.
async fn spawn_stub_backend() -> String {
    let resources_full = vec![
        with_ip(sample("C9", "G9"), "10.5.0.1"),
        with_ip(sample("C9", "G9"), "10.5.0.2"),
    ];
    let resources_ranged = vec![with_ip(sample("C9", "G9"), "10.5.0.1")];

    let app = axum::Router::new()
        .route(
            "/api/cmdb/v1/server-resources",
            get(
                move |axum::extract::Query(params): axum::extract::Query<
                    std::collections::HashMap<String, String>,
                >| {
                    let body = if params.contains_key("startDate") {
                        serde_json::to_value(&resources_ranged).unwrap()
                    } else {
                        serde_json::to_value(&resources_full).unwrap()
                    };
                    async move { axum::Json(body) }
                },
            ),
        )
        .route(
            "/api/cmdb/v1/send-email",
            post(|| async { axum::Json(json!({ "success": true })) }),
        )
        .route(
            "/api/cluster-group-report",
            get(|| async { Bytes::from_static(b"PK\x03\x04 stub xlsx") }),
        )
        .route(
            "/api/idc-report",
            get(|| async { Bytes::from_static(b"PK\x03\x04 stub xlsx") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = test_server(Snapshot::default());
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("CMDB dashboard");
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server(Snapshot::default());
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("cmdb-dashboard")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_cluster_groups_view() {
    let server = test_server(seeded_snapshot());
    let response = server.get("/api/cluster-groups").await;
    response.assert_status_ok();
    let rows: Vec<ClusterGroup> = response.json();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].group_name, "G1");
}

#[tokio::test]
async fn test_filter_options_narrowing() {
    let server = test_server(seeded_snapshot());
    let response = server
        .get("/api/filter-options")
        .add_query_param("departments", "ops")
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["groups"], json!(["G2"]));
    assert_eq!(json["departments"], json!(["dba", "ops"]));
}

#[tokio::test]
async fn test_clusters_view_aggregates() {
    let server = test_server(seeded_snapshot());
    let response = server.get("/api/clusters").await;
    response.assert_status_ok();
    let json: Value = response.json();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // C1: memory ratios 50% and 70% -> mean 60, max 70, count 2.
    assert_eq!(rows[0]["cluster_name"], "C1");
    assert_eq!(rows[0]["count"], 2);
    assert!((rows[0]["memory"].as_f64().unwrap() - 60.0).abs() < 1e-9);
    assert_eq!(rows[0]["max_memory"].as_f64().unwrap(), 70.0);
}

#[tokio::test]
async fn test_clusters_view_group_filter() {
    let server = test_server(seeded_snapshot());
    let response = server
        .get("/api/clusters")
        .add_query_param("groups", "G2")
        .await;
    let json: Value = response.json();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cluster_name"], "C2");
}

#[tokio::test]
async fn test_alerts_view_narrowed_by_group() {
    // C2's CPU is at 95% (> 80): one high banner.
    let server = test_server(seeded_snapshot());
    let response = server.get("/api/alerts").add_query_param("groups", "G2").await;
    response.assert_status_ok();
    let json: Value = response.json();
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["metric"], "cpu");
    assert_eq!(alerts[0]["severity"], "high");
    assert!(alerts[0]["message"].as_str().unwrap().contains("10.3.0.1"));
}

#[tokio::test]
async fn test_alert_rows_view() {
    let server = test_server(seeded_snapshot());
    let response = server.get("/api/alert-rows").await;
    response.assert_status_ok();
    let json: Value = response.json();
    let rows = json.as_array().unwrap();
    // Only the 95% CPU sample is out of band.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["ip"], "10.3.0.1");
    assert_eq!(rows[0]["cpu_usage"].as_f64().unwrap(), 95.0);
}

#[tokio::test]
async fn test_disk_projections_view_with_never_full() {
    let mut snapshot = seeded_snapshot();
    snapshot.resources = vec![
        with_disk(with_ip(sample("C1", "G1"), "10.1.0.1"), 90.0, 100.0),
        with_disk(with_ip(sample("C1", "G1"), "10.1.0.2"), 0.0, 100.0),
    ];
    let server = test_server(snapshot);
    let response = server
        .get("/api/disk-projections")
        .add_query_param("sort", "full_date")
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Never-full rows sort last and carry a null date.
    assert_eq!(rows[0]["ip"], "10.1.0.1");
    assert!(rows[0]["predicted_full_date"].is_string());
    assert_eq!(rows[1]["ip"], "10.1.0.2");
    assert!(rows[1]["predicted_full_date"].is_null());
}

#[tokio::test]
async fn test_hosts_view_surfaces_last_error() {
    let mut snapshot = Snapshot::default();
    snapshot.last_error = Some("Failed to fetch hosts data".to_string());
    let server = test_server(snapshot);
    let response = server.get("/api/hosts").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["hosts"], json!([]));
    assert_eq!(json["error"], "Failed to fetch hosts data");
}

#[tokio::test]
async fn test_get_thresholds() {
    let server = test_server(Snapshot::default());
    let response = server.get("/api/thresholds").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["low"].as_f64().unwrap(), 10.0);
    assert_eq!(json["high"].as_f64().unwrap(), 80.0);
    assert_eq!(json["revision"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn test_put_thresholds_accepts_valid_update() {
    let server = test_server(Snapshot::default());
    let response = server
        .put("/api/thresholds")
        .json(&json!({ "low": 20.0, "high": 90.0 }))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["low"].as_f64().unwrap(), 20.0);
    assert_eq!(json["high"].as_f64().unwrap(), 90.0);
    assert_eq!(json["revision"].as_u64().unwrap(), 2);
}

#[tokio::test]
async fn test_put_thresholds_rejects_low_at_high_and_keeps_state() {
    let server = test_server(Snapshot::default());
    let response = server.put("/api/thresholds").json(&json!({ "low": 80.0 })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("low threshold"));

    let current: Value = server.get("/api/thresholds").await.json();
    assert_eq!(current["low"].as_f64().unwrap(), 10.0);
    assert_eq!(current["high"].as_f64().unwrap(), 80.0);
    assert_eq!(current["revision"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn test_put_thresholds_validates_low_against_the_standing_high() {
    // Setters apply sequentially, low first: a combined update that moves the
    // whole band above the current high is rejected and takes two requests.
    let server = test_server(Snapshot::default());
    let response = server
        .put("/api/thresholds")
        .json(&json!({ "low": 90.0, "high": 100.0 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let current: Value = server.get("/api/thresholds").await.json();
    assert_eq!(current["low"].as_f64().unwrap(), 10.0);
    assert_eq!(current["high"].as_f64().unwrap(), 80.0);

    server
        .put("/api/thresholds")
        .json(&json!({ "high": 100.0 }))
        .await
        .assert_status_ok();
    server
        .put("/api/thresholds")
        .json(&json!({ "low": 90.0 }))
        .await
        .assert_status_ok();
    let current: Value = server.get("/api/thresholds").await.json();
    assert_eq!(current["low"].as_f64().unwrap(), 90.0);
    assert_eq!(current["high"].as_f64().unwrap(), 100.0);
}

#[tokio::test]
async fn test_put_thresholds_is_atomic_across_both_fields() {
    // Valid low plus invalid high: neither applies.
    let server = test_server(Snapshot::default());
    let response = server
        .put("/api/thresholds")
        .json(&json!({ "low": 5.0, "high": 4.0 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let current: Value = server.get("/api/thresholds").await.json();
    assert_eq!(current["low"].as_f64().unwrap(), 10.0);
    assert_eq!(current["high"].as_f64().unwrap(), 80.0);
}

#[tokio::test]
async fn test_refresh_replaces_samples_from_backend() {
    let base_url = spawn_stub_backend().await;
    let server = TestServer::new(test_app(&base_url, Snapshot::default())).unwrap();

    let response = server.post("/api/refresh").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["count"], 2);

    let clusters: Value = server.get("/api/clusters").await.json();
    assert_eq!(clusters.as_array().unwrap().len(), 1);
    assert_eq!(clusters[0]["cluster_name"], "C9");
    assert_eq!(clusters[0]["count"], 2);
}

#[tokio::test]
async fn test_refresh_with_date_range() {
    let base_url = spawn_stub_backend().await;
    let server = TestServer::new(test_app(&base_url, Snapshot::default())).unwrap();

    let response = server
        .post("/api/refresh")
        .add_query_param("start_date", "2024-06-01")
        .add_query_param("end_date", "2024-06-30")
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_refresh_degrades_to_empty_when_backend_is_down() {
    // Port 1 refuses connections; the sample set degrades to empty.
    let server = test_server(seeded_snapshot());
    let response = server.post("/api/refresh").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_email_report_relays_through_backend() {
    let base_url = spawn_stub_backend().await;
    let server = TestServer::new(test_app(&base_url, seeded_snapshot())).unwrap();

    let response = server
        .post("/api/email-report")
        .json(&json!({ "to": "dba@example.com" }))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_email_report_requires_a_recipient() {
    let server = test_server(seeded_snapshot());
    let response = server.post("/api/email-report").json(&json!({})).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert_eq!(json["error"], "email address required");
}

#[tokio::test]
async fn test_email_report_failure_is_a_single_outcome() {
    // Backend unreachable: success=false, no retry, HTTP 200.
    let server = test_server(seeded_snapshot());
    let response = server
        .post("/api/email-report")
        .json(&json!({ "to": "dba@example.com" }))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_report_proxy_sets_download_headers() {
    let base_url = spawn_stub_backend().await;
    let server = TestServer::new(test_app(&base_url, Snapshot::default())).unwrap();

    let response = server.get("/api/reports/cluster-group").await;
    response.assert_status_ok();
    let disposition = response
        .headers()
        .get(axum::http::header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("cluster_group_report.xlsx"));
    assert_eq!(response.as_bytes().as_ref(), b"PK\x03\x04 stub xlsx");
}

#[tokio::test]
async fn test_report_proxy_maps_upstream_failure_to_bad_gateway() {
    let server = test_server(Snapshot::default());
    let response = server.get("/api/reports/idc").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}
