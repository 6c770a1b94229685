// Background refresh worker: refetches the backend snapshot on an interval
// and logs app stats periodically. Refreshes are fire-and-forget against each
// other; nothing cancels or orders an in-flight fetch relative to a newer one.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{Duration, interval};

use crate::cmdb_client::CmdbClient;
use crate::models::Snapshot;

pub struct WorkerDeps {
    pub client: Arc<CmdbClient>,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub refresh_interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        client,
        snapshot,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(config.refresh_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut refreshes_total: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    refresh_snapshot(&client, &snapshot).await;
                    refreshes_total += 1;
                }
                _ = stats_log_tick.tick() => {
                    let snap = snapshot.read().await;
                    tracing::info!(
                        refreshes_total,
                        samples = snap.resources.len(),
                        hosts = snap.hosts.len(),
                        cluster_groups = snap.cluster_groups.len(),
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    })
}

/// One full refresh: cluster groups, samples, host inventory. Each fetch
/// degrades independently to an empty set on failure; only the inventory
/// failure is surfaced to clients via `last_error`.
pub async fn refresh_snapshot(client: &CmdbClient, snapshot: &RwLock<Snapshot>) {
    let cluster_groups = match client.cluster_groups().await {
        Ok(groups) => groups,
        Err(e) => {
            tracing::warn!(error = %e, operation = "cluster_groups", "cluster group fetch failed");
            Vec::new()
        }
    };
    let resources = match client.server_resources(None).await {
        Ok(resources) => resources,
        Err(e) => {
            tracing::warn!(error = %e, operation = "server_resources", "resource fetch failed");
            Vec::new()
        }
    };
    let (hosts, last_error) = match client.hosts_pool().await {
        Ok(hosts) => (hosts, None),
        Err(e) => {
            tracing::warn!(error = %e, operation = "hosts_pool", "host inventory fetch failed");
            (Vec::new(), Some("Failed to fetch hosts data".to_string()))
        }
    };

    let mut snap = snapshot.write().await;
    snap.fetched_at = Some(chrono::Utc::now());
    snap.cluster_groups = cluster_groups;
    snap.resources = resources;
    snap.hosts = hosts;
    snap.last_error = last_error;
}

/// Range refresh: replaces only the sample set, leaving inventory and cluster
/// groups as-is. Returns the new sample count; a failed fetch degrades to an
/// empty set, same as the original dashboard.
pub async fn refresh_resources(
    client: &CmdbClient,
    snapshot: &RwLock<Snapshot>,
    range: Option<(&str, &str)>,
) -> usize {
    let resources = match client.server_resources(range).await {
        Ok(resources) => resources,
        Err(e) => {
            tracing::warn!(error = %e, operation = "server_resources", "resource fetch failed");
            Vec::new()
        }
    };
    let count = resources.len();
    let mut snap = snapshot.write().await;
    snap.fetched_at = Some(chrono::Utc::now());
    snap.resources = resources;
    count
}
