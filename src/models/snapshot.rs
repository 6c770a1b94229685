use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClusterGroup, HostPool, ServerResource};

/// The latest data fetched from the backend. All derived views recompute from
/// this synchronously; nothing else is cached.
///
/// Refreshes are not serialized against each other: a slow date-range fetch
/// can land after (and overwrite) a newer periodic refresh. Last write wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub fetched_at: Option<DateTime<Utc>>,
    pub cluster_groups: Vec<ClusterGroup>,
    pub resources: Vec<ServerResource>,
    pub hosts: Vec<HostPool>,
    /// Set when the inventory fetch failed; surfaced on the hosts view.
    pub last_error: Option<String>,
}
