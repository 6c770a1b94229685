use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resource sample for one database instance at a point in time.
/// Wire names are snake_case, matching the backend's JSON tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerResource {
    pub id: u64,
    /// Not every backend row carries these; missing fields default.
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub cluster_id: u64,
    #[serde(default)]
    pub pool_id: u64,
    pub cluster_name: String,
    pub group_name: String,
    #[serde(default)]
    pub department_name: String,
    pub ip: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub instance_role: String,
    /// Capacities and usage in GB. `used <= total` is assumed from upstream,
    /// not enforced here.
    pub total_memory: f64,
    pub used_memory: f64,
    pub total_disk: f64,
    pub used_disk: f64,
    #[serde(default)]
    pub cpu_cores: i32,
    /// Already a percentage on the 0-100 scale.
    pub cpu_load: f64,
    pub date_time: DateTime<Utc>,
}

impl ServerResource {
    pub fn memory_usage_percent(&self) -> f64 {
        (self.used_memory / self.total_memory) * 100.0
    }

    pub fn disk_usage_percent(&self) -> f64 {
        (self.used_disk / self.total_disk) * 100.0
    }

    pub fn cpu_usage_percent(&self) -> f64 {
        self.cpu_load
    }
}

/// Group/cluster/department mapping row, used to populate filter options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub id: u64,
    pub group_name: String,
    pub cluster_name: String,
    pub department_name: String,
}
