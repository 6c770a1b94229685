// Derived view records. Rebuilt from scratch on every request; never persisted.

use serde::{Deserialize, Serialize};

/// Accumulated resource usage for one cluster.
///
/// `memory`/`disk`/`cpu` are arithmetic means of per-sample usage percentages
/// (not ratios of summed capacity), so small and large instances weigh the
/// same. The `*_total`/`*_used` fields are absolute running sums in GB, with
/// CPU capacity counted as 100 per sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAggregate {
    pub cluster_name: String,
    pub group_name: String,
    pub memory: f64,
    pub memory_total: f64,
    pub memory_used: f64,
    pub disk: f64,
    pub disk_total: f64,
    pub disk_used: f64,
    pub cpu: f64,
    pub cpu_total: f64,
    pub cpu_used: f64,
    pub max_memory: f64,
    pub max_disk: f64,
    pub max_cpu: f64,
    pub count: u32,
}

/// Mean resource usage for one datacenter (IDC), keyed by the code derived
/// from the second IP octet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdcUsage {
    pub idc_name: String,
    pub total_instances: u32,
    pub avg_cpu_usage: f64,
    pub avg_memory_usage: f64,
    pub avg_disk_usage: f64,
}
