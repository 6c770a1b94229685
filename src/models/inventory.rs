// Host inventory: one HostPool row per physical/virtual host, with the
// service instances deployed on it nested as HostApplication rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostPool {
    pub id: u64,
    pub host_name: String,
    pub host_ip: String,
    /// "0" = cloud host, anything else = bare metal.
    #[serde(default)]
    pub host_type: String,
    #[serde(default)]
    pub h3c_id: String,
    #[serde(default)]
    pub h3c_status: String,
    #[serde(default)]
    pub disk_size: u64,
    #[serde(default)]
    pub ram: u64,
    #[serde(default)]
    pub vcpus: u64,
    #[serde(default)]
    pub if_h3c_sync: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub rack_number: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub host_applications: Vec<HostApplication>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostApplication {
    pub id: u64,
    #[serde(default)]
    pub pool_id: u64,
    pub server_type: String,
    #[serde(default)]
    pub server_version: String,
    #[serde(default)]
    pub server_subtitle: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub server_protocol: String,
    #[serde(default)]
    pub server_addr: String,
    #[serde(default)]
    pub server_port: u16,
    #[serde(default)]
    pub server_role: String,
    #[serde(default)]
    pub server_status: String,
    pub department_name: String,
}
