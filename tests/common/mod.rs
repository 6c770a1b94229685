// Shared sample builders for the pipeline tests.

use chrono::{TimeZone, Utc};
use cmdb_dashboard::models::ServerResource;

/// A sample with sensible defaults; override what a test cares about.
pub fn sample(cluster: &str, group: &str) -> ServerResource {
    ServerResource {
        id: 1,
        instance_id: "inst-1".to_string(),
        cluster_id: 1,
        pool_id: 1,
        cluster_name: cluster.to_string(),
        group_name: group.to_string(),
        department_name: "dba".to_string(),
        ip: "10.1.0.1".to_string(),
        port: 3306,
        instance_role: "master".to_string(),
        total_memory: 10.0,
        used_memory: 5.0,
        total_disk: 100.0,
        used_disk: 50.0,
        cpu_cores: 8,
        cpu_load: 50.0,
        date_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn with_memory(mut s: ServerResource, used: f64, total: f64) -> ServerResource {
    s.used_memory = used;
    s.total_memory = total;
    s
}

pub fn with_disk(mut s: ServerResource, used: f64, total: f64) -> ServerResource {
    s.used_disk = used;
    s.total_disk = total;
    s
}

pub fn with_cpu(mut s: ServerResource, load: f64) -> ServerResource {
    s.cpu_load = load;
    s
}

pub fn with_ip(mut s: ServerResource, ip: &str) -> ServerResource {
    s.ip = ip.to_string();
    s
}
