// Conjunctive filters over samples and hosts. An empty filter category is a
// no-op (matches everything); that is the select-all-when-empty policy, not
// an accident.

use crate::models::{ClusterGroup, HostPool, ServerResource};

/// Datacenter code from an IP's second dotted octet. Octets "1".."6" map to
/// P1..P6; anything else, including malformed IPs, is "Unknown-IDC".
pub fn idc_from_ip(ip: &str) -> &'static str {
    let mut parts = ip.split('.');
    let second = parts.nth(1);
    match second {
        Some("1") => "P1",
        Some("2") => "P2",
        Some("3") => "P3",
        Some("4") => "P4",
        Some("5") => "P5",
        Some("6") => "P6",
        _ => "Unknown-IDC",
    }
}

/// Filter over resource samples. Every active category must match.
#[derive(Debug, Clone, Default)]
pub struct SampleFilter {
    pub groups: Vec<String>,
    pub departments: Vec<String>,
    pub ip_contains: Option<String>,
    pub datacenters: Vec<String>,
}

impl SampleFilter {
    pub fn matches(&self, sample: &ServerResource) -> bool {
        let group_ok = self.groups.is_empty() || self.groups.contains(&sample.group_name);
        let department_ok =
            self.departments.is_empty() || self.departments.contains(&sample.department_name);
        let ip_ok = match self.ip_contains.as_deref() {
            Some(needle) if !needle.is_empty() => sample.ip.contains(needle),
            _ => true,
        };
        let idc_ok = self.datacenters.is_empty()
            || self.datacenters.iter().any(|d| d == idc_from_ip(&sample.ip));
        group_ok && department_ok && ip_ok && idc_ok
    }

    pub fn apply<'a>(&self, samples: &'a [ServerResource]) -> Vec<&'a ServerResource> {
        samples.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Filter over the host inventory. The application-level categories pass a
/// host when any of its applications matches the selected set.
#[derive(Debug, Clone, Default)]
pub struct HostFilter {
    pub ip_contains: Option<String>,
    pub datacenters: Vec<String>,
    pub app_types: Vec<String>,
    pub departments: Vec<String>,
}

impl HostFilter {
    pub fn matches(&self, host: &HostPool) -> bool {
        let ip_ok = match self.ip_contains.as_deref() {
            Some(needle) if !needle.is_empty() => host.host_ip.contains(needle),
            _ => true,
        };
        let idc_ok = self.datacenters.is_empty()
            || self
                .datacenters
                .iter()
                .any(|d| d == idc_from_ip(&host.host_ip));
        let app_type_ok = self.app_types.is_empty()
            || host
                .host_applications
                .iter()
                .any(|app| self.app_types.contains(&app.server_type));
        let department_ok = self.departments.is_empty()
            || host
                .host_applications
                .iter()
                .any(|app| self.departments.contains(&app.department_name));
        ip_ok && idc_ok && app_type_ok && department_ok
    }

    pub fn apply<'a>(&self, hosts: &'a [HostPool]) -> Vec<&'a HostPool> {
        hosts.iter().filter(|h| self.matches(h)).collect()
    }
}

/// Distinct group names offered for selection, narrowed to the rows matching
/// the currently selected departments. First-seen order.
pub fn group_options(rows: &[ClusterGroup], selected_departments: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        if !selected_departments.is_empty()
            && !selected_departments.contains(&row.department_name)
        {
            continue;
        }
        if !out.contains(&row.group_name) {
            out.push(row.group_name.clone());
        }
    }
    out
}

/// Distinct department names, narrowed to the currently selected groups.
pub fn department_options(rows: &[ClusterGroup], selected_groups: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        if !selected_groups.is_empty() && !selected_groups.contains(&row.group_name) {
            continue;
        }
        if !out.contains(&row.department_name) {
            out.push(row.department_name.clone());
        }
    }
    out
}
