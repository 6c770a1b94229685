// Grouping folds over the filtered sample set: per-cluster aggregates for the
// usage view, per-IDC means for the datacenter report.

use std::collections::HashMap;

use crate::models::{ClusterAggregate, IdcUsage, ServerResource};

use super::filter::idc_from_ip;

/// Folds samples into one aggregate per distinct cluster name, in first-seen
/// order. Usage percentages are computed per sample before folding, so the
/// mean is a mean of ratios; CPU capacity counts as 100 per sample.
pub fn aggregate_clusters<'a, I>(samples: I) -> Vec<ClusterAggregate>
where
    I: IntoIterator<Item = &'a ServerResource>,
{
    let mut order: Vec<ClusterAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let memory_usage = sample.memory_usage_percent();
        let disk_usage = sample.disk_usage_percent();
        let cpu_usage = sample.cpu_usage_percent();

        match index.get(&sample.cluster_name) {
            Some(&i) => {
                let agg = &mut order[i];
                agg.memory += memory_usage;
                agg.memory_total += sample.total_memory;
                agg.memory_used += sample.used_memory;
                agg.disk += disk_usage;
                agg.disk_total += sample.total_disk;
                agg.disk_used += sample.used_disk;
                agg.cpu += cpu_usage;
                agg.cpu_total += 100.0;
                agg.cpu_used += sample.cpu_load;
                agg.count += 1;
                agg.max_memory = agg.max_memory.max(memory_usage);
                agg.max_disk = agg.max_disk.max(disk_usage);
                agg.max_cpu = agg.max_cpu.max(cpu_usage);
            }
            None => {
                index.insert(sample.cluster_name.clone(), order.len());
                order.push(ClusterAggregate {
                    cluster_name: sample.cluster_name.clone(),
                    group_name: sample.group_name.clone(),
                    memory: memory_usage,
                    memory_total: sample.total_memory,
                    memory_used: sample.used_memory,
                    disk: disk_usage,
                    disk_total: sample.total_disk,
                    disk_used: sample.used_disk,
                    cpu: cpu_usage,
                    cpu_total: 100.0,
                    cpu_used: sample.cpu_load,
                    count: 1,
                    max_memory: memory_usage,
                    max_disk: disk_usage,
                    max_cpu: cpu_usage,
                });
            }
        }
    }

    // Second pass: sums -> means.
    for agg in &mut order {
        let n = agg.count as f64;
        agg.memory /= n;
        agg.disk /= n;
        agg.cpu /= n;
    }
    order
}

/// Folds samples into per-datacenter means, sorted by IDC name.
pub fn aggregate_idc<'a, I>(samples: I) -> Vec<IdcUsage>
where
    I: IntoIterator<Item = &'a ServerResource>,
{
    let mut stats: HashMap<&'static str, IdcUsage> = HashMap::new();
    for sample in samples {
        let idc_name = idc_from_ip(&sample.ip);
        let usage = stats.entry(idc_name).or_insert_with(|| IdcUsage {
            idc_name: idc_name.to_string(),
            total_instances: 0,
            avg_cpu_usage: 0.0,
            avg_memory_usage: 0.0,
            avg_disk_usage: 0.0,
        });
        usage.total_instances += 1;
        usage.avg_cpu_usage += sample.cpu_usage_percent();
        usage.avg_memory_usage += sample.memory_usage_percent();
        usage.avg_disk_usage += sample.disk_usage_percent();
    }

    let mut out: Vec<IdcUsage> = stats.into_values().collect();
    for usage in &mut out {
        let n = usage.total_instances as f64;
        usage.avg_cpu_usage /= n;
        usage.avg_memory_usage /= n;
        usage.avg_disk_usage /= n;
    }
    out.sort_by(|a, b| a.idc_name.cmp(&b.idc_name));
    out
}
