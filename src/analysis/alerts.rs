// Threshold classification. Two consumers share one threshold pair: the
// banner list (one entry per out-of-band metric) and the outlier-row filter
// (one row per sample with any out-of-band metric). Both use strict
// inequalities; a metric exactly at a threshold is in band.

use serde::{Deserialize, Serialize};

use crate::models::ServerResource;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ThresholdError {
    #[error("low threshold must stay below the high threshold ({high}%)")]
    LowNotBelowHigh { high: f64 },
    #[error("high threshold must stay above the low threshold ({low}%)")]
    HighNotAboveLow { low: f64 },
}

/// The low/high watermark pair, with `low < high` enforced at every mutation.
/// A rejected update leaves both values untouched.
///
/// `revision` increases on every accepted set, including re-assertions of the
/// current value, so consumers can detect that thresholds were (re)applied.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Thresholds {
    low: f64,
    high: f64,
    revision: u64,
}

impl Thresholds {
    pub fn new(low: f64, high: f64) -> Result<Self, ThresholdError> {
        if low >= high {
            return Err(ThresholdError::LowNotBelowHigh { high });
        }
        Ok(Self {
            low,
            high,
            revision: 0,
        })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_low(&mut self, value: f64) -> Result<(), ThresholdError> {
        if value >= self.high {
            return Err(ThresholdError::LowNotBelowHigh { high: self.high });
        }
        self.low = value;
        self.revision += 1;
        Ok(())
    }

    pub fn set_high(&mut self, value: f64) -> Result<(), ThresholdError> {
        if value <= self.low {
            return Err(ThresholdError::HighNotAboveLow { low: self.low });
        }
        self.high = value;
        self.revision += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Memory,
    Disk,
    Cpu,
}

impl Metric {
    fn label(self) -> &'static str {
        match self {
            Metric::Memory => "memory",
            Metric::Disk => "disk",
            Metric::Cpu => "CPU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Low,
}

/// One banner: a single metric of a single sample outside the watermarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAlert {
    pub metric: Metric,
    pub severity: Severity,
    pub ip: String,
    pub cluster_name: String,
    pub usage_percent: f64,
    pub message: String,
}

/// Evaluates one sample's three metrics against the thresholds, in the fixed
/// order memory, disk, CPU; per metric, high is checked before low, so a
/// metric never yields both. Zero to three alerts per sample.
pub fn classify_sample(sample: &ServerResource, thresholds: &Thresholds) -> Vec<ResourceAlert> {
    let metrics = [
        (Metric::Memory, sample.memory_usage_percent()),
        (Metric::Disk, sample.disk_usage_percent()),
        (Metric::Cpu, sample.cpu_usage_percent()),
    ];

    let mut alerts = Vec::new();
    for (metric, usage) in metrics {
        let severity = if usage > thresholds.high() {
            Severity::High
        } else if usage < thresholds.low() {
            Severity::Low
        } else {
            continue;
        };
        alerts.push(ResourceAlert {
            metric,
            severity,
            ip: sample.ip.clone(),
            cluster_name: sample.cluster_name.clone(),
            usage_percent: usage,
            message: banner_message(sample, metric, severity, usage, thresholds),
        });
    }
    alerts
}

fn banner_message(
    sample: &ServerResource,
    metric: Metric,
    severity: Severity,
    usage: f64,
    thresholds: &Thresholds,
) -> String {
    let prefix = format!(
        "{} ({} {})",
        sample.ip, sample.group_name, sample.cluster_name
    );
    let absolute = match metric {
        Metric::Memory => format!(
            " ({:.2}GB/{:.2}GB)",
            sample.used_memory, sample.total_memory
        ),
        Metric::Disk => format!(" ({:.2}GB/{:.2}GB)", sample.used_disk, sample.total_disk),
        Metric::Cpu => String::new(),
    };
    let verdict = match severity {
        Severity::High => format!("warning: above {}% threshold", thresholds.high()),
        Severity::Low => format!("notice: below {}% threshold", thresholds.low()),
    };
    format!(
        "{} | {}: {:.2}%{} | {}",
        prefix,
        metric.label(),
        usage,
        absolute,
        verdict
    )
}

/// Banner alerts for every sample, after the optional group narrowing. An
/// empty group selection means all groups.
pub fn banner_alerts(
    samples: &[ServerResource],
    selected_groups: &[String],
    thresholds: &Thresholds,
) -> Vec<ResourceAlert> {
    samples
        .iter()
        .filter(|s| selected_groups.is_empty() || selected_groups.contains(&s.group_name))
        .flat_map(|s| classify_sample(s, thresholds))
        .collect()
}

/// Samples with at least one metric strictly outside `[low, high]`. Pure
/// filter over the caller's already-narrowed set; group selection does not
/// apply here.
pub fn outlier_rows<'a>(
    samples: &[&'a ServerResource],
    thresholds: &Thresholds,
) -> Vec<&'a ServerResource> {
    let out_of_band =
        |usage: f64| usage < thresholds.low() || usage > thresholds.high();
    samples
        .iter()
        .filter(|s| {
            out_of_band(s.cpu_usage_percent())
                || out_of_band(s.memory_usage_percent())
                || out_of_band(s.disk_usage_percent())
        })
        .copied()
        .collect()
}
