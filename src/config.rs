use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the CMDB backend, e.g. "http://cmdb.internal:8080".
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub refresh_interval_secs: u64,
    /// How often to log app stats (sample/host counts, refreshes) at INFO level.
    pub stats_log_interval_secs: u64,
}

/// Startup values for the low/high watermark pair. Same defaults as the
/// original dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_low_threshold")]
    pub low: f64,
    #[serde(default = "default_high_threshold")]
    pub high: f64,
}

fn default_low_threshold() -> f64 {
    10.0
}

fn default_high_threshold() -> f64 {
    80.0
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            low: default_low_threshold(),
            high: default_high_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_email_subject")]
    pub subject: String,
    /// Used when an email-report request carries no recipient.
    #[serde(default)]
    pub default_recipient: Option<String>,
}

fn default_email_subject() -> String {
    "Server resource usage report".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            subject: default_email_subject(),
            default_recipient: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.upstream.base_url.is_empty(),
            "upstream.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.upstream.request_timeout_secs > 0,
            "upstream.request_timeout_secs must be > 0, got {}",
            self.upstream.request_timeout_secs
        );
        anyhow::ensure!(
            self.monitoring.refresh_interval_secs > 0,
            "monitoring.refresh_interval_secs must be > 0, got {}",
            self.monitoring.refresh_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.thresholds.low >= 0.0 && self.thresholds.low.is_finite(),
            "thresholds.low must be a non-negative percentage, got {}",
            self.thresholds.low
        );
        anyhow::ensure!(
            self.thresholds.high.is_finite(),
            "thresholds.high must be a finite percentage, got {}",
            self.thresholds.high
        );
        anyhow::ensure!(
            self.thresholds.low < self.thresholds.high,
            "thresholds.low ({}) must be below thresholds.high ({})",
            self.thresholds.low,
            self.thresholds.high
        );
        anyhow::ensure!(
            !self.email.subject.is_empty(),
            "email.subject must be non-empty"
        );
        Ok(())
    }
}
