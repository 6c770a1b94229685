// HTTP client for the CMDB backend. One endpoint per method; failures bubble
// up as anyhow errors and are degraded (logged, empty data) by the callers.

use anyhow::Context;
use bytes::Bytes;
use serde::Deserialize;

use crate::models::{ClusterGroup, HostPool, ServerResource};

pub struct CmdbClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EmailOutcome {
    success: bool,
}

impl CmdbClient {
    pub fn new(base_url: &str, request_timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(request_timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn cluster_groups(&self) -> anyhow::Result<Vec<ClusterGroup>> {
        let groups = self
            .http
            .get(self.url("/api/cmdb/v1/cluster-groups"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding cluster groups")?;
        Ok(groups)
    }

    /// Samples, optionally narrowed to a date range. The backend treats both
    /// params as optional; we only ever send both or neither.
    pub async fn server_resources(
        &self,
        range: Option<(&str, &str)>,
    ) -> anyhow::Result<Vec<ServerResource>> {
        let mut request = self.http.get(self.url("/api/cmdb/v1/server-resources"));
        if let Some((start, end)) = range {
            request = request.query(&[("startDate", start), ("endDate", end)]);
        }
        let resources = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding server resources")?;
        Ok(resources)
    }

    pub async fn hosts_pool(&self) -> anyhow::Result<Vec<HostPool>> {
        let hosts = self
            .http
            .get(self.url("/api/cmdb/v1/get_hosts_pool_detail"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding host pool")?;
        Ok(hosts)
    }

    /// Relays an HTML mail through the backend. Returns the backend's own
    /// success flag; a transport failure is an error.
    pub async fn send_email(&self, to: &str, subject: &str, content: &str) -> anyhow::Result<bool> {
        let outcome: EmailOutcome = self
            .http
            .post(self.url("/api/cmdb/v1/send-email"))
            .json(&serde_json::json!({
                "to": to,
                "subject": subject,
                "content": content,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("decoding email outcome")?;
        Ok(outcome.success)
    }

    pub async fn cluster_group_report(&self) -> anyhow::Result<Bytes> {
        self.download(self.url("/api/cluster-group-report")).await
    }

    pub async fn idc_report(&self) -> anyhow::Result<Bytes> {
        self.download(self.url("/api/idc-report")).await
    }

    async fn download(&self, url: String) -> anyhow::Result<Bytes> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes)
    }
}
