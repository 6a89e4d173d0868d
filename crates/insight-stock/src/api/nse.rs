//! NSE India index snapshot client
//!
//! The equity-stockIndices endpoint rejects requests without the session
//! cookies the site sets on its landing page, so every fetch primes the
//! cookie store with a request to the site root first.

use std::path::Path;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::InsightConfig;
use crate::error::{InsightError, Result};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const INDEX_ENDPOINT: &str = "/api/equity-stockIndices";
const SNAPSHOT_INDENT: &[u8] = b"    ";

/// Cookie-session client for the exchange's public JSON API
pub struct NseClient {
    client: Client,
    base_url: Url,
}

impl NseClient {
    /// Create a client for the configured site root
    pub fn new(config: &InsightConfig) -> Result<Self> {
        let base_url = Url::parse(&config.nse_base_url)
            .map_err(|e| InsightError::Config(format!("invalid NSE base URL: {e}")))?;

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(BROWSER_USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Snapshot endpoint URL for an index, with the name query-encoded
    pub fn index_url(&self, index: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(INDEX_ENDPOINT)
            .map_err(|e| InsightError::Config(format!("invalid NSE base URL: {e}")))?;
        url.query_pairs_mut().append_pair("index", index);
        Ok(url)
    }

    /// Fetch the raw snapshot JSON for an index
    #[instrument(skip(self))]
    pub async fn fetch_snapshot(&self, index: &str) -> Result<Value> {
        debug!("Priming NSE session at {}", self.base_url);
        let landing = self.client.get(self.base_url.clone()).send().await?;
        if !landing.status().is_success() {
            return Err(InsightError::Api(format!(
                "NSE landing page returned {}",
                landing.status()
            )));
        }

        let url = self.index_url(index)?;
        debug!("Requesting {url}");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InsightError::Api(format!(
                "NSE index API returned {}",
                response.status()
            )));
        }

        let snapshot: Value = response.json().await?;
        let rows = snapshot
            .get("data")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        info!("Fetched {rows} rows for {index}");
        Ok(snapshot)
    }

    /// Fetch a snapshot and write it pretty-printed to `path`
    pub async fn fetch_to_file(&self, index: &str, path: impl AsRef<Path>) -> Result<Value> {
        let snapshot = self.fetch_snapshot(index).await?;
        save_snapshot(&snapshot, path)?;
        Ok(snapshot)
    }
}

/// Write a snapshot as JSON indented by four spaces
pub fn save_snapshot(snapshot: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut json = Vec::new();
    let formatter = PrettyFormatter::with_indent(SNAPSHOT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    snapshot.serialize(&mut serializer)?;
    std::fs::write(path, json)?;
    info!("Saved snapshot to {}", path.display());
    Ok(())
}

/// Read a snapshot written by `save_snapshot`
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
