//! Congress.gov API client and the bill-fetching stage.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CongressConfig;
use crate::error::ApiError;
use crate::io::{self, DataLayout};
use crate::models::{Bill, BillCollection};

const SERVICE: &str = "Congress.gov API";

/// One version of a bill's text ("Introduced in House", "Enrolled Bill", ...).
#[derive(Debug, Clone, Deserialize)]
pub struct TextVersion {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type", default)]
    pub version_type: Option<String>,
    #[serde(default)]
    pub formats: Vec<TextRendition>,
}

/// A downloadable rendition of a text version.
#[derive(Debug, Clone, Deserialize)]
pub struct TextRendition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextVersionsResponse {
    #[serde(rename = "textVersions", default)]
    text_versions: Option<Vec<TextVersion>>,
}

pub struct CongressClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CongressClient {
    pub fn new(config: &CongressConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Fetch every bill updated between `from` and `to`.
    pub async fn fetch_recent_bills(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BillCollection> {
        let url = format!(
            "{}/bill?fromDateTime={}&toDateTime={}&format=json",
            self.base_url,
            format_timestamp(from),
            format_timestamp(to)
        );

        info!(from = %format_timestamp(from), to = %format_timestamp(to), "fetching bills");
        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .context("Failed to fetch bills from Congress.gov")?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(SERVICE, response).await.into());
        }

        response
            .json::<BillCollection>()
            .await
            .context("Failed to parse Congress.gov bill list")
    }

    /// Fetch the text versions of a bill, newest first as ordered by the API.
    pub async fn fetch_text_versions(&self, bill: &Bill) -> Result<Vec<TextVersion>> {
        let url = format!(
            "{}/bill/{}/{}/{}/text?format=json",
            self.base_url,
            bill.congress,
            bill.bill_type.to_lowercase(),
            bill.number
        );

        debug!(bill_id = %bill.bill_id(), url = %url, "fetching text versions");
        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .with_context(|| format!("Failed to fetch text versions for {}", bill.bill_id()))?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(SERVICE, response).await.into());
        }

        let body = response
            .json::<TextVersionsResponse>()
            .await
            .context("Failed to parse text versions response")?;

        Ok(body.text_versions.unwrap_or_default())
    }

    /// Download a text rendition verbatim.
    pub async fn download(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !response.status().is_success() {
            return Err(ApiError::from_response("bill text download", response)
                .await
                .into());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))
    }
}

/// Trailing `[now - days, now]` window. `days` must be non-negative and
/// small enough to stay within the representable date range.
pub fn fetch_window(now: DateTime<Utc>, days: i64) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if days < 0 {
        anyhow::bail!("Lookback window must not be negative (got {} days)", days);
    }

    let from = TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .with_context(|| format!("Lookback window of {} days is out of range", days))?;

    Ok((from, now))
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub bills: usize,
    pub written: usize,
}

/// Fetch the bills updated in the last `days` days and write `bills.json`
/// plus one `raw_bills/{id}.json` per bill. Any failure aborts the run;
/// files already written stay on disk.
pub async fn fetch_bills(
    client: &CongressClient,
    layout: &DataLayout,
    now: DateTime<Utc>,
    days: i64,
) -> Result<FetchReport> {
    let (from, to) = fetch_window(now, days)?;
    let collection = client.fetch_recent_bills(from, to).await?;

    io::write_json(&layout.bills_file(), &collection)?;

    let raw_dir = layout.raw_bills_dir();
    let mut written = 0;
    for bill in &collection.bills {
        let path = raw_dir.join(format!("{}.json", bill.bill_id()));
        io::write_json(&path, bill)?;
        written += 1;
    }

    info!(bills = collection.bills.len(), written, "saved bills");
    Ok(FetchReport {
        bills: collection.bills.len(),
        written,
    })
}
