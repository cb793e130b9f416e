//! Full-text download stage.

use anyhow::{Context, Result};
use std::fs;
use std::time::Duration;
use tracing::{info, warn};

use crate::congress::{CongressClient, TextRendition};
use crate::io::{self, DataLayout};
use crate::models::{Bill, BillCollection, TextFormat, TextInfo};

/// Pause after each bill to stay under the API rate limit.
pub const DEFAULT_BILL_DELAY: Duration = Duration::from_secs(1);

const HTML: &str = "HTML";
const FORMATTED_TEXT: &str = "Formatted Text";
const TXT: &str = "TXT";

/// Pick the rendition to download from a text version's format list.
///
/// An `HTML` rendition wins wherever it appears. Otherwise the first
/// `Formatted Text` or `TXT` rendition in list order is kept; a later one
/// never replaces it. Renditions without a URL are ignored.
pub fn select_rendition(formats: &[TextRendition]) -> Option<(&str, TextFormat)> {
    let mut candidate: Option<(&str, TextFormat)> = None;

    for rendition in formats {
        let Some(url) = rendition.url.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };

        match rendition.kind.as_str() {
            HTML => return Some((url, TextFormat::Html)),
            FORMATTED_TEXT if candidate.is_none() => candidate = Some((url, TextFormat::Html)),
            TXT if candidate.is_none() => candidate = Some((url, TextFormat::Txt)),
            _ => {}
        }
    }

    candidate
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextReport {
    pub processed: usize,
    pub with_text: usize,
    pub without_text: usize,
    pub failed: usize,
}

pub struct TextFetcher<'a> {
    client: &'a CongressClient,
    layout: &'a DataLayout,
    delay: Duration,
}

impl<'a> TextFetcher<'a> {
    pub fn new(client: &'a CongressClient, layout: &'a DataLayout) -> Self {
        Self {
            client,
            layout,
            delay: DEFAULT_BILL_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Download text for every bill in `bills.json` and rewrite it with
    /// `text_info` attached where text was found.
    pub async fn run(&self) -> Result<TextReport> {
        let bills_file = self.layout.bills_file();
        let mut collection: BillCollection = io::read_json(&bills_file)?;

        let texts_dir = self.layout.bill_texts_dir();
        fs::create_dir_all(&texts_dir)
            .with_context(|| format!("Failed to create {}", texts_dir.display()))?;

        let mut report = TextReport::default();

        for bill in collection.bills.iter_mut() {
            let bill_id = bill.bill_id();
            println!("Processing {}...", bill_id);

            match self.download_bill_text(bill).await {
                Ok(Some(text_info)) => {
                    println!("  ✓ Saved {}", text_info.path);
                    bill.set_text_info(text_info);
                    report.with_text += 1;
                }
                Ok(None) => report.without_text += 1,
                Err(e) => {
                    warn!(bill_id = %bill_id, error = %format!("{:#}", e), "error downloading bill text");
                    println!("  ✗ Error downloading text for {}", bill_id);
                    report.failed += 1;
                }
            }
            report.processed += 1;

            tokio::time::sleep(self.delay).await;
        }

        io::write_json(&bills_file, &collection)?;

        Ok(report)
    }

    /// Fetch and save the latest text of one bill. `Ok(None)` means the bill
    /// simply has no usable text yet.
    pub async fn download_bill_text(&self, bill: &Bill) -> Result<Option<TextInfo>> {
        let bill_id = bill.bill_id();

        let versions = self.client.fetch_text_versions(bill).await?;
        let Some(latest) = versions.first() else {
            info!(bill_id = %bill_id, "no text available");
            return Ok(None);
        };

        let Some((url, format)) = select_rendition(&latest.formats) else {
            info!(bill_id = %bill_id, "no suitable text format found");
            return Ok(None);
        };

        let content = self.client.download(url).await?;
        if content.is_empty() {
            info!(bill_id = %bill_id, url = %url, "downloaded text is empty");
            return Ok(None);
        }

        let output_file = self
            .layout
            .bill_texts_dir()
            .join(format!("{}.{}", bill_id, format.extension()));
        fs::write(&output_file, content)
            .with_context(|| format!("Failed to write {}", output_file.display()))?;

        Ok(Some(TextInfo {
            format,
            path: self.layout.relative_text_path(&bill_id, format),
        }))
    }
}
