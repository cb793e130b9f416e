use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

use crate::config::HuggingFaceConfig;
use crate::error::ApiError;
use crate::io::{self, DataLayout};
use crate::models::Bill;

const SERVICE: &str = "Hugging Face inference API";

pub const MAX_LENGTH: u32 = 300;
pub const MIN_LENGTH: u32 = 100;

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_length: u32,
    min_length: u32,
}

#[derive(Deserialize)]
struct Candidate {
    summary_text: String,
}

pub struct HuggingFaceSummarizer {
    client: Client,
    api_key: String,
    model_url: String,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &HuggingFaceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model_url: config.model_url.clone(),
        })
    }

    /// Summarize `text`, returning the first candidate the model produced.
    pub async fn summarize_text(&self, text: &str) -> Result<String> {
        let request = SummarizeRequest {
            inputs: text,
            parameters: Parameters {
                max_length: MAX_LENGTH,
                min_length: MIN_LENGTH,
            },
        };

        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Hugging Face")?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(SERVICE, response).await.into());
        }

        let candidates = response
            .json::<Vec<Candidate>>()
            .await
            .context("Failed to parse Hugging Face response")?;

        candidates
            .into_iter()
            .next()
            .map(|c| c.summary_text)
            .ok_or_else(|| ApiError::Empty { service: SERVICE }.into())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarizeReport {
    pub summarized: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Summarized,
    Skipped,
}

/// Summarize every bill in `raw_bills/` into `processed_bills/`.
///
/// A failure on one file is logged and the batch moves on.
pub async fn summarize_bills(
    summarizer: &HuggingFaceSummarizer,
    layout: &DataLayout,
) -> Result<SummarizeReport> {
    let processed_dir = layout.processed_bills_dir();
    std::fs::create_dir_all(&processed_dir)
        .with_context(|| format!("Failed to create {}", processed_dir.display()))?;

    let mut report = SummarizeReport::default();

    for bill_file in io::list_json_files(&layout.raw_bills_dir())? {
        let file_name = bill_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match summarize_file(summarizer, &bill_file, &processed_dir.join(&file_name)).await {
            Ok(Outcome::Summarized) => {
                println!("Processed {}", file_name);
                report.summarized += 1;
            }
            Ok(Outcome::Skipped) => {
                debug!(file = %file_name, "no text to summarize");
                report.skipped += 1;
            }
            Err(e) => {
                error!(file = %bill_file.display(), error = %format!("{:#}", e), "error processing bill");
                println!("Error processing {}", bill_file.display());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

async fn summarize_file(
    summarizer: &HuggingFaceSummarizer,
    input: &Path,
    output: &Path,
) -> Result<Outcome> {
    let mut bill: Bill = io::read_json(input)?;

    let Some(text) = bill.summarization_input() else {
        return Ok(Outcome::Skipped);
    };

    let summary = summarizer.summarize_text(&text).await?;
    bill.set_ai_summary(Some(summary));
    io::write_json(output, &bill)?;

    Ok(Outcome::Summarized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn summarizer_for(server: &mockito::Server) -> HuggingFaceSummarizer {
        HuggingFaceSummarizer::new(&HuggingFaceConfig::new(
            "hf-key",
            format!("{}/models/bart", server.url()),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_summarize_text_sends_bounds() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/bart")
            .match_header("authorization", "Bearer hf-key")
            .match_body(Matcher::Json(json!({
                "inputs": "T\nS",
                "parameters": {"max_length": 300, "min_length": 100}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"summary_text": "Short summary."}, {"summary_text": "Other"}]"#)
            .create_async()
            .await;

        let summary = summarizer_for(&server).summarize_text("T\nS").await.unwrap();
        assert_eq!(summary, "Short summary.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_summarize_text_empty_result_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/bart")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let err = summarizer_for(&server).summarize_text("x").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Empty { .. })
        ));
    }

    #[tokio::test]
    async fn test_summarize_bills_annotates_skips_and_continues() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/bart")
            .match_body(Matcher::PartialJson(json!({"inputs": "Good\nBody"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"summary_text": "Short summary."}]"#)
            .create_async()
            .await;
        server
            .mock("POST", "/models/bart")
            .match_body(Matcher::PartialJson(json!({"inputs": "Bad\n"})))
            .with_status(503)
            .with_body("model loading")
            .create_async()
            .await;

        let tmp = TempDir::new().unwrap();
        let layout = DataLayout::new(tmp.path());
        let raw = layout.raw_bills_dir();
        let good = json!({
            "congress": 118, "type": "HR", "number": "1",
            "title": "Good", "summary": "Body", "updateDate": "2024-01-01"
        });
        io::write_json(&raw.join("hr1.json"), &good).unwrap();
        io::write_json(
            &raw.join("hr2.json"),
            &json!({"congress": 118, "type": "HR", "number": "2", "title": " ", "summary": ""}),
        )
        .unwrap();
        io::write_json(
            &raw.join("hr3.json"),
            &json!({"congress": 118, "type": "HR", "number": "3", "title": "Bad"}),
        )
        .unwrap();

        let report = summarize_bills(&summarizer_for(&server), &layout)
            .await
            .unwrap();
        assert_eq!(
            report,
            SummarizeReport {
                summarized: 1,
                skipped: 1,
                failed: 1,
            }
        );

        let processed = layout.processed_bills_dir();
        let out: Value = io::read_json(&processed.join("hr1.json")).unwrap();
        let mut expected = good.clone();
        expected["ai_summary"] = json!("Short summary.");
        assert_eq!(out, expected);

        assert!(!processed.join("hr2.json").exists());
        assert!(!processed.join("hr3.json").exists());
    }
}
