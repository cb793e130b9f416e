use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bill number as the API sends it. The live API uses strings ("1234"),
/// older exports use integers; either shape is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillNumber {
    Int(u64),
    Text(String),
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillNumber::Int(n) => write!(f, "{}", n),
            BillNumber::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Html,
    Txt,
}

impl TextFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TextFormat::Html => "html",
            TextFormat::Txt => "txt",
        }
    }
}

/// Where the downloaded full text of a bill lives, relative to the repo root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInfo {
    pub format: TextFormat,
    pub path: String,
}

/// A field that may be absent, explicitly `null`, or set. Absent keys stay
/// absent on write and `null` stays `null`.
pub type Nullable<T> = Option<Option<T>>;

mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// One bill record.
///
/// Fields the pipeline reads or writes are typed; everything else the API
/// returned is kept in `extra` so a read-modify-write never drops data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub congress: u32,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub number: BillNumber,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Nullable<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Nullable<String>,
    #[serde(
        rename = "updateDate",
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_date: Nullable<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_info: Nullable<TextInfo>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_summary: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bill {
    pub fn new(congress: u32, bill_type: impl Into<String>, number: u64) -> Self {
        Self {
            congress,
            bill_type: bill_type.into(),
            number: BillNumber::Int(number),
            title: None,
            summary: None,
            update_date: None,
            text_info: None,
            ai_summary: None,
            extra: Map::new(),
        }
    }

    /// Identity key, e.g. `hr1234`.
    pub fn bill_id(&self) -> String {
        format!("{}{}", self.bill_type.to_lowercase(), self.number)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().and_then(|t| t.as_deref())
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_ref().and_then(|s| s.as_deref())
    }

    pub fn update_date(&self) -> Option<&str> {
        self.update_date.as_ref().and_then(|d| d.as_deref())
    }

    pub fn text_info(&self) -> Option<&TextInfo> {
        self.text_info.as_ref().and_then(|t| t.as_ref())
    }

    pub fn ai_summary(&self) -> Option<&str> {
        self.ai_summary.as_ref().and_then(|s| s.as_deref())
    }

    pub fn set_text_info(&mut self, text_info: TextInfo) {
        self.text_info = Some(Some(text_info));
    }

    /// Attach a summary; `None` is written as an explicit `null`.
    pub fn set_ai_summary(&mut self, summary: Option<String>) {
        self.ai_summary = Some(summary);
    }

    /// Title and summary joined by a newline, or `None` when there is nothing
    /// worth sending to the summarizer.
    pub fn summarization_input(&self) -> Option<String> {
        let text = format!(
            "{}\n{}",
            self.title().unwrap_or(""),
            self.summary().unwrap_or("")
        );
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// The aggregate `bills.json` document: the bill list plus whatever
/// metadata (pagination, request echo) came with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillCollection {
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}
