use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::TextFormat;

const DATA_DIR: &str = "data";
const BILL_TEXTS_DIR: &str = "bill_texts";

/// Fixed on-disk layout shared by every stage, anchored at the repository root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// `data/bills.json`
    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    /// `data/raw_bills/`
    pub fn raw_bills_dir(&self) -> PathBuf {
        self.data_dir().join("raw_bills")
    }

    /// `data/bill_texts/`
    pub fn bill_texts_dir(&self) -> PathBuf {
        self.data_dir().join(BILL_TEXTS_DIR)
    }

    /// `data/processed_bills/`
    pub fn processed_bills_dir(&self) -> PathBuf {
        self.data_dir().join("processed_bills")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    pub fn site_dir(&self) -> PathBuf {
        self.root.join("site")
    }

    /// Path of a saved bill text as recorded in `text_info.path`.
    /// Always relative to the root and `/`-separated.
    pub fn relative_text_path(&self, bill_id: &str, format: TextFormat) -> String {
        format!(
            "{}/{}/{}.{}",
            DATA_DIR,
            BILL_TEXTS_DIR,
            bill_id,
            format.extension()
        )
    }

    /// Resolve a root-relative path recorded in a bill back to the filesystem.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Write a value as pretty-printed JSON, replacing any existing file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// List the `.json` files in a directory, sorted by file name.
///
/// A directory that does not exist yet yields an empty list.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
