//! Input and publish boundaries.
//!
//! The engine neither fetches contributions nor delivers results. These
//! ports model the transports the bot talks to; the file-backed adapters
//! here stand in for the remote feed and the posting service.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::info;

/// A batch of free-text contributions plus the cursor marking how far
/// input has now been consumed.
#[derive(Debug, Clone, Default)]
pub struct InputBatch {
    pub texts: Vec<String>,
    pub cursor: Option<String>,
}

/// Capability: fetch contributions submitted since `cursor`.
pub trait InputSource {
    fn poll(&self, cursor: Option<&str>) -> Result<InputBatch>;
}

/// Capability: deliver status messages and finished letters.
pub trait Publisher {
    /// Publish a short status message; returns a delivery id.
    fn publish_status(&mut self, message: &str) -> Result<String>;

    /// Publish a finished letter.
    fn publish_letter(&mut self, title: &str, file_name: &str, html: &str) -> Result<()>;
}

/// On-disk layout of the pending-input drop file.
#[derive(Debug, Deserialize)]
struct DropFile {
    #[serde(default)]
    entry: Vec<String>,
}

/// Reads pending submissions from a JSON drop file
/// (`{"entry": ["..."]}`). The cursor is the count of entries already
/// consumed, so re-polling only yields new submissions.
pub struct FileInputSource {
    path: PathBuf,
}

impl FileInputSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InputSource for FileInputSource {
    fn poll(&self, cursor: Option<&str>) -> Result<InputBatch> {
        if !self.path.exists() {
            return Ok(InputBatch {
                texts: Vec::new(),
                cursor: cursor.map(str::to_string),
            });
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read input file {}", self.path.display()))?;
        let file: DropFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse input file {}", self.path.display()))?;

        let consumed = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let texts: Vec<String> = file.entry.iter().skip(consumed).cloned().collect();
        Ok(InputBatch {
            texts,
            cursor: Some(file.entry.len().to_string()),
        })
    }
}

/// Appends status messages to a JSON-lines outbox and records published
/// letters there; letter content itself is persisted by the state store.
pub struct OutboxPublisher {
    path: PathBuf,
    published: u64,
}

impl OutboxPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            published: 0,
        }
    }

    fn append(&mut self, record: serde_json::Value) -> Result<String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open outbox {}", self.path.display()))?;
        writeln!(file, "{record}")?;
        self.published += 1;
        Ok(self.published.to_string())
    }
}

impl Publisher for OutboxPublisher {
    fn publish_status(&mut self, message: &str) -> Result<String> {
        info!(%message, "publishing status");
        self.append(serde_json::json!({
            "at": chrono::Utc::now().to_rfc3339(),
            "status": message,
        }))
    }

    fn publish_letter(&mut self, title: &str, file_name: &str, _html: &str) -> Result<()> {
        info!(%title, %file_name, "publishing letter");
        self.append(serde_json::json!({
            "at": chrono::Utc::now().to_rfc3339(),
            "letter": file_name,
            "title": title,
        }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_drop_file_yields_empty_batch_and_keeps_cursor() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FileInputSource::new(tmp.path().join("user_input.json"));

        let batch = source.poll(Some("3")).unwrap();
        assert!(batch.texts.is_empty());
        assert_eq!(batch.cursor.as_deref(), Some("3"));
    }

    #[test]
    fn cursor_skips_consumed_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("user_input.json");
        fs::write(&path, r#"{"entry": ["one", "two", "three"]}"#).unwrap();
        let source = FileInputSource::new(&path);

        let batch = source.poll(None).unwrap();
        assert_eq!(batch.texts, vec!["one", "two", "three"]);
        assert_eq!(batch.cursor.as_deref(), Some("3"));

        let batch = source.poll(batch.cursor.as_deref()).unwrap();
        assert!(batch.texts.is_empty());

        fs::write(&path, r#"{"entry": ["one", "two", "three", "four"]}"#).unwrap();
        let batch = source.poll(Some("3")).unwrap();
        assert_eq!(batch.texts, vec!["four"]);
        assert_eq!(batch.cursor.as_deref(), Some("4"));
    }

    #[test]
    fn outbox_appends_one_line_per_message() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("outbox.jsonl");
        let mut publisher = OutboxPublisher::new(&path);

        let first = publisher.publish_status("Words needed: 2 nouns").unwrap();
        publisher
            .publish_letter("Job Application", "Job_Application_01_02_26.txt", "<p></p>")
            .unwrap();

        assert_eq!(first, "1");
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Words needed"));
        assert!(content.contains("Job_Application_01_02_26.txt"));
    }
}
