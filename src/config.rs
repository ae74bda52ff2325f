//! Bot configuration.
//!
//! An explicit configuration object loaded from YAML and passed into
//! constructors; no process-wide state. Resolution order: explicit
//! `--config` path, `LETTERBOT_CONFIG` env var, `letterbot.yaml` in the
//! working directory, built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the bot needs to run, in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Directory of letter templates (`*.txt`) and their `summary.json`
    /// title map.
    pub templates_dir: PathBuf,
    /// Working directory for persisted state and finished letters.
    pub data_dir: PathBuf,
    /// Class-indexed lexicon backing the tagger, the fallback word
    /// source and the name pools.
    pub lexicon_path: PathBuf,
    /// External invocations per template; the last one finalizes.
    pub passes_per_letter: u32,
    /// Fraction of eligible words per block carved into slots.
    pub fragmentation_ratio: f64,
    /// Hours between scheduled invocations, quoted in status messages.
    pub cron_delta_hours: u32,
    /// Maximum published status length, in characters.
    pub max_status_len: usize,
    /// Bind only the first word of each submission.
    pub first_word_only: bool,
    /// Pending-input drop file consumed by the file input source.
    pub input_path: PathBuf,
    /// Outbox file the publisher appends to.
    pub outbox_path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            data_dir: PathBuf::from("data"),
            lexicon_path: PathBuf::from("lexicon.json"),
            passes_per_letter: 4,
            fragmentation_ratio: 0.35,
            cron_delta_hours: 6,
            max_status_len: 140,
            first_word_only: false,
            input_path: PathBuf::from("data/user_input.json"),
            outbox_path: PathBuf::from("data/outbox.jsonl"),
        }
    }
}

/// Default config file consulted when nothing is specified explicitly.
const DEFAULT_CONFIG_FILE: &str = "letterbot.yaml";

impl BotConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Resolve configuration from `LETTERBOT_CONFIG`, then
    /// `letterbot.yaml`, then defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("LETTERBOT_CONFIG") {
            return Self::from_file(Path::new(&path));
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(Path::new(DEFAULT_CONFIG_FILE));
        }
        Ok(Self::default())
    }
}
