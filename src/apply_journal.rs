//! Journal of documents written by the engine
//!
//! Stores the hash of every document the engine last wrote in `.lorepatch/`
//! under the document root, so later runs can tell when a file was edited
//! outside the engine since its last batch.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::{BatchReport, FileReport};

const JOURNAL_DIR: &str = ".lorepatch";
const JOURNAL_FILE: &str = "journal.json";

/// Last engine write of a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTrack {
    /// Hash of the content the engine wrote
    pub content_hash: String,
    /// Directives applied in that batch
    pub applied: usize,
    /// Directives skipped in that batch
    pub skipped: usize,
    /// Timestamp of the write
    pub timestamp: String,
}

/// Main apply journal
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplyJournal {
    /// Maps: document path -> FileTrack
    tracks: BTreeMap<String, FileTrack>,
}

impl ApplyJournal {
    /// Load the journal for `root`, or create an empty one
    pub fn load(root: &Path) -> Result<Self> {
        let journal_path = Self::journal_path(root);

        if journal_path.exists() {
            let content = fs::read_to_string(&journal_path)
                .context("Failed to read apply journal")?;
            let journal: ApplyJournal = serde_json::from_str(&content)
                .context("Failed to parse apply journal")?;
            Ok(journal)
        } else {
            Ok(ApplyJournal::default())
        }
    }

    /// Save the journal under `root`
    pub fn save(&self, root: &Path) -> Result<()> {
        let journal_dir = root.join(JOURNAL_DIR);
        fs::create_dir_all(&journal_dir)
            .context("Failed to create .lorepatch directory")?;

        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize apply journal")?;

        fs::write(Self::journal_path(root), content)
            .context("Failed to write apply journal")?;

        Ok(())
    }

    fn journal_path(root: &Path) -> PathBuf {
        root.join(JOURNAL_DIR).join(JOURNAL_FILE)
    }

    pub fn get(&self, file_path: &str) -> Option<&FileTrack> {
        self.tracks.get(file_path)
    }

    /// Record a document the engine just wrote; other outcomes are ignored
    pub fn record(&mut self, report: &FileReport) {
        if !report.is_written() {
            return;
        }

        self.tracks.insert(
            report.file_path.clone(),
            FileTrack {
                content_hash: hash_content(&report.content),
                applied: report.applied,
                skipped: report.failures.len(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        );
    }

    /// Record every written document of a batch. Returns how many were recorded
    pub fn record_batch(&mut self, report: &BatchReport) -> usize {
        let mut recorded = 0;
        for file in report.files.iter().filter(|f| f.is_written()) {
            self.record(file);
            recorded += 1;
        }
        recorded
    }

    /// Tracked documents whose current content differs from what the engine wrote.
    ///
    /// A tracked document that no longer exists counts as modified.
    pub fn externally_modified(&self, root: &Path) -> Result<Vec<String>> {
        let mut modified = Vec::new();

        for (file_path, track) in &self.tracks {
            let full = root.join(file_path);
            if !full.exists() {
                modified.push(file_path.clone());
                continue;
            }
            let content = fs::read_to_string(&full)
                .with_context(|| format!("Failed to read file: {}", full.display()))?;
            if hash_content(&content) != track.content_hash {
                modified.push(file_path.clone());
            }
        }

        Ok(modified)
    }

    /// Get a summary of tracked documents
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push("Apply Journal Summary:".to_string());

        for (file_path, track) in &self.tracks {
            lines.push(format!(
                "  {} (updated: {}, applied: {}, skipped: {})",
                file_path, track.timestamp, track.applied, track.skipped
            ));
        }

        if self.tracks.is_empty() {
            lines.push("  No tracked files".to_string());
        }

        lines.join("\n")
    }
}

/// Compute SHA256 hash of document content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
