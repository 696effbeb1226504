use std::collections::HashMap;
use tracing::{info, warn};

use super::directive_parser;
use super::last_scene;
use super::patch_applier::apply_directive;
use super::validator::validate_content;
use crate::data::{
    BatchReport, DirectiveFailure, DocumentStore, EditDirective, EngineConfig, FileReport,
    FileStatus, MatchOutcome, StoreError,
};

/// Document as read at the start of a batch
struct Baseline {
    content: String,
    exists: bool,
    /// The read failed for a reason other than the file being absent
    read_fallback: bool,
}

/// Batch front end of the patch engine.
///
/// Reads each document once through the store, applies its directives in
/// order and writes it back once if it changed. Failures are reported as
/// data; nothing in a batch aborts the remaining files.
pub struct PatchEngine<S> {
    store: S,
    config: EngineConfig,
    dry_run: bool,
}

impl<S: DocumentStore> PatchEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            dry_run: false,
        }
    }

    /// In dry-run mode documents are edited in memory but never written
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extracts directives from raw model output
    pub fn parse(&self, raw: &str) -> Vec<EditDirective> {
        directive_parser::parse(raw)
    }

    async fn read_baseline(&self, path: &str) -> Baseline {
        match self.store.read_text_file(path).await {
            Ok(content) => Baseline {
                content,
                exists: true,
                read_fallback: false,
            },
            Err(StoreError::NotFound(_)) => Baseline {
                content: String::new(),
                exists: false,
                read_fallback: false,
            },
            Err(e) => {
                warn!(file = path, error = %e, "read failed, treating document as new");
                Baseline {
                    content: String::new(),
                    exists: false,
                    read_fallback: true,
                }
            }
        }
    }

    /// Dry-runs one directive against the stored document
    pub async fn validate(&self, directive: &EditDirective) -> MatchOutcome {
        let baseline = self.read_baseline(&directive.file_path).await;

        let effective = if self.config.is_narrative_file(&directive.file_path) {
            last_scene::preprocess(&baseline.content, vec![directive.clone()])
                .pop()
                .unwrap_or_else(|| directive.clone())
        } else {
            directive.clone()
        };

        validate_content(
            &baseline.content,
            &effective,
            self.config.breadcrumbs,
            self.config.preview_lines,
            baseline.exists,
        )
    }

    /// Applies every directive, grouped per file in first-seen order
    pub async fn apply_all(&self, directives: &[EditDirective]) -> BatchReport {
        let mut report = BatchReport::default();

        for (file_path, group) in group_by_file(directives) {
            report.files.push(self.apply_file(&file_path, group).await);
        }

        report
    }

    async fn apply_file(&self, file_path: &str, directives: Vec<EditDirective>) -> FileReport {
        let baseline = self.read_baseline(file_path).await;

        let directives = if self.config.is_narrative_file(file_path) {
            last_scene::preprocess(&baseline.content, directives)
        } else {
            directives
        };

        let mut content = baseline.content.clone();
        let mut applied = 0;
        let mut failures = Vec::new();

        for directive in directives {
            match apply_directive(&content, &directive, self.config.breadcrumbs) {
                Ok(edited) => {
                    content = edited;
                    applied += 1;
                }
                Err(reason) => {
                    warn!(directive = %directive.summary(), %reason, "directive not applied");
                    failures.push(DirectiveFailure { directive, reason });
                }
            }
        }

        let status = if content == baseline.content || self.dry_run {
            FileStatus::Unchanged
        } else {
            match self.store.write_text_file(file_path, &content).await {
                Ok(()) => {
                    info!(file = file_path, applied, "document written");
                    FileStatus::Written
                }
                Err(e) => {
                    warn!(file = file_path, error = %e, "write failed");
                    FileStatus::WriteFailed(e.to_string())
                }
            }
        };

        FileReport {
            file_path: file_path.to_string(),
            status,
            read_fallback: baseline.read_fallback,
            applied,
            failures,
            content,
        }
    }
}

/// Groups directives by file, keeping first-seen file order and in-file order
fn group_by_file(directives: &[EditDirective]) -> Vec<(String, Vec<EditDirective>)> {
    let mut groups: Vec<(String, Vec<EditDirective>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for directive in directives {
        let slot = *index.entry(directive.file_path.as_str()).or_insert_with(|| {
            groups.push((directive.file_path.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(directive.clone());
    }

    groups
}
