use serde::Serialize;
use std::fmt;

use super::{EditDirective, FailReason};

/// What happened to a file at the end of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum FileStatus {
    Written,
    /// Nothing changed, or the engine ran in dry-run mode
    Unchanged,
    WriteFailed(String),
}

/// A directive that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveFailure {
    pub directive: EditDirective,
    pub reason: FailReason,
}

/// Per-file result of `apply_all`
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_path: String,
    pub status: FileStatus,
    /// The read failed and the file was treated as an empty new document
    pub read_fallback: bool,
    pub applied: usize,
    pub failures: Vec<DirectiveFailure>,
    /// Final content, kept so hosts can show or persist it
    #[serde(skip)]
    pub content: String,
}

impl FileReport {
    pub fn is_written(&self) -> bool {
        self.status == FileStatus::Written
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.status {
            FileStatus::Written => write!(f, "✓ {}: written", self.file_path)?,
            FileStatus::Unchanged => write!(f, "- {}: unchanged", self.file_path)?,
            FileStatus::WriteFailed(reason) => {
                write!(f, "✗ {}: write failed ({})", self.file_path, reason)?
            }
        }
        write!(f, ", {} applied", self.applied)?;
        if !self.failures.is_empty() {
            write!(f, ", {} skipped", self.failures.len())?;
            for failure in &self.failures {
                write!(f, "\n    {} [{}]", failure.directive.summary(), failure.reason)?;
            }
        }
        if self.read_fallback {
            write!(f, "\n    read failed, treated as a new file")?;
        }
        Ok(())
    }
}

/// Result of one `apply_all` call, one entry per distinct file in first-seen order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn files_written(&self) -> usize {
        self.files.iter().filter(|f| f.is_written()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.files.iter().map(|f| f.failures.len()).sum()
    }

    /// One human-readable line (block) per file
    pub fn lines(&self) -> Vec<String> {
        self.files.iter().map(|f| f.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: FileStatus, failures: Vec<DirectiveFailure>) -> FileReport {
        FileReport {
            file_path: "world.md".to_string(),
            status,
            read_fallback: false,
            applied: 1,
            failures,
            content: String::new(),
        }
    }

    #[test]
    fn test_display_written() {
        let r = report(FileStatus::Written, Vec::new());
        assert_eq!(r.to_string(), "✓ world.md: written, 1 applied");
    }

    #[test]
    fn test_display_lists_failures() {
        let failure = DirectiveFailure {
            directive: EditDirective::replace("world.md", "ghost", None, None),
            reason: FailReason::TargetNotFound,
        };
        let r = report(FileStatus::Unchanged, vec![failure]);
        assert_eq!(
            r.to_string(),
            "- world.md: unchanged, 1 applied, 1 skipped\n    delete world.md [target not found]"
        );
    }

    #[test]
    fn test_batch_counts() {
        let batch = BatchReport {
            files: vec![
                report(FileStatus::Written, Vec::new()),
                report(FileStatus::WriteFailed("disk full".to_string()), Vec::new()),
            ],
        };
        assert_eq!(batch.files_written(), 1);
        assert_eq!(batch.failure_count(), 0);
        assert_eq!(batch.lines().len(), 2);
    }
}
