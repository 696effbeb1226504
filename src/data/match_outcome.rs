use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EditDirective;

/// Why a directive could not be located in its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// The target excerpt does not occur in the document at all
    #[error("target not found")]
    TargetNotFound,
    /// The target occurs (or an insertion was requested) but the breadcrumb did not resolve
    #[error("context mismatch")]
    ContextMismatch,
}

/// Dry-run result for a single directive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Whether the document existed in the store
    pub exists: bool,
    /// Whether the directive would apply
    pub matched: bool,
    /// 0-based line of the match start or of the insertion point
    pub match_index: Option<usize>,
    pub before_lines: Vec<String>,
    pub after_lines: Vec<String>,
    /// Append-mode duplicate flag: the replacement already appears in the document
    pub already_exists: bool,
    pub fail_reason: Option<FailReason>,
}

impl MatchOutcome {
    pub fn failed(exists: bool, reason: FailReason) -> Self {
        Self {
            exists,
            fail_reason: Some(reason),
            ..Self::default()
        }
    }

    /// Renders a diff-like preview of what applying `directive` would do
    pub fn preview(&self, directive: &EditDirective) -> String {
        let mut out = Vec::new();
        out.push(format!("=== {}", directive.summary()));

        if let Some(reason) = self.fail_reason {
            out.push(format!("  ✗ {}", reason));
            return out.join("\n");
        }

        if let Some(index) = self.match_index {
            out.push(format!("@@ line {}", index + 1));
        }
        for line in &self.before_lines {
            out.push(format!("  {}", line));
        }
        if let Some(target) = &directive.target {
            for line in target.lines() {
                out.push(format!("- {}", line));
            }
        }
        if let Some(replacement) = &directive.replacement {
            for line in replacement.lines() {
                out.push(format!("+ {}", line));
            }
        }
        for line in &self.after_lines {
            out.push(format!("  {}", line));
        }
        if self.already_exists {
            out.push("  ! replacement text already present, probable duplicate".to_string());
        }
        out.join("\n")
    }
}
