use serde::Serialize;
use std::path::Path;

use crate::contexts::{BreadcrumbMode, DEFAULT_PREVIEW_LINES};

pub const DEFAULT_NARRATIVE_FILE: &str = "story_outline.md";

/// Engine settings, normally loaded from `lorepatch.yml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub breadcrumbs: BreadcrumbMode,
    /// Lines of context collected on each side of a match for previews
    pub preview_lines: usize,
    /// File names that carry the rolling `last_scene` marker
    pub narrative_files: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breadcrumbs: BreadcrumbMode::Lenient,
            preview_lines: DEFAULT_PREVIEW_LINES,
            narrative_files: vec![DEFAULT_NARRATIVE_FILE.to_string()],
        }
    }
}

impl EngineConfig {
    /// True when `file_path` names one of the narrative documents (file name, case-insensitive)
    pub fn is_narrative_file(&self, file_path: &str) -> bool {
        let Some(name) = Path::new(file_path).file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.narrative_files.iter().any(|candidate| {
            Path::new(candidate)
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|c| c.eq_ignore_ascii_case(name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.breadcrumbs, BreadcrumbMode::Lenient);
        assert_eq!(config.preview_lines, 5);
        assert_eq!(config.narrative_files, vec!["story_outline.md"]);
    }

    #[test]
    fn test_is_narrative_file() {
        let config = EngineConfig::default();
        assert!(config.is_narrative_file("story_outline.md"));
        assert!(config.is_narrative_file("book1/Story_Outline.md"));
        assert!(!config.is_narrative_file("characters.md"));
        assert!(!config.is_narrative_file(""));
    }
}
