use serde::{Deserialize, Serialize};

/// One parsed edit instruction aimed at a single document.
///
/// Directives are values: they are produced by the parser, consumed once by
/// the applier and never mutated in place. Helpers such as
/// [`EditDirective::with_replacement`] return a new directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDirective {
    /// Target document identifier, relative to the document store root
    pub file_path: String,
    /// Excerpt to locate for replace/delete; `None` means pure insertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Text to insert or substitute; `None` with a target means delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Breadcrumb path (`outer>inner`), segments optionally prefixed by `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Free-text annotation, never used for matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EditDirective {
    /// Creates a pure append directive
    pub fn append(file_path: &str, context: Option<&str>, replacement: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            target: None,
            replacement: Some(replacement.to_string()),
            context: context.map(str::to_string),
            label: None,
        }
    }

    /// Creates a replace directive, or a delete directive when `replacement` is `None`
    pub fn replace(
        file_path: &str,
        target: &str,
        replacement: Option<&str>,
        context: Option<&str>,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            target: Some(target.to_string()),
            replacement: replacement.map(str::to_string),
            context: context.map(str::to_string),
            label: None,
        }
    }

    /// True when the directive only inserts new content
    pub fn is_append(&self) -> bool {
        self.target.is_none() && self.replacement.is_some()
    }

    /// True when the directive removes the target without replacing it
    pub fn is_delete(&self) -> bool {
        self.target.is_some() && self.replacement.is_none()
    }

    /// A directive with neither target nor replacement does nothing
    pub fn is_noop(&self) -> bool {
        self.target.is_none() && self.replacement.is_none()
    }

    pub fn with_replacement(&self, replacement: String) -> Self {
        Self {
            replacement: Some(replacement),
            ..self.clone()
        }
    }

    pub fn without_context(&self) -> Self {
        Self {
            context: None,
            ..self.clone()
        }
    }

    pub fn with_label(self, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..self
        }
    }

    /// Short human-readable description used in logs and reports
    pub fn summary(&self) -> String {
        let kind = if self.is_append() {
            "append"
        } else if self.is_delete() {
            "delete"
        } else {
            "replace"
        };
        let mut out = format!("{} {}", kind, self.file_path);
        if let Some(context) = &self.context {
            out.push_str(&format!(" @ {}", context));
        }
        if let Some(label) = &self.label {
            out.push_str(&format!(" ({})", label));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_helpers() {
        let append = EditDirective::append("notes.md", Some("# A"), "text");
        assert!(append.is_append());
        assert!(!append.is_delete());

        let delete = EditDirective::replace("notes.md", "old", None, None);
        assert!(delete.is_delete());
        assert!(!delete.is_append());

        let replace = EditDirective::replace("notes.md", "old", Some("new"), None);
        assert!(!replace.is_delete());
        assert!(!replace.is_append());
        assert!(!replace.is_noop());
    }

    #[test]
    fn test_transformations_return_new_values() {
        let original = EditDirective::append("notes.md", Some("last_scene"), "text");
        let rewritten = original.with_replacement("# last_scene\ntext".to_string()).without_context();

        assert_eq!(original.context.as_deref(), Some("last_scene"));
        assert_eq!(original.replacement.as_deref(), Some("text"));
        assert_eq!(rewritten.context, None);
        assert_eq!(rewritten.replacement.as_deref(), Some("# last_scene\ntext"));
    }

    #[test]
    fn test_summary() {
        let directive = EditDirective::append("story.md", Some("# Act 1"), "x").with_label("new beat");
        assert_eq!(directive.summary(), "append story.md @ # Act 1 (new beat)");
    }

    #[test]
    fn test_serde_skips_absent_fields() {
        let directive = EditDirective::append("story.md", None, "x");
        let json = serde_json::to_string(&directive).unwrap();
        assert_eq!(json, r#"{"file_path":"story.md","replacement":"x"}"#);

        let back: EditDirective = serde_json::from_str(&json).unwrap();
        assert_eq!(back, directive);
    }
}
