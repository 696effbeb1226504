//! Rolling `last_scene` marker of the narrative document.
//!
//! The marker is a trailer section that always runs to the end of the file.
//! A batch that writes a new marker first deletes the current one, so the
//! document ends with exactly one fresh marker after every batch.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::data::EditDirective;

pub const MARKER_HEADING: &str = "# last_scene";

fn marker_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[#*_\s]*last[_-]?scene[#*_\s]*[:：]?").expect("valid regex")
    })
}

fn scene_context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)last[_-]?scene").expect("valid regex"))
}

/// The current marker: from the start of its heading line to the end of the document
pub fn find_marker(content: &str) -> Option<&str> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if marker_line_re().is_match(line) {
            return Some(&content[offset..]);
        }
        offset += line.len();
    }
    None
}

fn targets_scene(directive: &EditDirective) -> bool {
    directive
        .context
        .as_deref()
        .is_some_and(|c| scene_context_re().is_match(c))
}

fn with_marker_heading(replacement: &str) -> String {
    let first_line = replacement.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if marker_line_re().is_match(first_line) {
        replacement.to_string()
    } else {
        format!("{}\n{}", MARKER_HEADING, replacement)
    }
}

/// Rewrites a narrative file's batch so the marker rolls forward.
///
/// Only acts when some directive carries new marker content (a replacement
/// whose context names `last_scene`). Then the current marker is deleted by a
/// leading directive, and each marker directive becomes a plain end-of-file
/// append starting with a `# last_scene` heading.
pub fn preprocess(content: &str, directives: Vec<EditDirective>) -> Vec<EditDirective> {
    let rolls_marker = directives
        .iter()
        .any(|d| targets_scene(d) && d.replacement.is_some());
    // the old marker is only deleted when a replacement for it arrives; a
    // batch that never mentions last_scene leaves the trailer in place
    if !rolls_marker {
        return directives;
    }

    let mut out = Vec::with_capacity(directives.len() + 1);
    if let Some(marker) = find_marker(content) {
        debug!(len = marker.len(), "removing previous last_scene marker");
        out.push(EditDirective {
            file_path: directives[0].file_path.clone(),
            target: Some(marker.to_string()),
            replacement: None,
            context: None,
            label: Some("last_scene rollover".to_string()),
        });
    }

    for directive in directives {
        if !targets_scene(&directive) {
            out.push(directive);
            continue;
        }
        // the old marker is already gone, so edits inside it have nothing to land on
        let Some(replacement) = &directive.replacement else {
            continue;
        };
        let appended = EditDirective {
            target: None,
            ..directive.with_replacement(with_marker_heading(replacement))
        };
        out.push(appended.without_context());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contexts::breadcrumb::BreadcrumbMode;
    use crate::contexts::patch_applier::apply;

    #[test]
    fn test_find_marker_variants() {
        assert_eq!(find_marker("a\n# last_scene\nat the gate\n"), Some("# last_scene\nat the gate\n"));
        assert_eq!(find_marker("a\n**Last-Scene**: inn\n"), Some("**Last-Scene**: inn\n"));
        assert_eq!(find_marker("a\n## LASTSCENE：\nx"), Some("## LASTSCENE：\nx"));
        assert_eq!(find_marker("the last scene was sad"), None);
    }

    #[test]
    fn test_preprocess_without_marker_directive_is_identity() {
        let directives = vec![EditDirective::append("story_outline.md", Some("# Act 1"), "beat")];
        let out = preprocess("# Act 1\n# last_scene\nold", directives.clone());
        assert_eq!(out, directives);
    }

    #[test]
    fn test_preprocess_synthesizes_deletion_and_heading() {
        let content = "# Act 1\nbeat 1\n# last_scene\nby the river\n";
        let directives = vec![
            EditDirective::append("story_outline.md", Some("# Act 1"), "beat 2"),
            EditDirective::append("story_outline.md", Some("last_scene"), "at the inn"),
        ];
        let out = preprocess(content, directives);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].target.as_deref(), Some("# last_scene\nby the river\n"));
        assert_eq!(out[0].replacement, None);
        assert_eq!(out[0].context, None);
        assert_eq!(out[1].context.as_deref(), Some("# Act 1"));
        assert_eq!(out[2].replacement.as_deref(), Some("# last_scene\nat the inn"));
        assert_eq!(out[2].context, None);
        assert!(out[2].is_append());
    }

    #[test]
    fn test_existing_heading_is_not_duplicated() {
        let directives = vec![EditDirective::append(
            "story_outline.md",
            Some("# last_scene"),
            "## Last_Scene:\nat the inn",
        )];
        let out = preprocess("", directives);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].replacement.as_deref(), Some("## Last_Scene:\nat the inn"));
    }

    #[test]
    fn test_batch_rolls_marker_to_end() {
        let content = "# Act 1\nbeat 1\n# last_scene\nby the river\n";
        let directives = vec![
            EditDirective::append("story_outline.md", Some("# Act 1"), "beat 2"),
            EditDirective::append("story_outline.md", Some("last_scene"), "at the inn"),
        ];
        let out = preprocess(content, directives)
            .iter()
            .fold(content.to_string(), |doc, d| apply(&doc, d, BreadcrumbMode::Lenient));

        // the old marker's final newline stays behind as a blank line
        assert_eq!(out, "# Act 1\nbeat 1\n\nbeat 2\n# last_scene\nat the inn\n");
    }
}
