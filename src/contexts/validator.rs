use super::breadcrumb::BreadcrumbMode;
use super::insertion_locator::find_insertion_line;
use super::normalizer::normalize;
use super::patch_applier::split_lines;
use super::range_matcher::{find_range, line_of_offset};
use crate::data::{EditDirective, FailReason, MatchOutcome};

pub const DEFAULT_PREVIEW_LINES: usize = 5;

fn window(lines: &[&str], start: usize, end: usize) -> Vec<String> {
    let end = end.min(lines.len());
    let start = start.min(end);
    lines[start..end].iter().map(|l| l.to_string()).collect()
}

/// Dry-run of [`apply_directive`](super::patch_applier::apply_directive).
///
/// Never mutates; reports where the directive would land, up to
/// `preview_lines` lines around it, and for contextual appends whether the
/// replacement text is already present.
pub fn validate_content(
    content: &str,
    directive: &EditDirective,
    mode: BreadcrumbMode,
    preview_lines: usize,
    exists: bool,
) -> MatchOutcome {
    let (lines, _) = split_lines(content);
    let context = directive.context.as_deref();

    if let Some(target) = &directive.target {
        return match find_range(content, target, context, mode) {
            Ok(range) => {
                let first = line_of_offset(content, range.start);
                let last = line_of_offset(content, range.end);
                MatchOutcome {
                    exists,
                    matched: true,
                    match_index: Some(first),
                    before_lines: window(&lines, first.saturating_sub(preview_lines), first),
                    after_lines: window(&lines, last + 1, last + 1 + preview_lines),
                    already_exists: false,
                    fail_reason: None,
                }
            }
            Err(reason) => MatchOutcome::failed(exists, reason),
        };
    }

    let Some(replacement) = &directive.replacement else {
        return MatchOutcome {
            exists,
            ..MatchOutcome::default()
        };
    };

    let already_exists = context.is_some() && {
        let needle = normalize(replacement);
        !needle.is_empty() && normalize(content).contains(&needle)
    };

    match find_insertion_line(&lines, context, mode) {
        Some(index) => MatchOutcome {
            exists,
            matched: true,
            match_index: Some(index),
            before_lines: window(&lines, index.saturating_sub(preview_lines), index),
            after_lines: window(&lines, index, index + preview_lines),
            already_exists,
            fail_reason: None,
        },
        None => MatchOutcome {
            already_exists,
            ..MatchOutcome::failed(exists, FailReason::ContextMismatch)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contexts::patch_applier::apply;

    const MODE: BreadcrumbMode = BreadcrumbMode::Lenient;

    #[test]
    fn test_validate_range_collects_surrounding_lines() {
        let doc = "1\n2\n3\n4\n5\n6\ntarget\n8\n9\n";
        let directive = EditDirective::replace("d.md", "target", Some("x"), None);
        let outcome = validate_content(doc, &directive, MODE, DEFAULT_PREVIEW_LINES, true);

        assert!(outcome.matched);
        assert_eq!(outcome.match_index, Some(6));
        assert_eq!(outcome.before_lines, vec!["2", "3", "4", "5", "6"]);
        assert_eq!(outcome.after_lines, vec!["8", "9"]);
        assert_eq!(outcome.fail_reason, None);
    }

    #[test]
    fn test_validate_insertion_point() {
        let doc = "# A\nfoo\n# B\nbar\n";
        let directive = EditDirective::append("d.md", Some("# A"), "baz");
        let outcome = validate_content(doc, &directive, MODE, 1, true);

        assert!(outcome.matched);
        assert_eq!(outcome.match_index, Some(2));
        assert_eq!(outcome.before_lines, vec!["foo"]);
        assert_eq!(outcome.after_lines, vec!["# B"]);
        assert!(!outcome.already_exists);
    }

    #[test]
    fn test_validate_failures() {
        let doc = "# A\nfoo\n";
        let missing = EditDirective::replace("d.md", "nope", None, None);
        let outcome = validate_content(doc, &missing, MODE, 5, true);
        assert!(!outcome.matched);
        assert_eq!(outcome.fail_reason, Some(FailReason::TargetNotFound));

        let lost = EditDirective::append("d.md", Some("# Z"), "x");
        let outcome = validate_content(doc, &lost, MODE, 5, false);
        assert!(!outcome.exists);
        assert_eq!(outcome.fail_reason, Some(FailReason::ContextMismatch));
    }

    #[test]
    fn test_duplicate_append_detected_after_application() {
        let doc = "# Journal\nday 1\n# Cast\n";
        let directive = EditDirective::append("d.md", Some("# Journal"), "day 2： rain");

        let first = validate_content(doc, &directive, MODE, 5, true);
        assert!(first.matched);
        assert!(!first.already_exists);

        let applied = apply(doc, &directive, MODE);
        let second = validate_content(&applied, &directive, MODE, 5, true);
        assert!(second.already_exists);
    }

    #[test]
    fn test_duplicate_flag_requires_context() {
        let directive = EditDirective::append("d.md", None, "foo");
        let outcome = validate_content("foo\n", &directive, MODE, 5, true);
        assert!(!outcome.already_exists);
    }
}
