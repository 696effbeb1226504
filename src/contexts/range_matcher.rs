use std::ops::Range;
use tracing::debug;

use super::breadcrumb::{Breadcrumb, BreadcrumbMode};
use super::normalizer::{normalize, NormalizedText};
use crate::data::FailReason;

/// Characters absorbed when a target starts or ends with a heading marker
fn is_heading_padding(c: char) -> bool {
    matches!(c, '#' | '\t' | ' ')
}

/// 0-based line containing byte `offset`
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

/// Finds the original-text span of `target` inside `content`.
///
/// Matching runs on normalized text; with a `context`, an occurrence is only
/// accepted when the breadcrumb resolves walking backward from its line.
/// A target beginning (ending) with `#` grows the span left (right) over
/// heading markers and blanks, so a whole heading line can be addressed
/// without reproducing its exact marker run.
pub fn find_range(
    content: &str,
    target: &str,
    context: Option<&str>,
    mode: BreadcrumbMode,
) -> Result<Range<usize>, FailReason> {
    let needle = normalize(target);
    if needle.is_empty() {
        return Err(FailReason::TargetNotFound);
    }

    let haystack = NormalizedText::new(content);
    let breadcrumb = context.and_then(Breadcrumb::parse);
    let lines: Vec<&str> = content.split('\n').collect();

    let mut cursor = 0;
    let mut seen_occurrence = false;
    let mut found: Option<Range<usize>> = None;

    while let Some(start) = haystack.find_from(&needle, cursor) {
        seen_occurrence = true;
        let end = start + needle.len();
        let original = haystack.original_start(start)..haystack.original_end(end);

        match &breadcrumb {
            Some(crumb) => {
                let line = line_of_offset(content, original.start);
                if crumb.walk_backward(&lines, line).resolved(mode) {
                    found = Some(original);
                    break;
                }
                debug!(line, "occurrence rejected by breadcrumb");
                cursor = end;
            }
            None => {
                found = Some(original);
                break;
            }
        }
    }

    let Some(mut range) = found else {
        return Err(if seen_occurrence {
            FailReason::ContextMismatch
        } else {
            FailReason::TargetNotFound
        });
    };

    if target.starts_with('#') {
        while let Some(c) = content[..range.start].chars().next_back() {
            if !is_heading_padding(c) {
                break;
            }
            range.start -= c.len_utf8();
        }
    }
    if target.ends_with('#') {
        while let Some(c) = content[range.end..].chars().next() {
            if !is_heading_padding(c) {
                break;
            }
            range.end += c.len_utf8();
        }
    }

    Ok(range)
}
