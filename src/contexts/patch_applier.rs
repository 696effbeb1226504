use tracing::{debug, warn};

use super::breadcrumb::BreadcrumbMode;
use super::insertion_locator::find_insertion_line;
use super::range_matcher::find_range;
use crate::data::{EditDirective, FailReason};

/// Splits a document into lines, reporting whether it ended with a newline.
///
/// `split_terminator` keeps interior empty lines but does not invent a
/// trailing empty line for a final `\n`.
pub fn split_lines(content: &str) -> (Vec<&str>, bool) {
    (
        content.split_terminator('\n').collect(),
        content.ends_with('\n'),
    )
}

pub fn join_lines(lines: &[&str], trailing_newline: bool) -> String {
    let mut out = lines.join("\n");
    if trailing_newline && !lines.is_empty() {
        out.push('\n');
    }
    out
}

/// Applies one directive to `content`.
///
/// # Returns
/// * `Ok(String)` - The edited document
/// * `Err(FailReason)` - The directive could not be located; the caller keeps the original
pub fn apply_directive(
    content: &str,
    directive: &EditDirective,
    mode: BreadcrumbMode,
) -> Result<String, FailReason> {
    let context = directive.context.as_deref();

    if let Some(target) = &directive.target {
        let range = find_range(content, target, context, mode)?;
        debug!(start = range.start, end = range.end, "target located");
        let mut edited = String::with_capacity(content.len());
        edited.push_str(&content[..range.start]);
        edited.push_str(directive.replacement.as_deref().unwrap_or(""));
        edited.push_str(&content[range.end..]);
        return Ok(edited);
    }

    let Some(replacement) = &directive.replacement else {
        return Ok(content.to_string());
    };

    let (lines, trailing_newline) = split_lines(content);
    let index = find_insertion_line(&lines, context, mode).ok_or(FailReason::ContextMismatch)?;
    debug!(line = index, "insertion point located");

    let mut next: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    next.extend_from_slice(&lines[..index]);
    next.extend(replacement.split('\n'));
    next.extend_from_slice(&lines[index..]);
    Ok(join_lines(&next, trailing_newline))
}

/// Applies one directive, returning `content` unchanged (with a warning) when it cannot be located
pub fn apply(content: &str, directive: &EditDirective, mode: BreadcrumbMode) -> String {
    match apply_directive(content, directive, mode) {
        Ok(edited) => edited,
        Err(reason) => {
            warn!(directive = %directive.summary(), %reason, "directive not applied");
            content.to_string()
        }
    }
}
