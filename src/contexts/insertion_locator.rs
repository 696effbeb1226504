use tracing::debug;

use super::breadcrumb::{heading_level, Breadcrumb, BreadcrumbMode};

/// Finds the line index at which appended content belongs.
///
/// Without a context the answer is the end of the document. With one, the
/// breadcrumb is walked forward and the insertion point is the end of the
/// section opened by the last matched line: the next heading of the same or
/// a higher level, or the end of the document.
///
/// # Returns
/// * `None` - No crumb matched; callers must not fall back to appending at EOF
pub fn find_insertion_line(
    lines: &[&str],
    context: Option<&str>,
    mode: BreadcrumbMode,
) -> Option<usize> {
    let Some(breadcrumb) = context.and_then(Breadcrumb::parse) else {
        return Some(lines.len());
    };

    let walk = breadcrumb.walk_forward(lines);
    if !walk.resolved(mode) {
        debug!(matched = walk.matched, total = walk.total, "breadcrumb not resolved");
        return None;
    }
    let anchor = walk.last_line?;

    // a non-heading anchor closes at the next heading of any level
    let level = heading_level(lines[anchor]).unwrap_or(usize::MAX);
    let end = (anchor + 1..lines.len())
        .find(|&i| heading_level(lines[i]).is_some_and(|l| l <= level))
        .unwrap_or(lines.len());

    Some(end)
}
