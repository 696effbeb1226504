//! Breadcrumb (section path) resolution shared by the range matcher and the
//! insertion locator.
//!
//! A breadcrumb such as `# Cast>## Lin>Appearance` is split on `>` into
//! crumbs, outer to inner. A crumb carrying a leading `#` run only matches
//! heading lines; the heading level itself is ignored so documents can be
//! restructured without breaking older breadcrumbs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalizer::normalize;

/// How many crumbs must resolve for a breadcrumb to count as found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbMode {
    /// Crumbs that match nowhere are skipped; one matching crumb is enough
    #[default]
    Lenient,
    /// Every crumb must match, in order
    Strict,
}

impl FromStr for BreadcrumbMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(BreadcrumbMode::Lenient),
            "strict" => Ok(BreadcrumbMode::Strict),
            other => Err(format!("unknown breadcrumb mode '{}'", other)),
        }
    }
}

impl fmt::Display for BreadcrumbMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BreadcrumbMode::Lenient => write!(f, "lenient"),
            BreadcrumbMode::Strict => write!(f, "strict"),
        }
    }
}

/// Markdown heading level of `line`, if it is a heading.
///
/// The `#` run must be the first non-blank text and be followed by whitespace
/// or the end of the line, so `#hashtag` or `#1 priority` stay body text.
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    let rest = &trimmed[level..];
    (level > 0 && (rest.is_empty() || rest.starts_with(char::is_whitespace))).then_some(level)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Crumb {
    normalized: String,
    heading_only: bool,
}

impl Crumb {
    fn matches(&self, line: &str) -> bool {
        if self.heading_only && heading_level(line).is_none() {
            return false;
        }
        normalize(line).contains(&self.normalized)
    }
}

/// Outcome of walking a breadcrumb over a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrumbWalk {
    pub matched: usize,
    pub total: usize,
    /// Line of the last crumb matched during the walk
    pub last_line: Option<usize>,
}

impl CrumbWalk {
    pub fn resolved(&self, mode: BreadcrumbMode) -> bool {
        match mode {
            BreadcrumbMode::Lenient => self.matched > 0,
            BreadcrumbMode::Strict => self.total > 0 && self.matched == self.total,
        }
    }
}

/// Parsed breadcrumb path, outer crumb first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    crumbs: Vec<Crumb>,
}

impl Breadcrumb {
    /// Parses a `>`-separated context; `None` when it holds no usable crumb
    pub fn parse(context: &str) -> Option<Self> {
        let crumbs: Vec<Crumb> = context
            .split('>')
            .filter_map(|segment| {
                let segment = segment.trim();
                let heading_only = segment.starts_with('#');
                let normalized = normalize(segment.trim_start_matches('#'));
                (!normalized.is_empty()).then_some(Crumb {
                    normalized,
                    heading_only,
                })
            })
            .collect();

        (!crumbs.is_empty()).then_some(Self { crumbs })
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// Walks crumbs outer to inner, scanning forward from the top of the document.
    ///
    /// A crumb not found below the cursor is skipped and the cursor stays put.
    pub fn walk_forward(&self, lines: &[&str]) -> CrumbWalk {
        let mut cursor = 0;
        let mut walk = CrumbWalk {
            matched: 0,
            total: self.crumbs.len(),
            last_line: None,
        };

        for crumb in &self.crumbs {
            if let Some(found) = (cursor..lines.len()).find(|&i| crumb.matches(lines[i])) {
                walk.matched += 1;
                walk.last_line = Some(found);
                cursor = found + 1;
            }
        }

        walk
    }

    /// Walks crumbs inner to outer, scanning backward from `from_line` inclusive
    pub fn walk_backward(&self, lines: &[&str], from_line: usize) -> CrumbWalk {
        let mut walk = CrumbWalk {
            matched: 0,
            total: self.crumbs.len(),
            last_line: None,
        };
        if lines.is_empty() {
            return walk;
        }
        // exclusive upper bound of the remaining search window
        let mut upper = from_line.min(lines.len() - 1) + 1;

        for crumb in self.crumbs.iter().rev() {
            if let Some(found) = (0..upper).rev().find(|&i| crumb.matches(lines[i])) {
                walk.matched += 1;
                walk.last_line = Some(found);
                upper = found;
            }
        }

        walk
    }
}
