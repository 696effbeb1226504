//! Canonical form used for fuzzy, punctuation-insensitive comparison.
//!
//! All searching happens on normalized text while every edit happens on the
//! original text, so [`NormalizedText`] keeps the offset table needed to map
//! a normalized position back to the original string.

/// Folds full-width CJK punctuation to its ASCII counterpart
fn fold_char(c: char) -> char {
    match c {
        '：' => ':',
        '（' => '(',
        '）' => ')',
        '，' => ',',
        '。' => '.',
        '！' => '!',
        '？' => '?',
        '—' => '-',
        other => other,
    }
}

/// Characters dropped entirely from the normalized form
fn is_stripped(c: char) -> bool {
    c.is_whitespace() || c == '#'
}

/// Returns the normalized form of `s`
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !is_stripped(*c))
        .map(fold_char)
        .collect()
}

/// Byte offset in `original` of the `normalized_index`-th surviving character,
/// or `original.len()` when out of range.
///
/// Counts characters, not bytes; use [`NormalizedText`] for byte offsets
/// into the normalized string.
pub fn map_index(original: &str, normalized_index: usize) -> usize {
    original
        .char_indices()
        .filter(|(_, c)| !is_stripped(*c))
        .nth(normalized_index)
        .map_or(original.len(), |(offset, _)| offset)
}

#[derive(Debug, Clone, Copy)]
struct CharSpan {
    normalized_start: usize,
    original_start: usize,
    original_end: usize,
}

/// Normalized text plus the offset table back into the original string.
///
/// Offsets on both sides are UTF-8 byte offsets.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    original_len: usize,
    spans: Vec<CharSpan>,
}

impl NormalizedText {
    pub fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut spans = Vec::new();

        for (offset, c) in original.char_indices() {
            if is_stripped(c) {
                continue;
            }
            spans.push(CharSpan {
                normalized_start: text.len(),
                original_start: offset,
                original_end: offset + c.len_utf8(),
            });
            text.push(fold_char(c));
        }

        Self {
            text,
            original_len: original.len(),
            spans,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Original offset of the character starting at `normalized_index`
    pub fn original_start(&self, normalized_index: usize) -> usize {
        match self
            .spans
            .binary_search_by_key(&normalized_index, |s| s.normalized_start)
        {
            Ok(i) => self.spans[i].original_start,
            Err(_) => self.original_len,
        }
    }

    /// Original offset just past the character that ends at `normalized_end`.
    ///
    /// Stripped characters following the last matched one are not included.
    pub fn original_end(&self, normalized_end: usize) -> usize {
        if normalized_end == 0 {
            return self.spans.first().map_or(0, |s| s.original_start);
        }
        let i = self
            .spans
            .partition_point(|s| s.normalized_start < normalized_end);
        match i.checked_sub(1) {
            Some(last) => self.spans[last].original_end,
            None => 0,
        }
    }

    /// Normalized byte occurrences of `needle`, left to right, starting at `from`
    pub fn find_from(&self, needle: &str, from: usize) -> Option<usize> {
        if from > self.text.len() || needle.is_empty() {
            return None;
        }
        self.text
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|pos| from + pos)
    }
}
