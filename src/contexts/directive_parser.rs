//! Extracts `<save>` edit directives from free-form model output.
//!
//! The scanner walks the text with explicit cursors: an opening tag is paired
//! with the next closing tag of the same name unless another opening tag of
//! that name comes first, in which case pairing restarts from the later one.
//! An opening tag with no closing tag after it ends the scan for that element
//! kind, and an opening tag cut off before its `>` is skipped. Nothing here
//! can panic on malformed input.

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::data::EditDirective;

/// One `<name attrs>body</name>` element found by [`Elements`]
#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    attrs: &'a str,
    body: &'a str,
}

/// Iterator over the elements named `name`, in document order
struct Elements<'a> {
    text: &'a str,
    name: &'static str,
    cursor: usize,
}

impl<'a> Elements<'a> {
    fn new(text: &'a str, name: &'static str) -> Self {
        Self {
            text,
            name,
            cursor: 0,
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut open = find_open_tag(self.text, self.name, self.cursor)?;
        loop {
            let (attrs_start, attrs_end, open_end) = open;
            let (close_start, close_end) = find_close_tag(self.text, self.name, open_end)?;

            // a stray opening tag (e.g. `<save>` mentioned in prose) must not
            // claim the closing tag of the element after it
            match find_open_tag(self.text, self.name, open_end) {
                Some(inner) if inner.0 < close_start => open = inner,
                _ => {
                    self.cursor = close_end;
                    return Some(Element {
                        attrs: &self.text[attrs_start..attrs_end],
                        body: &self.text[open_end..close_start],
                    });
                }
            }
        }
    }
}

/// True when `bytes[at..]` starts with `name` (ASCII case-insensitive) followed by a tag boundary
fn tag_name_at(bytes: &[u8], at: usize, name: &str) -> bool {
    let end = at + name.len();
    let Some(candidate) = bytes.get(at..end) else {
        return false;
    };
    if !candidate.eq_ignore_ascii_case(name.as_bytes()) {
        return false;
    }
    matches!(bytes.get(end), Some(b'>' | b'/') | Some(b' ' | b'\t' | b'\r' | b'\n'))
}

/// Locates `<name ...>` at or after `from`.
///
/// Returns the attribute span and the offset just past `>`. Quoted attribute
/// values may contain `>`. Malformed opening tags are skipped.
fn find_open_tag(text: &str, name: &str, from: usize) -> Option<(usize, usize, usize)> {
    let bytes = text.as_bytes();
    let mut pos = from;
    while let Some(rel) = text.get(pos..)?.find('<') {
        let lt = pos + rel;
        if tag_name_at(bytes, lt + 1, name) {
            let attrs_start = lt + 1 + name.len();
            if let Some(gt) = find_tag_end(bytes, attrs_start) {
                return Some((attrs_start, gt, gt + 1));
            }
            debug!(offset = lt, tag = name, "skipping unterminated opening tag");
        }
        pos = lt + 1;
    }
    None
}

/// Offset of the `>` closing a tag whose attributes start at `from`.
///
/// A `<` (quoted or not) or a newline inside a quoted value means the tag was
/// never terminated, so its attributes cannot run into the next tag.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match (quote, b) {
            (_, b'<') => return None,
            (Some(_), b'\n') => return None,
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Locates `</name>` (whitespace allowed before `>`) at or after `from`
fn find_close_tag(text: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut pos = from;
    while let Some(rel) = text.get(pos..)?.find("</") {
        let start = pos + rel;
        let name_start = start + 2;
        if tag_name_at(bytes, name_start, name) {
            let mut i = name_start + name.len();
            while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\r' | b'\n')) {
                i += 1;
            }
            if bytes.get(i) == Some(&b'>') {
                return Some((start, i + 1));
            }
        }
        pos = name_start;
    }
    None
}

/// Reads attribute `key` from a raw attribute span, NFC-normalized and trimmed
fn attribute(attrs: &str, key: &str) -> Option<String> {
    let bytes = attrs.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && !is_attr_name_byte(bytes[i]) {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && is_attr_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &attrs[name_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let (value_start, value_end) = match bytes.get(i) {
            Some(&q @ (b'"' | b'\'')) => {
                let start = i + 1;
                let end = attrs[start..]
                    .find(q as char)
                    .map_or(attrs.len(), |rel| start + rel);
                i = (end + 1).min(bytes.len());
                (start, end)
            }
            _ => {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                (start, i)
            }
        };

        if name.eq_ignore_ascii_case(key) {
            let value: String = attrs[value_start..value_end].nfc().collect();
            return Some(value.trim().to_string());
        }
    }
    None
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':')
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Trimmed body of the first `<name>` element in `body`
fn first_text(body: &str, name: &'static str) -> Option<String> {
    non_empty(Elements::new(body, name).next().map(|e| e.body.trim().to_string()))
}

fn push_update(
    out: &mut Vec<EditDirective>,
    file_path: &str,
    context: &Option<String>,
    label: Option<String>,
    body: &str,
) {
    let target = first_text(body, "target");
    let replacement = first_text(body, "replacement");
    if target.is_none() && replacement.is_none() {
        return;
    }
    out.push(EditDirective {
        file_path: file_path.to_string(),
        target,
        replacement,
        context: context.clone(),
        label,
    });
}

/// Parses every edit directive in `raw`, in document order
pub fn parse(raw: &str) -> Vec<EditDirective> {
    let mut directives = Vec::new();

    for save in Elements::new(raw, "save") {
        let Some(file_path) = non_empty(attribute(save.attrs, "file")) else {
            debug!("skipping <save> block without a file attribute");
            continue;
        };
        let context = non_empty(attribute(save.attrs, "context"));
        let save_label = non_empty(attribute(save.attrs, "label"));

        let before = directives.len();
        let updates: Vec<Element> = Elements::new(save.body, "update").collect();
        if updates.is_empty() {
            push_update(&mut directives, &file_path, &context, save_label, save.body);
        } else {
            for update in updates {
                let label = non_empty(attribute(update.attrs, "label")).or_else(|| save_label.clone());
                push_update(&mut directives, &file_path, &context, label, update.body);
            }
        }

        if directives.len() == before {
            debug!(file = %file_path, "skipping <save> block without directives");
        }
    }

    directives
}
