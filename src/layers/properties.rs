//! `.properties` text parser.
//!
//! Supports the usual syntax:
//! - `#` and `!` comment lines
//! - `key=value`, `key: value` and `key value` separators
//! - a trailing `\` continues the value on the next line
//! - escapes `\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\` before any other character
//!
//! Byte spans of keys and values are kept so diagnostics can point into the text.

use std::ops::Range;

use crate::source::{Source, SourceText};

/// One parsed `key = value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// The unescaped key.
    pub key: String,
    /// The unescaped value.
    pub value: String,
    /// Where the key sits in the text.
    pub key_span: Range<usize>,
    /// Where the value sits in the text.
    pub value_span: Range<usize>,
}

/// Parse `.properties` text. Later duplicates of a key are kept; the source
/// built from them keeps the last one.
pub fn parse(text: &str) -> Vec<PropertyEntry> {
    let mut entries = Vec::new();
    let mut lines = physical_lines(text);

    while let Some((offset, line)) = lines.next() {
        let trimmed = line.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let start = offset + (line.len() - trimmed.len());
        let first_len = trimmed.len();
        let mut end = offset + line.len();
        let mut logical = trimmed.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((next_offset, next)) => {
                    logical.push_str(next.trim_start_matches(is_blank));
                    end = next_offset + next.len();
                }
                None => break,
            }
        }

        let (key_end, value_start) = split_key(&logical);
        let value_from = start + value_start.min(first_len);
        entries.push(PropertyEntry {
            key: unescape(&logical[..key_end]),
            value: unescape(&logical[value_start..]),
            key_span: start..start + key_end.min(first_len),
            value_span: value_from..end.max(value_from),
        });
    }

    entries
}

/// Build a stringified source named `name` from `.properties` text.
pub fn properties_source(name: impl Into<String>, text: &str) -> Source {
    let entries = parse(text);
    let mut source_text = SourceText::new(text);
    for entry in &entries {
        source_text.span(
            entry.key.clone(),
            entry.key_span.clone(),
            entry.value_span.clone(),
        );
    }
    Source::stringified_with_text(
        name,
        entries.into_iter().map(|entry| (entry.key, entry.value)),
        source_text,
    )
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn physical_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line.strip_suffix('\r').unwrap_or(line))
    })
}

/// An odd number of trailing backslashes continues the line.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Returns the end of the key and the start of the value.
fn split_key(line: &str) -> (usize, usize) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut escaped = false;
    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if matches!(b, b'=' | b':' | b' ' | b'\t' | 0x0c) {
            break;
        }
        i += 1;
    }
    let key_end = i;

    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | 0x0c) {
        i += 1;
    }
    if i < bytes.len() && matches!(bytes[i], b'=' | b':') {
        i += 1;
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | 0x0c) {
            i += 1;
        }
    }
    (key_end, i)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
