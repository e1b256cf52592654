//! Pulls the JSON payload out of a generated text blob.
//!
//! The backend wraps its answer in prose, markdown fences and the odd `//` annotation.
//! Instead of pattern matching the whole blob, a small scanner walks the text, matches
//! brackets while skipping string literals and comments, and returns the first balanced
//! value of the expected shape with comments removed.
//!
//! No JSON repair happens here. A trailing comma or a truncated answer is left for the
//! validator to reject, so format drift in the backend stays visible.

use crate::error::{ItineraryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Top-level array of attraction objects.
    AttractionList,
    /// Single object holding a `plan` array.
    DayPlan,
}

impl PayloadShape {
    fn opener(self) -> u8 {
        match self {
            PayloadShape::AttractionList => b'[',
            PayloadShape::DayPlan => b'{',
        }
    }

    /// `start` is the offset of a balanced value's opening bracket.
    fn accepts(self, bytes: &[u8], start: usize) -> bool {
        match self {
            // The array must hold objects; skips things like "[1]" or "[citation]" in prose.
            PayloadShape::AttractionList => first_significant(bytes, start + 1) == Some(b'{'),
            PayloadShape::DayPlan => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
}

/// Advances the lexer by one byte, returning the next state and how many extra bytes the
/// transition consumed.
fn step(state: ScanState, bytes: &[u8], i: usize) -> (ScanState, usize) {
    let b = bytes[i];
    let next = bytes.get(i + 1).copied();
    match state {
        ScanState::Code => match (b, next) {
            (b'"', _) => (ScanState::Str, 0),
            (b'/', Some(b'/')) => (ScanState::LineComment, 1),
            (b'/', Some(b'*')) => (ScanState::BlockComment, 1),
            _ => (ScanState::Code, 0),
        },
        ScanState::Str => match b {
            b'\\' => (ScanState::StrEscape, 0),
            b'"' => (ScanState::Code, 0),
            _ => (ScanState::Str, 0),
        },
        ScanState::StrEscape => (ScanState::Str, 0),
        ScanState::LineComment if b == b'\n' => (ScanState::Code, 0),
        ScanState::LineComment => (ScanState::LineComment, 0),
        ScanState::BlockComment => match (b, next) {
            (b'*', Some(b'/')) => (ScanState::Code, 1),
            _ => (ScanState::BlockComment, 0),
        },
    }
}

/// First byte at or after `from` that is neither whitespace nor part of a comment.
fn first_significant(bytes: &[u8], from: usize) -> Option<u8> {
    let mut state = ScanState::Code;
    let mut i = from;

    while i < bytes.len() {
        let (next_state, skip) = step(state, bytes, i);
        if state == ScanState::Code
            && matches!(next_state, ScanState::Code | ScanState::Str)
            && !bytes[i].is_ascii_whitespace()
        {
            return Some(bytes[i]);
        }
        state = next_state;
        i += 1 + skip;
    }

    None
}

/// Earliest-starting accepted value among those closed since the last reset.
fn pick(
    bytes: &[u8],
    shape: PayloadShape,
    closed: &mut Vec<(usize, usize)>,
) -> Option<(usize, usize)> {
    closed.sort_unstable();
    let found = closed
        .iter()
        .copied()
        .find(|(start, _)| shape.accepts(bytes, *start));
    closed.clear();
    found
}

/// Byte range of the first balanced value of `shape`, found in a single pass.
///
/// Text outside any value is treated as prose and not lexed, so apostrophes or URLs in
/// the surrounding explanation cannot swallow the payload. Inside a value both bracket
/// kinds nest. A crossed closer discards every value still open; values that already
/// closed remain candidates, and among them the outermost wins.
fn locate(bytes: &[u8], shape: PayloadShape) -> Option<(usize, usize)> {
    let opener = shape.opener();
    let mut open: Vec<(u8, usize)> = Vec::new();
    let mut closed: Vec<(usize, usize)> = Vec::new();
    let mut state = ScanState::Code;
    let mut i = 0;

    while i < bytes.len() {
        if open.is_empty() {
            if bytes[i] == opener {
                open.push((if opener == b'[' { b']' } else { b'}' }, i));
                state = ScanState::Code;
            }
            i += 1;
            continue;
        }

        if state == ScanState::Code {
            match bytes[i] {
                b'[' => open.push((b']', i)),
                b'{' => open.push((b'}', i)),
                closer @ (b']' | b'}') => match open.pop() {
                    Some((expected, start)) if expected == closer => {
                        if bytes[start] == opener {
                            closed.push((start, i));
                        }
                        if open.is_empty() {
                            if let Some(found) = pick(bytes, shape, &mut closed) {
                                return Some(found);
                            }
                        }
                    }
                    _ => {
                        open.clear();
                        if let Some(found) = pick(bytes, shape, &mut closed) {
                            return Some(found);
                        }
                    }
                },
                _ => {}
            }
        }

        let (next_state, skip) = step(state, bytes, i);
        state = next_state;
        i += 1 + skip;
    }

    pick(bytes, shape, &mut closed)
}

/// Removes `//` and `/* */` comments that sit outside string literals. Line breaks that
/// end a `//` comment are kept.
pub fn strip_comments(json: &str) -> String {
    let bytes = json.as_bytes();
    let mut kept: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut state = ScanState::Code;
    let mut i = 0;

    while i < bytes.len() {
        let (next_state, skip) = step(state, bytes, i);
        let keep = match state {
            ScanState::Code => matches!(next_state, ScanState::Code | ScanState::Str),
            ScanState::Str | ScanState::StrEscape => true,
            ScanState::LineComment => bytes[i] == b'\n',
            ScanState::BlockComment => false,
        };
        if keep {
            kept.push(bytes[i]);
        }
        state = next_state;
        i += 1 + skip;
    }

    // Comments are dropped whole, so the remaining bytes are still valid UTF-8.
    String::from_utf8(kept).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

pub fn extract(text: &str, shape: PayloadShape) -> Result<String> {
    let found = locate(text.as_bytes(), shape)
        .map(|(start, end)| strip_comments(&text[start..=end]));

    match found {
        Some(payload) => Ok(payload.trim().to_string()),
        None => {
            log::warn!(
                "No {:?} payload found in generated text ({} bytes): {}",
                shape,
                text.len(),
                text
            );
            Err(ItineraryError::NoStructuredPayloadFound)
        }
    }
}
