// Thu Oct 15 2026 - Alex

/// Sorted, non-overlapping byte ranges `[start, end)` covering every `//` and
/// `/* */` comment in a source file. Built once per file.
#[derive(Debug, Clone, Default)]
pub struct CommentSpans {
    spans: Vec<(usize, usize)>,
}

impl CommentSpans {
    pub fn build(text: &str) -> Self {
        let bytes = text.as_bytes();
        let n = bytes.len();
        let mut spans = Vec::new();
        let mut i = 0;

        while i < n {
            match bytes[i] {
                b'/' if i + 1 < n && bytes[i + 1] == b'/' => {
                    let end = text[i..].find('\n').map(|p| i + p).unwrap_or(n);
                    spans.push((i, end));
                    i = end;
                }
                b'/' if i + 1 < n && bytes[i + 1] == b'*' => {
                    let end = text[i + 2..].find("*/").map(|p| i + 2 + p + 2).unwrap_or(n);
                    spans.push((i, end));
                    i = end;
                }
                b'"' => {
                    i = skip_string_literal(bytes, i);
                }
                b'\'' => {
                    i = skip_char_literal(bytes, i);
                }
                _ => i += 1,
            }
        }

        Self { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }

    /// The span containing `idx`, found by binary search on span starts.
    pub fn span_at(&self, idx: usize) -> Option<(usize, usize)> {
        let pos = self.spans.partition_point(|&(start, _)| start <= idx);
        if pos == 0 {
            return None;
        }
        let (start, end) = self.spans[pos - 1];
        if idx >= start && idx < end {
            Some((start, end))
        } else {
            None
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.span_at(idx).is_some()
    }

    /// First span starting inside `[from, to)`.
    pub fn first_in(&self, from: usize, to: usize) -> Option<(usize, usize)> {
        let pos = self.spans.partition_point(|&(start, _)| start < from);
        self.spans.get(pos).copied().filter(|&(start, _)| start < to)
    }
}

// Returns the index just past the closing quote, or the end of the line for
// an unterminated literal.
pub(crate) fn skip_string_literal(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

const MAX_CHAR_LITERAL: usize = 10;

// A `'` between two hex digits is a digit separator (`1'000`), and one with
// no close quote nearby is stray text. Both are stepped over as one byte.
pub(crate) fn skip_char_literal(bytes: &[u8], open: usize) -> usize {
    let between_digits = open > 0
        && bytes[open - 1].is_ascii_hexdigit()
        && bytes.get(open + 1).map_or(false, |b| b.is_ascii_hexdigit());
    if between_digits {
        return open + 1;
    }
    let limit = (open + MAX_CHAR_LITERAL).min(bytes.len());
    let mut i = open + 1;
    while i < limit {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => return i + 1,
            b'\n' => break,
            _ => i += 1,
        }
    }
    open + 1
}

/// Copy of `text[from..to]` with every comment byte range removed.
pub fn strip_comments(text: &str, spans: &CommentSpans, from: usize, to: usize) -> String {
    let mut out = String::with_capacity(to.saturating_sub(from));
    let mut cursor = from;
    while cursor < to {
        match spans.span_at(cursor) {
            Some((_, end)) => {
                out.push(' ');
                cursor = end.min(to);
            }
            None => {
                let next = spans.first_in(cursor, to).map(|(s, _)| s).unwrap_or(to);
                out.push_str(&text[cursor..next]);
                cursor = next;
            }
        }
    }
    out
}
