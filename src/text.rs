// Thu Oct 15 2026 - Alex

//! Small text helpers shared by the header and documentation scanners.

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offsets of every occurrence of `token` that is not glued to another
/// identifier character on either side.
pub fn token_occurrences<'a>(text: &'a str, token: &'a str) -> impl Iterator<Item = usize> + 'a {
    let bytes = text.as_bytes();
    text.match_indices(token).filter_map(move |(idx, _)| {
        if token.is_empty() {
            return None;
        }
        let before_ok = idx == 0 || !is_ident_byte(bytes[idx - 1]);
        let end = idx + token.len();
        let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            Some(idx)
        } else {
            None
        }
    })
}

pub fn contains_token(text: &str, token: &str) -> bool {
    token_occurrences(text, token).next().is_some()
}

/// Truncates on a char boundary, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

pub fn line_start(text: &str, idx: usize) -> usize {
    text[..idx].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

pub fn line_end(text: &str, idx: usize) -> usize {
    text[idx..].find('\n').map(|p| idx + p).unwrap_or(text.len())
}

/// 1-based line number of the byte offset.
pub fn line_number(text: &str, idx: usize) -> usize {
    text.as_bytes()[..idx].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_occurrences_respect_boundaries() {
        let text = "Foo FooBar _Foo Foo( xFoo";
        let hits: Vec<usize> = token_occurrences(text, "Foo").collect();
        assert_eq!(hits, vec![0, 16]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  int \n\t Foo  (void) "), "int Foo (void)");
    }

    #[test]
    fn test_line_helpers() {
        let text = "a\nbc\ndef";
        assert_eq!(line_start(text, 3), 2);
        assert_eq!(line_end(text, 3), 4);
        assert_eq!(line_number(text, 6), 3);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
