// Thu Oct 15 2026 - Alex

use crate::headers::comments::CommentSpans;
use crate::text::line_end;

/// Documentation attached to a declaration: a comment trailing the
/// terminator on the same line wins, otherwise the doc block directly above.
pub fn extract_doc_comment(text: &str, spans: &CommentSpans, decl_start: usize, end_index: usize) -> Option<String> {
    trailing_comment(text, spans, end_index).or_else(|| doc_block_above(text, decl_start))
}

/// A comment that both starts and ends on the terminator's line. A block
/// that runs onto later lines belongs to whatever follows it.
pub fn trailing_comment(text: &str, spans: &CommentSpans, end_index: usize) -> Option<String> {
    let from = (end_index + 1).min(text.len());
    let eol = line_end(text, from);
    let (start, end) = spans.first_in(from, eol).filter(|&(_, end)| end <= eol)?;
    non_empty(clean_comment(&text[start..end]))
}

/// A contiguous `///`/`//!` run or a single `/** */`/`/*! */` block ending on
/// the line right before `decl_start`. A blank line in between detaches it.
pub fn doc_block_above(text: &str, decl_start: usize) -> Option<String> {
    let lines: Vec<&str> = text[..decl_start].lines().collect();
    let last = lines.last()?.trim();

    if is_line_doc(last) {
        let block: Vec<&str> = lines.iter().rev().take_while(|l| is_line_doc(l.trim())).copied().collect();
        let joined = block.into_iter().rev().collect::<Vec<_>>().join("\n");
        return non_empty(clean_comment(&joined));
    }

    if last.ends_with("*/") {
        let close = lines.len() - 1;
        let open = (0..=close).rev().find(|&i| lines[i].contains("/*"))?;
        let opening = &lines[open][lines[open].rfind("/*")?..];
        let is_doc = (opening.starts_with("/**") || opening.starts_with("/*!")) && !opening.starts_with("/**/");
        if !is_doc {
            return None;
        }
        let mut block = vec![opening];
        block.extend_from_slice(&lines[open + 1..=close]);
        return non_empty(clean_comment(&block.join("\n")));
    }

    None
}

/// Strips comment delimiters, leading `*` decoration and `@brief` markers.
pub fn clean_comment(raw: &str) -> String {
    let raw = raw.trim();
    let body = if raw.starts_with("/*") {
        let inner = raw.trim_start_matches("/*");
        let inner = inner.strip_prefix('*').or_else(|| inner.strip_prefix('!')).unwrap_or(inner);
        inner.strip_suffix("*/").unwrap_or(inner).to_string()
    } else {
        raw.lines()
            .map(|line| {
                let line = line.trim_start();
                let line = line
                    .strip_prefix("///")
                    .or_else(|| line.strip_prefix("//!"))
                    .or_else(|| line.strip_prefix("//"))
                    .unwrap_or(line);
                line.to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let lines: Vec<String> = body
        .lines()
        .map(|line| {
            let line = line.trim().trim_start_matches('*').trim_start();
            let line = line.strip_prefix('<').unwrap_or(line).trim_start();
            strip_brief(line).trim().to_string()
        })
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(a), Some(b)) => lines[a..=b].join("\n"),
        _ => String::new(),
    }
}

fn strip_brief(line: &str) -> &str {
    line.strip_prefix("@brief")
        .or_else(|| line.strip_prefix("\\brief"))
        .unwrap_or(line)
}

fn is_line_doc(line: &str) -> bool {
    line.starts_with("///") || line.starts_with("//!")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_for(text: &str, marker: &str) -> Option<String> {
        let spans = CommentSpans::build(text);
        let idx = text.find(marker).unwrap();
        let decl_start = crate::text::line_start(text, idx);
        let end = idx + text[idx..].find(';').unwrap();
        extract_doc_comment(text, &spans, decl_start, end)
    }

    #[test]
    fn test_line_doc_block() {
        let text = "/// Computes something.\n/// Second line.\nint Foo(int x);";
        assert_eq!(doc_for(text, "int Foo").as_deref(), Some("Computes something.\nSecond line."));
    }

    #[test]
    fn test_javadoc_block() {
        let text = "/**\n * @brief Opens the stream.\n *\n * Returns zero on success.\n */\nint Open(void);";
        assert_eq!(
            doc_for(text, "int Open").as_deref(),
            Some("Opens the stream.\n\nReturns zero on success.")
        );
    }

    #[test]
    fn test_blank_line_detaches_doc() {
        let text = "/// Unrelated.\n\nint Foo(int x);";
        assert_eq!(doc_for(text, "int Foo"), None);
    }

    #[test]
    fn test_plain_block_comment_is_not_doc() {
        let text = "/* license text */\nint Foo(int x);";
        assert_eq!(doc_for(text, "int Foo"), None);
    }

    #[test]
    fn test_block_opening_after_terminator_documents_next_declaration() {
        let text = "int Foo(void); /** Releases the Bar handle.\n * Must be paired with Bar_open. */\nint Bar(void);";
        assert_eq!(doc_for(text, "int Foo"), None);
        assert_eq!(
            doc_for(text, "int Bar").as_deref(),
            Some("Releases the Bar handle.\nMust be paired with Bar_open.")
        );
    }

    #[test]
    fn test_trailing_comment_preferred() {
        let text = "/// Above.\nint Foo(int x); ///< Trailing.\n";
        assert_eq!(doc_for(text, "int Foo").as_deref(), Some("Trailing."));
    }

    #[test]
    fn test_single_line_block() {
        let text = "/** Frees the handle. */\nvoid Free(void *h);";
        assert_eq!(doc_for(text, "void Free").as_deref(), Some("Frees the handle."));
    }

    #[test]
    fn test_clean_comment_variants() {
        assert_eq!(clean_comment("// simple"), "simple");
        assert_eq!(clean_comment("/*! qt style */"), "qt style");
        assert_eq!(clean_comment("/// \\brief Short."), "Short.");
    }
}
