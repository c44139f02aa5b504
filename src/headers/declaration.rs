// Thu Oct 15 2026 - Alex

use crate::headers::comments::{skip_char_literal, skip_string_literal, strip_comments, CommentSpans};
use crate::text::{line_end, line_number, line_start, normalize_whitespace, token_occurrences};
use once_cell::sync::Lazy;
use regex::Regex;

static DECLSPEC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__declspec\s*\([^)]*\)").expect("declspec pattern is valid"));
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__attribute__\s*\(\((?:[^()]|\([^()]*\))*\)\)").expect("attribute pattern is valid"));
static EXTERN_C: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bextern\s*"C(\+\+)?""#).expect("extern C pattern is valid"));
static STORAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:extern|static|inline|__inline|__forceinline|constexpr|consteval|constinit|friend|virtual|explicit)\b",
    )
    .expect("storage pattern is valid")
});
static ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:public|private|protected)\s*:").expect("access pattern is valid"));
static CALLING_CONVENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:__cdecl|__stdcall|__fastcall|__vectorcall|__thiscall|__clrcall|_cdecl|_stdcall|WINAPI|WINAPIV|APIENTRY|CALLBACK|NTAPI|STDAPICALLTYPE|STDMETHODCALLTYPE|PASCAL)\b",
    )
    .expect("calling convention pattern is valid")
});
static EXPORT_MACRO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Z0-9_]*_(?:API|EXPORT|EXPORTS|IMPORT|STATIC_API|DECL|EXTERN|PUBLIC)\b")
        .expect("export macro pattern is valid")
});
static API_MACRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Z0-9]*API\b").expect("api macro pattern is valid"));

const CALL_KEYWORDS: &[&str] = &["return", "new", "delete", "throw", "case", "else", "sizeof", "goto"];

/// A located and validated declaration of one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name_index: usize,
    pub decl_start: usize,
    pub end_index: usize,
    pub line: usize,
    pub return_type: String,
    pub parameters: String,
    pub prototype: String,
}

/// First valid declaration of `name` in `text`: a token-boundary `name(` that
/// sits outside comments and preprocessor lines and is terminated by `;` or
/// `{` at parenthesis depth zero.
pub fn find_declaration(text: &str, spans: &CommentSpans, name: &str) -> Option<Declaration> {
    token_occurrences(text, name).find_map(|idx| declaration_at(text, spans, name, idx))
}

fn declaration_at(text: &str, spans: &CommentSpans, name: &str, idx: usize) -> Option<Declaration> {
    let bytes = text.as_bytes();

    let mut open = idx + name.len();
    while open < bytes.len() && bytes[open].is_ascii_whitespace() {
        open += 1;
    }
    if open >= bytes.len() || bytes[open] != b'(' {
        return None;
    }
    if spans.contains(idx) {
        return None;
    }

    let ls = line_start(text, idx);
    if text[ls..idx].trim_start().starts_with('#') || continues_macro(text, ls) {
        return None;
    }

    let end = find_terminator(text, spans, idx)?;
    let decl_start = declaration_start(text, spans, ls, idx);

    let prefix_raw = strip_comments(text, spans, decl_start, idx);
    let prefix = normalize_whitespace(statement_tail(&prefix_raw));
    if !plausible_prefix(&prefix) {
        return None;
    }

    let captured = strip_comments(text, spans, idx, end);
    let captured_norm = normalize_whitespace(&captured);
    let direct = format!("{}(", name);
    let spaced = format!("{} (", name);
    if !(captured_norm.starts_with(&direct) || captured_norm.starts_with(&spaced)) {
        return None;
    }

    let parameters = normalize_whitespace(&outer_paren_interior(&captured)?);

    Some(Declaration {
        name_index: idx,
        decl_start,
        end_index: end,
        line: line_number(text, idx),
        return_type: clean_return_type(&prefix),
        parameters,
        prototype: normalize_whitespace(&format!("{} {}", prefix, captured_norm)),
    })
}

/// Walks forward from `from` tracking parenthesis depth and returns the index
/// of the first `;` or `{` at depth zero. Comments and string literals are
/// skipped. `None` when the declaration never terminates.
pub fn find_terminator(text: &str, spans: &CommentSpans, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
    let mut i = from;

    while i < bytes.len() {
        if let Some((_, end)) = spans.span_at(i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'"' => {
                i = skip_string_literal(bytes, i);
                continue;
            }
            b'\'' => {
                i = skip_char_literal(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b';' | b'{' if depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Interior of the outermost parenthesis pair, nested pairs included.
pub fn outer_paren_interior(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let open = text.find('(')?;
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string_literal(bytes, i);
                continue;
            }
            b'\'' => {
                i = skip_char_literal(bytes, i);
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[open + 1..i].to_string());
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Strips storage, linkage, calling-convention and export-macro tokens.
pub fn clean_return_type(prefix: &str) -> String {
    let mut text = DECLSPEC.replace_all(prefix, " ").into_owned();
    for rx in [&*ATTRIBUTE, &*EXTERN_C, &*ACCESS, &*STORAGE, &*CALLING_CONVENTION, &*EXPORT_MACRO, &*API_MACRO] {
        text = rx.replace_all(&text, " ").into_owned();
    }
    normalize_whitespace(&text)
}

// Return types written on the line above the name (`int\nFoo(void);`) pull
// the start back one line.
fn declaration_start(text: &str, spans: &CommentSpans, ls: usize, idx: usize) -> usize {
    if !strip_comments(text, spans, ls, idx).trim().is_empty() || ls == 0 {
        return ls;
    }
    let prev_start = line_start(text, ls - 1);
    if spans.contains(prev_start) {
        return ls;
    }
    let prev = strip_comments(text, spans, prev_start, line_end(text, prev_start));
    let prev = prev.trim();
    if prev.starts_with('#') {
        return ls;
    }
    match prev.chars().last() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '*' || c == '&' || c == '>' => prev_start,
        _ => ls,
    }
}

fn continues_macro(text: &str, ls: usize) -> bool {
    if ls == 0 {
        return false;
    }
    let prev_start = line_start(text, ls - 1);
    text[prev_start..ls - 1].trim_end().ends_with('\\')
}

fn statement_tail(prefix: &str) -> &str {
    match prefix.rfind(|c| c == ';' || c == '{' || c == '}') {
        Some(pos) => &prefix[pos + 1..],
        None => prefix,
    }
}

fn plausible_prefix(prefix: &str) -> bool {
    if prefix.is_empty() || prefix.starts_with('#') || prefix.contains('=') {
        return false;
    }
    if prefix.ends_with('(') || prefix.ends_with(',') || prefix.ends_with('.') || prefix.ends_with("->") {
        return false;
    }
    let last = prefix.split_whitespace().last().unwrap_or("");
    !CALL_KEYWORDS.contains(&last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str, name: &str) -> Option<Declaration> {
        let spans = CommentSpans::build(text);
        find_declaration(text, &spans, name)
    }

    #[test]
    fn test_comment_after_char_literal_is_not_a_declaration() {
        assert!(find("static const char Q = '\"'; // Foo(int x);", "Foo").is_none());

        let decl = find("static const char Q = '\"'; // Foo(int x);\nvoid Foo(char c);", "Foo").unwrap();
        assert_eq!(decl.parameters, "char c");
    }

    #[test]
    fn test_char_literal_paren_does_not_unbalance_terminator() {
        let decl = find("int Foo(char open = '(', int n);", "Foo").unwrap();
        assert_eq!(decl.parameters, "char open = '(', int n");
    }

    #[test]
    fn test_simple_prototype() {
        let decl = find("int Foo(int x, int y);", "Foo").unwrap();
        assert_eq!(decl.return_type, "int");
        assert_eq!(decl.parameters, "int x, int y");
        assert_eq!(decl.prototype, "int Foo(int x, int y)");
        assert_eq!(decl.line, 1);
    }

    #[test]
    fn test_nested_parens_are_not_truncated() {
        let text = "void Register(void (*callback)(int code, const char *msg), int flags);";
        let decl = find(text, "Register").unwrap();
        assert_eq!(decl.parameters, "void (*callback)(int code, const char *msg), int flags");
    }

    #[test]
    fn test_name_only_in_comment_is_ignored() {
        assert!(find("// int Foo(int x);\n/* Foo(void); */\n", "Foo").is_none());
    }

    #[test]
    fn test_preprocessor_lines_are_skipped() {
        let text = "#define Foo(x) ((x) + 1)\nlong Foo(long v);";
        let decl = find(text, "Foo").unwrap();
        assert_eq!(decl.return_type, "long");
        assert_eq!(decl.line, 2);
    }

    #[test]
    fn test_macro_continuation_lines_are_skipped() {
        let text = "#define WRAP(x) \\\n    int Foo(x);\n";
        assert!(find(text, "Foo").is_none());
    }

    #[test]
    fn test_unterminated_declaration_is_rejected() {
        assert!(find("int Foo(int x, int y)", "Foo").is_none());
    }

    #[test]
    fn test_token_boundary() {
        assert!(find("int FooBar(int x);", "Foo").is_none());
        assert!(find("int MyFoo(int x);", "Foo").is_none());
    }

    #[test]
    fn test_definition_terminates_at_brace() {
        let decl = find("static inline int Foo(void) { return 1; }", "Foo").unwrap();
        assert_eq!(decl.return_type, "int");
        assert_eq!(decl.parameters, "void");
    }

    #[test]
    fn test_call_sites_are_not_declarations() {
        assert!(find("x = Foo(3);", "Foo").is_none());
        assert!(find("    return Foo(3);", "Foo").is_none());
        assert!(find("    Foo(3);", "Foo").is_none());
        assert!(find("if (Foo(3)) {}", "Foo").is_none());
    }

    #[test]
    fn test_later_valid_occurrence_is_used() {
        let text = "/* Foo(void) */\n#define Foo(x) x\nint Foo(void);\n";
        let decl = find(text, "Foo").unwrap();
        assert_eq!(decl.line, 3);
    }

    #[test]
    fn test_return_type_on_previous_line() {
        let text = "ZSTDLIB_API size_t\nZSTD_compressBound(size_t srcSize);";
        let decl = find(text, "ZSTD_compressBound").unwrap();
        assert_eq!(decl.return_type, "size_t");
        assert_eq!(decl.line, 2);
    }

    #[test]
    fn test_clean_return_type() {
        assert_eq!(clean_return_type("ZSTDLIB_API size_t"), "size_t");
        assert_eq!(clean_return_type("WINBASEAPI BOOL WINAPI"), "BOOL");
        assert_eq!(clean_return_type("extern \"C\" __declspec(dllexport) int __stdcall"), "int");
        assert_eq!(clean_return_type("SQLITE_API const char *"), "const char *");
        assert_eq!(clean_return_type("static inline unsigned long"), "unsigned long");
        assert_eq!(clean_return_type("__attribute__((visibility(\"default\"))) void"), "void");
        assert_eq!(clean_return_type("public: virtual int"), "int");
    }

    #[test]
    fn test_comment_inside_parameters_is_stripped() {
        let decl = find("int Foo(int a /* first */, int b);", "Foo").unwrap();
        assert_eq!(decl.parameters, "int a , int b");
    }

    #[test]
    fn test_outer_paren_interior() {
        assert_eq!(outer_paren_interior("Foo(a, (b))").as_deref(), Some("a, (b)"));
        assert_eq!(outer_paren_interior("Foo(a"), None);
    }
}
