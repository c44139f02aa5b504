// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};

const DEFAULT_VERBS: &[&str] = &[
    "Create", "Get", "Set", "Open", "Close", "Read", "Write", "Delete", "Find", "Load", "Free", "Alloc", "Init",
    "Register", "Query", "Enum", "Start", "Stop", "Add", "Remove", "Is", "Has", "init", "alloc", "free",
    "compress", "decompress", "create", "get", "set", "open", "close", "read", "write",
];

/// Name-shape conventions that earn a medium tier. Both are guesses about
/// naming style, so they come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingHeuristics {
    pub library_prefix_min_len: usize,
    pub verb_prefixes: Vec<String>,
}

impl Default for NamingHeuristics {
    fn default() -> Self {
        Self {
            library_prefix_min_len: 3,
            verb_prefixes: DEFAULT_VERBS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl NamingHeuristics {
    /// `prefix_Name` where the prefix is at least `library_prefix_min_len`
    /// characters, starts with a letter and keeps one letter case
    /// (`ZSTD_compress`, `sqlite3_open`).
    pub fn matches_library_prefix(&self, name: &str) -> bool {
        let Some((prefix, rest)) = name.split_once('_') else {
            return false;
        };
        if prefix.len() < self.library_prefix_min_len || rest.is_empty() {
            return false;
        }
        if !prefix.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return false;
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        let all_upper = prefix.chars().filter(|c| c.is_ascii_alphabetic()).all(|c| c.is_ascii_uppercase());
        let all_lower = prefix.chars().filter(|c| c.is_ascii_alphabetic()).all(|c| c.is_ascii_lowercase());
        (all_upper || all_lower) && rest.starts_with(|c: char| c.is_ascii_alphanumeric())
    }

    /// A configured verb followed by a word break: end of name, `_`, a digit
    /// or an uppercase letter (`CreateFileW`, `init_ctx`, not `Isolate`).
    pub fn matches_verb_prefix(&self, name: &str) -> bool {
        self.verb_prefixes.iter().any(|verb| match name.strip_prefix(verb.as_str()) {
            Some(rest) => match rest.chars().next() {
                None => true,
                Some(c) => c == '_' || c.is_ascii_digit() || c.is_ascii_uppercase(),
            },
            None => false,
        })
    }
}
