// Thu Oct 15 2026 - Alex

use crate::config::has_extension;
use crate::headers::comments::CommentSpans;
use crate::headers::declaration::find_declaration;
use crate::headers::doc_comment::extract_doc_comment;
use crate::symbol::{alias_search_name, ExportTable, ExportedSymbol};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A header declaration matched to an exported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub function: String,
    pub return_type: String,
    pub parameters: String,
    pub doc_comment: Option<String>,
    pub header_file: String,
    pub line: usize,
    pub prototype: String,
}

/// An exported name to look for, plus the plain identifier recovered from
/// its demangled form when that differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub alias: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn from_symbol(symbol: &ExportedSymbol) -> Self {
        let alias = symbol
            .demangled_name
            .as_deref()
            .and_then(alias_search_name)
            .filter(|alias| alias != &symbol.name);
        Self {
            name: symbol.name.clone(),
            alias,
        }
    }

    pub fn from_table(table: &ExportTable) -> Vec<Self> {
        table.iter().map(Self::from_symbol).collect()
    }

    fn search_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alias.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusScanStats {
    pub files_scanned: usize,
    pub unreadable_files: usize,
    pub matched: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationReport {
    pub matches: IndexMap<String, MatchInfo>,
    pub stats: CorpusScanStats,
}

impl CorrelationReport {
    pub fn get(&self, name: &str) -> Option<&MatchInfo> {
        self.matches.get(name)
    }
}

/// Scans a header tree for declarations of exported names. Files are visited
/// in sorted path order and the first file holding a valid declaration wins.
pub struct HeaderCorrelator {
    extensions: Vec<String>,
}

impl HeaderCorrelator {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn header_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| has_extension(entry.path(), &self.extensions))
            .map(|entry| entry.into_path())
            .collect()
    }

    pub fn correlate(&self, root: &Path, candidates: &[Candidate]) -> CorrelationReport {
        let mut report = CorrelationReport::default();
        let files = self.header_files(root);
        info!("Scanning {} header files under {}", files.len(), root.display());

        let mut pending: Vec<&Candidate> = candidates.iter().collect();
        for path in files {
            if pending.is_empty() {
                break;
            }
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Could not read header {}: {}", path.display(), e);
                    report.stats.unreadable_files += 1;
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&bytes);
            let label = path.display().to_string();
            report.stats.files_scanned += 1;

            let spans = CommentSpans::build(&text);
            let matches = &mut report.matches;
            pending.retain(|candidate| match match_candidate(&text, &spans, &label, candidate) {
                Some(found) => {
                    debug!("{} declared in {}:{}", candidate.name, found.header_file, found.line);
                    matches.insert(candidate.name.clone(), found);
                    false
                }
                None => true,
            });
        }

        report.stats.matched = report.matches.len();
        info!(
            "Matched {}/{} exports against headers ({} files, {} unreadable)",
            report.stats.matched,
            candidates.len(),
            report.stats.files_scanned,
            report.stats.unreadable_files
        );
        report
    }
}

/// Looks for one candidate in a single header text.
pub fn match_in_text(text: &str, header_file: &str, candidate: &Candidate) -> Option<MatchInfo> {
    let spans = CommentSpans::build(text);
    match_candidate(text, &spans, header_file, candidate)
}

fn match_candidate(text: &str, spans: &CommentSpans, header_file: &str, candidate: &Candidate) -> Option<MatchInfo> {
    candidate.search_names().filter(|name| text.contains(name)).find_map(|name| {
        let decl = find_declaration(text, spans, name)?;
        Some(MatchInfo {
            function: candidate.name.clone(),
            doc_comment: extract_doc_comment(text, spans, decl.decl_start, decl.end_index),
            return_type: decl.return_type,
            parameters: decl.parameters,
            header_file: header_file.to_string(),
            line: decl.line,
            prototype: decl.prototype,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn extensions() -> Vec<String> {
        [".h", ".hpp"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_with_doc() {
        let text = "/// Computes something.\nint Foo(int x, int y);\n";
        let found = match_in_text(text, "api.h", &Candidate::new("Foo")).unwrap();
        assert_eq!(found.function, "Foo");
        assert_eq!(found.return_type, "int");
        assert_eq!(found.parameters, "int x, int y");
        assert_eq!(found.doc_comment.as_deref(), Some("Computes something."));
        assert_eq!(found.line, 2);
    }

    #[test]
    fn test_match_via_demangled_alias() {
        let mut symbol = ExportedSymbol::new("?Open@Stream@@QAEHXZ");
        symbol.demangled_name = Some("public: int __thiscall Stream::Open(void)".to_string());
        let candidate = Candidate::from_symbol(&symbol);
        assert_eq!(candidate.alias.as_deref(), Some("Open"));

        let found = match_in_text("class Stream {\npublic:\n    int Open(void);\n};", "s.hpp", &candidate).unwrap();
        assert_eq!(found.function, "?Open@Stream@@QAEHXZ");
        assert_eq!(found.return_type, "int");
    }

    #[test]
    fn test_first_sorted_file_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a.h"), "long Foo(long v);\n").unwrap();
        std::fs::write(dir.path().join("b").join("z.h"), "int Foo(int v);\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "int Foo(char c);\n").unwrap();

        let correlator = HeaderCorrelator::new(extensions());
        let report = correlator.correlate(dir.path(), &[Candidate::new("Foo"), Candidate::new("Missing")]);
        let found = report.get("Foo").unwrap();
        assert_eq!(found.return_type, "long");
        assert!(found.header_file.ends_with("a.h"));
        assert!(report.get("Missing").is_none());
        assert_eq!(report.stats.files_scanned, 2);
        assert_eq!(report.stats.matched, 1);
    }

    #[test]
    fn test_non_utf8_header_is_read_lossily() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"/* \xff\xfe */\n".to_vec();
        bytes.extend_from_slice(b"void Bar(void);\n");
        std::fs::write(dir.path().join("odd.h"), bytes).unwrap();

        let report = HeaderCorrelator::new(extensions()).correlate(dir.path(), &[Candidate::new("Bar")]);
        assert_eq!(report.get("Bar").unwrap().return_type, "void");
        assert_eq!(report.stats.unreadable_files, 0);
    }

    #[test]
    fn test_comment_only_mention_is_no_match() {
        let text = "// call Foo(x) to compute\nint Other(void);\n";
        assert!(match_in_text(text, "a.h", &Candidate::new("Foo")).is_none());
    }
}
