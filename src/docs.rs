// Thu Oct 15 2026 - Alex

use crate::config::has_extension;
use crate::headers::CorpusScanStats;
use crate::text::contains_token;
use indexmap::IndexMap;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-name references into a documentation tree. Paths are relative to the
/// corpus root and listed in sorted walk order.
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    hits: IndexMap<String, Vec<String>>,
    pub stats: CorpusScanStats,
}

impl DocIndex {
    pub fn scan(root: &Path, names: &[String], extensions: &[String], max_hits: usize) -> Self {
        let mut index = DocIndex::default();
        if max_hits == 0 || names.is_empty() {
            return index;
        }

        let files: Vec<PathBuf> = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
            .map(|entry| entry.into_path())
            .collect();
        info!("Scanning {} documentation files under {}", files.len(), root.display());

        for path in files {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Could not read document {}: {}", path.display(), e);
                    index.stats.unreadable_files += 1;
                    continue;
                }
            };
            index.stats.files_scanned += 1;
            let text = String::from_utf8_lossy(&bytes);
            let relative = path.strip_prefix(root).unwrap_or(path.as_path()).display().to_string();

            for name in names {
                let hits = index.hits.get(name).map_or(0, Vec::len);
                if hits < max_hits && text.contains(name.as_str()) && contains_token(&text, name) {
                    index.hits.entry(name.clone()).or_default().push(relative.clone());
                }
            }
        }

        index.stats.matched = index.hits.len();
        info!("{} names referenced in documentation", index.stats.matched);
        index
    }

    pub fn references(&self, name: &str) -> &[String] {
        self.hits.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_referenced(&self, name: &str) -> bool {
        !self.references(name).is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["md".to_string(), "txt".to_string()]
    }

    #[test]
    fn test_hits_are_relative_and_capped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("a.md"), "Call Foo to start.").unwrap();
        fs::write(dir.path().join("guide").join("b.txt"), "Foo returns zero.").unwrap();
        fs::write(dir.path().join("guide").join("c.md"), "Foo again.").unwrap();
        fs::write(dir.path().join("skip.h"), "Foo").unwrap();

        let names = vec!["Foo".to_string(), "Bar".to_string()];
        let index = DocIndex::scan(dir.path(), &names, &exts(), 2);
        let refs = index.references("Foo");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], "a.md");
        assert!(refs[1].ends_with("b.txt"));
        assert!(!index.is_referenced("Bar"));
        assert_eq!(index.stats.files_scanned, 3);
    }

    #[test]
    fn test_token_boundary_matching() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "FooBar is unrelated.").unwrap();
        let index = DocIndex::scan(dir.path(), &["Foo".to_string()], &exts(), 2);
        assert!(index.is_empty());
    }
}
