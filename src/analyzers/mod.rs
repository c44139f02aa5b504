// Thu Oct 15 2026 - Alex

use crate::catalog::{Invocable, InvocableKind};
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("cannot read external catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("external catalog {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("external catalog {path} has no invocables list")]
    Shape { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLanguage {
    Python,
    PowerShell,
    JavaScript,
    TypeScript,
    Ruby,
    Php,
    Shell,
    VbScript,
    Batch,
}

impl ScriptLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptLanguage::Python => "python",
            ScriptLanguage::PowerShell => "powershell",
            ScriptLanguage::JavaScript => "javascript",
            ScriptLanguage::TypeScript => "typescript",
            ScriptLanguage::Ruby => "ruby",
            ScriptLanguage::Php => "php",
            ScriptLanguage::Shell => "shell",
            ScriptLanguage::VbScript => "vbscript",
            ScriptLanguage::Batch => "batch",
        }
    }
}

/// Every analyzer the catalog knows how to merge results from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    NativeExports,
    ManagedReflection,
    ComponentRegistry,
    RpcInterface,
    Script(ScriptLanguage),
}

/// What an analyzer produces and how its entries are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub kind: AnalyzerKind,
    pub emits: InvocableKind,
    pub discovered_by: &'static str,
    /// At least one of these keys must be present in `metadata`.
    pub required_tags: &'static [&'static str],
    pub in_core: bool,
}

impl Strategy {
    pub fn accepts(&self, entry: &Invocable) -> bool {
        self.required_tags.is_empty() || self.required_tags.iter().any(|tag| entry.metadata_str(tag).is_some())
    }
}

pub fn strategy_for(kind: AnalyzerKind) -> Strategy {
    match kind {
        AnalyzerKind::NativeExports => Strategy {
            kind,
            emits: InvocableKind::Export,
            discovered_by: crate::catalog::NATIVE_DISCOVERY,
            required_tags: &[],
            in_core: true,
        },
        AnalyzerKind::ManagedReflection => Strategy {
            kind,
            emits: InvocableKind::Method,
            discovered_by: "managed-reflection",
            required_tags: &["assembly_path"],
            in_core: false,
        },
        AnalyzerKind::ComponentRegistry => Strategy {
            kind,
            emits: InvocableKind::ComObject,
            discovered_by: "component-registry",
            required_tags: &["clsid", "progid"],
            in_core: false,
        },
        AnalyzerKind::RpcInterface => Strategy {
            kind,
            emits: InvocableKind::RpcMethod,
            discovered_by: "rpc-interface",
            required_tags: &["interface_uuid"],
            in_core: false,
        },
        AnalyzerKind::Script(_) => Strategy {
            kind,
            emits: InvocableKind::ScriptFunction,
            discovered_by: "script",
            required_tags: &["source_type"],
            in_core: false,
        },
    }
}

/// The analyzer an external entry of this kind must have come from.
pub fn analyzer_for_kind(kind: InvocableKind) -> Option<AnalyzerKind> {
    match kind {
        InvocableKind::Export => Some(AnalyzerKind::NativeExports),
        InvocableKind::Method => Some(AnalyzerKind::ManagedReflection),
        InvocableKind::ComObject => Some(AnalyzerKind::ComponentRegistry),
        InvocableKind::RpcMethod => Some(AnalyzerKind::RpcInterface),
        InvocableKind::ScriptFunction => Some(AnalyzerKind::Script(ScriptLanguage::Python)),
        InvocableKind::Other => None,
    }
}

/// Classifies a target by file extension.
pub fn analyzer_for_path(path: &Path) -> Option<AnalyzerKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let kind = match ext.as_str() {
        "dll" | "exe" | "sys" | "ocx" | "drv" | "cpl" | "so" | "dylib" => AnalyzerKind::NativeExports,
        "winmd" => AnalyzerKind::ManagedReflection,
        "tlb" | "olb" => AnalyzerKind::ComponentRegistry,
        "idl" => AnalyzerKind::RpcInterface,
        "py" | "pyw" => AnalyzerKind::Script(ScriptLanguage::Python),
        "ps1" | "psm1" => AnalyzerKind::Script(ScriptLanguage::PowerShell),
        "js" | "mjs" | "cjs" => AnalyzerKind::Script(ScriptLanguage::JavaScript),
        "ts" => AnalyzerKind::Script(ScriptLanguage::TypeScript),
        "rb" => AnalyzerKind::Script(ScriptLanguage::Ruby),
        "php" => AnalyzerKind::Script(ScriptLanguage::Php),
        "sh" | "bash" | "zsh" => AnalyzerKind::Script(ScriptLanguage::Shell),
        "vbs" => AnalyzerKind::Script(ScriptLanguage::VbScript),
        "bat" | "cmd" => AnalyzerKind::Script(ScriptLanguage::Batch),
        _ => return None,
    };
    Some(kind)
}

/// Reads Invocables produced by an external analyzer. Accepts a bare JSON
/// array or a catalog document with an `invocables` list. Entries that do
/// not parse or lack their analyzer's tag are skipped.
pub fn load_external(path: &Path) -> Result<Vec<Invocable>, AnalyzerError> {
    let text = fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| AnalyzerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut doc) => match doc.remove("invocables") {
            Some(Value::Array(items)) => items,
            _ => return Err(AnalyzerError::Shape { path: path.to_path_buf() }),
        },
        _ => return Err(AnalyzerError::Shape { path: path.to_path_buf() }),
    };

    let total = entries.len();
    let accepted: Vec<Invocable> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, raw)| match serde_json::from_value::<Invocable>(raw) {
            Ok(entry) => validate(entry),
            Err(e) => {
                warn!("{}: entry {} skipped: {}", path.display(), idx, e);
                None
            }
        })
        .collect();

    info!("Loaded {}/{} external invocables from {}", accepted.len(), total, path.display());
    Ok(accepted)
}

fn validate(mut entry: Invocable) -> Option<Invocable> {
    if entry.name.trim().is_empty() {
        warn!("External entry without a name skipped");
        return None;
    }
    let Some(strategy) = analyzer_for_kind(entry.kind).map(strategy_for) else {
        return Some(entry);
    };
    if !strategy.accepts(&entry) {
        warn!(
            "External {} {} lacks any of {:?}; skipped",
            entry.kind.as_str(),
            entry.name,
            strategy.required_tags
        );
        return None;
    }
    if entry.evidence.discovered_by.is_empty() {
        entry.evidence.discovered_by = strategy.discovered_by.to_string();
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strategy_dispatch() {
        let s = strategy_for(AnalyzerKind::ComponentRegistry);
        assert_eq!(s.emits, InvocableKind::ComObject);
        assert!(!s.in_core);
        assert!(strategy_for(AnalyzerKind::NativeExports).in_core);
        assert_eq!(
            strategy_for(AnalyzerKind::Script(ScriptLanguage::Ruby)).emits,
            InvocableKind::ScriptFunction
        );
    }

    #[test]
    fn test_analyzer_for_path() {
        assert_eq!(analyzer_for_path(Path::new("C:/x/Kernel32.DLL")), Some(AnalyzerKind::NativeExports));
        assert_eq!(
            analyzer_for_path(Path::new("tool.ps1")),
            Some(AnalyzerKind::Script(ScriptLanguage::PowerShell))
        );
        assert_eq!(analyzer_for_path(Path::new("api.idl")), Some(AnalyzerKind::RpcInterface));
        assert_eq!(analyzer_for_path(Path::new("README")), None);
    }

    #[test]
    fn test_load_external_filters_invalid_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ext.json");
        let doc = serde_json::json!({
            "schema_version": "2.0.0",
            "invocables": [
                {"name": "Open", "kind": "com-object", "confidence": "high", "metadata": {"progid": "Lib.App"}},
                {"name": "Close", "kind": "com-object", "confidence": "high"},
                {"name": "run", "kind": "script-function", "confidence": "medium", "metadata": {"source_type": "python"}},
                {"name": "broken"}
            ]
        });
        fs::write(&path, doc.to_string()).unwrap();

        let loaded = load_external(&path).unwrap();
        let names: Vec<&str> = loaded.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Open", "run"]);
        assert_eq!(loaded[0].evidence.discovered_by, "component-registry");
    }

    #[test]
    fn test_load_external_rejects_wrong_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ext.json");
        fs::write(&path, "{\"entries\": []}").unwrap();
        assert!(matches!(load_external(&path), Err(AnalyzerError::Shape { .. })));
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_external(&path), Err(AnalyzerError::Parse { .. })));
    }
}
