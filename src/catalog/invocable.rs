// Thu Oct 15 2026 - Alex

use crate::scoring::{ConfidenceFactors, ConfidenceTier};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocableKind {
    Export,
    Method,
    ComObject,
    RpcMethod,
    ScriptFunction,
    #[serde(other)]
    Other,
}

impl InvocableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocableKind::Export => "export",
            InvocableKind::Method => "method",
            InvocableKind::ComObject => "com-object",
            InvocableKind::RpcMethod => "rpc-method",
            InvocableKind::ScriptFunction => "script-function",
            InvocableKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub return_type: Option<String>,
    pub parameters: Option<String>,
    pub calling_convention: Option<String>,
    pub full_prototype: Option<String>,
}

impl Signature {
    pub fn is_empty(&self) -> bool {
        self.return_type.is_none() && self.parameters.is_none() && self.full_prototype.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Documentation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub source_file: Option<String>,
    pub source_line: Option<usize>,
    /// Documentation-corpus files mentioning the name.
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evidence {
    pub discovered_by: String,
    pub header_file: Option<String>,
    pub forwarded_to: Option<String>,
    pub resolved_target: Option<String>,
    pub demangled_name: Option<String>,
}

/// How a caller would reach the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Execution {
    pub method: String,
    pub target_path: String,
    pub function_name: String,
    pub ordinal: Option<u32>,
}

/// One entry of the catalog. Built once by the assembler (or loaded from an
/// external analyzer) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocable {
    pub name: String,
    pub kind: InvocableKind,
    pub confidence: ConfidenceTier,
    #[serde(default)]
    pub confidence_reasons: Vec<String>,
    #[serde(default)]
    pub confidence_factors: ConfidenceFactors,
    #[serde(default)]
    pub ordinal: Option<u32>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub rva: Option<String>,
    #[serde(default)]
    pub signature: Signature,
    #[serde(default)]
    pub documentation: Documentation,
    #[serde(default)]
    pub evidence: Evidence,
    #[serde(default)]
    pub execution: Execution,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Invocable {
    pub fn key(&self) -> (&str, InvocableKind) {
        (&self.name, self.kind)
    }

    pub fn is_documented(&self) -> bool {
        self.documentation.summary.is_some() || !self.documentation.references.is_empty()
    }

    pub fn has_signature(&self) -> bool {
        self.confidence_factors.has_signature || !self.signature.is_empty()
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_entry_deserializes_with_defaults() {
        let json = r#"{
            "name": "Run",
            "kind": "script-function",
            "confidence": "medium",
            "metadata": {"source_type": "python"}
        }"#;
        let inv: Invocable = serde_json::from_str(json).unwrap();
        assert_eq!(inv.kind, InvocableKind::ScriptFunction);
        assert_eq!(inv.confidence, ConfidenceTier::Medium);
        assert_eq!(inv.metadata_str("source_type"), Some("python"));
        assert!(inv.signature.is_empty());
    }

    #[test]
    fn test_unknown_kind_maps_to_other() {
        let kind: InvocableKind = serde_json::from_str("\"cli-flag\"").unwrap();
        assert_eq!(kind, InvocableKind::Other);
        assert_eq!(serde_json::to_string(&InvocableKind::ComObject).unwrap(), "\"com-object\"");
    }
}
