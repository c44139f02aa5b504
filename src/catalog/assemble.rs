// Thu Oct 15 2026 - Alex

use crate::binary::{BinaryInfo, TargetType};
use crate::catalog::invocable::{Documentation, Evidence, Execution, Invocable, InvocableKind, Signature};
use crate::docs::DocIndex;
use crate::headers::{CorrelationReport, MatchInfo};
use crate::scoring::{ConfidenceScorer, Provenance, SymbolEvidence};
use crate::symbol::{ExportTable, ExportedSymbol, ForwardMap};
use crate::text::truncate_chars;
use log::debug;
use serde_json::Map;
use std::collections::HashSet;

pub const NATIVE_DISCOVERY: &str = "native-exports";
const SUMMARY_CHARS: usize = 200;

const CALLING_CONVENTIONS: &[(&str, &str)] = &[
    ("__stdcall", "stdcall"),
    ("WINAPI", "stdcall"),
    ("APIENTRY", "stdcall"),
    ("CALLBACK", "stdcall"),
    ("NTAPI", "stdcall"),
    ("__fastcall", "fastcall"),
    ("__vectorcall", "vectorcall"),
    ("__thiscall", "thiscall"),
    ("__cdecl", "cdecl"),
    ("WINAPIV", "cdecl"),
];

/// The evidence a single bundle is allowed to see. Leaving a field out
/// removes that evidence from both the entries and their scores.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInputs<'a> {
    pub binary: &'a BinaryInfo,
    pub exports: &'a ExportTable,
    pub forwards: &'a ForwardMap,
    pub headers: Option<&'a CorrelationReport>,
    pub docs: Option<&'a DocIndex>,
    pub include_demangled: bool,
}

impl<'a> AssemblyInputs<'a> {
    pub fn new(binary: &'a BinaryInfo, exports: &'a ExportTable, forwards: &'a ForwardMap) -> Self {
        Self {
            binary,
            exports,
            forwards,
            headers: None,
            docs: None,
            include_demangled: false,
        }
    }

    pub fn with_headers(mut self, headers: Option<&'a CorrelationReport>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_docs(mut self, docs: Option<&'a DocIndex>) -> Self {
        self.docs = docs;
        self
    }

    pub fn with_demangled(mut self, include: bool) -> Self {
        self.include_demangled = include;
        self
    }
}

pub fn provenance_of(binary: &BinaryInfo) -> Provenance {
    Provenance {
        is_signed: binary.is_signed,
        is_known_system_binary: binary.is_known_system_binary,
    }
}

/// Builds scored `Invocable`s from native export evidence.
pub struct CatalogAssembler<'s> {
    scorer: &'s ConfidenceScorer,
}

impl<'s> CatalogAssembler<'s> {
    pub fn new(scorer: &'s ConfidenceScorer) -> Self {
        Self { scorer }
    }

    pub fn assemble(&self, inputs: &AssemblyInputs<'_>) -> Vec<Invocable> {
        inputs.exports.iter().map(|symbol| self.assemble_one(inputs, symbol)).collect()
    }

    pub fn assemble_one(&self, inputs: &AssemblyInputs<'_>, export: &ExportedSymbol) -> Invocable {
        let mut symbol = export.clone();
        if !inputs.include_demangled {
            symbol.demangled_name = None;
        }

        let header = inputs.headers.and_then(|h| h.get(&symbol.name));
        let references: Vec<String> = inputs
            .docs
            .map(|d| d.references(&symbol.name).to_vec())
            .unwrap_or_default();
        let chain = inputs.forwards.get(&symbol.name);
        let forward_resolved = chain.map_or(false, |c| c.is_resolved());

        let evidence = SymbolEvidence::new(&symbol, provenance_of(inputs.binary))
            .with_header(header)
            .with_doc_references(!references.is_empty())
            .with_forward_resolved(forward_resolved);
        let assessment = self.scorer.score(&evidence);

        let invocable = Invocable {
            name: symbol.name.clone(),
            kind: InvocableKind::Export,
            confidence: assessment.tier,
            confidence_reasons: assessment.reasons,
            confidence_factors: assessment.factors,
            ordinal: symbol.ordinal,
            hint: symbol.hint_hex(),
            rva: symbol.rva_hex(),
            signature: header.map(signature_of).unwrap_or_default(),
            documentation: documentation_of(header, references),
            evidence: Evidence {
                discovered_by: NATIVE_DISCOVERY.to_string(),
                header_file: header.map(|m| m.header_file.clone()),
                forwarded_to: symbol.forwarded_to.clone(),
                resolved_target: chain.filter(|c| c.is_resolved()).map(|c| c.target.clone()),
                demangled_name: symbol.demangled_name.clone(),
            },
            execution: execution_of(inputs.binary, &symbol),
            metadata: Map::new(),
        };
        debug!("{} -> {}", invocable.name, invocable.confidence);
        invocable
    }
}

fn signature_of(info: &MatchInfo) -> Signature {
    Signature {
        return_type: Some(info.return_type.clone()).filter(|r| !r.is_empty()),
        parameters: Some(info.parameters.clone()),
        calling_convention: calling_convention(&info.prototype),
        full_prototype: Some(info.prototype.clone()),
    }
}

fn documentation_of(header: Option<&MatchInfo>, references: Vec<String>) -> Documentation {
    let doc = header.and_then(|m| m.doc_comment.as_deref());
    Documentation {
        summary: doc.map(summarize),
        description: doc.map(str::to_string),
        source_file: header.map(|m| m.header_file.clone()),
        source_line: header.map(|m| m.line),
        references,
    }
}

fn execution_of(binary: &BinaryInfo, symbol: &ExportedSymbol) -> Execution {
    let method = match binary.target_type {
        TargetType::PeDll | TargetType::PeExe | TargetType::Unknown => "dll_import",
        _ => "native_symbol",
    };
    Execution {
        method: method.to_string(),
        target_path: binary
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| binary.name.clone()),
        function_name: symbol.name.clone(),
        ordinal: symbol.ordinal,
    }
}

/// First paragraph of a doc comment, capped at 200 characters.
pub fn summarize(doc: &str) -> String {
    let first = doc.split("\n\n").next().unwrap_or(doc);
    truncate_chars(&crate::text::normalize_whitespace(first), SUMMARY_CHARS)
}

pub fn calling_convention(prototype: &str) -> Option<String> {
    prototype.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).find_map(|token| {
        CALLING_CONVENTIONS
            .iter()
            .find(|(keyword, _)| *keyword == token)
            .map(|(_, convention)| convention.to_string())
    })
}

/// Native entries first, then external ones whose `(name, kind)` is not
/// already present. Later duplicates are dropped.
pub fn merge_external(native: Vec<Invocable>, external: Vec<Invocable>) -> Vec<Invocable> {
    let mut seen: HashSet<(String, InvocableKind)> = HashSet::new();
    let mut merged = Vec::with_capacity(native.len() + external.len());
    for invocable in native.into_iter().chain(external) {
        if seen.insert((invocable.name.clone(), invocable.kind)) {
            merged.push(invocable);
        } else {
            debug!("Dropping duplicate {} ({})", invocable.name, invocable.kind.as_str());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::CorrelationReport;
    use crate::scoring::ConfidenceTier;
    use crate::symbol::resolve_forwarders;

    fn table() -> ExportTable {
        let mut table = ExportTable::new();
        table.insert(ExportedSymbol::new("Foo").with_ordinal(1).with_hint(0).with_rva(0x1000));
        table.insert(ExportedSymbol::new("Baz").with_ordinal(2).with_hint(1).with_rva(0x2000));
        table.insert(ExportedSymbol::new("Bar").with_ordinal(3).with_hint(2).with_forward("Foo"));
        table.insert(ExportedSymbol::new("Foo2").with_ordinal(4).with_hint(3).with_forward("Baz"));
        table
    }

    fn foo_header() -> CorrelationReport {
        let mut report = CorrelationReport::default();
        report.matches.insert(
            "Foo".to_string(),
            MatchInfo {
                function: "Foo".to_string(),
                return_type: "int".to_string(),
                parameters: "int x, int y".to_string(),
                doc_comment: Some("Computes something".to_string()),
                header_file: "foo.h".to_string(),
                line: 2,
                prototype: "int __stdcall Foo(int x, int y)".to_string(),
            },
        );
        report
    }

    #[test]
    fn test_assemble_without_optional_inputs() {
        let table = table();
        let forwards = resolve_forwarders(&table, 32);
        let binary = BinaryInfo::unknown("sample.dll");
        let scorer = ConfidenceScorer::default();
        let catalog = CatalogAssembler::new(&scorer).assemble(&AssemblyInputs::new(&binary, &table, &forwards));

        assert_eq!(catalog.len(), 4);
        let foo = &catalog[0];
        assert_eq!(foo.confidence, ConfidenceTier::Low);
        assert_eq!(foo.rva.as_deref(), Some("00001000"));
        assert_eq!(foo.execution.method, "dll_import");
        assert_eq!(foo.execution.function_name, "Foo");
        assert!(foo.signature.is_empty());

        let bar = &catalog[2];
        assert_eq!(bar.evidence.forwarded_to.as_deref(), Some("Foo"));
        assert_eq!(bar.evidence.resolved_target.as_deref(), Some("Foo"));
        assert!(bar.confidence_factors.is_forwarded);
    }

    #[test]
    fn test_assemble_with_header() {
        let table = table();
        let forwards = resolve_forwarders(&table, 32);
        let binary = BinaryInfo::unknown("sample.dll");
        let report = foo_header();
        let scorer = ConfidenceScorer::default();
        let inputs = AssemblyInputs::new(&binary, &table, &forwards).with_headers(Some(&report));
        let catalog = CatalogAssembler::new(&scorer).assemble(&inputs);

        let foo = &catalog[0];
        assert_eq!(foo.confidence, ConfidenceTier::Guaranteed);
        assert_eq!(foo.signature.return_type.as_deref(), Some("int"));
        assert_eq!(foo.signature.calling_convention.as_deref(), Some("stdcall"));
        assert_eq!(foo.documentation.summary.as_deref(), Some("Computes something"));
        assert_eq!(foo.documentation.source_line, Some(2));
        assert_eq!(catalog[1].confidence, ConfidenceTier::Low);
    }

    #[test]
    fn test_demangled_names_are_scoped() {
        let mut table = ExportTable::new();
        table.insert(ExportedSymbol::new("?Foo@@YAHH@Z"));
        table.set_demangled("?Foo@@YAHH@Z", "int __cdecl Foo(int)".to_string());
        let forwards = resolve_forwarders(&table, 32);
        let binary = BinaryInfo::unknown("sample.dll");
        let scorer = ConfidenceScorer::default();
        let assembler = CatalogAssembler::new(&scorer);

        let hidden = assembler.assemble(&AssemblyInputs::new(&binary, &table, &forwards));
        assert_eq!(hidden[0].evidence.demangled_name, None);
        assert_eq!(hidden[0].confidence, ConfidenceTier::Low);

        let shown = assembler.assemble(&AssemblyInputs::new(&binary, &table, &forwards).with_demangled(true));
        assert!(shown[0].evidence.demangled_name.is_some());
        assert_eq!(shown[0].confidence, ConfidenceTier::Medium);
    }

    #[test]
    fn test_merge_dedupes_on_name_and_kind() {
        let table = table();
        let forwards = resolve_forwarders(&table, 32);
        let binary = BinaryInfo::unknown("sample.dll");
        let scorer = ConfidenceScorer::default();
        let native = CatalogAssembler::new(&scorer).assemble(&AssemblyInputs::new(&binary, &table, &forwards));

        let mut same = native[0].clone();
        same.confidence = ConfidenceTier::High;
        let mut method = native[0].clone();
        method.kind = InvocableKind::Method;

        let merged = merge_external(native, vec![same, method]);
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0].confidence, ConfidenceTier::Low);
        assert_eq!(merged[4].kind, InvocableKind::Method);
    }

    #[test]
    fn test_summary_truncation() {
        let long = "word ".repeat(100);
        assert_eq!(summarize(&long).chars().count(), 200);
        assert_eq!(summarize("First para.\n\nSecond."), "First para.");
    }
}
