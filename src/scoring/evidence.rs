// Thu Oct 15 2026 - Alex

use crate::headers::MatchInfo;
use crate::symbol::ExportedSymbol;
use serde::{Deserialize, Serialize};

/// Facts about the binary itself, shared by all of its symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub is_signed: bool,
    pub is_known_system_binary: bool,
}

/// Everything the scorer is allowed to look at for one symbol.
#[derive(Debug, Clone, Copy)]
pub struct SymbolEvidence<'a> {
    pub symbol: &'a ExportedSymbol,
    pub header: Option<&'a MatchInfo>,
    pub has_doc_references: bool,
    pub forward_resolved: bool,
    pub provenance: Provenance,
}

impl<'a> SymbolEvidence<'a> {
    pub fn new(symbol: &'a ExportedSymbol, provenance: Provenance) -> Self {
        Self {
            symbol,
            header: None,
            has_doc_references: false,
            forward_resolved: false,
            provenance,
        }
    }

    pub fn with_header(mut self, header: Option<&'a MatchInfo>) -> Self {
        self.header = header;
        self
    }

    pub fn with_doc_references(mut self, present: bool) -> Self {
        self.has_doc_references = present;
        self
    }

    pub fn with_forward_resolved(mut self, resolved: bool) -> Self {
        self.forward_resolved = resolved;
        self
    }

    pub fn is_demangled(&self) -> bool {
        self.symbol.demangled_name.is_some()
    }

    pub fn has_documentation(&self) -> bool {
        self.has_doc_references || self.header.map_or(false, |m| m.doc_comment.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub has_signature: bool,
    pub has_documentation: bool,
    pub has_parameters: bool,
    pub has_return_type: bool,
    pub is_forwarded: bool,
    pub is_ordinal_only: bool,
}

impl ConfidenceFactors {
    pub fn from_evidence(evidence: &SymbolEvidence<'_>) -> Self {
        let header = evidence.header;
        Self {
            has_signature: header.is_some(),
            has_documentation: evidence.has_documentation(),
            has_parameters: header.map_or(false, |m| {
                let params = m.parameters.trim();
                !params.is_empty() && params != "void"
            }),
            has_return_type: header.map_or(false, |m| !m.return_type.is_empty()),
            is_forwarded: evidence.symbol.is_forwarded(),
            is_ordinal_only: evidence.symbol.is_ordinal_only(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(params: &str, doc: Option<&str>) -> MatchInfo {
        MatchInfo {
            function: "Foo".to_string(),
            return_type: "int".to_string(),
            parameters: params.to_string(),
            doc_comment: doc.map(|d| d.to_string()),
            header_file: "foo.h".to_string(),
            line: 1,
            prototype: format!("int Foo({})", params),
        }
    }

    #[test]
    fn test_factors_without_header() {
        let symbol = ExportedSymbol::new("Ordinal12");
        let factors = ConfidenceFactors::from_evidence(&SymbolEvidence::new(&symbol, Provenance::default()));
        assert!(!factors.has_signature);
        assert!(!factors.has_parameters);
        assert!(factors.is_ordinal_only);
    }

    #[test]
    fn test_void_parameters_are_not_parameters() {
        let symbol = ExportedSymbol::new("Foo");
        let info = header("void", Some("Doc"));
        let evidence = SymbolEvidence::new(&symbol, Provenance::default()).with_header(Some(&info));
        let factors = ConfidenceFactors::from_evidence(&evidence);
        assert!(factors.has_signature);
        assert!(factors.has_return_type);
        assert!(factors.has_documentation);
        assert!(!factors.has_parameters);
    }

    #[test]
    fn test_doc_references_count_as_documentation() {
        let symbol = ExportedSymbol::new("Foo");
        let evidence = SymbolEvidence::new(&symbol, Provenance::default()).with_doc_references(true);
        assert!(ConfidenceFactors::from_evidence(&evidence).has_documentation);
    }
}
