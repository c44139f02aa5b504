// Thu Oct 15 2026 - Alex

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub ordinal: Option<u32>,
    pub hint: Option<u32>,
    pub rva: Option<u64>,
    pub forwarded_to: Option<String>,
    pub demangled_name: Option<String>,
}

impl ExportedSymbol {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ordinal: None,
            hint: None,
            rva: None,
            forwarded_to: None,
            demangled_name: None,
        }
    }

    pub fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn with_hint(mut self, hint: u32) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn with_rva(mut self, rva: u64) -> Self {
        self.rva = Some(rva);
        self
    }

    pub fn with_forward(mut self, target: &str) -> Self {
        self.forwarded_to = Some(target.to_string());
        self
    }

    pub fn hint_hex(&self) -> Option<String> {
        self.hint.map(|h| format!("{:X}", h))
    }

    pub fn rva_hex(&self) -> Option<String> {
        self.rva.map(|r| format!("{:08X}", r))
    }

    pub fn is_forwarded(&self) -> bool {
        self.forwarded_to.as_deref().map_or(false, |t| t != self.name)
    }

    /// MSVC (`?`) or Itanium (`_Z`) decorated name.
    pub fn is_mangled(&self) -> bool {
        self.name.starts_with('?') || self.name.starts_with("_Z") || self.name.starts_with("__Z")
    }

    /// Name synthesized by the dump tool for an export without a name.
    pub fn is_ordinal_only(&self) -> bool {
        let name = self.name.as_str();
        if name.eq_ignore_ascii_case("[NONAME]") {
            return true;
        }
        let digits = name
            .strip_prefix("Ordinal")
            .or_else(|| name.strip_prefix('#'))
            .or_else(|| name.strip_prefix("@"));
        digits.map_or(false, |d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Export symbols keyed by name in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    exports: IndexMap<String, ExportedSymbol>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless the name is already present; the first occurrence wins.
    pub fn insert(&mut self, export: ExportedSymbol) -> bool {
        if self.exports.contains_key(&export.name) {
            return false;
        }
        self.exports.insert(export.name.clone(), export);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ExportedSymbol> {
        self.exports.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exports.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportedSymbol> {
        self.exports.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// Attaches a readable name; the record itself is never replaced.
    pub fn set_demangled(&mut self, name: &str, demangled: String) -> bool {
        match self.exports.get_mut(name) {
            Some(export) => {
                export.demangled_name = Some(demangled);
                true
            }
            None => false,
        }
    }

    pub fn demangled_count(&self) -> usize {
        self.exports.values().filter(|e| e.demangled_name.is_some()).count()
    }

    pub fn forwarded_count(&self) -> usize {
        self.exports.values().filter(|e| e.is_forwarded()).count()
    }
}

impl FromIterator<ExportedSymbol> for ExportTable {
    fn from_iter<I: IntoIterator<Item = ExportedSymbol>>(iter: I) -> Self {
        let mut table = ExportTable::new();
        for export in iter {
            table.insert(export);
        }
        table
    }
}
