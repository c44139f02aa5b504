// Thu Oct 15 2026 - Alex

use crate::process::ToolRunner;
use crate::symbol::error::ExtractionError;
use crate::symbol::export::{ExportTable, ExportedSymbol};
use crate::symbol::pe::read_pe_exports;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

// ordinal hint rva name [= forward]
static EXPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+([0-9A-Fa-f]+)\s+([0-9A-Fa-f]{8}|-{8})\s+([^\s=]+)(?:\s*=\s*(\S+))?")
        .expect("export line pattern is valid")
});

static NONAME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+([0-9A-Fa-f]{8}|-{8})\s+\[NONAME\]").expect("noname line pattern is valid")
});

const DIAGNOSTIC_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSource {
    NativeParse,
    Tool,
    Dump,
}

impl ExportSource {
    pub fn name(&self) -> &'static str {
        match self {
            ExportSource::NativeParse => "native PE export directory",
            ExportSource::Tool => "export tool",
            ExportSource::Dump => "pre-captured dump",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub table: ExportTable,
    pub source: ExportSource,
    pub skipped_lines: usize,
    pub duplicates: usize,
    pub raw_text: Option<String>,
}

impl ExtractionReport {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Parses an export-table dump. Only lines between the column header row and
/// the summary marker are considered; anything that fails the line pattern is
/// skipped and counted.
pub fn parse_export_dump(text: &str) -> (ExportTable, usize, usize) {
    let mut table = ExportTable::new();
    let mut in_table = false;
    let mut skipped = 0;
    let mut duplicates = 0;

    for line in text.lines() {
        let lower = line.to_lowercase();
        if !in_table {
            if lower.contains("ordinal") && lower.contains("name") {
                in_table = true;
            }
            continue;
        }
        if line.trim().eq_ignore_ascii_case("summary") {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_export_line(line).or_else(|| parse_noname_line(line)) {
            Some(export) => {
                if !table.insert(export) {
                    duplicates += 1;
                }
            }
            None => {
                log::debug!("Skipping malformed export line: {}", line.trim());
                skipped += 1;
            }
        }
    }

    (table, skipped, duplicates)
}

pub fn parse_export_line(line: &str) -> Option<ExportedSymbol> {
    let caps = EXPORT_LINE.captures(line)?;
    let ordinal: u32 = caps.get(1)?.as_str().parse().ok()?;
    let hint = u32::from_str_radix(caps.get(2)?.as_str(), 16).ok()?;
    let rva_text = caps.get(3)?.as_str();
    let name = caps.get(4)?.as_str();

    let mut export = ExportedSymbol::new(name).with_ordinal(ordinal).with_hint(hint);
    if !rva_text.starts_with('-') {
        export = export.with_rva(u64::from_str_radix(rva_text, 16).ok()?);
    }
    if let Some(target) = caps.get(5) {
        export = export.with_forward(target.as_str());
    }
    Some(export)
}

/// `ordinal RVA [NONAME]` rows carry no hint and no name. The entry is named
/// `Ordinal<N>` after its ordinal.
pub fn parse_noname_line(line: &str) -> Option<ExportedSymbol> {
    let caps = NONAME_LINE.captures(line)?;
    let ordinal: u32 = caps.get(1)?.as_str().parse().ok()?;
    let rva_text = caps.get(2)?.as_str();

    let mut export = ExportedSymbol::new(&format!("Ordinal{}", ordinal)).with_ordinal(ordinal);
    if !rva_text.starts_with('-') {
        export = export.with_rva(u64::from_str_radix(rva_text, 16).ok()?);
    }
    Some(export)
}

/// First lines of the raw dump, numbered, for debugging an empty parse.
pub fn diagnostic_dump(text: &str) -> String {
    text.lines()
        .take(DIAGNOSTIC_LINES)
        .enumerate()
        .map(|(i, line)| format!("{:3}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ExportExtractor {
    runner: ToolRunner,
    raw_output: Option<PathBuf>,
}

impl ExportExtractor {
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner, raw_output: None }
    }

    /// Where the raw tool output is saved, if anywhere.
    pub fn with_raw_output(mut self, path: PathBuf) -> Self {
        self.raw_output = Some(path);
        self
    }

    pub fn from_dump_file(&self, path: &Path) -> Result<ExtractionReport, ExtractionError> {
        let bytes = fs::read(path).map_err(|e| ExtractionError::DumpUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(self.report_from_text(text, ExportSource::Dump))
    }

    /// Reads the PE export directory directly when possible and otherwise
    /// runs the export tool. Tool failure is fatal here.
    pub fn from_binary(&self, path: &Path) -> Result<ExtractionReport, ExtractionError> {
        let bytes = fs::read(path).map_err(|e| ExtractionError::BinaryUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        if let Some(exports) = read_pe_exports(&bytes) {
            if !exports.is_empty() {
                let mut table = ExportTable::new();
                let mut duplicates = 0;
                for export in exports {
                    if !table.insert(export) {
                        duplicates += 1;
                    }
                }
                log::info!("Read {} exports from the PE export directory", table.len());
                return Ok(ExtractionReport {
                    table,
                    source: ExportSource::NativeParse,
                    skipped_lines: 0,
                    duplicates,
                    raw_text: None,
                });
            }
        }

        let path_arg = path.to_string_lossy();
        let output = self.runner.run(&["/exports", path_arg.as_ref()])?;
        let text = output.combined();

        if let Some(raw_path) = &self.raw_output {
            if let Err(e) = fs::write(raw_path, &text) {
                log::warn!("Failed to save raw export dump to {}: {}", raw_path.display(), e);
            }
        }

        Ok(self.report_from_text(text, ExportSource::Tool))
    }

    fn report_from_text(&self, text: String, source: ExportSource) -> ExtractionReport {
        let (table, skipped_lines, duplicates) = parse_export_dump(&text);

        if table.is_empty() {
            log::error!(
                "No exports parsed from {}. First {} lines of raw output:\n{}",
                source.name(),
                DIAGNOSTIC_LINES,
                diagnostic_dump(&text)
            );
        } else if skipped_lines > 0 {
            log::info!("Skipped {} malformed export lines", skipped_lines);
        }

        ExtractionReport {
            table,
            source,
            skipped_lines,
            duplicates,
            raw_text: Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DUMP: &str = "\
Microsoft (R) COFF/PE Dumper Version 14.38
Dump of file sample.dll

File Type: DLL

  Section contains the following exports for sample.dll

    00000000 characteristics
           1 ordinal base
           4 number of functions
           4 number of names

    ordinal hint RVA      name

          1    0 00001000 Foo
          2    1 00001A40 Bar = Foo
          3    2 -------- Fwd = KERNEL32.GetProcAddress
          4    3 00002000 ?Baz@@YAHH@Z
          this line is garbage
          1    0 00001000 Foo

  Summary

        1000 .data
          7 999 00009999 AfterSummary
";

    #[test]
    fn test_parse_dump_roundtrips_fields_in_order() {
        let (table, skipped, duplicates) = parse_export_dump(DUMP);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Foo", "Bar", "Fwd", "?Baz@@YAHH@Z"]);
        assert_eq!(skipped, 1);
        assert_eq!(duplicates, 1);

        let foo = table.get("Foo").unwrap();
        assert_eq!(foo.ordinal, Some(1));
        assert_eq!(foo.hint_hex().as_deref(), Some("0"));
        assert_eq!(foo.rva_hex().as_deref(), Some("00001000"));

        let bar = table.get("Bar").unwrap();
        assert_eq!(bar.rva, Some(0x1A40));
        assert_eq!(bar.forwarded_to.as_deref(), Some("Foo"));

        let fwd = table.get("Fwd").unwrap();
        assert_eq!(fwd.rva, None);
        assert_eq!(fwd.forwarded_to.as_deref(), Some("KERNEL32.GetProcAddress"));
    }

    #[test]
    fn test_lines_outside_table_region_are_ignored() {
        let text = "1 0 00001000 Outside\nordinal hint RVA name\n2 1 00002000 Inside\n";
        let (table, _, _) = parse_export_dump(text);
        assert!(!table.contains("Outside"));
        assert!(table.contains("Inside"));
    }

    #[test]
    fn test_table_stops_at_summary() {
        let (table, _, _) = parse_export_dump(DUMP);
        assert!(!table.contains("AfterSummary"));
    }

    #[test]
    fn test_names_containing_summary_do_not_end_table() {
        let text = "ordinal hint RVA name\n1 0 00001000 Alpha\n2 1 00002000 GetSummaryInfo\n3 2 00003000 Omega\n\n  Summary\n";
        let (table, skipped, _) = parse_export_dump(text);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Alpha", "GetSummaryInfo", "Omega"]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_noname_rows_become_ordinal_entries() {
        let text = "ordinal hint RVA name\n1 0 00001000 Alpha\n        7      00001230 [NONAME]\n";
        let (table, skipped, _) = parse_export_dump(text);
        assert_eq!(skipped, 0);
        let entry = table.get("Ordinal7").unwrap();
        assert_eq!(entry.ordinal, Some(7));
        assert_eq!(entry.rva, Some(0x1230));
        assert!(entry.is_ordinal_only());
    }

    #[test]
    fn test_parse_single_line() {
        let export = parse_export_line("          1    0 00001000 Foo").unwrap();
        assert_eq!(export.name, "Foo");
        assert_eq!(export.hint, Some(0));
        assert!(parse_export_line("   not an export").is_none());
    }

    #[test]
    fn test_diagnostic_dump_is_bounded() {
        let text: String = (0..80).map(|i| format!("line {}\n", i)).collect();
        let dump = diagnostic_dump(&text);
        assert_eq!(dump.lines().count(), 50);
        assert!(dump.starts_with("  1: line 0"));
    }

    #[test]
    fn test_extract_from_dump_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports.txt");
        std::fs::write(&path, "ordinal hint RVA name\n1 0 00001000 Foo\n").unwrap();

        let extractor = ExportExtractor::new(ToolRunner::new("dumpbin", Duration::from_secs(1)));
        let report = extractor.from_dump_file(&path).unwrap();
        assert_eq!(report.source, ExportSource::Dump);
        assert_eq!(report.table.len(), 1);
    }

    #[test]
    fn test_missing_dump_is_fatal() {
        let extractor = ExportExtractor::new(ToolRunner::new("dumpbin", Duration::from_secs(1)));
        let err = extractor.from_dump_file(Path::new("/nonexistent/exports.txt")).unwrap_err();
        assert!(matches!(err, ExtractionError::DumpUnreadable { .. }));
    }

    #[test]
    fn test_missing_tool_is_fatal_for_non_pe_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pe.bin");
        std::fs::write(&path, b"plain bytes").unwrap();

        let extractor = ExportExtractor::new(ToolRunner::new(
            "definitely-not-a-real-tool-7f3a",
            Duration::from_secs(1),
        ));
        let err = extractor.from_binary(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Tool(_)));
    }
}
