// Thu Oct 15 2026 - Alex

use crate::process::{ToolError, ToolRunner};
use crate::symbol::export::ExportTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemangleStats {
    pub attempted: usize,
    pub demangled: usize,
    pub tool_available: bool,
}

/// Recovers readable names through an external demangler (`undname`,
/// `c++filt`, ...). Every failure leaves the name untouched.
pub struct Demangler {
    runner: ToolRunner,
}

impl Demangler {
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    pub fn demangle_table(&self, table: &mut ExportTable) -> DemangleStats {
        let mangled: Vec<String> = table
            .iter()
            .filter(|e| e.is_mangled())
            .map(|e| e.name.clone())
            .collect();

        let mut stats = DemangleStats { tool_available: true, ..Default::default() };

        for name in mangled {
            stats.attempted += 1;
            match self.runner.run(&[name.as_str()]) {
                Ok(output) => {
                    if let Some(readable) = parse_demangler_output(&name, &output.stdout) {
                        table.set_demangled(&name, readable);
                        stats.demangled += 1;
                    }
                }
                Err(e @ ToolError::NotFound(_)) => {
                    log::warn!("Demangler unavailable, leaving names mangled: {}", e);
                    stats.tool_available = false;
                    break;
                }
                Err(e) => {
                    log::debug!("Demangling {} failed: {}", name, e);
                }
            }
        }

        if stats.attempted > 0 {
            log::info!("Demangled {}/{} decorated names", stats.demangled, stats.attempted);
        }
        stats
    }
}

/// Understands both `undname` ("... is: <name>") and plain one-line output.
pub fn parse_demangler_output(mangled: &str, output: &str) -> Option<String> {
    let lines: Vec<&str> = output.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let candidate = lines
        .iter()
        .find_map(|line| {
            line.split_once(" is: ")
                .or_else(|| line.split_once("is :- "))
                .map(|(_, rest)| rest.trim())
        })
        .or_else(|| lines.last().copied())?;

    let candidate = candidate.trim_matches('"');
    if candidate.is_empty() || candidate == mangled {
        None
    } else {
        Some(candidate.to_string())
    }
}

/// Bare function identifier inside a demangled signature, used as a header
/// search alias: `int __cdecl ns::Foo(int)` gives `Foo`.
pub fn alias_search_name(demangled: &str) -> Option<String> {
    let head = demangled.split('(').next()?.trim_end();
    let last = head.rsplit(|c: char| c.is_whitespace() || c == '*' || c == '&').next()?;
    let ident = last.rsplit("::").next()?;
    let valid = !ident.is_empty()
        && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !ident.chars().next().map_or(true, |c| c.is_ascii_digit());
    if valid {
        Some(ident.to_string())
    } else {
        None
    }
}
