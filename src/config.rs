// Thu Oct 15 2026 - Alex

use crate::scoring::NamingHeuristics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export_tool: String,
    pub demangle_tool: String,
    pub demangle: bool,
    pub tool_timeout_secs: u64,
    pub demangle_timeout_secs: u64,
    pub max_forward_hops: usize,
    pub max_doc_hits: usize,
    pub header_extensions: Vec<String>,
    pub doc_extensions: Vec<String>,
    pub output_dir: PathBuf,
    pub tag: Option<String>,
    pub save_raw_dump: bool,
    pub heuristics: NamingHeuristics,
    pub known_system_binaries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_tool: "dumpbin".to_string(),
            demangle_tool: "undname".to_string(),
            demangle: true,
            tool_timeout_secs: 30,
            demangle_timeout_secs: 5,
            max_forward_hops: 32,
            max_doc_hits: 2,
            header_extensions: ["h", "hpp", "hh", "hxx", "inl"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            doc_extensions: ["md", "txt", "rst", "adoc", "htm", "html"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: PathBuf::from("invocable_out"),
            tag: None,
            save_raw_dump: true,
            heuristics: NamingHeuristics::default(),
            known_system_binaries: default_system_binaries(),
        }
    }
}

fn default_system_binaries() -> Vec<String> {
    [
        "kernel32.dll",
        "kernelbase.dll",
        "ntdll.dll",
        "user32.dll",
        "gdi32.dll",
        "advapi32.dll",
        "shell32.dll",
        "ole32.dll",
        "oleaut32.dll",
        "comctl32.dll",
        "comdlg32.dll",
        "ws2_32.dll",
        "winhttp.dll",
        "wininet.dll",
        "crypt32.dll",
        "bcrypt.dll",
        "msvcrt.dll",
        "ucrtbase.dll",
        "version.dll",
        "shlwapi.dll",
        "libc.so.6",
        "libm.so.6",
        "libpthread.so.0",
        "libdl.so.2",
        "libsystem.b.dylib",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)?;
        Ok(())
    }

    pub fn with_export_tool(mut self, tool: &str) -> Self {
        self.export_tool = tool.to_string();
        self
    }

    pub fn with_demangle_tool(mut self, tool: &str) -> Self {
        self.demangle_tool = tool.to_string();
        self
    }

    pub fn with_demangle(mut self, enabled: bool) -> Self {
        self.demangle = enabled;
        self
    }

    pub fn with_tool_timeout(mut self, secs: u64) -> Self {
        self.tool_timeout_secs = secs;
        self
    }

    pub fn with_max_doc_hits(mut self, hits: usize) -> Self {
        self.max_doc_hits = hits;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = if tag.is_empty() { None } else { Some(tag.to_string()) };
        self
    }

    pub fn with_save_raw_dump(mut self, save: bool) -> Self {
        self.save_raw_dump = save;
        self
    }

    pub fn with_heuristics(mut self, heuristics: NamingHeuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn demangle_timeout(&self) -> Duration {
        Duration::from_secs(self.demangle_timeout_secs)
    }

    /// Output file stem: the target stem plus the optional tag.
    pub fn base_name(&self, stem: &str) -> String {
        match &self.tag {
            Some(tag) => format!("{}_{}", stem, tag),
            None => stem.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool_timeout_secs == 0 || self.demangle_timeout_secs == 0 {
            return Err(ConfigError::Invalid("tool timeouts must be greater than 0".to_string()));
        }
        if self.max_forward_hops == 0 {
            return Err(ConfigError::Invalid("max_forward_hops must be greater than 0".to_string()));
        }
        if self.header_extensions.is_empty() {
            return Err(ConfigError::Invalid("header_extensions must not be empty".to_string()));
        }
        if self.doc_extensions.is_empty() {
            return Err(ConfigError::Invalid("doc_extensions must not be empty".to_string()));
        }
        if self.heuristics.library_prefix_min_len < 2 {
            return Err(ConfigError::Invalid(
                "heuristics.library_prefix_min_len must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn has_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
