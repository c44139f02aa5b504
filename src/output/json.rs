// Thu Oct 15 2026 - Alex

use crate::catalog::Invocable;
use crate::output::{Bundle, ExportCounts, OutputError, SCHEMA_VERSION};
use crate::scoring::ConfidenceTier;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub target_path: String,
    pub target_name: String,
    pub target_type: String,
    pub architecture: String,
    pub file_size_bytes: u64,
    pub is_signed: bool,
    pub publisher: Option<String>,
    pub analysis_timestamp: String,
    pub pipeline_version: String,
    pub tier: u8,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_counts: Option<ExportCountsDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCountsDoc {
    pub total_exports: usize,
    pub demangled: usize,
    pub header_matched: usize,
    pub forwarded: usize,
}

impl From<ExportCounts> for ExportCountsDoc {
    fn from(counts: ExportCounts) -> Self {
        Self {
            total_exports: counts.total_exports,
            demangled: counts.demangled,
            header_matched: counts.header_matched,
            forwarded: counts.forwarded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_invocables: usize,
    pub guaranteed_count: usize,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
    pub signature_match_rate: f64,
    pub documented_count: usize,
}

impl CatalogStatistics {
    pub fn from_invocables(invocables: &[Invocable]) -> Self {
        let count = |tier: ConfidenceTier| invocables.iter().filter(|i| i.confidence == tier).count();
        let total = invocables.len();
        let with_signature = invocables.iter().filter(|i| i.has_signature()).count();
        Self {
            total_invocables: total,
            guaranteed_count: count(ConfidenceTier::Guaranteed),
            high_confidence_count: count(ConfidenceTier::High),
            medium_confidence_count: count(ConfidenceTier::Medium),
            low_confidence_count: count(ConfidenceTier::Low),
            signature_match_rate: if total == 0 { 0.0 } else { with_signature as f64 / total as f64 },
            documented_count: invocables.iter().filter(|i| i.is_documented()).count(),
        }
    }
}

/// `<base>_tier<N>_invocables.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub schema_version: String,
    pub metadata: CatalogMetadata,
    pub invocables: Vec<Invocable>,
    pub statistics: CatalogStatistics,
}

impl CatalogDocument {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let binary = &bundle.binary;
        let metadata = CatalogMetadata {
            target_path: binary
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| binary.name.clone()),
            target_name: binary.name.clone(),
            target_type: binary.target_type.name().to_string(),
            architecture: binary.architecture.clone(),
            file_size_bytes: binary.file_size,
            is_signed: binary.is_signed,
            publisher: binary.publisher.clone(),
            analysis_timestamp: bundle.generated_at.clone(),
            pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
            tier: bundle.tier.number(),
            schema_version: SCHEMA_VERSION.to_string(),
            export_counts: if bundle.tier.has_invocables() {
                None
            } else {
                Some(bundle.counts.into())
            },
        };
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            metadata,
            statistics: CatalogStatistics::from_invocables(&bundle.invocables),
            invocables: bundle.invocables.clone(),
        }
    }
}

pub struct JsonSerializer {
    pretty_print: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String, OutputError> {
        let text = if self.pretty_print {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    pub fn serialize_to_file<T: Serialize, P: AsRef<Path>>(&self, value: &T, path: P) -> Result<(), OutputError> {
        let text = self.serialize(value)?;
        let path = path.as_ref();
        let write_err = |source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes()).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        Ok(())
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}
