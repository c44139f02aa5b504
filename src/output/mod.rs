// Thu Oct 15 2026 - Alex

pub mod csv;
pub mod emitter;
pub mod json;
pub mod markdown;
pub mod summary_text;

use crate::binary::BinaryInfo;
use crate::catalog::Invocable;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub use emitter::{EmissionInputs, EmissionReport, TieredEmitter};
pub use json::{CatalogDocument, CatalogMetadata, CatalogStatistics, JsonSerializer};

/// Carried by every catalog document. Downstream consumers key on it.
pub const SCHEMA_VERSION: &str = "2.0.0";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TierLevel {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    Tier5,
}

impl TierLevel {
    pub const ALL: [TierLevel; 5] = [
        TierLevel::Tier1,
        TierLevel::Tier2,
        TierLevel::Tier3,
        TierLevel::Tier4,
        TierLevel::Tier5,
    ];

    pub fn number(&self) -> u8 {
        match self {
            TierLevel::Tier1 => 1,
            TierLevel::Tier2 => 2,
            TierLevel::Tier3 => 3,
            TierLevel::Tier4 => 4,
            TierLevel::Tier5 => 5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TierLevel::Tier1 => "exports + headers + documentation",
            TierLevel::Tier2 => "exports + headers",
            TierLevel::Tier3 => "exports + demangled names",
            TierLevel::Tier4 => "exports only",
            TierLevel::Tier5 => "binary metadata only",
        }
    }

    pub fn sees_headers(&self) -> bool {
        matches!(self, TierLevel::Tier1 | TierLevel::Tier2)
    }

    pub fn sees_docs(&self) -> bool {
        matches!(self, TierLevel::Tier1)
    }

    pub fn sees_demangled(&self) -> bool {
        matches!(self, TierLevel::Tier1 | TierLevel::Tier2 | TierLevel::Tier3)
    }

    pub fn has_invocables(&self) -> bool {
        !matches!(self, TierLevel::Tier5)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportCounts {
    pub total_exports: usize,
    pub demangled: usize,
    pub header_matched: usize,
    pub forwarded: usize,
    pub doc_referenced: usize,
}

/// One self-contained output set. Its entries were assembled from exactly
/// the inputs its tier may see.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub tier: TierLevel,
    pub binary: BinaryInfo,
    pub invocables: Vec<Invocable>,
    pub counts: ExportCounts,
    pub generated_at: String,
}

impl Bundle {
    pub fn file_stem(&self, base: &str) -> String {
        format!("{}_tier{}", base, self.tier.number())
    }
}
