// Thu Oct 15 2026 - Alex

pub mod analyzers;
pub mod binary;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod headers;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod scoring;
pub mod symbol;
pub mod text;
pub mod ui;

pub use binary::BinaryInfo;
pub use catalog::{ConfidenceSummary, Invocable, InvocableKind};
pub use config::Config;
pub use pipeline::{AnalysisRun, DiscoveryError, DiscoveryPipeline, PipelineInputs};
pub use scoring::{ConfidenceScorer, ConfidenceTier};
pub use symbol::{ExportTable, ExportedSymbol, ExtractionError};
