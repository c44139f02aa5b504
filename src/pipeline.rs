// Thu Oct 15 2026 - Alex

use crate::analyzers::{analyzer_for_path, load_external, strategy_for, AnalyzerKind};
use crate::binary::BinaryInfo;
use crate::catalog::{ConfidenceSummary, Invocable, RunConditions};
use crate::config::{Config, ConfigError};
use crate::docs::DocIndex;
use crate::headers::{Candidate, CorrelationReport, HeaderCorrelator};
use crate::output::{Bundle, EmissionInputs, EmissionReport, OutputError, TieredEmitter};
use crate::process::ToolRunner;
use crate::scoring::ConfidenceScorer;
use crate::symbol::{resolve_forwarders, DemangleStats, Demangler, ExportExtractor, ExtractionError, ExtractionReport, ForwardMap};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no target given: supply a binary or a pre-captured export dump")]
    NoTarget,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub binary: Option<PathBuf>,
    pub exports_dump: Option<PathBuf>,
    pub headers: Option<PathBuf>,
    pub docs: Option<PathBuf>,
    pub external: Vec<PathBuf>,
}

impl PipelineInputs {
    pub fn for_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn for_dump(path: impl Into<PathBuf>) -> Self {
        Self {
            exports_dump: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, dir: Option<PathBuf>) -> Self {
        self.headers = dir;
        self
    }

    pub fn with_docs(mut self, dir: Option<PathBuf>) -> Self {
        self.docs = dir;
        self
    }

    pub fn with_external(mut self, files: Vec<PathBuf>) -> Self {
        self.external = files;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metadata,
    Extract,
    Resolve,
    Demangle,
    Correlate,
    Docs,
    External,
    Emit,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Metadata => "Reading binary metadata",
            Stage::Extract => "Extracting exports",
            Stage::Resolve => "Resolving forwarders",
            Stage::Demangle => "Demangling names",
            Stage::Correlate => "Correlating headers",
            Stage::Docs => "Scanning documentation",
            Stage::External => "Loading external invocables",
            Stage::Emit => "Writing output bundles",
        }
    }
}

/// Receives stage transitions. Both hooks default to doing nothing.
pub trait PipelineObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage, _detail: &str) {}
}

pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub base_name: String,
    pub binary: BinaryInfo,
    pub analyzer: AnalyzerKind,
    pub extraction: ExtractionReport,
    pub forwards: ForwardMap,
    pub demangle: DemangleStats,
    pub headers: Option<CorrelationReport>,
    pub docs: Option<DocIndex>,
    pub external: Vec<Invocable>,
    pub bundles: Vec<Bundle>,
    pub summary: ConfidenceSummary,
    pub emission: EmissionReport,
}

impl AnalysisRun {
    pub fn export_count(&self) -> usize {
        self.extraction.table.len()
    }

    /// The richest bundle's entries: the unified catalog of this run.
    pub fn catalog(&self) -> &[Invocable] {
        self.bundles
            .iter()
            .find(|b| b.tier.has_invocables())
            .map(|b| b.invocables.as_slice())
            .unwrap_or(&[])
    }

    pub fn bundle(&self, tier: crate::output::TierLevel) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.tier == tier)
    }
}

/// Extractor, resolver/demangler, correlator, scorer, emitter, in that order.
/// Only export extraction can fail the run.
pub struct DiscoveryPipeline {
    config: Config,
    scorer: ConfidenceScorer,
}

impl DiscoveryPipeline {
    pub fn new(config: Config) -> Result<Self, DiscoveryError> {
        config.validate()?;
        let scorer = ConfidenceScorer::new(config.heuristics.clone());
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, inputs: &PipelineInputs) -> Result<AnalysisRun, DiscoveryError> {
        self.run_observed(inputs, &SilentObserver)
    }

    pub fn run_observed(
        &self,
        inputs: &PipelineInputs,
        observer: &dyn PipelineObserver,
    ) -> Result<AnalysisRun, DiscoveryError> {
        let cfg = &self.config;

        observer.stage_started(Stage::Metadata);
        let binary = match (&inputs.binary, &inputs.exports_dump) {
            (Some(path), _) => BinaryInfo::inspect(path, &cfg.known_system_binaries),
            (None, Some(dump)) => BinaryInfo::from_dump(dump),
            (None, None) => return Err(DiscoveryError::NoTarget),
        };
        let base_name = cfg.base_name(&binary.stem());
        let analyzer = classify_target(inputs);
        let strategy = strategy_for(analyzer);
        if !strategy.in_core {
            warn!(
                "{} is cataloged by the {} analyzer; pass its output with --external",
                binary.name, strategy.discovered_by
            );
        }
        observer.stage_finished(Stage::Metadata, binary.target_type.name());

        observer.stage_started(Stage::Extract);
        let extraction = self.extract(inputs, &base_name)?;
        let mut table = extraction.table.clone();
        observer.stage_finished(Stage::Extract, &format!("{} exports", table.len()));

        observer.stage_started(Stage::Resolve);
        let forwards = resolve_forwarders(&table, cfg.max_forward_hops);
        observer.stage_finished(Stage::Resolve, &format!("{} forwarders", forwards.len()));

        observer.stage_started(Stage::Demangle);
        let demangle = if cfg.demangle && table.iter().any(|e| e.is_mangled()) {
            Demangler::new(ToolRunner::new(&cfg.demangle_tool, cfg.demangle_timeout())).demangle_table(&mut table)
        } else {
            DemangleStats::default()
        };
        observer.stage_finished(Stage::Demangle, &format!("{} demangled", demangle.demangled));

        observer.stage_started(Stage::Correlate);
        let headers = existing_dir(inputs.headers.as_deref(), "header").map(|dir| {
            HeaderCorrelator::new(cfg.header_extensions.clone()).correlate(dir, &Candidate::from_table(&table))
        });
        let matched = headers.as_ref().map_or(0, |h| h.matches.len());
        observer.stage_finished(Stage::Correlate, &format!("{} matched", matched));

        observer.stage_started(Stage::Docs);
        let docs = existing_dir(inputs.docs.as_deref(), "documentation").map(|dir| {
            let names: Vec<String> = table.names().map(str::to_string).collect();
            DocIndex::scan(dir, &names, &cfg.doc_extensions, cfg.max_doc_hits)
        });
        observer.stage_finished(Stage::Docs, &format!("{} referenced", docs.as_ref().map_or(0, |d| d.len())));

        observer.stage_started(Stage::External);
        let mut external = Vec::new();
        for path in &inputs.external {
            match load_external(path) {
                Ok(mut loaded) => external.append(&mut loaded),
                Err(e) => warn!("{}", e),
            }
        }
        observer.stage_finished(Stage::External, &format!("{} loaded", external.len()));

        observer.stage_started(Stage::Emit);
        let emitter = TieredEmitter::new(&self.scorer, &cfg.output_dir, base_name.as_str());
        let emission_inputs = EmissionInputs {
            binary: &binary,
            exports: &table,
            forwards: &forwards,
            headers: headers.as_ref(),
            docs: docs.as_ref(),
            external: &external,
        };
        let generated_at = chrono::Utc::now().to_rfc3339();
        let bundles = emitter.bundles(&emission_inputs, &generated_at);

        let conditions = RunConditions {
            headers_supplied: headers.is_some(),
            docs_supplied: docs.is_some(),
            demangle_enabled: cfg.demangle,
            demangler_available: demangle.tool_available,
            mangled_count: table.iter().filter(|e| e.is_mangled()).count(),
            is_signed: binary.is_signed,
        };
        let catalog = bundles
            .iter()
            .find(|b| b.tier.has_invocables())
            .map(|b| b.invocables.as_slice())
            .unwrap_or(&[]);
        let summary = ConfidenceSummary::from_catalog(catalog, &conditions);
        let emission = emitter.write(&bundles, Some(&summary))?;
        observer.stage_finished(Stage::Emit, &format!("{} files", emission.files.len()));

        info!(
            "Analysis of {} complete: {} exports, {} tiers written to {}",
            binary.name,
            table.len(),
            emission.tiers.len(),
            emitter.out_dir().display()
        );

        let extraction = ExtractionReport { table, ..extraction };
        Ok(AnalysisRun {
            base_name,
            binary,
            analyzer,
            extraction,
            forwards,
            demangle,
            headers,
            docs,
            external,
            bundles,
            summary,
            emission,
        })
    }

    fn extract(&self, inputs: &PipelineInputs, base_name: &str) -> Result<ExtractionReport, DiscoveryError> {
        let cfg = &self.config;
        let mut extractor = ExportExtractor::new(ToolRunner::new(&cfg.export_tool, cfg.tool_timeout()));

        if let Some(dump) = &inputs.exports_dump {
            return Ok(extractor.from_dump_file(dump)?);
        }
        let Some(binary) = &inputs.binary else {
            return Err(DiscoveryError::NoTarget);
        };

        if cfg.save_raw_dump {
            fs::create_dir_all(&cfg.output_dir).map_err(|source| OutputError::CreateDir {
                path: cfg.output_dir.clone(),
                source,
            })?;
            extractor = extractor.with_raw_output(cfg.output_dir.join(format!("{}_exports_raw.txt", base_name)));
        }
        Ok(extractor.from_binary(binary)?)
    }
}

/// Dumps and binaries without a known extension are read as native images.
pub fn classify_target(inputs: &PipelineInputs) -> AnalyzerKind {
    inputs
        .binary
        .as_deref()
        .and_then(analyzer_for_path)
        .unwrap_or(AnalyzerKind::NativeExports)
}

fn existing_dir<'a>(dir: Option<&'a Path>, what: &str) -> Option<&'a Path> {
    let dir = dir?;
    if dir.is_dir() {
        Some(dir)
    } else {
        warn!("{} directory {} does not exist; continuing without it", what, dir.display());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_target_is_an_error() {
        let pipeline = DiscoveryPipeline::new(Config::default()).unwrap();
        assert!(matches!(pipeline.run(&PipelineInputs::default()), Err(DiscoveryError::NoTarget)));
    }

    #[test]
    fn test_target_classification() {
        assert_eq!(classify_target(&PipelineInputs::for_dump("exports.txt")), AnalyzerKind::NativeExports);
        assert_eq!(classify_target(&PipelineInputs::for_binary("zlib1.dll")), AnalyzerKind::NativeExports);
        assert_eq!(classify_target(&PipelineInputs::for_binary("libz.so.1")), AnalyzerKind::NativeExports);
        assert_eq!(
            classify_target(&PipelineInputs::for_binary("deploy.ps1")),
            AnalyzerKind::Script(crate::analyzers::ScriptLanguage::PowerShell)
        );
        assert!(!strategy_for(classify_target(&PipelineInputs::for_binary("api.idl"))).in_core);
    }

    #[test]
    fn test_unreadable_dump_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = Config::default().with_output_dir(dir.path().join("out"));
        let pipeline = DiscoveryPipeline::new(config).unwrap();
        let result = pipeline.run(&PipelineInputs::for_dump(dir.path().join("missing.txt")));
        assert!(matches!(result, Err(DiscoveryError::Extraction(_))));
    }

    #[test]
    fn test_missing_optional_dirs_degrade() {
        let dir = TempDir::new().unwrap();
        let dump = dir.path().join("sample.txt");
        fs::write(
            &dump,
            "    ordinal hint RVA      name\n\n          1    0 00001000 Foo\n\n  Summary\n",
        )
        .unwrap();
        let config = Config::default().with_output_dir(dir.path().join("out"));
        let pipeline = DiscoveryPipeline::new(config).unwrap();
        let inputs = PipelineInputs::for_dump(&dump)
            .with_headers(Some(dir.path().join("no_headers")))
            .with_docs(Some(dir.path().join("no_docs")));
        let run = pipeline.run(&inputs).unwrap();
        assert!(run.headers.is_none());
        assert!(run.docs.is_none());
        assert_eq!(run.export_count(), 1);
        assert!(run.summary.is_consistent_with(run.catalog()));
    }
}
