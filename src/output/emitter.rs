// Thu Oct 15 2026 - Alex

use crate::binary::BinaryInfo;
use crate::catalog::{merge_external, AssemblyInputs, CatalogAssembler, ConfidenceSummary, Invocable};
use crate::docs::DocIndex;
use crate::headers::CorrelationReport;
use crate::output::csv::render_csv;
use crate::output::json::{CatalogDocument, JsonSerializer};
use crate::output::markdown::{render_api, render_metadata, render_tier_summary};
use crate::output::summary_text::render_confidence_summary;
use crate::output::{Bundle, ExportCounts, OutputError, TierLevel};
use crate::scoring::ConfidenceScorer;
use crate::symbol::{ExportTable, ForwardMap};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run produced, before any tier scoping.
#[derive(Debug, Clone, Copy)]
pub struct EmissionInputs<'a> {
    pub binary: &'a BinaryInfo,
    pub exports: &'a ExportTable,
    pub forwards: &'a ForwardMap,
    pub headers: Option<&'a CorrelationReport>,
    pub docs: Option<&'a DocIndex>,
    pub external: &'a [Invocable],
}

impl<'a> EmissionInputs<'a> {
    fn has_header_matches(&self) -> bool {
        self.headers.map_or(false, |h| !h.matches.is_empty())
    }

    fn counts(&self) -> ExportCounts {
        ExportCounts {
            total_exports: self.exports.len(),
            demangled: self.exports.demangled_count(),
            header_matched: self.headers.map_or(0, |h| h.matches.len()),
            forwarded: self.exports.forwarded_count(),
            doc_referenced: self.docs.map_or(0, |d| d.len()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmissionReport {
    pub tiers: Vec<TierLevel>,
    pub files: Vec<PathBuf>,
}

/// Builds one bundle per tier the inputs can support and writes them out.
/// Each bundle is assembled and scored from only the inputs its tier may see.
pub struct TieredEmitter<'s> {
    scorer: &'s ConfidenceScorer,
    out_dir: PathBuf,
    base_name: String,
    serializer: JsonSerializer,
}

impl<'s> TieredEmitter<'s> {
    pub fn new(scorer: &'s ConfidenceScorer, out_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            scorer,
            out_dir: out_dir.into(),
            base_name: base_name.into(),
            serializer: JsonSerializer::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn plan(inputs: &EmissionInputs<'_>) -> Vec<TierLevel> {
        let has_entries = !inputs.exports.is_empty() || !inputs.external.is_empty();
        let mut tiers = Vec::new();
        if has_entries {
            if inputs.has_header_matches() && inputs.docs.is_some() {
                tiers.push(TierLevel::Tier1);
            }
            if inputs.has_header_matches() {
                tiers.push(TierLevel::Tier2);
            }
            if inputs.exports.demangled_count() > 0 {
                tiers.push(TierLevel::Tier3);
            }
            tiers.push(TierLevel::Tier4);
        }
        tiers.push(TierLevel::Tier5);
        tiers
    }

    pub fn bundles(&self, inputs: &EmissionInputs<'_>, generated_at: &str) -> Vec<Bundle> {
        let assembler = CatalogAssembler::new(self.scorer);
        let counts = inputs.counts();
        let plan = Self::plan(inputs);
        let richest = plan.iter().copied().find(|t| t.has_invocables());

        plan.into_iter()
            .map(|tier| {
                let invocables = if tier.has_invocables() {
                    let scoped = AssemblyInputs::new(inputs.binary, inputs.exports, inputs.forwards)
                        .with_headers(inputs.headers.filter(|_| tier.sees_headers()))
                        .with_docs(inputs.docs.filter(|_| tier.sees_docs()))
                        .with_demangled(tier.sees_demangled());
                    let native = assembler.assemble(&scoped);
                    // External entries carry evidence no narrower tier may see.
                    if Some(tier) == richest {
                        merge_external(native, inputs.external.to_vec())
                    } else {
                        native
                    }
                } else {
                    Vec::new()
                };
                Bundle {
                    tier,
                    binary: inputs.binary.clone(),
                    invocables,
                    counts,
                    generated_at: generated_at.to_string(),
                }
            })
            .collect()
    }

    pub fn write(&self, bundles: &[Bundle], summary: Option<&ConfidenceSummary>) -> Result<EmissionReport, OutputError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| OutputError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut report = EmissionReport::default();
        for bundle in bundles {
            let stem = bundle.file_stem(&self.base_name);
            if bundle.tier.has_invocables() {
                let json_path = self.out_dir.join(format!("{}_invocables.json", stem));
                self.serializer
                    .serialize_to_file(&CatalogDocument::from_bundle(bundle), &json_path)?;
                report.files.push(json_path);
                report.files.push(self.write_text(&format!("{}_api.csv", stem), &render_csv(bundle))?);
                report.files.push(self.write_text(&format!("{}_api.md", stem), &render_api(bundle))?);
            } else {
                let json_path = self.out_dir.join(format!("{}_metadata.json", stem));
                self.serializer
                    .serialize_to_file(&CatalogDocument::from_bundle(bundle), &json_path)?;
                report.files.push(json_path);
                report.files.push(self.write_text(&format!("{}_metadata.md", stem), &render_metadata(bundle))?);
            }
            info!("Wrote tier {} bundle ({} invocables)", bundle.tier.number(), bundle.invocables.len());
            report.tiers.push(bundle.tier);
        }

        let tiers_md = render_tier_summary(&self.base_name, bundles);
        report.files.push(self.write_text(&format!("{}_tiers.md", self.base_name), &tiers_md)?);

        if let (Some(summary), Some(first)) = (summary, bundles.first()) {
            let text = render_confidence_summary(summary, &first.binary.name, &first.generated_at);
            report
                .files
                .push(self.write_text(&format!("{}_confidence_summary.txt", self.base_name), &text)?);
        }

        Ok(report)
    }

    fn write_text(&self, file_name: &str, contents: &str) -> Result<PathBuf, OutputError> {
        let path = self.out_dir.join(file_name);
        fs::write(&path, contents).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
