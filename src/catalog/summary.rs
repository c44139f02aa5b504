// Thu Oct 15 2026 - Alex

use crate::catalog::invocable::Invocable;
use crate::scoring::ConfidenceTier;
use itertools::Itertools;
use serde::Serialize;

const SAMPLE_HEAD: usize = 5;
const SAMPLE_TAIL: usize = 2;

/// Which optional inputs a run had. Drives the improvement hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConditions {
    pub headers_supplied: bool,
    pub docs_supplied: bool,
    /// Demangling was requested for this run.
    pub demangle_enabled: bool,
    pub demangler_available: bool,
    pub mangled_count: usize,
    pub is_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: ConfidenceTier,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    pub name: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSample {
    pub tier: ConfidenceTier,
    pub head: Vec<SampleEntry>,
    pub omitted: usize,
    pub tail: Vec<SampleEntry>,
}

/// Aggregate view of a catalog. Every number is computed from the entries'
/// own tiers and reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceSummary {
    pub total: usize,
    pub tiers: Vec<TierCount>,
    pub reasons: Vec<(String, usize)>,
    pub hints: Vec<String>,
    pub samples: Vec<TierSample>,
}

impl ConfidenceSummary {
    pub fn from_catalog(catalog: &[Invocable], conditions: &RunConditions) -> Self {
        let total = catalog.len();
        let by_tier = catalog.iter().map(|inv| inv.confidence).counts();

        let tiers = ConfidenceTier::DESCENDING
            .iter()
            .map(|&tier| {
                let count = by_tier.get(&tier).copied().unwrap_or(0);
                TierCount {
                    tier,
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();

        let reasons = catalog
            .iter()
            .flat_map(|inv| inv.confidence_reasons.iter().cloned())
            .counts()
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .collect();

        let samples = ConfidenceTier::DESCENDING
            .iter()
            .map(|&tier| sample_tier(catalog, tier))
            .collect();

        Self {
            total,
            tiers,
            reasons,
            hints: improvement_hints(catalog, conditions),
            samples,
        }
    }

    pub fn count(&self, tier: ConfidenceTier) -> usize {
        self.tiers.iter().find(|t| t.tier == tier).map_or(0, |t| t.count)
    }

    pub fn percentage(&self, tier: ConfidenceTier) -> f64 {
        percentage(self.count(tier), self.total)
    }

    /// True when the per-tier counts match the catalog entry by entry.
    pub fn is_consistent_with(&self, catalog: &[Invocable]) -> bool {
        self.total == catalog.len()
            && ConfidenceTier::DESCENDING
                .iter()
                .all(|&tier| self.count(tier) == catalog.iter().filter(|inv| inv.confidence == tier).count())
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn sample_tier(catalog: &[Invocable], tier: ConfidenceTier) -> TierSample {
    let entries: Vec<SampleEntry> = catalog
        .iter()
        .filter(|inv| inv.confidence == tier)
        .map(|inv| SampleEntry {
            name: inv.name.clone(),
            reasons: inv.confidence_reasons.clone(),
        })
        .collect();

    if entries.len() <= SAMPLE_HEAD + SAMPLE_TAIL {
        return TierSample {
            tier,
            head: entries,
            omitted: 0,
            tail: Vec::new(),
        };
    }
    let omitted = entries.len() - SAMPLE_HEAD - SAMPLE_TAIL;
    TierSample {
        tier,
        head: entries[..SAMPLE_HEAD].to_vec(),
        omitted,
        tail: entries[entries.len() - SAMPLE_TAIL..].to_vec(),
    }
}

fn improvement_hints(catalog: &[Invocable], conditions: &RunConditions) -> Vec<String> {
    let mut hints = Vec::new();
    let matched = catalog.iter().filter(|inv| inv.confidence == ConfidenceTier::Guaranteed).count();

    if !conditions.headers_supplied {
        hints.push("Provide header files (.h/.hpp) to match function prototypes and reach guaranteed confidence".to_string());
    } else if matched < catalog.len() {
        hints.push(format!(
            "{} exports had no header declaration; add the headers that declare them",
            catalog.len() - matched
        ));
    }
    if !conditions.docs_supplied {
        hints.push("Provide a documentation directory to attach usage references".to_string());
    }
    if conditions.demangle_enabled && conditions.mangled_count > 0 && !conditions.demangler_available {
        hints.push(format!(
            "Install a demangler to recover readable names for {} decorated exports",
            conditions.mangled_count
        ));
    }
    if !conditions.is_signed {
        hints.push("Obtain signed binaries: digital signatures boost confidence".to_string());
    }
    hints
}
