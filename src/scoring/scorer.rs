// Thu Oct 15 2026 - Alex

use crate::scoring::evidence::{ConfidenceFactors, SymbolEvidence};
use crate::scoring::heuristics::NamingHeuristics;
use crate::scoring::rules::{default_rules, RuleContext, ScoringRule, BASE_REASON, SIGNED_RULE};
use crate::scoring::tier::ConfidenceTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub base_export: u32,
    pub header_match: u32,
    pub demangled: u32,
    pub forwarded: u32,
    pub signed: u32,
    pub documented: u32,
    pub high_threshold: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base_export: 2,
            header_match: 3,
            demangled: 1,
            forwarded: 1,
            signed: 2,
            documented: 1,
            high_threshold: 6,
        }
    }
}

impl ScoreWeights {
    pub fn points(&self, evidence: &SymbolEvidence<'_>) -> u32 {
        let mut points = self.base_export;
        if evidence.header.is_some() {
            points += self.header_match;
        }
        if evidence.is_demangled() {
            points += self.demangled;
        }
        if evidence.forward_resolved {
            points += self.forwarded;
        }
        if evidence.provenance.is_signed {
            points += self.signed;
        }
        if evidence.has_documentation() {
            points += self.documented;
        }
        points
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub tier: ConfidenceTier,
    pub reasons: Vec<String>,
    pub factors: ConfidenceFactors,
    pub points: u32,
}

/// Turns per-symbol evidence into a tier. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    heuristics: NamingHeuristics,
    weights: ScoreWeights,
    rules: Vec<ScoringRule>,
}

impl ConfidenceScorer {
    pub fn new(heuristics: NamingHeuristics) -> Self {
        Self {
            heuristics,
            weights: ScoreWeights::default(),
            rules: default_rules(),
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn score(&self, evidence: &SymbolEvidence<'_>) -> ConfidenceAssessment {
        let points = self.weights.points(evidence);
        let ctx = RuleContext {
            evidence,
            heuristics: &self.heuristics,
            points,
            high_threshold: self.weights.high_threshold,
        };

        let fired: Vec<&ScoringRule> = self.rules.iter().filter(|rule| rule.fires(&ctx)).collect();

        let base = fired
            .iter()
            .filter_map(|rule| rule.tier())
            .max()
            .unwrap_or(ConfidenceTier::Low);

        let corroborated_signing = evidence.provenance.is_signed
            && fired
                .iter()
                .any(|rule| rule.name != SIGNED_RULE && rule.tier() == Some(base));
        let tier = if base != ConfidenceTier::Guaranteed && (evidence.forward_resolved || corroborated_signing) {
            base.raised()
        } else {
            base
        };

        let reasons = std::iter::once(BASE_REASON)
            .chain(fired.iter().map(|rule| rule.reason))
            .map(str::to_string)
            .collect();

        ConfidenceAssessment {
            tier,
            reasons,
            factors: ConfidenceFactors::from_evidence(evidence),
            points,
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(NamingHeuristics::default())
    }
}
