// Thu Oct 15 2026 - Alex

pub mod evidence;
pub mod heuristics;
pub mod rules;
pub mod scorer;
pub mod tier;

pub use evidence::{ConfidenceFactors, Provenance, SymbolEvidence};
pub use heuristics::NamingHeuristics;
pub use rules::{default_rules, RuleEffect, ScoringRule};
pub use scorer::{ConfidenceAssessment, ConfidenceScorer, ScoreWeights};
pub use tier::ConfidenceTier;
