// Thu Oct 15 2026 - Alex

use crate::scoring::evidence::SymbolEvidence;
use crate::scoring::heuristics::NamingHeuristics;
use crate::scoring::tier::ConfidenceTier;

pub const BASE_REASON: &str = "exported from binary";

/// What a rule predicate can see.
pub struct RuleContext<'a> {
    pub evidence: &'a SymbolEvidence<'a>,
    pub heuristics: &'a NamingHeuristics,
    pub points: u32,
    pub high_threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    /// Sets the base tier when it is the first such rule to fire.
    Tier(ConfidenceTier),
    /// Contributes a reason only.
    Note,
}

#[derive(Clone, Copy)]
pub struct ScoringRule {
    pub name: &'static str,
    pub effect: RuleEffect,
    pub reason: &'static str,
    pub predicate: fn(&RuleContext<'_>) -> bool,
}

impl ScoringRule {
    pub fn tier(&self) -> Option<ConfidenceTier> {
        match self.effect {
            RuleEffect::Tier(tier) => Some(tier),
            RuleEffect::Note => None,
        }
    }

    pub fn fires(&self, ctx: &RuleContext<'_>) -> bool {
        (self.predicate)(ctx)
    }
}

impl std::fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringRule")
            .field("name", &self.name)
            .field("effect", &self.effect)
            .field("reason", &self.reason)
            .finish()
    }
}

pub const SIGNED_RULE: &str = "signed";

/// Tier rules are listed highest tier first, so the first one that fires is
/// the strongest. Every predicate only gets truer as evidence is added.
pub fn default_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule {
            name: "header_match",
            effect: RuleEffect::Tier(ConfidenceTier::Guaranteed),
            reason: "complete signature from header file",
            predicate: |ctx| ctx.evidence.header.is_some(),
        },
        ScoringRule {
            name: "known_system_binary",
            effect: RuleEffect::Tier(ConfidenceTier::High),
            reason: "well-known system API",
            predicate: |ctx| ctx.evidence.provenance.is_known_system_binary,
        },
        ScoringRule {
            name: "point_threshold",
            effect: RuleEffect::Tier(ConfidenceTier::High),
            reason: "combined evidence crosses high threshold",
            predicate: |ctx| ctx.points >= ctx.high_threshold,
        },
        ScoringRule {
            name: "demangled",
            effect: RuleEffect::Tier(ConfidenceTier::Medium),
            reason: "demangled name recovered",
            predicate: |ctx| ctx.evidence.is_demangled(),
        },
        ScoringRule {
            name: SIGNED_RULE,
            effect: RuleEffect::Tier(ConfidenceTier::Medium),
            reason: "digitally signed",
            predicate: |ctx| ctx.evidence.provenance.is_signed,
        },
        ScoringRule {
            name: "library_prefix",
            effect: RuleEffect::Tier(ConfidenceTier::Medium),
            reason: "library prefix naming convention",
            predicate: |ctx| ctx.heuristics.matches_library_prefix(&ctx.evidence.symbol.name),
        },
        ScoringRule {
            name: "verb_prefix",
            effect: RuleEffect::Tier(ConfidenceTier::Medium),
            reason: "common API verb prefix",
            predicate: |ctx| ctx.heuristics.matches_verb_prefix(&ctx.evidence.symbol.name),
        },
        ScoringRule {
            name: "forward_resolved",
            effect: RuleEffect::Note,
            reason: "forwarded reference resolved",
            predicate: |ctx| ctx.evidence.forward_resolved,
        },
        ScoringRule {
            name: "documented",
            effect: RuleEffect::Note,
            reason: "has documentation",
            predicate: |ctx| ctx.evidence.has_documentation(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_rules_are_descending() {
        let tiers: Vec<ConfidenceTier> = default_rules().iter().filter_map(|r| r.tier()).collect();
        assert!(tiers.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(tiers.first(), Some(&ConfidenceTier::Guaranteed));
    }

    #[test]
    fn test_rule_names_are_unique() {
        let rules = default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }
}
