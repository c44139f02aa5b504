// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered confidence tiers. `Ord` follows reliability, so `Low < Guaranteed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
    Guaranteed,
}

impl ConfidenceTier {
    /// Highest first, the order summaries and reports list tiers in.
    pub const DESCENDING: [ConfidenceTier; 4] = [
        ConfidenceTier::Guaranteed,
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
            ConfidenceTier::Guaranteed => "guaranteed",
        }
    }

    /// One level up, never past `High`. `Guaranteed` is only reachable from
    /// a header match.
    pub fn raised(self) -> Self {
        match self {
            ConfidenceTier::Low => ConfidenceTier::Medium,
            ConfidenceTier::Medium | ConfidenceTier::High => ConfidenceTier::High,
            ConfidenceTier::Guaranteed => ConfidenceTier::Guaranteed,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
