// Thu Oct 15 2026 - Alex

use crate::catalog::Invocable;
use crate::output::{Bundle, TierLevel};

/// `<base>_tier<N>_api.md`: one section per Invocable.
pub fn render_api(bundle: &Bundle) -> String {
    let mut md = String::new();
    md.push_str(&format!("# {} API Reference\n\n", bundle.binary.name));
    md.push_str(&format!("- **Tier:** {} ({})\n", bundle.tier.number(), bundle.tier.description()));
    md.push_str(&format!("- **Generated:** {}\n", bundle.generated_at));
    md.push_str(&format!("- **Total invocables:** {}\n\n", bundle.invocables.len()));

    for invocable in &bundle.invocables {
        md.push_str(&render_entry(invocable));
        md.push_str("---\n\n");
    }
    md
}

fn render_entry(inv: &Invocable) -> String {
    let mut md = format!("## {}\n\n", inv.name);

    if let Some(ordinal) = inv.ordinal {
        md.push_str(&format!("- **Ordinal:** {}\n", ordinal));
    }
    md.push_str(&format!("- **Kind:** {}\n", inv.kind.as_str()));
    md.push_str(&format!("- **Confidence:** {}\n", inv.confidence));
    if let Some(target) = &inv.evidence.forwarded_to {
        md.push_str(&format!("- **Forwarded to:** `{}`\n", target));
    }
    if let Some(demangled) = &inv.evidence.demangled_name {
        md.push_str(&format!("- **Demangled:** `{}`\n", demangled));
    }
    if let (Some(file), Some(line)) = (&inv.documentation.source_file, inv.documentation.source_line) {
        md.push_str(&format!("- **Declared in:** `{}:{}`\n", file, line));
    }
    md.push('\n');

    if let Some(prototype) = &inv.signature.full_prototype {
        md.push_str("```c\n");
        md.push_str(prototype);
        md.push_str(";\n```\n\n");
    }
    if let Some(description) = &inv.documentation.description {
        md.push_str(description);
        md.push_str("\n\n");
    }
    if !inv.documentation.references.is_empty() {
        md.push_str("Referenced in:\n\n");
        for reference in &inv.documentation.references {
            md.push_str(&format!("- `{}`\n", reference));
        }
        md.push('\n');
    }
    md
}

/// `<base>_tier5_metadata.md`.
pub fn render_metadata(bundle: &Bundle) -> String {
    let binary = &bundle.binary;
    let counts = &bundle.counts;
    let mut md = format!("# {} Metadata\n\n", binary.name);
    md.push_str(&format!("- **Generated:** {}\n\n", bundle.generated_at));

    md.push_str("| Property | Value |\n");
    md.push_str("|----------|-------|\n");
    md.push_str(&format!("| Type | {} |\n", binary.target_type.name()));
    md.push_str(&format!("| Architecture | {} |\n", binary.architecture));
    md.push_str(&format!("| 64-bit | {} |\n", binary.is_64));
    md.push_str(&format!("| File size | {} bytes |\n", binary.file_size));
    md.push_str(&format!("| Signed | {} |\n", binary.is_signed));
    md.push_str(&format!("| Publisher | {} |\n", binary.publisher.as_deref().unwrap_or("-")));
    md.push_str(&format!("| Known system binary | {} |\n\n", binary.is_known_system_binary));

    md.push_str("## Export counts\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Total exports | {} |\n", counts.total_exports));
    md.push_str(&format!("| Demangled | {} |\n", counts.demangled));
    md.push_str(&format!("| Header matched | {} |\n", counts.header_matched));
    md.push_str(&format!("| Forwarded | {} |\n", counts.forwarded));
    md.push_str(&format!("| Referenced in docs | {} |\n", counts.doc_referenced));
    md
}

/// `<base>_tiers.md`: which tiers this run produced.
pub fn render_tier_summary(base: &str, bundles: &[Bundle]) -> String {
    let mut md = format!("# {} Output Tiers\n\n", base);
    md.push_str("| Tier | Contents | Invocables | Produced |\n");
    md.push_str("|------|----------|------------|----------|\n");
    for tier in TierLevel::ALL {
        let produced = bundles.iter().find(|b| b.tier == tier);
        let count = match produced {
            Some(b) if tier.has_invocables() => b.invocables.len().to_string(),
            _ => "-".to_string(),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            tier.number(),
            tier.description(),
            count,
            if produced.is_some() { "yes" } else { "no" }
        ));
    }
    md
}
