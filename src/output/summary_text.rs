// Thu Oct 15 2026 - Alex

use crate::catalog::ConfidenceSummary;

const RULE: usize = 60;

/// `<base>_confidence_summary.txt`.
pub fn render_confidence_summary(summary: &ConfidenceSummary, target: &str, generated_at: &str) -> String {
    let heavy = "=".repeat(RULE);
    let light = "-".repeat(RULE);
    let mut lines = vec![
        "CONFIDENCE ANALYSIS SUMMARY".to_string(),
        heavy,
        String::new(),
        format!("Target: {}", target),
        format!("Total Invocables: {}", summary.total),
        format!("Analysis Date: {}", generated_at),
        String::new(),
        "CONFIDENCE BREAKDOWN".to_string(),
        light.clone(),
    ];

    for tier in &summary.tiers {
        lines.push(format!(
            "{:<11} {:4} ({:5.1}%)",
            tier.tier.as_str().to_uppercase(),
            tier.count,
            tier.percentage
        ));
    }
    lines.push(String::new());

    if !summary.reasons.is_empty() {
        lines.push("CONFIDENCE FACTORS (by frequency)".to_string());
        lines.push(light.clone());
        for (reason, count) in &summary.reasons {
            let pct = if summary.total == 0 {
                0.0
            } else {
                *count as f64 / summary.total as f64 * 100.0
            };
            lines.push(format!("  * {:<42} {:4} ({:5.1}%)", reason, count, pct));
        }
        lines.push(String::new());
    }

    lines.push("WAYS TO IMPROVE CONFIDENCE".to_string());
    lines.push(light.clone());
    if summary.hints.is_empty() {
        lines.push("  * All major confidence factors are present".to_string());
    } else {
        lines.extend(summary.hints.iter().map(|hint| format!("  * {}", hint)));
    }
    lines.push(String::new());

    lines.push("DETAILS BY CONFIDENCE LEVEL".to_string());
    lines.push(light);
    for sample in &summary.samples {
        let count = summary.count(sample.tier);
        lines.push(format!("\n{} ({} invocables):", sample.tier.as_str().to_uppercase(), count));
        for entry in &sample.head {
            push_sample(&mut lines, &entry.name, &entry.reasons);
        }
        if sample.omitted > 0 {
            lines.push(format!("  ... ({} more)", sample.omitted));
        }
        for entry in &sample.tail {
            push_sample(&mut lines, &entry.name, &entry.reasons);
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

fn push_sample(lines: &mut Vec<String>, name: &str, reasons: &[String]) {
    lines.push(format!("  * {}", name));
    let reasons = if reasons.is_empty() { "no info".to_string() } else { reasons.join(", ") };
    lines.push(format!("      -> {}", reasons));
}
