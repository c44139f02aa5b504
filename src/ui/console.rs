// Thu Oct 15 2026 - Alex

use crate::pipeline::AnalysisRun;
use crate::scoring::ConfidenceTier;
use colored::{ColoredString, Colorize};

/// Colored status lines for the command-line front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{} {}", "[*]".blue(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{} {}", "[+]".green(), msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{} {}", "[!]".yellow(), msg);
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "[!]".red(), msg);
    }

    pub fn report(&self, run: &AnalysisRun) {
        if self.quiet {
            return;
        }

        println!();
        self.success(&format!(
            "{} exports from {} ({})",
            run.export_count(),
            run.binary.name,
            run.extraction.source.name()
        ));
        if run.extraction.duplicates > 0 || run.extraction.skipped_lines > 0 {
            self.info(&format!(
                "{} duplicate rows dropped, {} lines skipped",
                run.extraction.duplicates, run.extraction.skipped_lines
            ));
        }
        if let Some(headers) = &run.headers {
            self.info(&format!(
                "{} header matches across {} files",
                headers.matches.len(),
                headers.stats.files_scanned
            ));
        }
        if !run.external.is_empty() {
            self.info(&format!("{} invocables from external analyzers", run.external.len()));
        }

        println!("\n{}", "Confidence".bold());
        for tier in ConfidenceTier::DESCENDING {
            println!(
                "  {:<11} {:>5}  ({:5.1}%)",
                tier_label(tier),
                run.summary.count(tier),
                run.summary.percentage(tier)
            );
        }

        if !run.summary.hints.is_empty() {
            println!("\n{}", "Improve confidence".bold());
            for hint in &run.summary.hints {
                println!("  - {}", hint);
            }
        }

        println!();
        let tiers: Vec<String> = run
            .emission
            .tiers
            .iter()
            .map(|t| format!("tier{}", t.number()))
            .collect();
        self.success(&format!(
            "Wrote {} files ({}) to {}",
            run.emission.files.len(),
            tiers.join(", "),
            output_dir(run)
        ));
    }
}

fn tier_label(tier: ConfidenceTier) -> ColoredString {
    let label = tier.as_str();
    match tier {
        ConfidenceTier::Guaranteed => label.green().bold(),
        ConfidenceTier::High => label.green(),
        ConfidenceTier::Medium => label.yellow(),
        ConfidenceTier::Low => label.red(),
    }
}

fn output_dir(run: &AnalysisRun) -> String {
    run.emission
        .files
        .first()
        .and_then(|f| f.parent())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}
