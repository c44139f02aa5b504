// Thu Oct 15 2026 - Alex

use crate::pipeline::{PipelineObserver, Stage};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner showing the current pipeline stage; completed stages are printed
/// above it.
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for StageSpinner {
    fn stage_started(&self, stage: Stage) {
        self.bar.set_message(format!("{}...", stage.name()));
    }

    fn stage_finished(&self, stage: Stage, detail: &str) {
        if !self.bar.is_hidden() {
            self.bar.println(format!("{} {}: {}", "[+]".green(), stage.name(), detail));
        }
    }
}
