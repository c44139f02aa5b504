// Thu Oct 15 2026 - Alex

use anyhow::Context;
use clap::Parser;
use invocable_scanner::pipeline::DiscoveryPipeline;
use invocable_scanner::ui::{Args, Console, StageSpinner};
use std::time::Instant;

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    env_logger::Builder::new()
        .filter_level(args.log_level_filter())
        .format_timestamp(None)
        .init();

    let console = Console::new(args.quiet);
    match run(&args, &console) {
        Ok(0) => {
            console.error("No exports were found; only binary metadata was written");
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            console.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Returns the number of exports found.
fn run(args: &Args, console: &Console) -> anyhow::Result<usize> {
    args.validate().map_err(|e| anyhow::anyhow!(e))?;
    let config = args.to_config().context("Invalid configuration")?;
    let pipeline = DiscoveryPipeline::new(config)?;

    let target = args
        .binary
        .as_ref()
        .or(args.exports_dump.as_ref())
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    console.info(&format!("Analyzing: {}", target));
    console.info(&format!("Output directory: {}", pipeline.config().output_dir.display()));

    let start = Instant::now();
    let spinner = StageSpinner::new(!args.no_progress && !args.quiet);
    let result = pipeline.run_observed(&args.pipeline_inputs(), &spinner);
    spinner.finish();
    let run = result?;

    console.report(&run);
    console.info(&format!("Completed in {:.2}s", start.elapsed().as_secs_f64()));

    Ok(run.export_count())
}
