// Thu Oct 15 2026 - Alex

use crate::config::{Config, ConfigError};
use crate::pipeline::PipelineInputs;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "invocable-scanner")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Confidence-scored catalog of a binary's exported functions", long_about = None)]
pub struct Args {
    /// Binary to analyze (PE exports are read directly, the export tool is the fallback)
    #[arg(short, long)]
    pub binary: Option<PathBuf>,

    /// Pre-captured export table dump, used instead of running the export tool
    #[arg(short, long)]
    pub exports_dump: Option<PathBuf>,

    /// Header tree to correlate exports against
    #[arg(short = 'H', long)]
    pub headers: Option<PathBuf>,

    /// Documentation tree to search for references
    #[arg(short, long)]
    pub docs: Option<PathBuf>,

    /// Invocables produced by an external analyzer (JSON); repeatable
    #[arg(long = "external")]
    pub external: Vec<PathBuf>,

    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Suffix appended to every output file stem
    #[arg(long)]
    pub tag: Option<String>,

    /// JSON configuration file; command-line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub export_tool: Option<String>,

    #[arg(long)]
    pub demangle_tool: Option<String>,

    #[arg(long)]
    pub no_demangle: bool,

    /// Timeout in seconds for the export tool
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long)]
    pub max_doc_hits: Option<usize>,

    #[arg(long)]
    pub no_raw_dump: bool,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[arg(long)]
    pub no_progress: bool,

    #[arg(short, long)]
    pub quiet: bool,

    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.binary.is_none() && self.exports_dump.is_none() {
            return Err("Either --binary or --exports-dump must be specified".to_string());
        }
        if let Some(dump) = &self.exports_dump {
            if !dump.is_file() {
                return Err(format!("Export dump does not exist: {:?}", dump));
            }
        }
        if let Some(binary) = &self.binary {
            if !binary.is_file() {
                return Err(format!("Binary does not exist: {:?}", binary));
            }
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }

    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(tag) = &self.tag {
            config = config.with_tag(tag);
        }
        if let Some(tool) = &self.export_tool {
            config = config.with_export_tool(tool);
        }
        if let Some(tool) = &self.demangle_tool {
            config = config.with_demangle_tool(tool);
        }
        if self.no_demangle {
            config = config.with_demangle(false);
        }
        if let Some(secs) = self.timeout {
            config = config.with_tool_timeout(secs);
        }
        if let Some(hits) = self.max_doc_hits {
            config = config.with_max_doc_hits(hits);
        }
        if self.no_raw_dump {
            config = config.with_save_raw_dump(false);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn pipeline_inputs(&self) -> PipelineInputs {
        PipelineInputs {
            binary: self.binary.clone(),
            exports_dump: self.exports_dump.clone(),
            headers: self.headers.clone(),
            docs: self.docs.clone(),
            external: self.external.clone(),
        }
    }
}
