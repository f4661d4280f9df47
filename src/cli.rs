//! Command-line argument parsing for the SQL playground.

use crate::config::Config;
use crate::error::{PlaygroundError, Result};
use crate::tui::headless::{self, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

/// A terminal SQL playground backed by generated mock data.
#[derive(Parser, Debug)]
#[command(name = "sql-playground")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "SQL_PLAYGROUND_CONFIG")]
    pub config: Option<PathBuf>,

    /// File holding saved queries and the theme preference
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Simulated query latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Rows per result page
    #[arg(long, value_name = "ROWS")]
    pub page_size: Option<usize>,

    /// Seed for the mock data generator, for reproducible results
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "key:f1,key:pagedown")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT)
    #[arg(long, value_name = "SIZE", default_value = "120x40")]
    pub size: String,

    /// Output format for headless mode: text, json or frames
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(latency_ms) = self.latency_ms {
            config.execution.latency_ms = latency_ms;
        }
        if let Some(page_size) = self.page_size {
            config.execution.page_size = page_size;
        }
        if let Some(state_file) = &self.state_file {
            config.storage.state_file = Some(state_file.clone());
        }
        config.validate()
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> Result<(u16, u16)> {
        let (width, height) = headless::parse_size(&self.size)?;
        if width == 0 || height == 0 {
            return Err(PlaygroundError::config(format!(
                "Screen size must be non-zero: '{}'",
                self.size
            )));
        }
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> Result<OutputFormat> {
        match self.output.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "frames" => Ok(OutputFormat::Frames),
            other => Err(PlaygroundError::config(format!(
                "Invalid output format: {other}. Expected: text, json, or frames"
            ))),
        }
    }

    /// Validates headless mode arguments.
    pub fn validate_headless(&self) -> Result<()> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err(PlaygroundError::config(
                "--headless requires --events or --script",
            ));
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}
