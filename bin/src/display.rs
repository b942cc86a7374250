//! Display utilities and output formatting for the coinbars CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use coinbars_lib::OutputFormat;
use coinbars_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Output format for bar datasets.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Write the tail `bars` of dataset `key` to `output`, or to stdout when no
/// path is given.
pub(crate) fn write_dataset(
    key: &DatasetKey,
    bars: &[Bar],
    output: Option<&Path>,
    format: Format,
) -> Result<()> {
    let format = OutputFormat::from(format);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            coinbars_lib::write_dataset(format, key, bars, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let mut writer = BufWriter::new(std::io::stdout());
            coinbars_lib::write_dataset(format, key, bars, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// One human-readable line per bar.
pub(crate) fn format_bar(bar: &Bar) -> String {
    let time = bar.datetime().map_or_else(
        || bar.time.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
    );
    format!(
        "{time}  O {:<12} H {:<12} L {:<12} C {:<12} V {:.4}",
        bar.open, bar.high, bar.low, bar.close, bar.volume
    )
}

/// Spinner shown while a network-bound step runs.
pub(crate) fn spinner(message: impl Into<String>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
