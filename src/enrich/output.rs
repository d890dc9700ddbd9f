//! Result writers.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use seisloc::EnrichmentResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated with a header row
    Csv,
    /// One JSON object per line
    Jsonl,
}

/// Write results to `path`, or to stdout when no path is given.
pub fn write_results(results: &[EnrichmentResult], format: OutputFormat, path: Option<&Path>) -> Result<()> {
    let writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        OutputFormat::Csv => write_csv(results, writer),
        OutputFormat::Jsonl => write_jsonl(results, writer),
    }
}

pub fn write_csv<W: Write>(results: &[EnrichmentResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer
            .serialize(result)
            .with_context(|| format!("Failed to write record {}", result.id))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_jsonl<W: Write>(results: &[EnrichmentResult], mut writer: W) -> Result<()> {
    for result in results {
        serde_json::to_writer(&mut writer, result)
            .with_context(|| format!("Failed to write record {}", result.id))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
