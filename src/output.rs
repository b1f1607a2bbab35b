//! Output formatting and persistence for result bundles.
//!
//! Supports pretty-printing, JSON serialization, and CSV append of the
//! yearly totals.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analyzers::types::YearlyAggregate;
use crate::pipeline::ResultBundle;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Logs a bundle using Rust's debug pretty-print format.
pub fn print_pretty(bundle: &ResultBundle) {
    debug!("{:#?}", bundle);
}

/// Serializes a bundle as JSON into `writer`, followed by a newline.
pub fn write_json<W: Write>(mut writer: W, bundle: &ResultBundle, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, bundle)?;
    } else {
        serde_json::to_writer(&mut writer, bundle)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes a bundle as JSON to `path`, replacing any existing file.
pub fn write_json_file(path: &Path, bundle: &ResultBundle, pretty: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    write_json(BufWriter::new(file), bundle, pretty)?;
    info!(path = %path.display(), "Result bundle written");
    Ok(())
}

/// Appends yearly totals as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_yearly(path: &Path, yearly: &[YearlyAggregate]) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = yearly.len(), "Appending yearly totals");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // only on a fresh file
        .from_writer(file);

    for row in yearly {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
