use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One row as stored on disk: 1-indexed label, title, description.
#[derive(Debug, Deserialize)]
struct RawRecord {
    label: i64,
    title: String,
    description: String,
}

/// One loaded article. `label` is zero-indexed; `text` is the title and
/// description joined by a single space. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct NewsRecord {
    pub label: i64,
    pub title: String,
    pub description: String,
    pub text: String,
}

/// Reads a headerless `label,title,description` CSV (AG News layout).
pub fn load_records(path: &Path, num_classes: i64) -> Result<Vec<NewsRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_records(file, num_classes)
        .with_context(|| format!("while reading {}", path.display()))
}

/// Parses CSV rows, shifting labels from 1-indexed storage to 0-indexed.
/// A label outside [1, num_classes], a non-numeric label, or a row with
/// the wrong column count is a fatal error.
pub fn parse_records<R: Read>(reader: R, num_classes: i64) -> Result<Vec<NewsRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("malformed row {row}"))?;
        anyhow::ensure!(
            (1..=num_classes).contains(&raw.label),
            "row {}: label {} outside [1, {}]",
            row,
            raw.label,
            num_classes
        );
        let text = format!("{} {}", raw.title, raw.description);
        records.push(NewsRecord {
            label: raw.label - 1,
            title: raw.title,
            description: raw.description,
            text,
        });
    }
    Ok(records)
}
