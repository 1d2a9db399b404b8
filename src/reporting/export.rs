//! Static JSON exporter.
//!
//! Flattens the reporting queries into a directory a static site can read:
//!
//! ```text
//! <out>/index.json
//! <out>/calendar/<slug>/<year>.json
//! <out>/day/<slug>/<YYYY-MM-DD>.json
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::Serialize;
use thiserror::Error;

use crate::reporting::slug::slugify;
use crate::store::{DayEntry, ObservationStore, StoreError};

/// Errors raised while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What an export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub destinations: usize,
    pub years: usize,
    pub calendar_files: usize,
    pub day_files: usize,
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    id: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct IndexFile<'a> {
    destinations: Vec<IndexEntry<'a>>,
    years: &'a [i32],
}

#[derive(Serialize)]
struct CalendarFile<'a> {
    destination: &'a str,
    year: i32,
    data: BTreeMap<String, u32>,
}

#[derive(Serialize)]
struct DayFile<'a> {
    destination: &'a str,
    date: String,
    data: &'a [DayEntry],
}

/// Export every destination, year and day in `store` under `out_dir`.
///
/// With `clean`, `out_dir` is removed first so stale files do not linger.
pub fn export_static(
    store: &ObservationStore,
    out_dir: &Path,
    offset: FixedOffset,
    clean: bool,
) -> Result<ExportSummary, ExportError> {
    if clean && out_dir.exists() {
        fs::remove_dir_all(out_dir).map_err(|source| ExportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
    }

    let labels = store.destinations()?;
    let years = store.years(offset)?;

    let mut used = HashSet::new();
    let slugs: Vec<String> = labels.iter().map(|l| slugify(l, &mut used)).collect();

    write_json(
        &out_dir.join("index.json"),
        &IndexFile {
            destinations: labels
                .iter()
                .zip(&slugs)
                .map(|(label, id)| IndexEntry { id, label })
                .collect(),
            years: &years,
        },
    )?;

    let mut summary = ExportSummary {
        destinations: labels.len(),
        years: years.len(),
        ..Default::default()
    };

    for (label, slug) in labels.iter().zip(&slugs) {
        for &year in &years {
            let data = store
                .calendar(label, year, offset)?
                .into_iter()
                .map(|(day, max)| (day.to_string(), max))
                .collect();
            write_json(
                &out_dir.join("calendar").join(slug).join(format!("{year}.json")),
                &CalendarFile {
                    destination: label,
                    year,
                    data,
                },
            )?;
            summary.calendar_files += 1;
        }

        for (day, entries) in store.day_details(label, offset)? {
            let date = day.to_string();
            write_json(
                &out_dir.join("day").join(slug).join(format!("{date}.json")),
                &DayFile {
                    destination: label,
                    date,
                    data: &entries,
                },
            )?;
            summary.day_files += 1;
        }
    }

    tracing::info!(
        out_dir = %out_dir.display(),
        destinations = summary.destinations,
        calendar_files = summary.calendar_files,
        day_files = summary.day_files,
        "Static export complete"
    );
    Ok(summary)
}

fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, payload)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
