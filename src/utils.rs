//! Utility functions for CSV row handling, string manipulation, and file system operations.
//!
//! Comments are persisted as one-column CSV files without a header. The
//! helpers here read such files into rows, flatten rows into plain strings,
//! and write them back.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Read every row of a CSV file.
///
/// Rows may have differing lengths; no header is assumed.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_rows(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(rows = rows.len(), "Read CSV rows");
    Ok(rows)
}

/// Write rows to a CSV file, replacing any existing file.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn write_rows(rows: &[Vec<String>], path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    debug!(rows = rows.len(), "Wrote CSV rows");
    Ok(())
}

/// Concatenate all cells of all rows into one list.
pub fn flatten(rows: Vec<Vec<String>>) -> Vec<String> {
    rows.into_iter().flatten().collect()
}

/// Turn a list of strings into single-cell rows.
pub fn single_to_multi(items: Vec<String>) -> Vec<Vec<String>> {
    items.into_iter().map(|item| vec![item]).collect()
}

/// Load a comment CSV as a flat list of comments.
pub fn load_comments(path: impl AsRef<Path>) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(flatten(read_rows(path, b',')?))
}

/// List the files of a directory, sorted by name.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A single input file or a directory of input files.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    File(PathBuf),
    Directory(PathBuf),
}

impl InputSource {
    /// A file wins when both are given; neither is an error.
    pub fn from_args(file: Option<PathBuf>, dir: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        match (file, dir) {
            (Some(file), dir) => {
                if dir.is_some() {
                    warn!("Both file and directory passed; defaulting to file only");
                }
                Ok(InputSource::File(file))
            }
            (None, Some(dir)) => Ok(InputSource::Directory(dir)),
            (None, None) => Err("either an input file or an input directory must be provided".into()),
        }
    }

    /// The files to process, sorted by name for a directory.
    pub fn files(&self) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        match self {
            InputSource::File(file) => Ok(vec![file.clone()]),
            InputSource::Directory(dir) => list_files(dir),
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Lowercase a title and replace spaces with hyphens, for use in filenames.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(filename_slug("Bohemian Rhapsody"), "bohemian-rhapsody");
/// ```
pub fn filename_slug(s: &str) -> String {
    s.to_lowercase().replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn ensure_writable_dir(path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    fs::create_dir_all(path)?;
    let scratch_path = path.join("..__write_check__");
    fs::File::create(&scratch_path)?;
    let _ = fs::remove_file(&scratch_path);
    info!("Output directory is writable");
    Ok(())
}
