//! File export and import of task collections.
//!
//! # Responsibility
//! - Render the task collection as a pretty-printed JSON file named by date.
//! - Read a user-supplied JSON file and accept it only when it is an array.
//!
//! # Invariants
//! - Import performs no element validation; merging into the store does.
//! - Import is all-or-nothing: a failure returns no partial data.

use crate::model::task::Task;
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const EXPORT_FILE_PREFIX: &str = "tasks";
const EXPORT_FILE_EXTENSION: &str = "json";

/// Failure to produce an export file.
#[derive(Debug)]
pub enum ExportError {
    Serialize(serde_json::Error),
    Write { path: PathBuf, source: io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
            Self::Write { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Rejected import. The caller may retry with another file.
#[derive(Debug)]
pub enum ImportError {
    /// File could not be read.
    Read { path: PathBuf, source: io::Error },
    /// Contents are not valid JSON.
    Json(serde_json::Error),
    /// Valid JSON whose top-level value is not an array.
    NotAnArray { found: &'static str },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read import file `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "import file is not valid JSON: {err}"),
            Self::NotAnArray { found } => write!(
                f,
                "invalid import file format: expected a JSON array of tasks, found {found}"
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::NotAnArray { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Export file name for `date`, e.g. `tasks-2026-10-17.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}-{}.{EXPORT_FILE_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// Pretty-printed JSON array of `tasks`.
pub fn export_tasks_json(tasks: &[Task]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Writes the export file into `dir` and returns its path.
///
/// An existing file with the same name is overwritten.
pub fn export_tasks_to_dir(
    tasks: &[Task],
    dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(export_file_name(date));
    let contents = export_tasks_json(tasks)?;
    std::fs::write(&path, contents).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=tasks_export module=transfer status=ok count={} path={}",
        tasks.len(),
        path.display()
    );
    Ok(path)
}

/// Parses import text, accepting any array regardless of element shape.
pub fn import_tasks_from_str(text: &str) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items),
        other => Err(ImportError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

/// Reads and parses an import file.
pub fn import_tasks_from_file(path: impl AsRef<Path>) -> Result<Vec<Value>, ImportError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let result = import_tasks_from_str(&text);
    match &result {
        Ok(items) => info!(
            "event=tasks_import_read module=transfer status=ok count={}",
            items.len()
        ),
        Err(err) => warn!("event=tasks_import_read module=transfer status=error error={err}"),
    }
    result
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
