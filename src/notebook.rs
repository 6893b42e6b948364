use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GrabError;

pub const NOTEBOOK_EXT: &str = ".ipynb";
pub const NBFORMAT_VERSION: u64 = 4;

/// A Jupyter notebook with its cells kept as raw JSON values so that
/// fields this tool does not know about round-trip untouched.
#[derive(Debug, Serialize, Deserialize)]
pub struct Notebook {
    pub nbformat: u64,
    pub nbformat_minor: u64,
    pub cells: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What happened to each visited cell, in visit order (last cell first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripEvent {
    Deleted(usize),
    MissingMetadata(usize),
}

#[derive(Debug, Default)]
pub struct StripReport {
    pub total: usize,
    pub removed: usize,
    pub events: Vec<StripEvent>,
}

/// Output file name: `lecture.ipynb` becomes `lecture-nonotes.ipynb`.
/// Anything not ending in the notebook extension is a usage error.
pub fn output_path(input: &str) -> Result<String, GrabError> {
    let base = input.strip_suffix(NOTEBOOK_EXT).ok_or_else(|| {
        GrabError::NotebookUsage(format!("{input} does not end in {NOTEBOOK_EXT}"))
    })?;
    Ok(format!("{base}-nonotes{NOTEBOOK_EXT}"))
}

pub fn read_notebook(path: &Utf8Path) -> Result<Notebook, GrabError> {
    let content = fs::read_to_string(path.as_std_path())
        .map_err(|err| GrabError::Filesystem(format!("read {path}: {err}")))?;
    let notebook: Notebook =
        serde_json::from_str(&content).map_err(|err| GrabError::NotebookParse(err.to_string()))?;
    if notebook.nbformat != NBFORMAT_VERSION {
        return Err(GrabError::NotebookParse(format!(
            "unsupported nbformat {} (expected {NBFORMAT_VERSION})",
            notebook.nbformat
        )));
    }
    Ok(notebook)
}

pub fn write_notebook(path: &Utf8Path, notebook: &Notebook) -> Result<(), GrabError> {
    let content = serde_json::to_string_pretty(notebook)
        .map_err(|err| GrabError::NotebookParse(err.to_string()))?;
    fs::write(path.as_std_path(), content + "\n")
        .map_err(|err| GrabError::Filesystem(format!("write {path}: {err}")))
}

/// Remove every cell tagged `metadata.slideshow.slide_type == "notes"`.
///
/// Cells are visited in reverse index order so deletions do not shift the
/// indices of cells yet to be visited. Cells with absent or empty metadata
/// are reported and kept.
pub fn strip_notes(notebook: &mut Notebook) -> StripReport {
    let mut report = StripReport {
        total: notebook.cells.len(),
        ..StripReport::default()
    };

    for i in (0..notebook.cells.len()).rev() {
        match classify(&notebook.cells[i]) {
            CellKind::Notes => {
                notebook.cells.remove(i);
                report.removed += 1;
                report.events.push(StripEvent::Deleted(i));
            }
            CellKind::MissingMetadata => report.events.push(StripEvent::MissingMetadata(i)),
            CellKind::Keep => {}
        }
    }

    report
}

enum CellKind {
    Notes,
    MissingMetadata,
    Keep,
}

fn classify(cell: &Value) -> CellKind {
    let metadata = match cell.get("metadata").and_then(Value::as_object) {
        Some(metadata) if !metadata.is_empty() => metadata,
        _ => return CellKind::MissingMetadata,
    };
    let slide_type = metadata
        .get("slideshow")
        .and_then(|slideshow| slideshow.get("slide_type"))
        .and_then(Value::as_str);
    if slide_type == Some("notes") {
        CellKind::Notes
    } else {
        CellKind::Keep
    }
}
