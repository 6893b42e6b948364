use camino::Utf8PathBuf;
use serde_json::json;
use tempfile::TempDir;

use coursegrab::notebook::{StripEvent, output_path, read_notebook, strip_notes, write_notebook};

#[test]
fn strip_round_trips_through_files() {
    let dir = TempDir::new().unwrap();
    let in_path =
        Utf8PathBuf::from_path_buf(dir.path().join("lecture.ipynb")).unwrap();

    let notebook = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {"kernelspec": {"name": "python3"}},
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# A"]},
            {
                "cell_type": "markdown",
                "metadata": {"slideshow": {"slide_type": "notes"}},
                "source": ["instructor only"],
            },
            {
                "cell_type": "code",
                "metadata": {"slideshow": {"slide_type": "subslide"}},
                "source": ["print('C')"],
                "outputs": [],
                "execution_count": null,
            },
        ],
    });
    std::fs::write(in_path.as_std_path(), notebook.to_string()).unwrap();

    let out_path = Utf8PathBuf::from(output_path(in_path.as_str()).unwrap());
    assert!(out_path.as_str().ends_with("lecture-nonotes.ipynb"));

    let mut parsed = read_notebook(&in_path).unwrap();
    assert_eq!(parsed.cells.len(), 3);

    let report = strip_notes(&mut parsed);
    assert_eq!(report.total, 3);
    assert_eq!(report.removed, 1);
    assert_eq!(
        report.events,
        vec![StripEvent::Deleted(1), StripEvent::MissingMetadata(0)]
    );

    write_notebook(&out_path, &parsed).unwrap();

    let written = read_notebook(&out_path).unwrap();
    assert_eq!(written.cells.len(), 2);
    assert_eq!(written.cells[0]["source"][0], "# A");
    assert_eq!(written.cells[1]["source"][0], "print('C')");
    // top-level metadata and version survive
    assert_eq!(written.nbformat, 4);
    assert_eq!(written.nbformat_minor, 5);
    assert_eq!(written.extra["metadata"]["kernelspec"]["name"], "python3");
}

#[test]
fn unsupported_nbformat_is_rejected() {
    let dir = TempDir::new().unwrap();
    let in_path = Utf8PathBuf::from_path_buf(dir.path().join("old.ipynb")).unwrap();
    std::fs::write(
        in_path.as_std_path(),
        json!({"nbformat": 3, "nbformat_minor": 0, "cells": []}).to_string(),
    )
    .unwrap();

    let err = read_notebook(&in_path).unwrap_err();
    assert!(err.to_string().contains("nbformat"));
}
