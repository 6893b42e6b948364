use std::fs;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use coursegrab::chapter::{ChapterNumber, fetch_chapter};
use coursegrab::error::GrabError;
use coursegrab::fetch::ArchiveSource;
use coursegrab::grab::{ProgressEvent, ProgressSink};

struct ZipSource {
    payload: Vec<u8>,
    calls: AtomicUsize,
}

impl ZipSource {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ArchiveSource for ZipSource {
    fn download(&self, _url: &str, destination: &Utf8Path) -> Result<(), GrabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::write(destination.as_std_path(), &self.payload)
            .map_err(|err| GrabError::Filesystem(err.to_string()))
    }
}

struct NullSink;

impl ProgressSink for NullSink {
    fn event(&self, _event: ProgressEvent) {}
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn workspace_root() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("student-codespace")).unwrap();
    let root_path = Utf8PathBuf::from_path_buf(root.path().to_path_buf()).unwrap();
    let workspace = root_path.join("student-codespace");
    (root, root_path, workspace)
}

#[test]
fn fetch_chapter_places_files() {
    let (_root, root_path, workspace) = workspace_root();
    let source = ZipSource::new(zip_bytes(&[("chap07-main/script.py", b"pass\n")]));
    let number: ChapterNumber = "7".parse().unwrap();

    let outcome = fetch_chapter(number, &source, &root_path, &NullSink).unwrap();

    assert_eq!(outcome.dir_name, "chap07");
    assert_eq!(outcome.workspace, workspace);
    assert!(workspace.join("chap07/script.py").as_std_path().is_file());
    assert!(!workspace.join("chap07-main").as_std_path().exists());
    assert!(!workspace.join("main.zip").as_std_path().exists());
}

#[test]
fn existing_chapter_directory_is_a_hard_failure() {
    let (_root, root_path, workspace) = workspace_root();
    fs::create_dir(workspace.join("chap07").as_std_path()).unwrap();
    let source = ZipSource::new(zip_bytes(&[("chap07-main/script.py", b"pass\n")]));
    let number: ChapterNumber = "7".parse().unwrap();

    let err = fetch_chapter(number, &source, &root_path, &NullSink).unwrap_err();
    assert_matches!(err, GrabError::DestinationExists(path) if path.ends_with("chap07"));
}

#[test]
fn ambiguous_root_downloads_nothing() {
    let root = TempDir::new().unwrap();
    let root_path = Utf8PathBuf::from_path_buf(root.path().to_path_buf()).unwrap();

    let source = ZipSource::new(Vec::new());
    let number: ChapterNumber = "3".parse().unwrap();

    let err = fetch_chapter(number, &source, &root_path, &NullSink).unwrap_err();
    assert_matches!(err, GrabError::WorkspaceAmbiguous { count: 0, .. });
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
