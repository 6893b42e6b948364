use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GrabError {
    #[error("{0} is not a valid resource name; did you mistype it?")]
    InvalidResource(String),

    #[error("{0}")]
    InvalidChapter(String),

    #[error("{0} doesn't exist")]
    WorkspaceRootMissing(Utf8PathBuf),

    #[error("found {count} candidate directories in {root}; cd into your codespace and rerun")]
    WorkspaceAmbiguous { root: Utf8PathBuf, count: usize },

    #[error("download failed: {0}")]
    Http(String),

    #[error("download of {url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("{0} is not a valid ZIP file")]
    InvalidArchive(Utf8PathBuf),

    #[error("failed to extract archive: {0}")]
    Archive(String),

    #[error("the directory `{0}` does not exist")]
    SourceMissing(Utf8PathBuf),

    #[error("a directory or file named `{0}` already exists")]
    DestinationExists(Utf8PathBuf),

    #[error("{0}")]
    NotebookUsage(String),

    #[error("failed to parse notebook: {0}")]
    NotebookParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl GrabError {
    /// Exit code category: usage errors 2, network errors 3, everything else 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            GrabError::InvalidResource(_)
            | GrabError::InvalidChapter(_)
            | GrabError::NotebookUsage(_) => 2,
            GrabError::Http(_) | GrabError::HttpStatus { .. } => 3,
            _ => 1,
        }
    }
}
