use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::GrabError;
use crate::fetch::ArchiveSource;
use crate::resource::Resource;
use crate::archive;
use crate::workspace::{CODESPACES_ROOT, Workspace, clean_copy_target, rename_dir};

/// Hidden staging directory for pset downloads. The pset zip's top-level
/// directory carries no `-main` suffix, so extracting in place could not
/// be told apart from an existing copy.
pub const TMP_DIR: &str = ".tmp_cs32";

/// Config file replaced at the workspace root during `cs32-setup`.
pub const DEVCONTAINER_FILE: &str = ".devcontainer.json";

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone)]
pub struct GrabOutcome {
    pub workspace: Utf8PathBuf,
    /// Bare name of the fetched directory (without any `_clean` suffix).
    pub repo: String,
    /// Where the fetched files actually landed; `None` once a setup run
    /// has consumed and removed the fetched tree.
    pub final_dir: Option<Utf8PathBuf>,
    pub clean_copy: bool,
    pub setup: bool,
}

pub struct Grabber<S: ArchiveSource> {
    source: S,
    root: Utf8PathBuf,
}

impl<S: ArchiveSource> Grabber<S> {
    pub fn new(source: S) -> Self {
        Self::with_root(source, Utf8PathBuf::from(CODESPACES_ROOT))
    }

    pub fn with_root(source: S, root: Utf8PathBuf) -> Self {
        Self { source, root }
    }

    /// Fetch `resource` into the user's workspace: resolve the workspace,
    /// download and extract the archive, drop the archive file, rename the
    /// extracted tree per the clean-copy policy, then run the setup
    /// post-processing when asked for. Fails fast at every step; nothing
    /// is rolled back on the way out.
    pub fn run(
        &self,
        resource: &Resource,
        sink: &dyn ProgressSink,
    ) -> Result<GrabOutcome, GrabError> {
        let cwd = std::env::current_dir()
            .map_err(|err| GrabError::Filesystem(err.to_string()))
            .and_then(|path| {
                Utf8PathBuf::from_path_buf(path)
                    .map_err(|path| GrabError::Filesystem(format!("non-UTF8 cwd {path:?}")))
            })?;
        let workspace = Workspace::resolve(&self.root, &cwd)?;
        emit(sink, format!("Working in directory: {}", workspace.path()));

        let url = resource.archive_url();
        let zip_name = resource.archive_name();

        let download_dir = if resource.is_pset() {
            let tmp = workspace.path().join(TMP_DIR);
            fs::create_dir_all(tmp.as_std_path())
                .map_err(|err| GrabError::Filesystem(format!("creating {tmp}: {err}")))?;
            emit(sink, format!("directory '{TMP_DIR}' created successfully"));
            tmp
        } else {
            workspace.path().to_owned()
        };

        let zip_path = download_dir.join(&zip_name);
        self.source.download(&url, &zip_path)?;
        emit(sink, format!("Zip file downloaded from: {url}"));

        archive::extract_zip(&zip_path, &download_dir)?;
        emit(sink, format!("Unzipped {zip_name}"));

        fs::remove_file(zip_path.as_std_path())
            .map_err(|err| GrabError::Filesystem(format!("removing {zip_path}: {err}")))?;
        emit(sink, format!("Removed {zip_name}"));

        let repo = resource.repo_name();
        let extracted = if resource.is_pset() {
            download_dir.join(repo)
        } else {
            workspace.path().join(format!("{repo}-main"))
        };
        let (target, clean_copy) = clean_copy_target(workspace.path(), repo);
        rename_dir(&extracted, &target)?;
        let extracted_label = if resource.is_pset() {
            format!("{TMP_DIR}/{repo}")
        } else {
            format!("{repo}-main")
        };
        emit(
            sink,
            format!(
                "Renamed {extracted_label} to {}",
                target.file_name().unwrap_or(repo)
            ),
        );

        let mut final_dir = Some(target.clone());
        if resource.is_setup() {
            self.apply_setup(workspace.path(), &target, sink)?;
            final_dir = None;
        }

        Ok(GrabOutcome {
            workspace: workspace.path().to_owned(),
            repo: repo.to_string(),
            final_dir,
            clean_copy,
            setup: resource.is_setup(),
        })
    }

    /// Setup post-processing: replace the workspace's devcontainer config
    /// with the fetched one, then drop the fetched template tree.
    fn apply_setup(
        &self,
        workspace: &Utf8Path,
        fetched: &Utf8Path,
        sink: &dyn ProgressSink,
    ) -> Result<(), GrabError> {
        let src = fetched.join(DEVCONTAINER_FILE);
        let dst = workspace.join(DEVCONTAINER_FILE);
        if !src.as_std_path().exists() {
            return Err(GrabError::SourceMissing(src));
        }
        // rename overwrites an existing destination file
        fs::rename(src.as_std_path(), dst.as_std_path())
            .map_err(|err| GrabError::Filesystem(format!("moving {src} to {dst}: {err}")))?;
        emit(sink, format!("Moved {src} to {dst}"));

        match fs::remove_dir_all(fetched.as_std_path()) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(GrabError::SourceMissing(fetched.to_owned()));
            }
            Err(err) => {
                return Err(GrabError::Filesystem(format!(
                    "removing {fetched}: {err}"
                )));
            }
        }
        emit(sink, format!("Removed {}", fetched.file_name().unwrap_or("template")));
        Ok(())
    }
}

fn emit(sink: &dyn ProgressSink, message: String) {
    sink.event(ProgressEvent { message });
}
