use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::GrabError;

/// Fixed root under which exactly one user codespace directory lives.
pub const CODESPACES_ROOT: &str = "/workspaces";

/// The user's active codespace directory under [`CODESPACES_ROOT`].
#[derive(Debug, Clone)]
pub struct Workspace {
    path: Utf8PathBuf,
}

impl Workspace {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Resolve the workspace the way `grab32` does: if `cwd` is a direct
    /// child of `root`, it is the workspace. Otherwise fall back to
    /// [`Workspace::discover`].
    pub fn resolve(root: &Utf8Path, cwd: &Utf8Path) -> Result<Self, GrabError> {
        if cwd.parent() == Some(root) {
            return Ok(Self {
                path: cwd.to_owned(),
            });
        }
        Self::discover(root)
    }

    /// Resolve the workspace by discovery alone: `root` must exist and
    /// contain exactly one non-hidden subdirectory. Zero or multiple
    /// candidates is a user-facing failure asking for manual navigation;
    /// picking one silently would risk dropping files in the wrong place.
    pub fn discover(root: &Utf8Path) -> Result<Self, GrabError> {
        if !root.as_std_path().is_dir() {
            return Err(GrabError::WorkspaceRootMissing(root.to_owned()));
        }

        let mut candidates = Vec::new();
        let entries = fs::read_dir(root.as_std_path())
            .map_err(|err| GrabError::Filesystem(format!("read {root}: {err}")))?;
        for entry in entries {
            let entry = entry.map_err(|err| GrabError::Filesystem(err.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.path().is_dir() && !name.starts_with('.') {
                candidates.push(name);
            }
        }

        if candidates.len() != 1 {
            return Err(GrabError::WorkspaceAmbiguous {
                root: root.to_owned(),
                count: candidates.len(),
            });
        }

        Ok(Self {
            path: root.join(&candidates[0]),
        })
    }
}

/// Rename a directory with distinct errors for a missing source and an
/// occupied destination. `fs::rename` semantics for those two cases vary
/// by platform, so both are checked up front.
pub fn rename_dir(from: &Utf8Path, to: &Utf8Path) -> Result<(), GrabError> {
    if !from.as_std_path().exists() {
        return Err(GrabError::SourceMissing(from.to_owned()));
    }
    if to.as_std_path().exists() {
        return Err(GrabError::DestinationExists(to.to_owned()));
    }
    fs::rename(from.as_std_path(), to.as_std_path())
        .map_err(|err| GrabError::Filesystem(format!("rename {from} to {to}: {err}")))
}

/// Clean-copy policy: if `parent/name` is already taken, the freshly
/// fetched copy lands next to it as `parent/name_clean` instead of
/// overwriting. Returns the rename target and whether it is a clean copy.
pub fn clean_copy_target(parent: &Utf8Path, name: &str) -> (Utf8PathBuf, bool) {
    let bare = parent.join(name);
    if bare.as_std_path().exists() {
        (parent.join(format!("{name}_clean")), true)
    } else {
        (bare, false)
    }
}
