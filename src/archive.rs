use std::fs;
use std::io;

use camino::Utf8Path;
use zip::ZipArchive;

use crate::error::GrabError;

/// Extract `zip_path` into `target_dir`. A file that is not a zip at all
/// yields [`GrabError::InvalidArchive`]; failures on individual entries
/// yield [`GrabError::Archive`].
pub fn extract_zip(zip_path: &Utf8Path, target_dir: &Utf8Path) -> Result<(), GrabError> {
    let file = fs::File::open(zip_path.as_std_path())
        .map_err(|err| GrabError::Filesystem(format!("open zip {zip_path}: {err}")))?;
    let mut archive =
        ZipArchive::new(file).map_err(|_| GrabError::InvalidArchive(zip_path.to_owned()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| GrabError::Archive(err.to_string()))?;
        let entry_path = match entry.enclosed_name() {
            Some(path) => target_dir.as_std_path().join(path),
            None => {
                return Err(GrabError::Archive(
                    "zip entry path traversal detected".to_string(),
                ));
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&entry_path)
                .map_err(|err| GrabError::Filesystem(err.to_string()))?;
            continue;
        }

        if let Some(parent) = entry_path.parent() {
            fs::create_dir_all(parent).map_err(|err| GrabError::Filesystem(err.to_string()))?;
        }
        let mut outfile =
            fs::File::create(&entry_path).map_err(|err| GrabError::Filesystem(err.to_string()))?;
        io::copy(&mut entry, &mut outfile).map_err(|err| GrabError::Archive(err.to_string()))?;
    }
    Ok(())
}
