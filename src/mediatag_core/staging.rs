use crate::mediatag_core::error::{Result, TaggerError, ignore_not_found};
use crate::mediatag_core::tools::BACKUP_SUFFIX;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STAGING_PREFIX: &str = "mediatag-";

/// Temporary workspace holding working copies of the selected files.
///
/// The directory is removed by [`StagingArea::teardown`] or, on any other
/// exit path, when the area is dropped.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging area in the system temp directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
        log::debug!("Staging area at {}", dir.path().display());
        Ok(StagingArea { dir })
    }

    /// Create a staging area under `parent`.
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)?;
        log::debug!("Staging area at {}", dir.path().display());
        Ok(StagingArea { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `source` into the staging area, keeping its permissions and
    /// modification time. The original is left in place.
    pub fn stage_copy(&self, source: &Path) -> Result<PathBuf> {
        let name = source.file_name().ok_or_else(|| {
            TaggerError::Argument(format!("no file name in {}", source.display()))
        })?;
        let staged = self.dir.path().join(name);

        copy_preserving_mtime(source, &staged)?;
        log::debug!("Staged {} -> {}", source.display(), staged.display());
        Ok(staged)
    }

    /// Delete the backup copies the metadata tool leaves behind
    /// (`photo.jpg_original`). Returns how many were removed.
    pub fn sweep_backups(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(self.dir.path())? {
            let path = entry?.path();
            if !is_backup(&path) {
                continue;
            }
            println!("Removing {}", path.display());
            ignore_not_found(fs::remove_file(&path))?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Remove the staging directory and everything left in it. A directory
    /// that is already gone is not an error.
    pub fn teardown(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        ignore_not_found(self.dir.close())?;
        log::debug!("Removed staging area {}", path.display());
        Ok(())
    }
}

/// Copy a file with its permissions and modification time.
pub(crate) fn copy_preserving_mtime(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)?;
    let modified = fs::metadata(from)?.modified()?;
    // futimens only needs ownership, so read-only copies work too
    File::open(to)?.set_modified(modified)?;
    Ok(())
}

/// Backup names look like `<name>.<ext>_original`.
fn is_backup(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(BACKUP_SUFFIX))
        .is_some_and(|original| original.contains('.') && !original.starts_with('.'))
}
