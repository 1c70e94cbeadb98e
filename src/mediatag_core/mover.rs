use crate::mediatag_core::error::{Result, TaggerError, ignore_not_found};
use crate::mediatag_core::index::TagIndex;
use crate::mediatag_core::prompt::Operator;
use crate::mediatag_core::staging::{StagingArea, copy_preserving_mtime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files moved for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMove {
    pub tag: String,
    pub destination: PathBuf,
    pub moved: usize,
}

#[derive(Debug, Default)]
pub struct MoveReport {
    pub moves: Vec<TagMove>,
}

impl MoveReport {
    pub fn total_moved(&self) -> usize {
        self.moves.iter().map(|m| m.moved).sum()
    }
}

impl std::fmt::Display for MoveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files moved into {} tag folders",
            self.total_moved(),
            self.moves.len()
        )
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (input, home) {
        ("~", Some(home)) => home,
        (s, Some(home)) if s.starts_with("~/") => home.join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

/// Moves tagged files out of the staging area into `<destination>/<tag>/`
/// and deletes their originals from the source directory.
#[derive(Debug)]
pub struct MoveExecutor<'a> {
    source_dir: &'a Path,
}

impl<'a> MoveExecutor<'a> {
    pub fn new(source_dir: &'a Path) -> Self {
        MoveExecutor { source_dir }
    }

    /// Process every tag in index order, then tear down the staging area.
    ///
    /// The first failed move aborts the run. Tags already processed stay
    /// moved, and the staging area is still removed when it is dropped.
    pub fn execute<O>(
        &self,
        index: &TagIndex,
        staging: StagingArea,
        operator: &mut O,
    ) -> Result<MoveReport>
    where
        O: Operator + ?Sized,
    {
        let mut report = MoveReport::default();
        operator.say("\n======================")?;

        for (tag, files) in index.iter() {
            operator.say(&format!("\nTAG: {tag} at file(s):"))?;
            for file in files {
                operator.say(&file.display().to_string())?;
            }
            operator.say(&format!("Total files: {}", files.len()))?;

            let destination = ask_destination(operator)?.join(tag);
            if !destination.exists() {
                operator.say(&format!(
                    "Destination folder {} doesn't exist, creating folder...\n",
                    destination.display()
                ))?;
            }
            fs::create_dir_all(&destination)?;

            let mut moved = 0;
            for file in files {
                operator.say(&format!("Moving {} -> {}", file.display(), destination.display()))?;
                let name = move_into(file, &destination)?;
                ignore_not_found(fs::remove_file(self.source_dir.join(name)))?;
                moved += 1;
            }
            operator.say(&format!("{moved} files moved"))?;
            log::info!("Moved {} files tagged {} to {}", moved, tag, destination.display());

            report.moves.push(TagMove {
                tag: tag.to_string(),
                destination,
                moved,
            });
        }

        staging.teardown()?;
        Ok(report)
    }
}

fn ask_destination<O: Operator + ?Sized>(operator: &mut O) -> Result<PathBuf> {
    loop {
        let answer = operator.ask("Enter the absolute path to the folder to move the files")?;
        let path = expand_home(&answer);
        if path.is_absolute() {
            return Ok(path);
        }
        operator.say(&format!("{} is not an absolute path", path.display()))?;
    }
}

/// Move `file` into `folder`, refusing to overwrite. Returns the file name.
fn move_into<'f>(file: &'f Path, folder: &Path) -> Result<&'f std::ffi::OsStr> {
    let name = file.file_name().ok_or_else(|| {
        TaggerError::Argument(format!("no file name in {}", file.display()))
    })?;
    let target = folder.join(name);
    if target.exists() {
        return Err(TaggerError::DestinationExists(target));
    }

    match fs::rename(file, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_preserving_mtime(file, &target)?;
            fs::remove_file(file)?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mediatag_core::workflow::tests::scripted;
    use tempfile::TempDir;

    struct Fixture {
        source: TempDir,
        dest: TempDir,
        staging: StagingArea,
        index: TagIndex,
    }

    /// Source files `names`, staged and recorded under `tag`.
    fn fixture(tag: &str, names: &[&str]) -> Fixture {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let staging = StagingArea::create().unwrap();
        let mut index = TagIndex::new();
        for name in names {
            let original = source.path().join(name);
            fs::write(&original, name.as_bytes()).unwrap();
            let staged = staging.stage_copy(&original).unwrap();
            index.record(tag, staged).unwrap();
        }
        Fixture {
            source,
            dest,
            staging,
            index,
        }
    }

    #[test]
    fn test_moves_files_and_removes_originals() {
        let fx = fixture("fish", &["one.jpg", "two.jpg"]);
        let staging_root = fx.staging.path().to_path_buf();
        let mut operator = scripted(&format!("{}\n", fx.dest.path().display()));

        let report = MoveExecutor::new(fx.source.path())
            .execute(&fx.index, fx.staging, &mut operator)
            .unwrap();

        let folder = fx.dest.path().join("fish");
        assert_eq!(
            report.moves,
            vec![TagMove {
                tag: "fish".into(),
                destination: folder.clone(),
                moved: 2
            }]
        );
        assert_eq!(fs::read(folder.join("one.jpg")).unwrap(), b"one.jpg");
        assert!(folder.join("two.jpg").exists());
        assert!(!fx.source.path().join("one.jpg").exists());
        assert!(!fx.source.path().join("two.jpg").exists());
        assert!(!staging_root.exists());

        let out = String::from_utf8(operator.into_output()).unwrap();
        assert!(out.contains("TAG: fish at file(s):"));
        assert!(out.contains("Total files: 2"));
        assert!(out.contains("2 files moved"));
    }

    #[test]
    fn test_existing_destination_folder_is_reused() {
        let fx = fixture("fish", &["one.jpg"]);
        fs::create_dir_all(fx.dest.path().join("fish")).unwrap();
        fs::write(fx.dest.path().join("fish").join("older.jpg"), b"older").unwrap();
        let mut operator = scripted(&format!("{}\n", fx.dest.path().display()));

        MoveExecutor::new(fx.source.path())
            .execute(&fx.index, fx.staging, &mut operator)
            .unwrap();

        assert!(fx.dest.path().join("fish").join("older.jpg").exists());
        assert!(fx.dest.path().join("fish").join("one.jpg").exists());
        let out = String::from_utf8(operator.into_output()).unwrap();
        assert!(!out.contains("creating folder"));
    }

    #[test]
    fn test_missing_original_is_not_an_error() {
        let fx = fixture("fish", &["one.jpg"]);
        fs::remove_file(fx.source.path().join("one.jpg")).unwrap();
        let mut operator = scripted(&format!("{}\n", fx.dest.path().display()));

        let report = MoveExecutor::new(fx.source.path())
            .execute(&fx.index, fx.staging, &mut operator)
            .unwrap();
        assert_eq!(report.total_moved(), 1);
    }

    #[test]
    fn test_relative_destination_is_asked_again() {
        let fx = fixture("fish", &["one.jpg"]);
        let mut operator = scripted(&format!("relative/dir\n{}\n", fx.dest.path().display()));

        MoveExecutor::new(fx.source.path())
            .execute(&fx.index, fx.staging, &mut operator)
            .unwrap();

        assert!(fx.dest.path().join("fish").join("one.jpg").exists());
        let out = String::from_utf8(operator.into_output()).unwrap();
        assert!(out.contains("relative/dir is not an absolute path"));
    }

    #[test]
    fn test_collision_aborts_and_keeps_original() {
        let fx = fixture("fish", &["one.jpg"]);
        let staging_root = fx.staging.path().to_path_buf();
        fs::create_dir_all(fx.dest.path().join("fish")).unwrap();
        fs::write(fx.dest.path().join("fish").join("one.jpg"), b"someone else").unwrap();
        let mut operator = scripted(&format!("{}\n", fx.dest.path().display()));

        let err = MoveExecutor::new(fx.source.path())
            .execute(&fx.index, fx.staging, &mut operator)
            .unwrap_err();

        assert!(matches!(err, TaggerError::DestinationExists(_)));
        assert!(fx.source.path().join("one.jpg").exists());
        assert_eq!(
            fs::read(fx.dest.path().join("fish").join("one.jpg")).unwrap(),
            b"someone else"
        );
        assert!(!staging_root.exists());
    }

    #[test]
    fn test_empty_index_still_tears_down() {
        let staging = StagingArea::create().unwrap();
        let root = staging.path().to_path_buf();
        let source = TempDir::new().unwrap();
        let mut operator = scripted("");

        let report = MoveExecutor::new(source.path())
            .execute(&TagIndex::new(), staging, &mut operator)
            .unwrap();
        assert_eq!(report.total_moved(), 0);
        assert!(!root.exists());
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/Pictures"), home.join("Pictures"));
        assert_eq!(expand_home("/srv/photos"), PathBuf::from("/srv/photos"));
        assert_eq!(expand_home("~other/x"), PathBuf::from("~other/x"));
    }
}
