use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use std::fs::File;
use std::time::{Duration, SystemTime};

/// 2023-06-01 12:00:00 UTC
pub const JUNE_FIRST_NOON: u64 = 1_685_620_800;

/// Create `name` in `dir` with a modification time `days` after 2023-06-01 noon.
pub fn dated_file(dir: &ChildPath, name: &str, days: i64) -> ChildPath {
    let file = dir.child(name);
    file.write_str(name).unwrap();
    let secs = JUNE_FIRST_NOON as i64 + days * 86_400;
    File::options()
        .write(true)
        .open(file.path())
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs as u64))
        .unwrap();
    file
}

/// The binary wired to stand-in tools, staging inside `temp_dir`.
pub fn mediatag(temp_dir: &TempDir, exiftool: &str, opener: &str) -> Command {
    let staging = temp_dir.child("staging");
    staging.create_dir_all().unwrap();

    let mut cmd = Command::cargo_bin("mediatag").unwrap();
    cmd.arg("--exiftool")
        .arg(exiftool)
        .arg("--opener")
        .arg(opener)
        .arg("--staging-dir")
        .arg(staging.path());
    cmd
}

pub fn staging_is_empty(temp_dir: &TempDir) -> bool {
    std::fs::read_dir(temp_dir.child("staging").path())
        .unwrap()
        .next()
        .is_none()
}
