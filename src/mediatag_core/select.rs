use crate::mediatag_core::error::{Result, TaggerError};
use crate::mediatag_core::media::{MediaFile, detect_media_type};
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::FormatItem;
use time::{Date, OffsetDateTime, UtcOffset};
use walkdir::WalkDir;

/// Date format accepted on the command line and compared against mtimes.
pub const DATE_FORMAT: &[FormatItem] = time::macros::format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s.trim(), DATE_FORMAT)
        .map_err(|e| TaggerError::InvalidDate(format!("{s}: {e}, should be YYYY-MM-DD")))
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Modification time of a file in local time, falling back to UTC when the
/// local offset cannot be determined.
pub fn modified_at(path: &Path) -> Result<OffsetDateTime> {
    let modified = OffsetDateTime::from(fs::metadata(path)?.modified()?);
    let offset = UtcOffset::local_offset_at(modified).unwrap_or(UtcOffset::UTC);
    Ok(modified.to_offset(offset))
}

/// Filename with every space replaced by an underscore.
pub fn normalized_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Rename a file in place so its name has no spaces. Returns the new path.
pub fn normalize_filename(path: &Path) -> Result<PathBuf> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(path.to_path_buf());
    };
    let normalized = normalized_name(name);
    if normalized == name {
        return Ok(path.to_path_buf());
    }

    let new_path = path.with_file_name(normalized);
    if new_path.exists() {
        return Err(TaggerError::DestinationExists(new_path));
    }
    log::debug!("Renaming {} -> {}", path.display(), new_path.display());
    fs::rename(path, &new_path)?;
    Ok(new_path)
}

/// Regular files directly under `directory`, sorted by name.
fn regular_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Select the images and videos in `directory` last modified on `date`.
///
/// Selected files are renamed in place (spaces become underscores) and
/// returned with their new paths.
pub fn select(directory: &Path, date: Date) -> Result<Vec<MediaFile>> {
    let files = regular_files(directory)?;
    if files.is_empty() {
        println!("There are not files at folder {}", directory.display());
        return Ok(Vec::new());
    }

    let mut selected = Vec::new();
    for path in files {
        let Some(media_type) = detect_media_type(&path) else {
            log::debug!("Not a media file: {}", path.display());
            continue;
        };

        let modified = modified_at(&path)?;
        if modified.date() != date {
            continue;
        }

        let path = match normalize_filename(&path) {
            Ok(p) => p,
            Err(TaggerError::DestinationExists(existing)) => {
                log::warn!(
                    "Leaving {} untouched, {} already exists",
                    path.display(),
                    existing.display()
                );
                continue;
            }
            Err(e) => return Err(e),
        };
        selected.push(MediaFile::new(path, media_type, modified));
    }

    log::info!(
        "Selected {} media files from {} dated {}",
        selected.len(),
        directory.display(),
        format_date(date)
    );
    Ok(selected)
}
