use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};

/// A media file admitted from the source directory.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Path in the source directory, after filename normalization.
    pub path: PathBuf,
    pub media_type: MediaType,
    pub modified: OffsetDateTime,
    /// Working copy in the staging area, once staged.
    pub staged: Option<PathBuf>,
    /// Tag assigned by the workflow, once tagged.
    pub tag: Option<String>,
}

impl MediaFile {
    pub fn new(path: PathBuf, media_type: MediaType, modified: OffsetDateTime) -> Self {
        MediaFile {
            path,
            media_type,
            modified,
            staged: None,
            tag: None,
        }
    }

    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Local calendar date of the last modification.
    pub fn modified_date(&self) -> Date {
        self.modified.date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a MIME type string. Anything not `image/*` or `video/*` is `None`.
    pub fn from_mime(mime: &str) -> Option<MediaType> {
        if mime.starts_with("image/") {
            Some(MediaType::Image)
        } else if mime.starts_with("video/") {
            Some(MediaType::Video)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        })
    }
}

/// Camera formats the MIME database has no entry for (lowercase).
const RAW_EXTENSIONS: &[&str] = &[
    "heic", "heif", "avif", "raw", "cr2", "cr3", "nef", "orf", "arw", "dng", "sr2", "raf", "rw2",
    "pef",
];

/// Detect media type from a file path.
///
/// The MIME type guessed from the extension decides first. Camera formats
/// without a registered MIME type come next, then the file content is sniffed.
pub fn detect_media_type(path: &Path) -> Option<MediaType> {
    if let Some(media_type) = mime_guess::from_path(path)
        .iter_raw()
        .find_map(MediaType::from_mime)
    {
        return Some(media_type);
    }

    let is_raw = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| RAW_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
    if is_raw {
        return Some(MediaType::Image);
    }

    match infer::get_from_path(path) {
        Ok(Some(kind)) => MediaType::from_mime(kind.mime_type()),
        Ok(None) => None,
        Err(e) => {
            log::debug!("Could not sniff {}: {}", path.display(), e);
            None
        }
    }
}
