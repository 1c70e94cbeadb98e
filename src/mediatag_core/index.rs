use crate::mediatag_core::error::{Result, TaggerError};
use std::path::{Path, PathBuf};

/// Staged files grouped by tag.
///
/// Tags iterate in the order they were first recorded and files keep the
/// order they were added in. A file belongs to exactly one tag.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    entries: Vec<(String, Vec<PathBuf>)>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the files of `tag`, creating the tag if it is new.
    pub fn record(&mut self, tag: &str, path: PathBuf) -> Result<()> {
        if self.tag_of(&path).is_some() {
            return Err(TaggerError::AlreadyIndexed(path));
        }
        match self.entries.iter_mut().find(|(t, _)| t == tag) {
            Some((_, files)) => files.push(path),
            None => self.entries.push((tag.to_string(), vec![path])),
        }
        Ok(())
    }

    pub fn files(&self, tag: &str) -> Option<&[PathBuf]> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, files)| files.as_slice())
    }

    pub fn tag_of(&self, path: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, files)| files.iter().any(|f| f == path))
            .map(|(tag, _)| tag.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(tag, files)| (tag.as_str(), files.as_slice()))
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.entries.iter().map(|(_, files)| files.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut index = TagIndex::new();
        index.record("fish", PathBuf::from("/s/1.jpg")).unwrap();
        index.record("2023_trip", PathBuf::from("/s/2.jpg")).unwrap();
        index.record("fish", PathBuf::from("/s/3.jpg")).unwrap();

        let tags: Vec<_> = index.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec!["fish", "2023_trip"]);
        assert_eq!(
            index.files("fish").unwrap(),
            &[PathBuf::from("/s/1.jpg"), PathBuf::from("/s/3.jpg")]
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.file_count(), 3);
    }

    #[test]
    fn test_file_belongs_to_one_tag() {
        let mut index = TagIndex::new();
        index.record("fish", PathBuf::from("/s/1.jpg")).unwrap();

        let err = index.record("birds", PathBuf::from("/s/1.jpg")).unwrap_err();
        assert!(matches!(err, TaggerError::AlreadyIndexed(_)));
        assert_eq!(index.tag_of(Path::new("/s/1.jpg")), Some("fish"));
        assert!(index.files("birds").is_none());
    }

    #[test]
    fn test_empty() {
        let index = TagIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.file_count(), 0);
        assert_eq!(index.tag_of(Path::new("/s/1.jpg")), None);
    }
}
