//! Extension filtering for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Accepts files whose extension is in an allow-list.
///
/// Entries are normalized on construction: lowercased, with any leading dot
/// removed, so `".JPG"` and `"jpg"` configure the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

impl ExtensionFilter {
    /// Create a filter from a list of extensions
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Check if a file should be included
    ///
    /// The extension is whatever follows the last dot of the file name, so a
    /// bare `.jpg` counts as a jpg.
    pub fn should_include(&self, path: &Path) -> bool {
        match extension_of(path) {
            Some(ext) => self.extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Normalized extensions, sorted
    pub fn extensions(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        list.sort_unstable();
        list
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(["jpg", "jpeg", "png", "gif"])
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_common_formats() {
        let filter = ExtensionFilter::default();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.jpeg")));
        assert!(filter.should_include(Path::new("/photos/image.png")));
        assert!(filter.should_include(Path::new("/photos/anim.gif")));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let filter = ExtensionFilter::default();
        assert!(filter.should_include(Path::new("/photos/IMG_1234.JPG")));
        assert!(filter.should_include(Path::new("/photos/image.Png")));
    }

    #[test]
    fn dotted_and_uppercase_entries_are_normalized() {
        let filter = ExtensionFilter::new([".JPG", " .Png "]);
        assert_eq!(filter.extensions(), vec!["jpg", "png"]);
        assert!(filter.should_include(Path::new("/a.jpg")));
    }

    #[test]
    fn rejects_other_extensions() {
        let filter = ExtensionFilter::default();
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/image.webp")));
    }

    #[test]
    fn rejects_files_without_extension() {
        let filter = ExtensionFilter::default();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
        assert!(!filter.should_include(Path::new("/photos/trailing_dot.")));
    }

    #[test]
    fn dot_only_name_uses_text_after_the_dot() {
        let filter = ExtensionFilter::default();
        assert!(filter.should_include(Path::new("/photos/.jpg")));
        assert!(filter.should_include(Path::new("/photos/.PNG")));
        assert!(!filter.should_include(Path::new("/photos/.bashrc")));
    }

    #[test]
    fn hidden_files_are_not_special() {
        let filter = ExtensionFilter::default();
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let filter = ExtensionFilter::new(["", "."]);
        assert!(filter.is_empty());
    }
}
