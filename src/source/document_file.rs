use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

/// A discovered Markdown or MDX page.
///
/// Ordering follows the reading order of the generated book: pages are grouped
/// by directory, a directory's `index` page leads its siblings, and the rest
/// follow alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    /// Full path on disk
    path: PathBuf,
    /// Path relative to the discovery root
    relative: PathBuf,
    key: SortKey,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    /// Parent directory, `/`-joined, relative to the root
    directory: String,
    /// `false` for index pages so they sort first
    after_index: bool,
    file_name: String,
}

impl DocumentFile {
    /// Build a document from a path found under `root`.
    ///
    /// Returns `None` if `path` isn't inside `root` or has no file name.
    pub fn new<P: Into<PathBuf>>(root: &Path, path: P) -> Option<DocumentFile> {
        let path: PathBuf = path.into();
        let relative = path.strip_prefix(root).ok()?.to_path_buf();
        let file_name = relative.file_name()?.to_string_lossy().to_string();

        let directory = relative
            .parent()
            .map(posix_path)
            .unwrap_or_default();
        let is_index = is_index_name(&relative);

        Some(DocumentFile {
            path,
            relative,
            key: SortKey {
                directory,
                after_index: !is_index,
                file_name,
            },
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// The relative path with `/` separators regardless of platform
    pub fn display_path(&self) -> String {
        posix_path(&self.relative)
    }

    /// Whether this page stands in for its directory
    pub fn is_index(&self) -> bool {
        !self.key.after_index
    }

    /// Nesting depth of the page in the table of contents.
    ///
    /// This is the number of directories between the page and the root, except
    /// that a non-root `index` page is lifted one level to sit at its
    /// directory's depth.
    pub fn depth(&self) -> usize {
        let depth = self
            .relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
            .saturating_sub(1);

        if self.is_index() && depth > 0 {
            depth - 1
        } else {
            depth
        }
    }

    /// The file name without its extension
    pub fn stem(&self) -> String {
        self.relative
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl PartialOrd for DocumentFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocumentFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.relative.cmp(&other.relative))
    }
}

fn is_index_name(path: &Path) -> bool {
    path.file_stem().and_then(|s| s.to_str()) == Some("index")
}

fn posix_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod test {
    use super::*;

    fn doc(relative: &str) -> DocumentFile {
        let root = Path::new("/docs");
        DocumentFile::new(root, root.join(relative)).expect("path is under root")
    }

    #[test]
    fn index_sorts_before_siblings() {
        let mut docs = vec![doc("guide/alpha.md"), doc("guide/index.mdx"), doc("guide/beta.md")];
        docs.sort();
        let names: Vec<String> = docs.iter().map(DocumentFile::display_path).collect();
        assert_eq!(names, vec!["guide/index.mdx", "guide/alpha.md", "guide/beta.md"]);
    }

    #[test]
    fn directories_compare_as_strings() {
        let mut docs = vec![doc("guide/index.md"), doc("zebra.md"), doc("index.md")];
        docs.sort();
        let names: Vec<String> = docs.iter().map(DocumentFile::display_path).collect();
        assert_eq!(names, vec!["index.md", "zebra.md", "guide/index.md"]);
    }

    #[test]
    fn parent_directory_sorts_before_its_dashed_sibling() {
        let mut docs = vec![doc("a-b/alpha.md"), doc("a/zeta.md"), doc("a/index.mdx")];
        docs.sort();
        let names: Vec<String> = docs.iter().map(DocumentFile::display_path).collect();
        assert_eq!(names, vec!["a/index.mdx", "a/zeta.md", "a-b/alpha.md"]);
        assert!(docs[0].is_index());
    }

    #[test]
    fn depth_lifts_nested_index_pages() {
        assert_eq!(doc("index.md").depth(), 0);
        assert_eq!(doc("about.md").depth(), 0);
        assert_eq!(doc("guide/index.md").depth(), 0);
        assert_eq!(doc("guide/setup.md").depth(), 1);
        assert_eq!(doc("guide/deep/index.md").depth(), 1);
        assert_eq!(doc("guide/deep/page.mdx").depth(), 2);
    }

    #[test]
    fn paths_outside_root_are_rejected() {
        assert!(DocumentFile::new(Path::new("/docs"), "/elsewhere/index.md").is_none());
    }
}
