//! Document discovery and reading order.
//!
//! Walks the synced documentation tree and collects every Markdown and MDX
//! page, skipping build output, dependencies and internal directories. The
//! result is sorted into book order by [`DocumentFile`]'s ordering.

use super::DocumentFile;
use crate::error::ProcessingError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use std::path::Path;

/// Directory names that are never descended into
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "_internal",
    "dist",
    "temp",
    "__pycache__",
];

/// Extensions of plain and interactive documents
const DOCUMENT_GLOBS: &[&str] = &["*.md", "*.mdx"];

fn document_globs() -> Result<GlobSet, ProcessingError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DOCUMENT_GLOBS {
        let glob = Glob::new(pattern)
            .map_err(|e| ProcessingError::NoContent(format!("Invalid glob {pattern}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ProcessingError::NoContent(format!("Invalid document globs: {e}")))
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
    if !is_dir {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    EXCLUDED_DIRS.contains(&name.as_ref()) || name.starts_with('_')
}

/// Find all documents under `root`, in book order.
pub fn discover(root: &Path) -> Result<Vec<DocumentFile>, ProcessingError> {
    let globs = document_globs()?;

    let mut documents: Vec<DocumentFile> = Vec::default();
    let walk = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| !is_excluded_dir(entry))
        .build();

    for entry in walk {
        let entry = entry.map_err(|e| {
            ProcessingError::NoContent(format!(
                "Failed to walk documentation directory {}: {e}",
                root.display()
            ))
        })?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file || !globs.is_match(entry.file_name()) {
            continue;
        }

        if let Some(document) = DocumentFile::new(root, entry.into_path()) {
            documents.push(document);
        }
    }

    if documents.is_empty() {
        return Err(ProcessingError::NoContent(format!(
            "No markdown files found in {}",
            root.display()
        )));
    }

    documents.sort();
    Ok(documents)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("has a parent")).expect("can create dirs");
        fs::write(path, "---\ntitle: x\n---\n").expect("can write file");
    }

    #[test]
    fn skips_excluded_and_underscored_dirs() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        touch(root, "index.md");
        touch(root, "node_modules/pkg/readme.md");
        touch(root, "dist/out.md");
        touch(root, "_drafts/wip.mdx");
        touch(root, "guide/_partials/snippet.md");
        touch(root, "guide/temp/scratch.md");
        touch(root, "guide/setup.mdx");

        let found: Vec<String> = discover(root)
            .expect("finds documents")
            .iter()
            .map(DocumentFile::display_path)
            .collect();

        assert_eq!(found, vec!["index.md", "guide/setup.mdx"]);
        for path in &found {
            for excluded in EXCLUDED_DIRS {
                assert!(!path.split('/').any(|part| part == *excluded));
            }
        }
    }

    #[test]
    fn ignores_other_extensions() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        touch(root, "index.md");
        touch(root, "logo.svg");
        touch(root, "notes.txt");
        touch(root, "component.astro");

        let found = discover(root).expect("finds documents");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn orders_index_first_in_each_directory() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        touch(root, "reference/api.md");
        touch(root, "reference/index.mdx");
        touch(root, "reference/cli.md");
        touch(root, "index.md");
        touch(root, "about.md");

        let found: Vec<String> = discover(root)
            .expect("finds documents")
            .iter()
            .map(DocumentFile::display_path)
            .collect();

        assert_eq!(
            found,
            vec![
                "index.md",
                "about.md",
                "reference/index.mdx",
                "reference/api.md",
                "reference/cli.md",
            ]
        );
    }

    #[test]
    fn empty_tree_is_no_content() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        touch(dir.path(), "node_modules/readme.md");
        assert!(matches!(
            discover(dir.path()),
            Err(ProcessingError::NoContent(_))
        ));
    }
}
