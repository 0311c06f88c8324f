//! The stylesheet embedded into the generated document.
//!
//! All visual styling flows through a plain CSS file next to the working
//! directory so it can be tweaked between runs. When the file is missing the
//! built-in default is written out first.

use crate::error::ProcessingError;
use std::path::Path;

pub const DEFAULT_STYLESHEET: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/default.css"
));

/// Write the default stylesheet to `path`
pub fn write_default(path: &Path) -> Result<(), ProcessingError> {
    std::fs::write(path, DEFAULT_STYLESHEET.trim()).map_err(|e| ProcessingError::Stylesheet {
        path: path.to_path_buf(),
        reason: format!("Failed to create CSS file: {e}"),
    })
}

/// Read the stylesheet at `path`, creating it from the default if needed.
pub fn load_or_create(path: &Path) -> Result<String, ProcessingError> {
    if !path.exists() {
        println!("Creating default {}...", path.display());
        write_default(path)?;
    }

    std::fs::read_to_string(path).map_err(|e| ProcessingError::Stylesheet {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn creates_missing_stylesheet() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("styles.css");

        let css = load_or_create(&path).expect("can create stylesheet");
        assert!(path.is_file());
        assert!(css.contains(".page-break"));
        assert!(css.contains(".code-header"));
    }

    #[test]
    fn keeps_existing_stylesheet() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("styles.css");
        std::fs::write(&path, "body { color: red; }").expect("can write stylesheet");

        let css = load_or_create(&path).expect("can read stylesheet");
        assert_eq!(css, "body { color: red; }");
    }
}
