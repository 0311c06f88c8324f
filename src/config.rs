//! Run settings.
//!
//! Every field has a compiled-in default so the tool runs without any
//! configuration file. A `docs-pdf.toml` next to the working directory can
//! override individual fields; anything it leaves out keeps its default.

use crate::error::ProcessingError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "docs-pdf.toml";

/// Complete configuration for a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub content: ContentSettings,
    pub pdf: PdfSettings,
}

/// Where the documentation tree comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Remote git URL
    pub repository: String,
    pub branch: String,
    /// Subdirectory of the remote that holds the documents
    pub docs_dir: String,
    /// Local working copy, reused between runs
    pub local_dir: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            repository: "https://github.com/withastro/docs.git".to_string(),
            branch: "main".to_string(),
            docs_dir: "src/content/docs/en".to_string(),
            local_dir: PathBuf::from("astro-docs"),
        }
    }
}

/// How documents are transformed and assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Book title shown on the cover page
    pub title: String,
    /// Prefix for relative image paths
    pub image_base_url: String,
    /// Stylesheet embedded into the document, created if missing
    pub stylesheet: PathBuf,
    /// Cover page template. Placeholders: {title}, {date}
    pub cover_template: String,
    /// Syntect theme used to highlight fenced code
    pub syntax_theme: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        ContentSettings {
            title: "Astro Documentation".to_string(),
            image_base_url: "https://docs.astro.build/".to_string(),
            stylesheet: PathBuf::from("styles.css"),
            cover_template: default_cover_template(),
            syntax_theme: "InspiredGitHub".to_string(),
        }
    }
}

pub fn default_cover_template() -> String {
    r#"<div class="title">{title}</div>
<div class="date">Generated on {date}</div>"#
        .to_string()
}

/// Print options handed to the headless browser.
///
/// Lengths are in inches, which is what the print API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Output file name prefix, completed with the current date
    pub outfile_prefix: String,
    pub page_width_in: f64,
    pub page_height_in: f64,
    pub margin_in: f64,
    pub print_background: bool,
    pub header_template: String,
    pub footer_template: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// How long to wait for the page to settle before printing
    pub timeout_secs: u64,
    /// Run the browser inside its sandbox; containers running as root need `false`
    pub sandbox: bool,
}

impl Default for PdfSettings {
    fn default() -> Self {
        PdfSettings {
            outfile_prefix: "Astro_Documentation".to_string(),
            // A4
            page_width_in: 8.27,
            page_height_in: 11.69,
            // 50px at 96dpi
            margin_in: 50.0 / 96.0,
            print_background: true,
            header_template: default_header_template(),
            footer_template: default_footer_template(),
            viewport_width: 1280,
            viewport_height: 1024,
            timeout_secs: 120,
            sandbox: true,
        }
    }
}

fn default_header_template() -> String {
    r#"<div style="font-size: 10px; text-align: right; width: 100%; padding-right: 20px; margin-top: 20px;"><span class="pageNumber"></span> of <span class="totalPages"></span></div>"#
        .to_string()
}

fn default_footer_template() -> String {
    r#"<div style="font-size: 10px; text-align: center; width: 100%; margin-bottom: 20px;"><span class="url"></span></div>"#
        .to_string()
}

impl PdfSettings {
    /// The dated output file name for a run happening today
    pub fn outfile(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        PathBuf::from(format!("{}_{date}.pdf", self.outfile_prefix))
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when it doesn't exist.
    pub fn load(path: &Path) -> Result<Settings, ProcessingError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ProcessingError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ProcessingError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_settings() {
        let settings = Settings::default();
        toml::to_string_pretty(&settings).expect("can serialize settings to TOML");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[source]
branch = "next"

[pdf]
outfile_prefix = "Docs"
"#,
        )
        .expect("can parse partial settings");

        assert_eq!(settings.source.branch, "next");
        assert_eq!(settings.source.docs_dir, "src/content/docs/en");
        assert_eq!(settings.pdf.outfile_prefix, "Docs");
        assert_eq!(settings.pdf.timeout_secs, 120);
        assert_eq!(settings.content.stylesheet, PathBuf::from("styles.css"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let settings =
            Settings::load(&dir.path().join("nope.toml")).expect("missing file is not an error");
        assert_eq!(settings.source.local_dir, PathBuf::from("astro-docs"));
    }

    #[test]
    fn broken_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("docs-pdf.toml");
        std::fs::write(&path, "[source\nbranch = ").expect("can write file");
        assert!(matches!(
            Settings::load(&path),
            Err(ProcessingError::Config { .. })
        ));
    }

    #[test]
    fn outfile_is_dated() {
        let pdf = PdfSettings::default();
        let name = pdf.outfile().display().to_string();
        assert!(name.starts_with("Astro_Documentation_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "Astro_Documentation_2024-01-01.pdf".len());
    }
}
