//! Assembly of the single HTML document that gets printed.
//!
//! Pages are processed in discovery order. Each page that has usable
//! frontmatter is numbered, gets a table of contents entry and is rendered
//! into an HTML section. A page that fails for any reason is logged and left
//! out; the run only fails if nothing at all could be rendered.
//!
//! The finished document is laid out as: cover, table of contents, pages
//! separated by page breaks, licence notice.

pub mod styles;
mod toc;
pub use toc::*;

use crate::config::ContentSettings;
use crate::error::ProcessingError;
use crate::source::DocumentFile;
use crate::transform::{self, MarkdownRenderer, PreparedDocument};
use indicatif::ProgressBar;

pub const PAGE_BREAK: &str = "<div class=\"page-break\"></div>";

/// The table of contents and page bodies, in book order
#[derive(Debug, Default)]
pub struct AggregatedDocument {
    pub entries: Vec<TocEntry>,
    pub pages: Vec<String>,
    /// Pages that failed or had no frontmatter
    pub skipped: usize,
}

/// Everything the assembled document needs besides the pages
pub struct DocumentShell<'a> {
    pub title: &'a str,
    pub css: &'a str,
    pub cover_template: &'a str,
    pub date: String,
}

impl<'a> DocumentShell<'a> {
    pub fn new(content: &'a ContentSettings, css: &'a str) -> DocumentShell<'a> {
        DocumentShell {
            title: &content.title,
            css,
            cover_template: &content.cover_template,
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Render one page's HTML: numbered heading, path annotation, description and body
fn render_page(
    entry: &TocEntry,
    document: &DocumentFile,
    prepared: &PreparedDocument,
    body: &str,
) -> String {
    let mut html: Vec<String> = vec![
        format!(
            "<h1 id=\"{}\">{}</h1>",
            entry.anchor_id,
            html_escape::encode_text(&entry.to_string())
        ),
        format!(
            "<div class=\"doc-path\"><p>Documentation path: {}</p></div>",
            html_escape::encode_text(&document.display_path())
        ),
    ];

    if let Some(description) = prepared.frontmatter.description() {
        html.push(format!(
            "<p><strong>Description:</strong> {}</p>",
            html_escape::encode_text(&description)
        ));
        html.push("<br/>".to_string());
    }

    html.push(body.to_string());
    html.join("\n")
}

fn load_page(
    document: &DocumentFile,
    image_base_url: &str,
) -> Result<Option<PreparedDocument>, ProcessingError> {
    let contents = std::fs::read_to_string(document.path())
        .map_err(|e| ProcessingError::document(document.path(), e))?;
    Ok(transform::prepare(&contents, image_base_url))
}

/// Turn the discovered documents into numbered pages.
///
/// Fails with [`ProcessingError::NoContent`] if no page could be rendered.
pub fn assemble(
    documents: &[DocumentFile],
    renderer: &MarkdownRenderer,
    image_base_url: &str,
    progress: &ProgressBar,
) -> Result<AggregatedDocument, ProcessingError> {
    let mut counters = NumberingCounters::default();
    let mut book = AggregatedDocument::default();

    for document in documents {
        progress.set_message(document.display_path());
        progress.inc(1);

        let prepared = match load_page(document, image_base_url) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => {
                log::debug!("{} has no frontmatter, skipping", document.display_path());
                book.skipped += 1;
                continue;
            }
            Err(e) => {
                progress.suspend(|| log::warn!("{e}"));
                book.skipped += 1;
                continue;
            }
        };

        let body = renderer.render(&prepared.body);

        let depth = document.depth();
        let title = prepared
            .frontmatter
            .title()
            .unwrap_or_else(|| title_case(&document.stem()));
        let entry = TocEntry::new(counters.advance(depth), title, depth);

        book.pages.push(render_page(&entry, document, &prepared, &body));
        book.entries.push(entry);
    }

    if book.pages.is_empty() {
        return Err(ProcessingError::NoContent(
            "No content was successfully processed".to_string(),
        ));
    }

    Ok(book)
}

fn render_cover(shell: &DocumentShell) -> String {
    let body = shell
        .cover_template
        .replace("{title}", &html_escape::encode_text(shell.title))
        .replace("{date}", &shell.date);
    format!(
        "<div class=\"master-container\">\n<div class=\"container\">\n{body}\n</div>\n</div>"
    )
}

/// Where the source of this program can be obtained
pub const SOURCE_CODE_URL: &str = env!("CARGO_PKG_REPOSITORY");

fn license_notice() -> String {
    format!(
        "This PDF was generated by {} v{}\n\
         Original work Copyright (C) 2024 Riyooo\n\
         Modified work Copyright (C) 2024 PacNPal\n\n\
         This program is free software: you can redistribute it and/or modify\n\
         it under the terms of the GNU Affero General Public License version 3.\n\
         Source code is available at: {SOURCE_CODE_URL}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
}

fn render_license_page() -> String {
    format!(
        r#"<div class="license-notice">
<h2>License Notice</h2>
<pre>{}</pre>
<p>This program comes with ABSOLUTELY NO WARRANTY. This is free software, and you
are welcome to redistribute it under certain conditions. See the GNU Affero General
Public License version 3 for details.</p>
</div>"#,
        html_escape::encode_text(&license_notice())
    )
}

impl AggregatedDocument {
    /// Wrap the pages into one complete HTML document
    pub fn to_html(&self, shell: &DocumentShell) -> String {
        let separator = format!("\n{PAGE_BREAK}\n");
        let pages = self.pages.join(separator.as_str());

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
{cover}
{PAGE_BREAK}
{toc}
{PAGE_BREAK}
{pages}
{license}
</body>
</html>"#,
            title = html_escape::encode_text(shell.title),
            css = shell.css,
            cover = render_cover(shell),
            toc = toc::render(&self.entries),
            license = render_license_page(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::discover;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("has a parent")).expect("can create dirs");
        fs::write(path, contents).expect("can write file");
    }

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new("InspiredGitHub").expect("default theme exists")
    }

    #[test]
    fn three_document_scenario() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        write(root, "docs/guide/setup.md", "---\ntitle: Setup\n---\nInstall it.");
        write(root, "docs/index.md", "---\ntitle: Intro\n---\nWelcome.");
        write(root, "docs/guide/index.md", "---\ntitle: Guide\n---\nThe guide.");

        let documents = discover(root).expect("finds documents");
        let order: Vec<String> = documents.iter().map(DocumentFile::display_path).collect();
        assert_eq!(
            order,
            vec!["docs/index.md", "docs/guide/index.md", "docs/guide/setup.md"]
        );

        let book = assemble(&documents, &renderer(), "https://x/", &ProgressBar::hidden())
            .expect("assembles pages");
        let labels: Vec<String> = book.entries.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["1 - Intro", "1.1 - Guide", "1.1.1 - Setup"]);
        assert_eq!(book.pages.len(), 3);
        assert_eq!(book.skipped, 0);
    }

    #[test]
    fn pages_without_frontmatter_are_dropped_silently() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        write(root, "index.md", "---\ntitle: Home\n---\nHi.");
        write(root, "notes.md", "# No frontmatter here");
        write(root, "zeta.md", "---\ndescription: Last page\n---\nBye.");

        let documents = discover(root).expect("finds documents");
        let book = assemble(&documents, &renderer(), "https://x/", &ProgressBar::hidden())
            .expect("assembles pages");

        let labels: Vec<String> = book.entries.iter().map(ToString::to_string).collect();
        // no gap in numbering for the dropped page, and the title falls back to the stem
        assert_eq!(labels, vec!["1 - Home", "2 - Zeta"]);
        assert_eq!(book.skipped, 1);
        assert!(book.pages[1].contains("<p><strong>Description:</strong> Last page</p>"));
    }

    #[test]
    fn nothing_renderable_is_no_content() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        write(root, "index.md", "no frontmatter");

        let documents = discover(root).expect("finds documents");
        let result = assemble(&documents, &renderer(), "https://x/", &ProgressBar::hidden());
        assert!(matches!(result, Err(ProcessingError::NoContent(_))));
    }

    #[test]
    fn pages_carry_anchor_path_and_body() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        write(
            root,
            "guide/routing.mdx",
            "---\ntitle: Routing\n---\n## Dynamic routes\n\n![Map](./map.png)",
        );

        let documents = discover(root).expect("finds documents");
        let book = assemble(
            &documents,
            &renderer(),
            "https://docs.example.com/",
            &ProgressBar::hidden(),
        )
        .expect("assembles pages");

        let page = &book.pages[0];
        assert_eq!(book.entries[0].numbering, vec![0, 1]);
        assert!(page.contains("<h1 id=\"section-0-1\">0.1 - Routing</h1>"));
        assert!(page.contains("Documentation path: guide/routing.mdx"));
        assert!(page.contains("id=\"dynamic-routes\""));
        assert!(page.contains("src=\"https://docs.example.com/map.png\""));
    }

    #[test]
    fn unreadable_pages_are_skipped_and_counted() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let root = dir.path();
        write(root, "index.md", "---\ntitle: Home\n---\nHi.");
        let bad = root.join("bad.md");
        fs::write(&bad, [0x2d, 0x2d, 0x2d, 0x0a, 0xff, 0xfe, 0x0a]).expect("can write file");

        let documents = discover(root).expect("finds documents");
        assert_eq!(documents.len(), 2);

        let book = assemble(&documents, &renderer(), "https://x/", &ProgressBar::hidden())
            .expect("a bad page doesn't fail the run");
        assert_eq!(book.pages.len(), 1);
        assert_eq!(book.skipped, 1);
        let labels: Vec<String> = book.entries.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["1 - Home"]);
    }

    #[test]
    fn license_page_links_the_source() {
        assert!(!SOURCE_CODE_URL.is_empty());

        let notice = license_notice();
        assert!(notice.contains(&format!("Source code is available at: {SOURCE_CODE_URL}")));
        assert!(notice.contains("Original work Copyright (C) 2024 Riyooo"));
        assert!(notice.contains("Modified work Copyright (C) 2024 PacNPal"));

        let page = render_license_page();
        assert!(page.contains("https://github.com/PacFactory/Docs-Exporter-Astro"));
    }

    #[test]
    fn page_breaks_separate_pages_only() {
        let book = AggregatedDocument {
            entries: vec![
                TocEntry::new(vec![1], "One".to_string(), 0),
                TocEntry::new(vec![2], "Two".to_string(), 0),
            ],
            pages: vec!["<p>one</p>".to_string(), "<p>two</p>".to_string()],
            skipped: 0,
        };
        let content = ContentSettings::default();
        let shell = DocumentShell::new(&content, "body {}");
        let html = book.to_html(&shell);

        let after_last_page = html
            .split("<p>two</p>")
            .nth(1)
            .expect("last page is present");
        assert!(!after_last_page.contains(PAGE_BREAK));
        assert!(html.contains(&format!("<p>one</p>\n{PAGE_BREAK}\n<p>two</p>")));
        assert!(html.contains("<style>body {}</style>"));
        assert!(html.contains("Table of Contents"));
        assert!(html.contains("<a href=\"#section-2\">2 - Two</a>"));
        assert!(html.contains("Astro Documentation"));
        assert!(html.contains("License Notice"));
    }
}
