//! Per-document text transformation.
//!
//! Each page goes through the same fixed sequence: image references are made
//! absolute, code fences get their headers, then the frontmatter is split off
//! and parsed. The body is rendered to HTML later, during page assembly.

mod code_blocks;
pub use code_blocks::*;

mod frontmatter;
pub use frontmatter::Frontmatter;

mod images;
pub use images::*;

mod markdown;
pub use markdown::*;

/// A page that survived frontmatter parsing
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    pub frontmatter: Frontmatter,
    /// Markdown body with imports stripped
    pub body: String,
}

/// Run the text transformations over one page's raw contents.
///
/// Returns `None` when the page has no usable frontmatter; such pages are
/// left out of the book.
pub fn prepare(content: &str, image_base_url: &str) -> Option<PreparedDocument> {
    let content = rewrite_image_paths(content, image_base_url);
    let content = decorate_code_blocks(&content);

    let (frontmatter, body) = frontmatter::split(&content);
    let frontmatter = frontmatter::parse(&frontmatter?)?;

    Some(PreparedDocument { frontmatter, body })
}
