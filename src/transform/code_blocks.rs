//! Fenced code block headers.
//!
//! Documentation fences often carry a language and an attribute string such
//! as ```` ```js {title="astro.config.mjs"} ````. The Markdown engine drops
//! the attributes, so the title and language are lifted into a small header
//! placed above the block.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(\w+)?\s*(?:\{([^}]*)\})?\s*(.*?)```").expect("valid fence regex")
});

static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"title="([^"]+)""#).expect("valid title regex"));

/// Header text for a block, if it has a title or a language
pub fn header_text(language: &str, attributes: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::default();
    if let Some(caps) = RE_TITLE.captures(attributes) {
        parts.push(caps[1].to_string());
    }
    if !language.is_empty() {
        parts.push(format!("({language})"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Prefix every fenced block in `content` with a header and normalise the fence.
pub fn decorate_code_blocks(content: &str) -> String {
    RE_FENCE
        .replace_all(content, |caps: &Captures| {
            let language = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let attributes = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let code = caps.get(3).map(|m| m.as_str()).unwrap_or_default().trim();

            let fence = format!("```{language}\n{code}\n```");
            match header_text(language, attributes) {
                Some(header) => format!(
                    "<div class=\"code-header\"><i>{}</i></div>\n\n{fence}",
                    html_escape::encode_text(&header)
                ),
                None => format!("\n{fence}"),
            }
        })
        .to_string()
}
