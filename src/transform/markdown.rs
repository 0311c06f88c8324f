//! Markdown to HTML rendering for page bodies.
//!
//! Wraps `pulldown-cmark` with the extensions documentation pages lean on
//! (tables, footnotes, heading attributes, definition lists) and two event
//! passes of our own: headings without an explicit id get a slug so they can
//! be linked to, and fenced code is syntax highlighted with syntect.

use anyhow::{anyhow, Result};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

pub struct MarkdownRenderer {
    ss: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    /// Create a renderer highlighting code with the named syntect theme
    pub fn new(theme_name: &str) -> Result<MarkdownRenderer> {
        let ss = SyntaxSet::load_defaults_newlines();
        let mut ts = ThemeSet::load_defaults();
        let theme = ts.themes.remove(theme_name).ok_or_else(|| {
            anyhow!(
                "Unknown syntax theme '{theme_name}', expected one of: {}",
                ts.themes.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        })?;

        Ok(MarkdownRenderer { ss, theme })
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_DEFINITION_LIST);
        options
    }

    /// Render a Markdown body to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let mut events: Vec<Event> = Parser::new_ext(markdown, Self::options()).collect();
        assign_heading_ids(&mut events);
        let events = self.highlight_code_blocks(events);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn highlight_code_blocks<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut output: Vec<Event<'a>> = Vec::with_capacity(events.len());
        // (language, code) of the block being collected
        let mut block: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .unwrap_or_default()
                            .to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    block = Some((language, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, code)) = block.take() {
                        output.push(Event::Html(CowStr::from(self.highlight(&language, &code))));
                    }
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => output.push(other),
            }
        }

        output
    }

    fn highlight(&self, language: &str, code: &str) -> String {
        let syntax = if language.is_empty() {
            None
        } else {
            self.ss.find_syntax_by_token(language)
        };

        if let Some(syntax) = syntax {
            match syntect::html::highlighted_html_for_string(code, &self.ss, syntax, &self.theme) {
                Ok(html) => return html,
                Err(e) => log::debug!("failed to highlight {language} block: {e}"),
            }
        }

        let class = if language.is_empty() {
            String::new()
        } else {
            format!(" class=\"language-{}\"", html_escape::encode_double_quoted_attribute(language))
        };
        format!(
            "<pre><code{class}>{}</code></pre>\n",
            html_escape::encode_text(code)
        )
    }
}

/// Turn heading text into an anchor id
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug
}

fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Give every heading without an explicit id a unique slug id
fn assign_heading_ids(events: &mut [Event]) {
    let mut seen: HashMap<String, usize> = HashMap::default();

    for i in 0..events.len() {
        let explicit = match &events[i] {
            Event::Start(Tag::Heading { id, .. }) => id.as_ref().map(|id| id.to_string()),
            _ => continue,
        };
        if let Some(explicit) = explicit {
            seen.entry(explicit).or_insert(0);
            continue;
        }

        let mut slug = slugify(&heading_text(&events[i + 1..]));
        if slug.is_empty() {
            slug = "section".to_string();
        }
        let count = seen.entry(slug.clone()).or_insert(0);
        let slug = if *count == 0 {
            slug
        } else {
            format!("{slug}_{count}")
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}
