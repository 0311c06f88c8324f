//! Hierarchical numbering and the table of contents.
//!
//! Pages are numbered like `1`, `1.1`, `1.1.1` by their depth in the
//! documentation tree. Numbering is driven by a counter per depth: bumping a
//! depth resets every deeper counter, so a new section restarts its children
//! at one.

use std::fmt;

/// One counter per nesting depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingCounters {
    counters: Vec<u32>,
}

impl Default for NumberingCounters {
    fn default() -> Self {
        NumberingCounters { counters: vec![0] }
    }
}

impl NumberingCounters {
    /// Number the next page at `depth`, returning its full numbering.
    pub fn advance(&mut self, depth: usize) -> Vec<u32> {
        while self.counters.len() <= depth {
            self.counters.push(0);
        }

        self.counters[depth] += 1;
        for counter in self.counters.iter_mut().skip(depth + 1) {
            *counter = 0;
        }

        self.counters[..=depth].to_vec()
    }
}

/// A line in the table of contents, and the heading of its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub numbering: Vec<u32>,
    pub title: String,
    pub anchor_id: String,
    pub indent_level: usize,
}

impl TocEntry {
    pub fn new(numbering: Vec<u32>, title: String, indent_level: usize) -> TocEntry {
        let anchor_id = format!("section-{}", join_numbering(&numbering, "-"));
        TocEntry {
            numbering,
            title,
            anchor_id,
            indent_level,
        }
    }

    /// Dot-joined numbering, e.g. `2.1.3`
    pub fn label(&self) -> String {
        join_numbering(&self.numbering, ".")
    }

    pub fn render(&self) -> String {
        format!(
            r##"<div class="toc-entry" style="padding-left: {}em"><a href="#{}">{}</a></div>"##,
            self.indent_level * 2,
            self.anchor_id,
            html_escape::encode_text(&self.to_string())
        )
    }
}

impl fmt::Display for TocEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.title)
    }
}

fn join_numbering(numbering: &[u32], separator: &str) -> String {
    numbering
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Render the table of contents page
pub fn render(entries: &[TocEntry]) -> String {
    let mut html = String::from("<nav class=\"toc\">\n<h1>Table of Contents</h1>\n");
    for entry in entries {
        html.push_str(&entry.render());
        html.push('\n');
    }
    html.push_str("</nav>");
    html
}

/// Title-case a file stem: the first letter of every run of letters is
/// upper-cased and the rest lower-cased.
pub fn title_case(text: &str) -> String {
    let mut title = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }

    title
}
