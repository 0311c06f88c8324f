//! Frontmatter splitting and best-effort parsing.
//!
//! Documentation frontmatter is YAML in theory, but real pages carry fields
//! that trip a strict parser: truncated URLs, stray quotes, block scalars.
//! Parsing therefore runs in two independent passes. A regex pass always
//! recovers `title` and `description`. A YAML pass over a sanitised copy
//! recovers everything else and wins where both found a value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Line that opens and closes a frontmatter block
pub const DELIMITER: &str = "---";

/// Fields known to break parsing; they carry nothing the book needs
const NOISY_FIELDS: &[&str] = &["i18nReady", "label", "githubIntegrationURL", "maxHeadingLevel"];

const BLOCK_SCALARS: &[&str] = &["|", "|-", "|+", ">", ">-", ">+"];

static RE_IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^import\s.*(?:\n|$)").expect("valid import regex"));

static RE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^title:\s*['"]?(.*?)(?:['"]?\s*$|['"]?\s+\w+:)"#).expect("valid title regex")
});

static RE_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^description:\s*['"]?(.*?)(?:['"]?\s*$|['"]?\s+\w+:)"#)
        .expect("valid description regex")
});

/// Metadata recovered from a page's frontmatter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: BTreeMap<String, Value>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A field rendered as display text.
    ///
    /// Strings, numbers and booleans are rendered; empty strings, nulls and
    /// collections count as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn description(&self) -> Option<String> {
        self.text("description")
    }
}

/// Split a document into its frontmatter text (if any) and its body.
///
/// Frontmatter only exists when the very first line is the delimiter and a
/// later line closes it. Otherwise the whole document is returned unchanged
/// as the body.
pub fn split(content: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = content.split('\n').collect();
    if lines[0].trim() != DELIMITER {
        return (None, content.to_string());
    }

    let end = match lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end_matches('\r') == DELIMITER)
    {
        Some(offset) => offset + 1,
        None => return (None, content.to_string()),
    };

    let frontmatter = lines[1..end].join("\n");
    let body = lines[end + 1..].join("\n");
    let body = RE_IMPORT_LINE.replace_all(&body, "").to_string();

    (Some(frontmatter), body)
}

fn field_name(line: &str) -> Option<&str> {
    line.split_once(':').map(|(key, _)| key.trim())
}

/// Drop or rewrite the lines a YAML parser is likely to choke on
fn sanitize(frontmatter: &str) -> String {
    let mut lines: Vec<String> = Vec::default();

    for line in frontmatter.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        if field_name(line).is_some_and(|name| NOISY_FIELDS.contains(&name)) {
            continue;
        }

        // truncated URL
        if value.contains("http") && value.contains('\'') && !value.ends_with('\'') {
            continue;
        }

        // unterminated quoted string
        if value.matches('\'').count() == 1 || value.matches('"').count() == 1 {
            continue;
        }

        if BLOCK_SCALARS.contains(&value.trim()) {
            lines.push(format!("{key}: "));
        } else {
            lines.push(line.to_string());
        }
    }

    lines.join("\n")
}

fn regex_field(re: &Regex, frontmatter: &str) -> Option<String> {
    re.captures(frontmatter)
        .map(|caps| caps[1].trim_matches([' ', '\'', '"']).to_string())
}

fn yaml_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Recover whatever metadata can be found in `frontmatter`.
///
/// Returns `None` when neither pass found any field.
pub fn parse(frontmatter: &str) -> Option<Frontmatter> {
    if frontmatter.trim().is_empty() {
        return None;
    }

    let mut fields: BTreeMap<String, Value> = BTreeMap::default();
    if let Some(title) = regex_field(&RE_TITLE, frontmatter) {
        fields.insert("title".to_string(), Value::String(title));
    }
    if let Some(description) = regex_field(&RE_DESCRIPTION, frontmatter) {
        fields.insert("description".to_string(), Value::String(description));
    }

    let cleaned = sanitize(frontmatter);
    match serde_yaml::from_str::<Value>(&cleaned) {
        Ok(Value::Mapping(mapping)) => {
            for (key, value) in mapping {
                if let Some(key) = yaml_key(&key) {
                    fields.insert(key, value);
                }
            }
        }
        Ok(_) => {}
        Err(e) => log::debug!("frontmatter isn't valid YAML, keeping regex fields: {e}"),
    }

    if fields.is_empty() {
        None
    } else {
        Some(Frontmatter { fields })
    }
}
