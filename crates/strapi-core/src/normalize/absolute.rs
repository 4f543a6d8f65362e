//! Rewriting of relative asset URLs.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img([^>]*) src=(["'])([^"']*)["']"#).expect("static regex is valid")
});

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]*)(\s+"[^"]*")?\)"#).expect("static regex is valid")
});

/// Prefix relative asset references in `value` with `base`.
///
/// A string under a `url` key whose mapping also holds an `ext` key (an
/// uploaded file object) and which starts with `/` gets `base` prepended.
/// Every other string has its HTML `<img src>` attributes and Markdown
/// image links rewritten.
///
/// Markdown links are prefixed even when already absolute, so a document
/// that mixes both forms ends up with a doubled prefix on the absolute ones.
pub fn absolutize(value: &mut Value, base: &str) {
    let base = base.trim_end_matches('/');
    let mut stack = vec![value];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                let is_file = map.contains_key("ext");
                for (key, child) in map.iter_mut() {
                    if child.is_object() || child.is_array() {
                        stack.push(child);
                    } else if let Value::String(text) = child {
                        if key.as_str() == "url" && is_file {
                            if text.starts_with('/') {
                                text.insert_str(0, base);
                            }
                        } else if let Some(rewritten) = rewrite_embedded(text, base) {
                            *text = rewritten;
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if item.is_object() || item.is_array() {
                        stack.push(item);
                    } else if let Value::String(text) = item {
                        if let Some(rewritten) = rewrite_embedded(text, base) {
                            *text = rewritten;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Rewrite image references inside rich text, or `None` if nothing matched.
fn rewrite_embedded(text: &str, base: &str) -> Option<String> {
    if text.is_empty() || !(text.contains("<img") || text.contains("![")) {
        return None;
    }

    let html = HTML_IMAGE.replace_all(text, |caps: &Captures<'_>| {
        let path = &caps[3];
        if has_scheme(path) {
            return caps[0].to_string();
        }
        let quote = &caps[2];
        let separator = if path.starts_with('/') { "" } else { "/" };
        format!("<img{} src={quote}{base}{separator}{path}{quote}", &caps[1])
    });

    let markdown = MARKDOWN_IMAGE.replace_all(&html, |caps: &Captures<'_>| {
        let title = caps.get(3).map_or("", |title| title.as_str());
        format!("![{}]({base}{}{title})", &caps[1], &caps[2])
    });

    let rewritten = markdown.into_owned();
    (rewritten != text).then_some(rewritten)
}

fn has_scheme(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    ["http://", "https://", "ftp://", "//", "data:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}
