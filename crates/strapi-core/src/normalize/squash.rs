//! Replacement of media objects by their URL.

use serde_json::Value;
use std::collections::HashSet;

/// Replace every uploaded-file object (a mapping holding both `url` and
/// `mime`) below `value` with its `url`.
///
/// `value` itself is never replaced, so a record that is a media entry
/// stays a record. Under a non-numeric key the full object is kept next to
/// it as `<key>_squash`. Kept objects are not walked again.
pub fn squash_images(value: &mut Value) {
    let mut stack = vec![value];
    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                let mut kept = Vec::new();
                for (key, child) in map.iter_mut() {
                    if let Some(url) = file_url(child) {
                        let original = std::mem::replace(child, url);
                        if !is_numeric(key) {
                            kept.push((format!("{key}_squash"), original));
                        }
                    }
                }

                let inserted: HashSet<String> = kept.iter().map(|(key, _)| key.clone()).collect();
                for (key, original) in kept {
                    map.insert(key, original);
                }

                for (key, child) in map.iter_mut() {
                    if !inserted.contains(key) && (child.is_object() || child.is_array()) {
                        stack.push(child);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Some(url) = file_url(item) {
                        *item = url;
                    } else if item.is_object() || item.is_array() {
                        stack.push(item);
                    }
                }
            }
            _ => {}
        }
    }
}

fn file_url(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    if !map.contains_key("mime") {
        return None;
    }
    map.get("url").cloned()
}

fn is_numeric(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
