//! Canonical hashing of graph descriptions.
//!
//! Two runs produce the same graph exactly when their canonical hashes match:
//! - Graphs are canonicalized as JSON with sorted keys and no whitespace
//! - The canonical string is hashed with BLAKE3

use crate::error::SpecError;
use crate::graph::GraphDef;

/// Computes the canonical BLAKE3 hash of a graph.
///
/// ```text
/// graph_hash = hex(BLAKE3(canonical_json(graph)))
/// ```
///
/// # Example
/// ```
/// use deepnote_spec::graph::{GraphBuilder, NodeKind, Rate};
/// use deepnote_spec::hash::canonical_graph_hash;
///
/// let mut b = GraphBuilder::new("H");
/// let saw = b.add(Rate::Audio, NodeKind::Saw { freq: 100.0.into() });
/// b.add(Rate::Audio, NodeKind::Out { bus: 0, channels: vec![saw] });
///
/// let hash = canonical_graph_hash(&b.finish()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_graph_hash(graph: &GraphDef) -> Result<String, SpecError> {
    let value = graph.to_value()?;
    canonical_value_hash(&value)
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value);
    let hash = blake3::hash(canonical.as_bytes());
    Ok(hash.to_hex().to_string())
}

/// Canonicalizes a JSON value.
///
/// Object keys are sorted lexicographically, there is no whitespace between
/// tokens, integer-valued floats print without a fraction and strings use
/// minimal escaping.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                return "0".to_string();
            }
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            format!("{}", f)
        }
        _ => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
