//! Catalog data model and its JSON representation.
//!
//! The persisted catalog is a JSON array of objects with the field names
//! the browser client and the existing data files use:
//!
//! ```json
//! [
//!   {
//!     "nºModelo": "2A",
//!     "imagenLocal": "/images/2A.jpg",
//!     "etiquetas": ["ROJO", "AZUL"]
//!   }
//! ]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// One catalog item, keyed by its model identifier.
///
/// Fields are decoded leniently: `null` or a missing value falls back to the
/// default, and fields this crate does not know about are carried through
/// untouched so rewriting the file never drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique model identifier, derived from the image file stem.
    #[serde(rename = "nºModelo", default, deserialize_with = "lenient_string")]
    pub model_id: String,
    /// Public URL path of the image, e.g. `/images/2A.jpg`.
    #[serde(rename = "imagenLocal", default, deserialize_with = "lenient_string")]
    pub image_path: String,
    /// Uppercase labels, in insertion order.
    #[serde(rename = "etiquetas", default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    /// Any other fields of the stored object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// A freshly ingested entry has no tags.
    pub fn new(model_id: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            image_path: image_path.into(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// String form of a scalar JSON value, the way the browser client prints
/// it: `12` and `12.0` both become `"12"`, `true` becomes `"true"`.
/// `None` for `null`, arrays and objects.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Older data files sometimes carry numeric identifiers (`"nºModelo": 12`);
/// they are coerced to their string form. `null` is the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        ref other => scalar_to_string(other).unwrap_or_else(|| other.to_string()),
    })
}

/// A tag list; `null` is empty, a bare string is a single tag, and
/// non-scalar items are left out.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::String(tag) => vec![tag],
        _ => Vec::new(),
    })
}

/// Parse a catalog payload.
///
/// Blank content is a valid, empty catalog. Content that is not a JSON
/// array is an error; callers decide whether to degrade it. Array items
/// that are not objects are skipped with a warning, every object is kept.
pub fn decode_catalog(text: &str) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<Value> = serde_json::from_str(text)?;
    let mut entries = Vec::with_capacity(items.len());
    for (pos, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CatalogEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!(position = pos, error = %e, "skipping catalog item"),
        }
    }
    Ok(entries)
}

/// Serialize a catalog with 2-space indentation.
pub fn encode_catalog(entries: &[CatalogEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
