// Document value model shared by every store backend

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A single field value inside a document.
///
/// `ServerTimestamp` is a sentinel: the store replaces it with its own commit
/// time, so it never travels as a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    GeoPoint(GeoPoint),
    Array(Vec<FieldValue>),
    Map(Document),
    ServerTimestamp,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        FieldValue::GeoPoint(value)
    }
}

impl From<Document> for FieldValue {
    fn from(value: Document) -> Self {
        FieldValue::Map(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl FieldValue {
    // Firestore REST "Value" encoding
    fn to_wire(&self) -> Value {
        match self {
            // int64 travels as a decimal string
            FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            FieldValue::Double(d) => json!({ "doubleValue": encode_double(*d) }),
            FieldValue::String(s) => json!({ "stringValue": s }),
            FieldValue::Timestamp(ts) => {
                json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
            }
            FieldValue::GeoPoint(p) => json!({
                "geoPointValue": { "latitude": p.latitude, "longitude": p.longitude }
            }),
            FieldValue::Array(values) => json!({
                "arrayValue": { "values": values.iter().map(FieldValue::to_wire).collect::<Vec<_>>() }
            }),
            FieldValue::Map(doc) => json!({ "mapValue": { "fields": doc.to_wire_fields() } }),
            // Never encoded: path-addressable sentinels become field transforms,
            // array sentinels are rejected before a write is built
            FieldValue::ServerTimestamp => Value::Null,
        }
    }

    fn to_plain(&self) -> Value {
        match self {
            FieldValue::Integer(i) => json!(i),
            FieldValue::Double(d) => json!(d),
            FieldValue::String(s) => json!(s),
            FieldValue::Timestamp(ts) => json!(ts.to_rfc3339()),
            FieldValue::GeoPoint(p) => json!({ "latitude": p.latitude, "longitude": p.longitude }),
            FieldValue::Array(values) => Value::Array(values.iter().map(FieldValue::to_plain).collect()),
            FieldValue::Map(doc) => doc.to_plain_json(),
            FieldValue::ServerTimestamp => json!("<server timestamp>"),
        }
    }

    fn contains_server_timestamp(&self) -> bool {
        match self {
            FieldValue::ServerTimestamp => true,
            FieldValue::Array(values) => values.iter().any(FieldValue::contains_server_timestamp),
            FieldValue::Map(doc) => doc
                .fields
                .values()
                .any(FieldValue::contains_server_timestamp),
            _ => false,
        }
    }

    fn resolve(&self, now: DateTime<Utc>) -> FieldValue {
        match self {
            FieldValue::ServerTimestamp => FieldValue::Timestamp(now),
            FieldValue::Array(values) => {
                FieldValue::Array(values.iter().map(|v| v.resolve(now)).collect())
            }
            FieldValue::Map(doc) => FieldValue::Map(doc.resolve_server_timestamps(now)),
            other => other.clone(),
        }
    }
}

/// An ordered set of named fields, the unit every store write takes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Convenience accessor for string fields
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Dotted field paths of every server timestamp sentinel, including nested maps.
    /// Sentinels inside arrays are not addressable by path and are not reported;
    /// see `array_timestamp_path`.
    pub fn server_timestamp_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_timestamp_paths("", &mut paths);
        paths
    }

    /// Path of the first field holding a server timestamp anywhere inside an array
    pub fn array_timestamp_path(&self) -> Option<String> {
        self.fields.iter().find_map(|(name, value)| {
            let segment = quote_field_name(name);
            match value {
                FieldValue::Array(values) if values.iter().any(FieldValue::contains_server_timestamp) => {
                    Some(segment)
                }
                FieldValue::Map(nested) => nested
                    .array_timestamp_path()
                    .map(|rest| format!("{}.{}", segment, rest)),
                _ => None,
            }
        })
    }

    fn collect_timestamp_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, value) in &self.fields {
            let segment = quote_field_name(name);
            let path = if prefix.is_empty() {
                segment
            } else {
                format!("{}.{}", prefix, segment)
            };
            match value {
                FieldValue::ServerTimestamp => out.push(path),
                FieldValue::Map(nested) => nested.collect_timestamp_paths(&path, out),
                _ => {}
            }
        }
    }

    /// Encode as a Firestore `fields` object, leaving out server timestamp sentinels
    pub fn to_wire_fields(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            if matches!(value, FieldValue::ServerTimestamp) {
                continue;
            }
            map.insert(name.clone(), value.to_wire());
        }
        Value::Object(map)
    }

    /// Plain JSON rendering for console output
    pub fn to_plain_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_plain()))
                .collect(),
        )
    }

    /// Copy of this document with every server timestamp sentinel set to `now`
    pub fn resolve_server_timestamps(&self, now: DateTime<Utc>) -> Document {
        Document {
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), value.resolve(now)))
                .collect(),
        }
    }
}

// JSON has no NaN or infinities; the REST API takes these spellings instead
fn encode_double(d: f64) -> Value {
    if d.is_nan() {
        json!("NaN")
    } else if d == f64::INFINITY {
        json!("Infinity")
    } else if d == f64::NEG_INFINITY {
        json!("-Infinity")
    } else {
        json!(d)
    }
}

// Simple names pass through, anything else is backtick-quoted
fn quote_field_name(name: &str) -> String {
    let mut chars = name.chars();
    let simple = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
