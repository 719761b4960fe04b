//! COIL encoding.
//!
//! The encoder turns a JSON payload carrying tabular records into the
//! META/BODY string pair:
//!
//! 1. unwrap the `data` container and coerce every record to string values,
//! 2. resolve the Key Order,
//! 3. build the baseline body and meta for the configured row format,
//! 4. let the [`optimizer`](crate::optimizer) intern repeated values where
//!    that provably lowers the measured token cost,
//! 5. append the `vmap` and passthrough declarations and emit both segments.
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_json::json;
//!
//! let payload = json!({
//!     "data": {"sensordata": [
//!         {"temp": "21.5", "unit": "C"},
//!         {"temp": "19.0", "unit": "C"}
//!     ]}
//! });
//!
//! let encoded = coil::encode(&payload).unwrap();
//! assert!(encoded["data"]["meta"].as_str().unwrap().starts_with("META&"));
//! assert!(encoded["data"]["body"].as_str().unwrap().starts_with("BODY|"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::escape::escape;
use crate::grammar::{format_header, BODY_MARKER, DECL_SEP, FIELD_SEP, KV_SEP, META_MARKER, ROW_SEP, VMAP_SEP};
use crate::options::{CoilOptions, RowFormat};
use crate::optimizer;
use crate::record::{key_order, Record};

/// The META/BODY string pair produced by the encoder.
///
/// Serializes as the `{"meta": ..., "body": ...}` object that replaces the
/// payload's `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoded {
    pub meta: String,
    pub body: String,
}

/// Encodes a full JSON payload, replacing its `data` field with the
/// META/BODY pair and leaving every other top-level field untouched.
pub(crate) fn encode_payload(payload: &JsonValue, options: &CoilOptions) -> Result<JsonValue> {
    let root = payload
        .as_object()
        .ok_or_else(|| Error::malformed_container("payload must be a JSON object"))?;
    let data = root
        .get("data")
        .ok_or_else(|| Error::malformed_container("payload is missing the `data` field"))?;

    let records = coerce_dataset(data)?;
    // Token collisions are checked against the full payload text, so a word
    // anywhere in the input (keys, values, extras) blocks the token.
    let payload_text = serde_json::to_string(payload)
        .map_err(Error::custom)?
        .to_lowercase();
    let passthrough = collect_passthrough(root, &options.passthrough);
    let encoded = encode_parts(&records, &payload_text, &passthrough, options);

    let mut out = root.clone();
    out.insert(
        "data".to_string(),
        serde_json::to_value(&encoded).map_err(Error::custom)?,
    );
    Ok(JsonValue::Object(out))
}

/// Runs the optimizer and assembles the final META/BODY pair.
pub(crate) fn encode_parts(
    records: &[Record],
    payload_text: &str,
    passthrough: &[(String, String)],
    options: &CoilOptions,
) -> Encoded {
    let fields = key_order(records);
    let optimized = optimizer::optimize(records, &fields, payload_text, options);
    Encoded {
        meta: build_meta(&fields, &options.row_format, &optimized.table, passthrough),
        body: format!("{BODY_MARKER}{}", optimized.body),
    }
}

/// Renders the body (without its marker): the header followed by one row per
/// record, in either compact positional or legacy tagged form.
///
/// Pure function of the records, the Key Order, and the substitution table.
/// Missing fields render as the empty value; interned values are replaced by
/// their token, all others are escaped.
pub(crate) fn build_body(
    records: &[Record],
    fields: &[String],
    row_format: &RowFormat,
    table: &IndexMap<String, String>,
) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(format_header(records.len(), fields));
    for record in records {
        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let value = record.get(field).map(String::as_str).unwrap_or("");
            let rendered = match table.get(value) {
                Some(token) => token.clone(),
                None => escape(value),
            };
            match row_format {
                RowFormat::Compact => parts.push(rendered),
                RowFormat::Legacy => parts.push(format!("{field}{KV_SEP}{rendered}")),
            }
        }
        rows.push(parts.join(&FIELD_SEP.to_string()));
    }
    rows.join(&ROW_SEP.to_string())
}

/// Assembles the marker-prefixed META segment: the ordering/key-map
/// declaration, the `vmap` declaration when the table is non-empty, and any
/// passthrough declarations, in that order.
///
/// Passthrough values are declared verbatim; they are assumed scalar-safe
/// and are never escaped.
pub(crate) fn build_meta(
    fields: &[String],
    row_format: &RowFormat,
    table: &IndexMap<String, String>,
    passthrough: &[(String, String)],
) -> String {
    let mut decls = Vec::new();
    match row_format {
        RowFormat::Compact => decls.push(format!("ORDER={}", fields.join(","))),
        RowFormat::Legacy => {
            // The encoder always writes the identity key map; the decoder
            // accepts arbitrary mappings.
            let entries: Vec<String> = fields
                .iter()
                .map(|field| format!("{field}{KV_SEP}{field}"))
                .collect();
            decls.push(format!("map={}", entries.join(&VMAP_SEP.to_string())));
        }
    }
    if !table.is_empty() {
        let entries: Vec<String> = table
            .iter()
            .map(|(value, token)| format!("{token}{KV_SEP}{value}"))
            .collect();
        decls.push(format!("vmap={}", entries.join(&VMAP_SEP.to_string())));
    }
    for (name, value) in passthrough {
        decls.push(format!("{name}={value}"));
    }
    format!("{META_MARKER}{}", decls.join(&DECL_SEP.to_string()))
}

/// Unwraps the `data` container down to a list of records.
///
/// Accepts `{"sensordata": [...]}`, a bare list, or a single-key object
/// whose sole value is a list.
pub(crate) fn coerce_dataset(data: &JsonValue) -> Result<Vec<Record>> {
    let dataset = match data.as_object() {
        Some(map) if map.contains_key("sensordata") => &map["sensordata"],
        _ => data,
    };
    flatten_records(dataset)
}

fn flatten_records(value: &JsonValue) -> Result<Vec<Record>> {
    if let Some(list) = value.as_array() {
        return list.iter().map(record_from_json).collect();
    }
    if let Some(map) = value.as_object() {
        if map.len() == 1 {
            if let Some(list) = map.values().next().and_then(JsonValue::as_array) {
                return list.iter().map(record_from_json).collect();
            }
        }
    }
    Err(Error::unsupported_record_shape(
        "expected a list of records or a single-key wrapper around one",
    ))
}

fn record_from_json(value: &JsonValue) -> Result<Record> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::unsupported_record_shape("each record must be a flat object"))?;
    let mut record = Record::with_capacity(map.len());
    for (field, value) in map {
        record.insert(field.clone(), scalar_to_string(value)?);
    }
    Ok(record)
}

fn scalar_to_string(value: &JsonValue) -> Result<String> {
    match value {
        JsonValue::Null => Ok(String::new()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::unsupported_record_shape(
            "record values must be scalars",
        )),
    }
}

/// Picks the configured passthrough fields off the payload root. Only JSON
/// scalars are declared; containers are skipped.
fn collect_passthrough(
    root: &serde_json::Map<String, JsonValue>,
    names: &[String],
) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for name in names {
        if let Some(value) = root.get(name) {
            let decl = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                _ => continue,
            };
            out.push((name.clone(), decl));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use serde_json::json;

    fn no_subs() -> IndexMap<String, String> {
        IndexMap::new()
    }

    #[test]
    fn test_build_body_compact() {
        let records = vec![
            record! {"temp" => "21.5", "unit" => "C"},
            record! {"temp" => "19.0", "unit" => "C"},
        ];
        let fields = key_order(&records);
        let body = build_body(&records, &fields, &RowFormat::Compact, &no_subs());
        assert_eq!(body, "sensordata[2]{temp,unit}|21.5,C|19.0,C");
    }

    #[test]
    fn test_build_body_legacy() {
        let records = vec![record! {"temp" => "21.5", "unit" => "C"}];
        let fields = key_order(&records);
        let body = build_body(&records, &fields, &RowFormat::Legacy, &no_subs());
        assert_eq!(body, "sensordata[1]{temp,unit}|temp:21.5,unit:C");
    }

    #[test]
    fn test_build_body_missing_field_renders_empty() {
        let records = vec![record! {"temp" => "21.5"}, record! {"unit" => "C"}];
        let fields = key_order(&records);
        let body = build_body(&records, &fields, &RowFormat::Compact, &no_subs());
        assert_eq!(body, "sensordata[2]{temp,unit}|21.5,|,C");
    }

    #[test]
    fn test_build_body_escapes_values() {
        let records = vec![record! {"temp" => "21,5", "note" => "a|b:c"}];
        let fields = key_order(&records);
        let body = build_body(&records, &fields, &RowFormat::Compact, &no_subs());
        assert_eq!(body, "sensordata[1]{note,temp}|a\\|b\\:c,21\\,5");
    }

    #[test]
    fn test_build_body_substitutes_tokens() {
        let records = vec![
            record! {"temp" => "21.5", "unit" => "C"},
            record! {"temp" => "19.0", "unit" => "C"},
        ];
        let fields = key_order(&records);
        let mut table = IndexMap::new();
        table.insert("C".to_string(), "V1".to_string());
        let body = build_body(&records, &fields, &RowFormat::Compact, &table);
        assert_eq!(body, "sensordata[2]{temp,unit}|21.5,V1|19.0,V1");
    }

    #[test]
    fn test_build_meta_compact_with_vmap_and_passthrough() {
        let fields = vec!["temp".to_string(), "unit".to_string()];
        let mut table = IndexMap::new();
        table.insert("21.5".to_string(), "V1".to_string());
        let passthrough = vec![("q".to_string(), "latest".to_string())];
        let meta = build_meta(&fields, &RowFormat::Compact, &table, &passthrough);
        assert_eq!(meta, "META&ORDER=temp,unit&vmap=V1:21.5&q=latest");
    }

    #[test]
    fn test_build_meta_legacy_identity_map() {
        let fields = vec!["temp".to_string(), "unit".to_string()];
        let meta = build_meta(&fields, &RowFormat::Legacy, &no_subs(), &[]);
        assert_eq!(meta, "META&map=temp:temp;unit:unit");
    }

    #[test]
    fn test_coerce_dataset_shapes() {
        let wrapped = json!({"sensordata": [{"a": "1"}]});
        let bare = json!([{"a": "1"}]);
        let single_key = json!({"readings": [{"a": "1"}]});
        for data in [wrapped, bare, single_key] {
            let records = coerce_dataset(&data).unwrap();
            assert_eq!(records, vec![record! {"a" => "1"}]);
        }
    }

    #[test]
    fn test_coerce_dataset_rejects_bad_shapes() {
        assert!(coerce_dataset(&json!("text")).is_err());
        assert!(coerce_dataset(&json!({"a": 1, "b": 2})).is_err());
        assert!(coerce_dataset(&json!({"sensordata": [["not", "a", "record"]]})).is_err());
        assert!(coerce_dataset(&json!({"sensordata": [{"nested": {"x": 1}}]})).is_err());
    }

    #[test]
    fn test_scalar_coercion() {
        let records = coerce_dataset(&json!({"sensordata": [
            {"n": 21.5, "b": true, "missing": null, "s": "text"}
        ]}))
        .unwrap();
        assert_eq!(
            records[0],
            record! {"n" => "21.5", "b" => "true", "missing" => "", "s" => "text"}
        );
    }
}
