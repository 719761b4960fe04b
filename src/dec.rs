//! COIL decoding.
//!
//! Decoding runs in two phases. Phase 1 parses META: the marker is
//! verified, declarations are split on `&`, and `ORDER`/`map`/`vmap` are
//! collected; unknown declarations (including passthrough scalars) are
//! informational and ignored. Phase 2 parses BODY: the marker is verified,
//! the header is matched against the fixed pattern, and each row is decoded
//! according to its auto-detected format: a row containing an unescaped
//! `:` is legacy tagged, anything else is compact positional. Values are
//! resolved through the value-token map when the raw segment matches an
//! entry, and unescaped otherwise.
//!
//! ```rust
//! let records = coil::decode_segments(
//!     "META&ORDER=temp,unit",
//!     "BODY|sensordata[1]{temp,unit}|21.5,C",
//! )
//! .unwrap();
//! assert_eq!(records, vec![coil::record! {"temp" => "21.5", "unit" => "C"}]);
//! ```

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::escape::{contains_unescaped, split_once_unescaped, split_unescaped, unescape};
use crate::grammar::{parse_header, BODY_MARKER, DECL_SEP, FIELD_SEP, KV_SEP, META_MARKER, ROW_SEP, VMAP_SEP};
use crate::record::Record;

/// The declarations extracted from a META segment.
#[derive(Debug, Default)]
struct ParsedMeta {
    /// `ORDER=` declaration (compact mode).
    key_order: Option<Vec<String>>,
    /// `map=` declaration (legacy mode), short key -> long field name.
    key_map: Option<IndexMap<String, String>>,
    /// `vmap=` declaration, token -> full value.
    vmap: IndexMap<String, String>,
}

/// Decodes a full JSON payload, replacing its `data` field with the
/// reconstructed `{"sensordata": [...]}` and leaving every other top-level
/// field untouched.
pub(crate) fn decode_payload(payload: &JsonValue) -> Result<JsonValue> {
    let root = payload
        .as_object()
        .ok_or_else(|| Error::malformed_container("payload must be a JSON object"))?;
    let data = root
        .get("data")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| Error::malformed_container("payload `data` must be an object"))?;
    let meta = data
        .get("meta")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::malformed_container("`data.meta` must be a string"))?;
    let body = data
        .get("body")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::malformed_container("`data.body` must be a string"))?;

    let records = decode_segments(meta, body)?;
    let sensordata: Vec<JsonValue> = records.iter().map(JsonValue::from).collect();

    let mut out = root.clone();
    out.insert(
        "data".to_string(),
        serde_json::json!({ "sensordata": sensordata }),
    );
    Ok(JsonValue::Object(out))
}

/// Decodes a META/BODY pair into records.
pub(crate) fn decode_segments(meta: &str, body: &str) -> Result<Vec<Record>> {
    let parsed = parse_meta(meta)?;

    let rest = body
        .strip_prefix(BODY_MARKER)
        .ok_or_else(|| Error::malformed_container("body segment is missing the BODY| marker"))?;
    let mut rows = split_unescaped(rest, ROW_SEP).into_iter();
    let header = rows.next().unwrap_or("");
    let (_declared_count, header_fields) =
        parse_header(header).ok_or_else(|| Error::malformed_header(header))?;
    // The encoder serializes the same Key Order into both places; the META
    // declaration wins when present.
    let fields = parsed.key_order.clone().unwrap_or(header_fields);

    let mut records = Vec::new();
    for row in rows {
        if row.trim().is_empty() {
            continue;
        }
        let record = if contains_unescaped(row, KV_SEP) {
            parse_legacy_row(row, &parsed)
        } else {
            parse_compact_row(row, &fields, &parsed)
        };
        records.push(record);
    }
    Ok(records)
}

fn parse_meta(meta: &str) -> Result<ParsedMeta> {
    let rest = meta
        .strip_prefix(META_MARKER)
        .ok_or_else(|| Error::malformed_container("meta segment is missing the META& marker"))?;

    let mut parsed = ParsedMeta::default();
    for decl in rest.split(DECL_SEP) {
        let Some((name, value)) = decl.split_once('=') else {
            continue;
        };
        match name {
            "ORDER" if !value.is_empty() => {
                parsed.key_order = Some(value.split(FIELD_SEP).map(str::to_string).collect());
            }
            "map" => {
                let mut key_map = IndexMap::new();
                for entry in value.split(VMAP_SEP) {
                    if let Some((short, long)) = entry.split_once(KV_SEP) {
                        key_map.insert(short.to_string(), long.to_string());
                    }
                }
                parsed.key_map = Some(key_map);
            }
            "vmap" => {
                for entry in value.split(VMAP_SEP) {
                    if let Some((token, value)) = entry.split_once(KV_SEP) {
                        parsed.vmap.insert(token.to_string(), value.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    Ok(parsed)
}

/// Positional row: unescaped-split on the field separator, zipped with the
/// Key Order. Missing trailing values default to the empty string.
fn parse_compact_row(row: &str, fields: &[String], parsed: &ParsedMeta) -> Record {
    let values = split_unescaped(row, FIELD_SEP);
    let mut record = Record::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let raw = values.get(i).copied().unwrap_or("");
        record.insert(field.clone(), resolve_value(raw, &parsed.vmap));
    }
    record
}

/// Tagged row: each chunk is `key:value`; chunks without an unescaped `:`
/// are skipped. Keys are resolved through the key map when one was supplied.
fn parse_legacy_row(row: &str, parsed: &ParsedMeta) -> Record {
    let mut record = Record::new();
    for chunk in split_unescaped(row, FIELD_SEP) {
        let Some((short, raw)) = split_once_unescaped(chunk, KV_SEP) else {
            continue;
        };
        let field = parsed
            .key_map
            .as_ref()
            .and_then(|map| map.get(short))
            .map(String::as_str)
            .unwrap_or(short);
        record.insert(field.to_string(), resolve_value(raw, &parsed.vmap));
    }
    record
}

fn resolve_value(raw: &str, vmap: &IndexMap<String, String>) -> String {
    match vmap.get(raw) {
        Some(value) => value.clone(),
        None => unescape(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_decode_compact_rows() {
        let records = decode_segments(
            "META&ORDER=temp,unit",
            "BODY|sensordata[2]{temp,unit}|21.5,C|19.0,C",
        )
        .unwrap();
        assert_eq!(
            records,
            vec![
                record! {"temp" => "21.5", "unit" => "C"},
                record! {"temp" => "19.0", "unit" => "C"},
            ]
        );
    }

    #[test]
    fn test_decode_resolves_vmap_tokens() {
        let records = decode_segments(
            "META&ORDER=temp,unit&vmap=V1:21.5",
            "BODY|sensordata[2]{temp,unit}|V1,C|V1,F",
        )
        .unwrap();
        assert_eq!(records[0], record! {"temp" => "21.5", "unit" => "C"});
        assert_eq!(records[1], record! {"temp" => "21.5", "unit" => "F"});
    }

    #[test]
    fn test_decode_legacy_with_key_remap() {
        let records = decode_segments(
            "META&map=t:temperature;u:unit",
            "BODY|sensordata[1]{t,u}|t:21.5,u:C",
        )
        .unwrap();
        assert_eq!(records, vec![record! {"temperature" => "21.5", "unit" => "C"}]);
    }

    #[test]
    fn test_decode_short_row_defaults_to_empty() {
        let records = decode_segments(
            "META&ORDER=a,b,c",
            "BODY|sensordata[1]{a,b,c}|only",
        )
        .unwrap();
        assert_eq!(records, vec![record! {"a" => "only", "b" => "", "c" => ""}]);
    }

    #[test]
    fn test_decode_skips_blank_rows() {
        let records = decode_segments(
            "META&ORDER=a,b",
            "BODY|sensordata[1]{a,b}|1,2|| ",
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_decode_unescapes_values() {
        let records = decode_segments(
            "META&ORDER=temp,unit",
            "BODY|sensordata[1]{temp,unit}|21\\,5,C",
        )
        .unwrap();
        assert_eq!(records, vec![record! {"temp" => "21,5", "unit" => "C"}]);
    }

    #[test]
    fn test_escaped_colon_stays_compact() {
        // An escaped `:` inside a value must not trigger legacy detection.
        let records = decode_segments(
            "META&ORDER=note,unit",
            "BODY|sensordata[1]{note,unit}|a\\:b,C",
        )
        .unwrap();
        assert_eq!(records, vec![record! {"note" => "a:b", "unit" => "C"}]);
    }

    #[test]
    fn test_missing_markers_are_malformed_container() {
        let err = decode_segments("ORDER=a", "BODY|sensordata[0]{a}").unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
        let err = decode_segments("META&ORDER=a", "sensordata[0]{a}").unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_bad_header_is_malformed_header() {
        let err = decode_segments("META&ORDER=a", "BODY|telemetry[1]{a}|x").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn test_unknown_meta_declarations_ignored() {
        let records = decode_segments(
            "META&ORDER=a&q=latest&mdu=7&future=stuff",
            "BODY|sensordata[1]{a}|x",
        )
        .unwrap();
        assert_eq!(records, vec![record! {"a" => "x"}]);
    }
}
