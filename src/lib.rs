//! # coil
//!
//! A compact textual codec for flat, record-oriented data, optimized for LLM
//! token efficiency.
//!
//! ## What is COIL?
//!
//! COIL packs a list of key-value records into a META/BODY string pair that
//! costs markedly fewer tokens than the equivalent JSON when embedded in a
//! prompt, while remaining exactly reconstructible to the original record
//! set. It does this with three moves:
//!
//! - **Positional rows**: field names are written once (in the header and
//!   META), rows carry only values aligned to a canonical Key Order
//! - **Value interning**: values repeated across records are swapped for
//!   short `V1`/`V2` tokens, but only when a pluggable token-cost oracle
//!   proves the swap cheaper
//! - **Minimal structure**: four structural characters and a reversible
//!   escape scheme, nothing else
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let payload = json!({
//!     "q": "latest",
//!     "data": {"sensordata": [
//!         {"temp": "21.5", "unit": "C"},
//!         {"temp": "21.5", "unit": "C"},
//!         {"temp": "19.0", "unit": "C"}
//!     ]}
//! });
//!
//! let encoded = coil::encode(&payload).unwrap();
//! let meta = encoded["data"]["meta"].as_str().unwrap();
//! let body = encoded["data"]["body"].as_str().unwrap();
//! assert!(meta.starts_with("META&ORDER=temp,unit"));
//! assert!(body.starts_with("BODY|sensordata[3]{temp,unit}"));
//!
//! let decoded = coil::decode(&encoded).unwrap();
//! assert_eq!(decoded, payload);
//! ```
//!
//! ## Working with Records Directly
//!
//! The segment-level API skips the JSON payload container:
//!
//! ```rust
//! use coil::{record, CoilOptions};
//!
//! let records = vec![
//!     record! {"temp" => "21.5", "unit" => "C"},
//!     record! {"temp" => "19.0", "unit" => "C"},
//! ];
//!
//! let encoded = coil::encode_records(&records, &CoilOptions::new()).unwrap();
//! let back = coil::decode_segments(&encoded.meta, &encoded.body).unwrap();
//! assert_eq!(back, records);
//! ```
//!
//! ## Custom Cost Oracles
//!
//! The optimizer only ever compares two cost integers, so the oracle behind
//! them is swappable per call: back it with a real tokenizer for the model
//! profile you target, or let it fall back to the byte-length heuristic:
//!
//! ```rust
//! use coil::{CoilOptions, FnOracle};
//!
//! let options = CoilOptions::new()
//!     .with_oracle(FnOracle::new(|text: &str| Some((text.len() + 3) / 4)));
//! ```
//!
//! ## Guarantees
//!
//! - `decode(encode(payload))` reconstructs every record, with missing
//!   fields as empty strings
//! - the encoded text never costs more than the baseline (no-substitution)
//!   encoding under the configured oracle
//! - no `unsafe` code, no global state, no background work: each call
//!   allocates and discards its own working structures
//!
//! ## Non-goals
//!
//! COIL is not a general-purpose serialization standard: there is no schema
//! validation, no streaming decode, and no preservation of value types (all
//! values are strings). See the [`spec`] module for the format definition.

pub mod cost;
pub mod dec;
pub mod enc;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod macros;
pub mod options;
pub mod record;
pub mod spec;

mod optimizer;

pub use cost::{heuristic_cost, CostMeter, CostOracle, FnOracle, ProfileRegistry};
pub use enc::Encoded;
pub use error::{Error, Result};
pub use escape::{escape, unescape};
pub use options::{CoilOptions, RowFormat};
pub use record::{key_order, Record};

use serde_json::Value;

/// Encodes a payload's tabular `data` into the COIL META/BODY pair.
///
/// The payload must be a JSON object with a `data` field holding either
/// `{"sensordata": [records...]}`, a bare list of records, or a single-key
/// object wrapping a list. Every other top-level field is carried through
/// unchanged; fields named in the default passthrough set (`q`, `mdu`) are
/// additionally mirrored into META.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
///
/// let payload = json!({"data": {"sensordata": [{"temp": "21.5"}]}});
/// let encoded = coil::encode(&payload).unwrap();
/// assert_eq!(
///     encoded["data"]["body"].as_str().unwrap(),
///     "BODY|sensordata[1]{temp}|21.5"
/// );
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedContainer`] when the payload has no `data`
/// field, and [`Error::UnsupportedRecordShape`] when the dataset cannot be
/// flattened into flat scalar records.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(payload: &Value) -> Result<Value> {
    encode_with_options(payload, CoilOptions::default())
}

/// Encodes a payload with custom [`CoilOptions`].
///
/// # Examples
///
/// ```rust
/// use coil::CoilOptions;
/// use serde_json::json;
///
/// let payload = json!({"data": {"sensordata": [{"temp": "21.5"}]}});
/// let encoded = coil::encode_with_options(&payload, CoilOptions::legacy()).unwrap();
/// assert_eq!(
///     encoded["data"]["body"].as_str().unwrap(),
///     "BODY|sensordata[1]{temp}|temp:21.5"
/// );
/// ```
///
/// # Errors
///
/// Same conditions as [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(payload: &Value, options: CoilOptions) -> Result<Value> {
    enc::encode_payload(payload, &options)
}

/// Encodes a record slice directly into an [`Encoded`] META/BODY pair.
///
/// Token-collision scanning covers the records themselves (field names and
/// values); there is no surrounding payload to scan.
///
/// # Errors
///
/// Never fails for well-formed records; the `Result` mirrors the payload
/// API.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_records(records: &[Record], options: &CoilOptions) -> Result<Encoded> {
    let json_records: Vec<Value> = records.iter().map(Value::from).collect();
    let payload_text = serde_json::to_string(&json_records)
        .map_err(Error::custom)?
        .to_lowercase();
    Ok(enc::encode_parts(records, &payload_text, &[], options))
}

/// Decodes an encoded payload back into `{"sensordata": [records...]}`.
///
/// The row format is auto-detected per row; no options are needed. A payload
/// whose `data` is already decoded (or anything else that is not a
/// `{"meta", "body"}` object) is rejected as [`Error::MalformedContainer`];
/// decode is not idempotent by design.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
///
/// let payload = json!({"data": {"sensordata": [{"temp": "21.5", "unit": "C"}]}});
/// let encoded = coil::encode(&payload).unwrap();
/// let decoded = coil::decode(&encoded).unwrap();
/// assert_eq!(decoded, payload);
///
/// // Decoding an already-decoded payload fails.
/// assert!(coil::decode(&decoded).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedContainer`] for a missing/wrong-typed
/// `data`/`meta`/`body` or a missing marker, and [`Error::MalformedHeader`]
/// when the body header does not match the fixed pattern.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(payload: &Value) -> Result<Value> {
    dec::decode_payload(payload)
}

/// Decodes a META/BODY string pair into records.
///
/// # Examples
///
/// ```rust
/// let records = coil::decode_segments(
///     "META&ORDER=temp,unit",
///     "BODY|sensordata[1]{temp,unit}|21.5,C",
/// )
/// .unwrap();
/// assert_eq!(records, vec![coil::record! {"temp" => "21.5", "unit" => "C"}]);
/// ```
///
/// # Errors
///
/// Same marker and header conditions as [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_segments(meta: &str, body: &str) -> Result<Vec<Record>> {
    dec::decode_segments(meta, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use serde_json::json;

    #[test]
    fn test_encode_decode_payload() {
        let payload = json!({
            "data": {"sensordata": [
                {"temp": "21.5", "unit": "C"},
                {"temp": "19.0", "unit": "C"}
            ]}
        });
        let encoded = encode(&payload).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_encode_decode_records() {
        let records = vec![
            record! {"temp" => "21.5", "unit" => "C"},
            record! {"temp" => "19.0", "unit" => "C"},
        ];
        let encoded = encode_records(&records, &CoilOptions::new()).unwrap();
        let back = decode_segments(&encoded.meta, &encoded.body).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_legacy_roundtrip() {
        let records = vec![record! {"temp" => "21.5", "unit" => "C"}];
        let encoded = encode_records(&records, &CoilOptions::legacy()).unwrap();
        assert!(encoded.meta.starts_with("META&map="));
        let back = decode_segments(&encoded.meta, &encoded.body).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_missing_data_rejected_by_both_directions() {
        let payload = json!({"q": "latest"});
        assert!(matches!(
            encode(&payload).unwrap_err(),
            Error::MalformedContainer(_)
        ));
        assert!(matches!(
            decode(&payload).unwrap_err(),
            Error::MalformedContainer(_)
        ));
    }

    #[test]
    fn test_decode_of_decoded_payload_rejected() {
        let payload = json!({"data": {"sensordata": [{"temp": "21.5"}]}});
        assert!(matches!(
            decode(&payload).unwrap_err(),
            Error::MalformedContainer(_)
        ));
    }
}
