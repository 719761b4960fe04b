//! COIL Format Specification
//!
//! This module documents the COIL format as implemented by this library.
//!
//! # Overview
//!
//! COIL is a compact textual encoding for flat, record-oriented data (sensor
//! readings and similar tabular payloads), designed to minimize the number of
//! tokens a language-model tokenizer consumes when the encoded text is
//! embedded in a prompt, while remaining exactly reconstructible to the
//! original record set.
//!
//! An encoded payload replaces its `data` field with two strings:
//!
//! ```text
//! META&ORDER=temp,unit&vmap=V1:21.5
//! BODY|sensordata[3]{temp,unit}|V1,C|V1,C|19.0,C
//! ```
//!
//! # Grammar Constants
//!
//! These must match bit-for-bit across implementations:
//!
//! | Element | Value |
//! |---------|-------|
//! | META marker | `META&` |
//! | BODY marker | `BODY\|` |
//! | Declaration separator | `&` |
//! | Field separator | `,` |
//! | Row separator | `\|` |
//! | Key/value separator | `:` |
//! | vmap/map entry separator | `;` |
//! | Escape character | `\` |
//! | Header pattern | `sensordata[<count>]{<fields>}` |
//!
//! # META Segment
//!
//! Ampersand-separated `name=value` declarations after the marker:
//!
//! - `ORDER=<k1>,<k2>,...`: the Key Order (compact mode): the sorted,
//!   deduplicated union of all field names in the dataset.
//! - `map=<short>:<long>;...`: key remapping (legacy mode). The encoder
//!   always writes the identity mapping; the decoder accepts arbitrary ones.
//! - `vmap=<token>:<value>;...`: value-token substitutions, present only
//!   when the optimizer accepted at least one. Values appear verbatim, which
//!   is why values containing `&` or `;` are never interned.
//! - Any other declaration (e.g. passthrough scalars such as `q=...`) is
//!   informational; decoders ignore it.
//!
//! # BODY Segment
//!
//! A pipe-separated sequence after the marker: the header, then one row per
//! record.
//!
//! ## Header
//!
//! `sensordata[<count>]{<k1>,<k2>,...}`: record count and the Key Order.
//! The field list mirrors the META `ORDER` declaration; the count is
//! informational and not enforced against the actual row count.
//!
//! ## Compact rows (default)
//!
//! The escaped (or token-substituted) value for each field in Key Order,
//! comma-joined. Missing fields render as the empty value:
//!
//! ```text
//! sensordata[2]{station,temp,unit}|north,21.5,C|,19.0,C
//! ```
//!
//! ## Legacy rows
//!
//! Comma-joined `<field>:<value>` pairs, where `<field>` is the (possibly
//! remapped) short key:
//!
//! ```text
//! sensordata[1]{temp,unit}|temp:21.5,unit:C
//! ```
//!
//! ## Row-format auto-detection
//!
//! A row containing an *unescaped* `:` is legacy tagged; anything else is
//! compact positional. Values always escape `:` before emission, so the
//! detection is unambiguous.
//!
//! # Escaping
//!
//! `\`, `:`, `|` and `,` are escaped with a leading `\` inside every raw
//! value before it is placed into a row. `unescape(escape(s)) == s` holds for
//! all strings. Values resolved through the value-token map are tokens, never
//! escaped text, and are emitted as-is.
//!
//! # Value Interning
//!
//! Values repeated at least `min_value_freq` times (default 2) are candidates
//! for substitution behind short tokens `V1`, `V2`, ... Candidates are ranked
//! by estimated benefit (`frequency × length`, descending; ties keep
//! first-seen order) and accepted greedily: a substitution is kept only when
//! rebuilding META + BODY with it measures strictly cheaper under the cost
//! oracle. A token never collides, as a case-insensitive whole word, with
//! text already present in the payload or with another assigned token;
//! numeric suffixes (`V11`, `V12`, ...) are appended until it is free.
//!
//! # Cost Model
//!
//! Cost is an opaque integer `>= 1` supplied by a pluggable oracle; when no
//! oracle is configured or the configured one is unavailable, the
//! deterministic heuristic `max(1, ceil(len/4))` is used. The optimizer only
//! compares integers and never learns which backend produced them.
//!
//! # Edge Cases
//!
//! - A dataset whose records never repeat a value encodes with no `vmap`
//!   declaration at all, byte-identical to never running the optimizer.
//! - Rows shorter than the Key Order decode with empty strings for the
//!   missing trailing fields; decode does not distinguish a missing field
//!   from an empty one.
//! - Blank rows are skipped, so a trailing row separator is harmless.
//! - Legacy chunks without an unescaped `:` are skipped.
//!
//! # Limitations
//!
//! - Field names must not contain the structural delimiters; they are
//!   written unescaped into the header and META declarations.
//! - All values are strings. Numbers, booleans and nulls are coerced to
//!   their string form on encode (`21.5`, `true`, ``) and stay strings on
//!   decode.
//! - The header requires at least one field, so an empty dataset (or one
//!   whose records have no fields) does not round-trip.
//! - Records are flat; nested containers are rejected as
//!   `UnsupportedRecordShape`.

// This module contains only documentation; no implementation code
