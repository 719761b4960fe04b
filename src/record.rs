//! The `Record` type and the Key-Order resolver.
//!
//! A [`Record`] is one row's field-name-to-value mapping. It wraps
//! [`IndexMap`] so fields keep a stable order: records reconstructed by the
//! decoder list their fields in Key Order, which makes output deterministic
//! and easy to diff.
//!
//! All values are strings; COIL does not preserve the original value types
//! (numbers and booleans are coerced to their string form on encode).
//!
//! ## Examples
//!
//! ```rust
//! use coil::{key_order, record};
//!
//! let records = vec![
//!     record! {"unit" => "C", "temp" => "21.5"},
//!     record! {"temp" => "19.0", "station" => "north"},
//! ];
//!
//! // Sorted, deduplicated union of all field names.
//! assert_eq!(key_order(&records), ["station", "temp", "unit"]);
//! ```

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// An ordered mapping from field names to string values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(IndexMap<String, String>);

impl Record {
    /// Creates an empty `Record`.
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    /// Creates an empty `Record` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous value if the field existed.
    pub fn insert(&mut self, field: String, value: String) -> Option<String> {
        self.0.insert(field, value)
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&String> {
        self.0.get(field)
    }

    /// Returns `true` if the record has a value for `field`.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.0.values()
    }

    /// Returns an iterator over the `(field, value)` pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Record(IndexMap::from_iter(iter))
    }
}

impl From<&Record> for serde_json::Value {
    fn from(record: &Record) -> Self {
        let mut map = serde_json::Map::with_capacity(record.len());
        for (field, value) in record.iter() {
            map.insert(field.clone(), serde_json::Value::String(value.clone()));
        }
        serde_json::Value::Object(map)
    }
}

/// Derives the canonical Key Order for a record set: the union of all field
/// names, sorted lexicographically and deduplicated.
///
/// Identical field-name sets always yield identical ordering, independent of
/// record iteration order, so the body header and every positional row agree.
#[must_use]
pub fn key_order(records: &[Record]) -> Vec<String> {
    let mut fields = BTreeSet::new();
    for record in records {
        for field in record.keys() {
            fields.insert(field.as_str());
        }
    }
    fields.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_key_order_is_sorted_union() {
        let records = vec![
            record! {"zeta" => "1", "alpha" => "2"},
            record! {"mid" => "3", "alpha" => "4"},
        ];
        assert_eq!(key_order(&records), ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_key_order_independent_of_record_order() {
        let forward = vec![record! {"b" => "1"}, record! {"a" => "2"}];
        let reverse = vec![record! {"a" => "2"}, record! {"b" => "1"}];
        assert_eq!(key_order(&forward), key_order(&reverse));
    }

    #[test]
    fn test_key_order_empty() {
        assert!(key_order(&[]).is_empty());
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let record = record! {"second" => "2", "first" => "1"};
        let fields: Vec<_> = record.keys().cloned().collect();
        assert_eq!(fields, ["second", "first"]);
    }

    #[test]
    fn test_record_to_json() {
        let record = record! {"temp" => "21.5"};
        let json = serde_json::Value::from(&record);
        assert_eq!(json, serde_json::json!({"temp": "21.5"}));
    }
}
