/// Builds a [`Record`](crate::Record) from `field => value` pairs.
///
/// Both sides accept anything with a `to_string()`; fields keep the order
/// they are written in.
///
/// # Examples
///
/// ```rust
/// use coil::record;
///
/// let reading = record! {"temp" => "21.5", "unit" => "C"};
/// assert_eq!(reading.get("temp").unwrap(), "21.5");
/// assert_eq!(reading.len(), 2);
///
/// let empty = record! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };

    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($field.to_string(), $value.to_string());
        )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use crate::Record;

    #[test]
    fn test_record_macro_empty() {
        assert_eq!(record! {}, Record::new());
    }

    #[test]
    fn test_record_macro_fields() {
        let record = record! {"temp" => "21.5", "unit" => "C"};
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("temp").map(String::as_str), Some("21.5"));
        assert_eq!(record.get("unit").map(String::as_str), Some("C"));
    }

    #[test]
    fn test_record_macro_trailing_comma_and_non_strings() {
        let record = record! {"count" => 3, "active" => true,};
        assert_eq!(record.get("count").map(String::as_str), Some("3"));
        assert_eq!(record.get("active").map(String::as_str), Some("true"));
    }
}
