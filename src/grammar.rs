//! COIL grammar constants and the body header syntax.
//!
//! These constants must match bit-for-bit across implementations for
//! interoperability. The header formatter and parser live side by side and
//! must agree on the `sensordata[<count>]{<fields>}` pattern.

/// Marker prefixing every META segment.
pub const META_MARKER: &str = "META&";
/// Marker prefixing every BODY segment.
pub const BODY_MARKER: &str = "BODY|";
/// Separates declarations inside META.
pub const DECL_SEP: char = '&';
/// Separates fields inside a row and field names inside the header.
pub const FIELD_SEP: char = ',';
/// Separates the header and the rows inside BODY.
pub const ROW_SEP: char = '|';
/// Separates key from value in legacy rows, and token from value in `vmap`
/// and `map` declarations.
pub const KV_SEP: char = ':';
/// Separates entries inside `vmap` and `map` declarations.
pub const VMAP_SEP: char = ';';
/// The escape character.
pub const ESCAPE_CHAR: char = '\\';
/// Fixed tag opening the body header.
pub const HEADER_TAG: &str = "sensordata";

/// Renders the body header for `count` records over the given Key Order.
///
/// # Examples
///
/// ```rust
/// let fields = vec!["temp".to_string(), "unit".to_string()];
/// assert_eq!(
///     coil::grammar::format_header(3, &fields),
///     "sensordata[3]{temp,unit}"
/// );
/// ```
pub fn format_header(count: usize, fields: &[String]) -> String {
    format!("{HEADER_TAG}[{count}]{{{}}}", fields.join(","))
}

/// Parses a body header, returning the declared record count and field list.
///
/// Returns `None` when the text does not match the fixed
/// `sensordata[<count>]{<fields>}` pattern. The field list must be non-empty.
///
/// # Examples
///
/// ```rust
/// use coil::grammar::parse_header;
///
/// let (count, fields) = parse_header("sensordata[3]{temp,unit}").unwrap();
/// assert_eq!(count, 3);
/// assert_eq!(fields, ["temp", "unit"]);
///
/// assert!(parse_header("telemetry[3]{temp}").is_none());
/// assert!(parse_header("sensordata[x]{temp}").is_none());
/// ```
pub fn parse_header(header: &str) -> Option<(usize, Vec<String>)> {
    let rest = header.strip_prefix(HEADER_TAG)?;
    let rest = rest.strip_prefix('[')?;
    let (count, rest) = rest.split_once(']')?;
    let count = count.parse::<usize>().ok()?;
    let fields = rest.strip_prefix('{')?.strip_suffix('}')?;
    if fields.is_empty() {
        return None;
    }
    let fields = fields.split(FIELD_SEP).map(str::to_string).collect();
    Some((count, fields))
}
