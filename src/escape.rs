//! Reversible character-level escaping for COIL's structural delimiters.
//!
//! Raw values are escaped before they are placed into a row, so the four
//! structural characters (`\`, `:`, `|`, `,`) never appear unescaped inside
//! a value segment. The decoder relies on this: row-format auto-detection
//! and all splitting operate on *unescaped* delimiters only, which keeps
//! `unescape(escape(s)) == s` for every string, including strings containing
//! the escape character itself.
//!
//! ## Examples
//!
//! ```rust
//! use coil::{escape, unescape};
//!
//! assert_eq!(escape("21,5"), "21\\,5");
//! assert_eq!(unescape("21\\,5"), "21,5");
//! assert_eq!(unescape(&escape("a\\b|c:d,e")), "a\\b|c:d,e");
//! ```

use crate::grammar::{ESCAPE_CHAR, FIELD_SEP, KV_SEP, ROW_SEP};

/// Escapes the structural delimiters in a raw value.
///
/// The single pass handles the escape character together with the three
/// separators, so the escape character can never be double-processed.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            ESCAPE_CHAR | KV_SEP | ROW_SEP | FIELD_SEP => {
                out.push(ESCAPE_CHAR);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses [`escape`].
///
/// Any character following the escape character is taken literally. A
/// dangling escape character at the end of input is kept verbatim.
#[must_use]
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE_CHAR {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splits `s` on every unescaped occurrence of `sep`.
///
/// Escaped separators stay inside their segment. Always yields at least one
/// segment; segments are returned still escaped.
///
/// # Examples
///
/// ```rust
/// use coil::escape::split_unescaped;
///
/// assert_eq!(split_unescaped("21\\,5,C", ','), vec!["21\\,5", "C"]);
/// assert_eq!(split_unescaped("", ','), vec![""]);
/// ```
pub fn split_unescaped(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE_CHAR {
            escaped = true;
        } else if ch == sep {
            parts.push(&s[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Splits `s` at the first unescaped occurrence of `sep`, if any.
pub fn split_once_unescaped(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE_CHAR {
            escaped = true;
        } else if ch == sep {
            return Some((&s[..idx], &s[idx + ch.len_utf8()..]));
        }
    }
    None
}

/// Returns `true` when `s` contains an unescaped occurrence of `sep`.
///
/// The decoder uses this to tell legacy `key:value` rows apart from compact
/// positional rows: values always escape `:` before emission, so only legacy
/// separators survive unescaped.
pub fn contains_unescaped(s: &str, sep: char) -> bool {
    let mut escaped = false;
    for ch in s.chars() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE_CHAR {
            escaped = true;
        } else if ch == sep {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_structural_chars() {
        assert_eq!(escape("a,b"), "a\\,b");
        assert_eq!(escape("a|b"), "a\\|b");
        assert_eq!(escape("a:b"), "a\\:b");
        assert_eq!(escape("a\\b"), "a\\\\b");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for raw in ["", "plain", "a,b|c:d", "\\", "\\\\", ",,,", "über|straße"] {
            assert_eq!(unescape(&escape(raw)), raw);
        }
    }

    #[test]
    fn test_unescape_dangling_escape() {
        assert_eq!(unescape("a\\"), "a\\");
    }

    #[test]
    fn test_escaped_output_has_no_unescaped_delimiters() {
        let escaped = escape("a,b|c:d\\e");
        assert!(!contains_unescaped(&escaped, ','));
        assert!(!contains_unescaped(&escaped, '|'));
        assert!(!contains_unescaped(&escaped, ':'));
    }

    #[test]
    fn test_split_unescaped() {
        assert_eq!(split_unescaped("a,b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(split_unescaped("a\\,b,c", ','), vec!["a\\,b", "c"]);
        assert_eq!(split_unescaped("a,,c", ','), vec!["a", "", "c"]);
        assert_eq!(split_unescaped("trailing,", ','), vec!["trailing", ""]);
    }

    #[test]
    fn test_split_once_unescaped() {
        assert_eq!(split_once_unescaped("k:v:w", ':'), Some(("k", "v:w")));
        assert_eq!(split_once_unescaped("k\\:v", ':'), None);
        assert_eq!(split_once_unescaped("k\\:v:w", ':'), Some(("k\\:v", "w")));
    }
}
