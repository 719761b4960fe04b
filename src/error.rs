//! Error types for COIL encoding and decoding.
//!
//! All fatal conditions abort the current call with no partial output:
//! callers can treat `encode`/`decode` as all-or-nothing. Cost-oracle
//! unavailability is deliberately *not* represented here: the
//! [`CostMeter`](crate::cost::CostMeter) handles it locally with the
//! byte-length fallback and never surfaces it to the caller.
//!
//! ## Error Categories
//!
//! - **MalformedContainer**: the payload lacks a usable `data`/`meta`/`body`
//! - **MalformedHeader**: the body header does not match the fixed
//!   `sensordata[<count>]{<fields>}` pattern
//! - **UnsupportedRecordShape**: a record is not a flat scalar mapping, or
//!   the dataset is neither a list nor a single-key wrapper around one
//!
//! ## Examples
//!
//! ```rust
//! use serde_json::json;
//!
//! // A payload without a `data` field is rejected by encode and decode.
//! let payload = json!({"q": "latest"});
//! assert!(coil::encode(&payload).is_err());
//! assert!(coil::decode(&payload).is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during COIL encoding/decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The payload container is missing a `data` field, or `data`/`meta`/`body`
    /// has the wrong type or marker.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The body header does not match `sensordata[<count>]{{<fields>}}`.
    #[error("malformed body header: {0:?}")]
    MalformedHeader(String),

    /// A record is not a flat mapping of field names to scalar values, or the
    /// dataset is neither a list of records nor a single-key wrapper around one.
    #[error("unsupported record shape: {0}")]
    UnsupportedRecordShape(String),

    /// Generic message.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a container error for a missing or wrong-typed `data`/`meta`/`body`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::Error;
    ///
    /// let err = Error::malformed_container("payload is missing the `data` field");
    /// assert!(err.to_string().contains("malformed container"));
    /// ```
    pub fn malformed_container(msg: &str) -> Self {
        Error::MalformedContainer(msg.to_string())
    }

    /// Creates a header error carrying the header text that failed to parse.
    pub fn malformed_header(header: &str) -> Self {
        Error::MalformedHeader(header.to_string())
    }

    /// Creates a record-shape error for datasets the codec cannot flatten.
    pub fn unsupported_record_shape(msg: &str) -> Self {
        Error::UnsupportedRecordShape(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
