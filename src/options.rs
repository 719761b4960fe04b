//! Configuration options for COIL encoding.
//!
//! - [`CoilOptions`]: main configuration struct (builder style)
//! - [`RowFormat`]: choice between compact positional rows and legacy
//!   tagged rows
//!
//! ## Examples
//!
//! ```rust
//! use coil::{CoilOptions, FnOracle, RowFormat};
//!
//! // Default: compact rows, values interned at 2+ repetitions,
//! // `q`/`mdu` passthrough, byte-length cost heuristic.
//! let options = CoilOptions::new();
//!
//! // Legacy tagged rows with a custom cost oracle and no passthrough.
//! let options = CoilOptions::new()
//!     .with_row_format(RowFormat::Legacy)
//!     .with_passthrough(Vec::<String>::new())
//!     .with_oracle(FnOracle::new(|text: &str| Some(text.len() / 3 + 1)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::cost::CostOracle;

/// Row encoding for the BODY segment.
///
/// Compact rows carry positional values aligned to the Key Order; legacy
/// rows tag every value with its (possibly remapped) key. The decoder
/// auto-detects the format per row, so both can be read back without
/// out-of-band information.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RowFormat {
    #[default]
    Compact,
    Legacy,
}

/// Configuration options for COIL encoding.
///
/// Decoding takes no options: the row format is auto-detected and all
/// mappings travel inside the META segment.
#[derive(Clone)]
pub struct CoilOptions {
    /// Row encoding for the body. Defaults to [`RowFormat::Compact`].
    pub row_format: RowFormat,
    /// Minimum number of repetitions before a value is considered for
    /// interning. Defaults to 2; values appearing once are never interned.
    pub min_value_freq: usize,
    /// Top-level payload fields copied verbatim into META as `name=value`
    /// declarations. Defaults to `["q", "mdu"]`.
    pub passthrough: Vec<String>,
    /// Optional token-cost oracle. When `None`, the byte-length heuristic
    /// is used for every measurement.
    pub oracle: Option<Arc<dyn CostOracle + Send + Sync>>,
}

impl Default for CoilOptions {
    fn default() -> Self {
        CoilOptions {
            row_format: RowFormat::default(),
            min_value_freq: 2,
            passthrough: vec!["q".to_string(), "mdu".to_string()],
            oracle: None,
        }
    }
}

impl CoilOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::{CoilOptions, RowFormat};
    ///
    /// let options = CoilOptions::new();
    /// assert_eq!(options.row_format, RowFormat::Compact);
    /// assert_eq!(options.min_value_freq, 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for the legacy tagged-row format.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::{CoilOptions, RowFormat};
    ///
    /// let options = CoilOptions::legacy();
    /// assert_eq!(options.row_format, RowFormat::Legacy);
    /// ```
    #[must_use]
    pub fn legacy() -> Self {
        CoilOptions {
            row_format: RowFormat::Legacy,
            ..Default::default()
        }
    }

    /// Sets the row format.
    #[must_use]
    pub fn with_row_format(mut self, row_format: RowFormat) -> Self {
        self.row_format = row_format;
        self
    }

    /// Sets the minimum repetition count for value interning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::CoilOptions;
    ///
    /// // Effectively disables the optimizer.
    /// let options = CoilOptions::new().with_min_value_freq(usize::MAX);
    /// ```
    #[must_use]
    pub fn with_min_value_freq(mut self, min_value_freq: usize) -> Self {
        self.min_value_freq = min_value_freq;
        self
    }

    /// Sets the top-level fields mirrored into META.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil::CoilOptions;
    ///
    /// let options = CoilOptions::new().with_passthrough(["query", "window"]);
    /// assert_eq!(options.passthrough, ["query", "window"]);
    /// ```
    #[must_use]
    pub fn with_passthrough<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passthrough = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the token-cost oracle.
    #[must_use]
    pub fn with_oracle(mut self, oracle: impl CostOracle + Send + Sync + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    /// Sets an already-shared token-cost oracle, e.g. one resolved from a
    /// [`ProfileRegistry`](crate::ProfileRegistry).
    #[must_use]
    pub fn with_shared_oracle(mut self, oracle: Arc<dyn CostOracle + Send + Sync>) -> Self {
        self.oracle = Some(oracle);
        self
    }
}

impl fmt::Debug for CoilOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoilOptions")
            .field("row_format", &self.row_format)
            .field("min_value_freq", &self.min_value_freq)
            .field("passthrough", &self.passthrough)
            .field("oracle", &self.oracle.as_ref().map(|_| "<injected>"))
            .finish()
    }
}
