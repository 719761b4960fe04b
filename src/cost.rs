//! Token-cost estimation for encoded text.
//!
//! The optimizer only ever compares two cost integers, so the oracle behind
//! them is fully swappable: a real tokenizer for a configured model profile,
//! a closure, or nothing at all. When no oracle is configured, or the
//! configured one reports itself unavailable, [`CostMeter`] falls back to the
//! deterministic byte-length heuristic `ceil(len / 4)` (minimum 1). Oracle
//! unavailability is handled here and never propagated to the caller.
//!
//! ## Examples
//!
//! ```rust
//! use coil::{CoilOptions, FnOracle};
//!
//! // Cost by whitespace-separated words instead of the heuristic.
//! let options = CoilOptions::new()
//!     .with_oracle(FnOracle::new(|text| Some(text.split_whitespace().count().max(1))));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use log::trace;

/// An external token counter.
///
/// Returns `None` when the backing tokenizer is unavailable; the
/// [`CostMeter`] then falls back to [`heuristic_cost`] for that call.
pub trait CostOracle {
    /// Estimates the token count of `text`.
    fn cost(&self, text: &str) -> Option<usize>;
}

/// Adapts a closure into a [`CostOracle`].
///
/// # Examples
///
/// ```rust
/// use coil::{CostOracle, FnOracle};
///
/// let oracle = FnOracle::new(|text: &str| Some(text.len()));
/// assert_eq!(oracle.cost("four"), Some(4));
/// ```
pub struct FnOracle<F>(F);

impl<F> FnOracle<F>
where
    F: Fn(&str) -> Option<usize>,
{
    pub fn new(f: F) -> Self {
        FnOracle(f)
    }
}

impl<F> CostOracle for FnOracle<F>
where
    F: Fn(&str) -> Option<usize>,
{
    fn cost(&self, text: &str) -> Option<usize> {
        (self.0)(text)
    }
}

/// The deterministic fallback cost heuristic: `ceil(len / 4)`, minimum 1.
///
/// # Examples
///
/// ```rust
/// use coil::heuristic_cost;
///
/// assert_eq!(heuristic_cost(""), 1);
/// assert_eq!(heuristic_cost("abcd"), 1);
/// assert_eq!(heuristic_cost("abcde"), 2);
/// ```
#[must_use]
pub fn heuristic_cost(text: &str) -> usize {
    ((text.len() + 3) / 4).max(1)
}

/// An injected mapping from model-profile names to cost oracles.
///
/// Profile lookup tables are configuration, not process-wide state: build a
/// registry, register the oracles you have, and resolve one per encode call.
///
/// # Examples
///
/// ```rust
/// use coil::{FnOracle, ProfileRegistry};
///
/// let mut profiles = ProfileRegistry::new();
/// profiles.register("bytes", FnOracle::new(|text: &str| Some(text.len().max(1))));
///
/// let oracle = profiles.resolve("bytes").unwrap();
/// assert!(profiles.resolve("unknown-model").is_none());
/// ```
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: IndexMap<String, Arc<dyn CostOracle + Send + Sync>>,
}

impl ProfileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an oracle under a profile name, replacing any previous one.
    pub fn register(
        &mut self,
        profile: impl Into<String>,
        oracle: impl CostOracle + Send + Sync + 'static,
    ) {
        self.profiles.insert(profile.into(), Arc::new(oracle));
    }

    /// Looks up the oracle registered for `profile`.
    #[must_use]
    pub fn resolve(&self, profile: &str) -> Option<Arc<dyn CostOracle + Send + Sync>> {
        self.profiles.get(profile).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Wraps an optional oracle with the fallback heuristic and the `>= 1` clamp.
///
/// This is the only cost interface the optimizer sees.
///
/// # Examples
///
/// ```rust
/// use coil::{CostMeter, FnOracle, heuristic_cost};
/// use std::sync::Arc;
///
/// let meter = CostMeter::new(None);
/// assert_eq!(meter.measure("abcdefgh"), heuristic_cost("abcdefgh"));
///
/// let meter = CostMeter::new(Some(Arc::new(FnOracle::new(|_| Some(42)))));
/// assert_eq!(meter.measure("anything"), 42);
///
/// // An unavailable oracle falls back instead of failing.
/// let meter = CostMeter::new(Some(Arc::new(FnOracle::new(|_| None))));
/// assert_eq!(meter.measure("abcdefgh"), heuristic_cost("abcdefgh"));
/// ```
pub struct CostMeter {
    oracle: Option<Arc<dyn CostOracle + Send + Sync>>,
}

impl CostMeter {
    #[must_use]
    pub fn new(oracle: Option<Arc<dyn CostOracle + Send + Sync>>) -> Self {
        CostMeter { oracle }
    }

    /// Measures `text`, falling back to [`heuristic_cost`] when the oracle is
    /// absent or unavailable. The result is always at least 1.
    #[must_use]
    pub fn measure(&self, text: &str) -> usize {
        if let Some(oracle) = &self.oracle {
            if let Some(cost) = oracle.cost(text) {
                return cost.max(1);
            }
            trace!("cost oracle unavailable, using byte-length heuristic");
        }
        heuristic_cost(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_rounds_up() {
        assert_eq!(heuristic_cost(""), 1);
        assert_eq!(heuristic_cost("a"), 1);
        assert_eq!(heuristic_cost("abcd"), 1);
        assert_eq!(heuristic_cost("abcde"), 2);
        assert_eq!(heuristic_cost(&"x".repeat(100)), 25);
    }

    #[test]
    fn test_meter_clamps_to_one() {
        let meter = CostMeter::new(Some(Arc::new(FnOracle::new(|_| Some(0)))));
        assert_eq!(meter.measure(""), 1);
    }

    #[test]
    fn test_meter_fallback_matches_heuristic() {
        let unavailable = CostMeter::new(Some(Arc::new(FnOracle::new(|_| None))));
        let bare = CostMeter::new(None);
        for text in ["", "short", "a somewhat longer piece of text"] {
            assert_eq!(unavailable.measure(text), bare.measure(text));
        }
    }

    #[test]
    fn test_registry_resolves_registered_profiles() {
        let mut profiles = ProfileRegistry::new();
        assert!(profiles.is_empty());
        profiles.register("fixed", FnOracle::new(|_| Some(7)));
        assert_eq!(profiles.len(), 1);

        let oracle = profiles.resolve("fixed").unwrap();
        assert_eq!(oracle.cost("anything"), Some(7));
        assert!(profiles.resolve("missing").is_none());
    }
}
