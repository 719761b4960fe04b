//! The value-token optimizer.
//!
//! Repeated values are interned behind short `V<n>` tokens when doing so
//! provably lowers the measured cost of META + BODY. The search is greedy
//! with no backtracking: candidates are ranked by estimated benefit
//! (`frequency × length`, descending, ties kept in first-seen order) and
//! each one is accepted only if rebuilding the segments with it included
//! measures strictly cheaper than the best cost seen so far. Processing
//! order therefore affects the final table; that order dependence is part
//! of the format's observable behavior and is pinned by tests.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::cost::CostMeter;
use crate::enc::{build_body, build_meta};
use crate::grammar::{DECL_SEP, ROW_SEP, VMAP_SEP};
use crate::options::CoilOptions;
use crate::record::Record;

/// The accepted substitution table (value -> token, in acceptance order)
/// and the body built with it.
pub(crate) struct Optimized {
    pub table: IndexMap<String, String>,
    pub body: String,
}

/// Runs the greedy search over the given records.
///
/// When no candidate survives the repetition threshold, or none lowers the
/// measured cost, the result is exactly the baseline encoding with an empty
/// table.
pub(crate) fn optimize(
    records: &[Record],
    fields: &[String],
    payload_text: &str,
    options: &CoilOptions,
) -> Optimized {
    let meter = CostMeter::new(options.oracle.clone());
    let empty = IndexMap::new();
    let mut body = build_body(records, fields, &options.row_format, &empty);
    let meta = build_meta(fields, &options.row_format, &empty, &[]);
    let baseline = meter.measure(&cost_text(&meta, &body));
    let mut best = baseline;

    let mut table: IndexMap<String, String> = IndexMap::new();
    for candidate in propose(records, payload_text, options.min_value_freq) {
        let mut trial = table.clone();
        trial.insert(candidate.value.clone(), candidate.token.clone());
        let trial_body = build_body(records, fields, &options.row_format, &trial);
        let trial_meta = build_meta(fields, &options.row_format, &trial, &[]);
        let cost = meter.measure(&cost_text(&trial_meta, &trial_body));
        if cost < best {
            debug!(
                "interning {:?} as {}: {} -> {} tokens",
                candidate.value, candidate.token, best, cost
            );
            best = cost;
            table = trial;
            body = trial_body;
        } else {
            trace!(
                "skipping {:?}: {} tokens, best is {}",
                candidate.value,
                cost,
                best
            );
        }
    }

    if !table.is_empty() {
        debug!(
            "value interning cut estimated cost {} -> {} tokens ({} entries)",
            baseline,
            best,
            table.len()
        );
    }
    Optimized { table, body }
}

// Cost is measured over META + '|' + BODY-without-marker, matching the text
// the two segments contribute to a prompt.
fn cost_text(meta: &str, body: &str) -> String {
    format!("{meta}{ROW_SEP}{body}")
}

struct Candidate {
    value: String,
    token: String,
}

/// Collects candidate values and assigns each a collision-free token.
fn propose(records: &[Record], payload_text: &str, min_freq: usize) -> Vec<Candidate> {
    // Count in first-seen order so the ranking tie-break is deterministic.
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        for (_, value) in record.iter() {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts
        .iter()
        .filter(|(value, freq)| **freq >= min_freq && meta_safe(value))
        .map(|(value, freq)| (*value, *freq))
        .collect();
    // Stable sort: equal benefits keep first-seen order.
    ranked.sort_by(|(a_value, a_freq), (b_value, b_freq)| {
        (b_freq * b_value.len()).cmp(&(a_freq * a_value.len()))
    });

    let mut used = HashSet::new();
    ranked
        .iter()
        .enumerate()
        .map(|(i, (value, _))| Candidate {
            value: value.to_string(),
            token: synthesize_token(i + 1, payload_text, &mut used),
        })
        .collect()
}

// `vmap` declarations embed the value verbatim and META has no escaping, so
// values containing META delimiters must stay literal in the body.
fn meta_safe(value: &str) -> bool {
    !value.contains(DECL_SEP) && !value.contains(VMAP_SEP)
}

/// Synthesizes the token for the candidate at `index` (1-based): `V<index>`,
/// with a numeric suffix appended until the token is free of collisions with
/// payload words and previously assigned tokens.
fn synthesize_token(index: usize, payload_text: &str, used: &mut HashSet<String>) -> String {
    let base = format!("V{index}");
    let mut token = base.clone();
    let mut suffix = 1usize;
    while used.contains(&token) || word_collision(&token, payload_text) {
        token = format!("{base}{suffix}");
        suffix += 1;
    }
    used.insert(token.clone());
    token
}

/// Case-insensitive whole-word search for `token` in `text` (`text` is
/// already lowercased by the caller).
fn word_collision(token: &str, text: &str) -> bool {
    let needle = token.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(found) = text[from..].find(&needle) {
        let start = from + found;
        let end = start + needle.len();
        let left_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let right_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if left_ok && right_ok {
            return true;
        }
        // Tokens are ASCII, so byte stepping stays on a char boundary.
        from = start + 1;
    }
    false
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
