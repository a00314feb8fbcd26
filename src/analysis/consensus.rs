//! Frequency consensus over clustered observations
//!
//! Counts normalized text occurrences and filters by an absolute minimum
//! frequency and a relative threshold against the most frequent entry. The
//! table is recomputed from scratch at every evaluation rather than
//! maintained incrementally, so filtered and unfiltered counts cannot drift.

use std::collections::HashMap;

/// Normalize raw OCR text into a frequency key: ASCII letters, space, comma,
/// hyphen and apostrophe are retained, everything else is dropped.
/// Idempotent; two distinct raw strings may normalize to the same key.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | ',' | '-' | '\''))
        .collect()
}

/// Produce the candidate shortlist for a set of observed text lines.
///
/// Entries survive only with `count > minimum_frequency` (strict) and
/// `count / max_count > accuracy_required` under real-valued division.
/// Survivors are ordered by count descending, ties broken lexically, and
/// truncated to `limit`.
pub fn shortlist<'a, I>(
    texts: I,
    minimum_frequency: u32,
    accuracy_required: f64,
    limit: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, u32> = HashMap::new();
    for text in texts {
        *counts.entry(normalize(text)).or_insert(0) += 1;
    }

    counts.retain(|_, count| *count > minimum_frequency);

    let Some(max_count) = counts.values().copied().max() else {
        return Vec::new();
    };

    let mut survivors: Vec<(String, u32)> = counts
        .into_iter()
        .filter(|(_, count)| *count as f64 / max_count as f64 > accuracy_required)
        .collect();

    survivors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    survivors.truncate(limit);
    survivors.into_iter().map(|(text, _)| text).collect()
}
