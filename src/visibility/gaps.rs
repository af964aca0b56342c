use chrono::{DateTime, Duration, Utc};

use crate::visibility::types::AccessInterval;

/// Longest span inside `[start, end]` during which no access is open.
///
/// Accesses from all satellites are merged first. With `include_boundaries`
/// the spans before the first access and after the last one count as gaps.
/// A device that is never seen has a gap as long as the whole window.
pub fn max_coverage_gap(
    accesses: &[AccessInterval],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    include_boundaries: bool,
) -> Duration {
    let merged = merge_accesses(accesses);

    let (first, last) = match (merged.first(), merged.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return end - start,
    };

    let mut max_gap = Duration::zero();
    for pair in merged.windows(2) {
        max_gap = max_gap.max(pair[1].0 - pair[0].1);
    }

    if include_boundaries {
        max_gap = max_gap.max(first.0 - start).max(end - last.1);
    }

    max_gap
}

/// Union of access intervals as sorted, disjoint `(start, end)` spans.
pub fn merge_accesses(accesses: &[AccessInterval]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut spans: Vec<_> = accesses.iter().map(|a| (a.start, a.end)).collect();
    spans.sort();

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(spans.len());
    for (s, e) in spans {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }
    merged
}
