//! Cross-country comparison over a filtered year window.

use crate::dataset::annotate;
use crate::models::Observation;
use log::{info, warn};

/// Restrict the table to a country set and an inclusive year window, then
/// re-derive growth inside the window.
///
/// Bounds default to the table's full range when omitted. Growth is
/// recomputed over the retained rows, so each country's first retained year
/// has `None` growth regardless of what the unfiltered table carried:
/// comparisons reflect growth within the selected window only.
///
/// Returns `None` when no rows match the filter.
pub fn compare(
    rows: &[Observation],
    countries: &[String],
    start_year: Option<i32>,
    end_year: Option<i32>,
) -> Option<Vec<Observation>> {
    let start = start_year.unwrap_or(i32::MIN);
    let end = end_year.unwrap_or(i32::MAX);
    let filtered: Vec<Observation> = rows
        .iter()
        .filter(|r| {
            countries.iter().any(|c| c == &r.country) && r.year >= start && r.year <= end
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        warn!(
            "no data for countries [{}] in {:?}..{:?}",
            countries.join(", "),
            start_year,
            end_year
        );
        return None;
    }

    info!(
        "comparing {} countries over {} rows",
        countries.len(),
        filtered.len()
    );
    Some(annotate(filtered))
}
