use crate::dataset::partition_by_country;
use crate::error::DataError;
use crate::models::Observation;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate and extremal indicators over an annotated observation table.
///
/// Computed fresh per call, never mutated. Fields whose denominator can be
/// zero (`total_growth_percentage`, the per-country growth extremes) and the
/// yearly-mean growth are `None` when undefined rather than coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatisticsSummary {
    pub total_countries: usize,
    /// (min year, max year) across the whole table.
    pub year_range: (i32, i32),
    /// Sum of values over all rows in the earliest year.
    pub total_population_start: f64,
    /// Sum of values over all rows in the latest year.
    pub total_population_end: f64,
    pub total_growth_percentage: Option<f64>,
    /// Mean over years of that year's mean defined `growth_percentage`.
    pub avg_annual_growth_percentage: Option<f64>,
    pub largest_population_country: String,
    pub largest_population_value: f64,
    pub smallest_population_country: String,
    pub smallest_population_value: f64,
    pub highest_growth_country: Option<String>,
    pub highest_growth_percentage: Option<f64>,
    pub lowest_growth_country: Option<String>,
    pub lowest_growth_percentage: Option<f64>,
}

/// Compute summary statistics over an annotated table.
///
/// Extremal population countries are taken from the latest-year
/// cross-section; per-country growth spans each country's own year range.
/// Ties resolve to the row that appears first in the table's natural order,
/// so results are deterministic for a (country, year)-sorted table.
///
/// ### Errors
/// `DataError::EmptyDataset` if `rows` is empty.
pub fn summarize(rows: &[Observation]) -> Result<StatisticsSummary, DataError> {
    if rows.is_empty() {
        return Err(DataError::EmptyDataset("summarize"));
    }

    let min_year = rows.iter().map(|r| r.year).min().unwrap_or_default();
    let max_year = rows.iter().map(|r| r.year).max().unwrap_or_default();

    let total_population_start: f64 = rows
        .iter()
        .filter(|r| r.year == min_year)
        .map(|r| r.value)
        .sum();
    let total_population_end: f64 = rows
        .iter()
        .filter(|r| r.year == max_year)
        .map(|r| r.value)
        .sum();
    let total_growth_percentage = (total_population_start != 0.0).then(|| {
        (total_population_end - total_population_start) / total_population_start * 100.0
    });

    // Mean-of-yearly-means: years without a single defined percentage are
    // skipped in the outer mean, not counted as zero.
    let mut per_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(pct) = row.growth_percentage {
            let slot = per_year.entry(row.year).or_insert((0.0, 0));
            slot.0 += pct;
            slot.1 += 1;
        }
    }
    let yearly_means: Vec<f64> = per_year
        .values()
        .map(|(sum, n)| sum / *n as f64)
        .collect();
    let avg_annual_growth_percentage = (!yearly_means.is_empty())
        .then(|| yearly_means.iter().sum::<f64>() / yearly_means.len() as f64);

    // Latest-year cross-section; strict comparisons keep the first occurrence
    // on ties.
    let mut largest: Option<&Observation> = None;
    let mut smallest: Option<&Observation> = None;
    for row in rows.iter().filter(|r| r.year == max_year) {
        if largest.is_none_or(|b| row.value > b.value) {
            largest = Some(row);
        }
        if smallest.is_none_or(|b| row.value < b.value) {
            smallest = Some(row);
        }
    }
    let largest = largest.expect("non-empty cross-section");
    let smallest = smallest.expect("non-empty cross-section");

    let groups = partition_by_country(rows);
    let total_countries = groups.len();

    // Per-country total growth over that country's own year span; a zero
    // starting value leaves the country's growth undefined and excluded.
    let mut highest: Option<(&str, f64)> = None;
    let mut lowest: Option<(&str, f64)> = None;
    for (country, group) in &groups {
        let first = group
            .iter()
            .min_by_key(|r| r.year)
            .expect("non-empty group");
        let last = group
            .iter()
            .max_by_key(|r| r.year)
            .expect("non-empty group");
        if first.value == 0.0 {
            continue;
        }
        let pct = (last.value - first.value) / first.value * 100.0;
        if highest.is_none_or(|(_, best)| pct > best) {
            highest = Some((*country, pct));
        }
        if lowest.is_none_or(|(_, best)| pct < best) {
            lowest = Some((*country, pct));
        }
    }

    info!(
        "summarized {} rows: {} countries, years {}-{}",
        rows.len(),
        total_countries,
        min_year,
        max_year
    );

    Ok(StatisticsSummary {
        total_countries,
        year_range: (min_year, max_year),
        total_population_start,
        total_population_end,
        total_growth_percentage,
        avg_annual_growth_percentage,
        largest_population_country: largest.country.clone(),
        largest_population_value: largest.value,
        smallest_population_country: smallest.country.clone(),
        smallest_population_value: smallest.value,
        highest_growth_country: highest.map(|(c, _)| c.to_string()),
        highest_growth_percentage: highest.map(|(_, p)| p),
        lowest_growth_country: lowest.map(|(c, _)| c.to_string()),
        lowest_growth_percentage: lowest.map(|(_, p)| p),
    })
}
