use popan_rs::DataError;
use popan_rs::dataset::{annotate, normalize};
use popan_rs::models::{Observation, PopulationRecord, YearCount};
use popan_rs::stats::summarize;

fn record(country: &str, counts: &[(i32, f64)]) -> PopulationRecord {
    PopulationRecord {
        country: country.into(),
        code: None,
        iso3: None,
        population_counts: counts
            .iter()
            .map(|&(year, value)| YearCount { year, value })
            .collect(),
    }
}

fn table(records: &[PopulationRecord]) -> Vec<Observation> {
    annotate(normalize(records).unwrap())
}

#[test]
fn single_country_reference_scenario() {
    let rows = table(&[record("A", &[(2000, 100.0), (2001, 110.0), (2002, 121.0)])]);
    let s = summarize(&rows).unwrap();

    assert_eq!(s.total_countries, 1);
    assert_eq!(s.year_range, (2000, 2002));
    assert_eq!(s.total_population_start, 100.0);
    assert_eq!(s.total_population_end, 121.0);
    assert!((s.total_growth_percentage.unwrap() - 21.0).abs() < 1e-9);
    // Both annotated years grew exactly 10%.
    assert!((s.avg_annual_growth_percentage.unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(s.largest_population_country, "A");
    assert_eq!(s.largest_population_value, 121.0);
    assert_eq!(s.smallest_population_country, "A");
    assert_eq!(s.highest_growth_country.as_deref(), Some("A"));
    assert!((s.highest_growth_percentage.unwrap() - 21.0).abs() < 1e-9);
}

#[test]
fn growth_consistency_between_totals_and_percentage() {
    let rows = table(&[
        record("A", &[(2000, 10.0), (2010, 14.0)]),
        record("B", &[(2000, 30.0), (2010, 26.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    let start = s.total_population_start;
    let end = s.total_population_end;
    let expected = (end - start) / start * 100.0;
    assert!((s.total_growth_percentage.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn avg_annual_growth_is_mean_of_yearly_means() {
    // 2001: A +10%, B +30% -> yearly mean 20%.
    // 2002: only A defined, +40% -> yearly mean 40%.
    // Mean of yearly means = 30; a flat mean over rows would give
    // (10 + 30 + 40) / 3 ≈ 26.67 instead.
    let rows = table(&[
        record("A", &[(2000, 100.0), (2001, 110.0), (2002, 154.0)]),
        record("B", &[(2000, 100.0), (2001, 130.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    assert!((s.avg_annual_growth_percentage.unwrap() - 30.0).abs() < 1e-9);
}

#[test]
fn extremal_countries_come_from_latest_year_cross_section() {
    // C has the globally largest value (2000) but is absent in the latest
    // year, so it must not win the latest-year extremes.
    let rows = table(&[
        record("A", &[(2000, 50.0), (2010, 60.0)]),
        record("B", &[(2000, 40.0), (2010, 45.0)]),
        record("C", &[(2000, 1000.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    assert_eq!(s.largest_population_country, "A");
    assert_eq!(s.largest_population_value, 60.0);
    assert_eq!(s.smallest_population_country, "B");
    assert_eq!(s.smallest_population_value, 45.0);
}

#[test]
fn ties_resolve_to_first_row_in_table_order() {
    let rows = table(&[
        record("A", &[(2000, 10.0), (2010, 20.0)]),
        record("B", &[(2000, 10.0), (2010, 20.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    // Identical values and identical growth: "A" sorts first, so it wins all
    // four extremal slots.
    assert_eq!(s.largest_population_country, "A");
    assert_eq!(s.smallest_population_country, "A");
    assert_eq!(s.highest_growth_country.as_deref(), Some("A"));
    assert_eq!(s.lowest_growth_country.as_deref(), Some("A"));
}

#[test]
fn zero_denominators_surface_as_none_not_zero() {
    // Start-year total is zero, and both countries start at zero, so the
    // overall and per-country growth ratios are all undefined.
    let rows = table(&[
        record("A", &[(2000, 0.0), (2010, 5.0)]),
        record("B", &[(2000, 0.0), (2010, 3.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    assert_eq!(s.total_growth_percentage, None);
    assert_eq!(s.highest_growth_country, None);
    assert_eq!(s.highest_growth_percentage, None);
    assert_eq!(s.lowest_growth_country, None);
    assert_eq!(s.lowest_growth_percentage, None);
}

#[test]
fn countries_with_zero_start_are_excluded_from_growth_extremes() {
    let rows = table(&[
        record("A", &[(2000, 0.0), (2010, 5.0)]),
        record("B", &[(2000, 10.0), (2010, 11.0)]),
    ]);
    let s = summarize(&rows).unwrap();
    assert_eq!(s.highest_growth_country.as_deref(), Some("B"));
    assert_eq!(s.lowest_growth_country.as_deref(), Some("B"));
}

#[test]
fn empty_table_is_an_error() {
    assert!(matches!(
        summarize(&[]),
        Err(DataError::EmptyDataset(_))
    ));
}
