use popan_rs::dataset::{annotate, normalize};
use popan_rs::forecast::forecast;
use popan_rs::models::{Observation, PopulationRecord, YearCount};
use popan_rs::viz;
use tempfile::tempdir;

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

fn sample_table() -> Vec<Observation> {
    annotate(
        normalize(&[
            record("Germany", &[(2019, 83.0e6), (2020, 83.1e6), (2021, 83.2e6)]),
            record("France", &[(2019, 67.0e6), (2020, 67.3e6), (2021, 67.6e6)]),
        ])
        .unwrap(),
    )
}

fn assert_non_empty(path: &std::path::Path) {
    let meta = std::fs::metadata(path).expect("file created");
    assert!(meta.len() > 0, "chart has content");
}

#[test]
fn population_chart_svg_and_png() {
    let table = sample_table();
    let dir = tempdir().unwrap();

    let svg = dir.path().join("population.svg");
    viz::plot_population(&table, &svg, 800, 480).unwrap();
    assert_non_empty(&svg);

    let png = dir.path().join("population.png");
    viz::plot_population(&table, &png, 800, 480).unwrap();
    assert_non_empty(&png);
}

#[test]
fn growth_chart_skips_undefined_rows() {
    let table = sample_table();
    let dir = tempdir().unwrap();
    let path = dir.path().join("growth.svg");
    viz::plot_growth_percentage(&table, &path, 800, 480).unwrap();
    assert_non_empty(&path);
}

#[test]
fn comparison_chart_renders() {
    let table = sample_table();
    let dir = tempdir().unwrap();
    let path = dir.path().join("comparison.svg");
    viz::plot_comparison(&table, &path, 800, 480).unwrap();
    assert_non_empty(&path);
}

#[test]
fn forecast_chart_renders_observed_and_predicted() {
    let table = sample_table();
    let fc = forecast(&table, "Germany", 3).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("forecast_germany.svg");
    viz::plot_forecast(&fc, "Germany", &path, 800, 480).unwrap();
    assert_non_empty(&path);
}

#[test]
fn empty_table_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    assert!(viz::plot_population(&[], &path, 800, 480).is_err());
}

#[test]
fn more_than_five_countries_keeps_top_five_by_latest_population() {
    // Nine countries; the chart should still render (top-5 selection).
    let records: Vec<PopulationRecord> = (0..9)
        .map(|i| {
            record(
                &format!("Country{i}"),
                &[(2019, 1.0e6 * (i + 1) as f64), (2020, 1.1e6 * (i + 1) as f64)],
            )
        })
        .collect();
    let table = annotate(normalize(&records).unwrap());
    let dir = tempdir().unwrap();
    let path = dir.path().join("top5.svg");
    viz::plot_population(&table, &path, 800, 480).unwrap();

    // The legend of an SVG chart embeds series labels as text; the smallest
    // countries must not appear.
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Country8"));
    assert!(!text.contains("Country0"));
}
