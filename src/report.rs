//! Plain-text analysis report over a computed summary.

use crate::config::AnalysisConfig;
use crate::stats::StatisticsSummary;
use anyhow::{Context, Result};
use num_format::{Locale, ToFormattedString};
use std::fmt::Write as _;
use std::path::Path;

fn fmt_count(v: f64) -> String {
    (v.round() as i64).to_formatted_string(&Locale::en)
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.2}%", x),
        _ => "undefined".to_string(),
    }
}

/// Render the report as a string.
///
/// Undefined ratios (zero denominators) print as "undefined" rather than 0,
/// since zero would read as genuine no-growth.
pub fn render_report(stats: &StatisticsSummary, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== POPULATION ANALYSIS REPORT ===");
    let _ = writeln!(out);

    let _ = writeln!(out, "Analysis parameters:");
    let _ = writeln!(out, "- Countries: {}", config.countries.join(", "));
    let _ = writeln!(out, "- Period: {}-{}", config.start_year, config.end_year);
    let _ = writeln!(out, "- Forecast horizon: {} years", config.forecast_years);
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary statistics:");
    let _ = writeln!(out, "- Total countries: {}", stats.total_countries);
    let _ = writeln!(
        out,
        "- Year range: {}-{}",
        stats.year_range.0, stats.year_range.1
    );
    let _ = writeln!(
        out,
        "- Total population at period start: {}",
        fmt_count(stats.total_population_start)
    );
    let _ = writeln!(
        out,
        "- Total population at period end: {}",
        fmt_count(stats.total_population_end)
    );
    let _ = writeln!(
        out,
        "- Total population growth: {}",
        fmt_pct(stats.total_growth_percentage)
    );
    let _ = writeln!(
        out,
        "- Average annual growth: {}",
        fmt_pct(stats.avg_annual_growth_percentage)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Countries with the largest and smallest population:");
    let _ = writeln!(
        out,
        "- Largest population: {} ({})",
        stats.largest_population_country,
        fmt_count(stats.largest_population_value)
    );
    let _ = writeln!(
        out,
        "- Smallest population: {} ({})",
        stats.smallest_population_country,
        fmt_count(stats.smallest_population_value)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Countries with the highest and lowest growth:");
    let _ = writeln!(
        out,
        "- Highest growth: {} ({})",
        stats.highest_growth_country.as_deref().unwrap_or("n/a"),
        fmt_pct(stats.highest_growth_percentage)
    );
    let _ = writeln!(
        out,
        "- Lowest growth: {} ({})",
        stats.lowest_growth_country.as_deref().unwrap_or("n/a"),
        fmt_pct(stats.lowest_growth_percentage)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "=== END OF REPORT ===");
    out
}

/// Render and write the report to `path`.
pub fn write_report<P: AsRef<Path>>(
    stats: &StatisticsSummary,
    config: &AnalysisConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_report(stats, config))
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
