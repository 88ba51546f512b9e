//! Per-country linear trend fitting and extrapolation.

use crate::models::Observation;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Ordinary least-squares fit of population on year, with diagnostics.
///
/// `mse` and `r_squared` describe fit quality only; they never gate whether a
/// forecast is produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub mse: f64,
    pub r_squared: f64,
}

impl TrendFit {
    /// Fit `y = intercept + slope * x` over (x, y) points.
    ///
    /// Returns `None` for an empty input. When every x coincides (a single
    /// observed year) the normal-equation denominator vanishes and the fit
    /// degrades to a flat line through the mean: one point cannot determine a
    /// trend, but the pipeline must not fail on it.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
        let sum_x2: f64 = points.iter().map(|(x, _)| x * x).sum();
        let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

        let denominator = n * sum_x2 - sum_x * sum_x;
        let (slope, intercept) = if denominator.abs() < 1e-10 {
            (0.0, sum_y / n)
        } else {
            let slope = (n * sum_xy - sum_x * sum_y) / denominator;
            (slope, (sum_y - slope * sum_x) / n)
        };

        let mean_y = sum_y / n;
        let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = points
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r_squared = if ss_tot > 1e-10 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        Some(Self {
            slope,
            intercept,
            mse: ss_res / n,
            r_squared,
        })
    }

    /// Predicted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a linear trend on one country's observed rows and extrapolate.
///
/// Takes only rows for `country` with `is_predicted == false`, fits value on
/// year, and appends one predicted row per year from the last observed year
/// + 1 through + `years_to_predict`. Observed rows keep their growth
/// annotations; predicted rows carry `None` growth fields and
/// `is_predicted = true`. The result is ordered by year ascending.
///
/// Returns `None` when the table holds no observed rows for `country`; an
/// expected outcome for callers looping over a country list, not an error.
pub fn forecast(
    rows: &[Observation],
    country: &str,
    years_to_predict: u32,
) -> Option<Vec<Observation>> {
    let mut observed: Vec<Observation> = rows
        .iter()
        .filter(|r| r.country == country && !r.is_predicted)
        .cloned()
        .collect();
    if observed.is_empty() {
        warn!("no data for country {country}");
        return None;
    }
    observed.sort_by_key(|r| r.year);

    let points: Vec<(f64, f64)> = observed
        .iter()
        .map(|r| (f64::from(r.year), r.value))
        .collect();
    let fit = TrendFit::fit(&points)?;
    info!(
        "fitted trend for {country}: slope={:.4} intercept={:.4} mse={:.4} r2={:.4}",
        fit.slope, fit.intercept, fit.mse, fit.r_squared
    );

    let last_year = observed.last().map(|r| r.year)?;
    let mut result = observed;
    result.reserve(years_to_predict as usize);
    for offset in 1..=years_to_predict {
        let year = last_year + offset as i32;
        result.push(Observation {
            country: country.to_string(),
            year,
            value: fit.predict(f64::from(year)),
            growth_value: None,
            growth_percentage: None,
            is_predicted: true,
        });
    }
    Some(result)
}
