use crate::models::Observation;
use anyhow::{Result, anyhow};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

/// One-time registration of a fallback "sans-serif" font for the `ab_glyph`
/// text path. Required because `ab_glyph` does not discover OS fonts; without a
/// registered font every text draw fails with `FontUnavailable`.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
/// Supported tags (case-insensitive): "en", "us", "en_US", "de", "de_DE", "german", "fr", "es", "it", "pt", "nl"
fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// One plotted line; `markers` adds per-point circles (used for forecast rows).
struct SeriesSpec {
    label: String,
    points: Vec<(i32, f64)>,
    markers: bool,
}

/// How many series `plot_population` keeps when the table holds more
/// countries than fit a readable legend.
const TOP_COUNTRIES: usize = 5;

/// Plot per-country population lines (default locale = "en").
///
/// With more than five countries present, keeps the top five by latest-year
/// population so the legend stays readable.
pub fn plot_population<P: AsRef<Path>>(
    rows: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    plot_population_locale(rows, out_path, width, height, "en")
}

/// Same as `plot_population` but with a locale tag for label formatting (e.g., "en" or "de").
pub fn plot_population_locale<P: AsRef<Path>>(
    rows: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    let mut grouped = group_series(rows, |r| Some(r.value));
    if grouped.len() > TOP_COUNTRIES {
        let latest_year = rows.iter().map(|r| r.year).max().unwrap_or_default();
        let mut latest: BTreeMap<&str, f64> = BTreeMap::new();
        for r in rows.iter().filter(|r| r.year == latest_year) {
            latest.insert(r.country.as_str(), r.value);
        }
        grouped.sort_by(|a, b| {
            let va = latest.get(a.label.as_str()).copied().unwrap_or(f64::MIN);
            let vb = latest.get(b.label.as_str()).copied().unwrap_or(f64::MIN);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });
        grouped.truncate(TOP_COUNTRIES);
    }
    render_to_path(out_path, width, height, "Population by year", "Population", &grouped, locale_tag)
}

/// Plot per-country year-over-year growth percentage lines.
///
/// Rows with undefined growth (first year per country, zero prior value) are
/// skipped, not drawn as zero.
pub fn plot_growth_percentage<P: AsRef<Path>>(
    rows: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let grouped = group_series(rows, |r| r.growth_percentage);
    render_to_path(
        out_path,
        width,
        height,
        "Population growth (% per year)",
        "Growth %",
        &grouped,
        "en",
    )
}

/// Plot the comparator's output: every country in the filtered window.
pub fn plot_comparison<P: AsRef<Path>>(
    rows: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let grouped = group_series(rows, |r| Some(r.value));
    render_to_path(
        out_path,
        width,
        height,
        "Population comparison",
        "Population",
        &grouped,
        "en",
    )
}

/// Plot one country's forecast: observed line plus a marked predicted series.
///
/// Expects [`crate::forecast::forecast`] output (a single country's observed
/// rows followed by predicted rows).
pub fn plot_forecast<P: AsRef<Path>>(
    rows: &[Observation],
    country: &str,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let observed: Vec<(i32, f64)> = rows
        .iter()
        .filter(|r| !r.is_predicted)
        .map(|r| (r.year, r.value))
        .collect();
    let mut predicted: Vec<(i32, f64)> = rows
        .iter()
        .filter(|r| r.is_predicted)
        .map(|r| (r.year, r.value))
        .collect();
    // Anchor the forecast line to the last observed point so the chart reads
    // as one continuous trajectory.
    if let Some(last) = observed.last().copied() {
        predicted.insert(0, last);
    }
    let series = vec![
        SeriesSpec {
            label: format!("{country} (observed)"),
            points: observed,
            markers: false,
        },
        SeriesSpec {
            label: format!("{country} (predicted)"),
            points: predicted,
            markers: true,
        },
    ];
    render_to_path(
        out_path,
        width,
        height,
        "Population forecast",
        "Population",
        &series,
        "en",
    )
}

/// Group rows into one series per country, in first-encounter order,
/// dropping rows where `metric` is undefined.
fn group_series<F>(rows: &[Observation], metric: F) -> Vec<SeriesSpec>
where
    F: Fn(&Observation) -> Option<f64>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for r in rows {
        if let Some(v) = metric(r) {
            if !groups.contains_key(r.country.as_str()) {
                order.push(r.country.as_str());
            }
            groups.entry(r.country.as_str()).or_default().push((r.year, v));
        }
    }
    order
        .into_iter()
        .map(|country| {
            let mut points = groups.remove(country).unwrap_or_default();
            points.sort_by_key(|(y, _)| *y);
            SeriesSpec {
                label: country.to_string(),
                points,
                markers: false,
            }
        })
        .collect()
}

/// Dispatch on file extension (SVG vs bitmap) and draw.
fn render_to_path<P: AsRef<Path>>(
    out_path: P,
    width: u32,
    height: u32,
    caption: &str,
    y_desc: &str,
    series: &[SeriesSpec],
    locale_tag: &str,
) -> Result<()> {
    ensure_fonts_registered();

    if series.iter().all(|s| s.points.is_empty()) {
        return Err(anyhow!("no data to plot"));
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let years: Vec<i32> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(y, _)| *y))
        .collect();
    let (mut min_year, mut max_year) = (
        *years.iter().min().ok_or_else(|| anyhow!("no valid years"))?,
        *years.iter().max().ok_or_else(|| anyhow!("no valid years"))?,
    );
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    let values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, v)| *v))
        .collect();
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    let (num_locale, _dec_sep) = map_locale(locale_tag);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(
            root, caption, y_desc, series, min_year, max_year, min_val, max_val, num_locale,
        )?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(
            root, caption, y_desc, series, min_year, max_year, min_val, max_val, num_locale,
        )?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
#[allow(clippy::too_many_arguments)]
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    caption: &str,
    y_desc: &str,
    series: &[SeriesSpec],
    min_year: i32,
    max_year: i32,
    min_val: f64,
    max_val: f64,
    num_locale: &Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(min_year..max_year, min_val..max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Axis label formatters: Y uses locale thousands separators; integers only
    let y_label_fmt = |v: &f64| {
        let n = (*v).round() as i64;
        n.to_formatted_string(num_locale)
    };
    let x_label_fmt = |y: &i32| y.to_string();

    // Limit label counts to avoid overlap
    let x_label_count = ((max_year - min_year + 1) as usize).min(12);
    let y_label_count = 10usize;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_labels(x_label_count)
        .y_labels(y_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (idx, spec) in series.iter().enumerate() {
        // Base palette color -> RGBA (so we can reuse it in style & legend)
        let color = Palette99::pick(idx).to_rgba();

        let style = ShapeStyle {
            color: color.clone(),
            filled: false,
            stroke_width: 2,
        };

        chart
            .draw_series(LineSeries::new(spec.points.clone(), style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(spec.label.clone())
            // Move the color into the closure; clone for each legend glyph draw
            .legend({
                let color = color.clone();
                move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.clone())
            });

        if spec.markers {
            chart
                .draw_series(
                    spec.points
                        .iter()
                        .map(|(x, y)| Circle::new((*x, *y), 3, color.clone().filled())),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
