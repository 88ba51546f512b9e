use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use popan_rs::{AnalysisConfig, Client, compare, dataset, forecast, report, stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "popan",
    version,
    about = "Fetch, analyze, forecast & visualize country population data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the population dataset and store a raw snapshot.
    Fetch(FetchArgs),
    /// Run the analysis pipeline (from a snapshot or a live fetch).
    Analyze(AnalyzeArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Directory for raw snapshots.
    #[arg(long, default_value = "data/raw")]
    snapshot_dir: PathBuf,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Raw snapshot file to analyze. Omit to fetch live data.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Countries to compare/forecast, separated by comma or semicolon.
    #[arg(short, long)]
    countries: Option<String>,
    /// First year of the comparison window.
    #[arg(long)]
    start_year: Option<i32>,
    /// Last year of the comparison window.
    #[arg(long)]
    end_year: Option<i32>,
    /// Number of years to extrapolate per country.
    #[arg(long)]
    forecast_years: Option<u32>,
    /// Config file with saved analysis parameters.
    #[arg(long, default_value = "user_config.json")]
    config: PathBuf,
    /// Save the effective parameters back to the config file.
    #[arg(long, default_value_t = false)]
    save_config: bool,
    /// Save the annotated table to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Write SVG charts (population, growth, comparison, per-country forecasts) here.
    #[arg(long)]
    figures_dir: Option<PathBuf>,
    /// Write the plain-text analysis report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Print summary statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// File-name-safe rendering of a country name.
fn slug(country: &str) -> String {
    country
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn cmd_fetch(args: FetchArgs) -> Result<()> {
    let client = Client::default();
    let records = client.fetch_population()?;
    let path = storage::save_raw_snapshot(&records, &args.snapshot_dir)?;
    eprintln!("Saved {} countries to {}", records.len(), path.display());
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> Result<()> {
    // Config file first, CLI flags override.
    let mut config = AnalysisConfig::load_or_default(&args.config)?;
    if let Some(list) = args.countries.as_deref() {
        config.countries = parse_list(list);
    }
    if let Some(y) = args.start_year {
        config.start_year = y;
    }
    if let Some(y) = args.end_year {
        config.end_year = y;
    }
    if let Some(n) = args.forecast_years {
        config.forecast_years = n;
    }
    if args.save_config {
        config.save(&args.config)?;
        info!("saved analysis parameters to {}", args.config.display());
    }

    let records = match args.input.as_ref() {
        Some(path) => storage::load_raw_snapshot(path)?,
        None => Client::default().fetch_population()?,
    };

    let table = dataset::annotate(dataset::normalize(&records)?);
    let summary = stats::summarize(&table)?;

    if args.stats {
        print!("{}", report::render_report(&summary, &config));
    }
    if let Some(path) = args.report.as_ref() {
        report::write_report(&summary, &config, path)?;
        eprintln!("Wrote report to {}", path.display());
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&table, path)?,
            "json" => storage::save_json(&table, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", table.len(), path.display());
    }

    let comparison = compare::compare(
        &table,
        &config.countries,
        Some(config.start_year),
        Some(config.end_year),
    );
    if comparison.is_none() {
        warn!("comparison window matched no rows; skipping comparison outputs");
    }

    if let Some(dir) = args.figures_dir.as_ref() {
        std::fs::create_dir_all(dir)?;
        viz::plot_population(&table, dir.join("population.svg"), 1000, 600)?;
        viz::plot_growth_percentage(&table, dir.join("growth_percentage.svg"), 1000, 600)?;
        if let Some(cmp) = comparison.as_ref() {
            viz::plot_comparison(cmp, dir.join("comparison.svg"), 1000, 600)?;
        }
        for country in &config.countries {
            match forecast::forecast(&table, country, config.forecast_years) {
                Some(fc) => {
                    let path = dir.join(format!("forecast_{}.svg", slug(country)));
                    viz::plot_forecast(&fc, country, path, 1000, 600)?;
                }
                None => warn!("no data for country {country}; skipping forecast"),
            }
        }
        eprintln!("Wrote figures to {}", dir.display());
    }

    Ok(())
}
