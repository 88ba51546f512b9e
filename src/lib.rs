//! popan_rs
//!
//! A lightweight Rust library for retrieving, analyzing, forecasting, and
//! visualizing country population time-series. Pairs with the `popan` CLI.
//!
//! ### Features
//! - Fetch the full per-country population dataset (with on-disk snapshots)
//! - Normalize nested records into a tidy one-row-per-(country, year) table
//! - Year-over-year growth metrics, summary statistics, linear trend forecasts
//! - Cross-country comparison over a chosen year window
//! - Save as CSV or JSON; SVG/PNG line charts; plain-text reports
//!
//! ### Example
//! ```no_run
//! use popan_rs::{Client, dataset, forecast, stats};
//!
//! let client = Client::default();
//! let records = client.fetch_population()?;
//! let table = dataset::annotate(dataset::normalize(&records)?);
//! let summary = stats::summarize(&table)?;
//! println!("{:#?}", summary);
//! if let Some(fc) = forecast::forecast(&table, "Germany", 5) {
//!     popan_rs::storage::save_csv(&fc, "germany_forecast.csv")?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::Client;
pub use config::AnalysisConfig;
pub use error::DataError;
pub use models::{Observation, PopulationRecord};
