/// Synchronous client for the **countriesnow.space population API**.
///
/// This module targets the `countries/population` endpoint, which returns the
/// full per-country population time-series in a single response (no
/// pagination). Results come back as raw `models::PopulationRecord` entries
/// ready for `dataset::normalize`.
///
/// ### Notes
/// - The API signals failures through an `error` flag in its JSON envelope
///   rather than HTTP status codes; both are checked.
/// - `year`/`value` fields arrive as numbers or strings depending on the
///   record; the models accept both.
/// - Network timeouts use a sane default (30s) and can be adjusted by editing
///   the client builder.
///
/// Typical usage:
/// ```no_run
/// # use popan_rs::Client;
/// let client = Client::default();
/// let records = client.fetch_population()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::models::{ApiResponse, PopulationRecord};
use anyhow::{Context, Result, bail};
use log::info;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("popan_rs/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: "https://countriesnow.space/api/v0.1".into(),
            http,
        }
    }
}

impl Client {
    /// Fetch the complete population dataset.
    ///
    /// ### Returns
    /// A `Vec<models::PopulationRecord>`, one nested record per country.
    ///
    /// ### Errors
    /// - Network/HTTP error
    /// - JSON decoding error
    /// - API-level error envelope (surfaced with its message)
    pub fn fetch_population(&self) -> Result<Vec<PopulationRecord>> {
        let url = format!("{}/countries/population", self.base_url);

        // Small retry for transient failures (5xx / network errors)
        let get_json = |u: &str| -> Result<Value> {
            let mut last_err: Option<anyhow::Error> = None;
            for backoff_ms in [100u64, 300, 700] {
                match self.http.get(u).send() {
                    Ok(r) if r.status().is_success() => {
                        return r.json().context("decode json");
                    }
                    Ok(r) if r.status().is_server_error() => { /* retry */ }
                    Ok(r) => bail!("request failed with HTTP {}", r.status()),
                    Err(e) => last_err = Some(e.into()),
                }
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
            bail!("network error: {:?}", last_err);
        };

        let v: Value = get_json(&url).with_context(|| format!("GET {}", url))?;
        let response: ApiResponse =
            serde_json::from_value(v).context("parse population payload")?;
        if response.error {
            bail!("population api error: {}", response.msg);
        }

        info!(
            "fetched population data for {} countries",
            response.data.len()
        );
        Ok(response.data)
    }
}
