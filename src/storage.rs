use crate::models::{ApiResponse, Observation, PopulationRecord};
use anyhow::{Context, Result, bail};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Save observations as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[Observation], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "country",
        "year",
        "value",
        "growth_value",
        "growth_percentage",
        "is_predicted",
    ))?;
    for r in rows {
        wtr.serialize((
            &r.country,
            r.year,
            r.value,
            r.growth_value,
            r.growth_percentage,
            r.is_predicted,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[Observation], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Write the raw API payload to a timestamped snapshot file in `dir`.
///
/// Creates `dir` if needed and returns the snapshot path. Re-running an
/// analysis from such a file avoids re-downloading the dataset.
pub fn save_raw_snapshot<P: AsRef<Path>>(
    records: &[PopulationRecord],
    dir: P,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create snapshot dir {}", dir.display()))?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("population_data_{stamp}.json"));
    let mut f = File::create(&path)
        .with_context(|| format!("create snapshot {}", path.display()))?;
    f.write_all(serde_json::to_string_pretty(records)?.as_bytes())?;
    Ok(path)
}

/// Load raw records from a snapshot file.
///
/// Accepts either a bare record array (as written by [`save_raw_snapshot`])
/// or a full API envelope saved verbatim from the endpoint.
pub fn load_raw_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<PopulationRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).context("parse snapshot records")
        }
        serde_json::Value::Object(_) => {
            let envelope: ApiResponse =
                serde_json::from_value(value).context("parse snapshot envelope")?;
            if envelope.error {
                bail!("snapshot holds an api error payload: {}", envelope.msg);
            }
            Ok(envelope.data)
        }
        _ => bail!("unexpected snapshot shape in {}", path.display()),
    }
}
