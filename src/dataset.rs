//! Tabular core: flattening raw records and deriving growth metrics.
//!
//! The pipeline is a single batch pass: [`normalize`] turns the nested API
//! payload into one tidy [`Observation`] per (country, year), [`annotate`]
//! sorts the table and fills in year-over-year growth per country. Analysis
//! passes ([`crate::stats`], [`crate::forecast`], [`crate::compare`]) are pure
//! reads of the annotated table.

use crate::error::DataError;
use crate::models::{Observation, PopulationRecord};
use ahash::AHashMap;
use log::info;

/// Flatten nested per-country records into one row per (country, year).
///
/// Values are copied verbatim; growth fields stay unset and every row is
/// marked observed. The output length is exactly the sum of the input
/// records' count lists.
///
/// ### Errors
/// `DataError::MalformedInput` if a record carries a blank country name or a
/// count entry holds a non-finite or negative value. (Entries missing
/// `country`/`year`/`value` altogether never reach this function; they are
/// rejected when the payload is deserialized.)
pub fn normalize(records: &[PopulationRecord]) -> Result<Vec<Observation>, DataError> {
    let mut rows = Vec::with_capacity(records.iter().map(|r| r.population_counts.len()).sum());
    for record in records {
        let country = record.country.trim();
        if country.is_empty() {
            return Err(DataError::MalformedInput(
                "record with empty country name".into(),
            ));
        }
        for count in &record.population_counts {
            if !count.value.is_finite() || count.value < 0.0 {
                return Err(DataError::MalformedInput(format!(
                    "invalid population value {} for {} in {}",
                    count.value, country, count.year
                )));
            }
            rows.push(Observation::observed(country, count.year, count.value));
        }
    }
    info!(
        "normalized {} records into {} observation rows",
        records.len(),
        rows.len()
    );
    Ok(rows)
}

/// Sort by (country, year) and derive per-country year-over-year growth.
///
/// Within each country group the first row keeps both growth fields `None`;
/// every later row gets `growth_value = value - prior value` and
/// `growth_percentage = growth_value / prior value * 100`. A zero prior value
/// leaves the percentage `None` (undefined, never coerced to zero).
///
/// Recomputes from the raw `value` column, so annotating an already-annotated
/// table yields identical results.
pub fn annotate(mut rows: Vec<Observation>) -> Vec<Observation> {
    rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    for i in 0..rows.len() {
        if i > 0 && rows[i].country == rows[i - 1].country {
            let prior = rows[i - 1].value;
            let diff = rows[i].value - prior;
            rows[i].growth_value = Some(diff);
            rows[i].growth_percentage = (prior != 0.0).then(|| diff / prior * 100.0);
        } else {
            rows[i].growth_value = None;
            rows[i].growth_percentage = None;
        }
    }
    rows
}

/// Partition rows by country, preserving the table's row order.
///
/// Groups appear in first-encounter order and each group's rows keep their
/// table order, so on a (country, year)-sorted table every group is its
/// country's year-ascending sequence. Extremal scans rely on this ordering
/// for their first-occurrence tie-break.
pub fn partition_by_country(rows: &[Observation]) -> Vec<(&str, Vec<&Observation>)> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<(&str, Vec<&Observation>)> = Vec::new();
    for row in rows {
        let slot = *index.entry(row.country.as_str()).or_insert_with(|| {
            groups.push((row.country.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_preserves_first_encounter_order() {
        let rows = vec![
            Observation::observed("B", 2000, 1.0),
            Observation::observed("A", 2000, 2.0),
            Observation::observed("B", 2001, 3.0),
        ];
        let groups = partition_by_country(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "A");
    }

    #[test]
    fn normalize_rejects_blank_country() {
        let records = vec![PopulationRecord {
            country: "   ".into(),
            code: None,
            iso3: None,
            population_counts: vec![],
        }];
        assert!(matches!(
            normalize(&records),
            Err(DataError::MalformedInput(_))
        ));
    }
}
