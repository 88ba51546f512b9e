use serde::{Deserialize, Serialize};

/// Envelope returned by the countriesnow population endpoint.
///
/// The API wraps its payload as `{ "error": bool, "msg": string, "data": [...] }`
/// and signals failures through the `error` flag rather than HTTP status codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub error: bool,
    pub msg: String,
    #[serde(default)]
    pub data: Vec<PopulationRecord>,
}

/// Raw per-country record from the API: nested population counts keyed by year.
///
/// Years within a record are neither guaranteed sorted nor contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopulationRecord {
    pub country: String,
    /// ISO2 code; absent on some aggregate entries.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
    #[serde(rename = "populationCounts")]
    pub population_counts: Vec<YearCount>,
}

/// One (year, count) entry inside a raw record.
///
/// Some responses encode `year`/`value` as strings, others as numbers.
/// Accept both and normalize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearCount {
    #[serde(deserialize_with = "de_i32_from_string_or_number")]
    pub year: i32,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub value: f64,
}

/// Serde helper: parse `i32` from either a JSON number or a string.
fn de_i32_from_string_or_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct I32Visitor;

    impl<'de> Visitor<'de> for I32Visitor {
        type Value = i32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a year")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(|_| E::custom("year out of range for i32"))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i32::try_from(v).map_err(|_| E::custom("year out of range for i32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<i32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(I32Visitor)
}

/// Serde helper: parse `f64` from either a JSON number or a string.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or number representing a population count")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// Tidy structure used by this crate (one row = one observation).
///
/// `growth_value`/`growth_percentage` are `None` until [`crate::dataset::annotate`]
/// runs, and stay `None` on each country's earliest row (no prior point) and,
/// for the percentage, where the prior value is zero. `is_predicted` marks rows
/// produced by [`crate::forecast::forecast`] rather than observed data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub value: f64,
    pub growth_value: Option<f64>,
    pub growth_percentage: Option<f64>,
    pub is_predicted: bool,
}

impl Observation {
    /// An observed row with growth metrics not yet derived.
    pub fn observed(country: impl Into<String>, year: i32, value: f64) -> Self {
        Self {
            country: country.into(),
            year,
            value,
            growth_value: None,
            growth_percentage: None,
            is_predicted: false,
        }
    }
}
