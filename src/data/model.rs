use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// RegionCode / MeasurementId – identifiers in the source's schema
// ---------------------------------------------------------------------------

/// A municipality code (`"091"`) or the nationwide aggregate (`"SSS"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCode(pub String);

impl RegionCode {
    pub const WHOLE_COUNTRY: &'static str = "SSS";

    pub fn new(code: impl Into<String>) -> Self {
        RegionCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegionCode {
    fn default() -> Self {
        RegionCode(Self::WHOLE_COUNTRY.to_string())
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A statistic code within the table (population, births, deaths, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementId(pub String);

impl MeasurementId {
    pub const POPULATION: &'static str = "vaesto";
    pub const BIRTHS: &'static str = "vm01";
    pub const DEATHS: &'static str = "vm11";

    pub fn new(code: impl Into<String>) -> Self {
        MeasurementId(code.into())
    }

    pub fn population() -> Self {
        Self::new(Self::POPULATION)
    }

    pub fn births() -> Self {
        Self::new(Self::BIRTHS)
    }

    pub fn deaths() -> Self {
        Self::new(Self::DEATHS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Query – validated dimension filters
// ---------------------------------------------------------------------------

/// Inclusive range of years the source can answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub first: u16,
    pub last: u16,
}

impl YearRange {
    pub fn new(first: u16, last: u16) -> Self {
        YearRange { first, last }
    }

    /// Every year in the range as a label string, ascending.
    pub fn labels(&self) -> Vec<String> {
        (self.first..=self.last).map(|y| y.to_string()).collect()
    }

    pub fn contains(&self, year: u16) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("at least one year must be selected")]
    NoYears,
    #[error("'{0}' is not a 4-digit year")]
    MalformedYear(String),
    #[error("year {year} is outside the supported range {first}-{last}")]
    YearOutOfRange { year: String, first: u16, last: u16 },
    #[error("a region must be selected")]
    NoRegion,
    #[error("at least one measurement must be selected")]
    NoMeasurements,
    #[error("measurement '{0}' is not offered by the table")]
    UnknownMeasurement(MeasurementId),
}

/// The dimension filters of one table query. Every dimension is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    years: Vec<String>,
    region: RegionCode,
    measurements: Vec<MeasurementId>,
}

impl Query {
    /// Measurement ids are not checked here; see [`ensure_known`](Self::ensure_known).
    /// Without that check an unknown id is rejected by the source with a 400 status.
    pub fn new(
        years: Vec<String>,
        range: YearRange,
        region: RegionCode,
        measurements: Vec<MeasurementId>,
    ) -> Result<Self, QueryError> {
        if years.is_empty() {
            return Err(QueryError::NoYears);
        }
        for year in &years {
            let is_numeral = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
            if !is_numeral {
                return Err(QueryError::MalformedYear(year.clone()));
            }
            let value: u16 = year
                .parse()
                .map_err(|_| QueryError::MalformedYear(year.clone()))?;
            if !range.contains(value) {
                return Err(QueryError::YearOutOfRange {
                    year: year.clone(),
                    first: range.first,
                    last: range.last,
                });
            }
        }
        if region.0.trim().is_empty() {
            return Err(QueryError::NoRegion);
        }
        if measurements.is_empty() {
            return Err(QueryError::NoMeasurements);
        }
        Ok(Query {
            years,
            region,
            measurements,
        })
    }

    /// All years of `range` for one region.
    pub fn for_range(
        range: YearRange,
        region: RegionCode,
        measurements: Vec<MeasurementId>,
    ) -> Result<Self, QueryError> {
        Self::new(range.labels(), range, region, measurements)
    }

    /// Reject measurements missing from `known`. An empty `known` accepts all.
    pub fn ensure_known(&self, known: &[MeasurementId]) -> Result<(), QueryError> {
        if known.is_empty() {
            return Ok(());
        }
        match self.measurements.iter().find(|m| !known.contains(m)) {
            Some(unknown) => Err(QueryError::UnknownMeasurement(unknown.clone())),
            None => Ok(()),
        }
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn region(&self) -> &RegionCode {
        &self.region
    }

    pub fn measurements(&self) -> &[MeasurementId] {
        &self.measurements
    }

    /// Build the PxWeb request body selecting years × region × measurements.
    pub fn to_request(&self, codes: &VariableCodes) -> PxQueryRequest {
        let filter = |code: &str, values: Vec<String>| PxQueryFilter {
            code: code.to_string(),
            selection: PxSelection {
                filter: "item".to_string(),
                values,
            },
        };
        PxQueryRequest {
            query: vec![
                filter(&codes.year, self.years.clone()),
                filter(&codes.region, vec![self.region.0.clone()]),
                filter(
                    &codes.measurement,
                    self.measurements.iter().map(|m| m.0.clone()).collect(),
                ),
            ],
            response: PxResponseFormat {
                format: "json".to_string(),
            },
        }
    }
}

/// Codes of the three table variables a query filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCodes {
    pub year: String,
    pub region: String,
    pub measurement: String,
}

impl Default for VariableCodes {
    fn default() -> Self {
        VariableCodes {
            year: "Vuosi".to_string(),
            region: "Alue".to_string(),
            measurement: "Tiedot".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PxWeb wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PxQueryRequest {
    pub query: Vec<PxQueryFilter>,
    pub response: PxResponseFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PxQueryFilter {
    pub code: String,
    pub selection: PxSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PxSelection {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PxResponseFormat {
    pub format: String,
}

/// `GET` on a table: its title and variables.
#[derive(Debug, Clone, Deserialize)]
pub struct TableMetadata {
    #[serde(default)]
    pub title: String,
    pub variables: Vec<TableVariable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableVariable {
    pub code: String,
    pub values: Vec<String>,
    #[serde(rename = "valueTexts")]
    pub value_texts: Vec<String>,
}

/// `POST` on a table with `format: json`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub columns: Vec<ResponseColumn>,
    pub data: Vec<RawObservation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseColumn {
    pub code: String,
    /// `"t"` time, `"d"` dimension, `"c"` content (a value column).
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ResponseColumn {
    pub fn is_content(&self) -> bool {
        self.kind == "c"
    }
}

/// One response row: key tuple plus the value column(s), all as text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub key: Vec<String>,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Series – labels aligned 1:1 with values
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
#[error("series has {labels} labels but {values} values")]
pub struct MisalignedSeries {
    pub labels: usize,
    pub values: usize,
}

/// Values for one measurement over a sequence of year labels.
/// Missing values are `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, MisalignedSeries> {
        if labels.len() != values.len() {
            return Err(MisalignedSeries {
                labels: labels.len(),
                values: values.len(),
            });
        }
        Ok(Series { labels, values })
    }

    /// Build from `(label, value)` pairs, which cannot misalign.
    pub fn from_points(points: impl IntoIterator<Item = (String, f64)>) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Series { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Fetcher output: the shared label sequence plus one series per measurement,
/// in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub labels: Vec<String>,
    pub series: Vec<(MeasurementId, Series)>,
}

impl SeriesSet {
    pub fn get(&self, id: &MeasurementId) -> Option<&Series> {
        self.series
            .iter()
            .find(|(m, _)| m == id)
            .map(|(_, s)| s)
    }
}
