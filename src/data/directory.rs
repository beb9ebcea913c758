use std::collections::HashMap;

use thiserror::Error;

use super::client::{FetchError, StatfinClient};
use super::model::{MeasurementId, TableMetadata, VariableCodes};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid municipality name: '{0}'")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// MunicipalityDirectory – lowercase name → region code
// ---------------------------------------------------------------------------

/// Name lookup for the region variable of a table, plus the measurement
/// codes the table offers. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct MunicipalityDirectory {
    by_name: HashMap<String, String>,
    names: HashMap<String, String>,
    measurements: Vec<MeasurementId>,
}

impl MunicipalityDirectory {
    /// Fetch the table metadata and build the lookup from its region variable.
    pub fn load(client: &StatfinClient, codes: &VariableCodes) -> Result<Self, FetchError> {
        let meta = client.fetch_metadata()?;
        let directory = Self::from_metadata(&meta, codes);
        log::info!(
            "Loaded {} municipality names and {} measurements from '{}'",
            directory.len(),
            directory.measurements.len(),
            meta.title
        );
        Ok(directory)
    }

    /// Like [`load`](Self::load), but a failure is logged and yields an empty directory.
    pub fn load_or_empty(client: &StatfinClient, codes: &VariableCodes) -> Self {
        Self::load(client, codes).unwrap_or_else(|e| {
            log::error!("Error fetching municipality codes: {e}");
            Self::default()
        })
    }

    /// Build from table metadata. The region variable is picked by its code,
    /// falling back to the second variable when no code matches.
    pub fn from_metadata(meta: &TableMetadata, codes: &VariableCodes) -> Self {
        let region = meta
            .variables
            .iter()
            .find(|v| v.code == codes.region)
            .or_else(|| meta.variables.get(1));

        let mut directory = match region {
            Some(v) => Self::from_pairs(v.values.iter().zip(v.value_texts.iter())),
            None => {
                log::warn!("Table metadata has no region variable '{}'", codes.region);
                Self::default()
            }
        };
        directory.measurements = meta
            .variables
            .iter()
            .find(|v| v.code == codes.measurement)
            .map(|v| v.values.iter().map(MeasurementId::new).collect())
            .unwrap_or_default();
        directory
    }

    /// Build from `(code, display name)` pairs. A later duplicate name wins.
    pub fn from_pairs<C, N>(pairs: impl IntoIterator<Item = (C, N)>) -> Self
    where
        C: AsRef<str>,
        N: AsRef<str>,
    {
        let mut by_name = HashMap::new();
        let mut names = HashMap::new();
        for (code, name) in pairs {
            let (code, name) = (code.as_ref(), name.as_ref());
            by_name.insert(name.to_lowercase(), code.to_string());
            names.insert(code.to_string(), name.to_string());
        }
        MunicipalityDirectory {
            by_name,
            names,
            measurements: Vec::new(),
        }
    }

    /// Case-insensitive exact match on the municipality name.
    pub fn resolve(&self, name: &str) -> Result<&str, LookupError> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| LookupError::NotFound(name.trim().to_string()))
    }

    /// Display name for a code as given by the source.
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Measurement codes of the table; empty when the metadata did not list them.
    pub fn measurements(&self) -> &[MeasurementId] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
