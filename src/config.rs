use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::data::model::{RegionCode, VariableCodes, YearRange};

pub const DEFAULT_TABLE_URL: &str =
    "https://statfin.stat.fi/PxWeb/api/v1/en/StatFin/synt/statfin_synt_pxt_12dy.px";

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub table_url: String,
    pub years: YearRange,
    pub timeout: Duration,
    pub default_region: RegionCode,
    pub variables: VariableCodes,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            table_url: DEFAULT_TABLE_URL.to_string(),
            years: YearRange::new(2000, 2021),
            timeout: Duration::from_millis(10_000),
            default_region: RegionCode::default(),
            variables: VariableCodes::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read `KUNTASTAT_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AppConfig::default();

        let first = parse_or(&lookup, "KUNTASTAT_FIRST_YEAR", defaults.years.first)?;
        let last = parse_or(&lookup, "KUNTASTAT_LAST_YEAR", defaults.years.last)?;
        if first > last {
            bail!("KUNTASTAT_FIRST_YEAR ({first}) is after KUNTASTAT_LAST_YEAR ({last})");
        }
        let timeout_ms = parse_or(
            &lookup,
            "KUNTASTAT_TIMEOUT_MS",
            defaults.timeout.as_millis() as u64,
        )?;

        Ok(AppConfig {
            table_url: lookup("KUNTASTAT_TABLE_URL").unwrap_or(defaults.table_url),
            years: YearRange::new(first, last),
            timeout: Duration::from_millis(timeout_ms),
            default_region: lookup("KUNTASTAT_DEFAULT_REGION")
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .map(RegionCode::new)
                .unwrap_or(defaults.default_region),
            variables: defaults.variables,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}: '{raw}' is not a valid number")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.years, YearRange::new(2000, 2021));
        assert_eq!(cfg.default_region.as_str(), "SSS");
        assert_eq!(cfg.table_url, DEFAULT_TABLE_URL);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("KUNTASTAT_FIRST_YEAR", "2010"),
            ("KUNTASTAT_LAST_YEAR", " 2020 "),
            ("KUNTASTAT_TIMEOUT_MS", "2500"),
            ("KUNTASTAT_DEFAULT_REGION", "091"),
            ("KUNTASTAT_TABLE_URL", "http://localhost:9/t.px"),
        ]))
        .unwrap();
        assert_eq!(cfg.years, YearRange::new(2010, 2020));
        assert_eq!(cfg.timeout, Duration::from_millis(2500));
        assert_eq!(cfg.default_region, RegionCode::new("091"));
        assert_eq!(cfg.table_url, "http://localhost:9/t.px");
    }

    #[test]
    fn blank_default_region_keeps_whole_country() {
        let cfg = AppConfig::from_lookup(lookup(&[("KUNTASTAT_DEFAULT_REGION", " ")])).unwrap();
        assert_eq!(cfg.default_region, RegionCode::default());
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("KUNTASTAT_FIRST_YEAR", "twenty")])).unwrap_err();
        assert!(err.to_string().contains("KUNTASTAT_FIRST_YEAR"));

        let err = AppConfig::from_lookup(lookup(&[
            ("KUNTASTAT_FIRST_YEAR", "2021"),
            ("KUNTASTAT_LAST_YEAR", "2000"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("is after"));
    }
}
