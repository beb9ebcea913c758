use thiserror::Error;

use super::model::Series;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtrapolateError {
    #[error("at least 2 points are needed to extrapolate, got {len}")]
    InsufficientData { len: usize },
    #[error("value {index} is missing")]
    MissingValue { index: usize },
}

/// Next value of a linear trend: last value plus the mean first difference.
pub fn next_value(values: &[f64]) -> Result<f64, ExtrapolateError> {
    if values.len() < 2 {
        return Err(ExtrapolateError::InsufficientData { len: values.len() });
    }
    if let Some(index) = values.iter().position(|v| v.is_nan()) {
        return Err(ExtrapolateError::MissingValue { index });
    }
    let delta_sum: f64 = values.windows(2).map(|w| w[1] - w[0]).sum();
    let mean_delta = delta_sum / (values.len() - 1) as f64;
    Ok(values[values.len() - 1] + mean_delta)
}

/// Label for a point appended after `labels`.
///
/// A numeric last label is incremented (`"2021"` → `"2022"`). Otherwise the
/// label is `"20"` followed by the current label count.
pub fn next_label(labels: &[String]) -> String {
    labels
        .last()
        .and_then(|l| l.trim().parse::<u32>().ok())
        .and_then(|year| year.checked_add(1))
        .map(|year| year.to_string())
        .unwrap_or_else(|| format!("20{}", labels.len()))
}

impl Series {
    /// A copy of this series with one extrapolated point labelled `label`.
    pub fn extrapolated(&self, label: impl Into<String>) -> Result<Series, ExtrapolateError> {
        let next = next_value(self.values())?;
        let points = self
            .labels()
            .iter()
            .cloned()
            .zip(self.values().iter().copied())
            .chain(std::iter::once((label.into(), next)));
        Ok(Series::from_points(points))
    }
}
