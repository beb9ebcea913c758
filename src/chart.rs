use eframe::egui::Color32;
use thiserror::Error;

use crate::color::{generate_palette, hex_or_gray};
use crate::data::extrapolate::{next_label, ExtrapolateError};
use crate::data::model::{MeasurementId, Series, SeriesSet};

pub const ACCENT_COLOR: &str = "#eb5146";
pub const BIRTHS_COLOR: &str = "#63d0ff";
pub const DEATHS_COLOR: &str = "#363636";
pub const CHART_HEIGHT: f32 = 450.0;
pub const DOT_SIZE: f32 = 4.0;

// ---------------------------------------------------------------------------
// ChartModel – render-ready labels + styled datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Line,
    Bar,
}

/// Input to [`project`]: one value series with its display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub render: RenderKind,
    /// `None` picks a colour from an evenly spaced palette.
    pub color: Option<Color32>,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>, render: RenderKind) -> Self {
        NamedSeries {
            name: name.into(),
            values,
            render,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub values: Vec<f64>,
    pub render: RenderKind,
    pub color: Color32,
}

/// Every dataset has exactly `labels.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub chart_type: RenderKind,
    pub height: f32,
    pub dot_size: f32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("no series to chart")]
    NoSeries,
    #[error("grouped charts need at least 2 series, got {0}")]
    TooFewSeries(usize),
    #[error("series '{name}' has {actual} values but there are {expected} labels")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("no data for measurement '{0}'")]
    MissingMeasurement(MeasurementId),
}

/// Zip labels with each series into a chart model.
///
/// Series whose length differs from `labels` are rejected, never truncated.
pub fn project(
    title: impl Into<String>,
    labels: Vec<String>,
    series: Vec<NamedSeries>,
    chart_type: RenderKind,
) -> Result<ChartModel, ProjectionError> {
    if series.is_empty() {
        return Err(ProjectionError::NoSeries);
    }
    if let Some(bad) = series.iter().find(|s| s.values.len() != labels.len()) {
        return Err(ProjectionError::LengthMismatch {
            name: bad.name.clone(),
            expected: labels.len(),
            actual: bad.values.len(),
        });
    }

    let palette = generate_palette(series.len());
    let datasets = series
        .into_iter()
        .zip(palette)
        .map(|(s, fallback)| Dataset {
            name: s.name,
            values: s.values,
            render: s.render,
            color: s.color.unwrap_or(fallback),
        })
        .collect();

    Ok(ChartModel {
        title: title.into(),
        labels,
        datasets,
        chart_type,
        height: CHART_HEIGHT,
        dot_size: if chart_type == RenderKind::Line { DOT_SIZE } else { 0.0 },
    })
}

/// One series as a continuous line in the accent colour.
pub fn project_single(
    title: impl Into<String>,
    labels: Vec<String>,
    name: impl Into<String>,
    values: Vec<f64>,
) -> Result<ChartModel, ProjectionError> {
    let series = NamedSeries::new(name, values, RenderKind::Line).with_color(hex_or_gray(ACCENT_COLOR));
    project(title, labels, vec![series], RenderKind::Line)
}

/// Two or more series as grouped bars.
pub fn project_grouped(
    title: impl Into<String>,
    labels: Vec<String>,
    series: Vec<NamedSeries>,
) -> Result<ChartModel, ProjectionError> {
    if series.len() < 2 {
        return Err(ProjectionError::TooFewSeries(series.len()));
    }
    let series = series
        .into_iter()
        .map(|s| NamedSeries {
            render: RenderKind::Bar,
            ..s
        })
        .collect();
    project(title, labels, series, RenderKind::Bar)
}

impl ChartModel {
    /// Append one extrapolated point to every dataset and one label.
    ///
    /// Either every dataset is extended or the model is left unchanged.
    pub fn extend_trend(&mut self) -> Result<(), ExtrapolateError> {
        let label = next_label(&self.labels);
        let extended = self
            .datasets
            .iter()
            .map(|ds| {
                let points = self.labels.iter().cloned().zip(ds.values.iter().copied());
                Series::from_points(points).extrapolated(label.clone())
            })
            .collect::<Result<Vec<Series>, _>>()?;

        for (ds, series) in self.datasets.iter_mut().zip(extended) {
            ds.values = series.into_values();
        }
        self.labels.push(label);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ChartPage – which chart a page shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPage {
    #[default]
    Population,
    BirthsDeaths,
}

impl ChartPage {
    pub const ALL: [ChartPage; 2] = [ChartPage::Population, ChartPage::BirthsDeaths];

    pub fn label(self) -> &'static str {
        match self {
            ChartPage::Population => "Population",
            ChartPage::BirthsDeaths => "Births & deaths",
        }
    }

    pub fn measurements(self) -> Vec<MeasurementId> {
        match self {
            ChartPage::Population => vec![MeasurementId::population()],
            ChartPage::BirthsDeaths => vec![MeasurementId::births(), MeasurementId::deaths()],
        }
    }

    /// Project a fetched set into this page's chart. `region` names the title.
    pub fn build_chart(self, set: &SeriesSet, region: &str) -> Result<ChartModel, ProjectionError> {
        let values = |id: MeasurementId| -> Result<Vec<f64>, ProjectionError> {
            set.get(&id)
                .map(|s| s.values().to_vec())
                .ok_or(ProjectionError::MissingMeasurement(id))
        };

        match self {
            ChartPage::Population => project_single(
                format!("Population Over Years ({region})"),
                set.labels.clone(),
                "Population",
                values(MeasurementId::population())?,
            ),
            ChartPage::BirthsDeaths => project_grouped(
                format!("Births and Deaths Over Years ({region})"),
                set.labels.clone(),
                vec![
                    NamedSeries::new("Births", values(MeasurementId::births())?, RenderKind::Bar)
                        .with_color(hex_or_gray(BIRTHS_COLOR)),
                    NamedSeries::new("Deaths", values(MeasurementId::deaths())?, RenderKind::Bar)
                        .with_color(hex_or_gray(DEATHS_COLOR)),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn single_series_preserves_values_and_order() {
        let chart = project_single("t", labels(&["2000", "2001"]), "Population", vec![7.0, 3.0])
            .unwrap();
        assert_eq!(chart.labels, labels(&["2000", "2001"]));
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].values, vec![7.0, 3.0]);
        assert_eq!(chart.datasets[0].render, RenderKind::Line);
        assert_eq!(chart.datasets[0].color, Color32::from_rgb(0xeb, 0x51, 0x46));
        assert_eq!(chart.chart_type, RenderKind::Line);
        assert_eq!(chart.dot_size, DOT_SIZE);
        assert_eq!(chart.height, CHART_HEIGHT);
    }

    #[test]
    fn grouped_series_are_bars_with_own_colours() {
        let chart = project_grouped(
            "t",
            labels(&["2000", "2001"]),
            vec![
                NamedSeries::new("Births", vec![1.0, 2.0], RenderKind::Line)
                    .with_color(hex_or_gray(BIRTHS_COLOR)),
                NamedSeries::new("Deaths", vec![3.0, 4.0], RenderKind::Line),
            ],
        )
        .unwrap();
        assert_eq!(chart.chart_type, RenderKind::Bar);
        assert!(chart.datasets.iter().all(|d| d.render == RenderKind::Bar));
        assert_eq!(chart.datasets[0].color, Color32::from_rgb(0x63, 0xd0, 0xff));
        assert_ne!(chart.datasets[0].color, chart.datasets[1].color);
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = project_grouped(
            "t",
            labels(&["2000", "2001", "2002"]),
            vec![
                NamedSeries::new("Births", vec![1.0, 2.0, 3.0], RenderKind::Bar),
                NamedSeries::new("Deaths", vec![1.0, 2.0], RenderKind::Bar),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProjectionError::LengthMismatch {
                name: "Deaths".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn empty_and_undersized_inputs_are_rejected() {
        assert_eq!(
            project("t", vec![], vec![], RenderKind::Line),
            Err(ProjectionError::NoSeries)
        );
        let one = vec![NamedSeries::new("Births", vec![1.0], RenderKind::Bar)];
        assert_eq!(
            project_grouped("t", labels(&["2000"]), one),
            Err(ProjectionError::TooFewSeries(1))
        );
    }

    #[test]
    fn extend_trend_keeps_datasets_aligned() {
        let mut chart = project_grouped(
            "t",
            labels(&["2000", "2001", "2002"]),
            vec![
                NamedSeries::new("Births", vec![10.0, 12.0, 14.0], RenderKind::Bar),
                NamedSeries::new("Deaths", vec![9.0, 8.0, 7.0], RenderKind::Bar),
            ],
        )
        .unwrap();
        chart.extend_trend().unwrap();
        assert_eq!(chart.labels, labels(&["2000", "2001", "2002", "2003"]));
        assert_eq!(chart.datasets[0].values, vec![10.0, 12.0, 14.0, 16.0]);
        assert_eq!(chart.datasets[1].values, vec![9.0, 8.0, 7.0, 6.0]);
    }

    #[test]
    fn extend_trend_failure_leaves_model_untouched() {
        let mut chart =
            project_single("t", labels(&["2000", "2001"]), "Population", vec![1.0, f64::NAN])
                .unwrap();
        let before_labels = chart.labels.clone();
        assert_eq!(
            chart.extend_trend(),
            Err(ExtrapolateError::MissingValue { index: 1 })
        );
        assert_eq!(chart.labels, before_labels);
        assert_eq!(chart.datasets[0].values.len(), 2);

        let mut short = project_single("t", labels(&["2000"]), "Population", vec![1.0]).unwrap();
        assert_eq!(
            short.extend_trend(),
            Err(ExtrapolateError::InsufficientData { len: 1 })
        );
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn births_deaths_page_rejects_partial_history() {
        let set = SeriesSet {
            labels: labels(&["2000", "2001"]),
            series: vec![
                (
                    MeasurementId::births(),
                    Series::new(labels(&["2000", "2001"]), vec![5.0, 6.0]).unwrap(),
                ),
                (
                    MeasurementId::deaths(),
                    Series::new(labels(&["2000"]), vec![4.0]).unwrap(),
                ),
            ],
        };
        let err = ChartPage::BirthsDeaths.build_chart(&set, "Helsinki").unwrap_err();
        assert!(matches!(err, ProjectionError::LengthMismatch { actual: 1, .. }));
    }

    #[test]
    fn population_page_builds_line_chart() {
        let set = SeriesSet {
            labels: labels(&["2000", "2001"]),
            series: vec![(
                MeasurementId::population(),
                Series::new(labels(&["2000", "2001"]), vec![5.0, 6.0]).unwrap(),
            )],
        };
        let chart = ChartPage::Population.build_chart(&set, "Helsinki").unwrap();
        assert_eq!(chart.title, "Population Over Years (Helsinki)");
        assert_eq!(chart.datasets[0].values, vec![5.0, 6.0]);

        let err = ChartPage::BirthsDeaths.build_chart(&set, "Helsinki").unwrap_err();
        assert_eq!(err, ProjectionError::MissingMeasurement(MeasurementId::births()));
    }
}
