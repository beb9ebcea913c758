use super::client::{FetchError, StatfinClient};
use super::model::{
    MeasurementId, Query, QueryResponse, RawObservation, Series, SeriesSet, VariableCodes,
};

/// Issue one query (years × region × measurements) and normalize the rows.
pub fn fetch_series(
    client: &StatfinClient,
    query: &Query,
    codes: &VariableCodes,
) -> Result<SeriesSet, FetchError> {
    let response = client.query(&query.to_request(codes))?;
    log::info!(
        "Fetched {} rows for region {} ({} measurements)",
        response.data.len(),
        query.region(),
        query.measurements().len()
    );
    Ok(normalize(&response, query, codes))
}

// ---------------------------------------------------------------------------
// Normalization: rows → one Series per measurement
// ---------------------------------------------------------------------------

/// Where a measurement's numbers live in a response row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Index into `values` (measurement is a content column).
    ValueColumn(usize),
    /// Index into `key`; matching rows carry the number in `values[0]`.
    KeyComponent(usize),
}

/// Turn a query response into series aligned with the year labels of its rows.
///
/// Labels keep source row order (first occurrence of each year) and are never
/// re-sorted. Unparseable values become `NaN`. A measurement with fewer rows
/// yields a shorter series.
pub fn normalize(response: &QueryResponse, query: &Query, codes: &VariableCodes) -> SeriesSet {
    let key_columns: Vec<&str> = response
        .columns
        .iter()
        .filter(|c| !c.is_content())
        .map(|c| c.code.as_str())
        .collect();
    let time_idx = key_columns
        .iter()
        .position(|c| *c == codes.year)
        .unwrap_or(0);

    let mut labels: Vec<String> = Vec::new();
    for row in &response.data {
        if let Some(year) = row.key.get(time_idx) {
            if !labels.contains(year) {
                labels.push(year.clone());
            }
        }
    }

    let series = query
        .measurements()
        .iter()
        .enumerate()
        .map(|(position, id)| {
            let layout = locate(response, &key_columns, codes, id, position);
            (id.clone(), extract(&response.data, time_idx, id, layout))
        })
        .collect();

    SeriesSet { labels, series }
}

fn locate(
    response: &QueryResponse,
    key_columns: &[&str],
    codes: &VariableCodes,
    id: &MeasurementId,
    position: usize,
) -> Layout {
    if !response.columns.is_empty() {
        let content = response
            .columns
            .iter()
            .filter(|c| c.is_content())
            .position(|c| c.code == id.0);
        if let Some(j) = content {
            return Layout::ValueColumn(j);
        }
        if let Some(k) = key_columns.iter().position(|c| *c == codes.measurement) {
            return Layout::KeyComponent(k);
        }
        return Layout::ValueColumn(position);
    }

    let keyed = response.data.first().is_some_and(|row| row.key.len() > 2);
    if keyed {
        Layout::KeyComponent(2)
    } else {
        Layout::ValueColumn(position)
    }
}

fn extract(rows: &[RawObservation], time_idx: usize, id: &MeasurementId, layout: Layout) -> Series {
    let points = rows.iter().filter_map(|row| {
        let label = row.key.get(time_idx)?.clone();
        let cell = match layout {
            Layout::ValueColumn(j) => row.values.get(j),
            Layout::KeyComponent(k) => {
                if row.key.get(k) != Some(&id.0) {
                    return None;
                }
                row.values.first()
            }
        };
        Some((label, parse_value(cell)))
    });
    Series::from_points(points)
}

/// Integer value of a cell, `NaN` when absent or not a number (`".."`).
fn parse_value(cell: Option<&String>) -> f64 {
    let Some(text) = cell.map(|s| s.trim()) else {
        return f64::NAN;
    };
    if let Ok(v) = text.parse::<i64>() {
        return v as f64;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc(),
        _ => f64::NAN,
    }
}
