use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points};

use crate::chart::{ChartModel, Dataset, RenderKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart model in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let chart = match &state.chart {
        Some(chart) => chart,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.loading || !state.directory_ready {
                    ui.spinner();
                } else {
                    ui.heading("No data to show  (pick a municipality on the left)");
                }
            });
            return;
        }
    };

    ui.heading(&chart.title);

    let labels = chart.labels.clone();
    Plot::new("chart_plot")
        .legend(Legend::default())
        .height(chart.height)
        .x_axis_label("Year")
        .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let n = chart.datasets.len();
            for (slot, ds) in chart.datasets.iter().enumerate() {
                match ds.render {
                    RenderKind::Line => draw_line(plot_ui, chart, ds),
                    RenderKind::Bar => draw_bars(plot_ui, chart, ds, slot, n),
                }
            }
        });
}

fn draw_line(plot_ui: &mut PlotUi, chart: &ChartModel, ds: &Dataset) {
    let points: Vec<[f64; 2]> = ds
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, &v)| [i as f64, v])
        .collect();

    if chart.dot_size > 0.0 {
        plot_ui.points(
            Points::new(PlotPoints::from(points.clone()))
                .name(&ds.name)
                .color(ds.color)
                .radius(chart.dot_size),
        );
    }
    plot_ui.line(
        Line::new(PlotPoints::from(points))
            .name(&ds.name)
            .color(ds.color)
            .width(2.0),
    );
}

fn draw_bars(plot_ui: &mut PlotUi, chart: &ChartModel, ds: &Dataset, slot: usize, n: usize) {
    let width = bar_width(n);
    let offset = bar_offset(slot, n);
    let bars: Vec<Bar> = ds
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, &v)| {
            Bar::new(i as f64 + offset, v)
                .width(width)
                .name(chart.labels.get(i).map(String::as_str).unwrap_or_default())
        })
        .collect();

    plot_ui.bar_chart(BarChart::new(bars).name(&ds.name).color(ds.color));
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label for an x position, blank between label indices.
pub fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Width of each bar when `n` bars share one label slot.
fn bar_width(n: usize) -> f64 {
    0.8 / n.max(1) as f64
}

/// Centre offset of bar `slot` out of `n` around its label index.
fn bar_offset(slot: usize, n: usize) -> f64 {
    (slot as f64 - (n.max(1) - 1) as f64 / 2.0) * bar_width(n)
}
