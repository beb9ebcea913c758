use eframe::egui::{self, Color32, Key, RichText, Ui};

use crate::chart::ChartPage;
use crate::state::{AppState, ChartRequest};

// ---------------------------------------------------------------------------
// Left side panel – municipality form and prediction
// ---------------------------------------------------------------------------

/// Render the left panel. Returns a chart fetch when the form was submitted.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> Option<ChartRequest> {
    let mut request = None;

    ui.heading("Municipality");
    ui.separator();

    if !state.directory_ready {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("Loading municipality names…");
        });
    } else if state.directory.is_empty() {
        ui.label(RichText::new("Municipality names unavailable.").color(Color32::RED));
    } else {
        ui.label(format!("{} names known", state.directory.len()));
    }
    ui.add_space(4.0);

    let input = ui.add_enabled(
        state.directory_ready,
        egui::TextEdit::singleline(&mut state.name_input).hint_text("e.g. Helsinki"),
    );
    let entered = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
    let clicked = ui
        .add_enabled(state.directory_ready, egui::Button::new("Show"))
        .clicked();
    if entered || clicked {
        // An unknown name is reported through `state.alert`.
        request = state.submit_name().ok().flatten();
    }

    ui.separator();

    ui.strong("Trend");
    let can_predict = state.chart.is_some() && !state.loading;
    if ui
        .add_enabled(can_predict, egui::Button::new("Predict next year"))
        .on_hover_text("Append one point using the mean yearly change")
        .clicked()
    {
        // Failures are shown in the status line.
        let _ = state.predict();
    }

    ui.separator();
    ui.label(format!("Selected region: {}", state.selection));

    request
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar with page navigation. Returns a fetch on page change.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<ChartRequest> {
    let mut request = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        for page in ChartPage::ALL {
            if ui
                .selectable_label(state.page == page, page.label())
                .clicked()
            {
                request = state.show_page(page);
            }
        }

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(chart) = &state.chart {
            ui.label(format!("{} years shown", chart.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    request
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// Modal notice for rejected input.
pub fn alert_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alert.clone() else {
        return;
    };
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                state.alert = None;
            }
        });
}
