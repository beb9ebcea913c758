use eframe::egui;

use crate::config::AppConfig;
use crate::data::client::StatfinClient;
use crate::state::{AppState, ChartRequest, SELECTION_KEY};
use crate::ui::{panels, plot};
use crate::worker::FetchWorker;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct KuntastatApp {
    pub state: AppState,
    worker: FetchWorker,
}

impl KuntastatApp {
    /// Read the persisted selection and start loading the directory.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, client: StatfinClient) -> Self {
        let stored = cc.storage.and_then(|s| s.get_string(SELECTION_KEY));
        if let Some(code) = &stored {
            log::info!("Restoring last viewed region {code}");
        }

        let mut worker = FetchWorker::new(
            client,
            config.variables.clone(),
            Some(cc.egui_ctx.clone()),
        );
        worker.load_directory();

        Self {
            state: AppState::new(config, stored),
            worker,
        }
    }

    fn dispatch(&mut self, request: Option<ChartRequest>) {
        if let Some(ChartRequest { page, query }) = request {
            let generation = self.worker.fetch_chart(page, query);
            log::debug!("Submitted {} chart fetch #{generation}", page.label());
        }
    }
}

impl eframe::App for KuntastatApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // ---- Finished network jobs ----
        for outcome in self.worker.poll() {
            let next = self.state.apply_outcome(outcome);
            self.dispatch(next);
        }
        if let Some(code) = self.state.take_selection_update() {
            if let Some(storage) = frame.storage_mut() {
                storage.set_string(SELECTION_KEY, code.to_string());
            }
        }

        // ---- Top panel: page navigation ----
        let request = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;
        self.dispatch(request);

        // ---- Left side panel: municipality form ----
        let request = egui::SidePanel::left("municipality_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, &mut self.state))
            .inner;
        self.dispatch(request);

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.state);
        });

        panels::alert_window(ctx, &mut self.state);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(SELECTION_KEY, self.state.selection.to_string());
    }
}
