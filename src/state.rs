use crate::chart::{ChartModel, ChartPage};
use crate::config::AppConfig;
use crate::data::directory::{LookupError, MunicipalityDirectory};
use crate::data::extrapolate::ExtrapolateError;
use crate::data::model::{Query, RegionCode};
use crate::worker::{JobResult, Outcome};

/// Storage key of the last successfully viewed region code.
pub const SELECTION_KEY: &str = "municipalityCode";

/// A chart fetch the shell should hand to the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub page: ChartPage,
    pub query: Query,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Name → code lookup; empty until the directory job finishes (or if it failed).
    pub directory: MunicipalityDirectory,

    /// Whether the directory job has finished.
    pub directory_ready: bool,

    /// Page currently shown.
    pub page: ChartPage,

    /// Chart on screen. Replaced only by the newest successful fetch.
    pub chart: Option<ChartModel>,

    /// Last successfully viewed region.
    pub selection: RegionCode,

    /// Set when `selection` changed and has not been persisted yet.
    selection_dirty: bool,

    /// Contents of the municipality name field.
    pub name_input: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Modal notice (unknown municipality name).
    pub alert: Option<String>,

    /// Whether a chart fetch is in progress.
    pub loading: bool,
}

impl AppState {
    /// `stored_selection` is the persisted region code, if any.
    pub fn new(config: AppConfig, stored_selection: Option<String>) -> Self {
        let selection = stored_selection
            .filter(|code| !code.trim().is_empty())
            .map(RegionCode::new)
            .unwrap_or_else(|| config.default_region.clone());
        Self {
            config,
            directory: MunicipalityDirectory::default(),
            directory_ready: false,
            page: ChartPage::default(),
            chart: None,
            selection,
            selection_dirty: false,
            name_input: String::new(),
            status_message: None,
            alert: None,
            loading: false,
        }
    }

    /// Build the fetch for `page` and `region` over the configured years.
    pub fn chart_request(&mut self, page: ChartPage, region: RegionCode) -> Option<ChartRequest> {
        let query = Query::for_range(self.config.years, region, page.measurements())
            .and_then(|q| q.ensure_known(self.directory.measurements()).map(|()| q));
        match query {
            Ok(query) => {
                self.loading = true;
                Some(ChartRequest { page, query })
            }
            Err(e) => {
                log::error!("Cannot build query: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        }
    }

    /// Resolve the typed municipality name and request its chart.
    pub fn submit_name(&mut self) -> Result<Option<ChartRequest>, LookupError> {
        let code = match self.directory.resolve(&self.name_input) {
            Ok(code) => RegionCode::new(code),
            Err(e) => {
                log::warn!("{e}");
                self.alert = Some("Invalid municipality name".to_string());
                return Err(e);
            }
        };
        Ok(self.chart_request(self.page, code))
    }

    /// Request `page` for the current selection. The page switches once it arrives.
    pub fn show_page(&mut self, page: ChartPage) -> Option<ChartRequest> {
        self.chart_request(page, self.selection.clone())
    }

    /// Extend the displayed chart by one extrapolated point.
    pub fn predict(&mut self) -> Result<(), ExtrapolateError> {
        let Some(chart) = self.chart.as_mut() else {
            return Err(ExtrapolateError::InsufficientData { len: 0 });
        };
        match chart.extend_trend() {
            Ok(()) => {
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Cannot extrapolate: {e}");
                self.status_message = Some(format!("Cannot predict: {e}"));
                Err(e)
            }
        }
    }

    /// Apply a finished job. The directory completing yields the first chart request.
    pub fn apply_outcome(&mut self, outcome: Outcome) -> Option<ChartRequest> {
        match outcome.result {
            JobResult::Directory(directory) => {
                self.directory = directory;
                self.directory_ready = true;
                self.chart_request(self.page, self.selection.clone())
            }
            JobResult::Chart {
                page,
                query,
                result,
            } => {
                self.loading = false;
                let set = match result {
                    Ok(set) => set,
                    Err(e) => {
                        log::error!("Error fetching data: {e}");
                        self.status_message = Some(format!("Error: {e}"));
                        return None;
                    }
                };
                let region = query.region().clone();
                let name = self
                    .directory
                    .display_name(region.as_str())
                    .unwrap_or(region.as_str())
                    .to_string();
                match page.build_chart(&set, &name) {
                    Ok(chart) => {
                        self.chart = Some(chart);
                        self.page = page;
                        self.status_message = None;
                        self.selection = region;
                        self.selection_dirty = true;
                    }
                    Err(e) => {
                        log::error!("Cannot chart data for {region}: {e}");
                        self.status_message = Some(format!("Error: {e}"));
                    }
                }
                None
            }
        }
    }

    /// The selection to persist, once per successful fetch.
    pub fn take_selection_update(&mut self) -> Option<&RegionCode> {
        if std::mem::take(&mut self.selection_dirty) {
            Some(&self.selection)
        } else {
            None
        }
    }
}
