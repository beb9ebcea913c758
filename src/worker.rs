use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;

use crate::chart::ChartPage;
use crate::data::client::{FetchError, StatfinClient};
use crate::data::directory::MunicipalityDirectory;
use crate::data::fetcher::fetch_series;
use crate::data::model::{Query, SeriesSet, VariableCodes};

// ---------------------------------------------------------------------------
// Job outcomes
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum JobResult {
    Directory(MunicipalityDirectory),
    Chart {
        page: ChartPage,
        query: Query,
        result: Result<SeriesSet, FetchError>,
    },
}

#[derive(Debug)]
pub struct Outcome {
    /// Chart generation the job was submitted under; 0 for the directory.
    pub generation: u64,
    pub result: JobResult,
}

// ---------------------------------------------------------------------------
// FetchWorker – network jobs off the UI thread
// ---------------------------------------------------------------------------

/// Runs each request on its own thread and hands results back over a channel.
///
/// Chart jobs are numbered; only the most recently submitted one is delivered.
pub struct FetchWorker {
    client: StatfinClient,
    codes: VariableCodes,
    repaint: Option<egui::Context>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
    generation: u64,
    in_flight: usize,
}

impl FetchWorker {
    pub fn new(client: StatfinClient, codes: VariableCodes, repaint: Option<egui::Context>) -> Self {
        let (tx, rx) = channel();
        FetchWorker {
            client,
            codes,
            repaint,
            tx,
            rx,
            generation: 0,
            in_flight: 0,
        }
    }

    /// Load the municipality directory. A failure delivers an empty directory.
    pub fn load_directory(&mut self) {
        let client = self.client.clone();
        let codes = self.codes.clone();
        self.spawn(move || Outcome {
            generation: 0,
            result: JobResult::Directory(MunicipalityDirectory::load_or_empty(&client, &codes)),
        });
    }

    /// Fetch the series for `page`; supersedes any chart job still running.
    pub fn fetch_chart(&mut self, page: ChartPage, query: Query) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let client = self.client.clone();
        let codes = self.codes.clone();
        self.spawn(move || {
            let result = fetch_series(&client, &query, &codes);
            Outcome {
                generation,
                result: JobResult::Chart {
                    page,
                    query,
                    result,
                },
            }
        });
        generation
    }

    /// Drain finished jobs without blocking, dropping superseded chart results.
    pub fn poll(&mut self) -> Vec<Outcome> {
        let mut ready = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if let Some(outcome) = self.accept(outcome) {
                ready.push(outcome);
            }
        }
        ready
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn accept(&self, outcome: Outcome) -> Option<Outcome> {
        let stale = matches!(outcome.result, JobResult::Chart { .. })
            && outcome.generation < self.generation;
        if stale {
            log::debug!(
                "Discarding chart result of generation {} (current {})",
                outcome.generation,
                self.generation
            );
            return None;
        }
        Some(outcome)
    }

    fn spawn(&mut self, job: impl FnOnce() -> Outcome + Send + 'static) {
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        self.in_flight += 1;
        std::thread::spawn(move || {
            // The receiver only disappears when the app is shutting down.
            let _ = tx.send(job());
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}
