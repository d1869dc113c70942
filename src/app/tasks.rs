//! Runs controller commands on the tokio runtime

use super::controller::{Command, Outcome};
use super::App;
use crate::api::{ApiClient, CsvUpload};
use eframe::egui;
use tracing::debug;

/// Perform one request. Exactly one HTTP call per command, awaited once.
pub(crate) async fn execute(client: &ApiClient, command: Command) -> Outcome {
    match command {
        Command::Train(path) => {
            let result = match CsvUpload::read(&path).await {
                Ok(upload) => client.train(upload).await,
                Err(e) => Err(e),
            };
            Outcome::Trained(result)
        }
        Command::FetchStatus(generation) => Outcome::Status(generation, client.status().await),
        Command::Predict(features) => Outcome::Predicted(client.predict(features).await),
    }
}

impl App {
    /// Spawn `command`; its outcome is picked up by `poll_outcomes`.
    pub(crate) fn dispatch(&self, ctx: &egui::Context, command: Command) {
        debug!(command = ?command, backend = %self.client.base_url(), "Dispatching request");
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = execute(&client, command).await;
            if tx.send(outcome).is_err() {
                debug!("Outcome dropped, receiver closed");
            }
            ctx.request_repaint();
        });
    }

    /// Apply finished requests on the UI thread, one at a time.
    pub(crate) fn poll_outcomes(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(follow_up) = self.controller.apply(outcome) {
                self.dispatch(ctx, follow_up);
            }
        }
    }
}
