//! App module - owns the client state, the runtime, and the backend client

pub mod controller;
mod tasks;
mod views;

use crate::api::ApiClient;
use crate::constants::*;
use crate::settings::Settings;
use crate::theme;
use controller::Controller;
use controller::Outcome;
use eframe::egui;
use std::path::PathBuf;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) controller: Controller,
    pub(crate) client: ApiClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) outcome_tx: UnboundedSender<Outcome>,
    pub(crate) outcome_rx: UnboundedReceiver<Outcome>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) show_settings: bool,
    pub(crate) backend_url_input: String,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) initial_fetch_done: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("backend-io")
            .enable_all()
            .build()?;

        let backend_url = settings.effective_backend_url();
        info!(backend = %backend_url, "Backend configured");
        let (outcome_tx, outcome_rx) = unbounded_channel();

        Ok(Self {
            controller: Controller::new(),
            client: ApiClient::new(&backend_url),
            runtime,
            outcome_tx,
            outcome_rx,
            backend_url_input: backend_url,
            settings,
            show_settings: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            initial_fetch_done: false,
            data_dir,
        })
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    /// Status fetch issued once, on the first frame.
    pub(crate) fn fetch_initial_status(&mut self, ctx: &egui::Context) {
        if self.initial_fetch_done {
            return;
        }
        self.initial_fetch_done = true;
        let command = self.controller.refresh_status();
        self.dispatch(ctx, command);
    }

    pub(crate) fn refresh_status(&mut self, ctx: &egui::Context) {
        let command = self.controller.refresh_status();
        self.dispatch(ctx, command);
    }

    pub(crate) fn submit_training(&mut self, ctx: &egui::Context) {
        if let Some(command) = self.controller.submit_training() {
            self.dispatch(ctx, command);
        }
    }

    pub(crate) fn submit_prediction(&mut self, ctx: &egui::Context) {
        if let Some(command) = self.controller.submit_prediction() {
            self.dispatch(ctx, command);
        }
    }

    /// Native file dialog filtered to CSV
    pub(crate) fn pick_csv(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Choose a training dataset")
            .add_filter("CSV", &["csv"]);
        if let Some(dir) = self.settings.last_csv_dir() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            info!(path = %path.display(), "Dataset selected");
            self.settings.last_csv_dir = path.parent().map(|p| p.to_string_lossy().into_owned());
            self.controller.select_csv(Some(path));
        }
    }

    /// Point the client at the URL typed in settings, save it, and re-fetch status.
    /// Requests still running against the old backend report into a dropped channel.
    pub(crate) fn apply_backend_url(&mut self, ctx: &egui::Context) {
        let url = self.backend_url_input.trim().to_string();
        if url.is_empty() {
            return;
        }
        info!(old = %self.client.base_url(), new = %url, "Backend changed");
        self.client = ApiClient::new(&url);
        let (outcome_tx, outcome_rx) = unbounded_channel();
        self.outcome_tx = outcome_tx;
        self.outcome_rx = outcome_rx;
        self.settings.backend_url = url;
        self.save_settings();
        let command = self.controller.backend_changed();
        self.dispatch(ctx, command);
    }

    pub(crate) fn open_docs(&self) {
        let url = self.client.url(DOCS_PATH);
        if let Err(e) = open::that(&url) {
            warn!(error = %e, url = %url, "Failed to open API docs");
        }
    }
}
