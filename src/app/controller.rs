//! Client state and the handlers that mutate it
//!
//! Handlers never touch the network. They validate, update state, and hand
//! back a `Command` for the app to run; results come back as an `Outcome`.

use crate::api::ApiError;
use crate::form::{self, FormField, FormInputs, ValidationError};
use crate::messages::{self, Action};
use crate::types::{FeatureSchema, FeatureValues, ModelStatus, PredictionResponse, TrainResponse};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Request the controller wants executed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Train(PathBuf),
    /// Tagged with the status generation it was issued under
    FetchStatus(u64),
    Predict(FeatureValues),
}

/// Result of a `Command`
#[derive(Debug)]
pub enum Outcome {
    Trained(Result<TrainResponse, ApiError>),
    Status(u64, Result<ModelStatus, ApiError>),
    Predicted(Result<PredictionResponse, ApiError>),
}

/// Whether the backend has a model, as of the last successful status fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelState {
    #[default]
    Untrained,
    Trained {
        schema: FeatureSchema,
        form: Vec<FormField>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub tone: Tone,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self { tone: Tone::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { tone: Tone::Error, text: text.into() }
    }
}

/// Status panel text
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    pub status: String,
    pub accuracy: String,
    pub target_column: String,
    pub refreshed_at: Option<DateTime<Local>>,
}

impl Default for StatusSummary {
    fn default() -> Self {
        Self {
            status: messages::EMPTY_VALUE.to_string(),
            accuracy: messages::EMPTY_VALUE.to_string(),
            target_column: messages::EMPTY_VALUE.to_string(),
            refreshed_at: None,
        }
    }
}

/// One class row of a prediction result
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRow {
    pub label: String,
    pub probability: f64,
}

impl ClassRow {
    pub fn percent(&self) -> String {
        messages::percent(self.probability * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub label: String,
    pub rows: Vec<ClassRow>,
}

impl PredictionView {
    fn from_response(response: PredictionResponse) -> Self {
        Self {
            label: response.prediction,
            rows: response
                .full_results
                .iter()
                .map(|(label, p)| ClassRow { label: label.to_string(), probability: *p })
                .collect(),
        }
    }

    pub fn heading(&self) -> String {
        messages::prediction_heading(&self.label)
    }

    /// `"label: 73.20%"` per class, in response order
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| messages::probability_line(&r.label, r.probability))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionPanel {
    Failed(String),
    Result(PredictionView),
}

/// Requests currently awaiting a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub training: bool,
    pub status: bool,
    pub predicting: bool,
}

#[derive(Debug, Default)]
pub struct Controller {
    pub(crate) model: ModelState,
    pub(crate) inputs: FormInputs,
    pub(crate) selected_csv: Option<PathBuf>,
    pub(crate) upload_message: Option<Banner>,
    pub(crate) summary: StatusSummary,
    pub(crate) status_error: Option<String>,
    pub(crate) prediction: Option<PredictionPanel>,
    pub(crate) in_flight: InFlight,
    /// Only the status response for the newest `FetchStatus` is applied.
    status_generation: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prediction_visible(&self) -> bool {
        matches!(self.model, ModelState::Trained { .. })
    }

    /// Put every prediction input back to its initial value.
    pub fn reset_inputs(&mut self) {
        if let ModelState::Trained { form, .. } = &self.model {
            self.inputs = FormInputs::for_fields(form);
        }
        self.prediction = None;
    }

    pub fn select_csv(&mut self, path: Option<PathBuf>) {
        self.selected_csv = path;
    }

    /// Upload form submitted.
    pub fn submit_training(&mut self) -> Option<Command> {
        self.upload_message = None;
        let Some(path) = self.selected_csv.clone() else {
            self.upload_message = Some(Banner::error(ValidationError::MissingFile.to_string()));
            return None;
        };
        info!(path = %path.display(), "Training requested");
        self.in_flight.training = true;
        Some(Command::Train(path))
    }

    /// Page load or manual refresh.
    pub fn refresh_status(&mut self) -> Command {
        self.in_flight.status = true;
        self.status_generation += 1;
        Command::FetchStatus(self.status_generation)
    }

    /// Backend URL changed. Everything learned from the old backend is dropped
    /// and status is fetched from the new one.
    pub fn backend_changed(&mut self) -> Command {
        self.model = ModelState::Untrained;
        self.inputs.clear();
        self.upload_message = None;
        self.status_error = None;
        self.prediction = None;
        self.summary = StatusSummary::default();
        self.in_flight = InFlight::default();
        self.refresh_status()
    }

    /// Prediction form submitted.
    pub fn submit_prediction(&mut self) -> Option<Command> {
        self.prediction = None;
        let result = match &self.model {
            ModelState::Untrained => Err(ValidationError::NoTrainedModel),
            ModelState::Trained { schema, .. } => form::collect_features(schema, &self.inputs),
        };
        match result {
            Ok(features) => {
                info!(count = features.len(), "Prediction requested");
                self.in_flight.predicting = true;
                Some(Command::Predict(features))
            }
            Err(e) => {
                debug!(error = ?e, "Prediction form rejected");
                self.prediction = Some(PredictionPanel::Failed(e.to_string()));
                None
            }
        }
    }

    /// Apply a finished request. May ask for a follow-up request.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Command> {
        match outcome {
            Outcome::Trained(result) => {
                self.in_flight.training = false;
                match result {
                    Ok(response) => {
                        info!(
                            accuracy = response.accuracy,
                            server_message = ?response.message,
                            target = ?response.target_column,
                            features = response.features.as_ref().map(|f| f.len()),
                            "Model trained"
                        );
                        self.upload_message = Some(Banner::success(messages::training_succeeded(response.accuracy)));
                        Some(self.refresh_status())
                    }
                    Err(e) => {
                        warn!(error = %e, "Training failed");
                        self.upload_message = Some(Banner::error(messages::action_failed(Action::Train, &e)));
                        None
                    }
                }
            }
            Outcome::Status(generation, result) => {
                if generation != self.status_generation {
                    debug!(generation, latest = self.status_generation, "Dropping superseded status response");
                    return None;
                }
                self.in_flight.status = false;
                match result {
                    Ok(status) => self.apply_status(status),
                    // Cached schema and form stay as they were
                    Err(e) => {
                        warn!(error = %e, "Status fetch failed");
                        self.status_error = Some(messages::action_failed(Action::Status, &e));
                    }
                }
                None
            }
            Outcome::Predicted(result) => {
                self.in_flight.predicting = false;
                self.prediction = Some(match result {
                    Ok(response) => {
                        info!(
                            prediction = %response.prediction,
                            probability = ?response.full_results.get(&response.prediction),
                            "Prediction received"
                        );
                        PredictionPanel::Result(PredictionView::from_response(response))
                    }
                    Err(e) => {
                        warn!(error = %e, "Prediction failed");
                        PredictionPanel::Failed(messages::action_failed(Action::Predict, &e))
                    }
                });
                None
            }
        }
    }

    fn apply_status(&mut self, status: ModelStatus) {
        let trained = status.is_trained();
        self.status_error = None;
        self.summary = StatusSummary {
            status: (if trained { messages::STATUS_TRAINED } else { messages::STATUS_UNTRAINED }).to_string(),
            accuracy: messages::accuracy_text(status.accuracy),
            target_column: messages::target_column_text(status.target_column.as_deref()),
            refreshed_at: Some(Local::now()),
        };

        match status.features {
            Some(schema) if trained => {
                if schema.is_empty() {
                    warn!("Trained model reported no features");
                }
                let form = form::build_form(&schema);
                info!(features = form.len(), "Prediction form rebuilt");
                self.inputs = FormInputs::for_fields(&form);
                self.model = ModelState::Trained { schema, form };
            }
            _ => {
                debug!(status = %status.status, "No trained model, hiding prediction form");
                self.inputs.clear();
                self.model = ModelState::Untrained;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassProbabilities;

    fn trained_status(features: &[(&str, Vec<&str>)]) -> ModelStatus {
        ModelStatus {
            status: "Model trained".into(),
            accuracy: Some(88.0),
            target_column: Some("play".into()),
            features: Some(
                features
                    .iter()
                    .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
                    .collect(),
            ),
        }
    }

    fn untrained_status() -> ModelStatus {
        ModelStatus {
            status: "No model trained".into(),
            accuracy: None,
            target_column: None,
            features: None,
        }
    }

    fn server_error(detail: Option<&str>) -> ApiError {
        ApiError::Server {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.map(str::to_string),
        }
    }

    fn trained_controller() -> Controller {
        let mut c = Controller::new();
        c.apply(Outcome::Status(c.status_generation, Ok(trained_status(&[("age", vec![]), ("color", vec!["red", "blue"])]))));
        c
    }

    #[test]
    fn training_without_file_issues_no_command() {
        let mut c = Controller::new();
        assert_eq!(c.submit_training(), None);
        assert_eq!(c.upload_message, Some(Banner::error(messages::MISSING_FILE)));
        assert!(!c.in_flight.training);
    }

    #[test]
    fn training_with_file_issues_train_command() {
        let mut c = Controller::new();
        c.upload_message = Some(Banner::error("old"));
        c.select_csv(Some(PathBuf::from("/data/weather.csv")));
        assert_eq!(c.submit_training(), Some(Command::Train(PathBuf::from("/data/weather.csv"))));
        assert_eq!(c.upload_message, None);
        assert!(c.in_flight.training);
    }

    #[test]
    fn training_success_reports_accuracy_and_refetches_status() {
        let mut c = Controller::new();
        let follow_up = c.apply(Outcome::Trained(Ok(TrainResponse {
            accuracy: 87.5,
            message: None,
            target_column: None,
            features: None,
        })));
        assert_eq!(follow_up, Some(Command::FetchStatus(c.status_generation)));
        let banner = c.upload_message.unwrap();
        assert_eq!(banner.tone, Tone::Success);
        assert!(banner.text.contains("87.50%"));
        // Training alone does not change the model state
        assert_eq!(c.model, ModelState::Untrained);
    }

    #[test]
    fn training_failure_leaves_prediction_ui_alone() {
        let mut c = trained_controller();
        let before = c.model.clone();
        let follow_up = c.apply(Outcome::Trained(Err(server_error(Some("Only CSV files are allowed.")))));
        assert_eq!(follow_up, None);
        assert_eq!(
            c.upload_message,
            Some(Banner::error("Training failed: Only CSV files are allowed."))
        );
        assert_eq!(c.model, before);
    }

    #[test]
    fn trained_status_builds_form_and_reveals_section() {
        let c = trained_controller();
        assert!(c.prediction_visible());
        assert_eq!(c.summary.status, messages::STATUS_TRAINED);
        assert_eq!(c.summary.accuracy, "88.00%");
        assert_eq!(c.summary.target_column, "play");
        assert!(c.summary.refreshed_at.is_some());

        let ModelState::Trained { form, .. } = &c.model else {
            panic!("expected trained state");
        };
        let ids: Vec<&str> = form.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["feature-age", "feature-color"]);
        assert_eq!(c.inputs.get("feature-age"), Some(""));
        assert_eq!(c.inputs.get("feature-color"), Some(""));
    }

    #[test]
    fn rebuild_drops_inputs_from_previous_schema() {
        let mut c = trained_controller();
        c.inputs.set("feature-age", "30");
        c.apply(Outcome::Status(c.status_generation, Ok(trained_status(&[("height", vec![])]))));
        assert_eq!(c.inputs.get("feature-age"), None);
        assert_eq!(c.inputs.get("feature-height"), Some(""));
    }

    #[test]
    fn untrained_status_clears_schema_regardless_of_prior_state() {
        let mut c = trained_controller();
        c.apply(Outcome::Status(c.status_generation, Ok(untrained_status())));
        assert_eq!(c.model, ModelState::Untrained);
        assert!(!c.prediction_visible());
        assert_eq!(c.inputs.get("feature-age"), None);
        assert_eq!(c.inputs.get("feature-color"), None);
        assert_eq!(c.summary.status, messages::STATUS_UNTRAINED);
        assert_eq!(c.summary.accuracy, "--");
        assert_eq!(c.summary.target_column, "--");
    }

    #[test]
    fn trained_status_without_features_is_untrained() {
        let mut c = trained_controller();
        let mut status = trained_status(&[]);
        status.features = None;
        c.apply(Outcome::Status(c.status_generation, Ok(status)));
        assert_eq!(c.model, ModelState::Untrained);
    }

    #[test]
    fn status_failure_keeps_previous_form() {
        let mut c = trained_controller();
        c.inputs.set("feature-age", "30");
        let before = c.model.clone();
        c.apply(Outcome::Status(c.status_generation, Err(ApiError::Transport("connection refused".into()))));
        assert_eq!(c.model, before);
        assert!(c.prediction_visible());
        assert_eq!(c.inputs.get("feature-age"), Some("30"));
        assert_eq!(c.status_error.as_deref(), Some("Could not reach the server: connection refused"));
    }

    #[test]
    fn status_success_clears_previous_error() {
        let mut c = Controller::new();
        c.apply(Outcome::Status(c.status_generation, Err(server_error(None))));
        assert_eq!(c.status_error.as_deref(), Some("Failed to get status: Please try again."));
        c.apply(Outcome::Status(c.status_generation, Ok(untrained_status())));
        assert_eq!(c.status_error, None);
    }

    #[test]
    fn superseded_status_response_is_ignored() {
        let mut c = Controller::new();
        c.select_csv(Some(PathBuf::from("/data/weather.csv")));
        c.submit_training();
        let Command::FetchStatus(manual) = c.refresh_status() else {
            panic!("expected status command");
        };
        let Some(Command::FetchStatus(after_training)) = c.apply(Outcome::Trained(Ok(TrainResponse {
            accuracy: 90.0,
            message: None,
            target_column: None,
            features: None,
        }))) else {
            panic!("expected status re-fetch");
        };
        assert!(after_training > manual);

        c.apply(Outcome::Status(after_training, Ok(trained_status(&[("age", vec![])]))));
        assert!(c.prediction_visible());
        assert!(!c.in_flight.status);

        // Issued before training finished, arrives last
        c.apply(Outcome::Status(manual, Ok(untrained_status())));
        assert!(c.prediction_visible());
        assert_eq!(c.summary.status, messages::STATUS_TRAINED);
    }

    #[test]
    fn status_spinner_stays_until_latest_response() {
        let mut c = Controller::new();
        let Command::FetchStatus(first) = c.refresh_status() else {
            panic!("expected status command");
        };
        let Command::FetchStatus(second) = c.refresh_status() else {
            panic!("expected status command");
        };
        c.apply(Outcome::Status(first, Ok(untrained_status())));
        assert!(c.in_flight.status);
        c.apply(Outcome::Status(second, Ok(untrained_status())));
        assert!(!c.in_flight.status);
    }

    #[test]
    fn backend_change_forgets_old_backend() {
        let mut c = trained_controller();
        let old = c.status_generation;
        c.in_flight.predicting = true;
        c.prediction = Some(PredictionPanel::Failed("x".into()));

        let command = c.backend_changed();
        assert!(matches!(command, Command::FetchStatus(g) if g > old));
        assert_eq!(c.model, ModelState::Untrained);
        assert_eq!(c.prediction, None);
        assert_eq!(c.summary.status, messages::EMPTY_VALUE);
        assert!(!c.in_flight.predicting);
        assert!(c.in_flight.status);

        c.apply(Outcome::Status(old, Ok(trained_status(&[("age", vec![])]))));
        assert!(!c.prediction_visible());
    }

    #[test]
    fn reset_restores_placeholders() {
        let mut c = trained_controller();
        c.inputs.set("feature-age", "30");
        c.inputs.set("feature-color", "red");
        c.prediction = Some(PredictionPanel::Failed("old".into()));
        c.reset_inputs();
        assert_eq!(c.inputs.get("feature-age"), Some(""));
        assert_eq!(c.inputs.get("feature-color"), Some(""));
        assert_eq!(c.prediction, None);
    }

    #[test]
    fn prediction_without_model_is_rejected() {
        let mut c = Controller::new();
        assert_eq!(c.submit_prediction(), None);
        assert_eq!(c.prediction, Some(PredictionPanel::Failed(messages::NO_TRAINED_MODEL.into())));
    }

    #[test]
    fn prediction_with_blank_field_is_rejected() {
        let mut c = trained_controller();
        c.inputs.set("feature-color", "red");
        assert_eq!(c.submit_prediction(), None);
        assert_eq!(c.prediction, Some(PredictionPanel::Failed(messages::FILL_ALL_FIELDS.into())));
        assert!(!c.in_flight.predicting);
    }

    #[test]
    fn complete_form_issues_predict_command() {
        let mut c = trained_controller();
        c.inputs.set("feature-age", " 30 ");
        c.inputs.set("feature-color", "blue");
        let Some(Command::Predict(features)) = c.submit_prediction() else {
            panic!("expected predict command");
        };
        assert_eq!(features.get("age").map(String::as_str), Some("30"));
        assert_eq!(features.get("color").map(String::as_str), Some("blue"));
        assert!(c.in_flight.predicting);
    }

    #[test]
    fn prediction_result_renders_in_response_order() {
        let mut c = trained_controller();
        let full_results: ClassProbabilities = [("yes", 0.732), ("no", 0.268)]
            .into_iter()
            .map(|(k, p)| (k.to_string(), p))
            .collect();
        c.apply(Outcome::Predicted(Ok(PredictionResponse {
            prediction: "yes".into(),
            full_results,
        })));
        let Some(PredictionPanel::Result(view)) = &c.prediction else {
            panic!("expected a result");
        };
        assert!(view.heading().contains("yes"));
        assert_eq!(view.lines(), ["yes: 73.20%", "no: 26.80%"]);
    }

    #[test]
    fn prediction_server_error_shows_detail() {
        let mut c = trained_controller();
        c.apply(Outcome::Predicted(Err(server_error(Some("Missing features in input.")))));
        assert_eq!(
            c.prediction,
            Some(PredictionPanel::Failed("Prediction failed: Missing features in input.".into()))
        );
    }
}
