//! User-facing text

use crate::api::ApiError;

pub const MISSING_FILE: &str = "Please choose a CSV file.";
pub const NO_TRAINED_MODEL: &str = "No trained model. Please train a model first.";
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
pub const RETRY_FALLBACK: &str = "Please try again.";

pub const STATUS_TRAINED: &str = "Model trained";
pub const STATUS_UNTRAINED: &str = "No trained model";
pub const EMPTY_VALUE: &str = "--";

/// Which action an error belongs to; picks the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Train,
    Status,
    Predict,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Train => "Training failed",
            Action::Status => "Failed to get status",
            Action::Predict => "Prediction failed",
        }
    }
}

pub fn training_succeeded(accuracy: f64) -> String {
    format!("Model trained successfully! Accuracy: {}", percent(accuracy))
}

pub fn action_failed(action: Action, err: &ApiError) -> String {
    match err {
        ApiError::Server { detail, .. } => format!(
            "{}: {}",
            action.failure_prefix(),
            detail.as_deref().filter(|d| !d.is_empty()).unwrap_or(RETRY_FALLBACK)
        ),
        ApiError::Transport(msg) => format!("Could not reach the server: {}", msg),
        ApiError::File(msg) => format!("Could not read the selected file: {}", msg),
    }
}

/// Value already on a 0-100 scale, two decimals
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn accuracy_text(accuracy: Option<f64>) -> String {
    accuracy.map(percent).unwrap_or_else(|| EMPTY_VALUE.to_string())
}

pub fn target_column_text(target: Option<&str>) -> String {
    match target {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => EMPTY_VALUE.to_string(),
    }
}

pub fn prediction_heading(label: &str) -> String {
    format!("Prediction: {}", label)
}

/// `probability` is in [0, 1]
pub fn probability_line(label: &str, probability: f64) -> String {
    format!("{}: {}", label, percent(probability * 100.0))
}

pub fn select_placeholder(feature: &str) -> String {
    format!("Choose {}...", feature)
}

pub fn text_placeholder(feature: &str) -> String {
    format!("Enter a value for {}", feature)
}
