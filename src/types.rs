//! Wire types for the training/prediction service

use crate::constants::MODEL_TRAINED_STATUS;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// Objects from the service are kept in the order the server wrote the keys;
// the form and the result list are rendered in that order.

/// Feature name -> allowed values (empty means free-form input)
pub type FeatureSchema = IndexMap<String, Vec<String>>;
/// Feature name -> value typed or chosen by the user
pub type FeatureValues = IndexMap<String, String>;
/// Class label -> probability in [0, 1]
pub type ClassProbabilities = IndexMap<String, f64>;

/// `GET /status` response
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStatus {
    pub status: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub features: Option<FeatureSchema>,
}

impl ModelStatus {
    pub fn is_trained(&self) -> bool {
        self.status == MODEL_TRAINED_STATUS
    }
}

/// `POST /train` response
#[derive(Debug, Clone, Deserialize)]
pub struct TrainResponse {
    pub accuracy: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub features: Option<FeatureSchema>,
}

/// `POST /predict` body
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub features: FeatureValues,
}

/// `POST /predict` response
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub full_results: ClassProbabilities,
}

/// Body of a non-ok response.
///
/// `detail` is usually a string; request validation failures send a list of
/// `{loc, msg, type}` objects instead.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    Some(serde_json::Value::Array(items.clone()).to_string())
                } else {
                    Some(msgs.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}
