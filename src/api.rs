//! HTTP client for the training/prediction service

use crate::constants::{PREDICT_PATH, STATUS_PATH, TRAIN_PATH};
use crate::types::{ErrorBody, FeatureValues, ModelStatus, PredictionRequest, PredictionResponse, TrainResponse};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-ok HTTP status. `detail` is the server's message, if it sent one.
    #[error("server returned {status}")]
    Server {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    /// Connection, DNS, or decoding failure
    #[error("{0}")]
    Transport(String),
    /// The selected CSV could not be read
    #[error("{0}")]
    File(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// CSV file contents ready for upload
#[derive(Debug, Clone)]
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::File(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a CSV as multipart field `file` and train a new model.
    pub async fn train(&self, upload: CsvUpload) -> Result<TrainResponse, ApiError> {
        let url = self.url(TRAIN_PATH);
        debug!(url = %url, file = %upload.file_name, bytes = upload.bytes.len(), "Uploading dataset");
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);
        let response = self.http.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    pub async fn status(&self) -> Result<ModelStatus, ApiError> {
        let url = self.url(STATUS_PATH);
        debug!(url = %url, "Fetching model status");
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    pub async fn predict(&self, features: FeatureValues) -> Result<PredictionResponse, ApiError> {
        let url = self.url(PREDICT_PATH);
        debug!(url = %url, count = features.len(), "Requesting prediction");
        let response = self
            .http
            .post(&url)
            .json(&PredictionRequest { features })
            .send()
            .await?;
        read_json(response).await
    }
}

/// Status code decides the branch; the body is trusted accordingly.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let detail = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail_text()),
        Err(e) => {
            warn!(error = %e, "Failed to read error body");
            None
        }
    };
    warn!(status = %status, detail = ?detail, "Backend returned an error");
    Err(ApiError::Server { status, detail })
}
