//! Application constants and configuration

pub const APP_NAME: &str = "Naive Bayes Desk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when settings.json has none and no override is set
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8500";
/// Environment variable that overrides the configured backend for one session
pub const BACKEND_URL_ENV: &str = "NB_BACKEND_URL";

pub const TRAIN_PATH: &str = "/train";
pub const STATUS_PATH: &str = "/status";
pub const PREDICT_PATH: &str = "/predict";
pub const DOCS_PATH: &str = "/docs";

/// Status string the backend reports once a model exists
pub const MODEL_TRAINED_STATUS: &str = "Model trained";

/// Prefix for prediction input ids, followed by the feature name
pub const FEATURE_ID_PREFIX: &str = "feature-";
