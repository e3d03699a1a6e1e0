use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImpactError {
    #[error("tracker not configured: {0}")]
    TrackerNotConfigured(String),

    #[error("malformed tracker response: {0}")]
    MalformedResponse(String),

    #[error("malformed timestamp '{value}' on item {key}")]
    Timestamp { key: String, value: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ImpactError>;
