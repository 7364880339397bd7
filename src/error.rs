use thiserror::Error;

// Error types for feed fetching and normalization
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Feed responded with status {status_code} for {url}")]
    StatusError { status_code: u16, url: String },

    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Missing required field <{field}> in <{element}>")]
    MissingRequiredField { element: String, field: String },

    #[error("Client error: {0}")]
    ClientError(String),
}

impl FeedError {
    // Network failures leave the affected list empty instead of propagating
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FeedError::NetworkError(_) | FeedError::StatusError { .. }
        )
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FeedError::StatusError {
                status_code: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None if err.is_builder() => FeedError::ClientError(err.to_string()),
            None => FeedError::NetworkError(err.to_string()),
        }
    }
}
