#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, broken body, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend responded with {status}{}", .message.as_deref().map(|message| format!(": {message}")).unwrap_or_default())]
    Status {
        status: reqwest::StatusCode,
        /// Taken from an `{"error": "..."}` body when the backend sends one.
        message: Option<String>,
    },
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("invalid base url {0:?}")]
    InvalidUrl(String),
}
impl ApiError {
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }

        Self::Status {
            status,
            message: serde_json::from_str::<ErrorBody>(body).ok().map(|body| body.error),
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(error) => error.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}
