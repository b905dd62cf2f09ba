use thiserror::Error;

/// Errors surfaced by the weather SDK
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("Invalid API key")]
    InvalidCredential,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify a transport-level failure for a lookup of `city`.
    pub fn from_http(err: HttpError, city: &str) -> Self {
        match err {
            HttpError::Status { status: 401, .. } => Self::InvalidCredential,
            HttpError::Status { status: 404, .. } => Self::CityNotFound(city.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Failures of a single HTTP exchange
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::Timeout(_) | HttpError::Network(_) => true,
            HttpError::Status { status, .. } => *status == 429 || *status >= 500,
            HttpError::Parse(_) | HttpError::Build(_) => false,
        }
    }
}

impl From<HttpError> for WeatherError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.to_string())
    }
}
