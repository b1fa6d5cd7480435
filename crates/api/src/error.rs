use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected HTTP status: {status} - {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed JSON response: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::HttpStatus { status, .. } if (400..500).contains(status))
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed(_) => Some("Check your network connection and the API base URL"),
            ApiError::InvalidUrl(_) => {
                Some("Set a valid base URL using: userlist config set-url <URL>")
            }
            ApiError::HttpStatus { .. } if self.is_client_error() => {
                Some("Review the page and results parameters")
            }
            ApiError::HttpStatus { .. } => Some("The API is unavailable, try again later"),
            ApiError::JsonError(_) | ApiError::InvalidResponse(_) => {
                Some("Verify the base URL points at a user list API")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
