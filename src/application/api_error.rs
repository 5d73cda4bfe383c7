// Failures of calls against the content backend
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("the content API base URL is not configured")]
    NotConfigured,
    #[error("no bearer token in the current session")]
    MissingToken,
    #[error("request rejected with status {status}")]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 401/403 from a privileged endpoint.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text shown to the user in a notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotConfigured => "The content API is not configured.".to_string(),
            ApiError::MissingToken => "Sign in as an editor to continue.".to_string(),
            ApiError::Unauthorized {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Unauthorized { message: None, .. } => {
                "Your session has expired. Sign in again.".to_string()
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(_) => "Could not reach the server. Try again.".to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}
