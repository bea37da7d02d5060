use thiserror::Error;

/// Failure categories for backend requests.
///
/// One variant per category so callers can branch programmatically; the
/// `Display` text is the user-facing message shown in the verification
/// stepper and store error fields.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("Connection timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Could not connect to backend server. Please check the URL.")]
    Connection(String),

    #[error("Authentication failed. Please check your credentials.")]
    AuthFailed,

    #[error("Access forbidden. Please check your permissions.")]
    Forbidden,

    #[error("{operation} endpoint not found. Please verify the backend URL.")]
    EndpointMissing { operation: String },

    #[error("Backend server error. Please try again later.")]
    Server { status: u16 },

    #[error("Backend returned error: {status}")]
    Unexpected { status: u16 },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

/// Coarse error category, one per taxonomy entry. Step states in the
/// verification stepper keep this alongside the display message so callers
/// can branch without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Timeout,
    Connection,
    Auth,
    Forbidden,
    NotFound,
    Server,
    Unexpected,
    InvalidResponse,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::InvalidUrl(_) => ErrorCategory::Config,
            ClientError::Timeout { .. } => ErrorCategory::Timeout,
            ClientError::Connection(_) => ErrorCategory::Connection,
            ClientError::AuthFailed => ErrorCategory::Auth,
            ClientError::Forbidden => ErrorCategory::Forbidden,
            ClientError::EndpointMissing { .. } => ErrorCategory::NotFound,
            ClientError::Server { .. } => ErrorCategory::Server,
            ClientError::Unexpected { .. } => ErrorCategory::Unexpected,
            ClientError::InvalidResponse(_) => ErrorCategory::InvalidResponse,
        }
    }

    /// Map a transport-level reqwest failure, given the request deadline that
    /// applied.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                seconds: timeout_secs,
            }
        } else {
            ClientError::Connection(err.to_string())
        }
    }

    /// Map a non-success HTTP status.
    pub fn from_status(status: u16, operation: &str) -> Self {
        match status {
            401 => ClientError::AuthFailed,
            403 => ClientError::Forbidden,
            404 => ClientError::EndpointMissing {
                operation: operation.to_string(),
            },
            s if s >= 500 => ClientError::Server { status: s },
            s => ClientError::Unexpected { status: s },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
