use thiserror::Error;

/// Longest response body kept inside a [`ServiceError`] message.
const MAX_BODY_IN_ERROR: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Connection refused, timeout, TLS failure, ...
    Transport,
    /// Non-success HTTP status without a more specific meaning.
    Status,
    NotFound,
    /// The service rejected the request (400, 409, 422).
    Rejected,
    /// Response body could not be decoded.
    Decode,
}

impl ServiceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceErrorKind::Transport => "transport",
            ServiceErrorKind::Status => "status",
            ServiceErrorKind::NotFound => "not found",
            ServiceErrorKind::Rejected => "rejected",
            ServiceErrorKind::Decode => "decode",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" (HTTP {})", s))
        .unwrap_or_default()
}

/// Failure of a remote seller-items call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} error{}: {message}", .kind.as_str(), status_suffix(.status))]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            404 => ServiceErrorKind::NotFound,
            400 | 409 | 422 => ServiceErrorKind::Rejected,
            _ => ServiceErrorKind::Status,
        };

        let message = if body.trim().is_empty() {
            "service returned an empty body".to_string()
        } else {
            truncate_body(body)
        };

        Self::new(kind, message).with_status(status)
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_IN_ERROR {
        return body.to_string();
    }

    let mut end = MAX_BODY_IN_ERROR;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Service,
    Configuration,
    Validation,
    Io,
}

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Service call failed: {0}")]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl SdkError {
    pub fn service(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        SdkError::Service(ServiceError::new(kind, message))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SdkError::Service(_) => ErrorCategory::Service,
            SdkError::IoError(_) => ErrorCategory::Io,
            SdkError::ConfigError { .. }
            | SdkError::InvalidConfigValueError { .. }
            | SdkError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SdkError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            SdkError::Service(e) => Some(e.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.service_kind() == Some(ServiceErrorKind::NotFound)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SdkError::Service(e) => match e.kind {
                ServiceErrorKind::Transport => {
                    "Check network connectivity and the configured base URL"
                }
                ServiceErrorKind::NotFound => "Verify the SKU exists for this seller",
                ServiceErrorKind::Rejected => "Review the request fields against the API rules",
                ServiceErrorKind::Decode => "The service response format may have changed",
                ServiceErrorKind::Status => match e.status {
                    Some(401) | Some(403) => "Check the app token and auth token",
                    _ => "Retry later or contact the marketplace support",
                },
            },
            SdkError::IoError(_) => "Check file paths and permissions",
            SdkError::ConfigError { .. }
            | SdkError::InvalidConfigValueError { .. }
            | SdkError::MissingConfigError { .. } => "Fix the configuration file or CLI flags",
            SdkError::ValidationError { .. } => "Correct the input values",
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_decode() {
            ServiceErrorKind::Decode
        } else {
            ServiceErrorKind::Transport
        };
        let mut err = ServiceError::new(kind, e.to_string());
        err.status = e.status().map(|s| s.as_u16());
        SdkError::Service(err)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::service(ServiceErrorKind::Decode, e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
