use std::fmt;
use thiserror::Error;

/// The error type for cosmosign operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    upstream: Option<Upstream>,
    #[source]
    source: Option<anyhow::Error>,
}

/// Status and body returned by the data store for a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Upstream {
    status: u16,
    body: String,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input is missing or malformed
    InvalidArgument,

    /// The master key can't be decoded
    InvalidCredentials,

    /// The data store answered with a non-success status, or could not be reached
    Upstream,

    /// The deadline expired before the operation completed
    Cancelled,

    /// The requested operation mode is not recognized
    UnknownOperation,

    /// Unexpected internal errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            upstream: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Status code returned by the data store.
    ///
    /// `Some(0)` means the request never got a response.
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream.as_ref().map(|v| v.status)
    }

    /// Response body returned by the data store.
    pub fn upstream_body(&self) -> Option<&str> {
        self.upstream.as_ref().map(|v| v.body.as_str())
    }

    /// Check if this error is caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidArgument
                | ErrorKind::InvalidCredentials
                | ErrorKind::UnknownOperation
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create an upstream error carrying the store's status and body
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let mut err = Self::new(
            ErrorKind::Upstream,
            format!("data store responded with status {status}"),
        );
        err.upstream = Some(Upstream {
            status,
            body: body.into(),
        });
        err
    }

    /// Create a cancelled error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create an unknown operation error
    pub fn unknown_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownOperation, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::InvalidCredentials => write!(f, "invalid credentials"),
            ErrorKind::Upstream => write!(f, "upstream error"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::UnknownOperation => write!(f, "unknown operation"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::invalid_argument(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
