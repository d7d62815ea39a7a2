use thiserror::Error;

/// Unified error type for gitlab-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("Tag creation failed: {0}")]
    TagCreation(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitlab-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Configuration(msg.into())
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        ReleaseError::NotFound(msg.into())
    }

    /// Create a generic API error for a non-success response
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        ReleaseError::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a conflict error with context
    pub fn conflict(msg: impl Into<String>) -> Self {
        ReleaseError::Conflict(msg.into())
    }

    /// Create a permission error with context
    pub fn permission(msg: impl Into<String>) -> Self {
        ReleaseError::Permission(msg.into())
    }

    /// Create a merge error with context
    pub fn merge(msg: impl Into<String>) -> Self {
        ReleaseError::Merge(msg.into())
    }

    /// Create a tag creation error with context
    pub fn tag_creation(msg: impl Into<String>) -> Self {
        ReleaseError::TagCreation(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// Configuration problems are reported before any network call and get
    /// their own code so wrappers can tell them apart from release failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Configuration(_) => 2,
            _ => 1,
        }
    }
}
