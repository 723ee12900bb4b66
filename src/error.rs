use thiserror::Error;

/// Unified error type for git-semv operations
#[derive(Error, Debug)]
pub enum SemvError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Version {candidate} is not higher than the last tag {last}")]
    VersionTooLow { candidate: String, last: String },

    #[error("Working tree has uncommitted changes (use --force to override)")]
    DirtyTree,

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semv
pub type Result<T> = std::result::Result<T, SemvError>;

impl SemvError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemvError::Config(msg.into())
    }

    /// Create a version parsing error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        SemvError::Parse(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        SemvError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        SemvError::Remote(msg.into())
    }
}
