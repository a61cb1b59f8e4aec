use crate::report::CommitReport;

/// Errors raised by collaborators (upload gateway, listing image API)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
    /// A create was planned for an entry whose bytes never reached the object store
    #[error("entry {0} has no uploaded image")]
    NotUploaded(String),
}

/// Local failures of the mutation phase. No side effects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("image limit reached ({max} images)")]
    LimitExceeded { max: usize },
    #[error("file too large ({size} bytes, max {max})")]
    FileTooLarge { size: usize, max: usize },
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image {0} not found")]
    NotFound(String),
    #[error("index {index} out of bounds for {len} images")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("a commit is in progress")]
    CommitInProgress,
    #[error("compression failed: {0}")]
    Compression(String),
    #[error("duplicate image id {0}")]
    DuplicateImage(String),
}

/// Failure to start a session from the server's current images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenError {
    #[error("could not load baseline: {0}")]
    Fetch(#[from] RemoteError),
    #[error(transparent)]
    Invalid(#[from] EditorError),
}

/// Whether a failed commit touched the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    NothingSent,
    PartiallyApplied,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("a commit is in progress")]
    CommitInProgress,
    #[error("at least {min} image(s) required")]
    TooFewImages { min: usize },
    #[error("upload of {entry_id} failed: {source}")]
    UploadFailed { entry_id: String, source: RemoteError },
    #[error("commit partially applied: {} ok, {} failed", .0.applied.len(), .0.failed.len())]
    PartiallyApplied(CommitReport),
}

impl CommitError {
    pub fn phase(&self) -> FailurePhase {
        match self {
            CommitError::PartiallyApplied(_) => FailurePhase::PartiallyApplied,
            // Uploads only touch the object store, never listing records
            _ => FailurePhase::NothingSent,
        }
    }

    pub fn report(&self) -> Option<&CommitReport> {
        match self {
            CommitError::PartiallyApplied(report) => Some(report),
            _ => None,
        }
    }
}
