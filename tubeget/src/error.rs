use std::path::PathBuf;

/// Bad or missing user input. Raised before any task is started and shown
/// to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a playlist URL!")]
    MissingPlaylistUrl,

    #[error("Please enter a video URL!")]
    MissingVideoUrl,

    #[error("Please select a resolution!")]
    NoQuality,

    #[error("Please select a download location!")]
    NoTarget,

    #[error("Please get playlist videos first!")]
    EmptyQueue,

    #[error("{} is not an existing directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("A task is already running")]
    Busy
}

/// Failure reported by a [`StreamSource`](crate::source::StreamSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("backend error: {0}")]
    Backend(String)
}

impl From<yt_dlp::Error> for SourceError {
    fn from(err: yt_dlp::Error) -> Self {
        use yt_dlp::Error;

        match err {
            Error::VideoUnavailable(msg) => SourceError::NotFound(msg),
            Error::JsonParseFailed(e) => SourceError::Parse(e.to_string()),
            Error::CommandFailed { stderr, .. } => SourceError::Network(stderr),
            e @ (Error::BinaryNotExecutable(_) | Error::ExecutionFailed(_)) => {
                SourceError::Backend(e.to_string())
            }
        }
    }
}

/// Everything that can end a background task. Converted to a terminal
/// error event at the task boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Resolution(SourceError),

    #[error("Resolution {label} not available!")]
    UnavailableQuality { label: String },

    #[error("{0}")]
    Transfer(SourceError)
}
