use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("yt-dlp binary not executable: {0}")]
    BinaryNotExecutable(PathBuf),

    #[error("failed to execute yt-dlp: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    #[error("yt-dlp command failed with exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("failed to parse JSON output: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("video unavailable: {0}")]
    VideoUnavailable(String)
}

impl Error {
    /// Builds the error for a non-zero yt-dlp exit, singling out the
    /// "unavailable" family so callers can tell a missing video from a
    /// broken connection.
    pub(crate) fn from_failure(code: Option<i32>, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        let last_error = stderr
            .lines()
            .rev()
            .find_map(|l| l.strip_prefix("ERROR:"))
            .map(str::trim);

        if let Some(message) = last_error
            && is_unavailable(message)
        {
            return Error::VideoUnavailable(message.to_string());
        }

        Error::CommandFailed {
            code: code.unwrap_or(-1),
            stderr: last_error.map_or(stderr.clone(), str::to_string)
        }
    }
}

fn is_unavailable(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("video unavailable")
        || lower.contains("private video")
        || lower.contains("does not exist")
        || lower.contains("http error 404")
}

pub type Result<T> = std::result::Result<T, Error>;
