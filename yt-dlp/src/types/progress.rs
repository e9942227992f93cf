/// Byte counters reported by yt-dlp while a format is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub downloaded_bytes: u64,
    /// Exact size when the server reports one, otherwise yt-dlp's estimate.
    pub total_bytes: Option<u64>
}

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    DownloadStarted { filename: String },
    Progress(DownloadProgress),
    Finished { filename: String },
    Error { message: String },
    Warning { message: String }
}

impl DownloadEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, DownloadEvent::Finished { .. })
    }
}
