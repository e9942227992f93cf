//! The boundary to whatever actually talks to the video host.

mod ytdlp;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::{DownloadTarget, MediaInfo, Variant};

pub use ytdlp::YtDlpSource;

/// Resolves URLs to metadata and moves bytes to disk.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Title and every known variant of a single video.
    async fn resolve_metadata(&self, url: &str) -> Result<MediaInfo, SourceError>;

    /// Entry URLs of a playlist, in playlist order.
    async fn resolve_enumeration(&self, url: &str) -> Result<Vec<String>, SourceError>;

    /// Writes `variant` into `target`, calling `on_progress` with
    /// `(bytes_received_so_far, total_bytes)` as data arrives.
    async fn transfer(
        &self,
        variant: &Variant,
        target: &DownloadTarget,
        on_progress: &mut (dyn FnMut(u64, u64) + Send)
    ) -> Result<(), SourceError>;
}
