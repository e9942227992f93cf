use async_trait::async_trait;
use tokio_stream::StreamExt;
use yt_dlp::{DownloadEvent, DownloadOptions, Format, YtDlp};

use super::StreamSource;
use crate::error::SourceError;
use crate::model::{DownloadTarget, MediaInfo, Variant};

/// [`StreamSource`] backed by the yt-dlp CLI.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    client: YtDlp
}

impl YtDlpSource {
    pub fn new(client: YtDlp) -> Self {
        Self { client }
    }
}

/// Video formats with a known size, complete files ahead of video-only ones.
fn variants_from_formats(url: &str, formats: &[Format]) -> Vec<Variant> {
    let mut usable: Vec<&Format> = formats
        .iter()
        .filter(|f| f.has_video() && f.height.is_some() && f.estimated_size().is_some())
        .collect();
    usable.sort_by_key(|f| !f.is_progressive());

    usable
        .into_iter()
        .filter_map(|f| {
            Some(Variant {
                quality_label: format!("{}p", f.height?),
                total_bytes: f.estimated_size()?,
                format_id: f.format_id.clone(),
                url: url.to_string()
            })
        })
        .collect()
}

#[async_trait]
impl StreamSource for YtDlpSource {
    async fn resolve_metadata(&self, url: &str) -> Result<MediaInfo, SourceError> {
        let info = self.client.get_video_info(url).await?;
        let variants = variants_from_formats(url, &info.formats);
        tracing::debug!(url, title = %info.title, variants = variants.len(), "resolved metadata");
        Ok(MediaInfo {
            title: info.title,
            variants
        })
    }

    async fn resolve_enumeration(&self, url: &str) -> Result<Vec<String>, SourceError> {
        let entries = self.client.get_playlist_entries(url).await?;
        tracing::debug!(url, entries = entries.len(), "resolved playlist");
        Ok(entries.iter().map(yt_dlp::PlaylistEntry::watch_url).collect())
    }

    async fn transfer(
        &self,
        variant: &Variant,
        target: &DownloadTarget,
        on_progress: &mut (dyn FnMut(u64, u64) + Send)
    ) -> Result<(), SourceError> {
        let template = target.path().join("%(title)s.%(ext)s");
        let options = DownloadOptions::new()
            .format_id(&variant.format_id)
            .output_template(template.to_string_lossy());

        let stream = self.client.download_with_progress(&variant.url, &options);
        tokio::pin!(stream);

        let mut last_error: Option<String> = None;
        while let Some(event) = stream.next().await {
            match event.map_err(|e| SourceError::Transfer(e.to_string()))? {
                DownloadEvent::Progress(p) => {
                    let total = p.total_bytes.unwrap_or(variant.total_bytes);
                    on_progress(p.downloaded_bytes.min(total), total);
                }
                DownloadEvent::DownloadStarted { filename } => {
                    tracing::debug!(%filename, "transfer started");
                }
                DownloadEvent::Finished { filename } => {
                    tracing::info!(%filename, "transfer finished");
                }
                DownloadEvent::Warning { message } => {
                    tracing::warn!("yt-dlp: {}", message);
                }
                DownloadEvent::Error { message } => {
                    tracing::error!("yt-dlp: {}", message);
                    last_error = Some(message);
                }
            }
        }

        match last_error {
            Some(message) => Err(SourceError::Transfer(message)),
            None => Ok(())
        }
    }
}
