use std::sync::Arc;

use super::{spawn_task, Emitter, TaskHandle};
use crate::error::TaskError;
use crate::model::{DownloadTarget, Quality};
use crate::progress::percent;
use crate::source::StreamSource;

/// Everything a single-video download needs, fixed at start.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub url: String,
    pub quality: Quality,
    pub target: DownloadTarget
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    Progress(u8),
    Size { received: u64, total: u64 },
    /// Title of the downloaded video.
    Finished(String),
    Error(String)
}

pub fn spawn(request: VideoRequest, source: Arc<dyn StreamSource>) -> TaskHandle<VideoEvent> {
    spawn_task(move |emitter| async move {
        tracing::info!(url = %request.url, quality = %request.quality, target = %request.target, "starting video download");
        match run(&request, source.as_ref(), &emitter).await {
            Ok(title) => {
                tracing::info!(%title, "video downloaded");
                emitter.emit(VideoEvent::Finished(title));
            }
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "video download failed");
                emitter.emit(VideoEvent::Error(e.to_string()));
            }
        }
    })
}

async fn run(
    request: &VideoRequest,
    source: &dyn StreamSource,
    emitter: &Emitter<VideoEvent>
) -> Result<String, TaskError> {
    let info = source
        .resolve_metadata(&request.url)
        .await
        .map_err(TaskError::Resolution)?;

    let variant = info
        .find_variant(request.quality)
        .ok_or_else(|| TaskError::UnavailableQuality {
            label: request.quality.label().to_string()
        })?;

    let mut on_progress = |received: u64, total: u64| {
        if let Some(pct) = percent(received, total) {
            emitter.emit(VideoEvent::Progress(pct));
        }
        emitter.emit(VideoEvent::Size { received, total });
    };
    source
        .transfer(variant, &request.target, &mut on_progress)
        .await
        .map_err(TaskError::Transfer)?;

    Ok(info.title)
}
