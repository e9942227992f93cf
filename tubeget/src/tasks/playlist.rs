//! Sequential batch download.
//!
//! The batch runs in two phases. Sizing probes every URL once and records
//! the size of the requested variant (zero when the tier is missing) so the
//! overall byte total is known up front. Transferring then walks the items
//! strictly in order, one transfer at a time. Any probe failure during
//! sizing, or any transfer failure, ends the whole batch.

use std::sync::Arc;

use super::{spawn_task, Emitter, TaskHandle};
use crate::error::TaskError;
use crate::model::{DownloadTarget, Quality, Variant};
use crate::progress::{batch_percent, percent};
use crate::source::StreamSource;

pub const COMPLETE_MESSAGE: &str = "Playlist Download Complete!";

/// Parameters of a batch. `urls` is a private copy of the queue taken when
/// the batch is requested; later queue edits do not reach it.
#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    pub urls: Vec<String>,
    pub quality: Quality,
    pub target: DownloadTarget
}

/// Byte counters for the current item and for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize {
    pub item_received: u64,
    pub item_total: u64,
    pub batch_total: u64,
    pub batch_received: u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEvent {
    /// Title of the item whose transfer is starting.
    ItemStarted(String),
    ItemProgress(u8),
    /// Byte counters whenever the batch numerator grows; it never repeats.
    Size(BatchSize),
    /// Current item's counters on ticks that leave the batch numerator where
    /// it was, such as the first zero-byte tick of a new item.
    ItemSize { received: u64, total: u64 },
    /// The requested tier is missing for one item; the batch goes on.
    ItemSkipped(String),
    /// Share of items processed so far, transferred or skipped.
    BatchProgress(u8),
    Finished(String),
    Error(String)
}

struct ManifestEntry {
    title: String,
    variant: Option<Variant>
}

impl ManifestEntry {
    fn size(&self) -> u64 {
        self.variant.as_ref().map_or(0, |v| v.total_bytes)
    }
}

/// Per-item sizes computed before any byte is moved.
struct Manifest {
    entries: Vec<ManifestEntry>
}

impl Manifest {
    fn total(&self) -> u64 {
        self.entries.iter().map(ManifestEntry::size).sum()
    }
}

pub fn spawn(request: PlaylistRequest, source: Arc<dyn StreamSource>) -> TaskHandle<PlaylistEvent> {
    spawn_task(move |emitter| async move {
        tracing::info!(
            items = request.urls.len(),
            quality = %request.quality,
            target = %request.target,
            "starting playlist download"
        );
        match run(&request, source.as_ref(), &emitter).await {
            Ok(()) => {
                tracing::info!(items = request.urls.len(), "playlist downloaded");
                emitter.emit(PlaylistEvent::Finished(COMPLETE_MESSAGE.to_string()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "playlist download failed");
                emitter.emit(PlaylistEvent::Error(e.to_string()));
            }
        }
    })
}

async fn run(
    request: &PlaylistRequest,
    source: &dyn StreamSource,
    emitter: &Emitter<PlaylistEvent>
) -> Result<(), TaskError> {
    let manifest = size_batch(&request.urls, request.quality, source).await?;
    transfer_batch(&manifest, request, source, emitter).await
}

async fn size_batch(
    urls: &[String],
    quality: Quality,
    source: &dyn StreamSource
) -> Result<Manifest, TaskError> {
    let mut entries = Vec::with_capacity(urls.len());
    for url in urls {
        let info = source
            .resolve_metadata(url)
            .await
            .map_err(TaskError::Resolution)?;
        let variant = info.find_variant(quality).cloned();
        entries.push(ManifestEntry {
            title: info.title,
            variant
        });
    }

    let manifest = Manifest { entries };
    tracing::debug!(
        items = manifest.entries.len(),
        batch_total = manifest.total(),
        "batch sized"
    );
    Ok(manifest)
}

async fn transfer_batch(
    manifest: &Manifest,
    request: &PlaylistRequest,
    source: &dyn StreamSource,
    emitter: &Emitter<PlaylistEvent>
) -> Result<(), TaskError> {
    let item_count = manifest.entries.len();
    let batch_total = manifest.total();
    let mut batch_done: u64 = 0;
    let mut last_batch_received: Option<u64> = None;

    for (index, entry) in manifest.entries.iter().enumerate() {
        match entry.variant.as_ref().filter(|v| v.total_bytes > 0) {
            Some(variant) => {
                emitter.emit(PlaylistEvent::ItemStarted(entry.title.clone()));
                tracing::debug!(title = %entry.title, index, "transferring item");

                let item_size = variant.total_bytes;
                let mut on_progress = |received: u64, total: u64| {
                    if let Some(pct) = percent(received, total) {
                        emitter.emit(PlaylistEvent::ItemProgress(pct));
                    }
                    let batch_received = (batch_done + received.min(item_size)).min(batch_total);
                    if last_batch_received.is_some_and(|last| batch_received <= last) {
                        emitter.emit(PlaylistEvent::ItemSize { received, total });
                        return;
                    }
                    last_batch_received = Some(batch_received);
                    emitter.emit(PlaylistEvent::Size(BatchSize {
                        item_received: received,
                        item_total: total,
                        batch_total,
                        batch_received
                    }));
                };
                source
                    .transfer(variant, &request.target, &mut on_progress)
                    .await
                    .map_err(TaskError::Transfer)?;

                batch_done += item_size;
            }
            None => {
                let message = format!(
                    "Resolution {} not available for {}!",
                    request.quality.label(),
                    entry.title
                );
                tracing::warn!("{}", message);
                emitter.emit(PlaylistEvent::ItemSkipped(message));
            }
        }

        if let Some(pct) = batch_percent(index + 1, item_count) {
            emitter.emit(PlaylistEvent::BatchProgress(pct));
        }
    }
    Ok(())
}
