use std::sync::Arc;

use super::{spawn_task, Emitter, TaskHandle};
use crate::error::TaskError;
use crate::model::QueuedItem;
use crate::source::StreamSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationEvent {
    /// One playlist entry, sent as soon as its title is known.
    Found(QueuedItem),
    /// Entries discovered so far.
    Count(usize),
    Finished(usize),
    Error(String)
}

/// Expands a playlist URL into its entries. Each entry costs one metadata
/// probe; the first failure ends the task.
pub fn spawn(url: String, source: Arc<dyn StreamSource>) -> TaskHandle<EnumerationEvent> {
    spawn_task(move |emitter| async move {
        tracing::info!(%url, "enumerating playlist");
        match run(&url, source.as_ref(), &emitter).await {
            Ok(count) => {
                tracing::info!(%url, count, "playlist enumerated");
                emitter.emit(EnumerationEvent::Finished(count));
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "playlist enumeration failed");
                emitter.emit(EnumerationEvent::Error(e.to_string()));
            }
        }
    })
}

async fn run(
    url: &str,
    source: &dyn StreamSource,
    emitter: &Emitter<EnumerationEvent>
) -> Result<usize, TaskError> {
    let entries = source
        .resolve_enumeration(url)
        .await
        .map_err(TaskError::Resolution)?;

    let mut count = 0;
    for entry in entries {
        let info = source
            .resolve_metadata(&entry)
            .await
            .map_err(TaskError::Resolution)?;
        tracing::debug!(title = %info.title, url = %entry, "found playlist entry");
        emitter.emit(EnumerationEvent::Found(QueuedItem {
            title: info.title,
            url: entry
        }));
        count += 1;
        emitter.emit(EnumerationEvent::Count(count));
    }
    Ok(count)
}
