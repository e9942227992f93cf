//! Background units of work. Each task runs on the tokio runtime and talks
//! back to its owner only through typed events on an unbounded channel; the
//! last event a task sends is always a `Finished` or an `Error`.

pub mod enumerate;
pub mod playlist;
pub mod video;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use enumerate::EnumerationEvent;
pub use playlist::{BatchSize, PlaylistEvent, PlaylistRequest};
pub use video::{VideoEvent, VideoRequest};

/// Owner side of a running task.
#[derive(Debug)]
pub struct TaskHandle<E> {
    events: mpsc::UnboundedReceiver<E>,
    join: JoinHandle<()>
}

impl<E> TaskHandle<E> {
    /// Next event, or `None` once the task has ended and its queue is drained.
    pub async fn recv(&mut self) -> Option<E> {
        self.events.recv().await
    }

    /// Drains every event until the task ends.
    pub async fn collect(mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "task did not run to completion");
        }
        events
    }
}

/// Task side of the event channel.
pub(crate) struct Emitter<E> {
    tx: mpsc::UnboundedSender<E>
}

impl<E> Emitter<E> {
    pub(crate) fn emit(&self, event: E) {
        if self.tx.send(event).is_err() {
            tracing::debug!("task owner went away, dropping event");
        }
    }
}

/// Spawns `work` with a fresh event channel.
pub(crate) fn spawn_task<E, F, Fut>(work: F) -> TaskHandle<E>
where
    E: Send + 'static,
    F: FnOnce(Emitter<E>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static
{
    let (tx, events) = mpsc::unbounded_channel();
    let join = tokio::spawn(work(Emitter { tx }));
    TaskHandle { events, join }
}
