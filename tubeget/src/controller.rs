//! Control-side state for the two downloader panels.
//!
//! The controller is the only owner of the item queue and of all view
//! state. Background tasks never touch either: they receive copies of what
//! they need at start and report back through events, which the owner
//! applies here one at a time.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::model::{DownloadTarget, Quality};
use crate::progress::{format_size, size_pair};
use crate::queue::ItemQueue;
use crate::source::StreamSource;
use crate::tasks::{
    self, EnumerationEvent, PlaylistEvent, PlaylistRequest, TaskHandle, VideoEvent, VideoRequest
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Playlist,
    Video
}

/// Message for the user that needs acknowledging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Enumeration(EnumerationEvent),
    Video(VideoEvent),
    Playlist(PlaylistEvent)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistView {
    pub status: String,
    pub current: String,
    pub item_percent: u8,
    pub batch_percent: u8,
    pub item_sizes: String,
    pub batch_sizes: String
}

impl PlaylistView {
    /// Size label shown under the batch bar.
    pub fn sizes(&self) -> String {
        format!("Current: {} | Playlist: {}", self.item_sizes, self.batch_sizes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoView {
    pub current: String,
    pub percent: u8,
    pub sizes: String
}

#[derive(Debug, Default)]
pub struct PlaylistPanel {
    pub target: Option<DownloadTarget>,
    pub quality: Option<Quality>,
    pub queue: ItemQueue,
    pub view: PlaylistView,
    enumeration: Option<TaskHandle<EnumerationEvent>>,
    download: Option<TaskHandle<PlaylistEvent>>
}

impl PlaylistPanel {
    pub fn is_busy(&self) -> bool {
        self.enumeration.is_some() || self.download.is_some()
    }
}

#[derive(Debug, Default)]
pub struct VideoPanel {
    pub target: Option<DownloadTarget>,
    pub quality: Option<Quality>,
    pub view: VideoView,
    download: Option<TaskHandle<VideoEvent>>
}

impl VideoPanel {
    pub fn is_busy(&self) -> bool {
        self.download.is_some()
    }
}

pub struct Controller {
    source: Arc<dyn StreamSource>,
    pub playlist: PlaylistPanel,
    pub video: VideoPanel,
    notices: VecDeque<Notice>
}

impl Controller {
    pub fn new(source: Arc<dyn StreamSource>) -> Self {
        Self {
            source,
            playlist: PlaylistPanel::default(),
            video: VideoPanel::default(),
            notices: VecDeque::new()
        }
    }

    /// Applies a directory choice. `None` (a cancelled picker) keeps the
    /// previous target; an invalid path is rejected and also keeps it.
    pub fn select_target(
        &mut self,
        panel: Panel,
        choice: Option<PathBuf>
    ) -> Result<(), ValidationError> {
        let Some(path) = choice else {
            return Ok(());
        };
        let target = DownloadTarget::new(path)?;
        tracing::debug!(?panel, %target, "download target selected");
        match panel {
            Panel::Playlist => self.playlist.target = Some(target),
            Panel::Video => self.video.target = Some(target)
        }
        Ok(())
    }

    pub fn set_quality(&mut self, panel: Panel, quality: Option<Quality>) {
        match panel {
            Panel::Playlist => self.playlist.quality = quality,
            Panel::Video => self.video.quality = quality
        }
    }

    /// Starts enumerating a playlist, replacing the current queue.
    pub fn fetch_playlist(&mut self, url: &str) -> Result<(), ValidationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingPlaylistUrl);
        }
        if self.playlist.is_busy() {
            return Err(ValidationError::Busy);
        }

        self.playlist.queue.clear();
        self.playlist.view.status = "Getting videos...".to_string();
        self.playlist.enumeration = Some(tasks::enumerate::spawn(
            url.to_string(),
            Arc::clone(&self.source)
        ));
        Ok(())
    }

    /// Removes the selected queue rows. Indices are positions as currently
    /// shown.
    pub fn delete_selected(&mut self, indices: &[usize]) -> usize {
        let removed = self.playlist.queue.remove_indices(indices);
        for item in &removed {
            tracing::debug!(title = %item.title, "removed from queue");
        }
        removed.len()
    }

    /// Quality and target chosen on the playlist panel.
    pub fn playlist_settings(&self) -> Result<(Quality, DownloadTarget), ValidationError> {
        let quality = self.playlist.quality.ok_or(ValidationError::NoQuality)?;
        let target = self.playlist.target.clone().ok_or(ValidationError::NoTarget)?;
        Ok((quality, target))
    }

    /// Starts a batch over a copy of the current queue.
    pub fn download_playlist(&mut self) -> Result<(), ValidationError> {
        if self.playlist.queue.is_empty() {
            return Err(ValidationError::EmptyQueue);
        }
        let (quality, target) = self.playlist_settings()?;
        let panel = &mut self.playlist;
        if panel.is_busy() {
            return Err(ValidationError::Busy);
        }

        panel.view.item_percent = 0;
        panel.view.batch_percent = 0;
        panel.view.current.clear();
        panel.download = Some(tasks::playlist::spawn(
            PlaylistRequest {
                urls: panel.queue.snapshot_urls(),
                quality,
                target
            },
            Arc::clone(&self.source)
        ));
        Ok(())
    }

    pub fn download_video(&mut self, url: &str) -> Result<(), ValidationError> {
        let url = url.trim();
        let panel = &mut self.video;
        if url.is_empty() {
            return Err(ValidationError::MissingVideoUrl);
        }
        let quality = panel.quality.ok_or(ValidationError::NoQuality)?;
        let target = panel.target.clone().ok_or(ValidationError::NoTarget)?;
        if panel.is_busy() {
            return Err(ValidationError::Busy);
        }

        panel.view.percent = 0;
        panel.download = Some(tasks::video::spawn(
            VideoRequest {
                url: url.to_string(),
                quality,
                target
            },
            Arc::clone(&self.source)
        ));
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.playlist.is_busy() || self.video.is_busy()
    }

    /// Waits for the next event from any running task. Returns `None` once
    /// nothing is running.
    pub async fn next_event(&mut self) -> Option<TaskEvent> {
        enum Next {
            Enumeration(Option<EnumerationEvent>),
            Playlist(Option<PlaylistEvent>),
            Video(Option<VideoEvent>)
        }

        while self.is_busy() {
            let next = tokio::select! {
                e = recv_from(&mut self.playlist.enumeration) => Next::Enumeration(e),
                e = recv_from(&mut self.playlist.download) => Next::Playlist(e),
                e = recv_from(&mut self.video.download) => Next::Video(e),
            };
            match next {
                Next::Enumeration(Some(e)) => return Some(TaskEvent::Enumeration(e)),
                Next::Playlist(Some(e)) => return Some(TaskEvent::Playlist(e)),
                Next::Video(Some(e)) => return Some(TaskEvent::Video(e)),
                Next::Enumeration(None) => self.playlist.enumeration = None,
                Next::Playlist(None) => self.playlist.download = None,
                Next::Video(None) => self.video.download = None
            }
        }
        None
    }

    /// Folds one task event into the panels.
    pub fn apply(&mut self, event: TaskEvent) {
        tracing::debug!(?event, "applying task event");
        match event {
            TaskEvent::Enumeration(e) => self.apply_enumeration(e),
            TaskEvent::Video(e) => self.apply_video(e),
            TaskEvent::Playlist(e) => self.apply_playlist(e)
        }
    }

    /// Pumps events until every task has ended.
    pub async fn run_until_idle(&mut self) {
        while let Some(event) = self.next_event().await {
            self.apply(event);
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn apply_enumeration(&mut self, event: EnumerationEvent) {
        let panel = &mut self.playlist;
        match event {
            EnumerationEvent::Found(item) => panel.queue.push(item),
            EnumerationEvent::Count(n) => panel.view.status = format!("Found: {n}"),
            EnumerationEvent::Finished(n) => {
                panel.view.status = format!("Total videos: {n}");
                panel.enumeration = None;
            }
            EnumerationEvent::Error(msg) => {
                panel.enumeration = None;
                self.notices
                    .push_back(Notice::Error(format!("Please Try Again Later\n{msg}")));
            }
        }
    }

    fn apply_video(&mut self, event: VideoEvent) {
        let panel = &mut self.video;
        match event {
            VideoEvent::Progress(p) => panel.view.percent = p,
            VideoEvent::Size { received, total } => {
                panel.view.sizes = format!("Downloaded: {}", size_pair(received, total));
            }
            VideoEvent::Finished(title) => {
                panel.view.current = format!("Downloaded: {title}");
                panel.download = None;
            }
            VideoEvent::Error(msg) => {
                panel.download = None;
                self.notices.push_back(Notice::Error(msg));
            }
        }
    }

    fn apply_playlist(&mut self, event: PlaylistEvent) {
        let panel = &mut self.playlist;
        match event {
            PlaylistEvent::ItemStarted(title) => panel.view.current = format!("Downloading: {title}"),
            PlaylistEvent::ItemProgress(p) => panel.view.item_percent = p,
            PlaylistEvent::Size(s) => {
                panel.view.item_sizes = size_pair(s.item_received, s.item_total);
                panel.view.batch_sizes = format!(
                    "{} / {}",
                    format_size(s.batch_received),
                    format_size(s.batch_total)
                );
            }
            PlaylistEvent::ItemSize { received, total } => {
                panel.view.item_sizes = size_pair(received, total);
            }
            PlaylistEvent::ItemSkipped(msg) => self.notices.push_back(Notice::Error(msg)),
            PlaylistEvent::BatchProgress(p) => panel.view.batch_percent = p,
            PlaylistEvent::Finished(msg) => {
                panel.download = None;
                self.notices.push_back(Notice::Info(msg));
            }
            PlaylistEvent::Error(msg) => {
                panel.download = None;
                self.notices.push_back(Notice::Error(msg));
            }
        }
    }
}

async fn recv_from<E>(slot: &mut Option<TaskHandle<E>>) -> Option<E> {
    match slot {
        Some(handle) => handle.recv().await,
        None => std::future::pending().await
    }
}
