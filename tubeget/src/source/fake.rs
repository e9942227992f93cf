//! In-memory [`StreamSource`] for exercising the tasks.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::StreamSource;
use crate::error::SourceError;
use crate::model::{DownloadTarget, MediaInfo, Variant};

#[derive(Default)]
pub struct FakeSource {
    media: HashMap<String, Result<MediaInfo, SourceError>>,
    playlists: HashMap<String, Result<Vec<String>, SourceError>>,
    failing_transfers: HashMap<String, String>,
    over_report: Option<u64>,
    probes: Mutex<Vec<String>>,
    transfers: Mutex<Vec<String>>
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a video exposing `(label, bytes)` variants.
    pub fn video(mut self, url: &str, title: &str, variants: &[(&str, u64)]) -> Self {
        let variants = variants
            .iter()
            .map(|(label, size)| Variant {
                quality_label: (*label).to_string(),
                total_bytes: *size,
                format_id: format!("{url}#{label}"),
                url: url.to_string()
            })
            .collect();
        self.media.insert(url.to_string(), Ok(MediaInfo {
            title: title.to_string(),
            variants
        }));
        self
    }

    pub fn broken_video(mut self, url: &str, err: SourceError) -> Self {
        self.media.insert(url.to_string(), Err(err));
        self
    }

    pub fn playlist(mut self, url: &str, entries: &[&str]) -> Self {
        self.playlists.insert(
            url.to_string(),
            Ok(entries.iter().map(ToString::to_string).collect())
        );
        self
    }

    pub fn broken_playlist(mut self, url: &str, err: SourceError) -> Self {
        self.playlists.insert(url.to_string(), Err(err));
        self
    }

    /// Makes the transfer of `url` fail halfway through.
    pub fn failing_transfer(mut self, url: &str, message: &str) -> Self {
        self.failing_transfers.insert(url.to_string(), message.to_string());
        self
    }

    /// Makes every transfer report `factor` times the variant size as
    /// received by its last tick.
    pub fn over_reporting(mut self, factor: u64) -> Self {
        self.over_report = Some(factor);
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn transfers(&self) -> Vec<String> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamSource for FakeSource {
    async fn resolve_metadata(&self, url: &str) -> Result<MediaInfo, SourceError> {
        self.probes.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;
        self.media
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::NotFound(url.to_string())))
    }

    async fn resolve_enumeration(&self, url: &str) -> Result<Vec<String>, SourceError> {
        self.playlists
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::NotFound(url.to_string())))
    }

    async fn transfer(
        &self,
        variant: &Variant,
        _target: &DownloadTarget,
        on_progress: &mut (dyn FnMut(u64, u64) + Send)
    ) -> Result<(), SourceError> {
        self.transfers.lock().unwrap().push(variant.url.clone());

        let total = variant.total_bytes;
        let reported = total * self.over_report.unwrap_or(1);
        for step in 0..=4 {
            if step == 2 {
                if let Some(message) = self.failing_transfers.get(&variant.url) {
                    return Err(SourceError::Transfer(message.clone()));
                }
            }
            on_progress(reported * step / 4, total);
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}
