//! Download single videos or whole playlists at a fixed resolution.
//!
//! Work happens in three kinds of background task (playlist enumeration,
//! single-video download, sequential batch download) that report through
//! typed events. A [`Controller`] owns the queue and view state and is the
//! only place those events are applied.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod progress;
pub mod queue;
pub mod source;
pub mod tasks;

pub use config::Config;
pub use controller::{Controller, Notice, Panel, TaskEvent};
pub use error::{SourceError, TaskError, ValidationError};
pub use model::{DownloadTarget, MediaInfo, Quality, QueuedItem, Variant};
pub use source::{StreamSource, YtDlpSource};
