//! Async Rust wrapper for the yt-dlp CLI, scoped to what a format-exact
//! downloader needs: probing a video's formats, flattening a playlist into
//! entry URLs, and downloading one chosen format while streaming byte-level
//! progress.
//!
//! # Example
//!
//! ```no_run
//! use yt_dlp::{DownloadEvent, DownloadOptions, YtDlp};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> yt_dlp::Result<()> {
//!     let client = YtDlp::new();
//!
//!     let info = client.get_video_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     let format = info.formats.iter().find(|f| f.height == Some(360)).unwrap();
//!
//!     let options = DownloadOptions::new()
//!         .format_id(&format.format_id)
//!         .output_template("/tmp/%(title)s.%(ext)s");
//!     let stream = client.download_with_progress(&info.id, &options);
//!     tokio::pin!(stream);
//!     while let Some(event) = stream.next().await {
//!         if let DownloadEvent::Progress(p) = event? {
//!             println!("{} / {:?}", p.downloaded_bytes, p.total_bytes);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod command;
pub mod error;
pub mod types;

pub use client::{EventStream, YtDlp};
pub use error::{Error, Result};
pub use types::{DownloadEvent, DownloadOptions, DownloadProgress, Format, PlaylistEntry, VideoInfo};
