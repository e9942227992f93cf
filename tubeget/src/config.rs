use std::path::{Path, PathBuf};

use yt_dlp::YtDlp;

/// Settings for the yt-dlp backend.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ytdlp_path: Option<PathBuf>,
    pub cookies_file: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    /// Directory of a JS runtime yt-dlp should find on `PATH`.
    pub deno_path: Option<PathBuf>,
    pub extractor_args: Option<String>
}

impl Config {
    pub fn build_client(&self) -> YtDlp {
        let mut yt_dlp = match self.ytdlp_path.as_deref().filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                tracing::info!("Using custom yt-dlp path: {}", path.display());
                YtDlp::with_binary(path)
            }
            None => YtDlp::new()
        };

        if let Some(ref args) = self.extractor_args {
            let parsed = parse_extractor_args(args);
            if !parsed.is_empty() {
                yt_dlp.set_extra_args(parsed);
            }
        }

        if let Some(ref path) = self.cookies_file {
            if path.exists() {
                tracing::info!("Using cookies file: {}", path.display());
                yt_dlp.set_cookies_file(Some(path.clone()));
            } else {
                tracing::warn!("Cookies file {} does not exist, ignoring", path.display());
            }
        }

        if let Some(ref path) = self.ffmpeg_path {
            tracing::info!("Using custom ffmpeg path: {}", path.display());
            yt_dlp.set_ffmpeg_location(Some(path.clone()));
        }

        if let Some(parent) = self.deno_path.as_deref().and_then(Path::parent) {
            tracing::info!("Using custom deno path: {}", parent.display());
            yt_dlp.set_env("PATH_PREPEND".to_string(), parent.to_string_lossy().to_string());
        }

        yt_dlp
    }
}

/// Folds newline or semicolon separated extractor arguments into a single
/// `--extractor-args` pair.
pub fn parse_extractor_args(input: &str) -> Vec<String> {
    let joined: Vec<&str> = input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if joined.is_empty() {
        return Vec::new();
    }
    vec!["--extractor-args".to_string(), joined.join(";")]
}
