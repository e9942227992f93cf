use std::collections::HashMap;
use std::path::PathBuf;
use std::pin::Pin;

use futures_core::Stream;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::command::{CommandBuilder, PROGRESS_MARKER, PROGRESS_TEMPLATE};
use crate::error::{Error, Result};
use crate::types::{DownloadEvent, DownloadOptions, DownloadProgress, PlaylistEntry, VideoInfo};

pub type EventStream = Pin<Box<dyn Stream<Item = Result<DownloadEvent>> + Send + 'static>>;

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    cookies_file: Option<PathBuf>,
    extra_args: Vec<String>,
    ffmpeg_location: Option<PathBuf>,
    env_vars: HashMap<String, String>
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            cookies_file: None,
            extra_args: Vec::new(),
            ffmpeg_location: None,
            env_vars: HashMap::new()
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub fn set_cookies_file(&mut self, path: Option<PathBuf>) {
        self.cookies_file = path;
    }

    pub fn set_extra_args(&mut self, args: Vec<String>) {
        self.extra_args = args;
    }

    pub fn set_ffmpeg_location(&mut self, path: Option<PathBuf>) {
        self.ffmpeg_location = path;
    }

    pub fn set_env(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }

    pub async fn check_binary(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::BinaryNotExecutable(self.binary.clone()))
        }
    }

    /// Probes a single video, returning its title and every format yt-dlp
    /// can offer for it. Nothing is downloaded.
    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        let output = self
            .command()
            .json_output()
            .skip_download()
            .no_playlist()
            .url(url)
            .build_with_env(&self.env_vars)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::from_failure(output.status.code(), &output.stderr));
        }

        let info: VideoInfo = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }

    /// Lists a playlist's entries in playlist order without probing each one.
    /// An empty playlist yields an empty list; a line that is not a valid
    /// entry fails the whole listing.
    pub async fn get_playlist_entries(&self, url: &str) -> Result<Vec<PlaylistEntry>> {
        let output = self
            .command()
            .json_output()
            .skip_download()
            .yes_playlist()
            .flat_playlist()
            .url(url)
            .build_with_env(&self.env_vars)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::from_failure(output.status.code(), &output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut entries = Vec::new();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            entries.push(serde_json::from_str::<PlaylistEntry>(line)?);
        }
        Ok(entries)
    }

    /// Downloads `url` according to `options`, yielding progress as yt-dlp
    /// reports it. A non-zero exit ends the stream with an error.
    pub fn download_with_progress(&self, url: &str, options: &DownloadOptions) -> EventStream {
        let url = url.to_string();
        let builder = self
            .command()
            .with_options(options)
            .newline_progress()
            .progress_template(PROGRESS_TEMPLATE)
            .no_playlist()
            .url(&url);
        let binary = self.binary.clone();
        let env_vars = self.env_vars.clone();

        Box::pin(async_stream::try_stream! {
            tracing::debug!(
                binary = %binary.display(),
                args = ?builder.get_args(),
                "spawning yt-dlp"
            );

            let mut cmd = builder.build_with_env(&env_vars);
            cmd.stdout(std::process::Stdio::piped());
            cmd.stderr(std::process::Stdio::piped());

            let mut child = cmd.spawn()?;

            let stderr = child.stderr.take();
            let stderr_task = tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Some(mut stderr) = stderr {
                    let _ = stderr.read_to_end(&mut buf).await;
                }
                buf
            });

            let mut current_filename: Option<String> = None;
            let mut finished = false;

            if let Some(stdout) = child.stdout.take() {
                let mut reader = BufReader::new(stdout).lines();
                while let Some(line) = reader.next_line().await? {
                    tracing::trace!(line = %line, "yt-dlp stdout");
                    if let Some(event) = parse_progress_line(&line, &mut current_filename) {
                        finished |= event.is_finished();
                        yield event;
                    }
                }
            }

            let status = child.wait().await?;
            let stderr = stderr_task.await.unwrap_or_default();

            if !status.success() {
                Err::<(), Error>(Error::from_failure(status.code(), &stderr))?;
            }

            if !finished {
                yield DownloadEvent::Finished {
                    filename: current_filename.unwrap_or_default()
                };
            }
        })
    }

    fn command(&self) -> CommandBuilder {
        let mut builder = CommandBuilder::new(&self.binary)
            .cookies_file_opt(self.cookies_file.as_ref())
            .args(self.extra_args.iter().map(String::as_str));

        if let Some(ref ffmpeg_path) = self.ffmpeg_location {
            builder = builder.ffmpeg_location(ffmpeg_path);
        }

        builder
    }
}

fn parse_progress_line(line: &str, current_filename: &mut Option<String>) -> Option<DownloadEvent> {
    let line = line.trim();

    // Tolerate the type selector if it is ever echoed back.
    let marked = line.strip_prefix("download:").unwrap_or(line);
    if let Some(content) = marked.strip_prefix(PROGRESS_MARKER) {
        return parse_byte_progress(content).map(DownloadEvent::Progress);
    }

    if let Some(filename) = line.strip_prefix("[download] Destination:") {
        let filename = filename.trim().to_string();
        *current_filename = Some(filename.clone());
        return Some(DownloadEvent::DownloadStarted { filename });
    }

    if line.contains("has already been downloaded") {
        let filename = line
            .trim_start_matches("[download]")
            .trim()
            .trim_end_matches("has already been downloaded")
            .trim()
            .to_string();
        *current_filename = Some(filename.clone());
        return Some(DownloadEvent::Finished { filename });
    }

    if let Some(message) = line.strip_prefix("WARNING:") {
        return Some(DownloadEvent::Warning {
            message: message.trim().to_string()
        });
    }

    if let Some(message) = line.strip_prefix("ERROR:") {
        return Some(DownloadEvent::Error {
            message: message.trim().to_string()
        });
    }

    None
}

fn parse_byte_progress(content: &str) -> Option<DownloadProgress> {
    let mut parts = content.split_whitespace();
    let downloaded_bytes = parse_count(parts.next()?)?;
    let exact = parts.next().and_then(parse_count);
    let estimate = parts.next().and_then(parse_count);

    Some(DownloadProgress {
        downloaded_bytes,
        total_bytes: exact.or(estimate)
    })
}

/// yt-dlp prints integers, floats for estimates, and `NA` for unknowns.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1048576"), Some(1_048_576));
        assert_eq!(parse_count("2048.7"), Some(2048));
        assert_eq!(parse_count("NA"), None);
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn test_parse_byte_progress_exact_total() {
        let mut filename = None;
        let event = parse_progress_line("tubeget-bytes 1024 4096 NA", &mut filename);
        match event {
            Some(DownloadEvent::Progress(p)) => {
                assert_eq!(p.downloaded_bytes, 1024);
                assert_eq!(p.total_bytes, Some(4096));
            }
            other => panic!("unexpected event: {other:?}")
        }
    }

    #[test]
    fn test_parse_byte_progress_falls_back_to_estimate() {
        let p = parse_byte_progress(" 512 NA 8000.5").unwrap();
        assert_eq!(p.downloaded_bytes, 512);
        assert_eq!(p.total_bytes, Some(8000));
    }

    #[test]
    fn test_parse_byte_progress_unknown_downloaded() {
        assert!(parse_byte_progress(" NA NA NA").is_none());
    }

    #[test]
    fn test_parse_progress_line_destination() {
        let mut filename = None;
        let event = parse_progress_line("[download] Destination: /tmp/video.mp4", &mut filename);
        assert!(matches!(event, Some(DownloadEvent::DownloadStarted { .. })));
        assert_eq!(filename, Some("/tmp/video.mp4".to_string()));
    }

    #[test]
    fn test_parse_progress_line_already_downloaded() {
        let mut filename = None;
        let event = parse_progress_line(
            "[download] /tmp/video.mp4 has already been downloaded",
            &mut filename
        );
        assert!(matches!(event, Some(DownloadEvent::Finished { ref filename }) if filename == "/tmp/video.mp4"));
    }

    #[test]
    fn test_parse_progress_line_error() {
        let mut filename = None;
        let event = parse_progress_line("ERROR: Video unavailable", &mut filename);
        assert!(matches!(event, Some(DownloadEvent::Error { .. })));
    }

    #[test]
    fn test_parse_progress_line_ignores_noise() {
        let mut filename = None;
        assert!(parse_progress_line("[youtube] abc: Downloading webpage", &mut filename).is_none());
    }

    #[test]
    fn test_ytdlp_default() {
        let client = YtDlp::default();
        assert_eq!(client.binary, PathBuf::from("yt-dlp"));
        assert!(client.cookies_file.is_none());
        assert!(client.extra_args.is_empty());
    }

    #[test]
    fn test_ytdlp_command_carries_client_settings() {
        let mut client = YtDlp::with_binary("/opt/yt-dlp");
        client.set_cookies_file(Some(PathBuf::from("/tmp/cookies.txt")));
        client.set_extra_args(vec![
            "--extractor-args".to_string(),
            "youtube:player-client=mweb".to_string()
        ]);
        client.set_ffmpeg_location(Some(PathBuf::from("/usr/local/bin/ffmpeg")));

        let builder = client.command();
        assert_eq!(builder.get_args(), &[
            "--cookies", "/tmp/cookies.txt",
            "--extractor-args", "youtube:player-client=mweb",
            "--ffmpeg-location", "/usr/local/bin/ffmpeg"
        ]);
    }

    /// Client whose "binary" is an inline shell script. yt-dlp's own
    /// arguments end up as the script's positional parameters.
    #[cfg(unix)]
    fn scripted(script: &str) -> YtDlp {
        let mut client = YtDlp::with_binary("sh");
        client.set_extra_args(vec!["-c".to_string(), script.to_string(), "yt-dlp".to_string()]);
        client
    }

    #[cfg(unix)]
    async fn drain(mut stream: EventStream) -> Vec<Result<DownloadEvent>> {
        use tokio_stream::StreamExt;

        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        events
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_get_playlist_entries_empty_listing() {
        let entries = scripted("exit 0").get_playlist_entries("https://example.com/pl").await.unwrap();
        assert!(entries.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_get_playlist_entries_rejects_bad_line() {
        let client = scripted(r#"echo '{"id": "a", "url": "a"}'; echo 'not json'"#);
        let err = client.get_playlist_entries("https://example.com/pl").await.unwrap_err();
        assert!(matches!(err, Error::JsonParseFailed(_)), "{err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_with_progress_reports_bytes() {
        let client = scripted(
            "echo '[download] Destination: /tmp/x.mp4'; \
             echo '[download]  50.0% of 100B'; \
             echo 'tubeget-bytes 50 100 NA'; \
             echo 'tubeget-bytes 100 NA 120.0'"
        );
        let options = DownloadOptions::new().format_id("18");

        let events: Vec<DownloadEvent> = drain(client.download_with_progress("https://example.com/v", &options))
            .await
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();

        let progress: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                DownloadEvent::Progress(p) => Some((p.downloaded_bytes, p.total_bytes)),
                _ => None
            })
            .collect();
        assert_eq!(progress, [(50, Some(100)), (100, Some(120))]);
        assert!(matches!(events.first(), Some(DownloadEvent::DownloadStarted { .. })));
        assert!(matches!(events.last(), Some(DownloadEvent::Finished { filename }) if filename == "/tmp/x.mp4"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_with_progress_failing_exit() {
        let client = scripted("echo 'ERROR: [youtube] v: Video unavailable' >&2; exit 1");

        let events = drain(client.download_with_progress("https://example.com/v", &DownloadOptions::new())).await;

        assert!(matches!(events.last(), Some(Err(Error::VideoUnavailable(_)))), "{events:?}");
    }

    #[test]
    fn test_ytdlp_env_vars() {
        let mut client = YtDlp::new();
        client.set_env("PATH_PREPEND".to_string(), "/opt/bin".to_string());
        assert_eq!(client.env_vars.get("PATH_PREPEND"), Some(&"/opt/bin".to_string()));
    }
}
