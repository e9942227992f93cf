use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::types::DownloadOptions;

/// Marker that starts every line printed through [`PROGRESS_TEMPLATE`].
pub(crate) const PROGRESS_MARKER: &str = "tubeget-bytes";

/// Template yt-dlp prints once per progress tick when `--newline` is set.
/// The leading `download:` selects the progress type and is not printed.
/// Fields: downloaded bytes, exact total, estimated total (`NA` when unknown).
pub(crate) const PROGRESS_TEMPLATE: &str = "download:tubeget-bytes %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s";

pub struct CommandBuilder {
    binary: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.arg(url)
    }

    pub fn json_output(self) -> Self {
        self.arg("--dump-json")
    }

    pub fn skip_download(self) -> Self {
        self.arg("--skip-download")
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.arg("-f").arg(format)
    }

    pub fn output_template(self, template: impl Into<String>) -> Self {
        self.arg("-o").arg(template)
    }

    pub fn cookies_file_opt(self, path: Option<&PathBuf>) -> Self {
        match path {
            Some(p) => self.arg("--cookies").arg(p.to_string_lossy().to_string()),
            None => self
        }
    }

    pub fn progress_template(self, template: impl Into<String>) -> Self {
        self.arg("--progress-template").arg(template)
    }

    pub fn newline_progress(self) -> Self {
        self.arg("--newline")
    }

    pub fn flat_playlist(self) -> Self {
        self.arg("--flat-playlist")
    }

    pub fn yes_playlist(self) -> Self {
        self.arg("--yes-playlist")
    }

    pub fn no_playlist(self) -> Self {
        self.arg("--no-playlist")
    }

    pub fn ffmpeg_location(self, path: impl AsRef<Path>) -> Self {
        self.arg("--ffmpeg-location").arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn with_options(mut self, options: &DownloadOptions) -> Self {
        if let Some(ref id) = options.format_id {
            self = self.format(id.clone());
        }

        if let Some(ref template) = options.output_template {
            self = self.output_template(template.clone());
        }

        self.args(options.extra_args.iter().cloned())
    }

    pub fn build_with_env(&self, env_vars: &HashMap<String, String>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);

        if let Some(path_prepend) = env_vars.get("PATH_PREPEND") {
            let current_path = std::env::var("PATH").unwrap_or_default();
            cmd.env("PATH", format!("{path_prepend}:{current_path}"));
        }

        for (key, value) in env_vars {
            if key != "PATH_PREPEND" {
                cmd.env(key, value);
            }
        }

        cmd
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_metadata() {
        let builder = CommandBuilder::new("yt-dlp")
            .json_output()
            .skip_download()
            .no_playlist()
            .url("https://example.com/video");
        assert_eq!(builder.get_args(), &[
            "--dump-json",
            "--skip-download",
            "--no-playlist",
            "https://example.com/video"
        ]);
    }

    #[test]
    fn test_progress_template_prints_marker() {
        let printed = PROGRESS_TEMPLATE.strip_prefix("download:").unwrap();
        assert!(printed.starts_with(PROGRESS_MARKER));
    }

    #[test]
    fn test_command_builder_with_options() {
        let options = DownloadOptions::new()
            .format_id("18")
            .output_template("/tmp/out/%(title)s.%(ext)s")
            .extra_arg("--no-part");
        let builder = CommandBuilder::new("yt-dlp")
            .with_options(&options)
            .url("https://example.com/video");
        assert_eq!(builder.get_args(), &[
            "-f", "18",
            "-o", "/tmp/out/%(title)s.%(ext)s",
            "--no-part",
            "https://example.com/video"
        ]);
    }

    #[test]
    fn test_command_builder_cookies_file_opt() {
        let some_path = Some(PathBuf::from("/tmp/cookies.txt"));
        let builder = CommandBuilder::new("yt-dlp")
            .cookies_file_opt(some_path.as_ref());
        assert_eq!(builder.get_args(), &["--cookies", "/tmp/cookies.txt"]);

        let builder = CommandBuilder::new("yt-dlp").cookies_file_opt(None);
        assert!(builder.get_args().is_empty());
    }

    #[test]
    fn test_build_with_env_path_prepend() {
        let mut env_vars = HashMap::new();
        env_vars.insert("PATH_PREPEND".to_string(), "/opt/bin".to_string());
        let cmd = CommandBuilder::new("echo").arg("test").build_with_env(&env_vars);
        let envs: HashMap<_, _> = cmd
            .as_std()
            .get_envs()
            .filter_map(|(k, v)| Some((k.to_string_lossy().to_string(), v?.to_string_lossy().to_string())))
            .collect();
        assert!(envs.get("PATH").unwrap().starts_with("/opt/bin:"));
        assert!(!envs.contains_key("PATH_PREPEND"));
    }
}
