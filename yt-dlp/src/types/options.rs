/// Options for a single-format download.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Exact yt-dlp `format_id` to fetch; `None` lets yt-dlp pick.
    pub format_id: Option<String>,
    pub output_template: Option<String>,
    pub extra_args: Vec<String>
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_id(mut self, id: impl Into<String>) -> Self {
        self.format_id = Some(id.into());
        self
    }

    pub fn output_template(mut self, template: impl Into<String>) -> Self {
        self.output_template = Some(template.into());
        self
    }

    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }
}
