use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tubeget::controller::{PlaylistView, VideoView};
use tubeget::Notice;

const BAR_TEMPLATE: &str = "{prefix:>8} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Terminal rendering of panel view state.
pub struct Terminal {
    multi: MultiProgress,
    bars: Vec<ProgressBar>
}

impl Terminal {
    /// One progress bar per prefix, top to bottom.
    pub fn new(prefixes: &[&'static str]) -> Self {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bars = prefixes
            .iter()
            .map(|prefix| {
                multi.add(
                    ProgressBar::new(100)
                        .with_style(style.clone())
                        .with_prefix(*prefix)
                )
            })
            .collect();
        Self { multi, bars }
    }

    pub fn render_video(&self, view: &VideoView) {
        if let Some(bar) = self.bars.first() {
            bar.set_position(u64::from(view.percent));
            bar.set_message(view.sizes.clone());
        }
    }

    pub fn render_playlist(&self, view: &PlaylistView) {
        if let [item, batch] = self.bars.as_slice() {
            item.set_position(u64::from(view.item_percent));
            item.set_message(view.current.clone());
            batch.set_position(u64::from(view.batch_percent));
            batch.set_message(view.sizes());
        }
    }

    pub fn line(&self, text: &str) {
        self.multi.suspend(|| println!("{text}"));
    }

    pub fn warn(&self, err: &dyn std::error::Error) {
        self.multi.suspend(|| eprintln!("Warning: {err}"));
    }

    /// Prints pending notices; returns true if any was an error.
    pub fn show_notices(&self, notices: Vec<Notice>) -> bool {
        let mut had_error = false;
        for notice in notices {
            match notice {
                Notice::Info(msg) => self.line(&msg),
                Notice::Error(msg) => {
                    had_error = true;
                    self.multi.suspend(|| eprintln!("Error: {msg}"));
                }
            }
        }
        had_error
    }

    pub fn finish(&self) {
        for bar in &self.bars {
            bar.finish();
        }
    }
}
