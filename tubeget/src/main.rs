mod cli;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubeget::{Config, Controller, Panel, Quality, StreamSource, ValidationError, YtDlpSource};

use cli::{Cli, Command, DownloadArgs};
use ui::Terminal;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = Config::from(cli.backend);
    let yt_dlp = config.build_client();

    match yt_dlp.check_binary().await {
        Ok(version) => tracing::info!("yt-dlp version: {}", version),
        Err(e) => tracing::warn!("yt-dlp not found or not executable: {}", e)
    }

    let source: Arc<dyn StreamSource> = Arc::new(YtDlpSource::new(yt_dlp));
    let mut controller = Controller::new(source);

    let ok = match cli.command {
        Command::List { url } => list(&mut controller, &url).await,
        Command::Video { url, download } => video(&mut controller, &url, download).await,
        Command::Playlist {
            url,
            download,
            exclude
        } => playlist(&mut controller, &url, download, &exclude).await
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose {
        "tubeget=debug,yt_dlp=debug"
    } else {
        "tubeget=info,yt_dlp=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into())
        )
        .try_init()?;
    Ok(())
}

/// Applies quality and directory choices for `panel`.
fn choose(controller: &mut Controller, panel: Panel, args: DownloadArgs) -> Result<(), ValidationError> {
    let quality = args
        .quality
        .as_deref()
        .map(str::parse::<Quality>)
        .transpose()?;
    controller.set_quality(panel, quality);
    controller.select_target(panel, args.output)
}

/// Enumerates `url` into the playlist queue, printing entries as they
/// arrive. Returns false on a validation or enumeration error.
async fn fetch(controller: &mut Controller, url: &str, term: &Terminal) -> bool {
    if let Err(e) = controller.fetch_playlist(url) {
        term.warn(&e);
        return false;
    }

    let mut printed = 0;
    let mut had_error = false;
    while let Some(event) = controller.next_event().await {
        controller.apply(event);
        for (index, item) in controller.playlist.queue.iter().enumerate().skip(printed) {
            term.line(&format!("{:>4}. {}", index + 1, item.title));
        }
        printed = controller.playlist.queue.len();
        had_error |= term.show_notices(controller.take_notices());
    }
    term.line(&controller.playlist.view.status);
    !had_error
}

async fn list(controller: &mut Controller, url: &str) -> bool {
    let term = Terminal::new(&[]);
    fetch(controller, url, &term).await
}

async fn video(controller: &mut Controller, url: &str, args: DownloadArgs) -> bool {
    let term = Terminal::new(&["video"]);
    if let Err(e) = choose(controller, Panel::Video, args).and_then(|()| controller.download_video(url)) {
        term.warn(&e);
        return false;
    }

    let mut had_error = false;
    while let Some(event) = controller.next_event().await {
        controller.apply(event);
        term.render_video(&controller.video.view);
        had_error |= term.show_notices(controller.take_notices());
    }
    term.finish();

    if !controller.video.view.current.is_empty() {
        term.line(&controller.video.view.current);
    }
    !had_error
}

async fn playlist(controller: &mut Controller, url: &str, args: DownloadArgs, exclude: &[usize]) -> bool {
    let list_term = Terminal::new(&[]);
    let ready = choose(controller, Panel::Playlist, args).and_then(|()| controller.playlist_settings().map(drop));
    if let Err(e) = ready {
        list_term.warn(&e);
        return false;
    }

    let fetched = fetch(controller, url, &list_term).await;
    if !exclude.is_empty() {
        let indices: Vec<usize> = exclude.iter().filter_map(|n| n.checked_sub(1)).collect();
        let removed = controller.delete_selected(&indices);
        tracing::info!(removed, "excluded playlist entries");
    }

    let term = Terminal::new(&["item", "playlist"]);
    if let Err(e) = controller.download_playlist() {
        term.warn(&e);
        return false;
    }

    let mut had_error = false;
    while let Some(event) = controller.next_event().await {
        controller.apply(event);
        term.render_playlist(&controller.playlist.view);
        had_error |= term.show_notices(controller.take_notices());
    }
    term.finish();
    fetched && !had_error
}
