use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tubeget::Config;

#[derive(Parser)]
#[command(
    version,
    about = "Download single videos or whole playlists at a chosen resolution",
    long_about = "Download single videos or whole playlists at a chosen resolution.\n\
                  Supported resolutions are 144p, 360p and 720p. Playlist entries are\n\
                  downloaded one after another; entries that do not offer the requested\n\
                  resolution are skipped."
)]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Enable detailed debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Args)]
pub struct BackendArgs {
    /// Path to the yt-dlp binary
    #[arg(long, env = "TUBEGET_YTDLP_PATH", global = true)]
    pub ytdlp_path: Option<PathBuf>,

    /// Netscape cookies file handed to yt-dlp
    #[arg(long, env = "TUBEGET_COOKIES_FILE", global = true)]
    pub cookies_file: Option<PathBuf>,

    /// Path to ffmpeg
    #[arg(long, env = "TUBEGET_FFMPEG_PATH", global = true)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Path to a deno binary yt-dlp should use for JS challenges
    #[arg(long, env = "TUBEGET_DENO_PATH", global = true)]
    pub deno_path: Option<PathBuf>,

    /// yt-dlp extractor arguments, separated by newlines or semicolons
    #[arg(long, env = "TUBEGET_EXTRACTOR_ARGS", global = true)]
    pub extractor_args: Option<String>
}

impl From<BackendArgs> for Config {
    fn from(args: BackendArgs) -> Self {
        Config {
            ytdlp_path: args.ytdlp_path,
            cookies_file: args.cookies_file,
            ffmpeg_path: args.ffmpeg_path,
            deno_path: args.deno_path,
            extractor_args: args.extractor_args
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the entries of a playlist without downloading
    List {
        /// Playlist URL
        url: String
    },
    /// Download a single video
    Video {
        /// Video URL
        url: String,

        #[command(flatten)]
        download: DownloadArgs
    },
    /// Download every entry of a playlist, one after another
    Playlist {
        /// Playlist URL
        url: String,

        #[command(flatten)]
        download: DownloadArgs,

        /// Entries to leave out, by the 1-based number shown by `list`
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<usize>
    }
}

#[derive(Args)]
pub struct DownloadArgs {
    /// Resolution: 144p, 360p or 720p
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Existing directory to save into
    #[arg(short, long)]
    pub output: Option<PathBuf>
}
