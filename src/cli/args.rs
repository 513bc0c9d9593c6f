use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "canvas-recorder")]
#[command(about = "Record a canvas surface into a downloadable movie", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Record a synthetic canvas and download the result
    Record(RecordCliArgs),
    /// Show the config file location and its contents
    Config,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct RecordCliArgs {
    /// How long to record, in milliseconds
    #[arg(short, long, default_value = "2000")]
    pub duration_ms: u64,
    /// Chunk interval in milliseconds (default: from config)
    #[arg(short, long)]
    pub time_slice: Option<u32>,
    /// Capture frame rate (default: from config)
    #[arg(short, long)]
    pub frame_rate: Option<u32>,
    /// Merge microphone audio into the recording
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub user_audio: Option<bool>,
    /// Merge screen-share audio into the recording
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub display_audio: Option<bool>,
    /// Attach audio tracks directly instead of mixing them
    #[arg(long)]
    pub no_mixer: bool,
    /// Canvas width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,
    /// Canvas height in pixels
    #[arg(long, default_value = "360")]
    pub height: u32,
    /// Directory the movie is saved to (default: from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// File name without extension (default: host and timestamp)
    #[arg(short = 'n', long)]
    pub filename: Option<String>,
}
