use anyhow::Result;
use canvas_recorder::cli::{handle_config_command, handle_record_command, Cli, CliCommand};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        CliCommand::Record(args) => handle_record_command(args).await,
        CliCommand::Config => handle_config_command(),
        CliCommand::Version => {
            println!("canvas-recorder {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
