//! CLI handler for recording a synthetic canvas.
//!
//! Drives the simulated platform end to end: capture, optional audio merge,
//! a timed session, then a download of the resulting movie.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::args::RecordCliArgs;
use crate::config::Config;
use crate::platform::simulated::{SimulatedPlatform, SyntheticCanvas};
use crate::recorder::{CanvasRecorder, FactoryOptions, MergeOutcome};

pub async fn handle_record_command(args: RecordCliArgs) -> Result<()> {
    let config = Config::load()?;
    let options = factory_options(&config, &args);
    let time_slice = args.time_slice.or(config.recorder.time_slice_ms);

    let download_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => config.download_dir()?,
    };

    let mut builder = SimulatedPlatform::builder()
        .download_dir(&download_dir)
        .mixing(!args.no_mixer);
    if let Some(host) = &config.output.host_name {
        builder = builder.host_name(host.clone());
    }
    let platform = Arc::new(builder.build());

    let canvas = SyntheticCanvas::new(args.width, args.height);
    let audio = options.audio.clone();
    let mut recorder = CanvasRecorder::create(platform.clone(), &canvas, options)?;

    match recorder.merge_audio(&audio).await {
        MergeOutcome::NotRequested => debug!("No audio requested"),
        MergeOutcome::NoAudio => println!("Requested audio sources produced no tracks"),
        MergeOutcome::Direct(count) => println!("Attached {count} audio track(s) directly"),
        MergeOutcome::Mixed(count) => println!("Mixed {count} audio track(s)"),
    }

    recorder.start(time_slice)?;
    info!(
        "Recording {}x{} canvas for {} ms",
        args.width, args.height, args.duration_ms
    );
    tokio::time::sleep(Duration::from_millis(args.duration_ms)).await;

    let completion = recorder
        .finish()?
        .ok_or_else(|| anyhow!("Recorder stopped before the session finished"))?;
    let movie = completion.wait().await?;

    let filename = movie.download(args.filename.as_deref())?;
    println!(
        "Saved {} ({} bytes, {})",
        platform.download_dir().join(&filename).display(),
        movie.size(),
        movie.mime_type()
    );

    recorder.teardown();
    Ok(())
}

/// Config values with command-line overrides applied.
fn factory_options(config: &Config, args: &RecordCliArgs) -> FactoryOptions {
    let mut options = config.factory_options();
    if let Some(rate) = args.frame_rate {
        options.frame_rate = rate;
    }
    if let Some(user) = args.user_audio {
        options.audio.user = user.into();
    }
    if let Some(display) = args.display_audio {
        options.audio.display = display.into();
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, CliCommand};
    use crate::recorder::AudioRequest;
    use clap::Parser;

    fn record_args(extra: &[&str]) -> RecordCliArgs {
        let argv = ["canvas-recorder", "record"].iter().chain(extra.iter());
        match Cli::parse_from(argv).command {
            CliCommand::Record(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();
        let args = record_args(&["--frame-rate", "24", "--user-audio", "--display-audio=false"]);

        let options = factory_options(&config, &args);
        assert_eq!(options.frame_rate, 24);
        assert_eq!(options.audio.user, AudioRequest::Enabled(true));
        assert_eq!(options.audio.display, AudioRequest::Enabled(false));
    }

    #[test]
    fn test_config_applies_without_flags() {
        let mut config = Config::default();
        config.recorder.frame_rate = 15;
        config.recorder.record_options.insert("mimeType".into(), "video/mp4".into());

        let options = factory_options(&config, &record_args(&[]));
        assert_eq!(options.frame_rate, 15);
        assert_eq!(options.audio, config.audio);
        assert_eq!(options.record_options["mimeType"], "video/mp4");
    }
}
