//! End-to-end recording against the simulated platform.

use std::sync::Arc;
use std::time::Duration;

use canvas_recorder::platform::simulated::{
    SimulatedMediaDevices, SimulatedPlatform, SourceBehavior, SyntheticCanvas,
};
use canvas_recorder::{
    AudioOptions, CanvasRecorder, FactoryOptions, MediaKind, RecorderError, RecorderState,
};

async fn wait_for_chunk(recorder: &CanvasRecorder) {
    for _ in 0..400 {
        if recorder.pending_chunks() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("no chunk was delivered");
}

#[tokio::test]
async fn test_record_and_download_movie() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        SimulatedPlatform::builder()
            .host_name("example.com")
            .download_dir(dir.path())
            .build(),
    );
    let options = FactoryOptions {
        audio: AudioOptions::new(false, false),
        ..FactoryOptions::default()
    };
    let canvas = SyntheticCanvas::new(640, 360);
    let mut recorder = CanvasRecorder::create(platform.clone(), &canvas, options).unwrap();

    recorder.start(Some(100)).unwrap();
    assert_eq!(recorder.state(), RecorderState::Recording);
    wait_for_chunk(&recorder).await;

    let completion = recorder.finish().unwrap().expect("session in progress");
    let movie = completion.wait().await.unwrap();

    assert!(movie.size() > 0);
    assert_eq!(movie.mime_type(), "video/webm");
    assert_eq!(recorder.movie().map(|m| m.size()), Some(movie.size()));

    let element = movie.create_video_element().unwrap();
    assert!(element.controls);
    assert!(element.src.starts_with("blob:https://example.com/"));

    let filename = movie.download(Some("canvas")).unwrap();
    assert_eq!(filename, "canvas.webm");
    let written = std::fs::read(dir.path().join(&filename)).unwrap();
    assert_eq!(written.len(), movie.size());
    assert!(String::from_utf8_lossy(&written).starts_with("frame 0 picture audio=0"));

    let default_name = movie.download(None).unwrap();
    assert!(default_name.starts_with("example.com_"));
    assert_eq!(platform.downloads().len(), 2);

    recorder.teardown();
    assert!(movie.is_released());
    assert_eq!(
        movie.create_video_element(),
        Err(RecorderError::MovieDestroyed)
    );
    assert_eq!(platform.live_object_urls(), 0);
}

#[tokio::test]
async fn test_record_with_mixed_audio() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        SimulatedPlatform::builder()
            .download_dir(dir.path())
            .media_devices(SimulatedMediaDevices::new(
                SourceBehavior::Grant { audio_tracks: 1 },
                SourceBehavior::Grant { audio_tracks: 2 },
            ))
            .build(),
    );
    let options = FactoryOptions {
        frame_rate: 30,
        audio: AudioOptions::new(true, true),
        ..FactoryOptions::default()
    };

    let mut recorder =
        CanvasRecorder::create_with_audio(platform.clone(), &SyntheticCanvas::default(), options)
            .await
            .unwrap();

    let stream = recorder.stream();
    assert_eq!(stream.video_tracks().len(), 1);
    assert_eq!(stream.audio_tracks().len(), 1);
    assert_eq!(stream.audio_tracks()[0].kind(), MediaKind::Audio);
    assert_eq!(platform.mixed_sources().len(), 3);

    recorder.start(Some(100)).unwrap();
    wait_for_chunk(&recorder).await;
    let movie = recorder.finish().unwrap().unwrap().wait().await.unwrap();

    let filename = movie.download(None).unwrap();
    let written = std::fs::read_to_string(dir.path().join(filename)).unwrap();
    assert!(written.lines().all(|line| line.ends_with("audio=1")));

    recorder.teardown();
}
