use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::completion::Completion;
use super::movie::Movie;
use super::options::{FactoryOptions, RecordOptions};
use super::state::RecorderState;
use crate::errors::RecorderError;
use crate::events::{listener, EventHub, EventName, Listener};
use crate::media::{Blob, MediaStream, MediaTrack};
use crate::platform::{AudioGraph, CaptureSurface, Platform, RecordDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RecorderEvent {
    Finish,
}

impl EventName for RecorderEvent {}

/// Start/pause/resume/finish wrapper around one record device.
///
/// State guards mirror the device: calls that do not fit the current state
/// are silently ignored. Platform failures are returned untouched inside
/// [`RecorderError::Platform`].
pub struct CanvasRecorder {
    pub(super) platform: Arc<dyn Platform>,
    pub(super) device: Arc<dyn RecordDevice>,
    hub: Arc<EventHub<RecorderEvent, Vec<Blob>>>,
    chunks: Arc<Mutex<Vec<Blob>>>,
    movie: Arc<Mutex<Option<Movie>>>,
    completion: Option<Completion>,
    pub(super) display_stream: Option<MediaStream>,
    pub(super) user_stream: Option<MediaStream>,
    pub(super) audio_graph: Option<Box<dyn AudioGraph>>,
    // Audio tracks merge_audio attached to the recorded stream.
    pub(super) merged_tracks: Vec<MediaTrack>,
}

impl CanvasRecorder {
    /// Builds a recorder around an existing stream. `record_options` go to
    /// the device as they are.
    pub fn new(
        platform: Arc<dyn Platform>,
        stream: MediaStream,
        record_options: RecordOptions,
    ) -> Result<Self, RecorderError> {
        let device = platform.create_recorder(stream, &record_options)?;
        let hub = Arc::new(EventHub::new());
        let chunks: Arc<Mutex<Vec<Blob>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&chunks);
        device.on_data_available(Box::new(move |blob| {
            sink.lock().push(blob);
        }));

        let finish_hub = Arc::clone(&hub);
        let collected = Arc::clone(&chunks);
        device.on_stop(Box::new(move || {
            let finished = std::mem::take(&mut *collected.lock());
            debug!("Record device stopped with {} chunk(s)", finished.len());
            finish_hub.emit(&RecorderEvent::Finish, &finished);
        }));

        info!(
            "CanvasRecorder ready ({}, {} track(s))",
            device.mime_type(),
            device.stream().tracks().len()
        );

        Ok(Self {
            platform,
            device,
            hub,
            chunks,
            movie: Arc::new(Mutex::new(None)),
            completion: None,
            display_stream: None,
            user_stream: None,
            audio_graph: None,
            merged_tracks: Vec::new(),
        })
    }

    /// Captures `surface` at `options.frame_rate` and records its video.
    pub fn create(
        platform: Arc<dyn Platform>,
        surface: &dyn CaptureSurface,
        options: FactoryOptions,
    ) -> Result<Self, RecorderError> {
        let captured = surface.capture_stream(options.frame_rate)?;
        let stream = MediaStream::with_tracks(captured.video_tracks());
        Self::new(platform, stream, options.record_options)
    }

    /// [`create`](Self::create) followed by [`merge_audio`](Self::merge_audio)
    /// with `options.audio`.
    pub async fn create_with_audio(
        platform: Arc<dyn Platform>,
        surface: &dyn CaptureSurface,
        options: FactoryOptions,
    ) -> Result<Self, RecorderError> {
        let audio = options.audio.clone();
        let mut recorder = Self::create(platform, surface, options)?;
        recorder.merge_audio(&audio).await;
        Ok(recorder)
    }

    pub fn state(&self) -> RecorderState {
        self.device.state()
    }

    pub fn stream(&self) -> MediaStream {
        self.device.stream()
    }

    pub fn mime_type(&self) -> String {
        self.device.mime_type()
    }

    /// Movie of the last finished session, until released.
    pub fn movie(&self) -> Option<Movie> {
        self.movie.lock().clone()
    }

    /// Chunks received so far in the running session.
    pub fn pending_chunks(&self) -> usize {
        self.chunks.lock().len()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion.clone()
    }

    /// Starts a session when the device is idle; otherwise does nothing.
    ///
    /// Releases the previous movie. With `time_slice_ms` the device hands
    /// over data every slice, otherwise once when the session finishes.
    pub fn start(&mut self, time_slice_ms: Option<u32>) -> Result<(), RecorderError> {
        let state = self.device.state();
        if state != RecorderState::Idle {
            debug!("start ignored while {}", state);
            return Ok(());
        }
        if self.completion.as_ref().is_some_and(|c| !c.is_resolved()) {
            debug!("start ignored while the previous session is still finishing");
            return Ok(());
        }

        self.release_output();

        let (tx, completion) = Completion::channel();
        let platform = Arc::clone(&self.platform);
        let retained = Arc::clone(&self.movie);
        let on_finish: Listener<RecorderEvent, Vec<Blob>> =
            listener(move |_, chunks: &Vec<Blob>| {
                let result = match chunks.first() {
                    Some(first) => {
                        let blob = Blob::from_parts(chunks, first.mime_type());
                        let movie = Movie::new(Arc::clone(&platform), &blob);
                        *retained.lock() = Some(movie.clone());
                        Ok(movie)
                    }
                    None => {
                        error!("Recording stopped without producing any data");
                        Err(RecorderError::NoData)
                    }
                };
                tx.send_replace(Some(result));
            });

        self.hub.once(RecorderEvent::Finish, Arc::clone(&on_finish));
        if let Err(e) = self.device.start(time_slice_ms) {
            self.hub.off(&RecorderEvent::Finish, &on_finish);
            return Err(e.into());
        }

        self.completion = Some(completion);
        info!(
            "Recording started (time slice: {})",
            time_slice_ms.map_or_else(|| "none".to_string(), |ms| format!("{ms}ms"))
        );
        Ok(())
    }

    /// Stops a running session and returns the handle of the current one.
    ///
    /// When not recording nothing is stopped and the current handle is
    /// returned as is: it may already be resolved, or never resolve.
    pub fn finish(&self) -> Result<Option<Completion>, RecorderError> {
        if self.device.state() != RecorderState::Recording {
            return Ok(self.completion.clone());
        }

        self.device.stop()?;
        info!("Recording finished, assembling movie");
        Ok(self.completion.clone())
    }

    pub fn pause(&self) -> Result<(), RecorderError> {
        if self.device.state() != RecorderState::Recording {
            return Ok(());
        }

        self.device.pause()?;
        debug!("Recording paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), RecorderError> {
        if self.device.state() != RecorderState::Paused {
            return Ok(());
        }

        self.device.resume()?;
        debug!("Recording resumed");
        Ok(())
    }

    /// Releases the retained movie, if any.
    pub fn release_output(&self) {
        let movie = self.movie.lock().take();
        if let Some(movie) = movie {
            movie.release();
        }
    }

    /// Releases the movie, stops every recorded track and drops the
    /// auxiliary audio sources.
    pub fn teardown(mut self) {
        self.release_output();

        for track in self.device.stream().tracks() {
            track.stop();
        }

        self.release_display_stream();
        self.release_user_stream();
        self.audio_graph = None;
        self.merged_tracks.clear();
        info!("CanvasRecorder torn down");
    }

    /// Disables (or re-enables) every track without stopping it.
    pub fn set_disabled(&self, flag: bool) {
        for track in self.device.stream().tracks() {
            track.set_enabled(!flag);
        }
    }

    pub fn set_hidden(&self, flag: bool) {
        for track in self.device.stream().video_tracks() {
            track.set_enabled(!flag);
        }
    }

    pub fn set_muted(&self, flag: bool) {
        for track in self.device.stream().audio_tracks() {
            track.set_enabled(!flag);
        }
    }

    pub(super) fn release_display_stream(&mut self) {
        if let Some(stream) = self.display_stream.take() {
            stream.stop_tracks();
            debug!("Released display audio source");
        }
    }

    pub(super) fn release_user_stream(&mut self) {
        if let Some(stream) = self.user_stream.take() {
            stream.stop_tracks();
            debug!("Released user audio source");
        }
    }
}
