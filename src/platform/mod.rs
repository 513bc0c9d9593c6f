//! Contract the recorder consumes from the host platform.
//!
//! Everything here is a capability the platform owns: turning a surface into a
//! stream, encoding a stream into chunks, prompting for microphone/screen
//! audio, mixing audio, handing out object references and downloading them.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::PlatformError;
use crate::media::{Blob, MediaStream, MediaTrack};
use crate::recorder::{RecordOptions, RecorderState, TrackConstraints};

pub mod simulated;

pub type DataHandler = Box<dyn Fn(Blob) + Send + Sync>;
pub type StopHandler = Box<dyn Fn() + Send + Sync>;

/// Drawable region a live video stream can be captured from.
pub trait CaptureSurface: Send + Sync {
    fn capture_stream(&self, frame_rate: u32) -> Result<MediaStream, PlatformError>;
}

/// Encoder that turns a stream into chunks.
///
/// `stop` changes the state to idle immediately; the last chunk and the stop
/// signal may be delivered later, from another task.
pub trait RecordDevice: Send + Sync {
    fn state(&self) -> RecorderState;

    fn stream(&self) -> MediaStream;

    fn mime_type(&self) -> String;

    /// Starts recording. With a time slice a chunk is delivered every
    /// `time_slice_ms`; without one, a single chunk is delivered on stop.
    fn start(&self, time_slice_ms: Option<u32>) -> Result<(), PlatformError>;

    fn stop(&self) -> Result<(), PlatformError>;

    fn pause(&self) -> Result<(), PlatformError>;

    fn resume(&self) -> Result<(), PlatformError>;

    fn on_data_available(&self, handler: DataHandler);

    fn on_stop(&self, handler: StopHandler);
}

/// Access to microphone ("user") and screen ("display") capture.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn get_user_media(
        &self,
        constraints: &TrackConstraints,
    ) -> Result<MediaStream, PlatformError>;

    /// Display capture always carries a video track next to any audio.
    async fn get_display_media(
        &self,
        constraints: &TrackConstraints,
    ) -> Result<MediaStream, PlatformError>;
}

/// Mixing graph feeding every connected stream's audio into one track.
pub trait AudioGraph: Send + Sync {
    fn connect(&mut self, stream: &MediaStream);

    fn destination_track(&self) -> Option<MediaTrack>;
}

pub trait Platform: Send + Sync {
    fn create_recorder(
        &self,
        stream: MediaStream,
        options: &RecordOptions,
    ) -> Result<Arc<dyn RecordDevice>, PlatformError>;

    /// `None` when the platform cannot capture user/display media at all.
    fn media_devices(&self) -> Option<&dyn MediaDevices>;

    /// `None` when no mixing facility is available.
    fn create_audio_graph(&self) -> Option<Box<dyn AudioGraph>>;

    fn create_object_url(&self, blob: &Blob) -> String;

    fn revoke_object_url(&self, url: &str);

    fn download(&self, url: &str, filename: &str) -> Result<(), PlatformError>;

    fn host_name(&self) -> String;
}
