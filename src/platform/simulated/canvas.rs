use crate::errors::PlatformError;
use crate::media::{MediaStream, MediaTrack, TrackSettings};
use crate::platform::CaptureSurface;

/// Stand-in for a canvas element: a fixed-size surface producing one video
/// track per capture.
#[derive(Debug, Clone)]
pub struct SyntheticCanvas {
    pub width: u32,
    pub height: u32,
    pub label: String,
}

impl Default for SyntheticCanvas {
    fn default() -> Self {
        Self::new(300, 150)
    }
}

impl SyntheticCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            label: "canvas".to_string(),
        }
    }
}

impl CaptureSurface for SyntheticCanvas {
    fn capture_stream(&self, frame_rate: u32) -> Result<MediaStream, PlatformError> {
        if self.width == 0 || self.height == 0 {
            return Err(PlatformError::InvalidState(format!(
                "canvas '{}' has no drawable area",
                self.label
            )));
        }

        let track = MediaTrack::video(
            self.label.clone(),
            TrackSettings {
                frame_rate: Some(frame_rate),
                width: Some(self.width),
                height: Some(self.height),
                ..TrackSettings::default()
            },
        );
        Ok(MediaStream::with_tracks([track]))
    }
}
