use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::PlatformError;
use crate::media::{MediaStream, MediaTrack, TrackSettings};
use crate::platform::MediaDevices;
use crate::recorder::{AudioSourceKind, TrackConstraints};

const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// How a simulated source answers a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBehavior {
    /// Permission granted; the stream carries this many audio tracks.
    Grant { audio_tracks: usize },
    /// The user refused the prompt.
    Deny,
    /// The capture API does not exist.
    Unsupported,
}

/// Media devices with scripted answers, recording every request made.
#[derive(Debug)]
pub struct SimulatedMediaDevices {
    user: SourceBehavior,
    display: SourceBehavior,
    requests: Mutex<Vec<(AudioSourceKind, TrackConstraints)>>,
}

impl Default for SimulatedMediaDevices {
    fn default() -> Self {
        Self::new(
            SourceBehavior::Grant { audio_tracks: 1 },
            SourceBehavior::Grant { audio_tracks: 1 },
        )
    }
}

impl SimulatedMediaDevices {
    pub fn new(user: SourceBehavior, display: SourceBehavior) -> Self {
        Self {
            user,
            display,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(AudioSourceKind, TrackConstraints)> {
        self.requests.lock().clone()
    }

    fn answer(
        &self,
        kind: AudioSourceKind,
        constraints: &TrackConstraints,
    ) -> Result<MediaStream, PlatformError> {
        self.requests.lock().push((kind, constraints.clone()));

        let behavior = match kind {
            AudioSourceKind::User => self.user,
            AudioSourceKind::Display => self.display,
        };

        let audio_tracks = match behavior {
            SourceBehavior::Grant { audio_tracks } => audio_tracks,
            SourceBehavior::Deny => {
                return Err(PlatformError::PermissionDenied(format!(
                    "{} media request was dismissed",
                    kind.as_str()
                )))
            }
            SourceBehavior::Unsupported => {
                return Err(PlatformError::NotSupported(format!(
                    "{} media capture",
                    kind.as_str()
                )))
            }
        };

        let settings = TrackSettings {
            sample_rate: Some(constraints.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)),
            channel_count: Some(constraints.channel_count.unwrap_or(1)),
            ..TrackSettings::default()
        };

        let stream = MediaStream::new();
        for index in 0..audio_tracks {
            stream.add_track(MediaTrack::audio(
                format!("{}-audio-{}", kind.as_str(), index),
                settings.clone(),
            ));
        }
        if kind == AudioSourceKind::Display {
            stream.add_track(MediaTrack::video("screen", TrackSettings::default()));
        }

        debug!(
            "Simulated {} media granted with {} audio track(s)",
            kind.as_str(),
            audio_tracks
        );
        Ok(stream)
    }
}

#[async_trait]
impl MediaDevices for SimulatedMediaDevices {
    async fn get_user_media(
        &self,
        constraints: &TrackConstraints,
    ) -> Result<MediaStream, PlatformError> {
        self.answer(AudioSourceKind::User, constraints)
    }

    async fn get_display_media(
        &self,
        constraints: &TrackConstraints,
    ) -> Result<MediaStream, PlatformError> {
        self.answer(AudioSourceKind::Display, constraints)
    }
}
