use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

/// Settings a track reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSettings {
    pub frame_rate: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channel_count: Option<u32>,
}

struct TrackInner {
    id: String,
    kind: MediaKind,
    label: String,
    settings: TrackSettings,
    enabled: AtomicBool,
    ended: AtomicBool,
}

/// Handle to one live media track. Clones refer to the same track, so
/// stopping or disabling through any clone is seen by all of them.
#[derive(Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl MediaTrack {
    pub fn new(kind: MediaKind, label: impl Into<String>, settings: TrackSettings) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id: Uuid::new_v4().to_string(),
                kind,
                label: label.into(),
                settings,
                enabled: AtomicBool::new(true),
                ended: AtomicBool::new(false),
            }),
        }
    }

    pub fn audio(label: impl Into<String>, settings: TrackSettings) -> Self {
        Self::new(MediaKind::Audio, label, settings)
    }

    pub fn video(label: impl Into<String>, settings: TrackSettings) -> Self {
        Self::new(MediaKind::Video, label, settings)
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> MediaKind {
        self.inner.kind
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn settings(&self) -> &TrackSettings {
        &self.inner.settings
    }

    pub fn enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Disabled tracks keep running but produce silence / black frames.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Ends the track permanently.
    pub fn stop(&self) {
        if !self.inner.ended.swap(true, Ordering::SeqCst) {
            debug!("Stopped {} track '{}'", self.kind().as_str(), self.label());
        }
    }

    pub fn is_ended(&self) -> bool {
        self.inner.ended.load(Ordering::SeqCst)
    }

    /// Live and enabled.
    pub fn is_producing(&self) -> bool {
        !self.is_ended() && self.enabled()
    }
}

impl PartialEq for MediaTrack {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for MediaTrack {}

impl fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaTrack")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("label", &self.inner.label)
            .field("enabled", &self.enabled())
            .field("ended", &self.is_ended())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let track = MediaTrack::audio("mic", TrackSettings::default());
        let clone = track.clone();

        clone.set_enabled(false);
        assert!(!track.enabled());
        assert!(!track.is_producing());

        track.set_enabled(true);
        clone.stop();
        assert!(track.is_ended());
        assert!(!track.is_producing());
        assert_eq!(track, clone);
    }

    #[test]
    fn test_distinct_tracks_are_not_equal() {
        let a = MediaTrack::video("canvas", TrackSettings::default());
        let b = MediaTrack::video("canvas", TrackSettings::default());
        assert_ne!(a, b);
        assert_eq!(a.kind().as_str(), "video");
    }
}
