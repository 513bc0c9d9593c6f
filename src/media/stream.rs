use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::track::{MediaKind, MediaTrack};

/// Shared, ordered set of tracks. Clones refer to the same stream.
#[derive(Clone)]
pub struct MediaStream {
    id: Arc<str>,
    tracks: Arc<Mutex<Vec<MediaTrack>>>,
}

impl Default for MediaStream {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStream {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string().into(),
            tracks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_tracks(tracks: impl IntoIterator<Item = MediaTrack>) -> Self {
        let stream = Self::new();
        for track in tracks {
            stream.add_track(track);
        }
        stream
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adding a track that is already part of the stream does nothing.
    pub fn add_track(&self, track: MediaTrack) {
        let mut tracks = self.tracks.lock();
        if !tracks.contains(&track) {
            tracks.push(track);
        }
    }

    pub fn remove_track(&self, track: &MediaTrack) {
        self.tracks.lock().retain(|t| t != track);
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.lock().clone()
    }

    pub fn audio_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(MediaKind::Audio)
    }

    pub fn video_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(MediaKind::Video)
    }

    fn tracks_of(&self, kind: MediaKind) -> Vec<MediaTrack> {
        self.tracks
            .lock()
            .iter()
            .filter(|t| t.kind() == kind)
            .cloned()
            .collect()
    }

    /// Stops every track; the tracks stay in the stream, ended.
    pub fn stop_tracks(&self) {
        for track in self.tracks() {
            track.stop();
        }
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &*self.tracks.lock())
            .finish()
    }
}
