use parking_lot::Mutex;
use std::sync::Arc;

use crate::media::{MediaStream, MediaTrack, TrackSettings};
use crate::platform::AudioGraph;

const MIX_SAMPLE_RATE: u32 = 48_000;

/// Mixing graph with a single stereo destination track. Connected source
/// tracks are recorded in a list shared with the platform for inspection.
pub struct SimulatedAudioGraph {
    destination: MediaTrack,
    sources: Arc<Mutex<Vec<MediaTrack>>>,
}

impl SimulatedAudioGraph {
    pub fn new(sources: Arc<Mutex<Vec<MediaTrack>>>) -> Self {
        Self {
            destination: MediaTrack::audio(
                "mixed-audio",
                TrackSettings {
                    sample_rate: Some(MIX_SAMPLE_RATE),
                    channel_count: Some(2),
                    ..TrackSettings::default()
                },
            ),
            sources,
        }
    }
}

impl AudioGraph for SimulatedAudioGraph {
    fn connect(&mut self, stream: &MediaStream) {
        self.sources.lock().extend(stream.audio_tracks());
    }

    fn destination_track(&self) -> Option<MediaTrack> {
        Some(self.destination.clone())
    }
}
