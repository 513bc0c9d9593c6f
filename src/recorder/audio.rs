//! Merging microphone and screen audio into the recorded stream.

use tracing::{debug, info, warn};

use super::controller::CanvasRecorder;
use super::options::{AudioOptions, TrackConstraints};
use crate::media::MediaStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSourceKind {
    /// Microphone.
    User,
    /// Screen share.
    Display,
}

impl AudioSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSourceKind::User => "user",
            AudioSourceKind::Display => "display",
        }
    }
}

/// What [`CanvasRecorder::merge_audio`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Neither source was requested.
    NotRequested,
    /// The requested sources yielded no audio track.
    NoAudio,
    /// No mixing facility; this many tracks were attached one by one.
    Direct(usize),
    /// This many tracks were mixed into one attached track.
    Mixed(usize),
}

impl CanvasRecorder {
    /// Acquires display audio, then microphone audio, and attaches them to
    /// the recorded stream.
    ///
    /// A source that cannot be acquired is skipped with a warning. Audio
    /// attached by an earlier merge is detached first, and every source
    /// still held is merged again, so the stream carries one merged track at
    /// most. Without a mixing facility every audio track is attached
    /// directly, which most encoders only record the first of.
    pub async fn merge_audio(&mut self, options: &AudioOptions) -> MergeOutcome {
        if !options.user.is_requested() && !options.display.is_requested() {
            warn!("[CanvasRecorder] No audio source requested, nothing to merge");
            return MergeOutcome::NotRequested;
        }

        if let Some(constraints) = options.display.constraints() {
            self.release_display_stream();
            self.display_stream = self
                .acquire_audio(AudioSourceKind::Display, &constraints)
                .await;
        }

        if let Some(constraints) = options.user.constraints() {
            self.release_user_stream();
            self.user_stream = self.acquire_audio(AudioSourceKind::User, &constraints).await;
        }

        self.detach_merged_audio();

        let acquired: Vec<MediaStream> = self
            .display_stream
            .iter()
            .chain(self.user_stream.iter())
            .cloned()
            .collect();

        let track_count: usize = acquired.iter().map(|s| s.audio_tracks().len()).sum();
        if track_count == 0 {
            warn!("[CanvasRecorder] No audio stream to merge");
            return MergeOutcome::NoAudio;
        }

        let target = self.device.stream();

        let Some(mut graph) = self.platform.create_audio_graph() else {
            warn!(
                "[CanvasRecorder] Audio mixing is unavailable, attaching {} track(s) directly; \
                 most encoders record only the first one",
                track_count
            );
            for stream in &acquired {
                for track in stream.audio_tracks() {
                    target.add_track(track.clone());
                    self.merged_tracks.push(track);
                }
            }
            return MergeOutcome::Direct(track_count);
        };

        for stream in &acquired {
            graph.connect(stream);
        }

        let Some(mixed) = graph.destination_track() else {
            warn!("[CanvasRecorder] Mixing graph produced no output track");
            return MergeOutcome::NoAudio;
        };

        target.add_track(mixed.clone());
        self.merged_tracks.push(mixed);
        self.audio_graph = Some(graph);
        info!("Merged {} audio track(s) into the recording", track_count);
        MergeOutcome::Mixed(track_count)
    }

    // Source tracks are stopped with their source; the mix output is ours.
    fn detach_merged_audio(&mut self) {
        let target = self.device.stream();
        for track in self.merged_tracks.drain(..) {
            target.remove_track(&track);
        }

        if let Some(graph) = self.audio_graph.take() {
            if let Some(mixed) = graph.destination_track() {
                mixed.stop();
            }
            debug!("Detached previous audio mix");
        }
    }

    async fn acquire_audio(
        &self,
        kind: AudioSourceKind,
        constraints: &TrackConstraints,
    ) -> Option<MediaStream> {
        let Some(devices) = self.platform.media_devices() else {
            warn!(
                "[CanvasRecorder] Can not use {} media: media devices are unavailable",
                kind.as_str()
            );
            return None;
        };

        let result = match kind {
            AudioSourceKind::User => devices.get_user_media(constraints).await,
            AudioSourceKind::Display => devices.get_display_media(constraints).await,
        };

        match result {
            Ok(stream) => {
                for track in stream.video_tracks() {
                    track.stop();
                    stream.remove_track(&track);
                }
                debug!(
                    "Acquired {} media with {} audio track(s)",
                    kind.as_str(),
                    stream.audio_tracks().len()
                );
                Some(stream)
            }
            Err(e) => {
                warn!("[CanvasRecorder] Can not use {} media: {}", kind.as_str(), e);
                None
            }
        }
    }
}
