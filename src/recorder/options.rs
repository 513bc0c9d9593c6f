use serde::{Deserialize, Serialize};

/// Passthrough options handed verbatim to the record device
/// (`mimeType`, `videoBitsPerSecond`, ...).
pub type RecordOptions = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Constraints applied when requesting an audio track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo_cancellation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_suppression: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_gain_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl TrackConstraints {
    /// What a plain `true` request expands to.
    pub fn stereo() -> Self {
        Self {
            channel_count: Some(2),
            ..Self::default()
        }
    }
}

/// One audio source request: off, on with defaults, or explicit constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudioRequest {
    Enabled(bool),
    Constraints(TrackConstraints),
}

impl Default for AudioRequest {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl From<bool> for AudioRequest {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<TrackConstraints> for AudioRequest {
    fn from(constraints: TrackConstraints) -> Self {
        Self::Constraints(constraints)
    }
}

impl AudioRequest {
    /// Constraints to request the source with, `None` when not requested.
    pub fn constraints(&self) -> Option<TrackConstraints> {
        match self {
            AudioRequest::Enabled(false) => None,
            AudioRequest::Enabled(true) => Some(TrackConstraints::stereo()),
            AudioRequest::Constraints(constraints) => Some(constraints.clone()),
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, AudioRequest::Enabled(false))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    /// Microphone audio.
    pub user: AudioRequest,
    /// Screen/display audio.
    pub display: AudioRequest,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            user: AudioRequest::Enabled(false),
            display: AudioRequest::Enabled(true),
        }
    }
}

impl AudioOptions {
    pub fn new(user: impl Into<AudioRequest>, display: impl Into<AudioRequest>) -> Self {
        Self {
            user: user.into(),
            display: display.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactoryOptions {
    pub frame_rate: u32,
    pub audio: AudioOptions,
    pub record_options: RecordOptions,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            audio: AudioOptions::default(),
            record_options: RecordOptions::new(),
        }
    }
}
