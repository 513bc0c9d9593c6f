pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod global;
pub mod media;
pub mod platform;
pub mod recorder;

pub use errors::{PlatformError, RecorderError};
pub use events::{EventHub, EventName, Listener};
pub use media::{Blob, MediaKind, MediaStream, MediaTrack};
pub use platform::{AudioGraph, CaptureSurface, MediaDevices, Platform, RecordDevice};
pub use recorder::{
    AudioOptions, AudioRequest, CanvasRecorder, Completion, FactoryOptions, MergeOutcome, Movie,
    RecordOptions, RecorderState, TrackConstraints, VideoElement,
};
