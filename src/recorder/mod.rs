//! Recording lifecycle: one canvas recorder session at a time, its
//! completion handle and the resulting movie.

pub mod audio;
pub mod completion;
pub mod controller;
pub mod movie;
pub mod options;
pub mod state;


pub use audio::{AudioSourceKind, MergeOutcome};
pub use completion::Completion;
pub use controller::CanvasRecorder;
pub use movie::{default_file_name, Movie, VideoElement, MOVIE_EXTENSION};
pub use options::{
    AudioOptions, AudioRequest, FactoryOptions, RecordOptions, TrackConstraints,
    DEFAULT_FRAME_RATE,
};
pub use state::RecorderState;
