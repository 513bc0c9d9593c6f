//! Media primitives shared with the platform: tracks, streams and blobs.

pub mod blob;
pub mod stream;
pub mod track;

pub use blob::Blob;
pub use stream::MediaStream;
pub use track::{MediaKind, MediaTrack, TrackSettings};
