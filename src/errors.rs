use thiserror::Error;

/// Failures raised by the platform collaborators (record device, media
/// devices, object references, downloads).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Operation is not supported: {0}")]
    NotSupported(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid download file name: {0}")]
    InvalidFileName(String),

    #[error("Unknown object reference: {0}")]
    UnknownObjectUrl(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("[CanvasRecorder] This movie instance was destroyed.")]
    MovieDestroyed,

    #[error("[CanvasRecorder] Recording stopped without producing any data")]
    NoData,

    #[error("[CanvasRecorder] Recorder was dropped before the recording completed")]
    Abandoned,

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
