use thiserror::Error;

/// Errors that can occur while configuring the camera or running a scan session.
///
/// A decode miss is not an error: decoders report it as `None` and the
/// session simply requests the next frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("bad rotation: {0}")]
    InvalidRotation(i32),

    #[error("camera not available")]
    CameraNotAvailable,

    #[error("camera parameters unavailable")]
    ParametersUnavailable,

    #[error("camera rejected parameters: {0}")]
    ParametersRejected(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("preview is not running")]
    PreviewNotRunning,

    #[error("no handler for url: {0}")]
    NoUrlHandler(String),

    #[error("decode worker error: {0}")]
    Worker(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}
