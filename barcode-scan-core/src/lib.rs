//! # barcode-scan-core
//!
//! Platform-agnostic barcode scan session core.
//!
//! Negotiates camera parameters against the display and the hardware, then
//! coordinates preview capture with a background decode worker and routes
//! results to the host screen. Platform backends implement `CameraDevice`,
//! `CameraProvider` and `DisplayInfo`; pixel decoding is supplied through
//! `FrameDecoder`.
//!
//! ## Architecture
//!
//! ```text
//! barcode-scan-core (this crate)
//! ├── traits/       ← CameraDevice, CameraProvider, DisplayInfo, FrameDecoder, ScanHost
//! ├── models/       ← ScanError, ScanState, ScanConfiguration, CameraParameters, geometry, decode types
//! ├── processing/   ← rotation math, preview size selection, parameter policy
//! └── session/      ← CameraNegotiator, CameraManager, CaptureCoordinator (+ decode worker)
//! ```
//!
//! ## Data flow
//!
//! ```text
//! [CameraDevice] → frame callback → [decode worker] → outcome ─┐
//!        ↑                                                      ↓
//!        └──────── one frame request at a time ──── [CaptureCoordinator] → [ScanHost]
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::ScanConfiguration;
pub use models::decode::{BarcodeFormat, DecodeHintType, DecodeHints, DecodedPayload, HintValue, PreviewFrame};
pub use models::error::ScanError;
pub use models::geometry::{CameraFacing, ResultPoint, Rotation, Size};
pub use models::parameters::{AreaRect, CameraArea, CameraParameters, FlashMode, FocusMode, SceneMode};
pub use models::state::ScanState;
pub use processing::rotation::OrientationFacts;
pub use session::camera_manager::CameraManager;
pub use session::coordinator::{CaptureCoordinator, CoordinatorHandle, CoordinatorMessage};
pub use session::negotiator::CameraNegotiator;
pub use traits::camera_device::{CameraDevice, CameraProvider, DisplayInfo, PreviewFrameCallback};
pub use traits::frame_decoder::FrameDecoder;
pub use traits::scan_host::{LookupRequest, ScanHost};
