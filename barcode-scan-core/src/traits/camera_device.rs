use crate::models::error::ScanError;
use crate::models::geometry::{CameraFacing, Size};
use crate::models::parameters::CameraParameters;

/// Callback invoked once with the raw bytes of the next preview frame.
///
/// Fires on the driver's callback thread; keep processing minimal.
pub type PreviewFrameCallback = Box<dyn FnOnce(Vec<u8>) + Send + 'static>;

/// Interface to an opened camera device.
///
/// Implemented by platform backends (and `VirtualCamera` in
/// `barcode-scan-virtual`). The device is exclusively owned by one scan
/// session from open to close.
pub trait CameraDevice: Send {
    fn facing(&self) -> CameraFacing;

    /// Clockwise mount rotation of the sensor relative to the device's
    /// natural orientation, in degrees.
    fn orientation(&self) -> i32;

    /// Current parameters, or `None` when the driver cannot produce them
    /// right now.
    fn parameters(&self) -> Option<CameraParameters>;

    /// Write parameters. The driver may reject them outright or silently
    /// substitute unsupported values.
    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), ScanError>;

    fn set_display_orientation(&mut self, degrees: u32) -> Result<(), ScanError>;

    fn start_preview(&mut self) -> Result<(), ScanError>;

    fn stop_preview(&mut self) -> Result<(), ScanError>;

    /// Deliver the next preview frame to `callback`, once.
    fn request_one_frame(&mut self, callback: PreviewFrameCallback) -> Result<(), ScanError>;

    /// Release the device. Called once; the device is not used afterwards.
    fn close(&mut self);
}

/// Opens camera devices by facing.
pub trait CameraProvider {
    type Device: CameraDevice;

    fn open(&self, facing: CameraFacing) -> Result<Self::Device, ScanError>;
}

/// The display the preview is shown on.
pub trait DisplayInfo {
    /// Clockwise rotation from the device's natural orientation to the
    /// current display orientation, in degrees, as reported by the platform.
    fn rotation(&self) -> i32;

    fn resolution(&self) -> Size;
}
