use parking_lot::Mutex;

use barcode_scan_core::models::error::ScanError;
use barcode_scan_core::models::geometry::CameraFacing;
use barcode_scan_core::traits::camera_device::{CameraDevice, CameraProvider};

use crate::virtual_camera::VirtualCamera;

/// Hands out virtual cameras, each at most once.
///
/// Prefers a camera with the requested facing and falls back to the first
/// remaining one.
pub struct VirtualCameraProvider {
    cameras: Mutex<Vec<VirtualCamera>>,
}

impl VirtualCameraProvider {
    pub fn new(cameras: Vec<VirtualCamera>) -> Self {
        Self {
            cameras: Mutex::new(cameras),
        }
    }

    pub fn available(&self) -> usize {
        self.cameras.lock().len()
    }
}

impl CameraProvider for VirtualCameraProvider {
    type Device = VirtualCamera;

    fn open(&self, facing: CameraFacing) -> Result<VirtualCamera, ScanError> {
        let mut cameras = self.cameras.lock();
        if cameras.is_empty() {
            log::warn!("No cameras!");
            return Err(ScanError::CameraNotAvailable);
        }
        let index = match cameras.iter().position(|c| c.facing() == facing) {
            Some(index) => index,
            None => {
                log::info!("No camera facing {:?}; returning camera #0", facing);
                0
            }
        };
        log::info!("Opening camera #{}", index);
        Ok(cameras.remove(index))
    }
}
