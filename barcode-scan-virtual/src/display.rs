use barcode_scan_core::models::geometry::Size;
use barcode_scan_core::traits::camera_device::DisplayInfo;

/// Fixed display description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualDisplay {
    pub rotation: i32,
    pub resolution: Size,
}

impl VirtualDisplay {
    pub fn new(rotation: i32, resolution: Size) -> Self {
        Self { rotation, resolution }
    }

    /// 1080×1920 phone held upright.
    pub fn portrait_phone() -> Self {
        Self::new(0, Size::new(1080, 1920))
    }

    /// 1920×1080 phone turned counter-clockwise.
    pub fn landscape_phone() -> Self {
        Self::new(90, Size::new(1920, 1080))
    }
}

impl DisplayInfo for VirtualDisplay {
    fn rotation(&self) -> i32 {
        self.rotation
    }

    fn resolution(&self) -> Size {
        self.resolution
    }
}
