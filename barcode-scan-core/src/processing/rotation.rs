use crate::models::error::ScanError;
use crate::models::geometry::{CameraFacing, Rotation};

/// Pure rotation bookkeeping between the display and the camera sensor.
///
/// Front cameras deliver mirrored images, so their mount rotation is
/// mirrored before use and the correction is applied the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationFacts {
    pub facing: CameraFacing,
    /// Sensor rotation relative to the device's natural orientation.
    pub mount_rotation: Rotation,
    /// Display rotation relative to the device's natural orientation.
    pub display_rotation: Rotation,
}

impl OrientationFacts {
    /// Validate raw platform degrees. Non-quarter-turn values are fatal.
    pub fn from_degrees(
        facing: CameraFacing,
        mount_degrees: i32,
        display_degrees: i32,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            facing,
            mount_rotation: Rotation::from_degrees(mount_degrees)?,
            display_rotation: Rotation::from_degrees(display_degrees)?,
        })
    }

    /// Clockwise rotation from the display to the camera sensor.
    ///
    /// `(360 + mount' - display) mod 360`, where `mount'` is the mount
    /// rotation, mirrored for front cameras.
    pub fn display_to_camera(&self) -> Rotation {
        let mount = match self.facing {
            CameraFacing::Front => self.mount_rotation.mirrored(),
            CameraFacing::Back => self.mount_rotation,
        };
        mount.minus(self.display_rotation)
    }

    /// Rotation to apply to captured frames so they appear upright.
    pub fn needed_rotation(&self) -> Rotation {
        let display_to_camera = self.display_to_camera();
        match self.facing {
            CameraFacing::Front => display_to_camera.mirrored(),
            CameraFacing::Back => display_to_camera,
        }
    }
}
