use serde::{Deserialize, Serialize};

use super::geometry::Size;

/// Camera focus modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusMode {
    Auto,
    ContinuousPicture,
    ContinuousVideo,
    Macro,
    Edof,
    Fixed,
    Infinity,
}

/// Flash modes. `Torch` keeps the light on continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashMode {
    Off,
    On,
    Auto,
    Torch,
    RedEye,
}

impl FlashMode {
    /// Whether this mode keeps the light lit during preview.
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::On | Self::Torch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneMode {
    Auto,
    Barcode,
    Action,
    Night,
    Portrait,
    Landscape,
    Sports,
}

/// A rectangle in the driver's normalized `-1000..=1000` coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A weighted focus or metering region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraArea {
    pub rect: AreaRect,
    pub weight: u32,
}

impl CameraArea {
    /// A square region centred on the frame, extending `half_extent` each way.
    pub fn centered(half_extent: i32, weight: u32) -> Self {
        Self {
            rect: AreaRect {
                left: -half_extent,
                top: -half_extent,
                right: half_extent,
                bottom: half_extent,
            },
            weight,
        }
    }
}

/// Snapshot of a camera's settings together with what the hardware supports.
///
/// Read with `CameraDevice::parameters`, edited locally, then written back
/// with `CameraDevice::set_parameters`. The driver may silently substitute
/// values it does not accept, so callers re-read after writing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraParameters {
    pub preview_size: Option<Size>,
    pub supported_preview_sizes: Vec<Size>,

    pub focus_mode: Option<FocusMode>,
    pub supported_focus_modes: Vec<FocusMode>,

    pub flash_mode: Option<FlashMode>,
    pub supported_flash_modes: Vec<FlashMode>,

    pub scene_mode: Option<SceneMode>,
    pub supported_scene_modes: Vec<SceneMode>,

    /// Current exposure compensation, in steps.
    pub exposure_compensation: i32,
    pub min_exposure_compensation: i32,
    pub max_exposure_compensation: i32,
    /// EV per compensation step.
    pub exposure_compensation_step: f32,

    pub video_stabilization_supported: bool,
    pub video_stabilization: bool,

    pub max_num_focus_areas: u32,
    pub focus_areas: Vec<CameraArea>,

    pub max_num_metering_areas: u32,
    pub metering_areas: Vec<CameraArea>,

    pub recording_hint: bool,
}
