//! Parameter policy applied to a `CameraParameters` snapshot.
//!
//! Every setter only picks values the hardware lists as supported and leaves
//! the snapshot untouched (apart from a log line) when nothing fits or the
//! value is already set. Nothing here talks to the device.

use std::fmt::Debug;

use crate::models::parameters::{CameraArea, CameraParameters, FlashMode, FocusMode, SceneMode};

/// Exposure target with the torch off, in EV.
const MAX_EXPOSURE_COMPENSATION: f32 = 1.5;
/// Exposure target with the torch on, in EV.
const MIN_EXPOSURE_COMPENSATION: f32 = 0.0;
/// Half extent of the centred focus/metering area, in driver units.
const AREA_PER_1000: i32 = 400;

fn find_settable<T: Copy + PartialEq + Debug>(
    name: &str,
    supported: &[T],
    desired: &[T],
) -> Option<T> {
    log::debug!("Requesting {} value from among: {:?}", name, desired);
    log::debug!("Supported {} values: {:?}", name, supported);
    let found = desired.iter().copied().find(|value| supported.contains(value));
    match found {
        Some(value) => log::debug!("Can set {} to: {:?}", name, value),
        None => log::debug!("No supported values match"),
    }
    found
}

/// Choose a focus mode.
///
/// With autofocus, prefers continuous modes unless `safe_mode` or
/// `disable_continuous` restricts it to plain auto. Outside safe mode, falls
/// back to macro or EDOF when nothing else is supported.
pub fn set_focus(
    parameters: &mut CameraParameters,
    auto_focus: bool,
    disable_continuous: bool,
    safe_mode: bool,
) {
    let supported = parameters.supported_focus_modes.clone();
    let mut focus_mode = None;
    if auto_focus {
        focus_mode = if safe_mode || disable_continuous {
            find_settable("focus mode", &supported, &[FocusMode::Auto])
        } else {
            find_settable(
                "focus mode",
                &supported,
                &[FocusMode::ContinuousPicture, FocusMode::ContinuousVideo, FocusMode::Auto],
            )
        };
    }
    if !safe_mode && focus_mode.is_none() {
        focus_mode = find_settable("focus mode", &supported, &[FocusMode::Macro, FocusMode::Edof]);
    }
    if let Some(mode) = focus_mode {
        if parameters.focus_mode == Some(mode) {
            log::info!("Focus mode already set to {:?}", mode);
        } else {
            parameters.focus_mode = Some(mode);
        }
    }
}

pub fn set_torch(parameters: &mut CameraParameters, on: bool) {
    let supported = parameters.supported_flash_modes.clone();
    let flash_mode = if on {
        find_settable("flash mode", &supported, &[FlashMode::Torch, FlashMode::On])
    } else {
        find_settable("flash mode", &supported, &[FlashMode::Off])
    };
    if let Some(mode) = flash_mode {
        if parameters.flash_mode == Some(mode) {
            log::info!("Flash mode already set to {:?}", mode);
        } else {
            log::info!("Setting flash mode to {:?}", mode);
            parameters.flash_mode = Some(mode);
        }
    }
}

/// Brighten the exposure when the torch is off; leave it neutral when lit.
pub fn set_best_exposure(parameters: &mut CameraParameters, light_on: bool) {
    let min = parameters.min_exposure_compensation;
    let max = parameters.max_exposure_compensation;
    let step = parameters.exposure_compensation_step;
    if (min == 0 && max == 0) || step <= 0.0 {
        log::info!("Camera does not support exposure compensation");
        return;
    }

    let target = if light_on {
        MIN_EXPOSURE_COMPENSATION
    } else {
        MAX_EXPOSURE_COMPENSATION
    };
    let steps = ((target / step).round() as i32).clamp(min, max);
    let actual = step * steps as f32;
    if parameters.exposure_compensation == steps {
        log::info!("Exposure compensation already set to {} / {}", steps, actual);
    } else {
        log::info!("Setting exposure compensation to {} / {}", steps, actual);
        parameters.exposure_compensation = steps;
    }
}

pub fn set_barcode_scene_mode(parameters: &mut CameraParameters) {
    if parameters.scene_mode == Some(SceneMode::Barcode) {
        log::info!("Barcode scene mode already set");
        return;
    }
    let supported = parameters.supported_scene_modes.clone();
    if let Some(mode) = find_settable("scene mode", &supported, &[SceneMode::Barcode]) {
        parameters.scene_mode = Some(mode);
    }
}

pub fn set_video_stabilization(parameters: &mut CameraParameters) {
    if !parameters.video_stabilization_supported {
        log::info!("This device does not support video stabilization");
    } else if parameters.video_stabilization {
        log::info!("Video stabilization already enabled");
    } else {
        log::info!("Enabling video stabilization...");
        parameters.video_stabilization = true;
    }
}

pub fn set_focus_area(parameters: &mut CameraParameters) {
    if parameters.max_num_focus_areas > 0 {
        log::info!("Old focus areas: {:?}", parameters.focus_areas);
        let middle = vec![CameraArea::centered(AREA_PER_1000, 1)];
        log::info!("Setting focus area to: {:?}", middle);
        parameters.focus_areas = middle;
    } else {
        log::info!("Device does not support focus areas");
    }
}

pub fn set_metering(parameters: &mut CameraParameters) {
    if parameters.max_num_metering_areas > 0 {
        log::info!("Old metering areas: {:?}", parameters.metering_areas);
        let middle = vec![CameraArea::centered(AREA_PER_1000, 1)];
        log::info!("Setting metering area to: {:?}", middle);
        parameters.metering_areas = middle;
    } else {
        log::info!("Device does not support metering areas");
    }
}
