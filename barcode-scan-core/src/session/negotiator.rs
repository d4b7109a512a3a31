use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::geometry::{Rotation, Size};
use crate::models::parameters::CameraParameters;
use crate::processing::camera_settings;
use crate::processing::preview_size::{find_best_preview_size, preview_size_on_screen};
use crate::processing::rotation::OrientationFacts;
use crate::traits::camera_device::{CameraDevice, DisplayInfo};

/// Reconciles camera hardware capabilities with the display and the
/// session configuration.
///
/// Lives for one camera-open session. Built once from hardware facts, then
/// applies parameters and toggles the torch. After every write it re-reads
/// the device: the hardware, not the request, is authoritative.
#[derive(Debug, Clone)]
pub struct CameraNegotiator {
    config: ScanConfiguration,
    orientation: OrientationFacts,
    screen_resolution: Size,
    best_preview_size: Size,
    preview_size_on_screen: Size,
    safe_mode: bool,
}

impl CameraNegotiator {
    /// Read rotation and resolution facts from the display and camera.
    ///
    /// Fails on a display or mount rotation that is not a quarter turn, and
    /// when the camera reports neither parameters nor any preview size.
    pub fn initialize(
        config: &ScanConfiguration,
        display: &dyn DisplayInfo,
        camera: &dyn CameraDevice,
    ) -> Result<Self, ScanError> {
        let parameters = camera.parameters().ok_or(ScanError::ParametersUnavailable)?;

        let orientation =
            OrientationFacts::from_degrees(camera.facing(), camera.orientation(), display.rotation())?;
        log::info!(
            "Display at {}, camera ({:?}) mounted at {}: display→camera {}, needed rotation {}",
            orientation.display_rotation,
            orientation.facing,
            orientation.mount_rotation,
            orientation.display_to_camera(),
            orientation.needed_rotation(),
        );

        let screen_resolution = display.resolution();
        let best_preview_size = find_best_preview_size(&parameters, screen_resolution).ok_or_else(
            || ScanError::ConfigurationFailed("camera reports no preview size".into()),
        )?;
        let preview_size_on_screen = preview_size_on_screen(screen_resolution, best_preview_size);
        log::info!(
            "Screen resolution {}, best preview size {}, preview size on screen {}",
            screen_resolution,
            best_preview_size,
            preview_size_on_screen
        );

        Ok(Self {
            config: config.clone(),
            orientation,
            screen_resolution,
            best_preview_size,
            preview_size_on_screen,
            safe_mode: false,
        })
    }

    /// Apply torch, focus and (outside safe mode) the optional tuning, then
    /// the preview size and display orientation.
    ///
    /// A device that cannot produce parameters right now is skipped without
    /// error. A device that rejects the write returns the error untouched so
    /// the caller can retry in safe mode.
    pub fn apply_desired_parameters(
        &mut self,
        camera: &mut dyn CameraDevice,
        safe_mode: bool,
    ) -> Result<(), ScanError> {
        let Some(mut parameters) = camera.parameters() else {
            log::warn!("Device error: no camera parameters are available. Proceeding without configuration.");
            return Ok(());
        };

        self.safe_mode = safe_mode;
        if safe_mode {
            log::warn!("In camera config safe mode -- most settings will not be honored");
        }

        self.apply_torch(&mut parameters, self.config.use_light);
        camera_settings::set_focus(
            &mut parameters,
            self.config.auto_focus,
            self.config.disable_continuous_focus,
            safe_mode,
        );

        if !safe_mode {
            if !self.config.disable_barcode_scene_mode {
                camera_settings::set_barcode_scene_mode(&mut parameters);
            }
            if !self.config.disable_metering {
                camera_settings::set_video_stabilization(&mut parameters);
                camera_settings::set_focus_area(&mut parameters);
                camera_settings::set_metering(&mut parameters);
            }
            // Some drivers drop to a very low frame rate without it.
            parameters.recording_hint = true;
        }

        parameters.preview_size = Some(self.best_preview_size);

        camera.set_parameters(&parameters)?;
        camera.set_display_orientation(self.orientation.display_to_camera().degrees())?;

        self.reconcile_preview_size(camera);
        Ok(())
    }

    /// Whether the flash is currently lit.
    pub fn torch_state(&self, camera: &dyn CameraDevice) -> bool {
        camera
            .parameters()
            .and_then(|p| p.flash_mode)
            .is_some_and(|mode| mode.is_lit())
    }

    /// Switch the torch, compensating exposure unless in safe mode.
    pub fn set_torch(&mut self, camera: &mut dyn CameraDevice, enable: bool) -> Result<(), ScanError> {
        let Some(mut parameters) = camera.parameters() else {
            log::warn!("No camera parameters available; torch left unchanged");
            return Ok(());
        };
        self.apply_torch(&mut parameters, enable);
        camera.set_parameters(&parameters)
    }

    pub fn screen_resolution(&self) -> Size {
        self.screen_resolution
    }

    /// Size frames are delivered at; same value as `best_preview_size`.
    pub fn camera_resolution(&self) -> Size {
        self.best_preview_size
    }

    pub fn best_preview_size(&self) -> Size {
        self.best_preview_size
    }

    pub fn preview_size_on_screen(&self) -> Size {
        self.preview_size_on_screen
    }

    pub fn orientation(&self) -> OrientationFacts {
        self.orientation
    }

    pub fn display_to_camera_rotation(&self) -> Rotation {
        self.orientation.display_to_camera()
    }

    pub fn needed_rotation(&self) -> Rotation {
        self.orientation.needed_rotation()
    }

    pub fn is_safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn apply_torch(&self, parameters: &mut CameraParameters, on: bool) {
        camera_settings::set_torch(parameters, on);
        if !self.safe_mode && !self.config.disable_exposure_compensation {
            camera_settings::set_best_exposure(parameters, on);
        }
    }

    fn reconcile_preview_size(&mut self, camera: &dyn CameraDevice) {
        let Some(actual) = camera.parameters().and_then(|p| p.preview_size) else {
            return;
        };
        if actual != self.best_preview_size {
            log::warn!(
                "Camera said it supported preview size {}, but after setting it, preview size is {}",
                self.best_preview_size,
                actual
            );
            self.best_preview_size = actual;
            self.preview_size_on_screen = preview_size_on_screen(self.screen_resolution, actual);
        }
    }
}
