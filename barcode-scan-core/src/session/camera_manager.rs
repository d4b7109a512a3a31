use crate::models::config::ScanConfiguration;
use crate::models::decode::PreviewFrame;
use crate::models::error::ScanError;
use crate::models::parameters::CameraParameters;
use crate::session::negotiator::CameraNegotiator;
use crate::traits::camera_device::{CameraDevice, CameraProvider, DisplayInfo};

/// Owns an opened camera for one session: configuration, preview, one-shot
/// frame requests and the torch.
///
/// The device is closed when the manager is closed or dropped.
pub struct CameraManager<C: CameraDevice> {
    camera: C,
    negotiator: CameraNegotiator,
    previewing: bool,
    closed: bool,
}

impl<C: CameraDevice> CameraManager<C> {
    /// Open the configured camera and configure it for scanning.
    pub fn open<P>(
        provider: &P,
        display: &dyn DisplayInfo,
        config: &ScanConfiguration,
    ) -> Result<Self, ScanError>
    where
        P: CameraProvider<Device = C>,
    {
        config.validate().map_err(ScanError::ConfigurationFailed)?;
        let camera = provider.open(config.facing)?;
        Self::with_camera(camera, display, config)
    }

    /// Configure an already opened camera.
    ///
    /// If the camera rejects the full parameter set, its previous parameters
    /// are restored and only safe-mode parameters are applied. If it rejects
    /// those too, the camera is used as is.
    pub fn with_camera(
        mut camera: C,
        display: &dyn DisplayInfo,
        config: &ScanConfiguration,
    ) -> Result<Self, ScanError> {
        let negotiator = match CameraNegotiator::initialize(config, display, &camera) {
            Ok(negotiator) => negotiator,
            Err(e) => {
                camera.close();
                return Err(e);
            }
        };

        let mut manager = Self {
            camera,
            negotiator,
            previewing: false,
            closed: false,
        };

        let snapshot = manager.camera.parameters();
        if let Err(e) = manager.negotiator.apply_desired_parameters(&mut manager.camera, false) {
            log::warn!("Camera rejected parameters ({}). Setting only minimal safe-mode parameters", e);
            if let Some(snapshot) = snapshot {
                if let Err(e) = manager.apply_safe_mode(&snapshot) {
                    log::warn!("Camera rejected even safe-mode parameters ({}). No configuration", e);
                }
            }
        }

        Ok(manager)
    }

    fn apply_safe_mode(&mut self, snapshot: &CameraParameters) -> Result<(), ScanError> {
        self.camera.set_parameters(snapshot)?;
        self.negotiator.apply_desired_parameters(&mut self.camera, true)
    }

    pub fn start_preview(&mut self) -> Result<(), ScanError> {
        if !self.previewing {
            self.camera.start_preview()?;
            self.previewing = true;
        }
        Ok(())
    }

    pub fn stop_preview(&mut self) -> Result<(), ScanError> {
        if self.previewing {
            self.camera.stop_preview()?;
            self.previewing = false;
        }
        Ok(())
    }

    pub fn is_previewing(&self) -> bool {
        self.previewing
    }

    /// Ask for the next preview frame. `on_frame` is called once, on the
    /// driver's thread, with the frame tagged with the negotiated resolution
    /// and rotation.
    pub fn request_preview_frame<F>(&mut self, on_frame: F) -> Result<(), ScanError>
    where
        F: FnOnce(PreviewFrame) + Send + 'static,
    {
        if !self.previewing {
            return Err(ScanError::PreviewNotRunning);
        }
        let resolution = self.negotiator.camera_resolution();
        let rotation = self.negotiator.needed_rotation();
        self.camera.request_one_frame(Box::new(move |data| {
            on_frame(PreviewFrame {
                data,
                resolution,
                rotation,
            })
        }))
    }

    pub fn torch_enabled(&self) -> bool {
        self.negotiator.torch_state(&self.camera)
    }

    /// Switch the torch. Does nothing if it is already in that state.
    pub fn set_torch(&mut self, enable: bool) -> Result<(), ScanError> {
        if enable == self.torch_enabled() {
            return Ok(());
        }
        self.negotiator.set_torch(&mut self.camera, enable)
    }

    pub fn negotiator(&self) -> &CameraNegotiator {
        &self.negotiator
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Stop preview and release the device. Later calls do nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.stop_preview() {
            log::warn!("Failed to stop preview while closing camera: {}", e);
        }
        self.camera.close();
        self.closed = true;
    }
}

impl<C: CameraDevice> Drop for CameraManager<C> {
    fn drop(&mut self) {
        self.close();
    }
}
