//! Virtual camera device.
//!
//! Delivers scripted frames from a queue on a dedicated preview thread,
//! one per outstanding request, and mimics the driver quirks a scan session
//! must tolerate: silently substituted preview sizes, parameter sets
//! rejected outright, and parameters that are transiently unavailable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use barcode_scan_core::models::error::ScanError;
use barcode_scan_core::models::geometry::{CameraFacing, Size};
use barcode_scan_core::models::parameters::{CameraParameters, FlashMode, FocusMode, SceneMode};
use barcode_scan_core::traits::camera_device::{CameraDevice, PreviewFrameCallback};

/// Parameters of a typical phone back camera.
pub fn phone_parameters() -> CameraParameters {
    CameraParameters {
        preview_size: Some(Size::new(640, 480)),
        supported_preview_sizes: vec![
            Size::new(1920, 1080),
            Size::new(1440, 1080),
            Size::new(1280, 720),
            Size::new(960, 540),
            Size::new(640, 480),
            Size::new(352, 288),
        ],
        focus_mode: Some(FocusMode::Auto),
        supported_focus_modes: vec![
            FocusMode::Auto,
            FocusMode::ContinuousPicture,
            FocusMode::ContinuousVideo,
            FocusMode::Macro,
            FocusMode::Infinity,
        ],
        flash_mode: Some(FlashMode::Off),
        supported_flash_modes: vec![FlashMode::Off, FlashMode::Auto, FlashMode::On, FlashMode::Torch],
        scene_mode: Some(SceneMode::Auto),
        supported_scene_modes: vec![SceneMode::Auto, SceneMode::Barcode, SceneMode::Night],
        exposure_compensation: 0,
        min_exposure_compensation: -12,
        max_exposure_compensation: 12,
        exposure_compensation_step: 1.0 / 6.0,
        video_stabilization_supported: true,
        video_stabilization: false,
        max_num_focus_areas: 1,
        focus_areas: Vec::new(),
        max_num_metering_areas: 1,
        metering_areas: Vec::new(),
        recording_hint: false,
    }
}

struct Shared {
    parameters: CameraParameters,
    parameters_available: bool,
    forced_preview_size: Option<Size>,
    reject_full_parameters: bool,
    display_orientation: Option<u32>,
    frames: VecDeque<Vec<u8>>,
    idle_frame: Vec<u8>,
    pending: Option<PreviewFrameCallback>,
    previewing: bool,
    open: bool,
    frames_delivered: u64,
    parameter_writes: u64,
}

/// Scripting and inspection handle for a `VirtualCamera`.
///
/// Stays usable after the camera itself has been moved into a session.
#[derive(Clone)]
pub struct VirtualCameraControl {
    shared: Arc<Mutex<Shared>>,
}

impl VirtualCameraControl {
    /// Queue a frame. Requests beyond the queue get the idle frame.
    pub fn push_frame(&self, data: Vec<u8>) {
        self.shared.lock().frames.push_back(data);
    }

    pub fn queued_frames(&self) -> usize {
        self.shared.lock().frames.len()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.shared.lock().frames_delivered
    }

    pub fn parameter_writes(&self) -> u64 {
        self.shared.lock().parameter_writes
    }

    pub fn parameters(&self) -> CameraParameters {
        self.shared.lock().parameters.clone()
    }

    /// Simulate a driver that transiently cannot report parameters.
    pub fn set_parameters_available(&self, available: bool) {
        self.shared.lock().parameters_available = available;
    }

    pub fn display_orientation(&self) -> Option<u32> {
        self.shared.lock().display_orientation
    }

    pub fn is_previewing(&self) -> bool {
        self.shared.lock().previewing
    }

    pub fn is_open(&self) -> bool {
        self.shared.lock().open
    }
}

/// In-process `CameraDevice`.
pub struct VirtualCamera {
    facing: CameraFacing,
    orientation: i32,
    frame_interval: Duration,
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    preview_handle: Option<thread::JoinHandle<()>>,
}

impl VirtualCamera {
    pub fn new(facing: CameraFacing, orientation: i32) -> Self {
        Self {
            facing,
            orientation,
            frame_interval: Duration::from_millis(5),
            shared: Arc::new(Mutex::new(Shared {
                parameters: phone_parameters(),
                parameters_available: true,
                forced_preview_size: None,
                reject_full_parameters: false,
                display_orientation: None,
                frames: VecDeque::new(),
                idle_frame: Vec::new(),
                pending: None,
                previewing: false,
                open: true,
                frames_delivered: 0,
                parameter_writes: 0,
            })),
            running: Arc::new(AtomicBool::new(false)),
            preview_handle: None,
        }
    }

    pub fn with_parameters(self, parameters: CameraParameters) -> Self {
        self.shared.lock().parameters = parameters;
        self
    }

    /// Delay between a frame request and its delivery.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Whatever preview size is requested, the driver applies this one.
    pub fn with_forced_preview_size(self, size: Size) -> Self {
        self.shared.lock().forced_preview_size = Some(size);
        self
    }

    /// Reject any parameter set carrying tuning beyond torch and focus.
    pub fn rejecting_full_parameters(self) -> Self {
        self.shared.lock().reject_full_parameters = true;
        self
    }

    /// Frame delivered when the script queue is empty.
    pub fn with_idle_frame(self, frame: Vec<u8>) -> Self {
        self.shared.lock().idle_frame = frame;
        self
    }

    pub fn control(&self) -> VirtualCameraControl {
        VirtualCameraControl {
            shared: Arc::clone(&self.shared),
        }
    }

    fn stop_preview_thread(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.preview_handle.take() {
            let _ = handle.join();
        }
    }
}

impl CameraDevice for VirtualCamera {
    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn orientation(&self) -> i32 {
        self.orientation
    }

    fn parameters(&self) -> Option<CameraParameters> {
        let shared = self.shared.lock();
        shared.parameters_available.then(|| shared.parameters.clone())
    }

    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), ScanError> {
        let mut shared = self.shared.lock();
        if !shared.open {
            return Err(ScanError::CameraNotAvailable);
        }
        if shared.reject_full_parameters
            && (parameters.recording_hint || parameters.scene_mode != shared.parameters.scene_mode)
        {
            return Err(ScanError::ParametersRejected("setParameters failed".into()));
        }

        let mut applied = parameters.clone();
        let supported = applied
            .preview_size
            .is_some_and(|size| shared.parameters.supported_preview_sizes.contains(&size));
        if let Some(forced) = shared.forced_preview_size {
            applied.preview_size = Some(forced);
        } else if !supported {
            applied.preview_size = shared.parameters.preview_size;
        }
        // Capabilities are the hardware's, not the caller's.
        applied.supported_preview_sizes = shared.parameters.supported_preview_sizes.clone();
        applied.supported_focus_modes = shared.parameters.supported_focus_modes.clone();
        applied.supported_flash_modes = shared.parameters.supported_flash_modes.clone();
        applied.supported_scene_modes = shared.parameters.supported_scene_modes.clone();

        shared.parameters = applied;
        shared.parameter_writes += 1;
        Ok(())
    }

    fn set_display_orientation(&mut self, degrees: u32) -> Result<(), ScanError> {
        if degrees % 90 != 0 {
            return Err(ScanError::InvalidRotation(degrees as i32));
        }
        self.shared.lock().display_orientation = Some(degrees);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), ScanError> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        if !self.shared.lock().open {
            return Err(ScanError::CameraNotAvailable);
        }

        self.running.store(true, Ordering::SeqCst);
        self.shared.lock().previewing = true;
        let running = Arc::clone(&self.running);
        let shared = Arc::clone(&self.shared);
        let interval = self.frame_interval;

        let handle = thread::Builder::new()
            .name("virtual-camera-preview".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);

                    let delivery = {
                        let mut s = shared.lock();
                        match s.pending.take() {
                            Some(callback) => {
                                let frame = match s.frames.pop_front() {
                                    Some(frame) => frame,
                                    None => s.idle_frame.clone(),
                                };
                                s.frames_delivered += 1;
                                Some((callback, frame))
                            }
                            None => None,
                        }
                    };

                    if let Some((callback, frame)) = delivery {
                        callback(frame);
                    }
                }
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                ScanError::Unknown(format!("failed to spawn preview thread: {}", e))
            })?;

        self.preview_handle = Some(handle);
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), ScanError> {
        self.stop_preview_thread();
        let mut shared = self.shared.lock();
        shared.previewing = false;
        shared.pending = None;
        Ok(())
    }

    fn request_one_frame(&mut self, callback: PreviewFrameCallback) -> Result<(), ScanError> {
        let mut shared = self.shared.lock();
        if !shared.previewing {
            return Err(ScanError::PreviewNotRunning);
        }
        if shared.pending.replace(callback).is_some() {
            log::debug!("Replacing an outstanding frame request");
        }
        Ok(())
    }

    fn close(&mut self) {
        self.stop_preview_thread();
        let mut shared = self.shared.lock();
        shared.previewing = false;
        shared.pending = None;
        shared.open = false;
    }
}

impl Drop for VirtualCamera {
    fn drop(&mut self) {
        self.stop_preview_thread();
    }
}
