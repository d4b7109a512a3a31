//! Recording doubles for the capability traits.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::models::decode::DecodedPayload;
use crate::models::error::ScanError;
use crate::models::geometry::{CameraFacing, ResultPoint, Size};
use crate::models::parameters::{CameraParameters, FlashMode, FocusMode, SceneMode};
use crate::traits::camera_device::{CameraDevice, CameraProvider, DisplayInfo, PreviewFrameCallback};
use crate::traits::scan_host::{LookupRequest, ScanHost};

pub(crate) fn default_parameters() -> CameraParameters {
    CameraParameters {
        preview_size: Some(Size::new(640, 480)),
        supported_preview_sizes: vec![
            Size::new(1920, 1080),
            Size::new(1280, 720),
            Size::new(640, 480),
        ],
        supported_focus_modes: vec![
            FocusMode::Auto,
            FocusMode::ContinuousPicture,
            FocusMode::ContinuousVideo,
            FocusMode::Macro,
        ],
        supported_flash_modes: vec![FlashMode::Off, FlashMode::On, FlashMode::Torch],
        supported_scene_modes: vec![SceneMode::Auto, SceneMode::Barcode],
        min_exposure_compensation: -6,
        max_exposure_compensation: 6,
        exposure_compensation_step: 0.5,
        video_stabilization_supported: true,
        max_num_focus_areas: 1,
        max_num_metering_areas: 1,
        ..Default::default()
    }
}

#[derive(Default)]
pub(crate) struct MockState {
    pub parameters: Option<CameraParameters>,
    pub substitute_preview_size: Option<Size>,
    /// Reject any write that carries the recording hint.
    pub reject_recording_hint: bool,
    /// Reject every write.
    pub reject_all: bool,
    pub set_calls: Vec<CameraParameters>,
    pub display_orientation: Option<u32>,
    pub previewing: bool,
    pub start_preview_calls: usize,
    pub stop_preview_calls: usize,
    pub frame_requests: usize,
    pub pending_frames: Vec<PreviewFrameCallback>,
    pub closed: bool,
}

/// Camera whose state stays inspectable after it is moved into a session.
#[derive(Clone)]
pub(crate) struct MockCamera {
    facing: CameraFacing,
    orientation: i32,
    state: Arc<Mutex<MockState>>,
}

impl MockCamera {
    pub fn new(facing: CameraFacing, orientation: i32) -> Self {
        Self {
            facing,
            orientation,
            state: Arc::new(Mutex::new(MockState {
                parameters: Some(default_parameters()),
                ..Default::default()
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock()
    }

    /// Answer the oldest outstanding frame request. Returns false if none.
    pub fn deliver_frame(&self, data: &[u8]) -> bool {
        let callback = {
            let mut state = self.state.lock();
            if state.pending_frames.is_empty() {
                return false;
            }
            state.pending_frames.remove(0)
        };
        callback(data.to_vec());
        true
    }
}

impl CameraDevice for MockCamera {
    fn facing(&self) -> CameraFacing {
        self.facing
    }

    fn orientation(&self) -> i32 {
        self.orientation
    }

    fn parameters(&self) -> Option<CameraParameters> {
        self.state.lock().parameters.clone()
    }

    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        if state.reject_all || (state.reject_recording_hint && parameters.recording_hint) {
            return Err(ScanError::ParametersRejected("mock rejected parameters".into()));
        }
        state.set_calls.push(parameters.clone());
        let mut applied = parameters.clone();
        if let Some(size) = state.substitute_preview_size {
            applied.preview_size = Some(size);
        }
        state.parameters = Some(applied);
        Ok(())
    }

    fn set_display_orientation(&mut self, degrees: u32) -> Result<(), ScanError> {
        self.state.lock().display_orientation = Some(degrees);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        state.previewing = true;
        state.start_preview_calls += 1;
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        state.previewing = false;
        state.stop_preview_calls += 1;
        state.pending_frames.clear();
        Ok(())
    }

    fn request_one_frame(&mut self, callback: PreviewFrameCallback) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        state.frame_requests += 1;
        state.pending_frames.push(callback);
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }
}

/// Hands out clones of one `MockCamera`, or fails when none is set.
pub(crate) struct MockProvider {
    pub camera: Option<MockCamera>,
    pub opened: Mutex<Vec<CameraFacing>>,
}

impl MockProvider {
    pub fn new(camera: MockCamera) -> Self {
        Self {
            camera: Some(camera),
            opened: Mutex::new(Vec::new()),
        }
    }
}

impl CameraProvider for MockProvider {
    type Device = MockCamera;

    fn open(&self, facing: CameraFacing) -> Result<MockCamera, ScanError> {
        self.opened.lock().push(facing);
        self.camera.clone().ok_or(ScanError::CameraNotAvailable)
    }
}

pub(crate) struct MockDisplay {
    rotation: i32,
    resolution: Size,
}

impl MockDisplay {
    pub fn new(rotation: i32, resolution: Size) -> Self {
        Self { rotation, resolution }
    }
}

impl DisplayInfo for MockDisplay {
    fn rotation(&self) -> i32 {
        self.rotation
    }

    fn resolution(&self) -> Size {
        self.resolution
    }
}

#[derive(Default)]
pub(crate) struct HostLog {
    pub successes: Vec<DecodedPayload>,
    pub returned: Vec<DecodedPayload>,
    pub lookups: Vec<LookupRequest>,
    pub redraws: usize,
    pub points: Vec<ResultPoint>,
}

/// Host that records every callback.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub log: Mutex<HostLog>,
    pub default_handler: Option<String>,
    pub fail_lookups: bool,
}

impl ScanHost for RecordingHost {
    fn on_decode_success(&self, payload: &DecodedPayload) {
        self.log.lock().successes.push(payload.clone());
    }

    fn on_return_result(&self, payload: &DecodedPayload) {
        self.log.lock().returned.push(payload.clone());
    }

    fn on_request_external_lookup(&self, request: &LookupRequest) -> Result<(), ScanError> {
        if self.fail_lookups {
            return Err(ScanError::NoUrlHandler(request.url.clone()));
        }
        self.log.lock().lookups.push(request.clone());
        Ok(())
    }

    fn on_redraw_scan_indicator(&self) {
        self.log.lock().redraws += 1;
    }

    fn resolve_default_handler(&self, _url: &str) -> Option<String> {
        self.default_handler.clone()
    }

    fn on_possible_result_point(&self, point: &ResultPoint) {
        self.log.lock().points.push(*point);
    }
}
