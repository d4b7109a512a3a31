use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::config::ScanConfiguration;
use crate::models::decode::{DecodeHints, DecodedPayload};
use crate::models::error::ScanError;
use crate::models::state::ScanState;
use crate::session::camera_manager::CameraManager;
use crate::session::decode_worker::DecodeWorker;
use crate::traits::camera_device::CameraDevice;
use crate::traits::frame_decoder::FrameDecoder;
use crate::traits::scan_host::{LookupRequest, ScanHost};

/// Default handlers that get the request pinned to their package.
const PINNED_BROWSERS: [&str; 2] = ["com.android.browser", "com.android.chrome"];

/// Messages processed by the coordinator, strictly in arrival order.
#[derive(Debug)]
pub enum CoordinatorMessage {
    /// Rearm preview decoding after a success.
    RestartPreview,
    DecodeSucceeded(DecodedPayload),
    DecodeFailed,
    /// Finish the session with this payload.
    ReturnScanResult(DecodedPayload),
    /// Open a product lookup URL.
    LaunchProductQuery(String),
}

impl CoordinatorMessage {
    fn is_decode_outcome(&self) -> bool {
        matches!(self, Self::DecodeSucceeded(_) | Self::DecodeFailed)
    }
}

/// Cloneable sender for posting host messages to a coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: Sender<CoordinatorMessage>,
}

impl CoordinatorHandle {
    /// Returns false if the coordinator is gone.
    pub fn restart_preview(&self) -> bool {
        self.post(CoordinatorMessage::RestartPreview)
    }

    pub fn return_scan_result(&self, payload: DecodedPayload) -> bool {
        self.post(CoordinatorMessage::ReturnScanResult(payload))
    }

    pub fn launch_product_query(&self, url: impl Into<String>) -> bool {
        self.post(CoordinatorMessage::LaunchProductQuery(url.into()))
    }

    pub(crate) fn post(&self, message: CoordinatorMessage) -> bool {
        self.sender.send(message).is_ok()
    }
}

/// Message-driven state machine coordinating preview capture, the decode
/// worker and host callbacks for one scan screen visit.
///
/// At most one frame request is outstanding: a new one is issued only after
/// the previous frame's outcome has been handled. Messages are processed on
/// whichever thread calls [`pump`](Self::pump) or
/// [`process_pending`](Self::process_pending); host callbacks run there too.
pub struct CaptureCoordinator<C: CameraDevice> {
    session_id: Uuid,
    host: Arc<dyn ScanHost>,
    camera: Arc<Mutex<CameraManager<C>>>,
    worker: Option<DecodeWorker>,
    state: ScanState,
    join_timeout: Duration,
    sender: Sender<CoordinatorMessage>,
    receiver: Receiver<CoordinatorMessage>,
}

impl<C: CameraDevice> CaptureCoordinator<C> {
    /// Start the decode worker and preview, then arm the first frame request.
    ///
    /// Decodes with `config.hints` plus `config.formats` (the default scan set
    /// when empty) and `config.character_set`.
    pub fn new<D: FrameDecoder + 'static>(
        host: Arc<dyn ScanHost>,
        camera: Arc<Mutex<CameraManager<C>>>,
        decoder: D,
        config: &ScanConfiguration,
    ) -> Result<Self, ScanError> {
        config.validate().map_err(ScanError::ConfigurationFailed)?;

        let session_id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel();
        let hints =
            DecodeHints::for_session(&config.hints, &config.formats, config.character_set.as_deref());
        let worker = DecodeWorker::spawn(decoder, hints, Arc::clone(&host), sender.clone())?;
        log::info!("Scan session {} started", session_id);

        let mut coordinator = Self {
            session_id,
            host,
            camera,
            worker: Some(worker),
            state: ScanState::Success,
            join_timeout: config.worker_join_timeout(),
            sender,
            receiver,
        };

        // Drop shuts the worker down if either step fails.
        let started = coordinator.camera.lock().start_preview();
        started?;
        coordinator.restart_preview_and_decode()?;
        Ok(coordinator)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle {
            sender: self.sender.clone(),
        }
    }

    /// Shared camera controller, for torch toggling while scanning.
    pub fn camera(&self) -> Arc<Mutex<CameraManager<C>>> {
        Arc::clone(&self.camera)
    }

    /// Arm the next decode if the last one succeeded (or the session just
    /// started). Does nothing otherwise, so redundant calls never stack up
    /// frame requests.
    pub fn restart_preview_and_decode(&mut self) -> Result<(), ScanError> {
        if self.state != ScanState::Success {
            return Ok(());
        }
        self.request_decode_frame()?;
        self.host.on_redraw_scan_indicator();
        Ok(())
    }

    /// Wait up to `timeout` for one message and handle it.
    ///
    /// Returns whether a message was handled.
    pub fn pump(&mut self, timeout: Duration) -> Result<bool, ScanError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => {
                self.handle_message(message)?;
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(false),
        }
    }

    /// Handle every message already queued. Returns how many were handled.
    pub fn process_pending(&mut self) -> Result<usize, ScanError> {
        let mut handled = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.handle_message(message)?;
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(handled),
            }
        }
    }

    pub fn handle_message(&mut self, message: CoordinatorMessage) -> Result<(), ScanError> {
        if self.state.is_terminal() && !matches!(
            message,
            CoordinatorMessage::ReturnScanResult(_) | CoordinatorMessage::LaunchProductQuery(_)
        ) {
            log::debug!("Session {} done; ignoring {:?}", self.session_id, message);
            return Ok(());
        }

        match message {
            CoordinatorMessage::RestartPreview => self.restart_preview_and_decode(),
            CoordinatorMessage::DecodeSucceeded(payload) => {
                self.state = ScanState::Success;
                self.host.on_decode_success(&payload);
                Ok(())
            }
            CoordinatorMessage::DecodeFailed => {
                // Decoding as fast as possible: one miss arms the next frame.
                self.request_decode_frame()
            }
            CoordinatorMessage::ReturnScanResult(payload) => {
                self.host.on_return_result(&payload);
                Ok(())
            }
            CoordinatorMessage::LaunchProductQuery(url) => {
                self.launch_product_query(&url);
                Ok(())
            }
        }
    }

    /// Stop preview and the decode worker, then drop any decode outcomes
    /// still queued so the host never sees them.
    ///
    /// Waits at most the configured join timeout for the worker. Terminal:
    /// later decode messages are ignored. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = ScanState::Done;

        if let Err(e) = self.camera.lock().stop_preview() {
            log::warn!("Session {}: failed to stop preview: {}", self.session_id, e);
        }
        if let Some(worker) = self.worker.take() {
            worker.quit(self.join_timeout);
        }

        let purged = self.purge_decode_outcomes();
        log::info!(
            "Scan session {} shut down; discarded {} queued decode outcome(s)",
            self.session_id,
            purged
        );
    }

    fn request_decode_frame(&mut self) -> Result<(), ScanError> {
        let Some(worker) = self.worker.as_ref() else {
            return Err(ScanError::Worker("decode worker stopped".into()));
        };
        let submitter = worker.submitter();
        self.state = ScanState::Preview;
        let requested = self
            .camera
            .lock()
            .request_preview_frame(move |frame| submitter.submit(frame));
        if let Err(e) = requested {
            // Leave the session rearmable instead of waiting on a frame that never comes.
            self.state = ScanState::Success;
            log::error!("Session {}: frame request failed: {}", self.session_id, e);
            return Err(e);
        }
        Ok(())
    }

    fn purge_decode_outcomes(&mut self) -> usize {
        let mut kept = Vec::new();
        let mut purged = 0;
        while let Ok(message) = self.receiver.try_recv() {
            if message.is_decode_outcome() {
                purged += 1;
            } else {
                kept.push(message);
            }
        }
        for message in kept {
            let _ = self.sender.send(message);
        }
        purged
    }

    fn launch_product_query(&self, url: &str) {
        let mut request = LookupRequest {
            url: url.to_string(),
            browser_package: None,
            application_id: None,
            new_task: false,
        };

        if let Some(package) = self.host.resolve_default_handler(url) {
            if PINNED_BROWSERS.contains(&package.as_str()) {
                request.new_task = true;
                request.application_id = Some(package.clone());
                request.browser_package = Some(package);
            }
        }

        if let Err(e) = self.host.on_request_external_lookup(&request) {
            log::warn!("Can't launch product query for {}: {}", url, e);
        }
    }
}

impl<C: CameraDevice> Drop for CaptureCoordinator<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decode::{BarcodeFormat, PreviewFrame};
    use crate::models::geometry::{CameraFacing, ResultPoint, Size};
    use crate::session::test_support::{MockCamera, MockDisplay, RecordingHost};

    const WAIT: Duration = Duration::from_secs(2);

    /// Frames starting with `CODE:` decode to the rest of the frame.
    struct PrefixDecoder;

    impl FrameDecoder for PrefixDecoder {
        fn decode(
            &mut self,
            frame: &PreviewFrame,
            _hints: &DecodeHints,
            on_point: &mut dyn FnMut(ResultPoint),
        ) -> Option<DecodedPayload> {
            let text = frame.data.strip_prefix(b"CODE:")?;
            on_point(ResultPoint::new(10.0, 20.0));
            Some(DecodedPayload::new(
                BarcodeFormat::QrCode,
                String::from_utf8_lossy(text),
            ))
        }
    }

    fn session_with(
        host: RecordingHost,
    ) -> (CaptureCoordinator<MockCamera>, MockCamera, Arc<RecordingHost>) {
        let camera = MockCamera::new(CameraFacing::Back, 90);
        let display = MockDisplay::new(0, Size::new(1080, 1920));
        let config = ScanConfiguration::default();
        let manager = CameraManager::with_camera(camera.clone(), &display, &config).unwrap();
        let host = Arc::new(host);
        let coordinator = CaptureCoordinator::new(
            host.clone(),
            Arc::new(Mutex::new(manager)),
            PrefixDecoder,
            &config,
        )
        .unwrap();
        (coordinator, camera, host)
    }

    fn session() -> (CaptureCoordinator<MockCamera>, MockCamera, Arc<RecordingHost>) {
        session_with(RecordingHost::default())
    }

    #[test]
    fn construction_starts_preview_and_arms_once() {
        let (coordinator, camera, host) = session();

        assert_eq!(coordinator.state(), ScanState::Preview);
        let state = camera.state();
        assert!(state.previewing);
        assert_eq!(state.start_preview_calls, 1);
        assert_eq!(state.frame_requests, 1);
        assert_eq!(host.log.lock().redraws, 1);
    }

    #[test]
    fn rearm_while_previewing_is_a_no_op() {
        let (mut coordinator, camera, host) = session();

        coordinator.restart_preview_and_decode().unwrap();
        assert!(coordinator.handle().restart_preview());
        coordinator.process_pending().unwrap();

        assert_eq!(coordinator.state(), ScanState::Preview);
        assert_eq!(camera.state().frame_requests, 1);
        assert_eq!(host.log.lock().redraws, 1);
    }

    #[test]
    fn decode_failure_rearms_exactly_once() {
        let (mut coordinator, camera, host) = session();

        assert!(camera.deliver_frame(b"noise"));
        assert!(coordinator.pump(WAIT).unwrap());

        assert_eq!(coordinator.state(), ScanState::Preview);
        assert_eq!(camera.state().frame_requests, 2);
        assert_eq!(camera.state().pending_frames.len(), 1);
        assert!(host.log.lock().successes.is_empty());
        // misses do not redraw
        assert_eq!(host.log.lock().redraws, 1);
    }

    #[test]
    fn decode_success_notifies_host_and_waits() {
        let (mut coordinator, camera, host) = session();

        assert!(camera.deliver_frame(b"CODE:hello"));
        assert!(coordinator.pump(WAIT).unwrap());

        assert_eq!(coordinator.state(), ScanState::Success);
        assert_eq!(camera.state().frame_requests, 1);
        {
            let log = host.log.lock();
            assert_eq!(log.successes.len(), 1);
            assert_eq!(log.successes[0].text, "hello");
            assert_eq!(log.points, vec![ResultPoint::new(10.0, 20.0)]);
        }

        coordinator.restart_preview_and_decode().unwrap();
        assert_eq!(coordinator.state(), ScanState::Preview);
        assert_eq!(camera.state().frame_requests, 2);
        assert_eq!(host.log.lock().redraws, 2);
    }

    #[test]
    fn misses_then_hit() {
        let (mut coordinator, camera, host) = session();

        for _ in 0..3 {
            assert!(camera.deliver_frame(b"blur"));
            assert!(coordinator.pump(WAIT).unwrap());
        }
        assert!(camera.deliver_frame(b"CODE:4006381333931"));
        assert!(coordinator.pump(WAIT).unwrap());

        assert_eq!(coordinator.state(), ScanState::Success);
        assert_eq!(camera.state().frame_requests, 4);
        assert_eq!(host.log.lock().successes.len(), 1);
    }

    #[test]
    fn shutdown_purges_queued_outcomes() {
        let (mut coordinator, camera, host) = session();
        let handle = coordinator.handle();
        handle.post(CoordinatorMessage::DecodeSucceeded(DecodedPayload::new(
            BarcodeFormat::Ean13,
            "stale",
        )));
        handle.post(CoordinatorMessage::DecodeFailed);
        handle.return_scan_result(DecodedPayload::new(BarcodeFormat::QrCode, "final"));

        coordinator.shutdown();
        assert_eq!(coordinator.state(), ScanState::Done);
        assert_eq!(camera.state().stop_preview_calls, 1);

        assert_eq!(coordinator.process_pending().unwrap(), 1);
        let log = host.log.lock();
        assert!(log.successes.is_empty());
        assert_eq!(log.returned.len(), 1);
        assert_eq!(log.returned[0].text, "final");
        assert_eq!(camera.state().frame_requests, 1);
    }

    #[test]
    fn done_is_terminal() {
        let (mut coordinator, camera, host) = session();
        coordinator.shutdown();

        coordinator.handle().post(CoordinatorMessage::DecodeFailed);
        coordinator
            .handle()
            .post(CoordinatorMessage::DecodeSucceeded(DecodedPayload::new(
                BarcodeFormat::QrCode,
                "late",
            )));
        coordinator.handle().restart_preview();
        coordinator.process_pending().unwrap();
        coordinator.restart_preview_and_decode().unwrap();
        coordinator.shutdown();

        assert_eq!(coordinator.state(), ScanState::Done);
        assert_eq!(camera.state().frame_requests, 1);
        assert_eq!(camera.state().stop_preview_calls, 1);
        assert!(host.log.lock().successes.is_empty());
    }

    #[test]
    fn frames_arriving_after_shutdown_are_dropped() {
        let (mut coordinator, camera, host) = session();
        coordinator.shutdown();

        // stop_preview cleared the mock's pending request; nothing to deliver
        assert!(!camera.deliver_frame(b"CODE:late"));
        assert!(!coordinator.pump(Duration::from_millis(50)).unwrap());
        assert!(host.log.lock().successes.is_empty());
    }

    #[test]
    fn drop_shuts_down() {
        let (coordinator, camera, _host) = session();
        drop(coordinator);

        let state = camera.state();
        assert!(!state.previewing);
        assert_eq!(state.stop_preview_calls, 1);
    }

    #[test]
    fn return_result_reaches_host() {
        let (mut coordinator, _camera, host) = session();
        let payload = DecodedPayload::new(BarcodeFormat::Code128, "ABC-123");

        assert!(coordinator.handle().return_scan_result(payload.clone()));
        coordinator.process_pending().unwrap();

        assert_eq!(host.log.lock().returned, vec![payload]);
    }

    #[test]
    fn lookup_pins_known_browser() {
        let (mut coordinator, _camera, host) = session_with(RecordingHost {
            default_handler: Some("com.android.chrome".into()),
            ..Default::default()
        });

        coordinator.handle().launch_product_query("https://example.com/p/123");
        coordinator.process_pending().unwrap();

        let log = host.log.lock();
        assert_eq!(
            log.lookups,
            vec![LookupRequest {
                url: "https://example.com/p/123".into(),
                browser_package: Some("com.android.chrome".into()),
                application_id: Some("com.android.chrome".into()),
                new_task: true,
            }]
        );
    }

    #[test]
    fn lookup_leaves_other_handlers_unpinned() {
        let (mut coordinator, _camera, host) = session_with(RecordingHost {
            default_handler: Some("org.example.browser".into()),
            ..Default::default()
        });

        coordinator.handle().launch_product_query("https://example.com");
        coordinator.process_pending().unwrap();

        let log = host.log.lock();
        assert_eq!(log.lookups.len(), 1);
        assert_eq!(log.lookups[0].browser_package, None);
        assert!(!log.lookups[0].new_task);
    }

    #[test]
    fn lookup_failure_is_swallowed() {
        let (mut coordinator, _camera, host) = session_with(RecordingHost {
            fail_lookups: true,
            ..Default::default()
        });

        coordinator.handle().launch_product_query("https://example.com");
        assert!(coordinator.process_pending().is_ok());
        assert!(host.log.lock().lookups.is_empty());
    }

    #[test]
    fn failed_frame_request_leaves_session_rearmable() {
        let (mut coordinator, camera, _host) = session();
        assert!(camera.deliver_frame(b"CODE:x"));
        coordinator.pump(WAIT).unwrap();

        coordinator.camera().lock().stop_preview().unwrap();
        let err = coordinator.restart_preview_and_decode().unwrap_err();
        assert_eq!(err, ScanError::PreviewNotRunning);
        assert_eq!(coordinator.state(), ScanState::Success);

        coordinator.camera().lock().start_preview().unwrap();
        coordinator.restart_preview_and_decode().unwrap();
        assert_eq!(coordinator.state(), ScanState::Preview);
    }
}
