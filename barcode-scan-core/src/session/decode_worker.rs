use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::models::decode::{DecodeHints, PreviewFrame};
use crate::models::error::ScanError;
use crate::session::coordinator::CoordinatorMessage;
use crate::traits::frame_decoder::FrameDecoder;
use crate::traits::scan_host::ScanHost;

pub(crate) enum DecodeRequest {
    Decode(PreviewFrame),
    Quit,
}

/// Sending side handed to the camera's frame callback.
#[derive(Clone)]
pub(crate) struct FrameSubmitter {
    sender: Sender<DecodeRequest>,
    running: Arc<AtomicBool>,
}

impl FrameSubmitter {
    pub fn submit(&self, frame: PreviewFrame) {
        if !self.running.load(Ordering::SeqCst) {
            log::trace!("Decode worker stopped; dropping preview frame");
            return;
        }
        if self.sender.send(DecodeRequest::Decode(frame)).is_err() {
            log::debug!("Decode worker gone; dropping preview frame");
        }
    }
}

/// Dedicated decode thread.
///
/// Blocks waiting for frames, decodes each with the session hints and posts
/// exactly one outcome per frame back to the coordinator.
pub(crate) struct DecodeWorker {
    sender: Sender<DecodeRequest>,
    running: Arc<AtomicBool>,
    finished: Receiver<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DecodeWorker {
    pub fn spawn<D: FrameDecoder + 'static>(
        mut decoder: D,
        hints: DecodeHints,
        host: Arc<dyn ScanHost>,
        outcomes: Sender<CoordinatorMessage>,
    ) -> Result<Self, ScanError> {
        let (sender, requests) = mpsc::channel::<DecodeRequest>();
        let (finished_tx, finished) = mpsc::channel::<()>();
        let running = Arc::new(AtomicBool::new(true));
        let worker_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("barcode-decode".into())
            .spawn(move || {
                // Dropped when the loop exits; the coordinator waits on it.
                let _finished = finished_tx;
                while let Ok(request) = requests.recv() {
                    let DecodeRequest::Decode(frame) = request else {
                        break;
                    };
                    if !worker_running.load(Ordering::SeqCst) {
                        break;
                    }

                    let start = Instant::now();
                    let result = decoder.decode(&frame, &hints, &mut |point| {
                        host.on_possible_result_point(&point)
                    });
                    let message = match result {
                        Some(payload) => {
                            log::debug!(
                                "Found {:?} barcode in {} ms",
                                payload.format,
                                start.elapsed().as_millis()
                            );
                            CoordinatorMessage::DecodeSucceeded(payload)
                        }
                        None => {
                            log::trace!("No barcode in {} frame", frame.resolution);
                            CoordinatorMessage::DecodeFailed
                        }
                    };

                    if !worker_running.load(Ordering::SeqCst) || outcomes.send(message).is_err() {
                        break;
                    }
                }
                worker_running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| ScanError::Worker(format!("failed to spawn decode thread: {}", e)))?;

        Ok(Self {
            sender,
            running,
            finished,
            handle: Some(handle),
        })
    }

    pub fn submitter(&self) -> FrameSubmitter {
        FrameSubmitter {
            sender: self.sender.clone(),
            running: Arc::clone(&self.running),
        }
    }

    /// Ask the thread to stop and wait up to `timeout` for it.
    ///
    /// Returns false if it was still busy (mid-decode) when the wait ran out;
    /// the thread is then detached and finishes on its own.
    pub fn quit(mut self, timeout: Duration) -> bool {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.sender.send(DecodeRequest::Quit);

        match self.finished.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Decode worker did not stop within {:?}; detaching", timeout);
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.handle.take() {
                    if handle.join().is_err() {
                        log::error!("Decode worker panicked");
                    }
                }
                true
            }
        }
    }
}
