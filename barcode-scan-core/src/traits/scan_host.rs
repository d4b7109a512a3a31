use crate::models::decode::DecodedPayload;
use crate::models::error::ScanError;
use crate::models::geometry::ResultPoint;

/// Request to open a URL in a browser-capable app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub url: String,
    /// Package to pin the request to, when the default handler is a known browser.
    pub browser_package: Option<String>,
    /// Application id passed along so the browser reuses one tab per app.
    pub application_id: Option<String>,
    pub new_task: bool,
}

/// Callbacks from a scan session to the screen hosting it.
///
/// Everything except `on_possible_result_point` is called from the thread
/// that drives the `CaptureCoordinator`. `on_possible_result_point` is
/// called from the decode worker.
pub trait ScanHost: Send + Sync {
    /// A frame decoded. The session waits for the host to rearm or finish.
    fn on_decode_success(&self, payload: &DecodedPayload);

    /// Complete the session successfully with `payload` and close the screen.
    fn on_return_result(&self, payload: &DecodedPayload);

    /// Open `request.url`. Return `ScanError::NoUrlHandler` when nothing can.
    fn on_request_external_lookup(&self, request: &LookupRequest) -> Result<(), ScanError>;

    /// Redraw the on-screen scan region indicator.
    fn on_redraw_scan_indicator(&self);

    /// Package name of the app that would handle `url` by default, if any.
    fn resolve_default_handler(&self, _url: &str) -> Option<String> {
        None
    }

    fn on_possible_result_point(&self, _point: &ResultPoint) {}
}
