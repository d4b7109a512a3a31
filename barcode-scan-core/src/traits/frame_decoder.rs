use crate::models::decode::{DecodeHints, DecodedPayload, PreviewFrame};
use crate::models::geometry::ResultPoint;

/// Opaque barcode recognition capability.
///
/// Runs on the decode worker thread. Returns `None` when the frame holds no
/// readable code; that is the common case and not an error.
pub trait FrameDecoder: Send {
    /// Decode one frame. `on_point` may be called with candidate points
    /// found along the way.
    fn decode(
        &mut self,
        frame: &PreviewFrame,
        hints: &DecodeHints,
        on_point: &mut dyn FnMut(ResultPoint),
    ) -> Option<DecodedPayload>;
}
