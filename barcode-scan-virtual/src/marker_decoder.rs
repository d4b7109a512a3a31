//! Decoder for frames produced by [`marker_frame`].
//!
//! Stands in for a real recognition library: a frame either carries a marker
//! naming a format and its text, or it decodes to nothing.

use barcode_scan_core::models::decode::{BarcodeFormat, DecodeHints, DecodedPayload, PreviewFrame};
use barcode_scan_core::models::geometry::ResultPoint;
use barcode_scan_core::traits::frame_decoder::FrameDecoder;

const MAGIC: &[u8] = b"VBAR";

const FORMATS: [BarcodeFormat; 17] = [
    BarcodeFormat::Aztec,
    BarcodeFormat::Codabar,
    BarcodeFormat::Code39,
    BarcodeFormat::Code93,
    BarcodeFormat::Code128,
    BarcodeFormat::DataMatrix,
    BarcodeFormat::Ean8,
    BarcodeFormat::Ean13,
    BarcodeFormat::Itf,
    BarcodeFormat::Maxicode,
    BarcodeFormat::Pdf417,
    BarcodeFormat::QrCode,
    BarcodeFormat::Rss14,
    BarcodeFormat::RssExpanded,
    BarcodeFormat::UpcA,
    BarcodeFormat::UpcE,
    BarcodeFormat::UpcEanExtension,
];

/// Build a frame carrying a barcode: `VBAR | format tag | text`.
pub fn marker_frame(format: BarcodeFormat, text: &str) -> Vec<u8> {
    let tag = FORMATS.iter().position(|f| *f == format).unwrap_or(0) as u8;
    let mut frame = Vec::with_capacity(MAGIC.len() + 1 + text.len());
    frame.extend_from_slice(MAGIC);
    frame.push(tag);
    frame.extend_from_slice(text.as_bytes());
    frame
}

/// A frame with nothing to decode.
pub fn blank_frame(len: usize) -> Vec<u8> {
    vec![0x10; len]
}

/// Decodes marker frames, honouring the possible-formats hint.
#[derive(Debug, Default)]
pub struct MarkerDecoder {
    attempts: u64,
}

impl MarkerDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}

impl FrameDecoder for MarkerDecoder {
    fn decode(
        &mut self,
        frame: &PreviewFrame,
        hints: &DecodeHints,
        on_point: &mut dyn FnMut(ResultPoint),
    ) -> Option<DecodedPayload> {
        self.attempts += 1;

        let rest = frame.data.strip_prefix(MAGIC)?;
        let (&tag, text) = rest.split_first()?;
        let format = *FORMATS.get(tag as usize)?;

        let center = ResultPoint::new(
            frame.resolution.width as f32 / 2.0,
            frame.resolution.height as f32 / 2.0,
        );
        on_point(center);

        let allowed = hints.possible_formats();
        if !allowed.is_empty() && !allowed.contains(&format) {
            log::trace!("Found {:?} but it was not requested", format);
            return None;
        }

        let text = String::from_utf8(text.to_vec()).ok()?;
        Some(
            DecodedPayload::new(format, text)
                .with_raw_bytes(rest[1..].to_vec())
                .with_points(vec![center]),
        )
    }
}
