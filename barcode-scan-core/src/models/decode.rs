use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ScanError;
use super::geometry::{ResultPoint, Rotation, Size};

/// Symbologies a decoder can be asked to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Maxicode,
    Pdf417,
    QrCode,
    Rss14,
    RssExpanded,
    UpcA,
    UpcE,
    UpcEanExtension,
}

impl BarcodeFormat {
    /// Retail product codes.
    pub const PRODUCT: &'static [BarcodeFormat] = &[
        Self::UpcA,
        Self::UpcE,
        Self::Ean13,
        Self::Ean8,
        Self::Rss14,
        Self::RssExpanded,
    ];

    /// Industrial 1D codes.
    pub const INDUSTRIAL: &'static [BarcodeFormat] = &[
        Self::Code39,
        Self::Code93,
        Self::Code128,
        Self::Itf,
        Self::Codabar,
    ];

    /// Formats scanned when the caller does not narrow the search.
    pub fn default_scan_set() -> Vec<BarcodeFormat> {
        let mut formats = Vec::with_capacity(15);
        formats.extend_from_slice(Self::PRODUCT);
        formats.extend_from_slice(Self::INDUSTRIAL);
        formats.extend_from_slice(&[Self::QrCode, Self::DataMatrix, Self::Aztec, Self::Pdf417]);
        formats
    }
}

/// Keys a decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodeHintType {
    Other,
    PureBarcode,
    PossibleFormats,
    TryHarder,
    CharacterSet,
    AllowedLengths,
    AssumeCode39CheckDigit,
    AssumeGs1,
    ReturnCodabarStartEnd,
    AllowedEanExtensions,
    AlsoInverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Flag(bool),
    Text(String),
    Formats(Vec<BarcodeFormat>),
    Lengths(Vec<u32>),
}

/// Key-value configuration narrowing a decoder's search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodeHints(BTreeMap<DecodeHintType, HintValue>);

impl DecodeHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the hints a scan session decodes with.
    ///
    /// Starts from `base`, then sets the possible formats (the default scan
    /// set when `formats` is empty) and the character set when one is given.
    pub fn for_session(
        base: &DecodeHints,
        formats: &[BarcodeFormat],
        character_set: Option<&str>,
    ) -> Self {
        let mut hints = base.clone();
        let formats = if formats.is_empty() {
            BarcodeFormat::default_scan_set()
        } else {
            formats.to_vec()
        };
        hints.insert(DecodeHintType::PossibleFormats, HintValue::Formats(formats));
        if let Some(charset) = character_set {
            hints.insert(DecodeHintType::CharacterSet, HintValue::Text(charset.to_string()));
        }
        hints
    }

    pub fn insert(&mut self, key: DecodeHintType, value: HintValue) -> Option<HintValue> {
        self.0.insert(key, value)
    }

    pub fn with(mut self, key: DecodeHintType, value: HintValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: DecodeHintType) -> Option<&HintValue> {
        self.0.get(&key)
    }

    pub fn possible_formats(&self) -> &[BarcodeFormat] {
        match self.get(DecodeHintType::PossibleFormats) {
            Some(HintValue::Formats(formats)) => formats,
            _ => &[],
        }
    }

    pub fn character_set(&self) -> Option<&str> {
        match self.get(DecodeHintType::CharacterSet) {
            Some(HintValue::Text(charset)) => Some(charset),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One preview image handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    /// Raw preview bytes as delivered by the driver.
    pub data: Vec<u8>,
    /// Size the camera was negotiated to deliver.
    pub resolution: Size,
    /// Clockwise rotation that makes the frame upright on the display.
    pub rotation: Rotation,
}

/// A successfully decoded barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedPayload {
    pub format: BarcodeFormat,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub points: Vec<ResultPoint>,
    pub timestamp: DateTime<Utc>,
}

impl DecodedPayload {
    pub fn new(format: BarcodeFormat, text: impl Into<String>) -> Self {
        Self {
            format,
            text: text.into(),
            raw_bytes: None,
            points: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_raw_bytes(mut self, raw_bytes: Vec<u8>) -> Self {
        self.raw_bytes = Some(raw_bytes);
        self
    }

    pub fn with_points(mut self, points: Vec<ResultPoint>) -> Self {
        self.points = points;
        self
    }

    /// Serialize for hosts that hand the result across a process boundary.
    pub fn to_json(&self) -> Result<String, ScanError> {
        serde_json::to_string(self)
            .map_err(|e| ScanError::Unknown(format!("failed to serialize payload: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json)
            .map_err(|e| ScanError::Unknown(format!("failed to parse payload: {}", e)))
    }
}
