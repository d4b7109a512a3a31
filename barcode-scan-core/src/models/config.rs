use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::decode::{BarcodeFormat, DecodeHints};
use super::error::ScanError;
use super::geometry::CameraFacing;

/// Configuration for a scan session.
///
/// Camera flags default to the conservative set: autofocus on, every
/// optional tuning (continuous focus, barcode scene mode, metering,
/// exposure compensation) off, torch off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfiguration {
    /// Camera to open (default: back).
    pub facing: CameraFacing,

    /// Turn the torch on when the camera is configured.
    pub use_light: bool,

    pub auto_focus: bool,

    pub disable_continuous_focus: bool,

    pub disable_barcode_scene_mode: bool,

    /// Also gates video stabilization and the focus area.
    pub disable_metering: bool,

    pub disable_exposure_compensation: bool,

    /// Formats to decode; empty means the default scan set.
    pub formats: Vec<BarcodeFormat>,

    pub hints: DecodeHints,

    /// Character set override for decoded text.
    pub character_set: Option<String>,

    /// How long shutdown waits for the decode worker (default: 500).
    pub worker_join_timeout_ms: u64,
}

impl ScanConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.character_set.as_deref(), Some(charset) if charset.trim().is_empty()) {
            return Err("character set must not be empty".into());
        }
        if self.worker_join_timeout_ms == 0 {
            return Err("worker join timeout must be positive".into());
        }
        Ok(())
    }

    pub fn worker_join_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_join_timeout_ms)
    }

    /// Formats the session decodes, with the default set filled in.
    pub fn effective_formats(&self) -> Vec<BarcodeFormat> {
        if self.formats.is_empty() {
            BarcodeFormat::default_scan_set()
        } else {
            self.formats.clone()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScanError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ScanError::ConfigurationFailed(format!("failed to parse configuration: {}", e))
        })?;
        config.validate().map_err(ScanError::ConfigurationFailed)?;
        Ok(config)
    }

    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let json = fs::read_to_string(path).map_err(|e| {
            ScanError::ConfigurationFailed(format!("failed to read configuration: {}", e))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            use_light: false,
            auto_focus: true,
            disable_continuous_focus: true,
            disable_barcode_scene_mode: true,
            disable_metering: true,
            disable_exposure_compensation: true,
            formats: Vec::new(),
            hints: DecodeHints::default(),
            character_set: None,
            worker_join_timeout_ms: 500,
        }
    }
}
