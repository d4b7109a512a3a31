//! # barcode-scan-virtual
//!
//! In-process backend for barcode-scan-core.
//!
//! Provides:
//! - `VirtualCamera` — camera device delivering scripted frames on its own preview thread
//! - `VirtualCameraProvider` — opens cameras by facing with first-camera fallback
//! - `VirtualDisplay` — fixed display rotation and resolution
//! - `MarkerDecoder` — decoder for frames built with `marker_frame`
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use barcode_scan_core::{CameraFacing, CameraManager, CaptureCoordinator, ScanConfiguration};
//! use barcode_scan_virtual::{MarkerDecoder, VirtualCamera, VirtualCameraProvider, VirtualDisplay};
//!
//! let provider = VirtualCameraProvider::new(vec![VirtualCamera::new(CameraFacing::Back, 90)]);
//! let config = ScanConfiguration::default();
//! let camera = CameraManager::open(&provider, &VirtualDisplay::portrait_phone(), &config)?;
//! let mut session = CaptureCoordinator::new(host, Arc::new(parking_lot::Mutex::new(camera)), MarkerDecoder::new(), &config)?;
//! ```

pub mod display;
pub mod marker_decoder;
pub mod provider;
pub mod virtual_camera;

pub use display::VirtualDisplay;
pub use marker_decoder::{blank_frame, marker_frame, MarkerDecoder};
pub use provider::VirtualCameraProvider;
pub use virtual_camera::{phone_parameters, VirtualCamera, VirtualCameraControl};
