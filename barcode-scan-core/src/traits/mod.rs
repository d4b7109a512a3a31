pub mod camera_device;
pub mod frame_decoder;
pub mod scan_host;
