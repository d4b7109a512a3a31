pub mod camera_settings;
pub mod preview_size;
pub mod rotation;
