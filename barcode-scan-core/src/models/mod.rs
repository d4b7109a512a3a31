pub mod config;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod parameters;
pub mod state;
