//! Camera input and frame handling.
//!
//! This module provides abstractions for acquiring frames from a video
//! source and managing capture configuration. The source is treated as an
//! opaque producer of fixed-format pixel buffers; grayscale reduction and
//! motion analysis happen downstream.

mod camera;
mod config;
mod frame;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, DetectionConfig, FileConfig, OutputConfig};
pub use frame::{Frame, PixelFormat};
