//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over video sources,
//! allowing for real capture devices and mock implementations for testing.

use super::{CaptureConfig, Frame, PixelFormat};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real capture devices
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera for testing that generates synthetic frames.
///
/// Each frame shows a bright square drifting one pixel per capture across
/// a dark background, so consecutive frames genuinely differ in a
/// predictable region.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
}

/// Background intensity of mock frames.
const BACKGROUND: u8 = 16;
/// Intensity of the moving square.
const FOREGROUND: u8 = 224;

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(&self, config: &CaptureConfig) -> Vec<u8> {
        let width = config.width as usize;
        let height = config.height as usize;

        let mut pixels = vec![BACKGROUND; width * height];

        // Square side and step scale with the frame so the per-frame
        // change stays a meaningful fraction of the pixel count
        let side = (width.min(height) / 4).max(1);
        let step = (side / 4).max(1);
        let x0 = self.sequence as usize * step % (width - side + 1);
        let y0 = (height - side) / 2;

        for y in y0..y0 + side {
            for x in x0..x0 + side {
                pixels[y * width + x] = FOREGROUND;
            }
        }

        if config.grayscale {
            pixels
        } else {
            // Replicate intensity into RGB triplets
            pixels.iter().flat_map(|&v| [v, v, v]).collect()
        }
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let pixels = self.render(config);
        let format = if config.grayscale {
            PixelFormat::Gray8
        } else {
            PixelFormat::Rgb24
        };

        let frame = Frame::new(pixels, config.width, config.height, format, self.sequence + 1);
        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
