//! Video Motion Detection Library
//!
//! A real-time motion-detection stage for continuous video frame streams.
//! Each incoming frame is compared against the one before it, producing a
//! scalar motion level plus a full-resolution binary motion mask suitable
//! for downstream highlighting or alarm logic.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → grayscale → detection
//!                           ↓
//!            motion mask + motion level
//! ```
//!
//! # Design Principles
//!
//! - **Per-instance state**: detectors own their buffers exclusively; no
//!   process-wide singletons
//! - **Best-effort frames**: a frame whose dimensions do not match the
//!   stream is dropped and counted, never retried
//! - **Bounds-checked buffers**: all pixel access goes through an owned
//!   contiguous buffer abstraction; no raw pointer walks
//! - **Swappable strategies**: detection is a trait, selected by the caller
//!   at runtime without the core knowing which variant is active
//!
//! # Example
//!
//! ```
//! use video_motion::{
//!     capture::{Camera, CaptureConfig, MockCamera},
//!     detection::{MotionDetector, TwoFramesDifferenceDetector},
//! };
//!
//! // Initialize components
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let mut detector = TwoFramesDifferenceDetector::new();
//!
//! // Capture and process frames
//! for _ in 0..10 {
//!     let frame = camera.capture().unwrap();
//!     detector.process_frame(&frame);
//! }
//!
//! // Read back the motion signal
//! println!("motion level: {:.4}", detector.motion_level());
//! if let Some(mask) = detector.motion_frame() {
//!     println!("changed pixels: {}", detector.pixels_changed());
//!     assert_eq!(mask.width(), 640);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod detection;
pub mod grayscale;

// Re-export commonly used types at crate root
pub use capture::{Camera, CameraError, CaptureConfig, Frame, MockCamera, PixelFormat};
pub use detection::{FrameBuffer, MotionDetector, TwoFramesDifferenceDetector};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
