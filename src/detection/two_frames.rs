//! Two-frame difference motion detection.
//!
//! The simplest temporal strategy: each frame is compared against the one
//! before it, so only changes between consecutive frames register as
//! motion. A static scene, however cluttered, produces no signal.

use super::{FrameBuffer, MotionDetector};
use crate::capture::Frame;
use crate::grayscale;

/// Default difference threshold.
const DEFAULT_THRESHOLD: i16 = 15;

/// Motion detector based on differencing consecutive frames.
///
/// The first accepted frame fixes the detector's dimensions and seeds the
/// previous-frame buffer without reporting motion. Every subsequent frame
/// of matching dimensions is grayscale-reduced, differenced per pixel
/// against the stored previous frame, and thresholded into a binary mask;
/// the count of flagged pixels yields the motion level.
///
/// Frames of any other dimensions are dropped and counted, a deliberate
/// tolerance for transient capture glitches.
pub struct TwoFramesDifferenceDetector {
    /// Stream dimensions, fixed by the first accepted frame.
    width: u32,
    height: u32,
    /// Grayscale copy of the prior frame.
    previous_frame: Option<FrameBuffer>,
    /// Binary mask produced by the latest comparison.
    motion_frame: Option<FrameBuffer>,
    /// Changed-pixel count for the latest comparison only.
    pixels_changed: usize,
    /// Frames accepted since construction or reset.
    frames_processed: u64,
    /// Frames dropped due to mismatched dimensions or malformed data.
    frames_skipped: u64,
    /// Minimum absolute grayscale delta classified as motion, [1, 255].
    ///
    /// The comparison is symmetric around zero; the negative bound is
    /// always the exact negation of this value.
    difference_threshold: i16,
}

impl TwoFramesDifferenceDetector {
    /// Creates a detector with the default difference threshold of 15.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            previous_frame: None,
            motion_frame: None,
            pixels_changed: 0,
            frames_processed: 0,
            frames_skipped: 0,
            difference_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Creates a detector with a custom threshold, clamped into [1, 255].
    pub fn with_threshold(threshold: i32) -> Self {
        let mut detector = Self::new();
        detector.set_difference_threshold(threshold);
        detector
    }

    /// Returns the current difference threshold.
    #[inline]
    pub fn difference_threshold(&self) -> u8 {
        self.difference_threshold as u8
    }

    /// Sets the difference threshold, clamping the value into [1, 255].
    pub fn set_difference_threshold(&mut self, threshold: i32) {
        self.difference_threshold = threshold.clamp(1, 255) as i16;
    }

    /// Returns the changed-pixel count of the most recent comparison.
    #[inline]
    pub fn pixels_changed(&self) -> usize {
        self.pixels_changed
    }

    /// Returns the number of frames accepted since construction or reset.
    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

impl Default for TwoFramesDifferenceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionDetector for TwoFramesDifferenceDetector {
    fn process_frame(&mut self, frame: &Frame) {
        if frame.width() == 0 || frame.height() == 0 || !frame.is_valid() {
            self.frames_skipped += 1;
            tracing::debug!(
                width = frame.width(),
                height = frame.height(),
                bytes = frame.pixels().len(),
                "Dropping malformed frame"
            );
            return;
        }

        let Some(prev) = self.previous_frame.as_mut() else {
            // First frame seeds the detector: fix the dimensions, allocate
            // both buffers, store the grayscale frame. No motion yet.
            self.width = frame.width();
            self.height = frame.height();

            let mut previous = FrameBuffer::new(self.width, self.height);
            grayscale::reduce_into(frame, &mut previous);

            self.previous_frame = Some(previous);
            self.motion_frame = Some(FrameBuffer::new(self.width, self.height));
            self.pixels_changed = 0;
            self.frames_processed = 1;
            return;
        };

        if frame.width() != self.width || frame.height() != self.height {
            self.frames_skipped += 1;
            tracing::debug!(
                got_width = frame.width(),
                got_height = frame.height(),
                want_width = self.width,
                want_height = self.height,
                "Dropping frame with mismatched dimensions"
            );
            return;
        }

        let Some(motion) = self.motion_frame.as_mut() else {
            return;
        };

        // The mask buffer doubles as scratch space for the new grayscale
        // frame before it becomes the mask.
        grayscale::reduce_into(frame, motion);

        let threshold = self.difference_threshold;

        // One pass over the full buffer, padding included, performs
        // differencing, thresholding and buffer rotation: the previous
        // frame ends the call holding the un-thresholded grayscale values
        // of the frame just processed.
        for (curr, prev_px) in motion.data_mut().iter_mut().zip(prev.data_mut().iter_mut()) {
            let diff = i16::from(*curr) - i16::from(*prev_px);
            *prev_px = *curr;
            *curr = if diff >= threshold || diff <= -threshold {
                255
            } else {
                0
            };
        }

        self.pixels_changed = motion.data().iter().filter(|&&px| px == 255).count();
        self.frames_processed += 1;
    }

    fn reset(&mut self) {
        self.width = 0;
        self.height = 0;
        self.previous_frame = None;
        self.motion_frame = None;
        self.pixels_changed = 0;
        self.frames_processed = 0;
        self.frames_skipped = 0;
        tracing::debug!("Motion detector reset");
    }

    fn motion_level(&self) -> f64 {
        if self.frames_processed < 2 {
            return 0.0;
        }
        self.pixels_changed as f64 / (self.width as f64 * self.height as f64)
    }

    fn motion_frame(&self) -> Option<&FrameBuffer> {
        if self.frames_processed < 2 {
            return None;
        }
        self.motion_frame.as_ref()
    }

    fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gray_frame(pixels: &[u8], width: u32, height: u32, sequence: u64) -> Frame {
        Frame::gray(pixels.to_vec(), width, height, sequence)
    }

    #[test]
    fn test_first_frame_reports_no_motion() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let pixels: Vec<u8> = (0..64).map(|i| (i * 37) as u8).collect();

        detector.process_frame(&gray_frame(&pixels, 8, 8, 1));

        assert_eq!(detector.motion_level(), 0.0);
        assert!(detector.motion_frame().is_none());
        assert_eq!(detector.pixels_changed(), 0);
    }

    #[test]
    fn test_identical_frames_zero_motion() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let pixels = vec![100u8; 64];

        detector.process_frame(&gray_frame(&pixels, 8, 8, 1));
        detector.process_frame(&gray_frame(&pixels, 8, 8, 2));

        assert_eq!(detector.motion_level(), 0.0);
        let mask = detector.motion_frame().unwrap();
        assert!(mask.data().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_exact_threshold_flags_pixel() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let base = vec![100u8; 8];
        let mut moved = base.clone();
        moved[3] = 115; // +15, exactly the default threshold

        detector.process_frame(&gray_frame(&base, 8, 1, 1));
        detector.process_frame(&gray_frame(&moved, 8, 1, 2));

        assert_eq!(detector.pixels_changed(), 1);
        let mask = detector.motion_frame().unwrap();
        assert_eq!(mask.data()[3], 255);
        assert_eq!(mask.data().iter().filter(|&&px| px == 255).count(), 1);
    }

    #[test]
    fn test_below_threshold_not_flagged() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let base = vec![100u8; 8];
        let mut moved = base.clone();
        moved[3] = 114; // +14, one below the default threshold

        detector.process_frame(&gray_frame(&base, 8, 1, 1));
        detector.process_frame(&gray_frame(&moved, 8, 1, 2));

        assert_eq!(detector.pixels_changed(), 0);
        assert_eq!(detector.motion_level(), 0.0);
    }

    #[test]
    fn test_negative_delta_flags_symmetrically() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let base = vec![100u8; 8];
        let mut moved = base.clone();
        moved[5] = 85; // -15

        detector.process_frame(&gray_frame(&base, 8, 1, 1));
        detector.process_frame(&gray_frame(&moved, 8, 1, 2));

        assert_eq!(detector.pixels_changed(), 1);
        assert_eq!(detector.motion_frame().unwrap().data()[5], 255);
    }

    #[test]
    fn test_single_row_scenario() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let a = [0u8, 0, 0, 0, 0, 0, 0, 0];
        let b = [0u8, 20, 10, 0, 16, 255, 0, 14];

        detector.process_frame(&gray_frame(&a, 8, 1, 1));
        detector.process_frame(&gray_frame(&b, 8, 1, 2));

        let mask = detector.motion_frame().unwrap();
        assert_eq!(mask.data(), &[0, 255, 0, 0, 255, 255, 0, 0]);
        assert_eq!(detector.pixels_changed(), 3);
        assert_eq!(detector.motion_level(), 3.0 / 8.0);
    }

    #[test]
    fn test_mismatched_dimensions_ignored() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let a = vec![0u8; 8];
        let mut b = a.clone();
        b[1] = 200;

        detector.process_frame(&gray_frame(&a, 8, 1, 1));
        detector.process_frame(&gray_frame(&b, 8, 1, 2));

        let level_before = detector.motion_level();
        let mask_before = detector.motion_frame().unwrap().data().to_vec();

        // Wrong dimensions: dropped without touching any state
        detector.process_frame(&gray_frame(&[255u8; 4], 4, 1, 3));

        assert_eq!(detector.frames_skipped(), 1);
        assert_eq!(detector.motion_level(), level_before);
        assert_eq!(detector.motion_frame().unwrap().data(), mask_before.as_slice());

        // The next matching frame diffs against frame b, not the glitch
        detector.process_frame(&gray_frame(&b, 8, 1, 4));
        assert_eq!(detector.motion_level(), 0.0);
    }

    #[test]
    fn test_malformed_frame_ignored() {
        let mut detector = TwoFramesDifferenceDetector::new();

        // Declared 8x1 but carrying 4 bytes
        detector.process_frame(&gray_frame(&[0u8; 4], 8, 1, 1));

        assert_eq!(detector.frames_skipped(), 1);
        assert_eq!(detector.frames_processed(), 0);
    }

    #[test]
    fn test_reset_reseeds_like_fresh() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let a = vec![10u8; 16];
        let b = vec![200u8; 16];

        detector.process_frame(&gray_frame(&a, 4, 4, 1));
        detector.process_frame(&gray_frame(&b, 4, 4, 2));
        assert!(detector.motion_level() > 0.0);

        detector.reset();
        detector.reset(); // idempotent

        assert_eq!(detector.motion_level(), 0.0);
        assert!(detector.motion_frame().is_none());
        assert_eq!(detector.frames_skipped(), 0);

        // First frame after reset behaves exactly like a fresh first frame,
        // including accepting new dimensions
        detector.process_frame(&gray_frame(&[50u8; 8], 8, 1, 3));
        assert_eq!(detector.motion_level(), 0.0);
        assert!(detector.motion_frame().is_none());
    }

    #[test]
    fn test_threshold_clamping() {
        let mut detector = TwoFramesDifferenceDetector::new();

        detector.set_difference_threshold(300);
        assert_eq!(detector.difference_threshold(), 255);

        detector.set_difference_threshold(-5);
        assert_eq!(detector.difference_threshold(), 1);

        assert_eq!(TwoFramesDifferenceDetector::with_threshold(0).difference_threshold(), 1);
    }

    #[test]
    fn test_previous_frame_rolls_forward() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let a = vec![0u8; 8];
        let b = vec![100u8; 8];

        detector.process_frame(&gray_frame(&a, 8, 1, 1));
        detector.process_frame(&gray_frame(&b, 8, 1, 2));
        assert_eq!(detector.motion_level(), 1.0);

        // Re-processing b diffs against itself: zero motion
        detector.process_frame(&gray_frame(&b, 8, 1, 3));
        assert_eq!(detector.motion_level(), 0.0);
    }

    #[test]
    fn test_color_input_is_reduced() {
        let mut detector = TwoFramesDifferenceDetector::new();
        let dark = vec![0u8; 4 * 3];
        let bright: Vec<u8> = vec![0, 255, 0].repeat(4); // pure green rows

        detector.process_frame(&Frame::new(dark, 4, 1, crate::capture::PixelFormat::Rgb24, 1));
        detector.process_frame(&Frame::new(bright, 4, 1, crate::capture::PixelFormat::Rgb24, 2));

        assert_eq!(detector.motion_level(), 1.0);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut detector: Box<dyn MotionDetector> =
            Box::new(TwoFramesDifferenceDetector::with_threshold(30));

        detector.process_frame(&gray_frame(&[0u8; 8], 8, 1, 1));
        detector.process_frame(&gray_frame(&[40u8; 8], 8, 1, 2));

        assert_eq!(detector.motion_level(), 1.0);
        assert!(detector.motion_frame().is_some());
    }

    proptest! {
        #[test]
        fn prop_mask_is_binary_and_level_bounded(
            a in proptest::collection::vec(any::<u8>(), 64),
            b in proptest::collection::vec(any::<u8>(), 64),
        ) {
            let mut detector = TwoFramesDifferenceDetector::new();
            detector.process_frame(&Frame::gray(a, 8, 8, 1));
            detector.process_frame(&Frame::gray(b, 8, 8, 2));

            let level = detector.motion_level();
            prop_assert!((0.0..=1.0).contains(&level));

            let mask = detector.motion_frame().unwrap();
            prop_assert!(mask.data().iter().all(|&px| px == 0 || px == 255));
        }

        #[test]
        fn prop_repeated_frame_yields_zero_motion(
            a in proptest::collection::vec(any::<u8>(), 64),
            b in proptest::collection::vec(any::<u8>(), 64),
        ) {
            let mut detector = TwoFramesDifferenceDetector::new();
            detector.process_frame(&Frame::gray(a, 8, 8, 1));
            detector.process_frame(&Frame::gray(b.clone(), 8, 8, 2));
            detector.process_frame(&Frame::gray(b, 8, 8, 3));

            prop_assert_eq!(detector.motion_level(), 0.0);
            prop_assert_eq!(detector.pixels_changed(), 0);
        }
    }
}
