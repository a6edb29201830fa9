//! Grayscale reduction of raw frames.
//!
//! A pure, stateless pixel-format transform: any supported input format
//! becomes 8-bit intensity of identical dimensions. Reduction uses the
//! ITU-R BT.709 luminance weights with integer math in the hot path.

use crate::capture::{Frame, PixelFormat};
use crate::detection::FrameBuffer;

// BT.709 luma weights scaled by 10000 (2125 + 7154 + 721 = 10000).
const WEIGHT_R: u32 = 2125;
const WEIGHT_G: u32 = 7154;
const WEIGHT_B: u32 = 721;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32) / 10000) as u8
}

/// Reduces a frame into a caller-supplied buffer of identical dimensions.
///
/// Gray8 input copies through unchanged; color formats are reduced with
/// the BT.709 weights, ignoring alpha. The destination's row padding, if
/// any, is left untouched.
///
/// The caller must supply a buffer matching the frame's width and height;
/// a mismatch is a programming error.
pub fn reduce_into(frame: &Frame, dst: &mut FrameBuffer) {
    debug_assert_eq!(frame.width(), dst.width());
    debug_assert_eq!(frame.height(), dst.height());

    let width = frame.width() as usize;
    let src_stride = width * frame.format().bytes_per_pixel();

    for y in 0..frame.height() {
        let src = &frame.pixels()[y as usize * src_stride..][..src_stride];
        let dst_row = dst.row_mut(y);

        match frame.format() {
            PixelFormat::Gray8 => dst_row.copy_from_slice(src),
            PixelFormat::Rgb24 => {
                for (px, rgb) in dst_row.iter_mut().zip(src.chunks_exact(3)) {
                    *px = luma(rgb[0], rgb[1], rgb[2]);
                }
            }
            PixelFormat::Bgr24 => {
                for (px, bgr) in dst_row.iter_mut().zip(src.chunks_exact(3)) {
                    *px = luma(bgr[2], bgr[1], bgr[0]);
                }
            }
            PixelFormat::Rgba32 => {
                for (px, rgba) in dst_row.iter_mut().zip(src.chunks_exact(4)) {
                    *px = luma(rgba[0], rgba[1], rgba[2]);
                }
            }
        }
    }
}

/// Reduces a frame into a freshly allocated buffer.
pub fn reduce(frame: &Frame) -> FrameBuffer {
    let mut dst = FrameBuffer::new(frame.width(), frame.height());
    reduce_into(frame, &mut dst);
    dst
}
