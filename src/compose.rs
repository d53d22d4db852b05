// Canvas-over-video compositing.
// Visual expectation: wherever a stroke exists the live pixel is fully replaced
// by the stroke color; everywhere else the camera shows through untouched.
use crate::error::Error;
use crate::types::FrameBuffer;

/// Canvas luma at or below this counts as "no ink".
pub const DEFAULT_INK_THRESHOLD: u8 = 20;

/// 0.299 R + 0.587 G + 0.114 B in 14-bit fixed point, rounded.
#[inline]
pub fn luma(px: u32) -> u8 {
    let r = (px >> 16) & 0xFF;
    let g = (px >> 8) & 0xFF;
    let b = px & 0xFF;
    ((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8
}

/// Inverse binary mask for one canvas pixel: all-ones (keep live) when there is
/// no ink, zero (drop live) when there is.
#[inline]
fn keep_live_mask(canvas_px: u32, threshold: u8) -> u32 {
    if luma(canvas_px) > threshold { 0 } else { 0x00FF_FFFF }
}

/// Per-pixel ink flags (true = stroke present).
#[cfg(test)]
pub fn ink_mask(canvas: &FrameBuffer, threshold: u8) -> Vec<bool> {
    canvas.pixels.iter().map(|&px| luma(px) > threshold).collect()
}

/// `live = (live & !ink) | canvas`. Binary, no alpha blending.
/// Pure in its inputs, so compositing the same pair twice gives the same frame.
pub fn composite_in_place(
    live: &mut FrameBuffer,
    canvas: &FrameBuffer,
    threshold: u8,
) -> Result<(), Error> {
    if !live.same_size(canvas) {
        return Err(Error::CameraFrame(format!(
            "composite: canvas {}x{} does not match frame {}x{}",
            canvas.width, canvas.height, live.width, live.height
        )));
    }
    for (out, &ink) in live.pixels.iter_mut().zip(&canvas.pixels) {
        *out = (*out & keep_live_mask(ink, threshold)) | ink;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{ERASER, GREEN, ORANGE, PINK};

    fn live(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer {
            width: w,
            height: h,
            pixels: (0..w * h).map(|i| (i as u32).wrapping_mul(2_654_435_761) & 0x00FF_FFFF).collect(),
        }
    }

    #[test]
    fn luma_matches_reference_weights() {
        assert_eq!(luma(0), 0);
        assert_eq!(luma(0x00FF_FFFF), 255);
        assert_eq!(luma(PINK.packed()), 105);
        assert_eq!(luma(GREEN.packed()), 150);
    }

    #[test]
    fn palette_colors_all_count_as_ink() {
        for c in [PINK, ORANGE, GREEN] {
            assert!(luma(c.packed()) > DEFAULT_INK_THRESHOLD);
        }
        assert!(luma(ERASER.packed()) <= DEFAULT_INK_THRESHOLD);
    }

    #[test]
    fn blank_canvas_passes_video_through() {
        let frame = live(8, 4);
        let mut out = frame.clone();
        composite_in_place(&mut out, &FrameBuffer::blank(8, 4), DEFAULT_INK_THRESHOLD).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn ink_replaces_video_exactly() {
        let frame = live(8, 4);
        let mut canvas = FrameBuffer::blank(8, 4);
        canvas.pixels[5] = ORANGE.packed();
        let mut out = frame.clone();
        composite_in_place(&mut out, &canvas, DEFAULT_INK_THRESHOLD).unwrap();
        assert_eq!(out.pixels[5], ORANGE.packed());
        assert_eq!(out.pixels[4], frame.pixels[4]);
        assert_eq!(ink_mask(&canvas, DEFAULT_INK_THRESHOLD).iter().filter(|b| **b).count(), 1);
    }

    #[test]
    fn dim_canvas_pixels_are_ored_not_masked() {
        let mut frame = FrameBuffer::blank(1, 1);
        frame.pixels[0] = 0x0010_0000;
        let mut canvas = FrameBuffer::blank(1, 1);
        canvas.pixels[0] = 0x0000_0001;
        composite_in_place(&mut frame, &canvas, DEFAULT_INK_THRESHOLD).unwrap();
        assert_eq!(frame.pixels[0], 0x0010_0001);
    }

    #[test]
    fn compositing_is_repeatable() {
        let frame = live(16, 16);
        let mut canvas = FrameBuffer::blank(16, 16);
        for px in canvas.pixels.iter_mut().step_by(3) {
            *px = GREEN.packed();
        }
        let mut a = frame.clone();
        let mut b = frame.clone();
        composite_in_place(&mut a, &canvas, DEFAULT_INK_THRESHOLD).unwrap();
        composite_in_place(&mut b, &canvas, DEFAULT_INK_THRESHOLD).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let mut frame = FrameBuffer::blank(4, 4);
        assert!(composite_in_place(&mut frame, &FrameBuffer::blank(4, 5), 20).is_err());
    }
}
